//! Entry surface for hosts.
//!
//! `Engine` owns the schema and knowledge graph and exposes the
//! validate / analyze / repair / optimize / suggest operations over raw
//! document values. Structural failures never panic out of this layer;
//! they come back as `success: false` responses with the input untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analyzer::WorkflowAnalyzer;
use crate::error::{ErrorDto, ErrorReport, ErrorSummary};
use crate::extract;
use crate::knowledge::{KnowledgeGraph, PropertySuggestion, WorkflowAssessment};
use crate::model::Workflow;
use crate::repair;
use crate::schema::{PropertyDefinition, Schema};
use crate::validate;

pub struct Engine {
    schema: Schema,
    knowledge: KnowledgeGraph,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixOutcome {
    pub valid: bool,
    pub fixed: bool,
    pub errors: Vec<ErrorDto>,
    pub fixes_applied: Vec<String>,
    pub workflow: Workflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub node_count: usize,
    pub connection_count: usize,
    pub errors: ErrorSummary,
    pub can_auto_fix: bool,
    pub health_score: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: Option<Analysis>,
    pub errors: Vec<ErrorDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    fn failure(error: String) -> Self {
        AnalysisResponse {
            error: Some(error),
            ..AnalysisResponse::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RepairOptions {
    pub auto_fix: bool,
    pub backup: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions {
            auto_fix: true,
            backup: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairResponse {
    pub success: bool,
    pub original_analysis: Option<Analysis>,
    pub post_repair_analysis: Option<Analysis>,
    pub fixes_applied: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_data: Option<Value>,
    /// Input document with its structural envelope completed and the
    /// repaired nodes written back into its original nesting.
    pub document: Option<Value>,
    /// The same repaired state in flat form.
    pub workflow: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub success: bool,
    pub optimizations_applied: Vec<String>,
    pub workflow: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Suggestions {
    /// (type, score) ranked descending.
    pub next_nodes: Vec<(String, f64)>,
    pub missing_nodes: Vec<String>,
    pub property_suggestions: Vec<PropertySuggestion>,
    /// (pattern name, Jaccard similarity) ranked descending.
    pub similar_patterns: Vec<(String, f64)>,
}

// =============================================================================
// ENGINE
// =============================================================================

impl Engine {
    pub fn new() -> Self {
        Engine {
            schema: Schema::builtin(),
            knowledge: KnowledgeGraph::curated(),
        }
    }

    /// Construct around a caller-supplied schema and knowledge graph.
    pub fn with_parts(schema: Schema, knowledge: KnowledgeGraph) -> Self {
        Engine { schema, knowledge }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn knowledge(&self) -> &KnowledgeGraph {
        &self.knowledge
    }

    pub fn is_valid_node_type(&self, node_type: &str) -> bool {
        self.schema.is_valid_node_type(node_type)
    }

    /// Property table for a node type, with the common fallback for
    /// unknown types.
    pub fn node_properties(
        &self,
        node_type: &str,
    ) -> &std::collections::BTreeMap<String, PropertyDefinition> {
        self.schema.property_definitions(node_type)
    }

    /// Validate, auto-fix what the rules can, and revalidate.
    ///
    /// `strict` promotes warnings to validation failures. INFO never fails.
    pub fn validate_and_fix(&self, workflow: &Workflow, strict: bool) -> FixOutcome {
        let mut report = validate::validate_workflow(workflow, &self.schema);
        let mut current = workflow.clone();
        let mut fixes_applied = Vec::new();

        if report.all().iter().any(|e| e.fix.is_fixable()) {
            let (fixed, fixes) = validate::fix::auto_fix(&current, &self.schema);
            if !fixes.is_empty() {
                current = fixed;
                fixes_applied = fixes;
                report = validate::validate_workflow(&current, &self.schema);
            }
        }

        let valid = if strict {
            use crate::error::Severity;
            !report
                .all()
                .iter()
                .any(|e| e.severity != Severity::Info)
        } else {
            !report.blocks_validity()
        };

        FixOutcome {
            valid,
            fixed: !fixes_applied.is_empty(),
            errors: report.all().iter().map(ErrorDto::from).collect(),
            fixes_applied,
            workflow: current,
        }
    }

    pub fn analyze_document(&self, document: &Value) -> AnalysisResponse {
        let workflow = match extract::extract(document) {
            Ok(w) => w,
            Err(e) => return AnalysisResponse::failure(e.to_string()),
        };
        let report = self.full_report(document, &workflow);
        AnalysisResponse {
            success: true,
            analysis: Some(self.analysis_of(&workflow, &report)),
            errors: report.all().iter().map(ErrorDto::from).collect(),
            error: None,
        }
    }

    pub fn repair_document(&self, document: &Value, options: RepairOptions) -> RepairResponse {
        let workflow = match extract::extract(document) {
            Ok(w) => w,
            Err(e) => {
                return RepairResponse {
                    error: Some(e.to_string()),
                    ..RepairResponse::default()
                };
            }
        };

        let original_report = self.full_report(document, &workflow);
        let original_analysis = self.analysis_of(&workflow, &original_report);
        let backup_data = options.backup.then(|| document.clone());

        // flat documents carry no vendor envelope to complete
        let is_flat = document.get("nodes").is_some_and(Value::is_array);
        let (mut fixed_document, mut fixes_applied) = if is_flat {
            (document.clone(), Vec::new())
        } else {
            validate::structure::fix_structure(document, None)
        };

        let (repaired, post_repair_analysis) = if options.auto_fix {
            let (repaired, workflow_fixes) = repair::repair_workflow(&workflow, &self.schema);
            fixes_applied.extend(workflow_fixes);
            extract::merge_workflow(&mut fixed_document, &repaired);
            let report = self.full_report(&fixed_document, &repaired);
            let analysis = self.analysis_of(&repaired, &report);
            (repaired, Some(analysis))
        } else {
            (workflow, None)
        };

        RepairResponse {
            success: true,
            original_analysis: Some(original_analysis),
            post_repair_analysis,
            fixes_applied,
            backup_data,
            document: Some(fixed_document),
            workflow: Some(repair::workflow_to_document(&repaired)),
            error: None,
        }
    }

    pub fn optimize_document(&self, document: &Value) -> OptimizeResponse {
        let workflow = match extract::extract(document) {
            Ok(w) => w,
            Err(e) => {
                return OptimizeResponse {
                    error: Some(e.to_string()),
                    ..OptimizeResponse::default()
                };
            }
        };
        let (optimized, optimizations_applied) = repair::optimize_workflow(&workflow);
        OptimizeResponse {
            success: true,
            optimizations_applied,
            workflow: Some(repair::workflow_to_document(&optimized)),
            error: None,
        }
    }

    /// Curated assessment of a workflow's type composition.
    pub fn assess(&self, workflow: &Workflow) -> WorkflowAssessment {
        let types = workflow.node_types();
        let edges = type_edges(workflow);
        self.knowledge.validate_workflow(&types, &edges)
    }

    /// Suggestions for what comes next in a partial node sequence.
    ///
    /// Curated knowledge always contributes; a trained analyzer adds
    /// empirical scores on top when supplied.
    pub fn suggest_nodes(
        &self,
        workflow: &Workflow,
        analyzer: Option<&WorkflowAnalyzer>,
    ) -> Suggestions {
        let types = workflow.node_types();

        let mut next_nodes = self.knowledge.suggest_next_nodes(&types);
        let mut missing_nodes: Vec<String> = Vec::new();
        let mut similar_patterns: Vec<(String, f64)> = self
            .knowledge
            .find_similar_patterns(&types, 0.5)
            .into_iter()
            .map(|(p, s)| (p.name.clone(), s))
            .collect();

        for (pattern, _) in self.knowledge.find_similar_patterns(&types, 0.5) {
            for node_type in &pattern.nodes {
                if !types.contains(node_type) && !missing_nodes.contains(node_type) {
                    missing_nodes.push(node_type.clone());
                }
            }
        }

        if let Some(analyzer) = analyzer {
            let learned = analyzer.recommendations(&types);
            for (candidate, score) in learned.next_nodes {
                match next_nodes.iter_mut().find(|(t, _)| *t == candidate) {
                    Some(entry) => entry.1 += score,
                    None => next_nodes.push((candidate, score)),
                }
            }
            for candidate in learned.missing_nodes {
                if !missing_nodes.contains(&candidate) {
                    missing_nodes.push(candidate);
                }
            }
            similar_patterns.extend(learned.similar_patterns);
        }

        next_nodes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        similar_patterns
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Suggestions {
            next_nodes,
            missing_nodes,
            property_suggestions: self.knowledge.suggest_property_values(&workflow.nodes),
            similar_patterns,
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Structural checks on the raw document plus semantic checks on the
    /// extracted workflow. Flat `{nodes, connections}` documents have no
    /// vendor envelope to check.
    fn full_report(&self, document: &Value, workflow: &Workflow) -> ErrorReport {
        let mut report = validate::validate_workflow(workflow, &self.schema);
        let is_flat = document.get("nodes").is_some_and(Value::is_array);
        if !is_flat {
            report.extend(validate::structure::validate_structure(document));
        }
        report
    }

    fn analysis_of(&self, workflow: &Workflow, report: &ErrorReport) -> Analysis {
        Analysis {
            node_count: workflow.nodes.len(),
            connection_count: workflow.connections.len(),
            errors: report.summary(),
            can_auto_fix: report.all().iter().any(|e| e.fix.is_fixable()),
            health_score: repair::health_score(report),
        }
    }
}

/// Connections expressed as (from type, to type) pairs.
fn type_edges(workflow: &Workflow) -> Vec<(String, String)> {
    workflow
        .connections
        .iter()
        .filter_map(|c| {
            let from = workflow.node(c.from_node)?;
            let to = workflow.node(c.to_node)?;
            Some((from.node_type.clone(), to.node_type.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, Node, PropValue};
    use serde_json::json;

    fn simple_workflow() -> Workflow {
        Workflow {
            nodes: vec![
                Node::new(1, "Mountain").with_property("Scale", PropValue::Float(20.0)),
                Node::new(2, "Export"),
            ],
            connections: vec![Connection::new(1, 2)],
        }
    }

    #[test]
    fn out_of_range_is_fixed_and_revalidated() {
        let engine = Engine::new();
        let outcome = engine.validate_and_fix(&simple_workflow(), false);
        assert!(outcome.fixed);
        assert!(outcome.valid);
        let scale = outcome.workflow.nodes[0].properties["Scale"]
            .as_f64()
            .unwrap();
        assert_eq!(scale, 5.0);
    }

    #[test]
    fn strict_mode_fails_on_warnings() {
        let engine = Engine::new();
        // missing output node is a warning, not an error
        let workflow = Workflow {
            nodes: vec![Node::new(1, "Mountain")],
            connections: vec![],
        };
        assert!(engine.validate_and_fix(&workflow, false).valid);
        assert!(!engine.validate_and_fix(&workflow, true).valid);
    }

    #[test]
    fn malformed_document_reports_failure() {
        let engine = Engine::new();
        let response = engine.analyze_document(&json!("not an object"));
        assert!(!response.success);
        assert!(response.error.is_some());
        assert!(response.analysis.is_none());
    }

    #[test]
    fn repair_backup_carries_original() {
        let engine = Engine::new();
        let document = json!({"nodes": [{"id": 1, "type": "Mountain"}]});
        let response = engine.repair_document(
            &document,
            RepairOptions {
                auto_fix: true,
                backup: true,
            },
        );
        assert!(response.success);
        assert_eq!(response.backup_data, Some(document));
    }
}
