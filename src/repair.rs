//! Repair and optimization passes over a workflow, plus the health score.
//!
//! Repair = generic auto-fix, then orphan removal, then default-fill.
//! Optimization is a separate, narrower pass for build-time wins. Every
//! change is reported as one human-readable sentence.

use serde_json::Value;

use crate::error::ErrorReport;
use crate::graph::TerrainGraph;
use crate::model::{PropValue, Workflow};
use crate::schema::{self, PropType, Schema};
use crate::validate;

/// Weighted-severity heuristic in [0, 100]. An implementation choice, not a
/// calibrated metric.
pub fn health_score(report: &ErrorReport) -> u32 {
    use crate::error::Severity;
    let penalty = 25 * report.count(Severity::Critical)
        + 10 * report.count(Severity::Error)
        + 3 * report.count(Severity::Warning);
    100u32.saturating_sub(penalty as u32)
}

// =============================================================================
// REPAIR
// =============================================================================

/// Full repair pipeline: auto-fix, drop disposable orphans, fill missing
/// defaults. Returns the repaired workflow and the fix log.
pub fn repair_workflow(workflow: &Workflow, schema: &Schema) -> (Workflow, Vec<String>) {
    let (mut repaired, mut fixes) = validate::fix::auto_fix(workflow, schema);

    remove_disposable_orphans(&mut repaired, &mut fixes);
    fill_missing_defaults(&mut repaired, schema, &mut fixes);

    (repaired, fixes)
}

/// Orphaned nodes are dropped unless their type is worth keeping around:
/// terrain generators and output nodes survive even when disconnected.
fn remove_disposable_orphans(workflow: &mut Workflow, fixes: &mut Vec<String>) {
    let graph = TerrainGraph::build(workflow);
    let doomed: Vec<u64> = workflow
        .nodes
        .iter()
        .filter(|n| graph.is_orphan(n.id) && !schema::is_protected_type(&n.node_type))
        .map(|n| n.id)
        .collect();

    workflow.nodes.retain(|n| {
        if doomed.contains(&n.id) {
            fixes.push(format!(
                "Removed orphaned node '{}' ({})",
                n.label(),
                n.id
            ));
            false
        } else {
            true
        }
    });
}

/// Any property declared with a default in the node's own schema table but
/// absent from the node gets filled in.
fn fill_missing_defaults(workflow: &mut Workflow, schema: &Schema, fixes: &mut Vec<String>) {
    for node in &mut workflow.nodes {
        let Some(defs) = schema.node_specific_definitions(&node.node_type) else {
            continue;
        };
        for (name, def) in defs {
            if node.properties.contains_key(name) {
                continue;
            }
            let Some(default) = &def.default else {
                continue;
            };
            node.properties.insert(name.clone(), default.clone());
            fixes.push(format!(
                "Set {}.{} to default {}",
                node.node_type, name, default
            ));
        }
    }
}

// =============================================================================
// OPTIMIZE
// =============================================================================

const MAX_EROSION_DURATION: f64 = 0.1;
const MAX_HEADWATERS: i64 = 200;

/// Build-time optimizations: cap the most expensive simulation settings and
/// drop pass-through Combine nodes.
pub fn optimize_workflow(workflow: &Workflow) -> (Workflow, Vec<String>) {
    let mut optimized = workflow.clone();
    let mut applied = Vec::new();

    for node in &mut optimized.nodes {
        if schema::is_erosion_type(&node.node_type) {
            if let Some(duration) = node.properties.get_mut("Duration") {
                if duration.as_f64().is_some_and(|d| d > MAX_EROSION_DURATION) {
                    applied.push(format!(
                        "Capped {}.Duration at {} for build performance",
                        node.node_type, MAX_EROSION_DURATION
                    ));
                    *duration = PropValue::Float(MAX_EROSION_DURATION);
                }
            }
        }
        if node.node_type == "Rivers" {
            if let Some(headwaters) = node.properties.get_mut("Headwaters") {
                let over = match headwaters {
                    PropValue::Int(i) => *i > MAX_HEADWATERS,
                    PropValue::Float(f) => *f > MAX_HEADWATERS as f64,
                    _ => false,
                };
                if over {
                    applied.push(format!(
                        "Capped Rivers.Headwaters at {} for build performance",
                        MAX_HEADWATERS
                    ));
                    *headwaters = PropValue::Int(MAX_HEADWATERS);
                }
            }
        }
    }

    remove_passthrough_combines(&mut optimized, &mut applied);

    (optimized, applied)
}

/// A Combine with a single input and the default 0.5 blend ratio passes its
/// input through unchanged; rewire around it and drop it.
fn remove_passthrough_combines(workflow: &mut Workflow, applied: &mut Vec<String>) {
    let redundant: Vec<u64> = workflow
        .nodes
        .iter()
        .filter(|n| n.node_type == "Combine")
        .filter(|n| {
            match n.properties.get("Ratio") {
                None => true,
                Some(v) => v.as_f64() == Some(0.5),
            }
        })
        .filter(|n| {
            workflow
                .connections
                .iter()
                .filter(|c| c.to_node == n.id)
                .count()
                == 1
        })
        .map(|n| n.id)
        .collect();

    for id in redundant {
        let Some(incoming) = workflow
            .connections
            .iter()
            .find(|c| c.to_node == id)
            .cloned()
        else {
            continue;
        };
        let outgoing: Vec<_> = workflow
            .connections
            .iter()
            .filter(|c| c.from_node == id)
            .cloned()
            .collect();

        workflow
            .connections
            .retain(|c| c.from_node != id && c.to_node != id);
        for out in outgoing {
            workflow.connections.push(crate::model::Connection {
                from_node: incoming.from_node,
                to_node: out.to_node,
                from_port: incoming.from_port.clone(),
                to_port: out.to_port,
            });
        }
        workflow.nodes.retain(|n| n.id != id);
        applied.push(format!("Removed redundant pass-through Combine node {}", id));
    }
}

// =============================================================================
// DOCUMENT ROUND-TRIP
// =============================================================================

/// Write a repaired workflow back into a document, replacing whatever node
/// substructure was there with the flat shape. Callers that need the vendor
/// nesting preserved should treat the returned value as the engine's own
/// canonical form.
pub fn workflow_to_document(workflow: &Workflow) -> Value {
    serde_json::to_value(workflow).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Category, Severity, WorkflowError};
    use crate::model::{Connection, Node};

    #[test]
    fn health_score_weights() {
        let mut report = ErrorReport::new();
        assert_eq!(health_score(&report), 100);
        report.add(WorkflowError::critical(Category::Validation, "x"));
        assert_eq!(health_score(&report), 75);
        report.add(WorkflowError::error(Category::Property, "y"));
        assert_eq!(health_score(&report), 65);
        report.add(WorkflowError::warning(Category::Connection, "z"));
        assert_eq!(health_score(&report), 62);
        for _ in 0..10 {
            report.add(WorkflowError::critical(Category::Structure, "w"));
        }
        assert_eq!(health_score(&report), 0);
        assert_eq!(report.count(Severity::Critical), 11);
    }

    #[test]
    fn orphan_removal_protects_generators_and_outputs() {
        let schema = Schema::builtin();
        let workflow = Workflow {
            nodes: vec![
                Node::new(1, "Mountain"),
                Node::new(2, "Blur"),
                Node::new(3, "Export"),
            ],
            connections: vec![],
        };
        let (repaired, fixes) = repair_workflow(&workflow, &schema);
        let kept: Vec<u64> = repaired.nodes.iter().map(|n| n.id).collect();
        assert_eq!(kept, vec![1, 3]);
        assert!(fixes.iter().any(|f| f.contains("Blur")));
    }

    #[test]
    fn passthrough_combine_is_rewired() {
        let workflow = Workflow {
            nodes: vec![
                Node::new(1, "Mountain"),
                Node::new(2, "Combine"),
                Node::new(3, "Export"),
            ],
            connections: vec![Connection::new(1, 2), Connection::new(2, 3)],
        };
        let (optimized, applied) = optimize_workflow(&workflow);
        assert_eq!(optimized.nodes.len(), 2);
        assert_eq!(optimized.connections, vec![Connection::new(1, 3)]);
        assert_eq!(applied.len(), 1);
    }

    #[test]
    fn erosion_duration_capped() {
        let workflow = Workflow {
            nodes: vec![Node::new(1, "Erosion2").with_property("Duration", PropValue::Float(5.0))],
            connections: vec![],
        };
        let (optimized, applied) = optimize_workflow(&workflow);
        assert_eq!(
            optimized.nodes[0].properties["Duration"],
            PropValue::Float(0.1)
        );
        assert_eq!(applied.len(), 1);
    }
}
