//! Curated knowledge graph: node relationships, workflow patterns, and
//! property constraints, with advisory queries over them.
//!
//! Best-effort by design. Nothing here blocks validation; it only ranks
//! suggestions.

pub mod data;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::Node;

// =============================================================================
// TYPES
// =============================================================================

/// Which node types a relationship endpoint applies to.
///
/// `Any` is a real wildcard variant, not a sentinel type name, so a node
/// type literally called "Any" could never collide with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypePattern {
    Any,
    Named(String),
}

impl TypePattern {
    pub fn matches(&self, node_type: &str) -> bool {
        match self {
            TypePattern::Any => true,
            TypePattern::Named(name) => name == node_type,
        }
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            TypePattern::Any => None,
            TypePattern::Named(name) => Some(name),
        }
    }
}

impl std::fmt::Display for TypePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypePattern::Any => f.write_str("any node"),
            TypePattern::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    Requires,
    Enhances,
    Conflicts,
    Follows,
    Precedes,
    CombinesWith,
    AlternativeTo,
    ProvidesDataFor,
    ConsumesDataFrom,
}

#[derive(Debug, Clone)]
pub struct NodeRelationship {
    pub from: TypePattern,
    pub to: TypePattern,
    pub kind: RelationKind,
    /// Confidence in [0, 1].
    pub strength: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePattern {
    pub name: String,
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
    pub tags: Vec<String>,
    pub frequency: f64,
}

impl NodePattern {
    pub fn node_set(&self) -> HashSet<&str> {
        self.nodes.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Proportional,
    InverselyProportional,
}

#[derive(Debug, Clone)]
pub struct PropertyConstraint {
    pub source_type: String,
    pub source_property: String,
    pub target_type: String,
    pub target_property: String,
    pub kind: ConstraintKind,
    pub factor: f64,
    pub reason: String,
}

/// One advisory property-value suggestion. Never applied automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySuggestion {
    pub node_id: u64,
    pub node_type: String,
    pub property: String,
    pub suggested_value: serde_json::Value,
    pub reason: String,
}

/// Assessment of a workflow against curated relationships.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowAssessment {
    pub valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

// =============================================================================
// KNOWLEDGE GRAPH
// =============================================================================

pub struct KnowledgeGraph {
    relationships: Vec<NodeRelationship>,
    patterns: Vec<NodePattern>,
    constraints: Vec<PropertyConstraint>,
}

impl KnowledgeGraph {
    pub fn curated() -> Self {
        KnowledgeGraph {
            relationships: data::relationships(),
            patterns: data::seed_patterns(),
            constraints: data::property_constraints(),
        }
    }

    pub fn patterns(&self) -> &[NodePattern] {
        &self.patterns
    }

    /// Relationships whose source applies to `node_type`, optionally
    /// filtered by kind.
    pub fn relationships_for(
        &self,
        node_type: &str,
        kind: Option<RelationKind>,
    ) -> Vec<&NodeRelationship> {
        self.relationships
            .iter()
            .filter(|r| r.from.matches(node_type))
            .filter(|r| kind.is_none_or(|k| r.kind == k))
            .collect()
    }

    /// Ranked next-node suggestions for a partial workflow.
    ///
    /// Combines PRECEDES relations and superset seed patterns. Scores take
    /// the max contribution from any one rule, never the sum, so overlapping
    /// rules cannot double-count.
    pub fn suggest_next_nodes(&self, current: &[String]) -> Vec<(String, f64)> {
        let present: HashSet<&str> = current.iter().map(String::as_str).collect();
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        let mut bump = |candidate: &str, score: f64, present: &HashSet<&str>| {
            if present.contains(candidate) {
                return;
            }
            let entry = scores.entry(candidate.to_string()).or_insert(0.0);
            if score > *entry {
                *entry = score;
            }
        };

        for node_type in present.iter().copied() {
            for r in self.relationships_for(node_type, Some(RelationKind::Precedes)) {
                if let Some(candidate) = r.to.as_named() {
                    bump(candidate, r.strength, &present);
                }
            }
        }

        for pattern in &self.patterns {
            let pattern_set = pattern.node_set();
            if !present.is_empty() && present.is_subset(&pattern_set) {
                for candidate in &pattern.nodes {
                    bump(candidate, pattern.frequency * 0.8, &present);
                }
            }
        }

        let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Assess a workflow's type composition against curated relationships.
    ///
    /// Conflicts are issues, unmet requirements are warnings, absent
    /// enhancers are opportunities. Duplicate edges are deliberately not
    /// flagged here.
    pub fn validate_workflow(
        &self,
        types: &[String],
        edges: &[(String, String)],
    ) -> WorkflowAssessment {
        let present: HashSet<&str> = types.iter().map(String::as_str).collect();
        let connected: HashSet<(&str, &str)> = edges
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let mut assessment = WorkflowAssessment::default();

        for r in &self.relationships {
            match r.kind {
                RelationKind::Conflicts => {
                    let from_present = present.iter().any(|&t| r.from.matches(t));
                    let to_present = present.iter().any(|&t| r.to.matches(t));
                    if from_present && to_present {
                        let direct = connected
                            .iter()
                            .any(|&(a, b)| r.from.matches(a) && r.to.matches(b));
                        let mut issue = format!(
                            "Conflicting nodes: {} and {} ({})",
                            r.from,
                            r.to,
                            r.description
                        );
                        if direct {
                            issue.push_str(" (directly connected)");
                        }
                        assessment.issues.push(issue);
                    }
                }
                RelationKind::Requires => {
                    let from_present = present.iter().any(|&t| r.from.matches(t));
                    let to_present = present.iter().any(|&t| r.to.matches(t));
                    if from_present && !to_present {
                        if let (Some(from), Some(to)) = (r.from.as_named(), r.to.as_named()) {
                            assessment
                                .warnings
                                .push(format!("'{}' requires '{}': {}", from, to, r.description));
                        }
                    }
                }
                RelationKind::Enhances => {
                    let enhancer_present = present.iter().any(|&t| r.from.matches(t));
                    let target_present = present.iter().any(|&t| r.to.matches(t));
                    if target_present && !enhancer_present {
                        if let (Some(from), Some(to)) = (r.from.as_named(), r.to.as_named()) {
                            assessment.suggestions.push(format!(
                                "Adding '{}' would enhance '{}': {}",
                                from, to, r.description
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        let next = self.suggest_next_nodes(types);
        if !next.is_empty() {
            let names: Vec<&str> = next.iter().take(3).map(|(t, _)| t.as_str()).collect();
            assessment
                .suggestions
                .push(format!("Consider adding: {}", names.join(", ")));
        }

        assessment.valid = assessment.issues.is_empty();
        assessment
    }

    /// Advisory property-value suggestions derived from constraints.
    pub fn suggest_property_values(&self, nodes: &[Node]) -> Vec<PropertySuggestion> {
        let mut suggestions = Vec::new();

        for c in &self.constraints {
            let Some(source_value) = nodes
                .iter()
                .filter(|n| n.node_type == c.source_type)
                .find_map(|n| n.properties.get(&c.source_property))
                .and_then(|v| v.as_f64())
            else {
                continue;
            };

            let target = match c.kind {
                ConstraintKind::Proportional => source_value * c.factor,
                ConstraintKind::InverselyProportional => {
                    if source_value == 0.0 {
                        c.factor
                    } else {
                        c.factor / source_value
                    }
                }
            };

            let suggested_value = if data::INTEGER_PROPERTIES.contains(&c.target_property.as_str())
            {
                serde_json::json!(target.round() as i64)
            } else {
                serde_json::json!(target)
            };

            for node in nodes.iter().filter(|n| n.node_type == c.target_type) {
                suggestions.push(PropertySuggestion {
                    node_id: node.id,
                    node_type: node.node_type.clone(),
                    property: c.target_property.clone(),
                    suggested_value: suggested_value.clone(),
                    reason: c.reason.clone(),
                });
            }
        }

        suggestions
    }

    /// Known patterns whose node set resembles the input, by Jaccard
    /// similarity, descending. Only matches at or above `threshold`.
    pub fn find_similar_patterns(
        &self,
        types: &[String],
        threshold: f64,
    ) -> Vec<(&NodePattern, f64)> {
        let input: HashSet<&str> = types.iter().map(String::as_str).collect();
        let mut matches: Vec<(&NodePattern, f64)> = self
            .patterns
            .iter()
            .filter_map(|p| {
                let similarity = jaccard(&input, &p.node_set());
                (similarity >= threshold).then_some((p, similarity))
            })
            .collect();
        matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        matches
    }
}

/// |intersection| / |union| of two type sets.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn identical_pattern_ranks_first_at_similarity_one() {
        let kg = KnowledgeGraph::curated();
        let input = types(&["Mountain", "Erosion2", "SatMap", "Export"]);
        let matches = kg.find_similar_patterns(&input, 0.5);
        assert_eq!(matches[0].0.name, "basic_terrain");
        assert_eq!(matches[0].1, 1.0);
    }

    #[test]
    fn mountain_suggests_erosion() {
        let kg = KnowledgeGraph::curated();
        let ranked = kg.suggest_next_nodes(&types(&["Mountain"]));
        assert_eq!(ranked[0].0, "Erosion2");
    }

    #[test]
    fn conflicting_erosions_flagged() {
        let kg = KnowledgeGraph::curated();
        let assessment = kg.validate_workflow(&types(&["Erosion", "Erosion2"]), &[]);
        assert!(!assessment.valid);
        assert!(!assessment.issues.is_empty());
    }

    #[test]
    fn unmet_requirement_is_warning_not_issue() {
        let kg = KnowledgeGraph::curated();
        let assessment = kg.validate_workflow(&types(&["Rivers"]), &[]);
        assert!(assessment.valid);
        assert!(assessment.warnings.iter().any(|w| w.contains("Erosion2")));
    }

    #[test]
    fn zero_source_value_falls_back_to_factor() {
        let kg = KnowledgeGraph::curated();
        let nodes = vec![
            Node::new(1, "Erosion2").with_property("Duration", crate::model::PropValue::Float(0.0)),
            Node::new(2, "Rivers"),
        ];
        let suggestions = kg.suggest_property_values(&nodes);
        let headwaters = suggestions
            .iter()
            .find(|s| s.property == "Headwaters")
            .unwrap();
        assert_eq!(headwaters.suggested_value, serde_json::json!(20));
    }
}
