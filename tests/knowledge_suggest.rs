//! Integration tests for knowledge-graph queries.

use gaea2_validate::knowledge::{KnowledgeGraph, RelationKind};
use gaea2_validate::model::{Node, PropValue};

#[test]
fn identical_type_set_ranks_first_with_similarity_one() {
    let kg = KnowledgeGraph::curated();
    let types: Vec<String> = ["Mountain", "Erosion2", "SatMap", "Export"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let matches = kg.find_similar_patterns(&types, 0.1);
    assert!(!matches.is_empty());
    assert_eq!(matches[0].1, 1.0);
    assert_eq!(matches[0].0.name, "basic_terrain");
}

#[test]
fn similarity_ranking_is_descending() {
    let kg = KnowledgeGraph::curated();
    let types: Vec<String> = ["Mountain", "Erosion2"].iter().map(|s| s.to_string()).collect();
    let matches = kg.find_similar_patterns(&types, 0.0);
    for pair in matches.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
}

#[test]
fn conflicting_erosion_generations_are_issues() {
    let kg = KnowledgeGraph::curated();
    let types: Vec<String> = ["Mountain", "Erosion", "Erosion2"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let edges = vec![
        ("Mountain".to_string(), "Erosion".to_string()),
        ("Erosion".to_string(), "Erosion2".to_string()),
    ];
    let assessment = kg.validate_workflow(&types, &edges);
    assert!(!assessment.valid);
    assert!(
        assessment
            .issues
            .iter()
            .any(|i| i.contains("Erosion") && i.contains("Erosion2"))
    );
}

#[test]
fn unmet_requirement_is_a_warning() {
    let kg = KnowledgeGraph::curated();
    let types: Vec<String> = ["Mountain", "Rivers"].iter().map(|s| s.to_string()).collect();
    let assessment = kg.validate_workflow(&types, &[]);
    assert!(assessment.valid, "requirements must not invalidate");
    assert!(!assessment.warnings.is_empty());
}

#[test]
fn relationship_lookup_honors_the_wildcard() {
    let kg = KnowledgeGraph::curated();
    // Any -> Export applies to every source type
    let rels = kg.relationships_for("Thermal", Some(RelationKind::Precedes));
    assert!(rels.iter().any(|r| r.to.as_named() == Some("Export")));
}

#[test]
fn proportional_constraint_scales_target_value() {
    let kg = KnowledgeGraph::curated();
    let nodes = vec![
        Node::new(1, "Mountain").with_property("Scale", PropValue::Float(2.0)),
        Node::new(2, "Erosion2"),
    ];
    let suggestions = kg.suggest_property_values(&nodes);
    let duration = suggestions
        .iter()
        .find(|s| s.node_type == "Erosion2" && s.property == "Duration")
        .expect("Duration suggestion");
    assert_eq!(duration.suggested_value, serde_json::json!(0.1));
}

#[test]
fn integer_properties_suggest_whole_numbers() {
    let kg = KnowledgeGraph::curated();
    let nodes = vec![
        Node::new(1, "Erosion2").with_property("Duration", PropValue::Float(0.07)),
        Node::new(2, "Rivers"),
    ];
    let suggestions = kg.suggest_property_values(&nodes);
    let headwaters = suggestions
        .iter()
        .find(|s| s.node_type == "Rivers" && s.property == "Headwaters")
        .expect("Headwaters suggestion");
    assert!(headwaters.suggested_value.is_i64() || headwaters.suggested_value.is_u64());
}
