//! Integration tests for the repair and optimization passes.

mod helpers;

use gaea2_validate::error::Severity;
use gaea2_validate::model::{Connection, Node, PropValue};
use gaea2_validate::repair;
use gaea2_validate::schema::Schema;
use gaea2_validate::validate;
use helpers::{terrain_pipeline, with_prop};

#[test]
fn auto_fix_is_idempotent() {
    let mut workflow = with_prop(terrain_pipeline(), 1, "Scale", PropValue::Float(20.0));
    workflow.connections.push(Connection::new(2, 2));
    workflow.connections.push(Connection::new(1, 999));

    let schema = Schema::builtin();
    let (fixed, first) = validate::fix::auto_fix(&workflow, &schema);
    assert!(!first.is_empty());
    let (refixed, second) = validate::fix::auto_fix(&fixed, &schema);
    assert!(second.is_empty(), "second pass applied: {:?}", second);
    assert_eq!(fixed.connections, refixed.connections);
}

#[test]
fn auto_fix_clamps_to_nearest_bound() {
    let workflow = with_prop(terrain_pipeline(), 1, "Scale", PropValue::Float(20.0));
    let (fixed, fixes) = validate::fix::auto_fix(&workflow, &Schema::builtin());
    assert_eq!(fixes.len(), 1);
    assert_eq!(
        fixed.node(1).unwrap().properties["Scale"].as_f64(),
        Some(5.0)
    );
}

#[test]
fn auto_fix_removes_bad_connections() {
    let mut workflow = terrain_pipeline();
    workflow.connections.push(Connection::new(2, 2));
    workflow.connections.push(Connection::new(1, 999));

    let (fixed, _) = validate::fix::auto_fix(&workflow, &Schema::builtin());
    assert_eq!(fixed.connections.len(), 3);
    let report = validate::validate_workflow(&fixed, &Schema::builtin());
    assert!(!report.has_critical());
}

#[test]
fn health_score_weights_by_severity() {
    let schema = Schema::builtin();

    let clean = validate::validate_workflow(&terrain_pipeline(), &schema);
    assert_eq!(repair::health_score(&clean), 100);

    // one dangling connection: a single critical costs 25
    let mut workflow = terrain_pipeline();
    workflow.connections.push(Connection::new(1, 999));
    let report = validate::validate_workflow(&workflow, &schema);
    assert_eq!(report.count(Severity::Critical), 1);
    assert_eq!(
        repair::health_score(&report),
        100 - 25
            - 10 * report.count(Severity::Error) as u32
            - 3 * report.count(Severity::Warning) as u32
    );
}

#[test]
fn health_score_floors_at_zero() {
    let schema = Schema::builtin();
    let mut workflow = terrain_pipeline();
    for i in 0..10 {
        workflow.connections.push(Connection::new(1, 1000 + i));
    }
    let report = validate::validate_workflow(&workflow, &schema);
    assert_eq!(repair::health_score(&report), 0);
}

#[test]
fn repair_drops_disposable_orphans_only() {
    let mut workflow = terrain_pipeline();
    workflow.nodes.push(Node::new(10, "Blur"));
    workflow.nodes.push(Node::new(11, "Island"));
    workflow.nodes.push(Node::new(12, "Mesher"));

    let (repaired, fixes) = repair::repair_workflow(&workflow, &Schema::builtin());
    assert!(repaired.node(10).is_none(), "modify orphan should go");
    assert!(repaired.node(11).is_some(), "terrain generator stays");
    assert!(repaired.node(12).is_some(), "output node stays");
    assert!(fixes.iter().any(|f| f.contains("orphan")));
}

#[test]
fn repair_fills_missing_schema_defaults() {
    let (repaired, fixes) = repair::repair_workflow(&terrain_pipeline(), &Schema::builtin());
    let mountain = repaired.node(1).unwrap();
    assert_eq!(
        mountain.properties.get("Height"),
        Some(&PropValue::Float(0.7))
    );
    assert!(fixes.iter().any(|f| f.contains("default")));
}

#[test]
fn optimize_caps_erosion_duration() {
    let workflow = with_prop(terrain_pipeline(), 2, "Duration", PropValue::Float(15.0));
    let (optimized, applied) = repair::optimize_workflow(&workflow);
    assert_eq!(
        optimized.node(2).unwrap().properties["Duration"].as_f64(),
        Some(0.1)
    );
    assert!(!applied.is_empty());
}

#[test]
fn optimize_rewires_passthrough_combine() {
    let workflow = gaea2_validate::model::Workflow {
        nodes: vec![
            Node::new(1, "Mountain"),
            Node::new(2, "Combine"),
            Node::new(3, "Export"),
        ],
        connections: vec![Connection::new(1, 2), Connection::new(2, 3)],
    };
    let (optimized, applied) = repair::optimize_workflow(&workflow);
    assert!(optimized.node(2).is_none());
    assert!(
        optimized
            .connections
            .iter()
            .any(|c| c.from_node == 1 && c.to_node == 3)
    );
    assert!(applied.iter().any(|f| f.contains("Combine")));
}

#[test]
fn optimize_keeps_blending_combine() {
    let mut workflow = gaea2_validate::model::Workflow {
        nodes: vec![
            Node::new(1, "Mountain"),
            Node::new(2, "Island"),
            Node::new(3, "Combine"),
            Node::new(4, "Export"),
        ],
        connections: vec![
            Connection::new(1, 3),
            Connection::new(2, 3).with_ports("Out", "Input2"),
            Connection::new(3, 4),
        ],
    };
    workflow.nodes[2] = Node::new(3, "Combine").with_property("Ratio", PropValue::Float(0.3));

    let (optimized, _) = repair::optimize_workflow(&workflow);
    assert!(optimized.node(3).is_some());
}
