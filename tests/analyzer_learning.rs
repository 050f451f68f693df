//! Integration tests for corpus analysis and persistence.

mod helpers;

use gaea2_validate::analyzer::WorkflowAnalyzer;
use std::fs;

#[test]
fn directory_scan_learns_from_projects() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("alpine.terrain"),
        include_str!("fixtures/terrain_project.json"),
    )
    .unwrap();
    fs::write(
        dir.path().join("flat.json"),
        include_str!("fixtures/flat_workflow.json"),
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a project").unwrap();

    let mut analyzer = WorkflowAnalyzer::new();
    let stats = analyzer.analyze_directory(dir.path()).unwrap();

    assert_eq!(stats.projects.len(), 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(analyzer.projects_analyzed, 2);
    assert_eq!(analyzer.node_frequency("Mountain"), 2);
}

#[test]
fn unreadable_files_are_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
    fs::write(
        dir.path().join("good.json"),
        include_str!("fixtures/flat_workflow.json"),
    )
    .unwrap();

    let mut analyzer = WorkflowAnalyzer::new();
    let stats = analyzer.analyze_directory(dir.path()).unwrap();
    assert_eq!(stats.projects.len(), 1);
    assert_eq!(stats.failed, 1);
}

#[test]
fn snapshot_round_trip_preserves_state() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("analyzer.json");

    let mut analyzer = WorkflowAnalyzer::new();
    analyzer.record_workflow(&helpers::terrain_pipeline());
    analyzer.record_workflow(&helpers::terrain_pipeline());
    analyzer.save(&snapshot).unwrap();

    let restored = WorkflowAnalyzer::load(&snapshot).unwrap();
    assert_eq!(restored.projects_analyzed, 2);
    assert_eq!(restored.node_frequency("Mountain"), 2);
    assert_eq!(restored.patterns().len(), analyzer.patterns().len());
}

#[test]
fn recommendations_reflect_observed_corpus() {
    let mut analyzer = WorkflowAnalyzer::new();
    for _ in 0..3 {
        analyzer.record_workflow(&helpers::chain(&["Mountain", "Erosion2", "Export"]));
    }
    analyzer.record_workflow(&helpers::chain(&["Mountain", "Blur", "Export"]));

    let rec = analyzer.recommendations(&["Mountain".to_string()]);
    assert_eq!(rec.next_nodes[0].0, "Erosion2");
    assert!(rec.next_nodes[0].1 > rec.next_nodes[1].1);
}

#[test]
fn missing_analyzer_snapshot_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let result = WorkflowAnalyzer::load(&missing);
    assert!(matches!(
        result,
        Err(gaea2_validate::error::DocumentError::Io { .. })
    ));
}
