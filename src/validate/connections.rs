//! Connection-integrity checks: dangling references, self-loops, orphans.

use std::collections::HashSet;

use crate::error::{Category, FixKind, WorkflowError};
use crate::graph::TerrainGraph;
use crate::model::Workflow;
use crate::schema;

/// Run all connection checks. Returns all errors found.
pub fn check_connections(workflow: &Workflow, graph: &TerrainGraph) -> Vec<WorkflowError> {
    let mut errors = Vec::new();

    // id-set membership keeps the dangling check linear in connection count
    let node_ids: HashSet<u64> = workflow.nodes.iter().map(|n| n.id).collect();

    for conn in &workflow.connections {
        if conn.from_node == conn.to_node {
            errors.push(
                WorkflowError::error(
                    Category::Connection,
                    format!("Self-loop on node {}", conn.from_node),
                )
                .at_node(conn.from_node)
                .fixable_by(FixKind::Remove),
            );
            continue;
        }
        for endpoint in [conn.from_node, conn.to_node] {
            if !node_ids.contains(&endpoint) {
                errors.push(
                    WorkflowError::critical(
                        Category::Connection,
                        format!(
                            "Connection {} -> {} references missing node {}",
                            conn.from_node, conn.to_node, endpoint
                        ),
                    )
                    .at_node(endpoint)
                    .fixable_by(FixKind::Remove),
                );
            }
        }
    }

    for node in &workflow.nodes {
        if graph.is_orphan(node.id) && !schema::is_output_type(&node.node_type) {
            errors.push(
                WorkflowError::warning(
                    Category::Connection,
                    format!("Node '{}' ({}) has no connections", node.label(), node.id),
                )
                .at_node(node.id)
                .with_suggestion("Connect it to the workflow or remove it".to_string()),
            );
        }
    }

    errors
}
