//! Coarse performance heuristics. Advisory only; never auto-fixed.

use std::collections::HashSet;

use crate::error::{Category, WorkflowError};
use crate::graph::TerrainGraph;
use crate::model::Workflow;
use crate::schema;

/// More heavy simulate-class nodes than this draws a warning.
const MAX_HEAVY_NODES: usize = 5;

/// Contiguous erosion chains longer than this draw a warning.
const MAX_EROSION_CHAIN: usize = 3;

pub fn check_performance(workflow: &Workflow, graph: &TerrainGraph) -> Vec<WorkflowError> {
    let mut errors = Vec::new();

    let heavy: Vec<&str> = workflow
        .nodes
        .iter()
        .filter(|n| schema::is_heavy_type(&n.node_type))
        .map(|n| n.node_type.as_str())
        .collect();
    if heavy.len() > MAX_HEAVY_NODES {
        errors.push(
            WorkflowError::warning(
                Category::Performance,
                format!(
                    "{} heavy simulation nodes in one workflow (threshold {})",
                    heavy.len(),
                    MAX_HEAVY_NODES
                ),
            )
            .with_suggestion("Consider baking intermediate results or splitting the graph"),
        );
    }

    for (start, length) in erosion_chains(workflow, graph) {
        if length > MAX_EROSION_CHAIN {
            errors.push(
                WorkflowError::warning(
                    Category::Performance,
                    format!(
                        "Erosion chain of {} nodes starting at node {}",
                        length, start
                    ),
                )
                .at_node(start)
                .with_suggestion("Long erosion chains multiply build time; merge or thin them"),
            );
        }
    }

    errors
}

/// Trace contiguous chains of erosion-family nodes, following single-output
/// links. Returns (chain head, chain length); each node is counted in at most
/// one chain.
fn erosion_chains(workflow: &Workflow, graph: &TerrainGraph) -> Vec<(u64, usize)> {
    let erosion_ids: HashSet<u64> = workflow
        .nodes
        .iter()
        .filter(|n| schema::is_erosion_type(&n.node_type))
        .map(|n| n.id)
        .collect();

    let mut visited = HashSet::new();
    let mut chains = Vec::new();

    for node in &workflow.nodes {
        if !erosion_ids.contains(&node.id) || visited.contains(&node.id) {
            continue;
        }
        // only start a chain at a node whose predecessors are not erosion
        let has_erosion_upstream = graph
            .predecessors(node.id)
            .iter()
            .any(|p| erosion_ids.contains(p));
        if has_erosion_upstream {
            continue;
        }

        let mut length = 0;
        let mut current = Some(node.id);
        while let Some(id) = current {
            if !erosion_ids.contains(&id) || !visited.insert(id) {
                break;
            }
            length += 1;
            current = graph.sole_successor(id);
        }
        chains.push((node.id, length));
    }

    chains
}
