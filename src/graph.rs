//! petgraph-based directed graph wrapper for a terrain workflow.
//!
//! Built tolerantly: connections whose endpoints are missing from the node
//! set are skipped here and reported by the connection validator instead, so
//! degree queries stay usable on broken documents.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::Workflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLabel {
    pub from_port: String,
    pub to_port: String,
}

pub struct TerrainGraph {
    pub graph: DiGraph<u64, PortLabel>,
    pub node_indices: HashMap<u64, NodeIndex>,
}

impl TerrainGraph {
    pub fn build(workflow: &Workflow) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for node in &workflow.nodes {
            let idx = graph.add_node(node.id);
            node_indices.insert(node.id, idx);
        }

        for conn in &workflow.connections {
            let (Some(&from), Some(&to)) = (
                node_indices.get(&conn.from_node),
                node_indices.get(&conn.to_node),
            ) else {
                continue;
            };
            graph.add_edge(
                from,
                to,
                PortLabel {
                    from_port: conn.from_port.clone(),
                    to_port: conn.to_port.clone(),
                },
            );
        }

        TerrainGraph { graph, node_indices }
    }

    pub fn successors(&self, node_id: u64) -> Vec<u64> {
        let Some(&idx) = self.node_indices.get(&node_id) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect()
    }

    pub fn predecessors(&self, node_id: u64) -> Vec<u64> {
        let Some(&idx) = self.node_indices.get(&node_id) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n])
            .collect()
    }

    pub fn incoming_count(&self, node_id: u64) -> usize {
        self.predecessors(node_id).len()
    }

    pub fn outgoing_count(&self, node_id: u64) -> usize {
        self.successors(node_id).len()
    }

    /// No edges in either direction.
    pub fn is_orphan(&self, node_id: u64) -> bool {
        self.incoming_count(node_id) == 0 && self.outgoing_count(node_id) == 0
    }

    /// Nodes with no incoming edge, in insertion order.
    pub fn roots(&self) -> Vec<u64> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx])
            .collect()
    }

    /// The single successor of a node, if it has exactly one.
    pub fn sole_successor(&self, node_id: u64) -> Option<u64> {
        let succ = self.successors(node_id);
        match succ.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
