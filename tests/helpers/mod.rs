use gaea2_validate::model::{Connection, Node, PropValue, Workflow};

// =============================================================================
// Workflow builders
// =============================================================================

/// A workflow whose nodes are the given types, chained linearly in order.
/// Node ids start at 1.
pub fn chain(types: &[&str]) -> Workflow {
    let nodes: Vec<Node> = types
        .iter()
        .enumerate()
        .map(|(i, t)| Node::new(i as u64 + 1, *t))
        .collect();
    let connections = (1..nodes.len() as u64)
        .map(|i| Connection::new(i, i + 1))
        .collect();
    Workflow { nodes, connections }
}

/// Single unconnected node.
pub fn lone(node_type: &str) -> Workflow {
    Workflow {
        nodes: vec![Node::new(1, node_type)],
        connections: vec![],
    }
}

pub fn with_prop(mut workflow: Workflow, id: u64, name: &str, value: PropValue) -> Workflow {
    if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == id) {
        node.properties.insert(name.to_string(), value);
    }
    workflow
}

/// The standard pipeline used across the suite.
pub fn terrain_pipeline() -> Workflow {
    chain(&["Mountain", "Erosion2", "SatMap", "Export"])
}
