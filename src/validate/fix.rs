//! Generic auto-fix pass: self-loop removal, dangling-connection removal,
//! numeric range clamping.
//!
//! Each change is logged as one human-readable sentence, suitable for direct
//! display in a repair report. Running the pass on already-fixed input
//! reports zero fixes.

use std::collections::HashSet;

use crate::model::{PropValue, Workflow};
use crate::schema::{PropType, Schema};

pub fn auto_fix(workflow: &Workflow, schema: &Schema) -> (Workflow, Vec<String>) {
    let mut fixed = workflow.clone();
    let mut fixes = Vec::new();

    let node_ids: HashSet<u64> = fixed.nodes.iter().map(|n| n.id).collect();

    fixed.connections.retain(|conn| {
        if conn.from_node == conn.to_node {
            fixes.push(format!("Removed self-loop connection on node {}", conn.from_node));
            return false;
        }
        if !node_ids.contains(&conn.from_node) || !node_ids.contains(&conn.to_node) {
            fixes.push(format!(
                "Removed connection {} -> {} referencing a missing node",
                conn.from_node, conn.to_node
            ));
            return false;
        }
        true
    });

    for node in &mut fixed.nodes {
        let label = node.label().to_string();
        let node_type = node.node_type.clone();
        for (name, value) in node.properties.iter_mut() {
            let Some(def) = schema.definition(&node_type, name) else {
                continue;
            };
            let Some([min, max]) = def.range else {
                continue;
            };
            let Some(current) = value.as_f64() else {
                continue;
            };
            if current >= min && current <= max {
                continue;
            }
            let clamped = current.clamp(min, max);
            let new_value = match def.kind {
                PropType::Int => PropValue::Int(clamped as i64),
                _ => PropValue::Float(clamped),
            };
            fixes.push(format!(
                "Fixed {}.{}: {} -> {}",
                label, name, value, new_value
            ));
            *value = new_value;
        }
    }

    (fixed, fixes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, Node};

    #[test]
    fn second_pass_is_empty() {
        let schema = Schema::builtin();
        let workflow = Workflow {
            nodes: vec![
                Node::new(1, "Mountain").with_property("Height", PropValue::Float(4.0)),
                Node::new(2, "Erosion2"),
            ],
            connections: vec![
                Connection::new(1, 2),
                Connection::new(2, 2),
                Connection::new(1, 99),
            ],
        };
        let (fixed, fixes) = auto_fix(&workflow, &schema);
        assert_eq!(fixes.len(), 3);
        assert_eq!(fixed.connections.len(), 1);

        let (_, second) = auto_fix(&fixed, &schema);
        assert!(second.is_empty(), "second pass applied: {:?}", second);
    }

    #[test]
    fn clamp_to_nearest_bound() {
        let schema = Schema::builtin();
        let workflow = Workflow {
            nodes: vec![
                Node::new(1, "Mountain").with_property("Height", PropValue::Float(-2.0)),
            ],
            connections: vec![],
        };
        let (fixed, fixes) = auto_fix(&workflow, &schema);
        assert_eq!(fixed.nodes[0].properties["Height"], PropValue::Float(0.0));
        assert!(fixes[0].contains("Mountain.Height"));
    }
}
