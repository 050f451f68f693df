//! Document extraction: vendor project JSON → flat `Workflow`.
//!
//! The persisted format has accreted several historical nestings for the same
//! logical data. Each one gets a shape recognizer, tried in order; adding a
//! new historical shape is additive. No other module sniffs document shapes.

use log::debug;
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::model::{Connection, Node, Point2, PropValue, Workflow};

/// Keys on a node record that are bookkeeping, not terrain properties.
const SYSTEM_KEYS: &[&str] = &[
    "$id",
    "$type",
    "Id",
    "Name",
    "Position",
    "Ports",
    "Modifiers",
    "SnapIns",
    "NodeSize",
    "PortCount",
    "IsMaskable",
    "Mask",
];

/// Suffix the vendor appends to assembly-qualified type segments.
const TYPE_SUFFIX: &str = ", Gaea";

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Extract nodes and connections from a project document.
///
/// A non-object root is a hard failure; a document in which no terrain
/// substructure can be located degrades to an empty workflow.
pub fn extract(document: &Value) -> Result<Workflow, DocumentError> {
    let root = document
        .as_object()
        .ok_or_else(|| DocumentError::NotAnObject(json_kind(document)))?;

    // Already-flat `{nodes, connections}` payloads pass straight through.
    if root.get("nodes").is_some_and(Value::is_array) {
        return Ok(serde_json::from_value(document.clone())?);
    }

    let Some(terrain) = locate_terrain(root) else {
        debug!("no terrain substructure found in document, returning empty workflow");
        return Ok(Workflow::default());
    };

    Ok(extract_terrain(terrain))
}

/// Try each historical document shape in order.
fn locate_terrain(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let recognizers: [fn(&Map<String, Value>) -> Option<&Map<String, Value>>; 3] =
        [assets_values_shape, bare_terrain_shape, legacy_asset_shape];
    recognizers.iter().find_map(|recognize| recognize(root))
}

/// Current shape: `Assets.$values[*].Terrain`.
fn assets_values_shape(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get("Assets")?
        .get("$values")?
        .as_array()?
        .iter()
        .find_map(|asset| asset.get("Terrain")?.as_object())
}

/// Bare `Terrain` at the top level.
fn bare_terrain_shape(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get("Terrain")?.as_object()
}

/// Legacy single-asset mapping: `Assets.Terrain`.
fn legacy_asset_shape(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get("Assets")?.get("Terrain")?.as_object()
}

// =============================================================================
// TERRAIN → WORKFLOW
// =============================================================================

fn extract_terrain(terrain: &Map<String, Value>) -> Workflow {
    let mut workflow = Workflow::default();

    let Some(node_table) = terrain.get("Nodes") else {
        return workflow;
    };

    for (key, record) in node_records(node_table) {
        let Some(record) = record.as_object() else {
            continue;
        };
        let Some(node) = extract_node(key, record) else {
            continue;
        };
        workflow.connections.extend(extract_connections(record));
        workflow.nodes.push(node);
    }

    workflow
}

/// The node table is either a keyed object (id → record) or a `$values`
/// array. Either way, yield (key, record) pairs with bookkeeping keys
/// skipped.
fn node_records(table: &Value) -> Vec<(Option<&str>, &Value)> {
    if let Some(values) = table.get("$values").and_then(Value::as_array) {
        return values.iter().map(|v| (None, v)).collect();
    }
    match table.as_object() {
        Some(map) => map
            .iter()
            .filter(|(k, _)| !k.starts_with('$'))
            .map(|(k, v)| (Some(k.as_str()), v))
            .collect(),
        None => vec![],
    }
}

fn extract_node(key: Option<&str>, record: &Map<String, Value>) -> Option<Node> {
    let id = record
        .get("Id")
        .and_then(Value::as_u64)
        .or_else(|| key.and_then(|k| k.parse().ok()))?;

    let node_type = record
        .get("$type")
        .and_then(Value::as_str)
        .and_then(short_type_name)?;

    let name = record
        .get("Name")
        .and_then(Value::as_str)
        .unwrap_or(&node_type)
        .to_string();

    let position = record.get("Position").and_then(|p| {
        Some(Point2 {
            x: p.get("X")?.as_f64()?,
            y: p.get("Y")?.as_f64()?,
        })
    });

    let properties = record
        .iter()
        .filter(|(k, _)| !k.starts_with('$') && !SYSTEM_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), PropValue::from(v)))
        .collect();

    Some(Node {
        id,
        node_type,
        name,
        properties,
        position,
    })
}

/// Connections are stored on the destination node's port records. A record
/// with either endpoint missing is silently dropped.
fn extract_connections(record: &Map<String, Value>) -> Vec<Connection> {
    let Some(ports) = record
        .get("Ports")
        .and_then(|p| p.get("$values"))
        .and_then(Value::as_array)
    else {
        return vec![];
    };

    let mut connections = Vec::new();
    for port in ports {
        let Some(rec) = port.get("Record") else {
            continue;
        };
        let (Some(from), Some(to)) = (
            rec.get("From").and_then(Value::as_u64),
            rec.get("To").and_then(Value::as_u64),
        ) else {
            continue;
        };
        let from_port = rec
            .get("FromPort")
            .and_then(Value::as_str)
            .unwrap_or("Out")
            .to_string();
        let to_port = rec
            .get("ToPort")
            .and_then(Value::as_str)
            .or_else(|| port.get("Name").and_then(Value::as_str))
            .unwrap_or("In")
            .to_string();
        connections.push(Connection {
            from_node: from,
            to_node: to,
            from_port,
            to_port,
        });
    }
    connections
}

// =============================================================================
// WORKFLOW → DOCUMENT
// =============================================================================

/// Write a repaired workflow back into its document, in place.
///
/// Vendor documents keep their nesting: node records removed from the
/// workflow drop out of the terrain node table, surviving records get their
/// properties overwritten, and port records whose connection no longer
/// exists are cleared. Flat documents are replaced with the workflow's own
/// serialization.
pub fn merge_workflow(document: &mut Value, workflow: &Workflow) {
    if document.get("nodes").is_some_and(Value::is_array) {
        if let Ok(flat) = serde_json::to_value(workflow) {
            *document = flat;
        }
        return;
    }
    let Some(root) = document.as_object_mut() else {
        return;
    };
    let Some(terrain) = locate_terrain_mut(root) else {
        return;
    };
    let Some(table) = terrain.get_mut("Nodes") else {
        return;
    };

    if let Some(values) = table.get_mut("$values").and_then(Value::as_array_mut) {
        values.retain(|record| record_keeps(None, record, workflow));
        for record in values {
            merge_node_record(None, record, workflow);
        }
    } else if let Some(map) = table.as_object_mut() {
        map.retain(|key, record| {
            key.starts_with('$') || record_keeps(Some(key.as_str()), record, workflow)
        });
        for (key, record) in map.iter_mut().filter(|(k, _)| !k.starts_with('$')) {
            merge_node_record(Some(key.as_str()), record, workflow);
        }
    }
}

/// Mirror of `locate_terrain` over mutable borrows.
fn locate_terrain_mut(root: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
    if assets_values_shape(root).is_some() {
        return root
            .get_mut("Assets")?
            .get_mut("$values")?
            .as_array_mut()?
            .iter_mut()
            .find_map(|asset| asset.get_mut("Terrain")?.as_object_mut());
    }
    if bare_terrain_shape(root).is_some() {
        return root.get_mut("Terrain")?.as_object_mut();
    }
    if legacy_asset_shape(root).is_some() {
        return root.get_mut("Assets")?.get_mut("Terrain")?.as_object_mut();
    }
    None
}

/// A record survives when its node is still in the workflow. Records whose
/// id cannot be resolved are left alone.
fn record_keeps(key: Option<&str>, record: &Value, workflow: &Workflow) -> bool {
    match record_node_id(key, record) {
        Some(id) => workflow.node(id).is_some(),
        None => true,
    }
}

fn record_node_id(key: Option<&str>, record: &Value) -> Option<u64> {
    record
        .get("Id")
        .and_then(Value::as_u64)
        .or_else(|| key.and_then(|k| k.parse().ok()))
}

fn merge_node_record(key: Option<&str>, record: &mut Value, workflow: &Workflow) {
    let Some(id) = record_node_id(key, record) else {
        return;
    };
    let Some(node) = workflow.node(id) else {
        return;
    };
    let Some(map) = record.as_object_mut() else {
        return;
    };
    for (name, value) in &node.properties {
        if let Ok(v) = serde_json::to_value(value) {
            map.insert(name.clone(), v);
        }
    }
    prune_port_records(map, workflow);
}

/// Drop the `Record` entry from ports whose connection was removed. The
/// ports themselves stay.
fn prune_port_records(map: &mut Map<String, Value>, workflow: &Workflow) {
    let Some(ports) = map
        .get_mut("Ports")
        .and_then(|p| p.get_mut("$values"))
        .and_then(Value::as_array_mut)
    else {
        return;
    };
    for port in ports {
        let keep = port.get("Record").is_none_or(|rec| {
            let (Some(from), Some(to)) = (
                rec.get("From").and_then(Value::as_u64),
                rec.get("To").and_then(Value::as_u64),
            ) else {
                return false;
            };
            workflow
                .connections
                .iter()
                .any(|c| c.from_node == from && c.to_node == to)
        });
        if !keep {
            if let Some(p) = port.as_object_mut() {
                p.remove("Record");
            }
        }
    }
}

// =============================================================================
// VENDOR TYPE IDENTIFIERS
// =============================================================================

/// Reduce a reflection-style dotted type identifier to a short node type.
///
/// `"QuadSpinner.Gaea.Nodes.Mountain, Gaea.Nodes"` → `"Mountain"`: take the
/// second-to-last dot-separated segment and strip the assembly suffix. This
/// is the only place coupled to the vendor's identifier format.
pub fn short_type_name(type_id: &str) -> Option<String> {
    let segments: Vec<&str> = type_id.split('.').collect();
    match segments.as_slice() {
        [] => None,
        [only] => Some(only.to_string()),
        _ => {
            let segment = segments[segments.len() - 2];
            let name = segment.strip_suffix(TYPE_SUFFIX).unwrap_or(segment);
            if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_from_assembly_qualified_id() {
        assert_eq!(
            short_type_name("QuadSpinner.Gaea.Nodes.Mountain, Gaea.Nodes").as_deref(),
            Some("Mountain")
        );
    }

    #[test]
    fn short_name_from_plain_id() {
        assert_eq!(short_type_name("Mountain").as_deref(), Some("Mountain"));
    }
}
