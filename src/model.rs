//! Core workflow types shared across all phases.
//!
//! These types are the serde target for the `{nodes, connections}` workflow
//! shape handed to the engine by callers, and the output of document
//! extraction. Property values stay loosely typed: the document format is
//! openly extensible, so anything we do not recognize must survive a
//! round-trip untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// WORKFLOW
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Workflow {
    pub fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_types(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.node_type.clone()).collect()
    }
}

// =============================================================================
// NODE
// =============================================================================

/// One terrain-processing unit in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display label; falls back to the type name when absent.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point2>,
}

impl Node {
    pub fn new(id: u64, node_type: impl Into<String>) -> Self {
        let node_type = node_type.into();
        Node {
            id,
            name: node_type.clone(),
            node_type,
            properties: BTreeMap::new(),
            position: None,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Display label, defaulting to the node type.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.node_type
        } else {
            &self.name
        }
    }
}

/// Canvas coordinate. Cosmetic only; never validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

// =============================================================================
// CONNECTION
// =============================================================================

/// Directed edge between two node ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: u64,
    pub to_node: u64,
    #[serde(default = "default_out_port")]
    pub from_port: String,
    #[serde(default = "default_in_port")]
    pub to_port: String,
}

fn default_out_port() -> String {
    "Out".into()
}

fn default_in_port() -> String {
    "In".into()
}

impl Connection {
    pub fn new(from_node: u64, to_node: u64) -> Self {
        Connection {
            from_node,
            to_node,
            from_port: default_out_port(),
            to_port: default_in_port(),
        }
    }

    pub fn with_ports(mut self, from_port: impl Into<String>, to_port: impl Into<String>) -> Self {
        self.from_port = from_port.into();
        self.to_port = to_port.into();
        self
    }
}

// =============================================================================
// PROPERTY VALUES
// =============================================================================

/// A property value as found in a document.
///
/// Serialized untagged; deserialization goes through `From<&Value>` so both
/// entry paths classify identically. `Vec2` is claimed only by objects whose
/// data keys are exactly `{X, Y}`; any other object shape stays in `Other`
/// and round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec2 {
        #[serde(rename = "X")]
        x: f64,
        #[serde(rename = "Y")]
        y: f64,
    },
    List(Vec<PropValue>),
    Str(String),
    Other(serde_json::Value),
}

impl PropValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Int(i) => Some(*i as f64),
            PropValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PropValue::Int(_) | PropValue::Float(_))
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::Vec2 { .. } => "float2",
            PropValue::List(_) => "list",
            PropValue::Str(_) => "string",
            PropValue::Other(_) => "json",
        }
    }
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Int(i) => write!(f, "{}", i),
            PropValue::Float(v) => write!(f, "{}", v),
            PropValue::Vec2 { x, y } => write!(f, "({}, {})", x, y),
            PropValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            PropValue::Str(s) => write!(f, "{}", s),
            PropValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(PropValue::from(&value))
    }
}

impl From<&serde_json::Value> for PropValue {
    fn from(v: &serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Bool(b) => PropValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropValue::Int(i)
                } else {
                    PropValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => PropValue::Str(s.clone()),
            Value::Object(map) => {
                let data_keys: Vec<&str> = map
                    .keys()
                    .map(String::as_str)
                    .filter(|k| !k.starts_with('$'))
                    .collect();
                // exactly {X, Y} besides bookkeeping keys, nothing dropped
                if data_keys.len() == 2 && data_keys.contains(&"X") && data_keys.contains(&"Y") {
                    if let (Some(x), Some(y)) = (
                        map.get("X").and_then(Value::as_f64),
                        map.get("Y").and_then(Value::as_f64),
                    ) {
                        return PropValue::Vec2 { x, y };
                    }
                }
                PropValue::Other(v.clone())
            }
            Value::Array(items) => PropValue::List(items.iter().map(PropValue::from).collect()),
            Value::Null => PropValue::Other(Value::Null),
        }
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn xy_object_classifies_as_vec2() {
        let value = json!({"X": 0.1, "Y": 0.2});
        assert_eq!(PropValue::from(&value), PropValue::Vec2 { x: 0.1, y: 0.2 });
        // bookkeeping keys do not disqualify the shape
        let with_id = json!({"$id": "7", "X": 0.1, "Y": 0.2});
        assert_eq!(
            PropValue::from(&with_id),
            PropValue::Vec2 { x: 0.1, y: 0.2 }
        );
    }

    #[test]
    fn wider_object_stays_intact() {
        let value = json!({"X": 0.1, "Y": 0.2, "Z": 0.3});
        assert_eq!(PropValue::from(&value), PropValue::Other(value.clone()));
    }

    #[test]
    fn unrecognized_object_survives_serde_round_trip() {
        let input = json!({
            "nodes": [{
                "id": 1,
                "type": "Mountain",
                "properties": {"Custom": {"X": 0.1, "Y": 0.2, "Z": 0.3}}
            }]
        });
        let workflow: Workflow = serde_json::from_value(input.clone()).unwrap();
        assert!(matches!(
            workflow.nodes[0].properties["Custom"],
            PropValue::Other(_)
        ));
        let output = serde_json::to_value(&workflow).unwrap();
        assert_eq!(
            output["nodes"][0]["properties"]["Custom"],
            json!({"X": 0.1, "Y": 0.2, "Z": 0.3})
        );
    }
}
