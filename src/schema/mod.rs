//! Schema registry: valid node types and per-type property definitions.
//!
//! Pure lookups backed by tables loaded once. The registry is an explicit
//! object handed to validators, never a module-level singleton; hosts decide
//! its lifetime and may share one instance across threads (read-only after
//! construction).

pub mod data;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::model::PropValue;

// =============================================================================
// PROPERTY DEFINITIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    Int,
    Float,
    Bool,
    Enum,
    Float2,
    String,
    /// Forward-compatibility escape hatch: a snapshot written by a newer
    /// schema may declare kinds this build does not know. Values of such
    /// properties pass validation untouched.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(rename = "type")]
    pub kind: PropType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PropValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

// =============================================================================
// CATEGORIES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Primitive,
    Terrain,
    Modify,
    Surface,
    Simulate,
    Derive,
    Colorize,
    Output,
    Utility,
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeCategory::Primitive => "primitive",
            NodeCategory::Terrain => "terrain",
            NodeCategory::Modify => "modify",
            NodeCategory::Surface => "surface",
            NodeCategory::Simulate => "simulate",
            NodeCategory::Derive => "derive",
            NodeCategory::Colorize => "colorize",
            NodeCategory::Output => "output",
            NodeCategory::Utility => "utility",
        };
        write!(f, "{}", s)
    }
}

/// Category of a known node type.
pub fn category_of(node_type: &str) -> Option<NodeCategory> {
    for (category, types) in data::category_tables() {
        if types.contains(&node_type) {
            return Some(category);
        }
    }
    None
}

/// Simulate-class node that dominates build time.
pub fn is_heavy_type(node_type: &str) -> bool {
    data::HEAVY_TYPES.contains(&node_type)
}

/// Member of the erosion family, for chain tracing.
pub fn is_erosion_type(node_type: &str) -> bool {
    data::EROSION_TYPES.contains(&node_type)
}

/// Output-class nodes are legitimately terminal: exempt from orphan warnings.
pub fn is_output_type(node_type: &str) -> bool {
    category_of(node_type) == Some(NodeCategory::Output)
}

pub fn is_colorize_type(node_type: &str) -> bool {
    category_of(node_type) == Some(NodeCategory::Colorize)
}

/// Protected from orphan removal during repair: terrain generators and
/// output-class nodes survive even with no connections.
pub fn is_protected_type(node_type: &str) -> bool {
    matches!(
        category_of(node_type),
        Some(NodeCategory::Primitive | NodeCategory::Terrain | NodeCategory::Output)
    )
}

// =============================================================================
// SCHEMA
// =============================================================================

#[derive(Debug, Clone)]
pub struct Schema {
    version: String,
    valid_types: HashSet<String>,
    node_properties: BTreeMap<String, BTreeMap<String, PropertyDefinition>>,
    common_properties: BTreeMap<String, PropertyDefinition>,
}

/// Snapshot wire format: one JSON document that fully describes the schema,
/// loadable independent of the code that generated it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaSnapshot {
    version: String,
    valid_node_types: Vec<String>,
    node_properties: BTreeMap<String, BTreeMap<String, PropertyDefinition>>,
    common_properties: BTreeMap<String, PropertyDefinition>,
}

impl Schema {
    /// The embedded schema from `schema::data`.
    pub fn builtin() -> Self {
        let mut valid_types = HashSet::new();
        for (_, types) in data::category_tables() {
            valid_types.extend(types.iter().map(|t| t.to_string()));
        }
        Schema {
            version: data::SCHEMA_VERSION.to_string(),
            valid_types,
            node_properties: data::node_property_tables(),
            common_properties: data::common_property_table(),
        }
    }

    pub fn from_snapshot_json(json: &str) -> Result<Self, DocumentError> {
        let snapshot: SchemaSnapshot = serde_json::from_str(json)?;
        Ok(Schema {
            version: snapshot.version,
            valid_types: snapshot.valid_node_types.into_iter().collect(),
            node_properties: snapshot.node_properties,
            common_properties: snapshot.common_properties,
        })
    }

    pub fn to_snapshot_json(&self) -> String {
        let mut valid_node_types: Vec<String> = self.valid_types.iter().cloned().collect();
        valid_node_types.sort();
        let snapshot = SchemaSnapshot {
            version: self.version.clone(),
            valid_node_types,
            node_properties: self.node_properties.clone(),
            common_properties: self.common_properties.clone(),
        };
        serde_json::to_string_pretty(&snapshot).unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_valid_node_type(&self, node_type: &str) -> bool {
        self.valid_types.contains(node_type)
    }

    pub fn valid_type_count(&self) -> usize {
        self.valid_types.len()
    }

    /// Node-specific property table if present, else the common fallback.
    /// Never fails.
    pub fn property_definitions(&self, node_type: &str) -> &BTreeMap<String, PropertyDefinition> {
        self.node_properties
            .get(node_type)
            .unwrap_or(&self.common_properties)
    }

    /// Node-specific table only, without the common fallback. Used by
    /// default-fill, which must not seed fallback properties onto every node.
    pub fn node_specific_definitions(
        &self,
        node_type: &str,
    ) -> Option<&BTreeMap<String, PropertyDefinition>> {
        self.node_properties.get(node_type)
    }

    /// Definition for one property: node-specific first, common second.
    pub fn definition(&self, node_type: &str, property: &str) -> Option<&PropertyDefinition> {
        self.node_properties
            .get(node_type)
            .and_then(|t| t.get(property))
            .or_else(|| self.common_properties.get(property))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_knows_mountain() {
        let schema = Schema::builtin();
        assert!(schema.is_valid_node_type("Mountain"));
        assert!(!schema.is_valid_node_type("ThisNodeDoesNotExist"));
    }

    #[test]
    fn category_tables_cover_property_tables() {
        let schema = Schema::builtin();
        for node_type in data::node_property_tables().keys() {
            assert!(
                schema.is_valid_node_type(node_type),
                "property table entry '{}' missing from category tables",
                node_type
            );
            assert!(
                category_of(node_type).is_some(),
                "no category for '{}'",
                node_type
            );
        }
    }

    #[test]
    fn snapshot_round_trip() {
        let schema = Schema::builtin();
        let json = schema.to_snapshot_json();
        let loaded = Schema::from_snapshot_json(&json).unwrap();
        assert_eq!(loaded.valid_type_count(), schema.valid_type_count());
        assert_eq!(
            loaded.definition("Mountain", "Scale"),
            schema.definition("Mountain", "Scale")
        );
    }

    #[test]
    fn unknown_type_falls_back_to_common() {
        let schema = Schema::builtin();
        let defs = schema.property_definitions("Gate");
        assert!(defs.contains_key("Seed"));
    }
}
