//! Document envelope validation and repair.
//!
//! Operates on the outer project document only; node semantics are handled
//! elsewhere. `fix_structure` only ever adds or corrects keys, never deletes
//! existing data, and reports zero fixes when re-run on its own output.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::error::{Category, FixKind, WorkflowError};

const REQUIRED_TOP_KEYS: &[&str] = &["$id", "Assets", "Id", "Metadata"];
const REQUIRED_ASSET_KEYS: &[&str] = &["Terrain", "Automation", "BuildDefinition", "State"];
const REQUIRED_TERRAIN_KEYS: &[&str] =
    &["Id", "Nodes", "Groups", "Notes", "GraphTabs", "Width", "Height", "Ratio"];
const METADATA_DATE_KEYS: &[&str] = &["DateCreated", "DateLastBuilt", "DateLastSaved"];

/// The vendor's non-ISO date shape, e.g. `"2024-03-01 10:30:00Z"`.
const VENDOR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

// =============================================================================
// VALIDATE
// =============================================================================

pub fn validate_structure(document: &Value) -> Vec<WorkflowError> {
    let mut errors = Vec::new();

    let Some(root) = document.as_object() else {
        errors.push(WorkflowError::critical(
            Category::Structure,
            "Document root is not an object",
        ));
        return errors;
    };

    for key in REQUIRED_TOP_KEYS {
        if !root.contains_key(*key) {
            errors.push(
                WorkflowError::critical(
                    Category::Structure,
                    format!("Missing required top-level key '{}'", key),
                )
                .fixable_by(FixKind::FillDefault),
            );
        }
    }

    if let Some(metadata) = root.get("Metadata").and_then(Value::as_object) {
        check_metadata_dates(metadata, &mut errors);
    }

    if let Some(asset) = first_asset(root) {
        for key in REQUIRED_ASSET_KEYS {
            if !asset.contains_key(*key) {
                errors.push(
                    WorkflowError::error(
                        Category::Structure,
                        format!("Asset is missing required key '{}'", key),
                    )
                    .fixable_by(FixKind::FillDefault),
                );
            }
        }
        if let Some(terrain) = asset.get("Terrain").and_then(Value::as_object) {
            for key in REQUIRED_TERRAIN_KEYS {
                if !terrain.contains_key(*key) {
                    errors.push(
                        WorkflowError::error(
                            Category::Structure,
                            format!("Terrain is missing required key '{}'", key),
                        )
                        .fixable_by(FixKind::FillDefault),
                    );
                }
            }
        }
    }

    errors
}

fn check_metadata_dates(metadata: &Map<String, Value>, errors: &mut Vec<WorkflowError>) {
    for key in METADATA_DATE_KEYS {
        let Some(raw) = metadata.get(*key).and_then(Value::as_str) else {
            continue;
        };
        if !date_is_well_formed(raw) {
            errors.push(
                WorkflowError::warning(
                    Category::Structure,
                    format!("Metadata date '{}' is malformed: '{}'", key, raw),
                )
                .fixable_by(FixKind::FillDefault),
            );
        }
    }
}

/// Accepts RFC 3339 or the vendor's `"YYYY-MM-DD HH:MM:SSZ"` shape.
fn date_is_well_formed(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDateTime::parse_from_str(raw, VENDOR_DATE_FORMAT).is_ok()
}

// =============================================================================
// FIX
// =============================================================================

/// Synthesize any missing structural scaffold. Returns the corrected
/// document and one human-readable description per change.
pub fn fix_structure(document: &Value, project_name: Option<&str>) -> (Value, Vec<String>) {
    let mut fixes = Vec::new();
    let mut root = match document.as_object() {
        Some(map) => map.clone(),
        None => {
            fixes.push("Replaced non-object document root with an empty project".to_string());
            Map::new()
        }
    };

    let name = project_name.unwrap_or("Untitled");

    if !root.contains_key("$id") {
        root.insert("$id".into(), json!("1"));
        fixes.push("Added missing '$id'".to_string());
    }
    if !root.contains_key("Id") {
        root.insert("Id".into(), json!(short_uuid()));
        fixes.push("Added missing project 'Id'".to_string());
    }

    fix_metadata(&mut root, name, &mut fixes);
    fix_assets(&mut root, &mut fixes);

    (Value::Object(root), fixes)
}

fn fix_metadata(root: &mut Map<String, Value>, name: &str, fixes: &mut Vec<String>) {
    let metadata = root
        .entry("Metadata".to_string())
        .or_insert_with(|| {
            fixes.push("Added missing 'Metadata' block".to_string());
            json!({})
        });
    let Some(metadata) = metadata.as_object_mut() else {
        return;
    };

    if !metadata.contains_key("Name") {
        metadata.insert("Name".into(), json!(name));
        fixes.push(format!("Set metadata name to '{}'", name));
    }
    if !metadata.contains_key("Version") {
        metadata.insert("Version".into(), json!("2.1.2.0"));
        fixes.push("Set metadata version to '2.1.2.0'".to_string());
    }
    for key in METADATA_DATE_KEYS {
        let needs_fill = match metadata.get(*key).and_then(Value::as_str) {
            Some(raw) => !date_is_well_formed(raw),
            None => true,
        };
        if needs_fill {
            metadata.insert((*key).into(), json!(now_vendor_format()));
            fixes.push(format!("Set metadata date '{}'", key));
        }
    }
}

fn fix_assets(root: &mut Map<String, Value>, fixes: &mut Vec<String>) {
    let assets = root.entry("Assets".to_string()).or_insert_with(|| {
        fixes.push("Added missing 'Assets' block".to_string());
        json!({ "$id": "2", "$values": [] })
    });

    let Some(values) = assets
        .as_object_mut()
        .and_then(|a| a.get_mut("$values"))
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    if values.is_empty() {
        values.push(json!({}));
        fixes.push("Added empty asset entry".to_string());
    }

    let Some(asset) = values[0].as_object_mut() else {
        return;
    };

    if !asset.contains_key("Terrain") {
        asset.insert("Terrain".into(), default_terrain());
        fixes.push("Added default 'Terrain' block".to_string());
    } else if let Some(terrain) = asset.get_mut("Terrain").and_then(Value::as_object_mut) {
        fill_terrain_keys(terrain, fixes);
    }

    if !asset.contains_key("Automation") {
        asset.insert(
            "Automation".into(),
            json!({ "Bindings": { "$values": [] }, "Variables": {} }),
        );
        fixes.push("Added default 'Automation' block".to_string());
    }
    if !asset.contains_key("BuildDefinition") {
        asset.insert("BuildDefinition".into(), default_build_definition());
        fixes.push("Added default 'BuildDefinition' block".to_string());
    }
    if !asset.contains_key("State") {
        asset.insert("State".into(), json!({ "BakeResolution": 2048 }));
        fixes.push("Added default 'State' block".to_string());
    }
}

fn fill_terrain_keys(terrain: &mut Map<String, Value>, fixes: &mut Vec<String>) {
    let defaults = default_terrain();
    let Some(defaults) = defaults.as_object() else {
        return;
    };
    for key in REQUIRED_TERRAIN_KEYS {
        let Some(default) = defaults.get(*key) else {
            continue;
        };
        if !terrain.contains_key(*key) {
            terrain.insert((*key).into(), default.clone());
            fixes.push(format!("Added default terrain key '{}'", key));
        }
    }
}

// =============================================================================
// DEFAULT SCAFFOLD
// =============================================================================

fn default_terrain() -> Value {
    json!({
        "Id": short_uuid(),
        "Nodes": { "$id": "10" },
        "Groups": { "$id": "11" },
        "Notes": { "$id": "12" },
        "GraphTabs": {
            "$values": [
                { "Name": "Graph 1", "Color": "Brass", "ZoomFactor": 0.5 }
            ]
        },
        "Width": 5000.0,
        "Height": 2500.0,
        "Ratio": 0.5,
    })
}

fn default_build_definition() -> Value {
    json!({
        "Destination": "<Builds>\\[Filename]\\[+++]",
        "Resolution": 2048,
        "BakeResolution": 2048,
        "TileResolution": 1024,
        "EdgeBlending": 0.25,
        "OrganizeFiles": "NodeSubFolder",
    })
}

fn short_uuid() -> String {
    Uuid::new_v4().to_string()
}

fn now_vendor_format() -> String {
    Utc::now().format(VENDOR_DATE_FORMAT).to_string()
}

// =============================================================================
// SHARED LOOKUPS
// =============================================================================

/// First entry of the `Assets.$values` collection, if any.
pub fn first_asset(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get("Assets")?
        .get("$values")?
        .as_array()?
        .first()?
        .as_object()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_date_formats() {
        assert!(date_is_well_formed("2024-03-01T10:30:00+00:00"));
        assert!(date_is_well_formed("2024-03-01 10:30:00Z"));
        assert!(!date_is_well_formed("March 1st, 2024"));
    }

    #[test]
    fn fix_is_idempotent() {
        let (fixed, first) = fix_structure(&json!({}), Some("Test"));
        assert!(!first.is_empty());
        let (refixed, second) = fix_structure(&fixed, Some("Test"));
        assert!(second.is_empty(), "second pass applied: {:?}", second);
        assert_eq!(fixed, refixed);
    }

    #[test]
    fn fixed_document_validates() {
        let (fixed, _) = fix_structure(&json!({}), None);
        let errors = validate_structure(&fixed);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }
}
