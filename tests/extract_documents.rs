//! Integration tests for vendor document extraction and write-back.

use gaea2_validate::extract;
use gaea2_validate::model::PropValue;
use serde_json::json;

#[test]
fn extracts_nodes_and_connections_from_project() {
    let json = include_str!("fixtures/terrain_project.json");
    let document: serde_json::Value = serde_json::from_str(json).unwrap();
    let workflow = extract::extract(&document).expect("Should extract");

    assert_eq!(workflow.nodes.len(), 4);
    assert_eq!(workflow.connections.len(), 3);

    let mountain = workflow.node(183).expect("node 183 present");
    assert_eq!(mountain.node_type, "Mountain");
    assert_eq!(mountain.name, "Alpine Base");
    assert_eq!(mountain.position.map(|p| p.x), Some(25000.0));
}

#[test]
fn short_type_names_are_derived_from_assembly_ids() {
    let json = include_str!("fixtures/terrain_project.json");
    let document: serde_json::Value = serde_json::from_str(json).unwrap();
    let workflow = extract::extract(&document).unwrap();

    let mut types: Vec<&str> = workflow.nodes.iter().map(|n| n.node_type.as_str()).collect();
    types.sort();
    assert_eq!(types, ["Erosion2", "Export", "Mountain", "SatMap"]);
}

#[test]
fn bookkeeping_keys_are_not_properties() {
    let json = include_str!("fixtures/terrain_project.json");
    let document: serde_json::Value = serde_json::from_str(json).unwrap();
    let workflow = extract::extract(&document).unwrap();

    let mountain = workflow.node(183).unwrap();
    assert!(mountain.properties.contains_key("Scale"));
    assert!(mountain.properties.contains_key("Style"));
    assert!(!mountain.properties.contains_key("Position"));
    assert!(!mountain.properties.contains_key("Ports"));
    assert!(!mountain.properties.contains_key("$type"));
}

#[test]
fn connection_endpoints_and_ports_survive() {
    let json = include_str!("fixtures/terrain_project.json");
    let document: serde_json::Value = serde_json::from_str(json).unwrap();
    let workflow = extract::extract(&document).unwrap();

    let into_erosion = workflow
        .connections
        .iter()
        .find(|c| c.to_node == 668)
        .expect("connection into 668");
    assert_eq!(into_erosion.from_node, 183);
    assert_eq!(into_erosion.from_port, "Out");
    assert_eq!(into_erosion.to_port, "In");
}

#[test]
fn flat_documents_pass_through() {
    let json = include_str!("fixtures/flat_workflow.json");
    let document: serde_json::Value = serde_json::from_str(json).unwrap();
    let workflow = extract::extract(&document).unwrap();

    assert_eq!(workflow.nodes.len(), 3);
    assert_eq!(workflow.connections.len(), 2);
    assert_eq!(workflow.node(1).unwrap().node_type, "Mountain");
    // ports default when the flat form omits them
    assert_eq!(workflow.connections[0].from_port, "Out");
    assert_eq!(workflow.connections[0].to_port, "In");
}

#[test]
fn non_object_root_is_an_error() {
    assert!(extract::extract(&json!([1, 2, 3])).is_err());
    assert!(extract::extract(&json!("terrain")).is_err());
    assert!(extract::extract(&json!(null)).is_err());
}

#[test]
fn object_without_terrain_degrades_to_empty() {
    let workflow = extract::extract(&json!({"Unrelated": true})).unwrap();
    assert!(workflow.nodes.is_empty());
    assert!(workflow.connections.is_empty());
}

#[test]
fn bare_terrain_shape_is_recognized() {
    let document = json!({
        "Terrain": {
            "Nodes": {
                "42": {
                    "$type": "QuadSpinner.Gaea.Nodes.Island, Gaea.Nodes",
                    "Id": 42
                }
            }
        }
    });
    let workflow = extract::extract(&document).unwrap();
    assert_eq!(workflow.nodes.len(), 1);
    assert_eq!(workflow.node(42).unwrap().node_type, "Island");
}

#[test]
fn wide_object_property_is_kept_verbatim() {
    let shape = json!({"X": 0.1, "Y": 0.2, "Z": 0.3});
    let document = json!({
        "Terrain": {
            "Nodes": {
                "7": {
                    "$type": "QuadSpinner.Gaea.Nodes.Mountain, Gaea.Nodes",
                    "Id": 7,
                    "Gradient": shape.clone()
                }
            }
        }
    });
    let workflow = extract::extract(&document).unwrap();
    assert_eq!(
        workflow.node(7).unwrap().properties["Gradient"],
        PropValue::Other(shape)
    );
}

#[test]
fn merge_writes_properties_and_drops_removed_nodes() {
    let mut document = json!({
        "Terrain": {
            "Nodes": {
                "1": {
                    "$type": "QuadSpinner.Gaea.Nodes.Mountain, Gaea.Nodes",
                    "Id": 1,
                    "Scale": 20.0
                },
                "2": {
                    "$type": "QuadSpinner.Gaea.Nodes.Blur, Gaea.Nodes",
                    "Id": 2
                }
            }
        }
    });
    let mut workflow = extract::extract(&document).unwrap();
    workflow.nodes.retain(|n| n.id != 2);
    if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == 1) {
        node.properties.insert("Scale".into(), PropValue::Float(5.0));
    }

    extract::merge_workflow(&mut document, &workflow);
    let nodes = &document["Terrain"]["Nodes"];
    assert_eq!(nodes["1"]["Scale"], json!(5.0));
    // bookkeeping keys stay untouched
    assert_eq!(
        nodes["1"]["$type"],
        json!("QuadSpinner.Gaea.Nodes.Mountain, Gaea.Nodes")
    );
    assert!(nodes.get("2").is_none());
}

#[test]
fn merge_prunes_records_of_removed_connections() {
    let mut document = json!({
        "Terrain": {
            "Nodes": {
                "1": {
                    "$type": "QuadSpinner.Gaea.Nodes.Mountain, Gaea.Nodes",
                    "Id": 1
                },
                "2": {
                    "$type": "QuadSpinner.Gaea.Nodes.Erosion2, Gaea.Nodes",
                    "Id": 2,
                    "Ports": {
                        "$values": [
                            {
                                "Name": "In",
                                "Record": {"From": 1, "To": 2, "FromPort": "Out", "ToPort": "In"}
                            },
                            {
                                "Name": "Mask",
                                "Record": {"From": 2, "To": 2, "FromPort": "Out", "ToPort": "Mask"}
                            }
                        ]
                    }
                }
            }
        }
    });
    let mut workflow = extract::extract(&document).unwrap();
    workflow.connections.retain(|c| c.from_node != c.to_node);

    extract::merge_workflow(&mut document, &workflow);
    let ports = &document["Terrain"]["Nodes"]["2"]["Ports"]["$values"];
    assert!(ports[0].get("Record").is_some());
    assert!(ports[1].get("Record").is_none());
    // the port itself survives, only the stale record goes
    assert_eq!(ports[1]["Name"], json!("Mask"));
}

#[test]
fn node_id_falls_back_to_map_key() {
    let document = json!({
        "Terrain": {
            "Nodes": {
                "77": { "$type": "QuadSpinner.Gaea.Nodes.Ridge, Gaea.Nodes" }
            }
        }
    });
    let workflow = extract::extract(&document).unwrap();
    assert_eq!(workflow.node(77).unwrap().node_type, "Ridge");
}
