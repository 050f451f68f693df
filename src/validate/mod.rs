//! Workflow validation phase.
//!
//! Expected domain issues never raise; they become entries in the returned
//! `ErrorReport`. Severity decides whether a finding blocks `valid=true`.

pub mod connections;
pub mod fix;
pub mod performance;
pub mod property;
pub mod structure;

use crate::error::{Category, ErrorReport, FixKind, WorkflowError};
use crate::graph::TerrainGraph;
use crate::model::Workflow;
use crate::schema::{self, Schema};

/// Validate the entire workflow: node types, properties, connections,
/// performance, best practices. Returns all findings.
pub fn validate_workflow(workflow: &Workflow, schema: &Schema) -> ErrorReport {
    let graph = TerrainGraph::build(workflow);
    let mut report = ErrorReport::new();

    for node in &workflow.nodes {
        if !schema.is_valid_node_type(&node.node_type) {
            report.add(
                WorkflowError::critical(
                    Category::Validation,
                    format!("Unknown node type '{}'", node.node_type),
                )
                .at_node(node.id)
                .with_suggestion("Check the node type against the schema"),
            );
            continue;
        }
        check_node_properties(node, schema, &mut report);
    }

    report.extend(connections::check_connections(workflow, &graph));
    report.extend(performance::check_performance(workflow, &graph));
    report.extend(check_best_practices(workflow));

    report
}

fn check_node_properties(node: &crate::model::Node, schema: &Schema, report: &mut ErrorReport) {
    for (name, value) in &node.properties {
        let check = property::check_property(schema, &node.node_type, name, value);
        if !check.valid {
            let def = schema.definition(&node.node_type, name);
            // clamping only works on numeric range violations; everything
            // else (enum, kind mismatch) has no safe automatic fix
            let fixable = def.and_then(|d| d.range).is_some() && value.is_numeric();
            report.add(
                WorkflowError::error(
                    Category::Property,
                    check.message.unwrap_or_else(|| {
                        format!("Invalid value for '{}' on '{}'", name, node.node_type)
                    }),
                )
                .at_node(node.id)
                .on_property(name.clone())
                .fixable_by(if fixable { FixKind::Clamp } else { FixKind::None }),
            );
        } else if let Some(message) = check.message {
            let severity = if check.coercion == Some(property::Coercion::Rounded) {
                crate::error::Severity::Warning
            } else {
                crate::error::Severity::Info
            };
            report.add(
                WorkflowError::new(severity, Category::Property, message)
                    .at_node(node.id)
                    .on_property(name.clone()),
            );
        }
    }
}

/// Advisory-only checks: not defects, just habits of healthy workflows.
fn check_best_practices(workflow: &Workflow) -> Vec<WorkflowError> {
    let mut errors = Vec::new();

    let has_colorize = workflow
        .nodes
        .iter()
        .any(|n| schema::is_colorize_type(&n.node_type));
    if !workflow.nodes.is_empty() && !has_colorize {
        errors.push(
            WorkflowError::info(Category::Validation, "Workflow has no colorization node")
                .with_suggestion("Add a SatMap or CLUTer node for texture output"),
        );
    }

    let has_output = workflow
        .nodes
        .iter()
        .any(|n| schema::is_output_type(&n.node_type));
    if !workflow.nodes.is_empty() && !has_output {
        errors.push(
            WorkflowError::warning(Category::Validation, "Workflow has no export or output node")
                .with_suggestion("Add an Export node so builds produce files"),
        );
    }

    errors
}
