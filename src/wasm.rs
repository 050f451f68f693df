//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::api::{Engine, RepairOptions};
use crate::error::ErrorDto;
use crate::extract;

/// Validate a workflow document JSON.
/// Returns a JSON array of error objects.
#[wasm_bindgen]
pub fn validate_document(json: &str) -> JsValue {
    let result = validate_document_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_document_inner(json: &str) -> Vec<ErrorDto> {
    let document: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => return vec![parse_error(&e)],
    };
    let engine = Engine::new();
    let response = engine.analyze_document(&document);
    match response.error {
        Some(message) => vec![ErrorDto {
            message,
            severity: crate::error::Severity::Critical,
            category: crate::error::Category::Validation,
            node_id: None,
            property_name: None,
            suggestion: None,
            auto_fixable: false,
        }],
        None => response.errors,
    }
}

/// Analyze a workflow document: counts, error summary, health score.
/// Returns an AnalysisResponse object.
#[wasm_bindgen]
pub fn analyze_document(json: &str) -> JsValue {
    let document: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&FailureDto::from_parse(&e))
                .unwrap_or(JsValue::NULL);
        }
    };
    let response = Engine::new().analyze_document(&document);
    serde_wasm_bindgen::to_value(&response).unwrap_or(JsValue::NULL)
}

/// Repair a workflow document: structure completion, auto-fix, orphan
/// removal, default fill. Returns a RepairResponse object.
#[wasm_bindgen]
pub fn repair_document(json: &str, auto_fix: bool, backup: bool) -> JsValue {
    let document: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&FailureDto::from_parse(&e))
                .unwrap_or(JsValue::NULL);
        }
    };
    let response = Engine::new().repair_document(&document, RepairOptions { auto_fix, backup });
    serde_wasm_bindgen::to_value(&response).unwrap_or(JsValue::NULL)
}

/// Rank likely next nodes and flag pattern gaps for a partial workflow.
/// Returns a Suggestions object.
#[wasm_bindgen]
pub fn suggest_nodes(json: &str) -> JsValue {
    let document: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&FailureDto::from_parse(&e))
                .unwrap_or(JsValue::NULL);
        }
    };
    let engine = Engine::new();
    let workflow = match extract::extract(&document) {
        Ok(w) => w,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&FailureDto {
                success: false,
                error: e.to_string(),
            })
            .unwrap_or(JsValue::NULL);
        }
    };
    let suggestions = engine.suggest_nodes(&workflow, None);
    serde_wasm_bindgen::to_value(&suggestions).unwrap_or(JsValue::NULL)
}

fn parse_error(e: &serde_json::Error) -> ErrorDto {
    ErrorDto {
        message: format!("Failed to parse document JSON: {}", e),
        severity: crate::error::Severity::Critical,
        category: crate::error::Category::Validation,
        node_id: None,
        property_name: None,
        suggestion: None,
        auto_fixable: false,
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize, serde::Deserialize)]
struct FailureDto {
    success: bool,
    error: String,
}

impl FailureDto {
    fn from_parse(e: &serde_json::Error) -> Self {
        FailureDto {
            success: false,
            error: format!("Failed to parse document JSON: {}", e),
        }
    }
}
