//! Diagnostic and error types used across all validation phases.
//!
//! Expected domain issues (bad property value, unknown node type, dangling
//! connection) are *data*: `WorkflowError` values collected into an
//! `ErrorReport`. Only structural impossibility (a document that is not even
//! an object) is a Rust error, `DocumentError`, converted to a failed
//! response at the API boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// SEVERITY × CATEGORY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Validation,
    Connection,
    Property,
    Structure,
    Compatibility,
    Performance,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Validation => write!(f, "VALIDATION"),
            Category::Connection => write!(f, "CONNECTION"),
            Category::Property => write!(f, "PROPERTY"),
            Category::Structure => write!(f, "STRUCTURE"),
            Category::Compatibility => write!(f, "COMPATIBILITY"),
            Category::Performance => write!(f, "PERFORMANCE"),
        }
    }
}

/// What the auto-fixer can actually do about an error.
///
/// A capability, not a boolean: enum violations, for example, have no safe
/// automatic correction and are tagged `None` even though they are ERRORs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// Clamp a numeric value to the nearest declared bound.
    Clamp,
    /// Remove the offending connection or node.
    Remove,
    /// Fill a missing property from its schema default.
    FillDefault,
    /// No automatic fix exists.
    #[default]
    None,
}

impl FixKind {
    pub fn is_fixable(self) -> bool {
        self != FixKind::None
    }
}

// =============================================================================
// WORKFLOW ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowError {
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub node_id: Option<u64>,
    pub property: Option<String>,
    pub suggestion: Option<String>,
    pub fix: FixKind,
}

impl WorkflowError {
    pub fn new(severity: Severity, category: Category, message: impl Into<String>) -> Self {
        WorkflowError {
            message: message.into(),
            severity,
            category,
            node_id: None,
            property: None,
            suggestion: None,
            fix: FixKind::None,
        }
    }

    pub fn critical(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, category, message)
    }

    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    pub fn warning(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    pub fn info(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    pub fn at_node(mut self, node_id: u64) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn on_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn fixable_by(mut self, fix: FixKind) -> Self {
        self.fix = fix;
        self
    }

    /// WARNING and INFO never block `valid=true`.
    pub fn blocks_validity(&self) -> bool {
        matches!(self.severity, Severity::Critical | Severity::Error)
    }
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.severity, self.category, self.message)?;
        if let Some(id) = self.node_id {
            write!(f, " (node {})", id)?;
        }
        if let Some(prop) = &self.property {
            write!(f, " (property '{}')", prop)?;
        }
        Ok(())
    }
}

// =============================================================================
// WIRE DTO
// =============================================================================

/// JSON shape handed to callers: the in-memory error with fixability
/// flattened to a boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub node_id: Option<u64>,
    pub property_name: Option<String>,
    pub suggestion: Option<String>,
    pub auto_fixable: bool,
}

impl From<&WorkflowError> for ErrorDto {
    fn from(e: &WorkflowError) -> Self {
        ErrorDto {
            message: e.message.clone(),
            severity: e.severity,
            category: e.category,
            node_id: e.node_id,
            property_name: e.property.clone(),
            suggestion: e.suggestion.clone(),
            auto_fixable: e.fix.is_fixable(),
        }
    }
}

// =============================================================================
// ERROR REPORT
// =============================================================================

/// Per-run error collector. Created fresh for each validation call.
#[derive(Debug, Clone, Default)]
pub struct ErrorReport {
    errors: Vec<WorkflowError>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: WorkflowError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = WorkflowError>) {
        self.errors.extend(errors);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn all(&self) -> &[WorkflowError] {
        &self.errors
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&WorkflowError> {
        self.errors.iter().filter(|e| e.severity == severity).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<&WorkflowError> {
        self.errors.iter().filter(|e| e.category == category).collect()
    }

    pub fn for_node(&self, node_id: u64) -> Vec<&WorkflowError> {
        self.errors.iter().filter(|e| e.node_id == Some(node_id)).collect()
    }

    pub fn has_critical(&self) -> bool {
        self.errors.iter().any(|e| e.severity == Severity::Critical)
    }

    pub fn blocks_validity(&self) -> bool {
        self.errors.iter().any(WorkflowError::blocks_validity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    pub fn summary(&self) -> ErrorSummary {
        let mut by_severity = BTreeMap::new();
        let mut by_category = BTreeMap::new();
        let mut auto_fixable = 0usize;
        for e in &self.errors {
            *by_severity.entry(e.severity.to_string()).or_insert(0usize) += 1;
            *by_category.entry(e.category.to_string()).or_insert(0usize) += 1;
            if e.fix.is_fixable() {
                auto_fixable += 1;
            }
        }
        ErrorSummary {
            total: self.errors.len(),
            by_severity,
            by_category,
            auto_fixable,
            has_critical: self.has_critical(),
        }
    }
}

impl IntoIterator for ErrorReport {
    type Item = WorkflowError;
    type IntoIter = std::vec::IntoIter<WorkflowError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub total: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub auto_fixable: usize,
    pub has_critical: bool,
}

// =============================================================================
// STRUCTURAL FAILURE
// =============================================================================

/// Failure to make sense of a document at all. Everything softer than this
/// becomes a `WorkflowError` in the report instead.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to parse document JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("document root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
