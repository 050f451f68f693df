//! Per-property validation with the coercive policy.
//!
//! Extensibility over strictness: unknown property names are accepted with an
//! advisory note, and a near-integer float is rounded rather than rejected.
//! Range violations are hard errors here; clamping is the auto-fixer's job.

use log::warn;

use crate::model::PropValue;
use crate::schema::{PropType, PropertyDefinition, Schema};

/// How a coerced value relates to the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Representation changed, value did not.
    Exact,
    /// The value itself was altered to fit the declared kind.
    Rounded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCheck {
    pub valid: bool,
    pub message: Option<String>,
    /// Present when the value was coerced to the declared kind.
    pub corrected: Option<PropValue>,
    pub coercion: Option<Coercion>,
}

impl PropertyCheck {
    fn ok() -> Self {
        PropertyCheck {
            valid: true,
            message: None,
            corrected: None,
            coercion: None,
        }
    }

    fn coerced(value: PropValue, coercion: Coercion, message: Option<String>) -> Self {
        PropertyCheck {
            valid: true,
            message,
            corrected: Some(value),
            coercion: Some(coercion),
        }
    }

    fn advisory(message: impl Into<String>) -> Self {
        PropertyCheck {
            valid: true,
            message: Some(message.into()),
            corrected: None,
            coercion: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        PropertyCheck {
            valid: false,
            message: Some(message.into()),
            corrected: None,
            coercion: None,
        }
    }

    /// The value to keep: the coercion result if any, else the original.
    pub fn resolved(&self, original: &PropValue) -> PropValue {
        self.corrected.clone().unwrap_or_else(|| original.clone())
    }
}

/// Validate one property value against the schema.
pub fn check_property(
    schema: &Schema,
    node_type: &str,
    name: &str,
    value: &PropValue,
) -> PropertyCheck {
    let Some(def) = schema.definition(node_type, name) else {
        return PropertyCheck::advisory(format!(
            "Property '{}' is not declared for '{}'; keeping value as-is",
            name, node_type
        ));
    };
    check_against(def, node_type, name, value)
}

pub fn check_against(
    def: &PropertyDefinition,
    node_type: &str,
    name: &str,
    value: &PropValue,
) -> PropertyCheck {
    match def.kind {
        PropType::Int => check_int(def, name, value),
        PropType::Float => check_float(def, name, value),
        PropType::Bool => check_bool(name, value),
        PropType::Enum => check_enum(def, name, value),
        PropType::Float2 => check_float2(name, value),
        PropType::String => check_string(value),
        PropType::Unknown => {
            warn!(
                "property '{}' on '{}' has an unrecognized schema kind, passing through",
                name, node_type
            );
            PropertyCheck::ok()
        }
    }
}

// =============================================================================
// KIND CHECKS
// =============================================================================

fn check_int(def: &PropertyDefinition, name: &str, value: &PropValue) -> PropertyCheck {
    let (int_value, coercion, note) = match value {
        PropValue::Int(i) => (*i, Coercion::Exact, None),
        PropValue::Float(f) if f.fract() == 0.0 => (
            *f as i64,
            Coercion::Exact,
            Some(format!("Coerced float {} to int for '{}'", f, name)),
        ),
        PropValue::Float(f) => (
            f.round() as i64,
            Coercion::Rounded,
            Some(format!(
                "Rounded non-integer value {} to {} for '{}'",
                f,
                f.round() as i64,
                name
            )),
        ),
        PropValue::Str(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            let Ok(parsed) = s.parse() else {
                return PropertyCheck::invalid(format!(
                    "Value '{}' for '{}' does not fit an integer",
                    s, name
                ));
            };
            (
                parsed,
                Coercion::Exact,
                Some(format!("Coerced string '{}' to int for '{}'", s, name)),
            )
        }
        other => {
            return PropertyCheck::invalid(format!(
                "Expected int for '{}', found {}",
                name,
                other.kind()
            ));
        }
    };

    if let Some([min, max]) = def.range {
        let v = int_value as f64;
        if v < min || v > max {
            return PropertyCheck::invalid(format!(
                "Value {} for '{}' is outside range [{}, {}]",
                int_value, name, min, max
            ));
        }
    }

    if matches!(value, PropValue::Int(_)) {
        PropertyCheck::ok()
    } else {
        PropertyCheck::coerced(PropValue::Int(int_value), coercion, note)
    }
}

fn check_float(def: &PropertyDefinition, name: &str, value: &PropValue) -> PropertyCheck {
    let float_value = match value {
        PropValue::Float(f) => *f,
        PropValue::Int(i) => *i as f64,
        other => {
            return PropertyCheck::invalid(format!(
                "Expected float for '{}', found {}",
                name,
                other.kind()
            ));
        }
    };

    if let Some([min, max]) = def.range {
        if float_value < min || float_value > max {
            return PropertyCheck::invalid(format!(
                "Value {} for '{}' is outside range [{}, {}]",
                float_value, name, min, max
            ));
        }
    }

    match value {
        PropValue::Float(_) => PropertyCheck::ok(),
        _ => PropertyCheck::coerced(PropValue::Float(float_value), Coercion::Exact, None),
    }
}

fn check_bool(name: &str, value: &PropValue) -> PropertyCheck {
    match value {
        PropValue::Bool(_) => PropertyCheck::ok(),
        PropValue::Int(0) => PropertyCheck::coerced(PropValue::Bool(false), Coercion::Exact, None),
        PropValue::Int(1) => PropertyCheck::coerced(PropValue::Bool(true), Coercion::Exact, None),
        PropValue::Str(s) if s == "true" || s == "True" => {
            PropertyCheck::coerced(PropValue::Bool(true), Coercion::Exact, None)
        }
        PropValue::Str(s) if s == "false" || s == "False" => {
            PropertyCheck::coerced(PropValue::Bool(false), Coercion::Exact, None)
        }
        other => PropertyCheck::invalid(format!(
            "Expected bool for '{}', found {}",
            name,
            other.kind()
        )),
    }
}

fn check_enum(def: &PropertyDefinition, name: &str, value: &PropValue) -> PropertyCheck {
    let allowed = def.values.as_deref().unwrap_or(&[]);
    match value.as_str() {
        Some(s) if allowed.iter().any(|v| v == s) => PropertyCheck::ok(),
        _ => PropertyCheck::invalid(format!(
            "Value '{}' for '{}' is not one of [{}]",
            value,
            name,
            allowed.join(", ")
        )),
    }
}

fn check_float2(name: &str, value: &PropValue) -> PropertyCheck {
    match value {
        PropValue::Vec2 { .. } => PropertyCheck::ok(),
        PropValue::List(items) if items.len() == 2 => {
            let (Some(x), Some(y)) = (items[0].as_f64(), items[1].as_f64()) else {
                return PropertyCheck::invalid(format!(
                    "Expected two numbers for '{}'",
                    name
                ));
            };
            PropertyCheck::coerced(PropValue::Vec2 { x, y }, Coercion::Exact, None)
        }
        other => PropertyCheck::invalid(format!(
            "Expected {{X, Y}} for '{}', found {}",
            name,
            other.kind()
        )),
    }
}

fn check_string(value: &PropValue) -> PropertyCheck {
    match value {
        PropValue::Str(_) => PropertyCheck::ok(),
        other => PropertyCheck::coerced(PropValue::Str(other.to_string()), Coercion::Exact, None),
    }
}
