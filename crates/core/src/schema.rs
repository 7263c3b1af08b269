//! Record schemas: the validation boundary between the agent and its tools.
//!
//! A [`Schema`] is an explicit description of a flat record shape:
//! field name → primitive kind → required flag. Every tool declares one
//! schema for its input and one for its output, and the
//! [`ToolRegistry`](crate::tool::ToolRegistry) checks both on every call.
//!
//! The same description is rendered to JSON Schema so the model knows
//! which arguments a tool accepts.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// The primitive kind of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any JSON string.
    String,
    /// A finite JSON number.
    Number,
    /// A string shaped like `local@domain.tld`.
    Email,
    /// A calendar date in `YYYY-MM-DD` form.
    Date,
    /// An RFC 3339 timestamp.
    Timestamp,
    /// A string drawn from a fixed set of values.
    Enum(&'static [&'static str]),
    /// A list of objects, each matching the nested schema.
    List(Schema),
}

impl FieldKind {
    /// Short name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Email => "email",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Enum(_) => "enum",
            Self::List(_) => "array",
        }
    }
}

/// One field of a record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<&'static str>,
}

/// An ordered list of fields describing one JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a required field.
    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
            description: None,
        });
        self
    }

    /// Add an optional field.
    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
            description: None,
        });
        self
    }

    /// Attach a description to the most recently added field.
    pub fn describe(mut self, description: &'static str) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.description = Some(description);
        }
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check a JSON value against this schema.
    ///
    /// Unknown fields are ignored. An optional field may be absent or
    /// `null`; a required field may be neither.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate_at(value, "")
    }

    fn validate_at(&self, value: &Value, prefix: &str) -> Result<(), ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError::new(
                if prefix.is_empty() { "$" } else { prefix },
                ValidationIssue::NotAnObject {
                    found: json_type(value),
                },
            ));
        };

        for spec in &self.fields {
            let path = if prefix.is_empty() {
                spec.name.to_string()
            } else {
                format!("{prefix}.{}", spec.name)
            };

            match object.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(ValidationError::new(path, ValidationIssue::Missing));
                    }
                }
                Some(field) => check_kind(&spec.kind, field, &path)?,
            }
        }

        Ok(())
    }

    /// Render this schema as a JSON Schema object for the model.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for spec in &self.fields {
            let mut property = kind_json_schema(&spec.kind);
            if let (Some(description), Some(obj)) = (spec.description, property.as_object_mut()) {
                obj.insert("description".into(), Value::String(description.into()));
            }
            properties.insert(spec.name.to_string(), property);
            if spec.required {
                required.push(Value::String(spec.name.to_string()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str) -> Result<(), ValidationError> {
    let wrong_type = || {
        ValidationError::new(
            path,
            ValidationIssue::WrongType {
                expected: kind.label(),
                found: json_type(value),
            },
        )
    };

    match kind {
        FieldKind::String => {
            value.as_str().ok_or_else(wrong_type)?;
        }
        FieldKind::Number => {
            let n = value.as_f64().ok_or_else(wrong_type)?;
            if !n.is_finite() {
                return Err(ValidationError::new(path, ValidationIssue::NotFinite));
            }
        }
        FieldKind::Email => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if !is_email(s) {
                return Err(ValidationError::new(path, ValidationIssue::InvalidEmail));
            }
        }
        FieldKind::Date => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if !is_calendar_date(s) {
                return Err(ValidationError::new(path, ValidationIssue::InvalidDate));
            }
        }
        FieldKind::Timestamp => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if DateTime::parse_from_rfc3339(s).is_err() {
                return Err(ValidationError::new(path, ValidationIssue::InvalidTimestamp));
            }
        }
        FieldKind::Enum(allowed) => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if !allowed.contains(&s) {
                return Err(ValidationError::new(
                    path,
                    ValidationIssue::NotInEnum { allowed },
                ));
            }
        }
        FieldKind::List(item_schema) => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            for (i, item) in items.iter().enumerate() {
                item_schema.validate_at(item, &format!("{path}[{i}]"))?;
            }
        }
    }

    Ok(())
}

/// Strict `YYYY-MM-DD`: chrono alone accepts unpadded and signed years.
fn is_calendar_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .is_ok_and(|date| date.format("%Y-%m-%d").to_string() == s)
}

fn kind_json_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String => serde_json::json!({ "type": "string" }),
        FieldKind::Number => serde_json::json!({ "type": "number" }),
        FieldKind::Email => serde_json::json!({ "type": "string", "format": "email" }),
        FieldKind::Date => serde_json::json!({ "type": "string", "format": "date" }),
        FieldKind::Timestamp => serde_json::json!({ "type": "string", "format": "date-time" }),
        FieldKind::Enum(allowed) => serde_json::json!({ "type": "string", "enum": allowed }),
        FieldKind::List(item) => serde_json::json!({
            "type": "array",
            "items": item.to_json_schema(),
        }),
    }
}

/// Loose structural email check: one `@`, non-empty local part, and a
/// dotted domain without whitespace.
fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What was wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    NotAnObject { found: &'static str },
    Missing,
    WrongType { expected: &'static str, found: &'static str },
    NotInEnum { allowed: &'static [&'static str] },
    InvalidEmail,
    InvalidDate,
    InvalidTimestamp,
    NotFinite,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { found } => write!(f, "expected an object, found {found}"),
            Self::Missing => write!(f, "required field is missing"),
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::NotInEnum { allowed } => write!(f, "must be one of: {}", allowed.join(", ")),
            Self::InvalidEmail => write!(f, "not a valid email address"),
            Self::InvalidDate => write!(f, "expected a date in YYYY-MM-DD format"),
            Self::InvalidTimestamp => write!(f, "expected an RFC 3339 timestamp"),
            Self::NotFinite => write!(f, "number must be finite"),
        }
    }
}

/// A schema violation, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {issue}")]
pub struct ValidationError {
    /// Dotted path to the field (`breaks[0].start`), or `$` for the root.
    pub field: String,
    pub issue: ValidationIssue,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, issue: ValidationIssue) -> Self {
        Self {
            field: field.into(),
            issue,
        }
    }
}
