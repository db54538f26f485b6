pub mod schemas;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Wire types a payload field is checked against before deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Int,
    Bool,
    DateStr,
}

impl FieldType {
    fn name(&self) -> &'static str {
        match self {
            FieldType::Str => "string",
            FieldType::Int => "integer",
            FieldType::Bool => "boolean",
            FieldType::DateStr => "date string",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    MinLen(usize),
    MaxLen(usize),
    Email,
    Positive,
    OneOf(&'static [&'static str]),
    NotInFuture,
}

/// One named field of a request schema. Rules run only after the type
/// check for the field passes.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    name: &'static str,
    alias: Option<&'static str>,
    field_type: FieldType,
    required: bool,
    rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            alias: None,
            field_type,
            required: false,
            rules: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn rules(mut self, rules: &'static [Rule]) -> Self {
        self.rules = rules;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every violation found in a payload, never just the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Invalid request data")]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(field, message)],
        }
    }
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Checks the payload shape without consuming it. Unknown payload
    /// fields are ignored.
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationError::single(
                "body",
                format!("Expected object, received {}", json_type_name(payload)),
            ));
        };

        let mut issues = Vec::new();
        for field in self.fields {
            let value = object
                .get(field.name)
                .or_else(|| field.alias.and_then(|alias| object.get(alias)));
            let Some(value) = value else {
                if field.required {
                    issues.push(FieldIssue::new(field.name, "Required"));
                }
                continue;
            };

            if let Err(message) = check_type(field.field_type, value) {
                issues.push(FieldIssue::new(field.name, message));
                continue;
            }
            for rule in field.rules {
                if let Err(message) = check_rule(rule, value) {
                    issues.push(FieldIssue::new(field.name, message));
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// Validates against the schema, then deserializes into the request type.
/// Deserializer failures surface in the same issue shape.
pub fn parse_payload<T: DeserializeOwned>(
    schema: &Schema,
    payload: Value,
) -> Result<T, ValidationError> {
    schema.validate(&payload)?;
    serde_json::from_value(payload)
        .map_err(|err| ValidationError::single("body", err.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_type(expected: FieldType, value: &Value) -> Result<(), String> {
    let matches = match expected {
        FieldType::Str => value.is_string(),
        FieldType::Int => value.as_i64().is_some() || value.as_u64().is_some(),
        FieldType::Bool => value.is_boolean(),
        FieldType::DateStr => {
            let Some(raw) = value.as_str() else {
                return Err(format!(
                    "Expected {}, received {}",
                    expected.name(),
                    json_type_name(value)
                ));
            };
            if parse_date(raw).is_none() {
                return Err("Invalid date string".to_string());
            }
            true
        }
    };
    if matches {
        Ok(())
    } else {
        Err(format!(
            "Expected {}, received {}",
            expected.name(),
            json_type_name(value)
        ))
    }
}

fn check_rule(rule: &Rule, value: &Value) -> Result<(), String> {
    match rule {
        Rule::MinLen(min) => match value.as_str() {
            Some(raw) if raw.chars().count() < *min => Err(format!(
                "String must contain at least {} character(s)",
                min
            )),
            _ => Ok(()),
        },
        Rule::MaxLen(max) => match value.as_str() {
            Some(raw) if raw.chars().count() > *max => Err(format!(
                "String must contain at most {} character(s)",
                max
            )),
            _ => Ok(()),
        },
        Rule::Email => match value.as_str() {
            Some(raw) if !is_plausible_email(raw) => Err("Invalid email".to_string()),
            _ => Ok(()),
        },
        Rule::Positive => match value.as_i64() {
            Some(number) if number <= 0 => {
                Err("Number must be greater than 0".to_string())
            }
            _ => Ok(()),
        },
        Rule::OneOf(allowed) => match value.as_str() {
            Some(raw) if !allowed.contains(&raw) => {
                Err(format!("Must be one of: {}", allowed.join(", ")))
            }
            _ => Ok(()),
        },
        Rule::NotInFuture => match value.as_str().and_then(parse_date) {
            Some(date) if date > Utc::now() => {
                Err("Date must not be in the future".to_string())
            }
            _ => Ok(()),
        },
    }
}

/// Accepts `YYYY-MM-DD` (taken as midnight UTC) or a full RFC 3339 timestamp.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|datetime| Utc.from_utc_datetime(&datetime));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.with_timezone(&Utc))
}

fn is_plausible_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if raw.contains(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
