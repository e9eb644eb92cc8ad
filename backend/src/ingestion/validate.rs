use super::coerce::{try_coerce, TypedValue};
use super::schema::{LogicalType, TableSchema};
use std::fmt;

/// A row that passed the required-field policy, values in schema column order.
///
/// Only [`validate`] builds these, so nothing reaches the database without
/// having been coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRecord {
    values: Vec<TypedValue>,
}

impl AcceptedRecord {
    pub(crate) fn from_values(values: Vec<TypedValue>) -> Self {
        AcceptedRecord { values }
    }

    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    pub fn get(&self, schema: &TableSchema, column: &str) -> Option<&TypedValue> {
        schema
            .columns()
            .iter()
            .position(|c| c.name == column)
            .and_then(|i| self.values.get(i))
    }

    /// `{id: 1, department: "Sales"}` style rendering for the ingestion log.
    pub fn describe(&self, schema: &TableSchema) -> String {
        let fields: Vec<String> = schema
            .columns()
            .iter()
            .zip(&self.values)
            .map(|(c, v)| match v {
                TypedValue::Null => format!("{}: null", c.name),
                TypedValue::Text(s) => format!("{}: {:?}", c.name, s),
                other => format!("{}: {}", c.name, other),
            })
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// A required column was absent, empty or "not available".
    MissingField { column: String },
    /// A required column was present but could not be read as its type.
    Unparseable {
        column: String,
        raw: String,
        expected: LogicalType,
    },
    FieldCount { expected: usize, found: usize },
    /// The row could not be decoded at all (e.g. invalid UTF-8).
    Unreadable { message: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingField { column } => write!(f, "missing required field: {}", column),
            Rejection::Unparseable {
                column,
                raw,
                expected,
            } => write!(
                f,
                "missing required field: {} (could not read '{}' as {})",
                column, raw, expected
            ),
            Rejection::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            Rejection::Unreadable { message } => write!(f, "unreadable row: {}", message),
        }
    }
}

/// Validate one positional row against `schema`.
///
/// Fields are matched to columns by position. Missing trailing fields count as
/// absent; surplus fields reject the row, since they mean the file does not
/// line up with the schema.
pub fn validate(raw: &[String], schema: &TableSchema) -> Result<AcceptedRecord, Rejection> {
    if raw.len() > schema.len() {
        return Err(Rejection::FieldCount {
            expected: schema.len(),
            found: raw.len(),
        });
    }

    let mut values = Vec::with_capacity(schema.len());
    for (i, spec) in schema.columns().iter().enumerate() {
        let field = raw.get(i).map(String::as_str);
        let value = match try_coerce(field, spec) {
            Ok(value) => value,
            Err(e) if spec.requires_value() => {
                return Err(Rejection::Unparseable {
                    column: spec.name.clone(),
                    raw: e.raw,
                    expected: e.expected,
                });
            }
            Err(_) => TypedValue::Null,
        };
        if value.is_null() && spec.requires_value() {
            return Err(Rejection::MissingField {
                column: spec.name.clone(),
            });
        }
        values.push(value);
    }
    Ok(AcceptedRecord { values })
}
