//! Statically declared table schemas.
//!
//! Each [`Resource`] has a fixed, ordered column list. The order is also the
//! positional order of fields in a headerless CSV file for that table, so it
//! must match the files being loaded.

use crate::error::{ServiceError, ServiceResult};
use common::model::resource::Resource;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Integer,
    Float,
    String,
    DateTime,
}

impl LogicalType {
    fn sql_type(&self) -> &'static str {
        match self {
            LogicalType::Integer => "INTEGER",
            LogicalType::Float => "REAL",
            LogicalType::String | LogicalType::DateTime => "TEXT",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::String => "string",
            LogicalType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnSpec {
    /// A nullable, non-key column.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        ColumnSpec {
            name: name.into(),
            logical_type,
            nullable: true,
            primary_key: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Null is rejected for this column. Primary keys are exempt because the
    /// database assigns them when absent.
    pub fn requires_value(&self) -> bool {
        !self.nullable && !self.primary_key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnSpec>) -> ServiceResult<Self> {
        let table = table.into();
        if columns.is_empty() {
            return Err(ServiceError::Schema(format!("table '{}' declares no columns", table)));
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ServiceError::Schema(format!(
                    "table '{}' declares column '{}' twice",
                    table, column.name
                )));
            }
        }
        Ok(TableSchema { table, columns })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("\"{}\" {}", c.name, c.logical_type.sql_type());
                if c.primary_key {
                    def.push_str(" PRIMARY KEY");
                } else if !c.nullable {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
            self.table,
            columns.join(", ")
        )
    }

    pub fn insert_sql(&self) -> String {
        let names: Vec<String> = self.columns.iter().map(|c| format!("\"{}\"", c.name)).collect();
        let placeholders: Vec<String> = (1..=self.columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            self.table,
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

fn declared_columns(resource: Resource) -> Vec<ColumnSpec> {
    use LogicalType::{DateTime, Integer};
    match resource {
        Resource::Departments => vec![
            ColumnSpec::new("id", Integer).primary_key(),
            ColumnSpec::new("department", LogicalType::String).required(),
        ],
        Resource::Jobs => vec![
            ColumnSpec::new("id", Integer).primary_key(),
            ColumnSpec::new("job", LogicalType::String).required(),
        ],
        Resource::Employees => vec![
            ColumnSpec::new("id", Integer).primary_key(),
            ColumnSpec::new("name", LogicalType::String),
            ColumnSpec::new("datetime", DateTime),
            ColumnSpec::new("department_id", Integer).required(),
            ColumnSpec::new("job_id", Integer).required(),
        ],
    }
}

/// Ordered column metadata for a resource table.
pub fn columns_of(resource: Resource) -> ServiceResult<TableSchema> {
    TableSchema::new(resource.name(), declared_columns(resource))
}

/// Every declared schema, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<Resource, TableSchema>,
}

impl SchemaRegistry {
    pub fn load() -> ServiceResult<Self> {
        let mut schemas = HashMap::new();
        for resource in Resource::ALL {
            schemas.insert(resource, columns_of(resource)?);
        }
        Ok(SchemaRegistry { schemas })
    }

    pub fn get(&self, resource: Resource) -> ServiceResult<&TableSchema> {
        self.schemas
            .get(&resource)
            .ok_or_else(|| ServiceError::Schema(format!("no schema registered for '{}'", resource)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> {
        Resource::ALL.iter().filter_map(|r| self.schemas.get(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employees_columns_keep_declared_order() {
        let schema = columns_of(Resource::Employees).unwrap();
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "datetime", "department_id", "job_id"]);
    }

    #[test]
    fn primary_key_never_requires_value() {
        let schema = columns_of(Resource::Departments).unwrap();
        let id = &schema.columns()[0];
        assert!(id.primary_key);
        assert!(!id.requires_value());
        assert!(schema.columns()[1].requires_value());
    }

    #[test]
    fn empty_table_is_a_schema_error() {
        let err = TableSchema::new("nothing", vec![]).unwrap_err();
        assert!(matches!(err, ServiceError::Schema(_)));
    }

    #[test]
    fn duplicate_column_is_a_schema_error() {
        let err = TableSchema::new(
            "dup",
            vec![
                ColumnSpec::new("a", LogicalType::Integer),
                ColumnSpec::new("a", LogicalType::String),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn renders_ddl_and_insert() {
        let schema = columns_of(Resource::Jobs).unwrap();
        assert_eq!(
            schema.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS \"jobs\" (\"id\" INTEGER PRIMARY KEY, \"job\" TEXT NOT NULL)"
        );
        assert_eq!(
            schema.insert_sql(),
            "INSERT INTO \"jobs\" (\"id\", \"job\") VALUES (?1, ?2)"
        );
    }

    #[test]
    fn registry_covers_every_resource() {
        let registry = SchemaRegistry::load().unwrap();
        for resource in Resource::ALL {
            assert_eq!(registry.get(resource).unwrap().table(), resource.name());
        }
        assert_eq!(registry.iter().count(), 3);
    }
}
