//! Model descriptions
//!
//! A model names a table and lists its fields in order. Every managed table
//! also carries three audit columns (`created_at`, `updated_at`,
//! `deleted_at`) which are appended after the model's own fields.
//!
//! Models can be implemented directly in code through the [`Model`] trait, or
//! loaded from JSON files as a [`ModelDefinition`]:
//!
//! ```json
//! {
//!     "table": "users",
//!     "fields": { "name": "string", "age": "number" }
//! }
//! ```

mod field_type;

pub use field_type::FieldType;

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error as ThisError;

/// Audit columns implicitly added to every managed table, in order
pub const AUDIT_FIELDS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

/// A single named, typed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A table-backed model
pub trait Model {
    /// Name of the table this model is stored in
    fn table_name(&self) -> &str;

    /// Declared fields, in column order
    fn fields(&self) -> Vec<FieldDef>;
}

/// Full column list of a model: declared fields followed by the audit fields
///
/// An audit field the model already declares, in any letter case, keeps its
/// declared position and spelling and is not repeated.
pub fn model_columns<M: Model + ?Sized>(model: &M) -> Vec<FieldDef> {
    let mut columns = model.fields();
    for audit in AUDIT_FIELDS {
        if !columns.iter().any(|c| c.name.eq_ignore_ascii_case(audit)) {
            columns.push(FieldDef::new(audit, FieldType::String));
        }
    }
    columns
}

/// Errors raised while loading or validating model definitions
#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Model table name must not be empty")]
    EmptyTableName,

    #[error("Model '{0}' declares no fields")]
    NoFields(String),

    #[error("Model '{table}' declares field '{field}' more than once")]
    DuplicateField { table: String, field: String },

    #[error("Model '{table}' field '{field}': {reason}")]
    UnknownFieldType {
        table: String,
        field: String,
        reason: String,
    },

    #[error("Invalid model definition: {0}")]
    Invalid(String),

    #[error("Failed to read model file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse model JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Model described by data rather than code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDefinition {
    table: String,
    fields: Vec<FieldDef>,
}

impl ModelDefinition {
    /// Build a model definition, validating the table name and fields
    pub fn new(table: impl Into<String>, fields: Vec<FieldDef>) -> Result<Self, ModelError> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(ModelError::EmptyTableName);
        }
        if fields.is_empty() {
            return Err(ModelError::NoFields(table));
        }

        // SQLite column names are case-insensitive
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.to_ascii_lowercase()) {
                return Err(ModelError::DuplicateField {
                    table: table.clone(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(Self { table, fields })
    }

    /// Parse a model definition from a JSON document
    ///
    /// Field order follows the order of keys in the `fields` object.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| ModelError::Invalid("expected a JSON object".to_string()))?;

        let table = object
            .get("table")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::Invalid("missing string field 'table'".to_string()))?;

        let raw_fields = object
            .get("fields")
            .and_then(Value::as_object)
            .ok_or_else(|| ModelError::Invalid("missing object field 'fields'".to_string()))?;

        let mut fields = Vec::with_capacity(raw_fields.len());
        for (name, raw_type) in raw_fields {
            let type_name = raw_type.as_str().ok_or_else(|| ModelError::UnknownFieldType {
                table: table.to_string(),
                field: name.clone(),
                reason: "field type must be a string".to_string(),
            })?;
            let field_type =
                type_name
                    .parse::<FieldType>()
                    .map_err(|reason| ModelError::UnknownFieldType {
                        table: table.to_string(),
                        field: name.clone(),
                        reason,
                    })?;
            fields.push(FieldDef::new(name.clone(), field_type));
        }

        Self::new(table, fields)
    }

    /// Load a model definition from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

impl Model for ModelDefinition {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn fields(&self) -> Vec<FieldDef> {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note;

    impl Model for Note {
        fn table_name(&self) -> &str {
            "notes"
        }

        fn fields(&self) -> Vec<FieldDef> {
            vec![
                FieldDef::new("title", FieldType::String),
                FieldDef::new("created_at", FieldType::Date),
            ]
        }
    }

    #[test]
    fn test_model_columns_appends_audit_fields() {
        let model =
            ModelDefinition::new("users", vec![FieldDef::new("name", FieldType::String)]).unwrap();
        let names: Vec<String> = model_columns(&model).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["name", "created_at", "updated_at", "deleted_at"]);
    }

    #[test]
    fn test_model_columns_keeps_declared_audit_field() {
        let columns = model_columns(&Note);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["title", "created_at", "updated_at", "deleted_at"]);
        assert_eq!(columns[1].field_type, FieldType::Date);
    }

    #[test]
    fn test_from_json_preserves_order() {
        let model = ModelDefinition::from_json(
            r#"{"table": "users", "fields": {"zeta": "string", "alpha": "number", "mid": "bool"}}"#,
        )
        .unwrap();

        assert_eq!(model.table_name(), "users");
        let fields = model.fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(fields[1].field_type, FieldType::Number);
        assert_eq!(fields[2].field_type, FieldType::Boolean);
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        let err = ModelDefinition::from_json(r#"{"table": "t", "fields": {"id": "uuid"}}"#)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownFieldType { .. }));
    }

    #[test]
    fn test_from_json_rejects_missing_parts() {
        assert!(matches!(
            ModelDefinition::from_json(r#"{"fields": {"a": "string"}}"#),
            Err(ModelError::Invalid(_))
        ));
        assert!(matches!(
            ModelDefinition::from_json(r#"{"table": "t"}"#),
            Err(ModelError::Invalid(_))
        ));
        assert!(matches!(
            ModelDefinition::from_json(r#"{"table": "t", "fields": {}}"#),
            Err(ModelError::NoFields(_))
        ));
        assert!(matches!(
            ModelDefinition::from_json(r#"{"table": " ", "fields": {"a": "string"}}"#),
            Err(ModelError::EmptyTableName)
        ));
        assert!(matches!(
            ModelDefinition::from_json("[1, 2]"),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_fields() {
        let err = ModelDefinition::new(
            "t",
            vec![
                FieldDef::new("a", FieldType::String),
                FieldDef::new("a", FieldType::Number),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateField { .. }));
    }

    #[test]
    fn test_new_rejects_fields_differing_only_in_case() {
        let err = ModelDefinition::from_json(
            r#"{"table": "t", "fields": {"a": "string", "A": "number"}}"#,
        )
        .unwrap_err();
        match err {
            ModelError::DuplicateField { table, field } => {
                assert_eq!(table, "t");
                assert_eq!(field, "A");
            }
            other => panic!("expected a duplicate field error, got {:?}", other),
        }
    }

    #[test]
    fn test_model_columns_matches_audit_fields_ignoring_case() {
        let model = ModelDefinition::new(
            "events",
            vec![
                FieldDef::new("kind", FieldType::String),
                FieldDef::new("Created_At", FieldType::Date),
            ],
        )
        .unwrap();
        let names: Vec<String> = model_columns(&model).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["kind", "Created_At", "updated_at", "deleted_at"]);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"{"table": "users", "fields": {"name": "string"}}"#).unwrap();

        let model = ModelDefinition::from_file(&path).unwrap();
        assert_eq!(model.table_name(), "users");

        let missing = ModelDefinition::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ModelError::Io { .. })));
    }
}
