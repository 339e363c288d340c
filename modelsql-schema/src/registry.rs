use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maps one model's table name and its field → column renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Literal table name backing the model.
    pub table: String,
    /// Field name → column name, in no particular order.
    pub columns: HashMap<String, String>,
}

impl TableSchema {
    /// Creates a schema for `table` with no columns yet.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        TableSchema {
            table: table.into(),
            columns: HashMap::new(),
        }
    }

    /// Adds a field → column mapping (builder style).
    #[must_use]
    pub fn column(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Looks up the column name for `field`.
    #[must_use]
    pub fn column_of(&self, field: &str) -> Option<&str> {
        self.columns.get(field).map(String::as_str)
    }
}

/// Model name → [`TableSchema`] lookup consumed by the placeholder
/// resolver.
///
/// Construction happens in the generation tool (from struct tags or a
/// schema file); this type only needs to answer lookups. It serializes to
/// JSON so a registry can be persisted next to the generated code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    models: HashMap<String, TableSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `model` (builder style). A repeated model
    /// name replaces the earlier registration.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>, schema: TableSchema) -> Self {
        self.models.insert(model.into(), schema);
        self
    }

    /// Looks up the schema for `model`.
    #[must_use]
    pub fn schema_of(&self, model: &str) -> Option<&TableSchema> {
        self.models.get(model)
    }

    /// Looks up the table name for `model`.
    #[must_use]
    pub fn table_of(&self, model: &str) -> Option<&str> {
        self.models.get(model).map(|s| s.table.as_str())
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True if no model is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Loads a registry from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the registry to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
