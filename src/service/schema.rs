//! Training-time feature schema
//!
//! The ordered list of columns the classifier was fitted on. It is the single
//! authority on what a feature row looks like.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read feature names from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid feature names file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Feature schema is empty")]
    Empty,

    #[error("Duplicate feature column: {0}")]
    DuplicateColumn(String),
}

/// Ordered, duplicate-free list of feature column names
///
/// Cheap to clone; the column list is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Arc<[String]>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            columns: columns.into(),
        })
    }

    /// Load the schema from a JSON array of column names
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let columns: Vec<String> = serde_json::from_str(&contents)?;
        let schema = Self::new(columns)?;

        tracing::info!(path = %path.display(), columns = schema.len(), "Loaded feature schema");
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
