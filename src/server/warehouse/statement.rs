//! Request and response shapes of the SQL API statements endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::server::error::warehouse::WarehouseError;

/// A SQL statement with positional (`?`) value bindings
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    sql: String,
    bindings: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    /// Binds the next `?` placeholder to a text value
    pub fn bind(mut self, value: impl Into<String>) -> Self {
        self.bindings.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Bindings keyed by their 1-based position as the SQL API expects
    pub(crate) fn binding_map(&self) -> BTreeMap<String, Binding> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, value)| {
                (
                    (index + 1).to_string(),
                    Binding {
                        kind: "TEXT",
                        value: value.clone(),
                    },
                )
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct Binding {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatementRequest<'a> {
    pub statement: &'a str,
    pub timeout: u64,
    pub database: &'a str,
    pub schema: &'a str,
    pub warehouse: &'a str,
    pub role: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, Binding>,
    pub parameters: StatementParameters<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatementParameters<'a> {
    pub query_tag: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatementResponse {
    pub result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    pub data: Vec<Vec<Option<String>>>,
    pub statement_handle: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResultSetMetaData {
    #[serde(default)]
    pub row_type: Vec<ColumnType>,
    #[serde(default)]
    pub partition_info: Vec<PartitionInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnType {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartitionInfo {
    #[serde(default)]
    pub row_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PartitionResponse {
    #[serde(default)]
    pub data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Statement result: column names plus rows of nullable text cells
///
/// The SQL API returns every value as a string regardless of its column type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    pub fn column_index(&self, name: &str) -> Result<usize, WarehouseError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| WarehouseError::MissingColumn(name.to_string()))
    }

    /// Values of column `name` in row order
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<&str>>, WarehouseError> {
        let index = self.column_index(name)?;

        Ok(self
            .rows
            .iter()
            .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
            .collect())
    }

    /// Value of column `name` in the first row
    pub fn first_value(&self, name: &str) -> Result<Option<&str>, WarehouseError> {
        Ok(self.column_values(name)?.into_iter().next().flatten())
    }
}
