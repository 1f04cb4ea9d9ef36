//! Tables, foreign keys and indexes.

use super::column::Column;
use serde::{Deserialize, Serialize};

/// Kind of relation reported by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableType {
    #[default]
    Table,
    View,
}

/// One raw imported-key row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedKey {
    /// Constraint name.
    pub fk_name: String,
    /// Referencing column on this table.
    pub fk_column_name: String,
    /// Schema of the referenced table.
    #[serde(default)]
    pub pk_table_schema: Option<String>,
    /// Referenced table.
    pub pk_table_name: String,
    /// Referenced column.
    pub pk_column_name: String,
}

/// One raw index row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRow {
    /// Index name.
    pub index_name: String,
    /// Indexed column.
    pub column_name: String,
    /// Whether duplicate values are allowed.
    pub non_unique: bool,
}

/// A table as reported by the metadata extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Catalog name.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Schema name.
    #[serde(default)]
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
    /// Table comment.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Table or view.
    #[serde(default, rename = "type")]
    pub table_type: TableType,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Primary key column names, in key order.
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// Raw imported-key rows.
    #[serde(default)]
    pub imported_keys: Vec<ImportedKey>,
    /// Raw index rows.
    #[serde(default)]
    pub indexes: Vec<IndexRow>,
}

/// Imported-key rows grouped under one constraint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Schema of the referenced table.
    pub pk_table_schema: Option<String>,
    /// Referenced table.
    pub pk_table_name: String,
    /// (referencing column, referenced column) in declared order.
    pub columns: Vec<(String, String)>,
}

/// Index rows grouped under one index name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHolder {
    /// Index name.
    pub name: String,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Indexed columns in declared order.
    pub columns: Vec<String>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
            remarks: None,
            table_type: TableType::Table,
            columns: Vec::new(),
            primary_keys: Vec::new(),
            imported_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Place the table in a schema.
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Mark the table as a view.
    pub fn as_view(mut self) -> Self {
        self.table_type = TableType::View;
        self
    }

    /// Add a column. A zero ordinal position is replaced by the column's index.
    pub fn with_column(mut self, mut column: Column) -> Self {
        if column.ordinal_position == 0 {
            column.ordinal_position = self.columns.len() as u32 + 1;
        }
        self.columns.push(column);
        self
    }

    /// Set the primary key columns.
    pub fn with_primary_key(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.primary_keys = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a foreign key as a group of imported-key rows.
    pub fn with_foreign_key(
        mut self,
        fk_name: impl Into<String>,
        pk_table_name: impl Into<String>,
        columns: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let fk_name = fk_name.into();
        let pk_table_name = pk_table_name.into();
        for (fk_column, pk_column) in columns {
            self.imported_keys.push(ImportedKey {
                fk_name: fk_name.clone(),
                fk_column_name: fk_column.into(),
                pk_table_schema: None,
                pk_table_name: pk_table_name.clone(),
                pk_column_name: pk_column.into(),
            });
        }
        self
    }

    /// Add a raw imported-key row.
    pub fn with_imported_key(mut self, key: ImportedKey) -> Self {
        self.imported_keys.push(key);
        self
    }

    /// Add an index over the given columns.
    pub fn with_index(
        mut self,
        index_name: impl Into<String>,
        unique: bool,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let index_name = index_name.into();
        for column in columns {
            self.indexes.push(IndexRow {
                index_name: index_name.clone(),
                column_name: column.into(),
                non_unique: !unique,
            });
        }
        self
    }

    /// Add a unique index over the given columns.
    pub fn with_unique_index(
        self,
        index_name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.with_index(index_name, true, columns)
    }

    /// Schema-qualified name.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// Get a column by name (case-insensitive).
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_named(name))
    }

    /// Check if a column belongs to the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.iter().any(|pk| pk.eq_ignore_ascii_case(column))
    }

    /// Check if a column takes part in any foreign key.
    pub fn is_foreign_key(&self, column: &str) -> bool {
        self.imported_keys
            .iter()
            .any(|k| k.fk_column_name.eq_ignore_ascii_case(column))
    }

    /// Group imported-key rows by constraint name, in first-appearance order.
    pub fn foreign_keys(&self) -> Vec<ForeignKey> {
        let mut keys: Vec<ForeignKey> = Vec::new();
        for row in &self.imported_keys {
            let pair = (row.fk_column_name.clone(), row.pk_column_name.clone());
            match keys.iter_mut().find(|fk| fk.name == row.fk_name) {
                Some(fk) => fk.columns.push(pair),
                None => keys.push(ForeignKey {
                    name: row.fk_name.clone(),
                    pk_table_schema: row.pk_table_schema.clone(),
                    pk_table_name: row.pk_table_name.clone(),
                    columns: vec![pair],
                }),
            }
        }
        keys
    }

    /// Group index rows by index name, in first-appearance order.
    pub fn index_holders(&self) -> Vec<IndexHolder> {
        let mut holders: Vec<IndexHolder> = Vec::new();
        for row in &self.indexes {
            match holders.iter_mut().find(|h| h.name == row.index_name) {
                Some(holder) => {
                    holder.columns.push(row.column_name.clone());
                    holder.unique &= !row.non_unique;
                }
                None => holders.push(IndexHolder {
                    name: row.index_name.clone(),
                    unique: !row.non_unique,
                    columns: vec![row.column_name.clone()],
                }),
            }
        }
        holders
    }

    /// Check if a single-column unique index exists on the column.
    pub fn has_unique_index_on(&self, column: &str) -> bool {
        self.index_holders()
            .iter()
            .any(|h| h.unique && h.is_simple() && h.columns[0].eq_ignore_ascii_case(column))
    }
}

impl ForeignKey {
    /// Check if the key has exactly one column pair.
    pub fn is_simple(&self) -> bool {
        self.columns.len() == 1
    }

    /// Check if the key has several column pairs.
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// Referencing columns in declared order.
    pub fn fk_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(fk, _)| fk.as_str())
    }

    /// Referenced columns in declared order.
    pub fn pk_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, pk)| pk.as_str())
    }
}

impl IndexHolder {
    /// Check if the index covers exactly one column.
    pub fn is_simple(&self) -> bool {
        self.columns.len() == 1
    }

    /// Check if the index covers several columns.
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}
