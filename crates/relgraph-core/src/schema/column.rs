//! Column metadata.

use super::types::{JdbcType, MappedType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

/// A column as reported by the metadata extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// JDBC-style type tag.
    pub jdbc_type: JdbcType,
    /// Column size (length or precision).
    #[serde(default)]
    pub size: u32,
    /// Number of fractional digits.
    #[serde(default)]
    pub decimal_digits: u32,
    /// Whether the column accepts nulls.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Whether the database generates values for this column.
    #[serde(default)]
    pub auto_increment: bool,
    /// Column comment.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Default value expression.
    #[serde(default)]
    pub default_value: Option<String>,
    /// 1-based position in the table. Zero means "assign on insertion".
    #[serde(default)]
    pub ordinal_position: u32,
    /// Allowed values when the column is a native enum.
    #[serde(default)]
    pub enum_values: Vec<String>,
    /// Free-form meta attributes.
    #[serde(default)]
    pub meta_attributes: BTreeMap<String, String>,
}

impl Column {
    /// Create a nullable column.
    pub fn new(name: impl Into<String>, jdbc_type: JdbcType) -> Self {
        Self {
            name: name.into(),
            jdbc_type,
            size: 0,
            decimal_digits: 0,
            nullable: true,
            auto_increment: false,
            remarks: None,
            default_value: None,
            ordinal_position: 0,
            enum_values: Vec::new(),
            meta_attributes: BTreeMap::new(),
        }
    }

    /// Set the column size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the number of fractional digits.
    pub fn with_decimal_digits(mut self, digits: u32) -> Self {
        self.decimal_digits = digits;
        self
    }

    /// Mark as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark as generated by the database.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Set the default value expression.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the ordinal position.
    pub fn at(mut self, ordinal_position: u32) -> Self {
        self.ordinal_position = ordinal_position;
        self
    }

    /// Set the native enum values.
    pub fn with_enum_values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Add a meta attribute.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta_attributes.insert(key.into(), value.into());
        self
    }

    /// Mapped type derived from the type tag alone.
    pub fn default_mapped_type(&self) -> MappedType {
        self.jdbc_type
            .default_mapped_type(self.size, self.decimal_digits)
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let column = Column::new("price", JdbcType::Decimal)
            .with_size(10)
            .with_decimal_digits(2)
            .not_null()
            .at(3);

        assert!(!column.nullable);
        assert_eq!(column.ordinal_position, 3);
        assert_eq!(column.default_mapped_type(), MappedType::BigDecimal);
        assert!(column.is_named("PRICE"));
    }

    #[test]
    fn test_column_deserialize_defaults() {
        let column: Column =
            serde_json::from_str(r#"{"name": "id", "jdbc_type": "INTEGER", "ordinal_position": 1}"#)
                .unwrap();

        assert!(column.nullable);
        assert!(!column.auto_increment);
        assert_eq!(column.size, 0);
        assert!(column.enum_values.is_empty());
    }
}
