//! Type mapping and renaming rules.

use crate::schema::{JdbcType, MappedType};
use serde::{Deserialize, Serialize};

/// Maps numeric columns to a type by name pattern and size thresholds.
///
/// Every populated predicate must hold for the rule to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberMapping {
    /// Regex the column name must match.
    #[serde(default)]
    pub column_name_pattern: Option<String>,
    /// Upper bound (inclusive) on the column size.
    #[serde(default)]
    pub max_size: Option<u32>,
    /// Upper bound (inclusive) on the decimal digits.
    #[serde(default)]
    pub max_decimal_digits: Option<u32>,
    /// Resulting type.
    pub mapped_type: MappedType,
}

impl NumberMapping {
    /// Create a rule matching every numeric column.
    pub fn new(mapped_type: MappedType) -> Self {
        Self {
            column_name_pattern: None,
            max_size: None,
            max_decimal_digits: None,
            mapped_type,
        }
    }

    /// Restrict to column names matching a pattern.
    pub fn with_column_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.column_name_pattern = Some(pattern.into());
        self
    }

    /// Restrict to columns no larger than `size`.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Restrict to columns with at most `digits` decimal digits.
    pub fn with_max_decimal_digits(mut self, digits: u32) -> Self {
        self.max_decimal_digits = Some(digits);
        self
    }
}

/// Maps temporal columns to a type by name pattern and type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMapping {
    /// Regex the column name must match.
    #[serde(default)]
    pub column_name_pattern: Option<String>,
    /// Type tag the column must carry.
    #[serde(default)]
    pub jdbc_type: Option<JdbcType>,
    /// Resulting type.
    pub mapped_type: MappedType,
}

impl DateMapping {
    /// Create a rule matching every temporal column.
    pub fn new(mapped_type: MappedType) -> Self {
        Self {
            column_name_pattern: None,
            jdbc_type: None,
            mapped_type,
        }
    }

    /// Restrict to column names matching a pattern.
    pub fn with_column_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.column_name_pattern = Some(pattern.into());
        self
    }

    /// Restrict to a type tag.
    pub fn with_jdbc_type(mut self, jdbc_type: JdbcType) -> Self {
        self.jdbc_type = Some(jdbc_type);
        self
    }
}

/// Regex rename rule applied to raw SQL names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renamer {
    /// Pattern to match.
    pub pattern: String,
    /// Replacement, may reference capture groups (`$1`).
    pub replacement: String,
}

impl Renamer {
    /// Create a rename rule.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}
