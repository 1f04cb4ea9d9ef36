//! Core error types.

use thiserror::Error;

/// Errors raised by the resolution engine.
///
/// Recoverable problems found in the input (unknown configured columns, type
/// mismatches, dangling foreign keys) are not errors; they are collected as
/// diagnostics and reported together once resolution completes.
#[derive(Debug, Error)]
pub enum Error {
    /// A single-attribute accessor was used on a relation backed by several pairs.
    #[error("relation '{relation}' is {shape}: use attribute_pairs() instead of a single-attribute accessor")]
    SingleAttributeAccessor {
        /// Relation variable name.
        relation: String,
        /// Shape of the relation (composite or intermediate).
        shape: &'static str,
    },

    /// An inverse was requested for a relation that is itself an inverse.
    #[error("relation '{relation}' is an inverse relation and cannot own an inverse")]
    InverseOfInverse {
        /// Relation variable name.
        relation: String,
    },

    /// An inverse was requested twice for the same relation.
    #[error("relation '{relation}' already has an inverse")]
    InverseAlreadyBuilt {
        /// Relation variable name.
        relation: String,
    },

    /// A primary key accessor was used on an entity without a primary key.
    #[error("entity '{entity}' has no primary key")]
    NoPrimaryKey {
        /// Entity name.
        entity: String,
    },

    /// A single-attribute accessor was used on a composite primary key.
    #[error("primary key '{key}' is composite: use attributes() instead of attribute()")]
    CompositePrimaryKey {
        /// Generated key type name.
        key: String,
    },

    /// Several association configurations target the same column.
    #[error("column {entity}.{column} declares more than one of many-to-one, one-to-one and many-to-many configuration")]
    ConflictingAssociationConfig {
        /// Entity (or table) name.
        entity: String,
        /// Column name.
        column: String,
    },

    /// An unqualified table name exists in more than one schema.
    #[error("table name '{name}' is ambiguous: it exists in several schemas")]
    AmbiguousTable {
        /// Table name.
        name: String,
    },

    /// The same table was supplied twice.
    #[error("table '{name}' is declared more than once")]
    DuplicateTable {
        /// Qualified table name.
        name: String,
    },

    /// Two columns of a table share a name (case-insensitive).
    #[error("column '{column}' is declared more than once in table '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Imported-key rows sharing a constraint name point to different tables.
    #[error("foreign key '{fk_name}' on table '{table}' references more than one table")]
    InconsistentForeignKey {
        /// Table owning the foreign key.
        table: String,
        /// Constraint name.
        fk_name: String,
    },

    /// A renamer or mapping pattern does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The two sides of a composite foreign key have different lengths.
    #[error("foreign key '{fk_name}' pairs {from} column(s) with {to} referenced column(s)")]
    PairingMismatch {
        /// Constraint name.
        fk_name: String,
        /// Number of columns on the referencing side.
        from: usize,
        /// Number of columns on the referenced side.
        to: usize,
    },

    /// A configured parent chain loops back on itself.
    #[error("inheritance of entity '{entity}' forms a cycle")]
    InheritanceCycle {
        /// Entity where the cycle was detected.
        entity: String,
    },

    /// The resolved model failed the consistency check.
    #[error("model is inconsistent: {}", .errors.join("; "))]
    Consistency {
        /// Sorted error messages.
        errors: Vec<String>,
    },
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConflictingAssociationConfig {
            entity: "Employee".to_string(),
            column: "dept_id".to_string(),
        };
        assert!(err.to_string().contains("Employee.dept_id"));

        let err = Error::Consistency {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "model is inconsistent: a; b");
    }

    #[test]
    fn test_invalid_pattern_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
