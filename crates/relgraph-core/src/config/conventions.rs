//! Global naming and modelling conventions.

use serde::{Deserialize, Serialize};

/// Default accessor name of composite primary keys.
pub const DEFAULT_IDENTIFIABLE_PROPERTY: &str = "id";

/// Default prefix used to escape reserved identifiers.
pub const DEFAULT_RESERVED_PREFIX: &str = "my";

/// Conventions shared by every entity of a resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Accessor name of composite primary keys.
    pub identifiable_property: String,
    /// Column names treated as optimistic-locking versions.
    pub version_columns: Vec<String>,
    /// Model one-to-one inverses as virtual one-to-one by default.
    pub virtual_one_to_one: bool,
    /// Prefix prepended to identifiers colliding with reserved words.
    pub reserved_prefix: String,
    /// Additional reserved words.
    pub extra_reserved_words: Vec<String>,
    /// Prefix added to every entity type name.
    pub entity_prefix: Option<String>,
    /// Suffix added to every entity type name.
    pub entity_suffix: Option<String>,
    /// Run the account-entity detection convention.
    pub account_detection: bool,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            identifiable_property: DEFAULT_IDENTIFIABLE_PROPERTY.to_string(),
            version_columns: vec!["version".to_string()],
            virtual_one_to_one: false,
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            extra_reserved_words: Vec::new(),
            entity_prefix: None,
            entity_suffix: None,
            account_detection: false,
        }
    }
}

impl Conventions {
    /// Set the composite key accessor name.
    pub fn with_identifiable_property(mut self, name: impl Into<String>) -> Self {
        self.identifiable_property = name.into();
        self
    }

    /// Enable or disable virtual one-to-one by default.
    pub fn with_virtual_one_to_one(mut self, enabled: bool) -> Self {
        self.virtual_one_to_one = enabled;
        self
    }

    /// Set the entity type name prefix.
    pub fn with_entity_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.entity_prefix = Some(prefix.into());
        self
    }

    /// Set the entity type name suffix.
    pub fn with_entity_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.entity_suffix = Some(suffix.into());
        self
    }

    /// Enable account-entity detection.
    pub fn with_account_detection(mut self) -> Self {
        self.account_detection = true;
        self
    }

    /// Check if a column name is a conventional version column.
    pub fn is_version_column(&self, column: &str) -> bool {
        self.version_columns
            .iter()
            .any(|v| v.eq_ignore_ascii_case(column))
    }
}
