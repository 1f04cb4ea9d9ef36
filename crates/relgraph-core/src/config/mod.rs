//! Configuration overlay.
//!
//! User overrides merged on top of schema-derived defaults. Loading the
//! overlay from files is the caller's business; every type here derives
//! `Deserialize` and can also be assembled with the `with_*` builders.

mod conventions;
mod entity;
mod mapping;

pub use conventions::{Conventions, DEFAULT_IDENTIFIABLE_PROPERTY, DEFAULT_RESERVED_PREFIX};
pub use entity::{
    AssociationConfig, AssociationDirection, ColumnConfig, EntityConfig, EnumConfig, EnumKind,
    InheritanceConfig, InheritanceStrategy,
};
pub use mapping::{DateMapping, NumberMapping, Renamer};

use serde::{Deserialize, Serialize};

/// The complete configuration overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Global conventions.
    pub conventions: Conventions,
    /// Numeric type rules, first match wins.
    pub number_mappings: Vec<NumberMapping>,
    /// Temporal type rules, first match wins.
    pub date_mappings: Vec<DateMapping>,
    /// Rename rules for table names.
    pub table_renamers: Vec<Renamer>,
    /// Rename rules for column names.
    pub column_renamers: Vec<Renamer>,
    /// Per-entity overrides.
    pub entities: Vec<EntityConfig>,
}

impl Configuration {
    /// Create an empty configuration with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the conventions.
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Append a numeric type rule.
    pub fn with_number_mapping(mut self, mapping: NumberMapping) -> Self {
        self.number_mappings.push(mapping);
        self
    }

    /// Append a temporal type rule.
    pub fn with_date_mapping(mut self, mapping: DateMapping) -> Self {
        self.date_mappings.push(mapping);
        self
    }

    /// Append a table rename rule.
    pub fn with_table_renamer(mut self, renamer: Renamer) -> Self {
        self.table_renamers.push(renamer);
        self
    }

    /// Append a column rename rule.
    pub fn with_column_renamer(mut self, renamer: Renamer) -> Self {
        self.column_renamers.push(renamer);
        self
    }

    /// Append an entity override.
    pub fn with_entity(mut self, entity: EntityConfig) -> Self {
        self.entities.push(entity);
        self
    }

    /// Get the override for a table.
    pub fn entity(&self, schema: Option<&str>, table: &str) -> Option<&EntityConfig> {
        self.entities.iter().find(|e| e.matches(schema, table))
    }

    /// Get the override for a column of a table.
    pub fn column(&self, schema: Option<&str>, table: &str, column: &str) -> Option<&ColumnConfig> {
        self.entity(schema, table).and_then(|e| e.column(column))
    }
}
