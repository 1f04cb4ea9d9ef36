//! Per-entity and per-column overrides.

use crate::error::{Error, Result};
use crate::model::{CascadeType, FetchType};
use crate::schema::MappedType;
use serde::{Deserialize, Serialize};

/// Inheritance mapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InheritanceStrategy {
    /// One table per level, children joined on the primary key.
    Joined,
    /// Whole hierarchy in one table with a discriminator.
    SingleTable,
    /// One complete table per concrete class.
    TablePerClass,
}

/// Which side of a many-to-many the referenced entity sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssociationDirection {
    /// Decided by convention.
    #[default]
    Unspecified,
    /// The entity referenced by this column owns the association.
    Direct,
    /// The entity referenced by this column is the inverse side.
    Inverse,
}

/// How an enum is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumKind {
    /// Stored as the value's position.
    Ordinal,
    /// Stored as the value's name.
    #[default]
    String,
}

/// Enum mapping for a column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumConfig {
    /// Enum type name.
    pub name: String,
    /// Persistence kind.
    pub kind: EnumKind,
    /// Allowed values.
    pub values: Vec<String>,
}

impl EnumConfig {
    /// Create an enum mapping.
    pub fn new(name: impl Into<String>, kind: EnumKind) -> Self {
        Self {
            name: name.into(),
            kind,
            values: Vec::new(),
        }
    }

    /// Set the allowed values.
    pub fn with_values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Overrides for one side of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Variable name for a to-one side.
    pub var_name: Option<String>,
    /// Variable name for a collection side.
    pub elements_var_name: Option<String>,
    /// Fetch strategy.
    pub fetch: Option<FetchType>,
    /// Cascaded operations.
    pub cascades: Vec<CascadeType>,
}

impl AssociationConfig {
    /// Create an association override with a variable name.
    pub fn named(var_name: impl Into<String>) -> Self {
        Self {
            var_name: Some(var_name.into()),
            ..Self::default()
        }
    }

    /// Set the collection variable name.
    pub fn with_elements_var_name(mut self, name: impl Into<String>) -> Self {
        self.elements_var_name = Some(name.into());
        self
    }

    /// Set the fetch strategy.
    pub fn with_fetch(mut self, fetch: FetchType) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// Add a cascaded operation.
    pub fn with_cascade(mut self, cascade: CascadeType) -> Self {
        self.cascades.push(cascade);
        self
    }

    /// Variable name for a collection side, falling back to `var_name`.
    pub fn collection_var(&self) -> Option<String> {
        self.elements_var_name.clone().or_else(|| self.var_name.clone())
    }
}

/// Inheritance declaration for a child entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceConfig {
    /// Name of the parent entity.
    pub parent_entity: String,
    /// Mapping strategy of the hierarchy.
    pub strategy: InheritanceStrategy,
    /// Discriminator value for single-table hierarchies.
    #[serde(default)]
    pub discriminator_value: Option<String>,
}

/// Overrides for one column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Column this configuration applies to.
    pub column_name: String,
    /// Explicit field name.
    pub field_name: Option<String>,
    /// Drop the column from the entity.
    pub ignore: bool,
    /// Forced mapped type.
    pub mapped_type: Option<MappedType>,
    /// Forced relation target, by entity name.
    pub target_entity_name: Option<String>,
    /// Many-to-many side for columns of an association table.
    pub association_direction: AssociationDirection,
    /// Enum mapping.
    pub enum_config: Option<EnumConfig>,
    /// Part of the business key.
    pub business_key: bool,
    /// Forced version flag.
    pub version: Option<bool>,
    /// Model a one-to-one through this column as a virtual one-to-one.
    pub virtual_one_to_one: Option<bool>,
    /// Overrides for the many-to-one side.
    pub many_to_one: Option<AssociationConfig>,
    /// Overrides for the owning one-to-one side.
    pub one_to_one: Option<AssociationConfig>,
    /// Overrides for the owning many-to-many side.
    pub many_to_many: Option<AssociationConfig>,
    /// Overrides for the inverse one-to-many side.
    pub one_to_many: Option<AssociationConfig>,
    /// Overrides for the inverse one-to-one side.
    pub inverse_one_to_one: Option<AssociationConfig>,
    /// Overrides for the inverse many-to-many side.
    pub inverse_many_to_many: Option<AssociationConfig>,
}

impl ColumnConfig {
    /// Create an empty configuration for a column.
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            ..Self::default()
        }
    }

    /// Set the field name.
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    /// Drop the column.
    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Force the mapped type.
    pub fn with_mapped_type(mut self, mapped_type: MappedType) -> Self {
        self.mapped_type = Some(mapped_type);
        self
    }

    /// Force the relation target.
    pub fn with_target_entity(mut self, name: impl Into<String>) -> Self {
        self.target_entity_name = Some(name.into());
        self
    }

    /// Set the association direction.
    pub fn with_association_direction(mut self, direction: AssociationDirection) -> Self {
        self.association_direction = direction;
        self
    }

    /// Map the column to an enum.
    pub fn with_enum(mut self, config: EnumConfig) -> Self {
        self.enum_config = Some(config);
        self
    }

    /// Add the column to the business key.
    pub fn in_business_key(mut self) -> Self {
        self.business_key = true;
        self
    }

    /// Force the version flag.
    pub fn with_version(mut self, version: bool) -> Self {
        self.version = Some(version);
        self
    }

    /// Force virtual one-to-one modelling.
    pub fn with_virtual_one_to_one(mut self, enabled: bool) -> Self {
        self.virtual_one_to_one = Some(enabled);
        self
    }

    /// Set many-to-one overrides.
    pub fn with_many_to_one(mut self, config: AssociationConfig) -> Self {
        self.many_to_one = Some(config);
        self
    }

    /// Set one-to-one overrides.
    pub fn with_one_to_one(mut self, config: AssociationConfig) -> Self {
        self.one_to_one = Some(config);
        self
    }

    /// Set many-to-many overrides.
    pub fn with_many_to_many(mut self, config: AssociationConfig) -> Self {
        self.many_to_many = Some(config);
        self
    }

    /// Set one-to-many overrides.
    pub fn with_one_to_many(mut self, config: AssociationConfig) -> Self {
        self.one_to_many = Some(config);
        self
    }

    /// Set inverse one-to-one overrides.
    pub fn with_inverse_one_to_one(mut self, config: AssociationConfig) -> Self {
        self.inverse_one_to_one = Some(config);
        self
    }

    /// Set inverse many-to-many overrides.
    pub fn with_inverse_many_to_many(mut self, config: AssociationConfig) -> Self {
        self.inverse_many_to_many = Some(config);
        self
    }

    /// Reject columns declaring more than one owning association config.
    pub fn check_association_conflict(&self, entity: &str) -> Result<()> {
        let declared = [
            self.many_to_one.is_some(),
            self.one_to_one.is_some(),
            self.many_to_many.is_some(),
        ]
        .into_iter()
        .filter(|declared| *declared)
        .count();

        if declared > 1 {
            return Err(Error::ConflictingAssociationConfig {
                entity: entity.to_string(),
                column: self.column_name.clone(),
            });
        }
        Ok(())
    }
}

/// Overrides for one entity, matched to a table by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Table this configuration applies to.
    pub table_name: String,
    /// Schema of the table, if qualified.
    pub schema_name: Option<String>,
    /// Explicit entity name.
    pub entity_name: Option<String>,
    /// Do not produce an entity for the table.
    pub skip: bool,
    /// Force (true) or forbid (false) association-table detection.
    pub association_table: Option<bool>,
    /// Inheritance declaration.
    pub inheritance: Option<InheritanceConfig>,
    /// Entity-wide virtual one-to-one default.
    pub virtual_one_to_one: Option<bool>,
    /// Column overrides.
    pub columns: Vec<ColumnConfig>,
}

impl EntityConfig {
    /// Create an empty configuration for a table.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Qualify the table with a schema.
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    /// Set the entity name.
    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Skip the table.
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Force or forbid association-table detection.
    pub fn with_association_table(mut self, forced: bool) -> Self {
        self.association_table = Some(forced);
        self
    }

    /// Declare a parent entity.
    pub fn extends(mut self, parent: impl Into<String>, strategy: InheritanceStrategy) -> Self {
        self.inheritance = Some(InheritanceConfig {
            parent_entity: parent.into(),
            strategy,
            discriminator_value: None,
        });
        self
    }

    /// Set the entity-wide virtual one-to-one default.
    pub fn with_virtual_one_to_one(mut self, enabled: bool) -> Self {
        self.virtual_one_to_one = Some(enabled);
        self
    }

    /// Add a column override.
    pub fn with_column(mut self, column: ColumnConfig) -> Self {
        self.columns.push(column);
        self
    }

    /// Check if this configuration targets the given table.
    pub fn matches(&self, schema: Option<&str>, table: &str) -> bool {
        if !self.table_name.eq_ignore_ascii_case(table) {
            return false;
        }
        match (&self.schema_name, schema) {
            (None, _) => true,
            (Some(configured), Some(actual)) => configured.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }

    /// Get the override for a column (case-insensitive).
    pub fn column(&self, name: &str) -> Option<&ColumnConfig> {
        self.columns
            .iter()
            .find(|c| c.column_name.eq_ignore_ascii_case(name))
    }

    /// Name used in messages about this configuration.
    pub fn display_name(&self) -> &str {
        self.entity_name.as_deref().unwrap_or(&self.table_name)
    }
}
