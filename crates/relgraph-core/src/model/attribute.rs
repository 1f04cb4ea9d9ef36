//! Resolved attributes.

use super::{AttributeId, EntityId};
use crate::config::EnumConfig;
use crate::naming;
use crate::schema::{Column, MappedType};
use serde::Serialize;

/// Role flags of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttributeFlags {
    /// Sole column of a simple primary key.
    pub simple_pk: bool,
    /// Member of a composite primary key.
    pub in_composite_pk: bool,
    /// Optimistic-locking version column.
    pub version: bool,
    /// Referencing column of a foreign key.
    pub foreign_key: bool,
    /// Backed by a single-column unique index.
    pub unique: bool,
    /// Part of the configured business key.
    pub business_key: bool,
}

/// A resolved attribute: one column plus its target naming and type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Arena id.
    pub id: AttributeId,
    /// Owning entity.
    pub entity: EntityId,
    /// Backing column.
    pub column: Column,
    /// Variable name.
    pub var: String,
    /// Plural variable name.
    pub vars: String,
    /// Getter name.
    pub getter: String,
    /// Setter name.
    pub setter: String,
    /// Mapped type.
    pub mapped_type: MappedType,
    /// Enum mapping, if configured.
    pub enum_config: Option<EnumConfig>,
    /// Role flags.
    pub flags: AttributeFlags,
}

impl Attribute {
    /// Create an attribute, deriving accessor names from the variable name.
    pub fn new(
        id: AttributeId,
        entity: EntityId,
        column: Column,
        var: String,
        mapped_type: MappedType,
    ) -> Self {
        Self {
            id,
            entity,
            column,
            vars: naming::pluralize(&var),
            getter: naming::getter(&var),
            setter: naming::setter(&var),
            var,
            mapped_type,
            enum_config: None,
            flags: AttributeFlags::default(),
        }
    }

    /// Name of the backing column.
    pub fn column_name(&self) -> &str {
        &self.column.name
    }

    /// Check if the backing column accepts nulls.
    pub fn is_nullable(&self) -> bool {
        self.column.nullable
    }

    /// Check if the attribute is part of the primary key.
    pub fn is_in_pk(&self) -> bool {
        self.flags.simple_pk || self.flags.in_composite_pk
    }

    /// Check if the attribute maps to an enum.
    pub fn is_enum(&self) -> bool {
        self.enum_config.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JdbcType;

    #[test]
    fn test_accessor_names() {
        let column = Column::new("dept_id", JdbcType::Integer).not_null();
        let attribute = Attribute::new(
            AttributeId(0),
            EntityId(0),
            column,
            "deptId".to_string(),
            MappedType::Integer,
        );

        assert_eq!(attribute.getter, "getDeptId");
        assert_eq!(attribute.setter, "setDeptId");
        assert_eq!(attribute.vars, "deptIds");
        assert!(!attribute.is_nullable());
        assert!(!attribute.is_in_pk());
        assert!(!attribute.is_enum());
    }
}
