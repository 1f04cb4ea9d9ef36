//! Resolved entities.

use super::primary_key::PrimaryKey;
use super::{AttributeId, EntityId, RelationId};
use crate::config::InheritanceStrategy;
use crate::naming;
use crate::schema::TableId;
use serde::Serialize;

/// A resolved entity: one table (or one level of a hierarchy).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Arena id.
    pub id: EntityId,
    /// Type name.
    pub name: String,
    /// Variable name.
    pub var: String,
    /// Plural variable name.
    pub vars: String,
    /// Owning table.
    pub table: TableId,
    /// Name of the owning table.
    pub table_name: String,
    /// Schema of the owning table.
    pub schema_name: Option<String>,
    /// Primary key.
    pub primary_key: PrimaryKey,
    /// Attributes in column ordinal order.
    pub attributes: Vec<AttributeId>,
    /// Relations owned by this entity.
    pub relations: Vec<RelationId>,
    /// Inverse relations held by this entity.
    pub inverse_relations: Vec<RelationId>,
    /// Parent in an inheritance hierarchy.
    pub parent: Option<EntityId>,
    /// Children in an inheritance hierarchy.
    pub children: Vec<EntityId>,
    /// Strategy of the hierarchy this entity belongs to.
    pub inheritance: Option<InheritanceStrategy>,
    /// Discriminator value in a single-table hierarchy.
    pub discriminator_value: Option<String>,
    /// Whether the table only implements a many-to-many association.
    pub is_association: bool,
    /// Attributes flagged as business key.
    pub business_key: Vec<AttributeId>,
}

impl Entity {
    /// Create an entity without key, attributes or relations.
    /// The id is assigned by the model.
    pub fn new(
        name: impl Into<String>,
        var: impl Into<String>,
        table: TableId,
        table_name: impl Into<String>,
        schema_name: Option<String>,
    ) -> Self {
        let name = name.into();
        let var = var.into();
        Self {
            id: EntityId(usize::MAX),
            primary_key: PrimaryKey::NoKey {
                entity: name.clone(),
            },
            name,
            vars: naming::pluralize(&var),
            var,
            table,
            table_name: table_name.into(),
            schema_name,
            attributes: Vec::new(),
            relations: Vec::new(),
            inverse_relations: Vec::new(),
            parent: None,
            children: Vec::new(),
            inheritance: None,
            discriminator_value: None,
            is_association: false,
            business_key: Vec::new(),
        }
    }

    /// Check if the entity has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if the entity takes part in a hierarchy.
    pub fn has_inheritance(&self) -> bool {
        self.parent.is_some() || !self.children.is_empty()
    }

    /// Owned and inverse relations together.
    pub fn all_relations(&self) -> impl Iterator<Item = RelationId> + '_ {
        self.relations
            .iter()
            .chain(self.inverse_relations.iter())
            .copied()
    }

    /// Schema-qualified table name.
    pub fn qualified_table_name(&self) -> String {
        match &self.schema_name {
            Some(schema) => format!("{}.{}", schema, self.table_name),
            None => self.table_name.clone(),
        }
    }
}
