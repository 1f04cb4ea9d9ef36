//! Resolved domain model.
//!
//! Entities, attributes and relations live in flat arenas owned by [`Model`]
//! and refer to each other by id, so that back-references (relation and
//! inverse, parent and children) need no shared ownership.

mod attribute;
mod capability;
mod entity;
mod primary_key;
mod relation;

pub use attribute::{Attribute, AttributeFlags};
pub use capability::{Capabilities, Capability, CapabilityKey, CascadeType, FetchType};
pub use entity::Entity;
pub use primary_key::PrimaryKey;
pub use relation::{Arity, AttributePair, Intermediate, Relation, RelationKind};

use crate::error::{Error, Result};
use serde::Serialize;

/// Entity arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub usize);

/// Attribute arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AttributeId(pub usize);

/// Relation arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RelationId(pub usize);

/// The resolved entity/attribute/relation graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Model {
    entities: Vec<Entity>,
    attributes: Vec<Attribute>,
    relations: Vec<Relation>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entities in resolution order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// All relations, inverses included.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Get an entity by id.
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    /// Get an attribute by id.
    pub fn attribute(&self, id: AttributeId) -> &Attribute {
        &self.attributes[id.0]
    }

    /// Get a relation by id.
    pub fn relation(&self, id: RelationId) -> &Relation {
        &self.relations[id.0]
    }

    /// Get an entity by type name.
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Get the first entity backed by a table name (case-insensitive).
    pub fn entity_by_table(&self, table_name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.table_name.eq_ignore_ascii_case(table_name))
    }

    /// Attributes of an entity, in column ordinal order.
    pub fn attributes_of(&self, entity: EntityId) -> impl Iterator<Item = &Attribute> {
        self.entity(entity)
            .attributes
            .iter()
            .map(move |id| self.attribute(*id))
    }

    /// Get the attribute backed by a column (case-insensitive).
    pub fn attribute_by_column(&self, entity: EntityId, column: &str) -> Option<&Attribute> {
        self.attributes_of(entity)
            .find(|a| a.column.is_named(column))
    }

    /// Relations owned by an entity.
    pub fn relations_of(&self, entity: EntityId) -> impl Iterator<Item = &Relation> {
        self.entity(entity)
            .relations
            .iter()
            .map(move |id| self.relation(*id))
    }

    /// Inverse relations held by an entity.
    pub fn inverse_relations_of(&self, entity: EntityId) -> impl Iterator<Item = &Relation> {
        self.entity(entity)
            .inverse_relations
            .iter()
            .map(move |id| self.relation(*id))
    }

    /// Root of the hierarchy an entity belongs to (itself when it has no parent).
    pub fn root_of(&self, entity: EntityId) -> EntityId {
        let mut current = entity;
        let mut steps = 0;
        while let Some(parent) = self.entity(current).parent {
            current = parent;
            steps += 1;
            if steps > self.entities.len() {
                break;
            }
        }
        current
    }

    /// Ancestors of an entity, nearest first.
    pub fn ancestors(&self, entity: EntityId) -> Vec<EntityId> {
        let mut ancestors = Vec::new();
        let mut current = self.entity(entity).parent;
        while let Some(parent) = current {
            if parent == entity || ancestors.contains(&parent) {
                break;
            }
            ancestors.push(parent);
            current = self.entity(parent).parent;
        }
        ancestors
    }

    /// Descendants of an entity, depth first.
    pub fn descendants(&self, entity: EntityId) -> Vec<EntityId> {
        let mut descendants = Vec::new();
        let mut stack: Vec<EntityId> = self.entity(entity).children.iter().rev().copied().collect();
        while let Some(child) = stack.pop() {
            if child == entity || descendants.contains(&child) {
                continue;
            }
            descendants.push(child);
            stack.extend(self.entity(child).children.iter().rev().copied());
        }
        descendants
    }

    /// Primary key carrying the identity of an entity: its root's key.
    pub fn identity_key(&self, entity: EntityId) -> &PrimaryKey {
        &self.entity(self.root_of(entity)).primary_key
    }

    /// Attributes relevant to equality: the business key when configured,
    /// the primary key otherwise.
    pub fn identity_attributes(&self, entity: EntityId) -> Vec<AttributeId> {
        let e = self.entity(entity);
        if e.business_key.is_empty() {
            e.primary_key.attributes_or_empty().to_vec()
        } else {
            e.business_key.clone()
        }
    }

    /// Relations going from `from` to `to`, inverses included.
    pub fn relations_between(&self, from: EntityId, to: EntityId) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|r| r.from_entity == from && r.to_entity == to)
            .collect()
    }

    /// Check if an accessor name is already used on an entity.
    pub fn is_var_taken(&self, entity: EntityId, var: &str) -> bool {
        self.attributes_of(entity).any(|a| a.var == var)
            || self
                .entity(entity)
                .all_relations()
                .any(|id| self.relation(id).var == var)
    }

    /// Build the complementary relation of `relation` and link both ways.
    ///
    /// Fails when `relation` is itself an inverse or already has one.
    pub fn build_inverse(
        &mut self,
        relation: RelationId,
        var: impl Into<String>,
    ) -> Result<RelationId> {
        let source = self.relation(relation);
        if source.is_inverse {
            return Err(Error::InverseOfInverse {
                relation: source.var.clone(),
            });
        }
        if source.inverse.is_some() {
            return Err(Error::InverseAlreadyBuilt {
                relation: source.var.clone(),
            });
        }

        let virtual_one_to_one = source.is_virtual_one_to_one();
        let mut inverse = Relation::new(
            source.kind.inverse(virtual_one_to_one),
            source.arity.inverted(),
            source.to_entity,
            source.from_entity,
            source.fk_name.clone(),
            var,
        );
        if virtual_one_to_one {
            inverse.capabilities.insert(Capability::VirtualOneToOne);
        }
        inverse.inverse = Some(relation);
        inverse.is_inverse = true;

        let inverse_id = self.add_relation(inverse);
        self.relations[relation.0].inverse = Some(inverse_id);
        Ok(inverse_id)
    }

    pub(crate) fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub(crate) fn add_attribute(&mut self, mut attribute: Attribute) -> AttributeId {
        let id = AttributeId(self.attributes.len());
        attribute.id = id;
        self.entities[attribute.entity.0].attributes.push(id);
        self.attributes.push(attribute);
        id
    }

    /// Register a relation on its `from` entity, as owned or inverse.
    pub(crate) fn add_relation(&mut self, mut relation: Relation) -> RelationId {
        let id = RelationId(self.relations.len());
        relation.id = id;
        let from = &mut self.entities[relation.from_entity.0];
        if relation.is_inverse {
            from.inverse_relations.push(id);
        } else {
            from.relations.push(id);
        }
        self.relations.push(relation);
        id
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }

    pub(crate) fn attribute_mut(&mut self, id: AttributeId) -> &mut Attribute {
        &mut self.attributes[id.0]
    }

    pub(crate) fn relation_mut(&mut self, id: RelationId) -> &mut Relation {
        &mut self.relations[id.0]
    }
}
