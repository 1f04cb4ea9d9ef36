//! Typed relations between entities.

use super::capability::Capabilities;
use super::{AttributeId, EntityId, RelationId};
use crate::error::{Error, Result};
use crate::naming;
use serde::Serialize;
use std::fmt;

/// Cardinality variant of a relation, seen from its `from` side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationKind {
    ManyToOne,
    OneToMany,
    OneToOne,
    /// One-to-one cardinality mapped as a one-to-many and exposed through
    /// one-valued accessors.
    OneToVirtualOne,
    ManyToMany,
}

impl RelationKind {
    /// Kind of the complementary relation.
    ///
    /// A many-to-one flagged as virtual one-to-one is inverted into a
    /// one-to-virtual-one instead of a one-to-many.
    pub fn inverse(self, virtual_one_to_one: bool) -> RelationKind {
        match self {
            RelationKind::ManyToOne if virtual_one_to_one => RelationKind::OneToVirtualOne,
            RelationKind::ManyToOne => RelationKind::OneToMany,
            RelationKind::OneToMany => RelationKind::ManyToOne,
            RelationKind::OneToOne => RelationKind::OneToOne,
            RelationKind::OneToVirtualOne => RelationKind::ManyToOne,
            RelationKind::ManyToMany => RelationKind::ManyToMany,
        }
    }

    /// Check if the `from` side sees a collection.
    pub fn is_to_many(self) -> bool {
        matches!(self, RelationKind::OneToMany | RelationKind::ManyToMany)
    }

    /// Check if the `from` side sees a single value.
    pub fn is_to_one(self) -> bool {
        !self.is_to_many()
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::ManyToOne => write!(f, "many-to-one"),
            RelationKind::OneToMany => write!(f, "one-to-many"),
            RelationKind::OneToOne => write!(f, "one-to-one"),
            RelationKind::OneToVirtualOne => write!(f, "one-to-virtual-one"),
            RelationKind::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

/// Column-level correspondence backing one leg of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AttributePair {
    /// Attribute on the `from` entity.
    pub from: AttributeId,
    /// Attribute on the `to` entity.
    pub to: AttributeId,
}

impl AttributePair {
    /// Create a pair.
    pub fn new(from: AttributeId, to: AttributeId) -> Self {
        Self { from, to }
    }

    /// The same pair seen from the other side.
    pub fn inverted(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// Middle table of a many-to-many relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Intermediate {
    /// Entity of the association table.
    pub middle_entity: EntityId,
    /// Many-to-one from the middle entity to the `from` side.
    pub middle_to_left: RelationId,
    /// Many-to-one from the middle entity to the `to` side.
    pub middle_to_right: RelationId,
}

impl Intermediate {
    /// The same middle table seen from the other side.
    pub fn inverted(self) -> Self {
        Self {
            middle_entity: self.middle_entity,
            middle_to_left: self.middle_to_right,
            middle_to_right: self.middle_to_left,
        }
    }
}

/// What backs a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Arity {
    /// One attribute pair.
    Simple(AttributePair),
    /// Several attribute pairs, in foreign key column order.
    Composite(Vec<AttributePair>),
    /// An association table.
    Intermediate(Intermediate),
}

impl Arity {
    /// Build from zipped pairs: one pair is simple, more are composite.
    pub fn from_pairs(mut pairs: Vec<AttributePair>) -> Self {
        if pairs.len() == 1 {
            Arity::Simple(pairs.remove(0))
        } else {
            Arity::Composite(pairs)
        }
    }

    /// The same backing seen from the other side.
    pub fn inverted(&self) -> Self {
        match self {
            Arity::Simple(pair) => Arity::Simple(pair.inverted()),
            Arity::Composite(pairs) => {
                Arity::Composite(pairs.iter().map(|p| p.inverted()).collect())
            }
            Arity::Intermediate(intermediate) => Arity::Intermediate(intermediate.inverted()),
        }
    }

    /// Short name of the backing shape.
    pub fn shape(&self) -> &'static str {
        match self {
            Arity::Simple(_) => "simple",
            Arity::Composite(_) => "composite",
            Arity::Intermediate(_) => "intermediate",
        }
    }
}

/// A resolved relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    /// Arena id.
    pub id: RelationId,
    /// Cardinality variant.
    pub kind: RelationKind,
    /// Backing pairs or middle table.
    pub arity: Arity,
    /// Entity holding the accessor.
    pub from_entity: EntityId,
    /// Entity the accessor points to.
    pub to_entity: EntityId,
    /// Foreign key constraint the relation was inferred from.
    pub fk_name: String,
    /// Accessor variable name on the `from` entity.
    pub var: String,
    /// Getter name.
    pub getter: String,
    /// Setter name.
    pub setter: String,
    /// Complementary relation.
    pub inverse: Option<RelationId>,
    /// Whether this relation was built as the inverse of another one.
    pub is_inverse: bool,
    /// Typed extension slots.
    pub capabilities: Capabilities,
}

impl Relation {
    /// Create a relation without inverse. The id is assigned by the model.
    pub fn new(
        kind: RelationKind,
        arity: Arity,
        from_entity: EntityId,
        to_entity: EntityId,
        fk_name: impl Into<String>,
        var: impl Into<String>,
    ) -> Self {
        let var = var.into();
        Self {
            id: RelationId(usize::MAX),
            kind,
            arity,
            from_entity,
            to_entity,
            fk_name: fk_name.into(),
            getter: naming::getter(&var),
            setter: naming::setter(&var),
            var,
            inverse: None,
            is_inverse: false,
            capabilities: Capabilities::default(),
        }
    }

    fn single_pair(&self) -> Result<AttributePair> {
        match &self.arity {
            Arity::Simple(pair) => Ok(*pair),
            other => Err(Error::SingleAttributeAccessor {
                relation: self.var.clone(),
                shape: other.shape(),
            }),
        }
    }

    /// Attribute on the `from` side of a simple relation.
    pub fn from_attribute(&self) -> Result<AttributeId> {
        self.single_pair().map(|p| p.from)
    }

    /// Attribute on the `to` side of a simple relation.
    pub fn to_attribute(&self) -> Result<AttributeId> {
        self.single_pair().map(|p| p.to)
    }

    /// Every backing pair. Intermediate relations carry their pairs on the
    /// middle legs and return an empty slice.
    pub fn attribute_pairs(&self) -> &[AttributePair] {
        match &self.arity {
            Arity::Simple(pair) => std::slice::from_ref(pair),
            Arity::Composite(pairs) => pairs,
            Arity::Intermediate(_) => &[],
        }
    }

    /// Middle table of a many-to-many relation.
    pub fn intermediate(&self) -> Option<&Intermediate> {
        match &self.arity {
            Arity::Intermediate(intermediate) => Some(intermediate),
            _ => None,
        }
    }

    /// Check if backed by one pair.
    pub fn is_simple(&self) -> bool {
        matches!(self.arity, Arity::Simple(_))
    }

    /// Check if backed by several pairs.
    pub fn is_composite(&self) -> bool {
        matches!(self.arity, Arity::Composite(_))
    }

    /// Check if backed by an association table.
    pub fn is_intermediate(&self) -> bool {
        matches!(self.arity, Arity::Intermediate(_))
    }

    /// Check if the relation models one-to-one through a one-to-many mapping.
    pub fn is_virtual_one_to_one(&self) -> bool {
        self.capabilities.is_virtual_one_to_one()
    }

    /// Rename the accessor.
    pub fn set_var(&mut self, var: impl Into<String>) {
        self.var = var.into();
        self.getter = naming::getter(&self.var);
        self.setter = naming::setter(&self.var);
    }
}
