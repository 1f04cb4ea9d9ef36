//! Primary key variants.

use super::AttributeId;
use crate::error::{Error, Result};
use serde::Serialize;

/// Primary key of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PrimaryKey {
    /// The table declares no primary key.
    NoKey {
        /// Entity name, for error messages.
        entity: String,
    },
    /// One column.
    Simple {
        /// Backing attribute.
        attribute: AttributeId,
        /// Accessor name (the attribute's variable name).
        var: String,
    },
    /// Several columns, wrapped in a generated key type.
    Composite {
        /// Backing attributes in ordinal order.
        attributes: Vec<AttributeId>,
        /// Accessor name, from the identifiable-property convention.
        var: String,
        /// Generated key type name.
        type_name: String,
    },
}

impl PrimaryKey {
    /// Check if there is no key.
    pub fn is_no_pk(&self) -> bool {
        matches!(self, PrimaryKey::NoKey { .. })
    }

    /// Check if the key has one column.
    pub fn is_simple(&self) -> bool {
        matches!(self, PrimaryKey::Simple { .. })
    }

    /// Check if the key has several columns.
    pub fn is_composite(&self) -> bool {
        matches!(self, PrimaryKey::Composite { .. })
    }

    /// The single backing attribute of a simple key.
    pub fn attribute(&self) -> Result<AttributeId> {
        match self {
            PrimaryKey::Simple { attribute, .. } => Ok(*attribute),
            PrimaryKey::NoKey { entity } => Err(Error::NoPrimaryKey {
                entity: entity.clone(),
            }),
            PrimaryKey::Composite { type_name, .. } => Err(Error::CompositePrimaryKey {
                key: type_name.clone(),
            }),
        }
    }

    /// Every backing attribute, in key order.
    pub fn attributes(&self) -> Result<&[AttributeId]> {
        match self {
            PrimaryKey::Simple { attribute, .. } => Ok(std::slice::from_ref(attribute)),
            PrimaryKey::Composite { attributes, .. } => Ok(attributes),
            PrimaryKey::NoKey { entity } => Err(Error::NoPrimaryKey {
                entity: entity.clone(),
            }),
        }
    }

    /// Accessor name of the key.
    pub fn var(&self) -> Result<&str> {
        match self {
            PrimaryKey::Simple { var, .. } | PrimaryKey::Composite { var, .. } => Ok(var),
            PrimaryKey::NoKey { entity } => Err(Error::NoPrimaryKey {
                entity: entity.clone(),
            }),
        }
    }

    /// Backing attributes, empty for a missing key.
    pub fn attributes_or_empty(&self) -> &[AttributeId] {
        self.attributes().unwrap_or(&[])
    }
}
