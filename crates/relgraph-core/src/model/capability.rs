//! Typed extension slots attached to relations.
//!
//! Each capability has a fixed key; a relation holds at most one value per key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fetch strategy of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchType {
    Lazy,
    Eager,
}

/// Operation cascaded across a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeType {
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

/// Key of a capability slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CapabilityKey {
    Fetch,
    Cascades,
    VirtualOneToOne,
}

/// A capability value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Capability {
    /// Configured fetch strategy.
    Fetch(FetchType),
    /// Configured cascades.
    Cascades(Vec<CascadeType>),
    /// One-to-one cardinality carried by a one-to-many mapping.
    VirtualOneToOne,
}

impl Capability {
    /// The slot this capability occupies.
    pub fn key(&self) -> CapabilityKey {
        match self {
            Capability::Fetch(_) => CapabilityKey::Fetch,
            Capability::Cascades(_) => CapabilityKey::Cascades,
            Capability::VirtualOneToOne => CapabilityKey::VirtualOneToOne,
        }
    }
}

/// Capabilities of one relation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities(BTreeMap<CapabilityKey, Capability>);

impl Capabilities {
    /// Set a capability, replacing any previous value in the same slot.
    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability.key(), capability);
    }

    /// Get the capability in a slot.
    pub fn get(&self, key: CapabilityKey) -> Option<&Capability> {
        self.0.get(&key)
    }

    /// Check if a slot is populated.
    pub fn contains(&self, key: CapabilityKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Configured fetch strategy.
    pub fn fetch(&self) -> Option<FetchType> {
        match self.get(CapabilityKey::Fetch) {
            Some(Capability::Fetch(fetch)) => Some(*fetch),
            _ => None,
        }
    }

    /// Configured cascades.
    pub fn cascades(&self) -> &[CascadeType] {
        match self.get(CapabilityKey::Cascades) {
            Some(Capability::Cascades(cascades)) => cascades,
            _ => &[],
        }
    }

    /// Check if the relation is a virtual one-to-one.
    pub fn is_virtual_one_to_one(&self) -> bool {
        self.contains(CapabilityKey::VirtualOneToOne)
    }

    /// Iterate over populated slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_replace() {
        let mut caps = Capabilities::default();
        caps.insert(Capability::Fetch(FetchType::Lazy));
        caps.insert(Capability::Fetch(FetchType::Eager));

        assert_eq!(caps.fetch(), Some(FetchType::Eager));
        assert_eq!(caps.iter().count(), 1);
    }

    #[test]
    fn test_typed_accessors() {
        let mut caps = Capabilities::default();
        assert!(caps.cascades().is_empty());
        assert!(!caps.is_virtual_one_to_one());

        caps.insert(Capability::Cascades(vec![CascadeType::Persist, CascadeType::Merge]));
        caps.insert(Capability::VirtualOneToOne);

        assert_eq!(caps.cascades(), &[CascadeType::Persist, CascadeType::Merge]);
        assert!(caps.is_virtual_one_to_one());
        assert!(caps.fetch().is_none());
    }
}
