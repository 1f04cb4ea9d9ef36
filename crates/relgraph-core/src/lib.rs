//! relgraph core - relational schema to object graph resolution.
//!
//! This crate turns extracted relational metadata (tables, columns, keys,
//! indexes) plus a configuration overlay into a cross-referenced model of
//! entities, attributes and typed relations, ready for a code generator.
//!
//! ```ignore
//! let metadata = Metadata::from_snapshot(snapshot)?;
//! let resolution = resolve(&metadata, Configuration::new())?;
//! for error in &resolution.report.errors {
//!     eprintln!("{}", error);
//! }
//! let model = resolution.into_model()?;
//! ```

pub mod account;
pub mod check;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod model;
pub mod naming;
pub mod schema;

pub use account::Account;
pub use check::ConsistencyChecker;
pub use config::{
    AssociationConfig, AssociationDirection, ColumnConfig, Configuration, Conventions,
    DateMapping, EntityConfig, EnumConfig, EnumKind, InheritanceConfig, InheritanceStrategy,
    NumberMapping, Renamer,
};
pub use context::ResolutionContext;
pub use engine::{resolve, Diagnostics, Pass, Resolution, Resolver};
pub use error::{Error, Result};
pub use model::{
    Arity, Attribute, AttributeFlags, AttributeId, AttributePair, Capabilities, Capability,
    CapabilityKey, CascadeType, Entity, EntityId, FetchType, Intermediate, Model, PrimaryKey,
    Relation, RelationId, RelationKind,
};
pub use naming::NamingResolver;
pub use schema::{
    Column, ForeignKey, ImportedKey, IndexHolder, IndexRow, JdbcType, MappedType, Metadata,
    MetadataSnapshot, Table, TableId, TableType,
};
