//! Schema model: tables, columns, keys and indexes handed over by the
//! metadata extractor.
//!
//! The model is built once and read-only thereafter.

mod column;
mod metadata;
mod table;
mod types;

pub use column::Column;
pub use metadata::{Metadata, MetadataSnapshot, TableId};
pub use table::{ForeignKey, ImportedKey, IndexHolder, IndexRow, Table, TableType};
pub use types::{JdbcType, MappedType};
