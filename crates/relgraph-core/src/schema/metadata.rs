//! Read-only schema snapshot with name-based lookup.

use super::table::{ForeignKey, Table};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Index of a table inside a [`Metadata`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableId(pub usize);

/// Raw extraction output, as handed over by the metadata extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    /// Extracted tables.
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// The schema model: immutable once built.
#[derive(Debug, Clone)]
pub struct Metadata {
    tables: Vec<Table>,
    /// Lowercased table name to every table carrying it.
    by_name: HashMap<String, Vec<TableId>>,
}

fn lower(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Metadata {
    /// Build the schema model, validating column and foreign key invariants.
    pub fn new(tables: Vec<Table>) -> Result<Self> {
        let mut by_name: HashMap<String, Vec<TableId>> = HashMap::new();
        let mut qualified = HashSet::new();

        for (index, table) in tables.iter().enumerate() {
            let key = (table.schema.as_deref().map(lower), lower(&table.name));
            if !qualified.insert(key) {
                return Err(Error::DuplicateTable {
                    name: table.qualified_name(),
                });
            }

            let mut columns = HashSet::new();
            for column in &table.columns {
                if !columns.insert(lower(&column.name)) {
                    return Err(Error::DuplicateColumn {
                        table: table.qualified_name(),
                        column: column.name.clone(),
                    });
                }
            }

            for row in &table.imported_keys {
                let consistent = table.imported_keys.iter().all(|other| {
                    other.fk_name != row.fk_name
                        || (other.pk_table_name.eq_ignore_ascii_case(&row.pk_table_name)
                            && other.pk_table_schema == row.pk_table_schema)
                });
                if !consistent {
                    return Err(Error::InconsistentForeignKey {
                        table: table.qualified_name(),
                        fk_name: row.fk_name.clone(),
                    });
                }
            }

            by_name
                .entry(lower(&table.name))
                .or_default()
                .push(TableId(index));
        }

        Ok(Self { tables, by_name })
    }

    /// Build the schema model from a raw snapshot.
    ///
    /// Columns reported without an ordinal position get their 1-based index.
    pub fn from_snapshot(mut snapshot: MetadataSnapshot) -> Result<Self> {
        for table in &mut snapshot.tables {
            for (index, column) in table.columns.iter_mut().enumerate() {
                if column.ordinal_position == 0 {
                    column.ordinal_position = index as u32 + 1;
                }
            }
        }
        Self::new(snapshot.tables)
    }

    /// All tables in extraction order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Table ids in extraction order.
    pub fn table_ids(&self) -> impl Iterator<Item = TableId> {
        (0..self.tables.len()).map(TableId)
    }

    /// Get a table by id.
    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    /// Look up a table by unqualified name.
    ///
    /// Fails with [`Error::AmbiguousTable`] when several schemas carry the name.
    pub fn find(&self, name: &str) -> Result<Option<TableId>> {
        match self.by_name.get(&lower(name)).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([single]) => Ok(Some(*single)),
            Some(_) => Err(Error::AmbiguousTable {
                name: name.to_string(),
            }),
        }
    }

    /// Look up a table by schema and name. A missing schema falls back to
    /// unqualified lookup.
    pub fn find_in_schema(&self, schema: Option<&str>, name: &str) -> Result<Option<TableId>> {
        let Some(schema) = schema else {
            return self.find(name);
        };
        Ok(self.by_name.get(&lower(name)).and_then(|ids| {
            ids.iter().copied().find(|id| {
                self.table(*id)
                    .schema
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(schema))
            })
        }))
    }

    /// Resolve the table referenced by a foreign key declared on `owner`.
    ///
    /// An unqualified reference is first tried in the owner's own schema so
    /// that identically named tables elsewhere do not make it ambiguous.
    pub fn referenced_table(&self, owner: TableId, fk: &ForeignKey) -> Result<Option<TableId>> {
        if fk.pk_table_schema.is_some() {
            return self.find_in_schema(fk.pk_table_schema.as_deref(), &fk.pk_table_name);
        }
        let owner_schema = self.table(owner).schema.as_deref();
        if owner_schema.is_some() {
            if let Some(id) = self.find_in_schema(owner_schema, &fk.pk_table_name)? {
                return Ok(Some(id));
            }
        }
        self.find(&fk.pk_table_name)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the snapshot holds no table.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
