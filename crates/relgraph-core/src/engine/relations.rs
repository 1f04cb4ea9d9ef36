//! Relation inference from foreign keys.
//!
//! Every foreign key of a table T referencing P seeds a many-to-one from T to
//! P, upgraded to one-to-one when the key column is unique. Each relation then
//! gets exactly one inverse on P. The two legs of an association table get no
//! inverse: they are handed to the association pass instead.

use super::association;
use super::Workspace;
use crate::config::{AssociationConfig, ColumnConfig, InheritanceStrategy};
use crate::error::{Error, Result};
use crate::model::{
    Arity, AttributeId, AttributePair, Capabilities, Capability, EntityId, Relation, RelationId,
    RelationKind,
};
use crate::naming;
use crate::schema::{ForeignKey, Table, TableId};
use tracing::debug;

/// A many-to-one from an association table, waiting for synthesis.
#[derive(Debug, Clone)]
pub(super) struct Leg {
    pub relation: RelationId,
    pub target: EntityId,
    /// First referencing column.
    pub column: String,
    /// Highest ordinal position among the referencing columns.
    pub max_ordinal: u32,
}

/// An association table and its two legs, in foreign key order.
#[derive(Debug, Clone)]
pub(super) struct Association {
    pub middle: EntityId,
    pub left: Leg,
    pub right: Leg,
}

#[derive(Debug)]
struct ResolvedKey {
    fk: ForeignKey,
    column: String,
    target: EntityId,
    pairs: Vec<AttributePair>,
}

/// Build every foreign key relation and its inverse.
///
/// Returns the association tables found on the way.
pub(super) fn infer(ws: &mut Workspace<'_>) -> Result<Vec<Association>> {
    let metadata = ws.metadata;
    let ids: Vec<EntityId> = ws.model.entities().iter().map(|e| e.id).collect();
    let mut associations = Vec::new();

    for entity in ids {
        let table_id = ws.model.entity(entity).table;
        let table = metadata.table(table_id);

        let mut resolved = Vec::new();
        for fk in table.foreign_keys() {
            let Some(column) = fk.fk_columns().next().map(str::to_string) else {
                continue;
            };
            let Some(target) = resolve_target(ws, table_id, table, &fk, &column) else {
                continue;
            };
            if is_joined_parent_key(ws, entity, target, table, &fk) {
                debug!(table = %table.name, fk = %fk.name, "Skipping joined inheritance key");
                continue;
            }
            let Some(pairs) = resolve_pairs(ws, entity, target, table, &fk)? else {
                continue;
            };
            resolved.push(ResolvedKey {
                fk,
                column,
                target,
                pairs,
            });
        }

        let keys: Vec<&ForeignKey> = resolved.iter().map(|k| &k.fk).collect();
        let is_association = association::is_association_table(ws, entity, table, &keys);
        let mut legs = Vec::new();
        for key in &resolved {
            let relation = build_forward(ws, entity, table, key, is_association);
            if is_association {
                legs.push(Leg {
                    relation,
                    target: key.target,
                    column: key.column.clone(),
                    max_ordinal: key
                        .pairs
                        .iter()
                        .map(|p| ws.model.attribute(p.from).column.ordinal_position)
                        .max()
                        .unwrap_or(0),
                });
            } else {
                build_inverse(ws, entity, table, key, relation)?;
            }
        }

        if is_association {
            ws.model.entity_mut(entity).is_association = true;
            let mut legs = legs.into_iter();
            if let (Some(left), Some(right)) = (legs.next(), legs.next()) {
                associations.push(Association {
                    middle: entity,
                    left,
                    right,
                });
            }
        }
    }
    Ok(associations)
}

/// Entity referenced by a foreign key, honouring a configured target.
/// Dangling and ambiguous references are recorded and dropped.
fn resolve_target(
    ws: &mut Workspace<'_>,
    table_id: TableId,
    table: &Table,
    fk: &ForeignKey,
    column: &str,
) -> Option<EntityId> {
    let ctx = ws.ctx;
    if let Some(name) = ctx
        .column_config(table, column)
        .and_then(|c| c.target_entity_name.as_deref())
    {
        // an unknown configured target is reported by the consistency check
        return ws.model.entity_by_name(name).map(|e| e.id);
    }

    match ws.metadata.referenced_table(table_id, fk) {
        Ok(Some(referenced)) => match ws.entity_of(referenced) {
            Some(entity) => Some(entity),
            None => {
                debug!(fk = %fk.name, "Foreign key references a skipped table");
                None
            }
        },
        Ok(None) => {
            ws.diagnostics.warn(format!(
                "foreign key {} on table {} references missing table {}: relation skipped",
                fk.name,
                table.qualified_name(),
                fk.pk_table_name
            ));
            None
        }
        Err(err) => {
            ws.diagnostics.warn(format!(
                "foreign key {} on table {}: {}: set a target entity to resolve it",
                fk.name,
                table.qualified_name(),
                err
            ));
            None
        }
    }
}

/// Check if the key joins a JOINED child to its parent on the primary key.
fn is_joined_parent_key(
    ws: &Workspace<'_>,
    entity: EntityId,
    target: EntityId,
    table: &Table,
    fk: &ForeignKey,
) -> bool {
    let e = ws.model.entity(entity);
    e.parent == Some(target)
        && e.inheritance == Some(InheritanceStrategy::Joined)
        && fk.fk_columns().all(|c| table.is_primary_key(c))
}

fn resolve_pairs(
    ws: &mut Workspace<'_>,
    entity: EntityId,
    target: EntityId,
    table: &Table,
    fk: &ForeignKey,
) -> Result<Option<Vec<AttributePair>>> {
    let mut from = Vec::new();
    let mut to = Vec::new();
    for (fk_column, pk_column) in &fk.columns {
        let Some(from_attribute) = ws.model.attribute_by_column(entity, fk_column).map(|a| a.id)
        else {
            ws.diagnostics.warn(format!(
                "foreign key {} on table {} uses unknown column {}: relation skipped",
                fk.name, table.name, fk_column
            ));
            return Ok(None);
        };
        let Some(to_attribute) = ws.model.attribute_by_column(target, pk_column).map(|a| a.id)
        else {
            ws.diagnostics.warn(format!(
                "foreign key {} on table {} references unknown column {}.{}: relation skipped",
                fk.name,
                table.name,
                ws.model.entity(target).table_name,
                pk_column
            ));
            return Ok(None);
        };
        from.push(from_attribute);
        to.push(to_attribute);
    }
    pair_attributes(&fk.name, from, to).map(Some)
}

/// Zip both sides of a key in declared column order.
pub(super) fn pair_attributes(
    fk_name: &str,
    from: Vec<AttributeId>,
    to: Vec<AttributeId>,
) -> Result<Vec<AttributePair>> {
    if from.len() != to.len() || from.is_empty() {
        return Err(Error::PairingMismatch {
            fk_name: fk_name.to_string(),
            from: from.len(),
            to: to.len(),
        });
    }
    Ok(from
        .into_iter()
        .zip(to)
        .map(|(from, to)| AttributePair::new(from, to))
        .collect())
}

/// A simple key is one-to-one when its column carries a single-column unique
/// index or is the whole primary key. Explicit configuration wins.
fn is_one_to_one(table: &Table, fk: &ForeignKey, config: Option<&ColumnConfig>) -> bool {
    if config.is_some_and(|c| c.one_to_one.is_some()) {
        return true;
    }
    if config.is_some_and(|c| c.many_to_one.is_some()) || !fk.is_simple() {
        return false;
    }
    fk.fk_columns().all(|column| {
        table.has_unique_index_on(column)
            || (table.primary_keys.len() == 1 && table.is_primary_key(column))
    })
}

fn is_virtual(ws: &Workspace<'_>, table: &Table, config: Option<&ColumnConfig>) -> bool {
    config
        .and_then(|c| c.virtual_one_to_one)
        .or_else(|| {
            ws.ctx
                .entity_config(table)
                .and_then(|c| c.virtual_one_to_one)
        })
        .unwrap_or(ws.ctx.conventions().virtual_one_to_one)
}

pub(super) fn apply_association_config(
    capabilities: &mut Capabilities,
    config: Option<&AssociationConfig>,
) {
    let Some(config) = config else {
        return;
    };
    if let Some(fetch) = config.fetch {
        capabilities.insert(Capability::Fetch(fetch));
    }
    if !config.cascades.is_empty() {
        capabilities.insert(Capability::Cascades(config.cascades.clone()));
    }
}

/// Strip a trailing key marker from a column name: `dept_id` to `dept`,
/// `managerId` to `manager`.
fn strip_key_suffix(column: &str) -> &str {
    let lower = column.to_ascii_lowercase();
    for suffix in ["_id", "_fk", "_key"] {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            return &column[..column.len() - suffix.len()];
        }
    }
    match column.strip_suffix("Id") {
        Some(stem) if !stem.is_empty() => stem,
        _ => column,
    }
}

fn forward_var(
    ws: &Workspace<'_>,
    entity: EntityId,
    key: &ResolvedKey,
    config: Option<&AssociationConfig>,
) -> String {
    if let Some(explicit) = config.and_then(|c| c.var_name.clone()) {
        return explicit;
    }
    let target_var = ws.model.entity(key.target).var.clone();
    if !key.fk.is_simple() {
        return target_var;
    }

    let naming = ws.ctx.naming();
    let stem = strip_key_suffix(&naming.rename_column(&key.column)).to_string();
    let var = naming.var_name(&stem);
    let column_var = ws
        .model
        .attribute_by_column(entity, &key.column)
        .map(|a| a.var.as_str());
    if stem.is_empty() || column_var == Some(var.as_str()) {
        target_var
    } else {
        var
    }
}

fn build_forward(
    ws: &mut Workspace<'_>,
    entity: EntityId,
    table: &Table,
    key: &ResolvedKey,
    is_association: bool,
) -> RelationId {
    let ctx = ws.ctx;
    let config = ctx.column_config(table, &key.column);
    let one_to_one = !is_association && is_one_to_one(table, &key.fk, config);

    let mut virtual_one_to_one = one_to_one && is_virtual(ws, table, config);
    if virtual_one_to_one && ws.model.entity(key.target).primary_key.is_composite() {
        ws.diagnostics.warn(format!(
            "entity '{}' has a composite primary key and cannot hold a virtual one-to-one: {} stays one-to-one",
            ws.model.entity(key.target).name,
            key.fk.name
        ));
        virtual_one_to_one = false;
    }

    let kind = if one_to_one && !virtual_one_to_one {
        RelationKind::OneToOne
    } else {
        RelationKind::ManyToOne
    };
    let association_config =
        config.and_then(|c| c.one_to_one.as_ref().or(c.many_to_one.as_ref()));

    let var = forward_var(ws, entity, key, association_config);
    let var = ws.unique_var(entity, var, Some(key.column.as_str()));
    let mut relation = Relation::new(
        kind,
        Arity::from_pairs(key.pairs.clone()),
        entity,
        key.target,
        key.fk.name.clone(),
        var,
    );
    if virtual_one_to_one {
        relation.capabilities.insert(Capability::VirtualOneToOne);
    }
    apply_association_config(&mut relation.capabilities, association_config);

    debug!(
        fk = %key.fk.name,
        kind = %relation.kind,
        var = %relation.var,
        "Built relation"
    );
    ws.model.add_relation(relation)
}

fn build_inverse(
    ws: &mut Workspace<'_>,
    entity: EntityId,
    table: &Table,
    key: &ResolvedKey,
    relation: RelationId,
) -> Result<()> {
    let ctx = ws.ctx;
    let config = ctx.column_config(table, &key.column);
    let forward = ws.model.relation(relation);
    let inverse_kind = forward.kind.inverse(forward.is_virtual_one_to_one());
    let entity_var = ws.model.entity(entity).var.clone();

    let (association_config, var) = if inverse_kind.is_to_many() {
        let config = config.and_then(|c| c.one_to_many.as_ref());
        let var = config
            .and_then(|c| c.collection_var())
            .unwrap_or_else(|| naming::pluralize(&entity_var));
        (config, var)
    } else {
        let config = config.and_then(|c| c.inverse_one_to_one.as_ref());
        let var = config
            .and_then(|c| c.var_name.clone())
            .unwrap_or(entity_var);
        (config, var)
    };

    let var = ws.unique_var(key.target, var, Some(key.column.as_str()));
    let inverse = ws.model.build_inverse(relation, var)?;
    apply_association_config(
        &mut ws.model.relation_mut(inverse).capabilities,
        association_config,
    );
    Ok(())
}
