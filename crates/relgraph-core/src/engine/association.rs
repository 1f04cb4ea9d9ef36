//! Association (middle) table detection and many-to-many synthesis.

use super::relations::{apply_association_config, Association, Leg};
use super::Workspace;
use crate::config::AssociationDirection;
use crate::error::Result;
use crate::model::{Arity, EntityId, Intermediate, Relation, RelationKind};
use crate::naming;
use crate::schema::{ForeignKey, Table};
use tracing::debug;

/// Check if a table only implements a many-to-many association.
///
/// The table needs exactly two resolved foreign keys. Unless forced by
/// configuration, every other column must belong to one of those two keys
/// or be a version column. A surrogate primary key blocks detection.
pub(super) fn is_association_table(
    ws: &mut Workspace<'_>,
    entity: EntityId,
    table: &Table,
    keys: &[&ForeignKey],
) -> bool {
    let forced = ws
        .ctx
        .entity_config(table)
        .and_then(|c| c.association_table);
    if forced == Some(false) {
        return false;
    }
    if keys.len() != 2 {
        if forced == Some(true) {
            ws.diagnostics.warn(format!(
                "table {} is configured as association table but has {} resolved foreign key(s) instead of 2",
                table.qualified_name(),
                keys.len()
            ));
        }
        return false;
    }
    if ws.model.entity(entity).has_inheritance() {
        return false;
    }
    if forced == Some(true) {
        return true;
    }

    let conventions = ws.ctx.conventions();
    table.columns.iter().all(|c| {
        keys.iter()
            .any(|fk| fk.fk_columns().any(|column| c.is_named(column)))
            || conventions.is_version_column(&c.name)
    })
}

/// Pick (owning, inverse) legs. Configured directions win; otherwise the leg
/// whose columns come last in the table is the inverse side.
fn orient<'l>(ws: &Workspace<'_>, table: &Table, association: &'l Association) -> (&'l Leg, &'l Leg) {
    let direction = |leg: &Leg| {
        ws.ctx
            .column_config(table, &leg.column)
            .map(|c| c.association_direction)
            .unwrap_or_default()
    };
    let (left, right) = (&association.left, &association.right);
    match (direction(left), direction(right)) {
        (AssociationDirection::Inverse, _) | (_, AssociationDirection::Direct) => (right, left),
        (_, AssociationDirection::Inverse) | (AssociationDirection::Direct, _) => (left, right),
        _ if left.max_ordinal > right.max_ordinal => (right, left),
        _ => (left, right),
    }
}

/// Build one many-to-many relation, and its inverse, per association table.
pub(super) fn synthesize(ws: &mut Workspace<'_>, associations: Vec<Association>) -> Result<()> {
    let metadata = ws.metadata;
    let ctx = ws.ctx;

    for association in &associations {
        let middle = association.middle;
        let table = metadata.table(ws.model.entity(middle).table);
        let (direct, inverse) = orient(ws, table, association);
        let owner = direct.target;
        let other = inverse.target;
        let middle_name = ws.model.entity(middle).name.clone();

        // the column referencing a side names the collection of that side
        let owning_config = ctx
            .column_config(table, &inverse.column)
            .and_then(|c| c.many_to_many.as_ref());
        let inverse_config = ctx
            .column_config(table, &direct.column)
            .and_then(|c| c.inverse_many_to_many.as_ref());

        let var = owning_config
            .and_then(|c| c.collection_var())
            .unwrap_or_else(|| naming::pluralize(&ws.model.entity(other).var));
        let var = ws.unique_var(owner, var, Some(middle_name.as_str()));

        let mut relation = Relation::new(
            RelationKind::ManyToMany,
            Arity::Intermediate(Intermediate {
                middle_entity: middle,
                middle_to_left: direct.relation,
                middle_to_right: inverse.relation,
            }),
            owner,
            other,
            ws.model.relation(inverse.relation).fk_name.clone(),
            var,
        );
        apply_association_config(&mut relation.capabilities, owning_config);
        let relation = ws.model.add_relation(relation);

        let inverse_var = inverse_config
            .and_then(|c| c.collection_var())
            .unwrap_or_else(|| naming::pluralize(&ws.model.entity(owner).var));
        let inverse_var = ws.unique_var(other, inverse_var, Some(middle_name.as_str()));
        let inverse_relation = ws.model.build_inverse(relation, inverse_var)?;
        apply_association_config(
            &mut ws.model.relation_mut(inverse_relation).capabilities,
            inverse_config,
        );

        debug!(
            middle = %middle_name,
            owner = %ws.model.entity(owner).name,
            inverse = %ws.model.entity(other).name,
            "Synthesized many-to-many"
        );
    }
    Ok(())
}
