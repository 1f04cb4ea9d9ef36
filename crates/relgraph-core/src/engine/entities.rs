//! Naming pass: one entity per table, one attribute per column.

use super::Workspace;
use crate::config::EntityConfig;
use crate::context::ResolutionContext;
use crate::error::Result;
use crate::model::{Attribute, AttributeId, Entity, EntityId};
use crate::schema::{Column, Table, TableId};
use heck::ToUpperCamelCase;
use std::collections::HashSet;
use tracing::debug;

/// Build entities in (schema, table) order.
pub(super) fn build(ws: &mut Workspace<'_>) -> Result<()> {
    let metadata = ws.metadata;
    let ctx = ws.ctx;

    let mut table_ids: Vec<TableId> = metadata.table_ids().collect();
    table_ids.sort_by_key(|id| {
        let table = metadata.table(*id);
        (
            table.schema.as_deref().map(str::to_lowercase),
            table.name.to_lowercase(),
        )
    });

    let mut taken: HashSet<String> = HashSet::new();
    for table_id in table_ids {
        let table = metadata.table(table_id);
        let config = ctx.entity_config(table);
        if config.is_some_and(|c| c.skip) {
            debug!(table = %table.qualified_name(), "Skipping table");
            continue;
        }

        let name = entity_name(ws, table, config, &taken);
        taken.insert(name.clone());
        let var = ctx.naming().var_name(&name);

        let mut entity = Entity::new(name, var, table_id, &table.name, table.schema.clone());
        entity.discriminator_value = config
            .and_then(|c| c.inheritance.as_ref())
            .and_then(|i| i.discriminator_value.clone());

        let entity_id = ws.model.add_entity(entity);
        ws.table_entities.insert(table_id, entity_id);
        add_attributes(ws, ctx, table, entity_id)?;
    }
    Ok(())
}

fn entity_name(
    ws: &mut Workspace<'_>,
    table: &Table,
    config: Option<&EntityConfig>,
    taken: &HashSet<String>,
) -> String {
    let base = match config.and_then(|c| c.entity_name.clone()) {
        Some(explicit) => explicit,
        None => ws.ctx.naming().type_name(&table.name),
    };
    if !taken.contains(&base) {
        return base;
    }

    let mut candidates = Vec::new();
    if let Some(schema) = &table.schema {
        candidates.push(format!("{}{}", base, schema.to_upper_camel_case()));
    }
    let name = candidates
        .into_iter()
        .find(|c| !taken.contains(c))
        .unwrap_or_else(|| {
            let mut n = 2;
            while taken.contains(&format!("{}{}", base, n)) {
                n += 1;
            }
            format!("{}{}", base, n)
        });
    ws.diagnostics.warn(format!(
        "entity name '{}' is already used: table {} is mapped to '{}'",
        base,
        table.qualified_name(),
        name
    ));
    name
}

fn add_attributes(
    ws: &mut Workspace<'_>,
    ctx: &ResolutionContext,
    table: &Table,
    entity_id: EntityId,
) -> Result<()> {
    let mut columns: Vec<&Column> = table.columns.iter().collect();
    columns.sort_by_key(|c| c.ordinal_position);

    for column in columns {
        let config = ctx.column_config(table, &column.name);
        if let Some(config) = config {
            config.check_association_conflict(&ws.model.entity(entity_id).name)?;
        }

        let is_key = table.is_primary_key(&column.name) || table.is_foreign_key(&column.name);
        if config.is_some_and(|c| c.ignore) {
            if is_key {
                ws.diagnostics.warn(format!(
                    "column {}.{} takes part in a key and cannot be ignored",
                    table.name, column.name
                ));
            } else {
                debug!(table = %table.name, column = %column.name, "Ignoring column");
                continue;
            }
        }

        let var = match config.and_then(|c| c.field_name.clone()) {
            Some(explicit) => explicit,
            None => ctx.naming().column_var(&column.name),
        };
        let var = ws.unique_var(entity_id, var, None);
        let mapped_type = ctx.mapped_type(column, config);

        let mut attribute = Attribute::new(
            AttributeId(usize::MAX),
            entity_id,
            column.clone(),
            var,
            mapped_type,
        );
        attribute.enum_config = config.and_then(|c| c.enum_config.clone());
        attribute.flags.foreign_key = table.is_foreign_key(&column.name);
        attribute.flags.unique = table.has_unique_index_on(&column.name);
        attribute.flags.business_key = config.is_some_and(|c| c.business_key);

        let business_key = attribute.flags.business_key;
        let attribute_id = ws.model.add_attribute(attribute);
        if business_key {
            ws.model.entity_mut(entity_id).business_key.push(attribute_id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::{ColumnConfig, Configuration, EntityConfig};
    use crate::context::ResolutionContext;
    use crate::engine::{Named, Pass};
    use crate::error::Error;
    use crate::schema::{Column, JdbcType, Metadata, Table};

    fn metadata() -> Metadata {
        Metadata::new(vec![
            Table::new("ORDER_LINE")
                .with_column(Column::new("id", JdbcType::Integer).not_null())
                .with_column(Column::new("class", JdbcType::Varchar))
                .with_column(Column::new("notes", JdbcType::Clob))
                .with_primary_key(["id"]),
            Table::new("AUDIT_LOG").with_column(Column::new("id", JdbcType::Integer)),
            Table::new("CUSTOMER")
                .in_schema("sales")
                .with_column(Column::new("id", JdbcType::Integer)),
            Table::new("CUSTOMER")
                .in_schema("crm")
                .with_column(Column::new("id", JdbcType::Integer)),
        ])
        .unwrap()
    }

    #[test]
    fn test_names_and_overrides() {
        let config = Configuration::new()
            .with_entity(EntityConfig::new("AUDIT_LOG").skipped())
            .with_entity(
                EntityConfig::new("ORDER_LINE")
                    .with_column(ColumnConfig::new("notes").ignored())
                    .with_column(ColumnConfig::new("id").ignored()),
            );
        let ctx = ResolutionContext::new(config).unwrap();
        let metadata = metadata();
        let pass = Pass::<Named>::name(&metadata, &ctx).unwrap();
        let model = pass.model();

        assert!(model.entity_by_table("AUDIT_LOG").is_none());
        let line = model.entity_by_name("OrderLine").unwrap();
        assert_eq!(line.var, "orderLine");
        assert_eq!(line.vars, "orderLines");
        let vars: Vec<&str> = model.attributes_of(line.id).map(|a| a.var.as_str()).collect();
        assert_eq!(vars, vec!["id", "myClass"]);
        let ignored: Vec<&String> = pass
            .diagnostics()
            .warnings
            .iter()
            .filter(|w| w.contains("cannot be ignored"))
            .collect();
        assert_eq!(ignored.len(), 1);
        assert!(ignored[0].contains("ORDER_LINE.id"));
    }

    #[test]
    fn test_entity_name_collision_uses_schema() {
        let ctx = ResolutionContext::new(Configuration::new()).unwrap();
        let metadata = metadata();
        let pass = Pass::<Named>::name(&metadata, &ctx).unwrap();
        let model = pass.model();

        // crm sorts before sales
        let crm = model.entity_by_name("Customer").unwrap();
        assert_eq!(crm.schema_name.as_deref(), Some("crm"));
        let sales = model.entity_by_name("CustomerSales").unwrap();
        assert_eq!(sales.schema_name.as_deref(), Some("sales"));
    }

    #[test]
    fn test_conflicting_association_config_rejected() {
        use crate::config::AssociationConfig;

        let config = Configuration::new().with_entity(
            EntityConfig::new("ORDER_LINE").with_column(
                ColumnConfig::new("class")
                    .with_many_to_one(AssociationConfig::named("a"))
                    .with_many_to_many(AssociationConfig::named("b")),
            ),
        );
        let ctx = ResolutionContext::new(config).unwrap();
        let metadata = metadata();

        assert!(matches!(
            Pass::<Named>::name(&metadata, &ctx),
            Err(Error::ConflictingAssociationConfig { .. })
        ));
    }
}
