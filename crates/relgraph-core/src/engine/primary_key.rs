//! Primary key classification and version column detection.

use super::Workspace;
use crate::model::{AttributeId, EntityId, PrimaryKey};
use tracing::debug;

/// Classify the key of every entity, then flag version columns.
pub(super) fn classify(ws: &mut Workspace<'_>) {
    let ids: Vec<EntityId> = ws.model.entities().iter().map(|e| e.id).collect();
    for entity in ids {
        classify_entity(ws, entity);
        detect_version(ws, entity);
    }
}

fn classify_entity(ws: &mut Workspace<'_>, entity: EntityId) {
    let table = ws.metadata.table(ws.model.entity(entity).table);

    let mut key: Vec<(u32, AttributeId)> = Vec::new();
    for column in &table.primary_keys {
        match ws.model.attribute_by_column(entity, column) {
            Some(attribute) => key.push((attribute.column.ordinal_position, attribute.id)),
            None => ws.diagnostics.warn(format!(
                "primary key column {}.{} does not exist",
                table.name, column
            )),
        }
    }
    key.sort_by_key(|(ordinal, _)| *ordinal);
    let attributes: Vec<AttributeId> = key.into_iter().map(|(_, id)| id).collect();

    let primary_key = match attributes.as_slice() {
        [] => PrimaryKey::NoKey {
            entity: ws.model.entity(entity).name.clone(),
        },
        [single] => {
            ws.model.attribute_mut(*single).flags.simple_pk = true;
            PrimaryKey::Simple {
                attribute: *single,
                var: ws.model.attribute(*single).var.clone(),
            }
        }
        several => {
            for id in several {
                ws.model.attribute_mut(*id).flags.in_composite_pk = true;
            }
            let name = &ws.model.entity(entity).name;
            PrimaryKey::Composite {
                attributes: several.to_vec(),
                var: ws
                    .ctx
                    .naming()
                    .var_name(&ws.ctx.conventions().identifiable_property),
                type_name: format!("{}Pk", name),
            }
        }
    };

    debug!(
        entity = %ws.model.entity(entity).name,
        simple = primary_key.is_simple(),
        composite = primary_key.is_composite(),
        "Classified primary key"
    );
    ws.model.entity_mut(entity).primary_key = primary_key;
}

/// Flag the version column of a simple-key entity. Explicit column
/// configuration wins over the naming convention.
fn detect_version(ws: &mut Workspace<'_>, entity: EntityId) {
    let table = ws.metadata.table(ws.model.entity(entity).table);
    let simple = ws.model.entity(entity).primary_key.is_simple();
    let conventions = ws.ctx.conventions();

    let mut candidates = Vec::new();
    for attribute in ws.model.attributes_of(entity) {
        if attribute.is_in_pk() {
            continue;
        }
        let configured = ws
            .ctx
            .column_config(table, attribute.column_name())
            .and_then(|c| c.version);
        let is_version = match configured {
            Some(flag) => flag,
            None => {
                conventions.is_version_column(attribute.column_name())
                    && attribute.mapped_type.is_versionable()
            }
        };
        if is_version {
            candidates.push((attribute.id, configured.is_some()));
        }
    }

    let entity_name = ws.model.entity(entity).name.clone();
    let Some(&(chosen, _)) = candidates
        .iter()
        .find(|(_, explicit)| *explicit)
        .or_else(|| candidates.first())
    else {
        return;
    };

    if !simple {
        ws.diagnostics.warn(format!(
            "entity '{}' has no simple primary key: version column {} is ignored",
            entity_name,
            ws.model.attribute(chosen).column_name()
        ));
        return;
    }
    for (other, _) in candidates.iter().filter(|(id, _)| *id != chosen) {
        ws.diagnostics.warn(format!(
            "entity '{}' already has a version column: {} is not used as version",
            entity_name,
            ws.model.attribute(*other).column_name()
        ));
    }
    ws.model.attribute_mut(chosen).flags.version = true;
}

#[cfg(test)]
mod tests {
    use crate::config::{ColumnConfig, Configuration, Conventions, EntityConfig};
    use crate::context::ResolutionContext;
    use crate::engine::{Named, Pass};
    use crate::error::Error;
    use crate::schema::{Column, JdbcType, Metadata, Table};

    fn metadata() -> Metadata {
        Metadata::new(vec![
            Table::new("ACCOUNT")
                .with_column(Column::new("id", JdbcType::BigInt).not_null())
                .with_column(Column::new("login", JdbcType::Varchar))
                .with_column(Column::new("version", JdbcType::Integer))
                .with_primary_key(["id"]),
            Table::new("LINE")
                .with_column(Column::new("line_no", JdbcType::Integer).not_null())
                .with_column(Column::new("order_id", JdbcType::Integer).not_null())
                .with_column(Column::new("version", JdbcType::Integer))
                .with_primary_key(["order_id", "line_no"]),
            Table::new("LOG").with_column(Column::new("message", JdbcType::Varchar)),
        ])
        .unwrap()
    }

    #[test]
    fn test_key_variants() {
        let ctx = ResolutionContext::new(Configuration::new()).unwrap();
        let metadata = metadata();
        let pass = Pass::<Named>::name(&metadata, &ctx).unwrap().classify_keys();
        let model = pass.model();

        let account = model.entity_by_name("Account").unwrap();
        let pk = &account.primary_key;
        assert!(pk.is_simple() && !pk.is_composite() && !pk.is_no_pk());
        let id = pk.attribute().unwrap();
        assert_eq!(model.attribute(id).column_name(), "id");
        assert!(model.attribute(id).flags.simple_pk);
        assert_eq!(pk.var().unwrap(), "id");

        let line = model.entity_by_name("Line").unwrap();
        let pk = &line.primary_key;
        assert!(pk.is_composite());
        assert!(matches!(pk.attribute(), Err(Error::CompositePrimaryKey { .. })));
        // ordinal order, not declared key order
        let columns: Vec<&str> = pk
            .attributes()
            .unwrap()
            .iter()
            .map(|id| model.attribute(*id).column_name())
            .collect();
        assert_eq!(columns, vec!["line_no", "order_id"]);
        assert_eq!(pk.var().unwrap(), "id");
        if let crate::model::PrimaryKey::Composite { type_name, .. } = pk {
            assert_eq!(type_name, "LinePk");
        }

        let log = model.entity_by_name("Log").unwrap();
        assert!(log.primary_key.is_no_pk());
        assert!(matches!(
            log.primary_key.attribute(),
            Err(Error::NoPrimaryKey { .. })
        ));
    }

    #[test]
    fn test_version_detection() {
        let ctx = ResolutionContext::new(Configuration::new()).unwrap();
        let metadata = metadata();
        let pass = Pass::<Named>::name(&metadata, &ctx).unwrap().classify_keys();
        let model = pass.model();

        let account = model.entity_by_name("Account").unwrap();
        let version = model.attribute_by_column(account.id, "version").unwrap();
        assert!(version.flags.version);

        let line = model.entity_by_name("Line").unwrap();
        let version = model.attribute_by_column(line.id, "version").unwrap();
        assert!(!version.flags.version);
        assert!(pass
            .diagnostics()
            .warnings
            .iter()
            .any(|w| w.contains("'Line' has no simple primary key")));
    }

    #[test]
    fn test_identifiable_property_and_explicit_version() {
        let config = Configuration::new()
            .with_conventions(Conventions::default().with_identifiable_property("key"))
            .with_entity(
                EntityConfig::new("ACCOUNT")
                    .with_column(ColumnConfig::new("version").with_version(false))
                    .with_column(ColumnConfig::new("login").with_version(true)),
            );
        let ctx = ResolutionContext::new(config).unwrap();
        let metadata = metadata();
        let pass = Pass::<Named>::name(&metadata, &ctx).unwrap().classify_keys();
        let model = pass.model();

        let line = model.entity_by_name("Line").unwrap();
        assert_eq!(line.primary_key.var().unwrap(), "key");

        let account = model.entity_by_name("Account").unwrap();
        assert!(model.attribute_by_column(account.id, "login").unwrap().flags.version);
        assert!(!model.attribute_by_column(account.id, "version").unwrap().flags.version);
    }
}
