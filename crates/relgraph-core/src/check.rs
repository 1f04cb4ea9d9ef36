//! Consistency checks on a resolved model.
//!
//! Each check records every problem it finds and never stops at the first
//! one. Errors make the model unusable; warnings are informational.

use crate::config::{EntityConfig, EnumKind, InheritanceStrategy};
use crate::context::ResolutionContext;
use crate::engine::Diagnostics;
use crate::model::{Attribute, Model};
use crate::schema::{Metadata, Table};
use tracing::debug;

/// Validates a resolved model against its configuration and schema.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyChecker<'a> {
    metadata: &'a Metadata,
    ctx: &'a ResolutionContext,
}

impl<'a> ConsistencyChecker<'a> {
    /// Create a checker.
    pub fn new(metadata: &'a Metadata, ctx: &'a ResolutionContext) -> Self {
        Self { metadata, ctx }
    }

    /// Run every check. The result is sorted.
    pub fn check(&self, model: &Model) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for entity_config in &self.ctx.config().entities {
            self.check_entity_config(model, entity_config, &mut diagnostics);
        }
        self.check_ordinal_enums(model, &mut diagnostics);
        self.check_pair_types(model, &mut diagnostics);
        self.check_joined_versions(model, &mut diagnostics);
        diagnostics.sort();

        debug!(
            errors = diagnostics.errors.len(),
            warnings = diagnostics.warnings.len(),
            "Consistency check done"
        );
        diagnostics
    }

    fn find_table(&self, config: &EntityConfig) -> Option<&'a Table> {
        self.metadata
            .tables()
            .iter()
            .find(|t| config.matches(t.schema.as_deref(), &t.name))
    }

    /// Every configured table, column and referenced entity must exist.
    fn check_entity_config(
        &self,
        model: &Model,
        config: &EntityConfig,
        diagnostics: &mut Diagnostics,
    ) {
        let display = config.display_name();
        let Some(table) = self.find_table(config) else {
            let table = match &config.schema_name {
                Some(schema) => format!("{}.{}", schema, config.table_name),
                None => config.table_name.clone(),
            };
            diagnostics.error(format!(
                "entity '{}' not found: table {} does not exist",
                display, table
            ));
            return;
        };

        for column in &config.columns {
            if table.column(&column.column_name).is_none() {
                diagnostics.error(format!(
                    "field '{}' of entity '{}' not found: column {}.{} does not exist",
                    column.field_name.as_deref().unwrap_or(&column.column_name),
                    display,
                    table.name,
                    column.column_name
                ));
            }
            if let Some(target) = &column.target_entity_name {
                if model.entity_by_name(target).is_none() {
                    diagnostics.error(format!(
                        "target entity '{}' of column {}.{} not found",
                        target, table.name, column.column_name
                    ));
                }
            }
        }

        if let Some(inheritance) = &config.inheritance {
            let parent = &inheritance.parent_entity;
            if model.entity_by_name(parent).is_none() && model.entity_by_table(parent).is_none() {
                diagnostics.error(format!(
                    "parent entity '{}' of entity '{}' not found",
                    parent, display
                ));
            }
        }
    }

    /// ORDINAL enums are stored as positions and need a numeric column.
    fn check_ordinal_enums(&self, model: &Model, diagnostics: &mut Diagnostics) {
        for attribute in model.attributes() {
            let Some(enum_config) = &attribute.enum_config else {
                continue;
            };
            if enum_config.kind != EnumKind::Ordinal {
                continue;
            }
            let underlying = self.ctx.underlying_type(&attribute.column);
            if !underlying.is_numeric() {
                diagnostics.error(format!(
                    "enum '{}' of {} is ORDINAL but its column maps to non-numeric type {}",
                    enum_config.name,
                    describe(model, attribute),
                    underlying
                ));
            }
        }
    }

    /// Both ends of every owned, column-backed relation should share a type.
    fn check_pair_types(&self, model: &Model, diagnostics: &mut Diagnostics) {
        for relation in model.relations() {
            if relation.is_inverse || relation.is_intermediate() {
                continue;
            }
            for pair in relation.attribute_pairs() {
                let from = model.attribute(pair.from);
                let to = model.attribute(pair.to);
                if from.mapped_type == to.mapped_type {
                    continue;
                }
                if from.flags.in_composite_pk || to.flags.in_composite_pk {
                    diagnostics.warn(format!(
                        "type mismatch on composite primary key member: {} is {} but references {} of type {}; the key type will not compile until both types agree",
                        describe(model, from),
                        from.mapped_type,
                        describe(model, to),
                        to.mapped_type
                    ));
                } else {
                    diagnostics.warn(format!(
                        "type mismatch in relation '{}': {} is {} but references {} of type {}",
                        relation.var,
                        describe(model, from),
                        from.mapped_type,
                        describe(model, to),
                        to.mapped_type
                    ));
                }
            }
        }
    }

    /// In a JOINED hierarchy only the root may carry a version column.
    fn check_joined_versions(&self, model: &Model, diagnostics: &mut Diagnostics) {
        for entity in model.entities() {
            if entity.is_root() {
                continue;
            }
            let root = model.entity(model.root_of(entity.id));
            if root.inheritance != Some(InheritanceStrategy::Joined) {
                continue;
            }
            for attribute in model.attributes_of(entity.id).filter(|a| a.flags.version) {
                diagnostics.error(format!(
                    "version column '{}' is not allowed on entity '{}': in a JOINED hierarchy only the root entity '{}' may declare one",
                    attribute.column_name(),
                    entity.name,
                    root.name
                ));
            }
        }
    }
}

fn describe(model: &Model, attribute: &Attribute) -> String {
    format!(
        "{}.{}",
        model.entity(attribute.entity).name,
        attribute.var
    )
}
