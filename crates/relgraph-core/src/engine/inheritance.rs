//! Inheritance wiring from configured parents.

use super::Workspace;
use crate::error::Error;
use crate::model::EntityId;
use tracing::debug;

/// Link every configured child to its parent and stamp the hierarchy
/// strategy on each member.
///
/// Unknown parents are left to the consistency check. A link that would
/// close a cycle is refused and recorded as an error.
pub(super) fn link(ws: &mut Workspace<'_>) {
    let metadata = ws.metadata;
    let ctx = ws.ctx;
    let ids: Vec<EntityId> = ws.model.entities().iter().map(|e| e.id).collect();

    for child in &ids {
        let table = metadata.table(ws.model.entity(*child).table);
        let Some(config) = ctx.entity_config(table).and_then(|c| c.inheritance.as_ref()) else {
            continue;
        };
        let Some(parent) = ws
            .model
            .entity_by_name(&config.parent_entity)
            .or_else(|| ws.model.entity_by_table(&config.parent_entity))
            .map(|e| e.id)
        else {
            continue;
        };

        if parent == *child || ws.model.ancestors(parent).contains(child) {
            let entity = ws.model.entity(*child).name.clone();
            ws.diagnostics
                .error(Error::InheritanceCycle { entity }.to_string());
            continue;
        }

        debug!(
            child = %ws.model.entity(*child).name,
            parent = %ws.model.entity(parent).name,
            "Linked hierarchy"
        );
        let entity = ws.model.entity_mut(*child);
        entity.parent = Some(parent);
        entity.inheritance = Some(config.strategy);
        ws.model.entity_mut(parent).children.push(*child);
    }

    for entity in &ids {
        let Some(strategy) = ws.model.entity(*entity).inheritance else {
            continue;
        };
        let root = ws.model.root_of(*entity);
        match ws.model.entity(root).inheritance {
            None => ws.model.entity_mut(root).inheritance = Some(strategy),
            Some(existing) if existing != strategy => {
                let message = format!(
                    "entity '{}' declares {:?} inheritance but its hierarchy uses {:?}",
                    ws.model.entity(*entity).name,
                    strategy,
                    existing
                );
                ws.diagnostics.warn(message);
            }
            Some(_) => {}
        }
    }
}
