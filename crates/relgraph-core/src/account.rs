//! Account entity convention.
//!
//! Best-effort detection of the entity holding user credentials, based on
//! well-known column names. Only runs when enabled in the conventions.

use crate::model::{Attribute, AttributeId, EntityId, Model, RelationId, RelationKind};
use crate::schema::MappedType;
use serde::Serialize;
use tracing::debug;

const USERNAME_COLUMNS: &[&str] = &["login", "username", "user_name", "login_name", "user_login"];
const PASSWORD_COLUMNS: &[&str] = &["password", "passwd", "pwd", "user_password", "password_hash"];
const EMAIL_COLUMNS: &[&str] = &["email", "mail", "email_address", "user_email"];
const ENABLED_COLUMNS: &[&str] = &["enabled", "is_enabled", "active", "is_active"];
const ROLE_NAME_COLUMNS: &[&str] = &["name", "role_name", "authority", "role", "code"];

/// The detected account entity and its credential attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub entity: EntityId,
    pub username: AttributeId,
    pub password: AttributeId,
    pub email: Option<AttributeId>,
    pub enabled: Option<AttributeId>,
    /// Many-to-many relation to the role entity.
    pub roles: Option<RelationId>,
    /// Attribute naming a role on the role entity.
    pub role_name: Option<AttributeId>,
}

fn find<'m>(
    model: &'m Model,
    entity: EntityId,
    names: &[&str],
    accept: impl Fn(&Attribute) -> bool,
) -> Option<&'m Attribute> {
    names.iter().find_map(|name| {
        model
            .attributes_of(entity)
            .find(|a| a.column_name().eq_ignore_ascii_case(name) && accept(*a))
    })
}

fn is_text(attribute: &Attribute) -> bool {
    attribute.mapped_type == MappedType::String
}

/// Find the first entity with a username (or email) and a password column.
pub fn detect(model: &Model) -> Option<Account> {
    for entity in model.entities().iter().filter(|e| !e.is_association) {
        let email = find(model, entity.id, EMAIL_COLUMNS, is_text);
        let Some(username) = find(model, entity.id, USERNAME_COLUMNS, is_text).or(email) else {
            continue;
        };
        let Some(password) = find(model, entity.id, PASSWORD_COLUMNS, is_text) else {
            continue;
        };
        let enabled = find(model, entity.id, ENABLED_COLUMNS, |a| {
            a.mapped_type == MappedType::Boolean
        });

        let mut roles = None;
        let mut role_name = None;
        for id in entity.all_relations() {
            let relation = model.relation(id);
            if relation.kind != RelationKind::ManyToMany {
                continue;
            }
            if let Some(name) = find(model, relation.to_entity, ROLE_NAME_COLUMNS, is_text) {
                roles = Some(id);
                role_name = Some(name.id);
                break;
            }
        }

        debug!(entity = %entity.name, roles = roles.is_some(), "Detected account entity");
        return Some(Account {
            entity: entity.id,
            username: username.id,
            password: password.id,
            email: email.map(|a| a.id),
            enabled: enabled.map(|a| a.id),
            roles,
            role_name,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, Conventions};
    use crate::engine::resolve;
    use crate::schema::{Column, JdbcType, Metadata, Table};

    fn metadata() -> Metadata {
        Metadata::new(vec![
            Table::new("ROLE")
                .with_column(Column::new("id", JdbcType::Integer).not_null())
                .with_column(Column::new("name", JdbcType::Varchar))
                .with_primary_key(["id"]),
            Table::new("USERS")
                .with_column(Column::new("id", JdbcType::Integer).not_null())
                .with_column(Column::new("login", JdbcType::Varchar))
                .with_column(Column::new("password", JdbcType::Varchar))
                .with_column(Column::new("email", JdbcType::Varchar))
                .with_column(Column::new("is_enabled", JdbcType::Boolean))
                .with_primary_key(["id"]),
            Table::new("USERS_ROLE")
                .with_column(Column::new("users_id", JdbcType::Integer).not_null())
                .with_column(Column::new("role_id", JdbcType::Integer).not_null())
                .with_foreign_key("fk_ur_user", "USERS", [("users_id", "id")])
                .with_foreign_key("fk_ur_role", "ROLE", [("role_id", "id")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_account_detected_when_enabled() {
        let config =
            Configuration::new().with_conventions(Conventions::default().with_account_detection());
        let resolution = resolve(&metadata(), config).unwrap();
        let model = &resolution.model;
        let account = resolution.account.clone().unwrap();

        assert_eq!(model.entity(account.entity).name, "Users");
        assert_eq!(model.attribute(account.username).column_name(), "login");
        assert_eq!(model.attribute(account.password).column_name(), "password");
        assert!(account.email.is_some());
        assert!(account.enabled.is_some());
        let roles = model.relation(account.roles.unwrap());
        assert_eq!(roles.var, "roles");
        assert_eq!(model.attribute(account.role_name.unwrap()).column_name(), "name");
    }

    #[test]
    fn test_account_detection_disabled_by_default() {
        let resolution = resolve(&metadata(), Configuration::new()).unwrap();
        assert!(resolution.account.is_none());
    }

    #[test]
    fn test_no_password_no_account() {
        let metadata = Metadata::new(vec![Table::new("PERSON")
            .with_column(Column::new("id", JdbcType::Integer))
            .with_column(Column::new("login", JdbcType::Varchar))])
        .unwrap();
        let model = resolve(&metadata, Configuration::new()).unwrap().model;
        assert!(detect(&model).is_none());
    }
}
