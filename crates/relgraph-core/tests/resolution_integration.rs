//! Integration tests for the resolution engine.

use pretty_assertions::assert_eq;
use relgraph_core::{
    resolve, Column, Configuration, Conventions, EntityConfig, Error, InheritanceStrategy,
    JdbcType, Metadata, Model, NamingResolver, RelationKind, Table,
};

fn id_table(name: &str) -> Table {
    Table::new(name)
        .with_column(Column::new("id", JdbcType::Integer).not_null())
        .with_primary_key(["id"])
}

fn setup_account_schema() -> Metadata {
    Metadata::new(vec![
        Table::new("ACCOUNT")
            .with_column(Column::new("id", JdbcType::Integer).not_null())
            .with_column(Column::new("login", JdbcType::Varchar).with_size(64))
            .with_column(Column::new("password", JdbcType::Varchar).with_size(128))
            .with_primary_key(["id"])
            .with_unique_index("uq_account_login", ["login"]),
        Table::new("ROLE")
            .with_column(Column::new("id", JdbcType::Integer).not_null())
            .with_column(Column::new("name", JdbcType::Varchar))
            .with_primary_key(["id"]),
        Table::new("ACCOUNT_ROLE")
            .with_column(Column::new("account_id", JdbcType::Integer).not_null())
            .with_column(Column::new("role_id", JdbcType::Integer).not_null())
            .with_primary_key(["account_id", "role_id"])
            .with_foreign_key("fk_ar_account", "ACCOUNT", [("account_id", "id")])
            .with_foreign_key("fk_ar_role", "ROLE", [("role_id", "id")]),
    ])
    .unwrap()
}

fn assert_inverses_involutive(model: &Model) {
    for relation in model.relations() {
        let Some(inverse) = relation.inverse else {
            continue;
        };
        let inverse = model.relation(inverse);
        assert_eq!(inverse.inverse, Some(relation.id));
        assert_eq!(inverse.from_entity, relation.to_entity);
        assert_eq!(inverse.to_entity, relation.from_entity);
    }
}

#[test]
fn test_association_table_yields_one_many_to_many() {
    let resolution = resolve(&setup_account_schema(), Configuration::new()).unwrap();
    assert!(resolution.is_success());
    let model = resolution.into_model().unwrap();

    let account = model.entity_by_name("Account").unwrap();
    let role = model.entity_by_name("Role").unwrap();
    let middle = model.entity_by_name("AccountRole").unwrap();
    assert!(middle.is_association);

    let many_to_many: Vec<_> = model
        .relations()
        .iter()
        .filter(|r| r.kind == RelationKind::ManyToMany && !r.is_inverse)
        .collect();
    assert_eq!(many_to_many.len(), 1);

    let owning = many_to_many[0];
    assert_eq!(owning.from_entity, account.id);
    assert_eq!(owning.to_entity, role.id);
    assert_eq!(owning.var, "roles");
    assert_eq!(owning.intermediate().unwrap().middle_entity, middle.id);

    let inverse = model.relation(owning.inverse.unwrap());
    assert_eq!(inverse.kind, RelationKind::ManyToMany);
    assert_eq!(inverse.var, "accounts");
    assert_inverses_involutive(&model);
}

#[test]
fn test_unique_foreign_key_is_one_to_one_both_ways() {
    let metadata = Metadata::new(vec![
        id_table("DEPARTMENT"),
        Table::new("EMPLOYEE")
            .with_column(Column::new("id", JdbcType::Integer).not_null())
            .with_column(Column::new("dept_id", JdbcType::Integer))
            .with_primary_key(["id"])
            .with_foreign_key("fk_emp_dept", "DEPARTMENT", [("dept_id", "id")])
            .with_unique_index("uq_emp_dept", ["dept_id"]),
    ])
    .unwrap();
    let model = resolve(&metadata, Configuration::new())
        .unwrap()
        .into_model()
        .unwrap();

    let employee = model.entity_by_name("Employee").unwrap();
    let department = model.entity_by_name("Department").unwrap();

    let forward = model.relations_of(employee.id).next().unwrap();
    assert_eq!(forward.kind, RelationKind::OneToOne);
    assert_eq!(forward.to_entity, department.id);
    assert_eq!(forward.var, "dept");

    let inverse = model.relation(forward.inverse.unwrap());
    assert_eq!(inverse.kind, RelationKind::OneToOne);
    assert_eq!(inverse.from_entity, department.id);
    assert!(inverse.is_inverse);
    assert_inverses_involutive(&model);
}

#[test]
fn test_version_on_joined_child_is_an_error() {
    let metadata = Metadata::new(vec![
        Table::new("PARENT_TABLE")
            .with_column(Column::new("id", JdbcType::Integer).not_null())
            .with_column(Column::new("label", JdbcType::Varchar))
            .with_primary_key(["id"]),
        Table::new("CHILD_TABLE")
            .with_column(Column::new("id", JdbcType::Integer).not_null())
            .with_column(Column::new("version", JdbcType::Integer))
            .with_primary_key(["id"])
            .with_foreign_key("fk_child_parent", "PARENT_TABLE", [("id", "id")]),
    ])
    .unwrap();
    let config = Configuration::new().with_entity(
        EntityConfig::new("CHILD_TABLE").extends("ParentTable", InheritanceStrategy::Joined),
    );

    let resolution = resolve(&metadata, config).unwrap();
    assert!(!resolution.is_success());
    assert_eq!(resolution.report.errors.len(), 1);
    assert!(resolution.report.errors[0].contains("version"));
    assert!(resolution.report.errors[0].contains("ChildTable"));

    let model = &resolution.model;
    let child = model.entity_by_name("ChildTable").unwrap();
    let parent = model.entity_by_name("ParentTable").unwrap();
    assert_eq!(child.parent, Some(parent.id));
    assert_eq!(model.relations_of(child.id).count(), 0);
    assert_eq!(model.inverse_relations_of(parent.id).count(), 0);

    match resolution.into_model() {
        Err(Error::Consistency { errors }) => assert_eq!(errors.len(), 1),
        other => panic!("expected consistency error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_dangling_foreign_key_only_warns() {
    let metadata = Metadata::new(vec![
        id_table("CUSTOMER"),
        Table::new("INVOICE")
            .with_column(Column::new("id", JdbcType::Integer).not_null())
            .with_column(Column::new("customer_id", JdbcType::Integer))
            .with_column(Column::new("archive_id", JdbcType::Integer))
            .with_primary_key(["id"])
            .with_foreign_key("fk_inv_customer", "CUSTOMER", [("customer_id", "id")])
            .with_foreign_key("fk_inv_archive", "ARCHIVE", [("archive_id", "id")]),
    ])
    .unwrap();
    let resolution = resolve(&metadata, Configuration::new()).unwrap();

    assert!(resolution.is_success());
    assert!(resolution
        .report
        .warnings
        .iter()
        .any(|w| w.contains("fk_inv_archive")));

    let model = resolution.into_model().unwrap();
    let invoice = model.entity_by_name("Invoice").unwrap();
    assert_eq!(model.attributes_of(invoice.id).count(), 3);
    assert_eq!(model.relations_of(invoice.id).count(), 1);
}

#[test]
fn test_simple_key_accessors() {
    let model = resolve(&setup_account_schema(), Configuration::new())
        .unwrap()
        .into_model()
        .unwrap();

    let account = model.entity_by_name("Account").unwrap();
    let key = model.identity_key(account.id);
    assert!(key.is_simple());
    assert_eq!(key.var().unwrap(), "id");
    assert_eq!(model.attribute(key.attribute().unwrap()).column_name(), "id");
    assert_eq!(key.attributes().unwrap(), &[key.attribute().unwrap()]);

    let middle = model.entity_by_name("AccountRole").unwrap();
    let key = model.identity_key(middle.id);
    assert!(key.is_composite());
    assert!(key.attribute().is_err());
    assert_eq!(key.attributes().unwrap().len(), 2);
}

#[test]
fn test_equal_types_report_no_mismatch() {
    let resolution = resolve(&setup_account_schema(), Configuration::new()).unwrap();
    assert!(resolution.report.errors.is_empty());
    assert!(resolution
        .report
        .warnings
        .iter()
        .all(|w| !w.contains("type mismatch")));
}

#[test]
fn test_naming_is_idempotent() {
    let naming = NamingResolver::from_config(&Configuration::new()).unwrap();
    for raw in ["ACCOUNT_ROLE", "order_line", "Customer"] {
        let name = naming.type_name(raw);
        assert_eq!(naming.type_name(&name), name);
    }
    for raw in ["first_name", "DEPT_ID", "createdAt"] {
        let var = naming.var_name(raw);
        assert_eq!(naming.var_name(&var), var);
    }
}

#[test]
fn test_account_convention() {
    let config =
        Configuration::new().with_conventions(Conventions::default().with_account_detection());
    let resolution = resolve(&setup_account_schema(), config).unwrap();
    let account = resolution.account.clone().unwrap();
    let model = resolution.into_model().unwrap();

    assert_eq!(model.entity(account.entity).name, "Account");
    assert_eq!(model.attribute(account.username).column_name(), "login");
    assert!(account.roles.is_some());
}
