//! Output formatters for resolution results.

use clap::ValueEnum;
use comfy_table::Table;
use relgraph_core::{Account, Diagnostics, Model, PrimaryKey, Resolution};
use serde::Serialize;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a complete resolution.
    fn format_resolution(&self, resolution: &Resolution) -> Result<String, serde_json::Error>;

    /// Format the errors and warnings of a run.
    fn format_report(&self, report: &Diagnostics) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_resolution(&self, resolution: &Resolution) -> Result<String, serde_json::Error> {
        let model = &resolution.model;
        let mut output = entities_table(model);
        if !model.relations().is_empty() {
            output.push_str("\n\n");
            output.push_str(&relations_table(model));
        }
        if let Some(account) = &resolution.account {
            output.push_str(&format!(
                "\n\nAccount entity: {} (username: {}, password: {})",
                model.entity(account.entity).name,
                model.attribute(account.username).var,
                model.attribute(account.password).var
            ));
        }
        Ok(output)
    }

    fn format_report(&self, report: &Diagnostics) -> String {
        let mut lines = Vec::new();
        for error in &report.errors {
            lines.push(format!("error: {}", error));
        }
        for warning in &report.warnings {
            lines.push(format!("warning: {}", warning));
        }
        lines.push(format!(
            "{} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        ));
        lines.join("\n")
    }
}

fn describe_key(model: &Model, key: &PrimaryKey) -> String {
    match key {
        PrimaryKey::NoKey { .. } => "-".to_string(),
        PrimaryKey::Simple { var, .. } => var.clone(),
        PrimaryKey::Composite {
            attributes,
            type_name,
            ..
        } => {
            let columns: Vec<&str> = attributes
                .iter()
                .map(|id| model.attribute(*id).column_name())
                .collect();
            format!("{}({})", type_name, columns.join(", "))
        }
    }
}

fn entities_table(model: &Model) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Entity", "Table", "Key", "Attributes", "Parent", "Flags"]);

    for entity in model.entities() {
        let parent = entity
            .parent
            .map(|p| model.entity(p).name.clone())
            .unwrap_or_default();
        let flags = if entity.is_association {
            "association"
        } else {
            ""
        };
        table.add_row(vec![
            entity.name.clone(),
            entity.qualified_table_name(),
            describe_key(model, &entity.primary_key),
            entity.attributes.len().to_string(),
            parent,
            flags.to_string(),
        ]);
    }

    table.to_string()
}

fn relations_table(model: &Model) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Relation", "Kind", "Target", "Shape", "Inverse", "Foreign Key"]);

    for relation in model.relations() {
        let inverse = relation
            .inverse
            .map(|id| {
                let inverse = model.relation(id);
                format!("{}.{}", model.entity(inverse.from_entity).name, inverse.var)
            })
            .unwrap_or_default();
        table.add_row(vec![
            format!("{}.{}", model.entity(relation.from_entity).name, relation.var),
            relation.kind.to_string(),
            model.entity(relation.to_entity).name.clone(),
            relation.arity.shape().to_string(),
            inverse,
            relation.fk_name.clone(),
        ]);
    }

    table.to_string()
}

/// JSON formatter.
pub struct JsonFormatter;

#[derive(Serialize)]
struct Document<'a> {
    model: &'a Model,
    report: &'a Diagnostics,
    account: Option<&'a Account>,
}

impl Formatter for JsonFormatter {
    fn format_resolution(&self, resolution: &Resolution) -> Result<String, serde_json::Error> {
        let document = Document {
            model: &resolution.model,
            report: &resolution.report,
            account: resolution.account.as_ref(),
        };
        serde_json::to_string_pretty(&document)
    }

    fn format_report(&self, report: &Diagnostics) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::{resolve, Column, Configuration, JdbcType, Metadata};

    fn resolution() -> Resolution {
        let metadata = Metadata::new(vec![
            relgraph_core::Table::new("DEPARTMENT")
                .with_column(Column::new("id", JdbcType::Integer).not_null())
                .with_primary_key(["id"]),
            relgraph_core::Table::new("EMPLOYEE")
                .with_column(Column::new("id", JdbcType::Integer).not_null())
                .with_column(Column::new("dept_id", JdbcType::Integer))
                .with_primary_key(["id"])
                .with_foreign_key("fk_emp_dept", "DEPARTMENT", [("dept_id", "id")]),
        ])
        .unwrap();
        resolve(&metadata, Configuration::new()).unwrap()
    }

    #[test]
    fn test_table_output_lists_entities_and_relations() {
        let output = TableFormatter.format_resolution(&resolution()).unwrap();
        assert!(output.contains("Employee"));
        assert!(output.contains("Employee.dept"));
        assert!(output.contains("many-to-one"));
        assert!(output.contains("Department.employees"));
    }

    #[test]
    fn test_json_output_is_valid() {
        let output = JsonFormatter.format_resolution(&resolution()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["model"]["entities"].as_array().unwrap().len(), 2);
        assert!(value["report"]["errors"].as_array().unwrap().is_empty());
        assert!(value["account"].is_null());
    }

    #[test]
    fn test_report_summary() {
        let mut report = Diagnostics::new();
        report.error("broken");
        report.warn("odd");
        let output = TableFormatter.format_report(&report);
        assert_eq!(output, "error: broken\nwarning: odd\n1 error(s), 1 warning(s)");
    }
}
