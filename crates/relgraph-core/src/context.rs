//! Resolution context threaded through every pass.

use crate::config::{
    ColumnConfig, Configuration, Conventions, DateMapping, EntityConfig, NumberMapping,
};
use crate::error::{Error, Result};
use crate::naming::NamingResolver;
use crate::schema::{Column, MappedType, Table};
use regex::Regex;

fn compile(pattern: Option<&String>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|source| Error::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .transpose()
}

#[derive(Debug, Clone)]
struct CompiledNumberMapping {
    pattern: Option<Regex>,
    rule: NumberMapping,
}

impl CompiledNumberMapping {
    fn matches(&self, column: &Column) -> bool {
        column.jdbc_type.is_numeric()
            && self.pattern.as_ref().map_or(true, |p| p.is_match(&column.name))
            && self.rule.max_size.map_or(true, |max| column.size <= max)
            && self
                .rule
                .max_decimal_digits
                .map_or(true, |max| column.decimal_digits <= max)
    }
}

#[derive(Debug, Clone)]
struct CompiledDateMapping {
    pattern: Option<Regex>,
    rule: DateMapping,
}

impl CompiledDateMapping {
    fn matches(&self, column: &Column) -> bool {
        column.jdbc_type.is_temporal()
            && self.pattern.as_ref().map_or(true, |p| p.is_match(&column.name))
            && self.rule.jdbc_type.map_or(true, |t| t == column.jdbc_type)
    }
}

/// Configuration, naming rules and compiled type mappings of one run.
///
/// Built once per resolution and shared by reference; nothing in it changes
/// while passes run.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    config: Configuration,
    naming: NamingResolver,
    number_mappings: Vec<CompiledNumberMapping>,
    date_mappings: Vec<CompiledDateMapping>,
}

impl ResolutionContext {
    /// Build a context, compiling every pattern of the configuration.
    pub fn new(config: Configuration) -> Result<Self> {
        let naming = NamingResolver::from_config(&config)?;
        let number_mappings = config
            .number_mappings
            .iter()
            .map(|rule| {
                Ok(CompiledNumberMapping {
                    pattern: compile(rule.column_name_pattern.as_ref())?,
                    rule: rule.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let date_mappings = config
            .date_mappings
            .iter()
            .map(|rule| {
                Ok(CompiledDateMapping {
                    pattern: compile(rule.column_name_pattern.as_ref())?,
                    rule: rule.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            naming,
            number_mappings,
            date_mappings,
        })
    }

    /// The configuration overlay.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Global conventions.
    pub fn conventions(&self) -> &Conventions {
        &self.config.conventions
    }

    /// Naming rules.
    pub fn naming(&self) -> &NamingResolver {
        &self.naming
    }

    /// Override for a table.
    pub fn entity_config(&self, table: &Table) -> Option<&EntityConfig> {
        self.config.entity(table.schema.as_deref(), &table.name)
    }

    /// Override for a column of a table.
    pub fn column_config(&self, table: &Table, column: &str) -> Option<&ColumnConfig> {
        self.entity_config(table).and_then(|e| e.column(column))
    }

    /// Type the column maps to before any enum or forced override.
    pub fn underlying_type(&self, column: &Column) -> MappedType {
        if let Some(m) = self.number_mappings.iter().find(|m| m.matches(column)) {
            return m.rule.mapped_type.clone();
        }
        if let Some(m) = self.date_mappings.iter().find(|m| m.matches(column)) {
            return m.rule.mapped_type.clone();
        }
        column.default_mapped_type()
    }

    /// Type of the attribute backed by `column`.
    ///
    /// A forced type wins, then an enum mapping, then the first matching
    /// number or date rule, then the type tag default.
    pub fn mapped_type(&self, column: &Column, column_config: Option<&ColumnConfig>) -> MappedType {
        if let Some(forced) = column_config.and_then(|c| c.mapped_type.clone()) {
            return forced;
        }
        if let Some(enum_config) = column_config.and_then(|c| c.enum_config.as_ref()) {
            return MappedType::Enum(enum_config.name.clone());
        }
        self.underlying_type(column)
    }
}
