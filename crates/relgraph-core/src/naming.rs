//! Naming and convention resolver.
//!
//! Raw SQL identifiers go through three steps:
//! 1. the first matching rename rule of the relevant scope (table or column),
//! 2. case conversion to a camel-case variable or pascal-case type name,
//! 3. escaping of identifiers colliding with reserved words.
//!
//! Every step is pure. Converting an already-converted identifier returns it
//! unchanged.

use crate::config::{Configuration, Renamer};
use crate::error::{Error, Result};
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use regex::Regex;
use std::collections::HashSet;

/// Target-language keywords and literals.
const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "record", "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "true", "try", "var", "void", "volatile", "while", "yield",
];

/// Type names that would shadow platform or framework types.
const RESERVED_TYPES: &[&str] = &[
    "Boolean", "Byte", "Character", "Class", "Column", "Date", "Double", "Entity", "Enum",
    "Error", "Exception", "Float", "Id", "Integer", "Iterable", "List", "Long", "Map", "Number",
    "Object", "Order", "Override", "Query", "Record", "Set", "Short", "String", "System",
    "Table", "Thread", "Version", "Void",
];

/// A compiled rename rule.
#[derive(Debug, Clone)]
struct CompiledRenamer {
    pattern: Regex,
    replacement: String,
}

impl CompiledRenamer {
    fn compile(renamer: &Renamer) -> Result<Self> {
        let pattern = Regex::new(&renamer.pattern).map_err(|source| Error::InvalidPattern {
            pattern: renamer.pattern.clone(),
            source,
        })?;
        Ok(Self {
            pattern,
            replacement: renamer.replacement.clone(),
        })
    }
}

fn compile_all(renamers: &[Renamer]) -> Result<Vec<CompiledRenamer>> {
    renamers.iter().map(CompiledRenamer::compile).collect()
}

fn apply_first(renamers: &[CompiledRenamer], raw: &str) -> String {
    renamers
        .iter()
        .find(|r| r.pattern.is_match(raw))
        .map(|r| r.pattern.replace_all(raw, r.replacement.as_str()).into_owned())
        .unwrap_or_else(|| raw.to_string())
}

/// Turns raw table and column names into target identifiers.
#[derive(Debug, Clone)]
pub struct NamingResolver {
    table_renamers: Vec<CompiledRenamer>,
    column_renamers: Vec<CompiledRenamer>,
    reserved_vars: HashSet<String>,
    reserved_types: HashSet<String>,
    reserved_prefix: String,
    entity_prefix: String,
    entity_suffix: String,
}

impl NamingResolver {
    /// Build a resolver, compiling every rename rule.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let conventions = &config.conventions;
        let mut reserved_vars: HashSet<String> = KEYWORDS.iter().map(|s| s.to_string()).collect();
        let mut reserved_types: HashSet<String> =
            RESERVED_TYPES.iter().map(|s| s.to_string()).collect();
        for word in &conventions.extra_reserved_words {
            reserved_vars.insert(word.to_lower_camel_case());
            reserved_types.insert(word.to_upper_camel_case());
        }

        Ok(Self {
            table_renamers: compile_all(&config.table_renamers)?,
            column_renamers: compile_all(&config.column_renamers)?,
            reserved_vars,
            reserved_types,
            reserved_prefix: conventions.reserved_prefix.to_lower_camel_case(),
            entity_prefix: conventions
                .entity_prefix
                .as_deref()
                .map(|p| p.to_upper_camel_case())
                .unwrap_or_default(),
            entity_suffix: conventions
                .entity_suffix
                .as_deref()
                .map(|s| s.to_upper_camel_case())
                .unwrap_or_default(),
        })
    }

    /// Apply the first matching table rename rule.
    ///
    /// Renaming is not idempotent when a rule matches its own output:
    /// `^(.*)$ -> Tbl$1` prefixes again on every call.
    pub fn rename_table(&self, raw: &str) -> String {
        apply_first(&self.table_renamers, raw)
    }

    /// Apply the first matching column rename rule.
    pub fn rename_column(&self, raw: &str) -> String {
        apply_first(&self.column_renamers, raw)
    }

    /// Entity type name for a raw table name.
    pub fn type_name(&self, raw_table: &str) -> String {
        let mut name = self.rename_table(raw_table).to_upper_camel_case();
        if !self.entity_prefix.is_empty() && !name.starts_with(&self.entity_prefix) {
            name = format!("{}{}", self.entity_prefix, name);
        }
        if !self.entity_suffix.is_empty() && !name.ends_with(&self.entity_suffix) {
            name.push_str(&self.entity_suffix);
        }
        self.escape_type(name)
    }

    /// Variable name for an arbitrary identifier.
    pub fn var_name(&self, raw: &str) -> String {
        self.escape_var(raw.to_lower_camel_case())
    }

    /// Variable name for a raw column name.
    pub fn column_var(&self, raw_column: &str) -> String {
        self.var_name(&self.rename_column(raw_column))
    }

    /// Prefix a variable name if it is reserved or not a valid identifier.
    pub fn escape_var(&self, var: String) -> String {
        if self.needs_escape(&var) || self.reserved_vars.contains(&var) {
            format!("{}{}", self.reserved_prefix, capitalize(&var))
        } else {
            var
        }
    }

    /// Prefix a type name if it is reserved or not a valid identifier.
    pub fn escape_type(&self, name: String) -> String {
        if self.needs_escape(&name) || self.reserved_types.contains(&name) {
            format!("{}{}", capitalize(&self.reserved_prefix), name)
        } else {
            name
        }
    }

    fn needs_escape(&self, ident: &str) -> bool {
        ident.chars().next().map_or(true, |c| !c.is_alphabetic())
    }
}

/// Upper-case the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Getter name for a variable.
pub fn getter(var: &str) -> String {
    format!("get{}", capitalize(var))
}

/// Setter name for a variable.
pub fn setter(var: &str) -> String {
    format!("set{}", capitalize(var))
}

/// English plural of a camel-case word.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.ends_with("child") || word.ends_with("Child") {
        return format!("{}ren", word);
    }
    if word.ends_with("ss") || word.ends_with('x') {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        let after_vowel = stem
            .chars()
            .last()
            .is_some_and(|c| "aeiouAEIOU".contains(c));
        if !after_vowel {
            return format!("{}ies", stem);
        }
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Conventions;

    fn resolver() -> NamingResolver {
        NamingResolver::from_config(&Configuration::new()).unwrap()
    }

    #[test]
    fn test_case_conversion() {
        let naming = resolver();

        assert_eq!(naming.type_name("ACCOUNT_ROLE"), "AccountRole");
        assert_eq!(naming.type_name("order-line"), "OrderLine");
        assert_eq!(naming.column_var("DEPT_ID"), "deptId");
        assert_eq!(naming.column_var("firstName"), "firstName");
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let naming = resolver();

        for raw in ["ACCOUNT_ROLE", "user", "ORDER", "line_item"] {
            let once = naming.type_name(raw);
            assert_eq!(naming.type_name(&once), once);
        }
        for raw in ["DEPT_ID", "class", "1st_line", "login"] {
            let once = naming.column_var(raw);
            assert_eq!(naming.column_var(&once), once);
        }
    }

    #[test]
    fn test_reserved_words_escaped() {
        let naming = resolver();

        assert_eq!(naming.column_var("class"), "myClass");
        assert_eq!(naming.column_var("PACKAGE"), "myPackage");
        assert_eq!(naming.type_name("ORDER"), "MyOrder");
        assert_eq!(naming.column_var("1st_line"), "my1stLine");
    }

    #[test]
    fn test_renamers_first_match_wins() {
        let config = Configuration::new()
            .with_table_renamer(Renamer::new("^T_(.*)$", "$1"))
            .with_table_renamer(Renamer::new("^T", "X"))
            .with_column_renamer(Renamer::new("^col_", ""));
        let naming = NamingResolver::from_config(&config).unwrap();

        assert_eq!(naming.type_name("T_CUSTOMER"), "Customer");
        assert_eq!(naming.type_name("TAX"), "Xax");
        assert_eq!(naming.column_var("col_amount"), "amount");
        assert_eq!(naming.column_var("T_FLAG"), "tFlag");
    }

    #[test]
    fn test_self_matching_renamer_applies_again() {
        let config = Configuration::new().with_table_renamer(Renamer::new("^(.*)$", "Tbl$1"));
        let naming = NamingResolver::from_config(&config).unwrap();

        let once = naming.type_name("CUSTOMER");
        assert_eq!(once, "TblCustomer");
        assert_eq!(naming.type_name(&once), "TblTblCustomer");
    }

    #[test]
    fn test_invalid_renamer_rejected() {
        let config = Configuration::new().with_column_renamer(Renamer::new("(", ""));
        assert!(matches!(
            NamingResolver::from_config(&config),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_prefix_and_suffix() {
        let config = Configuration::new().with_conventions(
            Conventions::default()
                .with_entity_prefix("db")
                .with_entity_suffix("entity"),
        );
        let naming = NamingResolver::from_config(&config).unwrap();

        let name = naming.type_name("ACCOUNT");
        assert_eq!(name, "DbAccountEntity");
        assert_eq!(naming.type_name(&name), name);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("account"), "accounts");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("grandChild"), "grandChildren");
        assert_eq!(pluralize("news"), "news");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(getter("deptId"), "getDeptId");
        assert_eq!(setter("login"), "setLogin");
        assert_eq!(capitalize(""), "");
    }
}
