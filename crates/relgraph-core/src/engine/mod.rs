//! Resolution pipeline.
//!
//! Passes run in a fixed order, enforced by the type of [`Pass`]:
//!
//! 1. [`Pass::<Named>::name`] builds entities and attributes,
//! 2. [`Pass::<Named>::classify_keys`] builds primary keys and version flags,
//! 3. [`Pass::<Keyed>::link_hierarchies`] wires inheritance,
//! 4. [`Pass::<Linked>::infer_relations`] builds relations, inverses and
//!    many-to-many associations.
//!
//! The consistency check then runs on the finished model.

mod association;
mod diagnostics;
mod entities;
mod inheritance;
mod primary_key;
mod relations;

pub use diagnostics::Diagnostics;

use crate::account::{self, Account};
use crate::check::ConsistencyChecker;
use crate::config::Configuration;
use crate::context::ResolutionContext;
use crate::error::{Error, Result};
use crate::model::{EntityId, Model};
use crate::schema::{Metadata, TableId};
use heck::ToUpperCamelCase;
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

/// Entities and attributes are built.
#[derive(Debug)]
pub struct Named;

/// Primary keys are classified.
#[derive(Debug)]
pub struct Keyed;

/// Inheritance hierarchies are wired.
#[derive(Debug)]
pub struct Linked;

/// Relations are inferred.
#[derive(Debug)]
pub struct Related;

/// State shared by every pass of one run.
#[derive(Debug)]
pub(crate) struct Workspace<'a> {
    pub metadata: &'a Metadata,
    pub ctx: &'a ResolutionContext,
    pub model: Model,
    pub diagnostics: Diagnostics,
    pub table_entities: HashMap<TableId, EntityId>,
}

impl<'a> Workspace<'a> {
    fn new(metadata: &'a Metadata, ctx: &'a ResolutionContext) -> Self {
        Self {
            metadata,
            ctx,
            model: Model::new(),
            diagnostics: Diagnostics::new(),
            table_entities: HashMap::new(),
        }
    }

    /// Entity produced for a table, if it was not skipped.
    pub fn entity_of(&self, table: TableId) -> Option<EntityId> {
        self.table_entities.get(&table).copied()
    }

    /// Make `var` unique among the accessors of `entity`: first by appending
    /// `By<qualifier>`, then a numeric suffix.
    pub fn unique_var(&self, entity: EntityId, var: String, qualifier: Option<&str>) -> String {
        if !self.model.is_var_taken(entity, &var) {
            return var;
        }
        if let Some(qualifier) = qualifier {
            let qualified = format!("{}By{}", var, qualifier.to_upper_camel_case());
            if !self.model.is_var_taken(entity, &qualified) {
                return qualified;
            }
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}", var, n);
            if !self.model.is_var_taken(entity, &candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// A resolution run in state `S`.
#[derive(Debug)]
pub struct Pass<'a, S> {
    ws: Workspace<'a>,
    _state: PhantomData<S>,
}

impl<'a, S> Pass<'a, S> {
    fn advance<T>(self) -> Pass<'a, T> {
        Pass {
            ws: self.ws,
            _state: PhantomData,
        }
    }

    /// The model built so far.
    pub fn model(&self) -> &Model {
        &self.ws.model
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.ws.diagnostics
    }
}

impl<'a> Pass<'a, Named> {
    /// Build one entity per table and one attribute per column.
    pub fn name(metadata: &'a Metadata, ctx: &'a ResolutionContext) -> Result<Self> {
        let mut ws = Workspace::new(metadata, ctx);
        entities::build(&mut ws)?;
        debug!(entities = ws.model.entities().len(), "Named entities");
        Ok(Pass {
            ws,
            _state: PhantomData,
        })
    }

    /// Classify primary keys and flag version columns.
    pub fn classify_keys(mut self) -> Pass<'a, Keyed> {
        primary_key::classify(&mut self.ws);
        self.advance()
    }
}

impl<'a> Pass<'a, Keyed> {
    /// Wire configured parents and children.
    pub fn link_hierarchies(mut self) -> Pass<'a, Linked> {
        inheritance::link(&mut self.ws);
        self.advance()
    }
}

impl<'a> Pass<'a, Linked> {
    /// Infer relations from foreign keys and association tables.
    pub fn infer_relations(mut self) -> Result<Pass<'a, Related>> {
        let legs = relations::infer(&mut self.ws)?;
        association::synthesize(&mut self.ws, legs)?;
        debug!(relations = self.ws.model.relations().len(), "Inferred relations");
        Ok(self.advance())
    }
}

impl<'a> Pass<'a, Related> {
    /// Release the model and the diagnostics recorded while building it.
    pub fn finish(self) -> (Model, Diagnostics) {
        (self.ws.model, self.ws.diagnostics)
    }
}

/// Outcome of a resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The resolved model.
    pub model: Model,
    /// Sorted errors and warnings.
    pub report: Diagnostics,
    /// Detected account entity, when the convention is enabled.
    pub account: Option<Account>,
}

impl Resolution {
    /// Check if the report holds no error.
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }

    /// Get the model, refusing it when the report holds errors.
    pub fn into_model(self) -> Result<Model> {
        if self.report.is_success() {
            Ok(self.model)
        } else {
            Err(Error::Consistency {
                errors: self.report.errors,
            })
        }
    }
}

/// Resolves metadata snapshots against one configuration.
#[derive(Debug, Clone)]
pub struct Resolver {
    ctx: ResolutionContext,
}

impl Resolver {
    /// Create a resolver, compiling every pattern of the configuration.
    pub fn new(config: Configuration) -> Result<Self> {
        Ok(Self {
            ctx: ResolutionContext::new(config)?,
        })
    }

    /// The resolution context.
    pub fn context(&self) -> &ResolutionContext {
        &self.ctx
    }

    /// Run every pass and the consistency check.
    ///
    /// Errors returned here are engine invariant violations. Problems in the
    /// input are reported in [`Resolution::report`].
    #[instrument(skip_all, fields(tables = metadata.len()))]
    pub fn resolve(&self, metadata: &Metadata) -> Result<Resolution> {
        let (model, mut report) = Pass::<Named>::name(metadata, &self.ctx)?
            .classify_keys()
            .link_hierarchies()
            .infer_relations()?
            .finish();

        report.extend(ConsistencyChecker::new(metadata, &self.ctx).check(&model));
        report.sort();

        let account = if self.ctx.conventions().account_detection {
            account::detect(&model)
        } else {
            None
        };

        info!(
            entities = model.entities().len(),
            relations = model.relations().len(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Resolution complete"
        );

        Ok(Resolution {
            model,
            report,
            account,
        })
    }
}

/// Resolve `metadata` against `config` in one call.
pub fn resolve(metadata: &Metadata, config: Configuration) -> Result<Resolution> {
    Resolver::new(config)?.resolve(metadata)
}
