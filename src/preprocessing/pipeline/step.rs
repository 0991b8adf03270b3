//! Trait object interface for post-processing steps.
//!
//! A step consumes a table and produces a table. Steps are stored as
//! `Arc<dyn TableStep>` so a generator holding a chain stays `Clone`.

use crate::preprocessing::error::Result;
use crate::table::Table;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A post-processing step run on a generator's output table.
pub trait TableStep: fmt::Debug + Send + Sync {
    /// Transform the table. Steps may modify it in place and hand it back.
    fn transform(&self, data: Table) -> Result<Table>;

    /// Get the step name for debugging.
    fn step_name(&self) -> &'static str {
        let full_name = type_name::<Self>();
        full_name.rsplit("::").next().unwrap_or(full_name)
    }
}

/// Ordered chain of post-processing steps.
#[derive(Clone, Debug, Default)]
pub struct PostChain {
    steps: Vec<Arc<dyn TableStep>>,
}

impl PostChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a step in front of every existing step.
    pub fn prepend(&mut self, step: Arc<dyn TableStep>) {
        self.steps.insert(0, step);
    }

    /// Append a step after every existing step.
    pub fn push(&mut self, step: Arc<dyn TableStep>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    /// Run every step in order, feeding each the previous step's output.
    pub fn run(&self, data: Table) -> Result<Table> {
        self.steps.iter().try_fold(data, |table, step| {
            debug!(step = step.step_name(), "running post step");
            step.transform(table)
        })
    }
}

impl FromIterator<Arc<dyn TableStep>> for PostChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn TableStep>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
