//! Ordered step runner: executes steps strictly in declared order and halts
//! at the first failure. No retries, no rollback of effects already applied.

use futures_util::future::LocalBoxFuture;
use thiserror::Error;

/// Future returned by a pipeline step. Steps run strictly one at a time on
/// the current task, so they are not required to be `Send`.
pub type StepFuture<'c> = LocalBoxFuture<'c, anyhow::Result<()>>;

/// A named unit of work over a shared, typed context.
pub struct Step<C> {
    name: &'static str,
    run: for<'c> fn(&'c mut C) -> StepFuture<'c>,
}

impl<C> Step<C> {
    #[must_use]
    pub fn new(name: &'static str, run: for<'c> fn(&'c mut C) -> StepFuture<'c>) -> Self {
        Self { name, run }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The first failure of a run, wrapped with the failing step's name.
#[derive(Debug, Error)]
#[error("step '{step}' failed")]
pub struct StepError {
    pub step: &'static str,
    #[source]
    pub source: anyhow::Error,
}

/// Execute `steps` in order against `cx`.
///
/// # Errors
///
/// Returns the first step failure; later steps do not run.
pub async fn run<C>(steps: &[Step<C>], cx: &mut C) -> Result<(), StepError> {
    for step in steps {
        (step.run)(cx)
            .await
            .map_err(|source| StepError { step: step.name, source })?;
    }
    Ok(())
}
