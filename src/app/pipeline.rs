//! Shared search pipeline.
//!
//! Taylor series -> degree-grid search -> `SearchRun`.
//!
//! Printing and export stay in `app`; integration tests drive this directly.

use tracing::debug;

use crate::domain::{CoefficientSequence, RunConfig, SearchRun};
use crate::error::AppError;
use crate::series::TargetFunction;

/// All computed outputs of a single `pade search` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: CoefficientSequence,
    pub run: SearchRun,
}

/// Build the series for `target` and search the configured grid.
///
/// A run with no finite-scoring cell is still `Ok`; callers ask
/// `run.champion()` when they need one.
pub fn run_search<T: TargetFunction>(config: &RunConfig, target: &T) -> Result<RunOutput, AppError> {
    let series = target.taylor(config.terms)?;
    debug!(target = target.name(), terms = series.len(), "built Taylor series");

    let run = crate::search::search(&series, &|x| target.eval(x), &config.search)?;

    Ok(RunOutput { series, run })
}
