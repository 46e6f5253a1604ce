//! Grid search driver.
//!
//! Given:
//! - a Taylor coefficient sequence of length `L`
//! - the true function (for scoring)
//! - degree bounds, an interval and a loss
//!
//! we, for each `(n, m)` cell in enumeration order:
//! - skip it if `n + m >= L`
//! - build the Padé approximant (or record why it is infeasible)
//! - score it (or record why the integrand is singular)
//!
//! and fold the scored cells into the champion.
//!
//! Cells are evaluated in parallel. Results are collected in grid order and
//! folded sequentially with a strict `<`, so the first minimal candidate in
//! enumeration order wins regardless of which worker finished first.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{
    CellAttempt, CellOutcome, CoefficientSequence, DegreePair, ScoredCandidate, SearchConfig,
    SearchResult, SearchRun,
};
use crate::error::{InfeasibleReason, SearchError};
use crate::pade::build;
use crate::search::grid::{degree_grid, determined_count};
use crate::search::score::score;

#[derive(Debug, Clone)]
struct Evaluated {
    attempt: CellAttempt,
    candidate: Option<ScoredCandidate>,
}

/// Run the exhaustive degree-grid search.
///
/// Configuration problems are rejected before any cell is evaluated. After
/// that the search always completes; use [`SearchRun::champion`] to tell a
/// found approximant from "no solution".
pub fn search<F>(series: &CoefficientSequence, true_fn: &F, config: &SearchConfig) -> Result<SearchRun, SearchError>
where
    F: Fn(f64) -> f64 + Sync,
{
    config.validate()?;
    let grid = degree_grid(config.max_n, config.max_m)?;

    if config.interval.is_degenerate() {
        warn!(
            interval = %config.interval,
            "zero-width scoring interval: scores are pointwise errors at a single point"
        );
    }
    info!(
        terms = series.len(),
        cells = grid.len(),
        determined = determined_count(&grid, series.len()),
        interval = %config.interval,
        loss = config.loss.display_name(),
        "starting degree-grid search"
    );

    // Evaluate each cell independently (parallel); `collect` keeps grid order.
    let evaluated: Vec<Evaluated> = grid
        .par_iter()
        .enumerate()
        .map(|(index, &pair)| evaluate_cell(index, pair, series, true_fn, config))
        .collect();

    let (attempts, best) = evaluated.into_iter().fold(
        (Vec::with_capacity(grid.len()), None),
        |(mut attempts, best), cell| {
            log_outcome(&cell.attempt);
            attempts.push(cell.attempt);
            let best = match cell.candidate {
                Some(candidate) => Some(keep_better(best, candidate)),
                None => best,
            };
            (attempts, best)
        },
    );

    let run = SearchRun {
        attempts,
        best: best.map(SearchResult::from),
    };

    match &run.best {
        Some(best) => info!(pair = %best.pair, score = best.score, "search complete"),
        None => warn!(
            attempted = run.attempted_count(),
            skipped = run.skipped_count(),
            "search complete without a feasible approximant"
        ),
    }
    Ok(run)
}

/// Fold candidates (in enumeration order) into a champion.
///
/// Only a strictly lower score replaces the running best, so ties go to the
/// earliest candidate.
pub fn select_champion<I>(candidates: I) -> Option<SearchResult>
where
    I: IntoIterator<Item = ScoredCandidate>,
{
    candidates
        .into_iter()
        .fold(None, |best, candidate| Some(keep_better(best, candidate)))
        .map(SearchResult::from)
}

fn keep_better(best: Option<ScoredCandidate>, candidate: ScoredCandidate) -> ScoredCandidate {
    match best {
        Some(best) if candidate.score >= best.score => best,
        _ => candidate,
    }
}

fn evaluate_cell<F>(
    index: usize,
    pair: DegreePair,
    series: &CoefficientSequence,
    true_fn: &F,
    config: &SearchConfig,
) -> Evaluated
where
    F: Fn(f64) -> f64,
{
    let skipped = |outcome| Evaluated {
        attempt: CellAttempt { index, pair, outcome },
        candidate: None,
    };

    if !pair.is_determined_by(series.len()) {
        return skipped(CellOutcome::Skipped(InfeasibleReason::InsufficientCoefficients {
            pair,
            required: pair.required_coefficients(),
            available: series.len(),
        }));
    }

    let approximant = match build(series, pair) {
        Ok(a) => a,
        Err(reason) => return skipped(CellOutcome::Infeasible(reason)),
    };

    match score(&approximant, true_fn, config) {
        Ok(s) => Evaluated {
            attempt: CellAttempt {
                index,
                pair,
                outcome: CellOutcome::Scored { score: s },
            },
            candidate: Some(ScoredCandidate {
                pair,
                approximant,
                score: s,
            }),
        },
        Err(reason) => skipped(CellOutcome::Singular(reason)),
    }
}

fn log_outcome(attempt: &CellAttempt) {
    let pair = attempt.pair;
    match &attempt.outcome {
        CellOutcome::Scored { score } => debug!(%pair, score, "cell scored"),
        CellOutcome::Skipped(reason) => debug!(%pair, %reason, "cell skipped"),
        CellOutcome::Infeasible(reason) => warn!(%pair, %reason, "approximant infeasible"),
        CellOutcome::Singular(reason) => warn!(%pair, %reason, "candidate excluded"),
    }
}
