//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the search/math code stays clean and testable
//! - output changes are localized
//!
//! The coefficient block is meant to be pasted into source code as an array
//! literal: highest degree first, one coefficient per line, each followed by a
//! comma. Floats use `{:?}` (shortest round-trip representation) so the pasted
//! literal reproduces the exact `f64`.

use crate::domain::{CellOutcome, Polynomial, RunConfig, SearchRun};
use crate::error::SearchError;
use crate::eval::AccuracyReport;
use crate::search::{degree_grid, determined_count};

/// One block per attempted cell; failed cells carry an error line.
pub fn format_attempts(run: &SearchRun) -> String {
    let mut out = String::new();
    for attempt in run.attempts.iter().filter(|a| a.outcome.is_attempted()) {
        let (n, m) = (attempt.pair.n(), attempt.pair.m());
        out.push_str(&format!("------ Calc n={n}, m={m} ------\n"));
        let reason = match &attempt.outcome {
            CellOutcome::Infeasible(reason) => Some(reason.to_string()),
            CellOutcome::Singular(reason) => Some(reason.to_string()),
            CellOutcome::Scored { .. } | CellOutcome::Skipped(_) => None,
        };
        if let Some(reason) = reason {
            out.push_str(&format!("       Error: n={n}, m={m}        \n"));
            out.push_str(&format!("       ({reason})\n"));
        }
    }
    out
}

/// Search parameters and per-outcome cell counts.
pub fn format_run_summary(config: &RunConfig, target: &str, run: &SearchRun) -> String {
    let search = &config.search;
    let mut out = String::new();

    let (mut scored, mut infeasible, mut singular) = (0, 0, 0);
    for a in &run.attempts {
        match a.outcome {
            CellOutcome::Scored { .. } => scored += 1,
            CellOutcome::Infeasible(_) => infeasible += 1,
            CellOutcome::Singular(_) => singular += 1,
            CellOutcome::Skipped(_) => {}
        }
    }
    let determined = degree_grid(search.max_n, search.max_m)
        .map(|grid| determined_count(&grid, config.terms))
        .unwrap_or(0);

    out.push_str("=== pade - Padé coefficient search ===\n");
    out.push_str(&format!("Target: {target} ({} Taylor terms)\n", config.terms));
    out.push_str(&format!(
        "Grid: n=[1, {}] (denominator) x m=[1, {}] (numerator), {determined} determined\n",
        search.max_n, search.max_m
    ));
    out.push_str(&format!("Interval: {}\n", search.interval));
    out.push_str(&format!("Loss: {}\n", search.loss.display_name()));
    out.push_str(&format!(
        "Cells: scored={scored} infeasible={infeasible} singular={singular} skipped={}\n",
        run.skipped_count()
    ));
    out
}

/// The final block: best score, then the numerator and denominator arrays.
///
/// Fails with `NoSolutionFound` when the search never accepted a candidate.
pub fn format_result(run: &SearchRun) -> Result<String, SearchError> {
    let best = run.champion()?;
    let mut out = String::new();

    out.push_str(&format!("best score = {:e}\n", best.score));
    out.push_str(&format!("m = {}\n", best.pair.m()));
    out.push_str(&format_coefficients(&best.approximant.numerator));
    out.push_str(&format!("n = {}\n", best.pair.n()));
    out.push_str(&format_coefficients(&best.approximant.denominator));

    Ok(out)
}

fn format_coefficients(poly: &Polynomial) -> String {
    let mut out = String::from("[\n");
    for c in poly.highest_first() {
        out.push_str(&format!("{c:?},\n"));
    }
    out.push_str("]\n");
    out
}

/// Accuracy of a range-reduced evaluator over one sweep.
pub fn format_accuracy(label: &str, report: &AccuracyReport) -> String {
    format!(
        "{label:<24} max abs={:.3e} max rel={:.3e} (samples={}, worst x={:.4})\n",
        report.max_abs, report.max_rel, report.samples, report.worst_x
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Approximant, CellAttempt, DegreePair, SearchConfig, SearchResult};
    use crate::error::InfeasibleReason;

    fn run_with_best() -> SearchRun {
        let pair = DegreePair::new(1, 2);
        SearchRun {
            attempts: vec![
                CellAttempt {
                    index: 0,
                    pair: DegreePair::new(1, 1),
                    outcome: CellOutcome::Infeasible(InfeasibleReason::SingularSystem {
                        pair: DegreePair::new(1, 1),
                    }),
                },
                CellAttempt {
                    index: 1,
                    pair,
                    outcome: CellOutcome::Scored { score: 0.125 },
                },
                CellAttempt {
                    index: 2,
                    pair: DegreePair::new(2, 2),
                    outcome: CellOutcome::Skipped(InfeasibleReason::InsufficientCoefficients {
                        pair: DegreePair::new(2, 2),
                        required: 5,
                        available: 4,
                    }),
                },
            ],
            best: Some(SearchResult {
                pair,
                approximant: Approximant::new(
                    Polynomial::new(vec![1.0, 2.0 / 3.0, 1.0 / 6.0]),
                    Polynomial::new(vec![1.0, -1.0 / 3.0]),
                ),
                score: 0.125,
            }),
        }
    }

    #[test]
    fn result_block_lists_highest_degree_first() {
        let text = format_result(&run_with_best()).unwrap();
        let expected = format!(
            "best score = 1.25e-1\nm = 2\n[\n{:?},\n{:?},\n1.0,\n]\nn = 1\n[\n{:?},\n1.0,\n]\n",
            1.0 / 6.0,
            2.0 / 3.0,
            -1.0 / 3.0
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn result_block_fails_without_champion() {
        let mut run = run_with_best();
        run.best = None;
        assert!(matches!(
            format_result(&run),
            Err(SearchError::NoSolutionFound { attempted: 2, skipped: 1 })
        ));
    }

    #[test]
    fn attempts_skip_unattempted_cells_and_flag_errors() {
        let text = format_attempts(&run_with_best());
        assert!(text.contains("------ Calc n=1, m=1 ------\n       Error: n=1, m=1"));
        assert!(text.contains("------ Calc n=1, m=2 ------\n"));
        assert!(!text.contains("n=2, m=2"));
        assert_eq!(text.matches("Error:").count(), 1);
    }

    #[test]
    fn summary_counts_outcomes() {
        let config = RunConfig {
            terms: 4,
            search: SearchConfig {
                max_n: 2,
                max_m: 2,
                ..SearchConfig::default()
            },
            show_attempts: true,
            export: None,
        };
        let text = format_run_summary(&config, "exp", &run_with_best());
        assert!(text.contains("Target: exp (4 Taylor terms)"));
        assert!(text.contains("3 determined"));
        assert!(text.contains("scored=1 infeasible=1 singular=0 skipped=1"));
    }
}
