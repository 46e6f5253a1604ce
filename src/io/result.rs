//! Read/write search result JSON files.
//!
//! Result JSON is the "portable" representation of a search champion:
//! - degree pair + score
//! - numerator/denominator coefficients (lowest degree first)
//! - run metadata (target, interval, loss, timestamp)
//!
//! The schema is defined by `domain::ResultFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{ResultFile, SearchConfig, SearchResult};
use crate::error::AppError;

/// Build the serializable form of a champion.
pub fn result_file(best: &SearchResult, config: &SearchConfig, target: &str) -> ResultFile {
    ResultFile {
        tool: "pade".to_string(),
        target: target.to_string(),
        generated: Utc::now(),
        interval: config.interval,
        loss: config.loss,
        score: best.score,
        numerator_degree: best.pair.m(),
        denominator_degree: best.pair.n(),
        numerator: best.approximant.numerator.coeffs().to_vec(),
        denominator: best.approximant.denominator.coeffs().to_vec(),
    }
}

/// Write a result JSON file.
pub fn write_result_json(path: &Path, file: &ResultFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

/// Read a result JSON file.
///
/// The coefficient arrays must agree with the recorded degrees.
pub fn read_result_json(path: &Path) -> Result<ResultFile, AppError> {
    let input = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let file: ResultFile =
        serde_json::from_reader(input).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;

    if file.numerator.len() != file.numerator_degree + 1
        || file.denominator.len() != file.denominator_degree + 1
    {
        return Err(AppError::new(
            2,
            format!(
                "Result JSON degrees (m={}, n={}) do not match coefficient counts ({}, {}).",
                file.numerator_degree,
                file.denominator_degree,
                file.numerator.len(),
                file.denominator.len()
            ),
        ));
    }
    if file.numerator.iter().chain(&file.denominator).any(|c| !c.is_finite()) {
        return Err(AppError::new(2, "Result JSON contains non-finite coefficients."));
    }

    Ok(file)
}
