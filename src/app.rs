//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - runs the degree-grid search
//! - prints the attempt log and the coefficient block
//! - writes the optional JSON export

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{CheckArgs, Command, SearchArgs};
use crate::domain::{Interval, QuadratureConfig, RunConfig, SearchConfig};
use crate::error::AppError;
use crate::eval::{accuracy, RangeReducedExp};
use crate::series::{Exp, TargetFunction};

pub mod pipeline;

/// Entry point for the `pade` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Check(args) => handle_check(args),
    }
}

/// Logs go to stderr so stdout stays pasteable.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init();
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let output = pipeline::run_search(&config, &Exp)?;

    if config.show_attempts {
        print!("{}", crate::report::format_attempts(&output.run));
        println!();
    }
    println!(
        "{}",
        crate::report::format_run_summary(&config, Exp.name(), &output.run)
    );

    // Fails with exit code 3 if no cell produced a finite score.
    let block = crate::report::format_result(&output.run)?;
    print!("{block}");

    if let Some(path) = &config.export {
        let best = output.run.champion()?;
        let file = crate::io::result_file(best, &config.search, Exp.name());
        crate::io::write_result_json(path, &file)?;
        info!(path = %path.display(), "wrote result JSON");
    }

    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<(), AppError> {
    let file = crate::io::read_result_json(&args.result)?;
    if file.target != Exp.name() {
        return Err(AppError::new(
            2,
            format!("Result targets '{}', only '{}' can be checked.", file.target, Exp.name()),
        ));
    }
    if !(args.range.is_finite() && args.range > 0.0) {
        return Err(AppError::new(2, "Sweep range must be finite and > 0."));
    }

    let pade = RangeReducedExp::new(file.approximant());
    let terms = (file.numerator_degree + file.denominator_degree + 1).min(Exp.max_terms());
    let taylor = RangeReducedExp::taylor(&Exp, terms)?;

    let wide = Interval::new(-args.range, args.range)?;
    let reduced = Interval::reduced_exp();

    println!(
        "=== pade check: {} (m={}, n={}) ===",
        args.result.display(),
        file.numerator_degree,
        file.denominator_degree
    );
    for (label, interval) in [("reduced", reduced), ("wide", wide)] {
        let p = accuracy(|x| pade.eval(x), interval, args.step)?;
        let t = accuracy(|x| taylor.eval(x), interval, args.step)?;
        print!(
            "{}",
            crate::report::format_accuracy(&format!("pade   {label} {interval}"), &p)
        );
        print!(
            "{}",
            crate::report::format_accuracy(&format!("taylor {label} ({terms} terms)"), &t)
        );
    }

    Ok(())
}

pub fn run_config_from_args(args: &SearchArgs) -> Result<RunConfig, AppError> {
    let interval = if args.legacy_interval {
        Interval::legacy()
    } else {
        match (args.lo, args.hi) {
            (Some(lo), Some(hi)) => Interval::new(lo, hi)?,
            _ => Interval::reduced_exp(),
        }
    };

    Ok(RunConfig {
        terms: args.terms,
        search: SearchConfig {
            max_n: args.max_n,
            max_m: args.max_m,
            interval,
            loss: args.loss,
            samples: args.samples,
            quad: QuadratureConfig {
                epsabs: args.epsabs,
                epsrel: args.epsrel,
                limit: args.limit,
            },
        },
        show_attempts: !args.quiet,
        export: args.export.clone(),
    })
}
