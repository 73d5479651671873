mod cli;
mod config;
mod error;
mod ranking;
mod report;
mod repository;
mod scoring;
mod snapshot;
mod types;

use crate::error::RankingError;
use crate::scoring::weights::AlgorithmRegistry;
use crate::scoring::ScoringEngine;
use crate::types::config::{AlgorithmConfig, RankingsConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

struct Setup {
    config: RankingsConfig,
    engine: ScoringEngine,
    output_dir: PathBuf,
}

fn setup(
    data_dir: &Path,
    args: &cli::AlgorithmArgs,
    registry: &AlgorithmRegistry,
) -> Result<Setup, RankingError> {
    if !data_dir.is_dir() {
        return Err(RankingError::PathNotFound(data_dir.display().to_string()));
    }

    let mut config = config::load_config(data_dir)?.unwrap_or_default();
    if let Some(version) = &args.algorithm {
        config
            .algorithm
            .get_or_insert_with(AlgorithmConfig::default)
            .version = Some(version.clone());
    }
    config.validate(registry)?;

    let version = registry.get(config.algorithm_version())?;
    let overrides = config.weight_overrides();
    let mut engine = if overrides.is_empty() {
        ScoringEngine::new(version)?
    } else {
        ScoringEngine::with_weights(version, version.weights.with_overrides(&overrides))?
    };
    if let Some(date) = args.as_of.or(config.reference_date()) {
        engine = engine.with_reference_date(date);
    }
    tracing::info!(
        version = engine.version(),
        reference_date = %engine.reference_date(),
        factors = engine.weights().factors().len(),
        "scoring engine ready"
    );

    let output_dir = data_dir.join(config.output_dir());
    Ok(Setup {
        config,
        engine,
        output_dir,
    })
}

fn output_format(format: &cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn run(cli: cli::Cli) -> Result<i32, RankingError> {
    let registry = AlgorithmRegistry::builtin();
    registry.validate_all()?;

    match cli.command {
        cli::Commands::Score(cmd) => {
            let setup = setup(&cmd.data_dir, &cmd.algorithm, &registry)?;
            let catalog = repository::load_tools(&cmd.data_dir, &[setup.output_dir.clone()])?;
            let scores = ranking::score_catalog(&setup.engine, &catalog);

            let rendered =
                report::render_scores(&scores, setup.engine.version(), output_format(&cmd.format))?;
            println!("{rendered}");

            if catalog.has_skipped() {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Rank(cmd) => {
            ranking::validate_period(&cmd.period)?;
            let setup = setup(&cmd.data_dir, &cmd.algorithm, &registry)?;
            let out_dir = cmd.out.clone().unwrap_or(setup.output_dir);
            let catalog = repository::load_tools(&cmd.data_dir, &[out_dir.clone()])?;

            let options = ranking::RankingOptions {
                period: cmd.period.clone(),
                min_completeness: setup.config.min_completeness(),
            };
            let period = ranking::assemble(&setup.engine, &catalog, &options)?;
            let path = snapshot::write_snapshot(&out_dir, &period)?;

            let rendered = report::render_period(&period, output_format(&cmd.format))?;
            println!("{rendered}");
            eprintln!("snapshot file: {}", path.display());

            if catalog.has_skipped() || !period.excluded.is_empty() {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Changes(cmd) => {
            let previous = snapshot::read_snapshot(&cmd.previous)?;
            let current = snapshot::read_snapshot(&cmd.current)?;
            let changes = ranking::changes::analyze(&previous, &current, &registry)?;

            let rendered = report::render_changes(&changes, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Versions(cmd) => {
            let rendered = report::render_versions(registry.versions(), output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!("toolrank v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
