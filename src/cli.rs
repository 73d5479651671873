use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "toolrank",
    version,
    about = "Score and rank AI coding tools with versioned weight sets"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every tool record in a data directory
    Score(ScoreCommand),
    /// Build and write a ranking period snapshot
    Rank(RankCommand),
    /// Compare two ranking period snapshots
    Changes(ChangesCommand),
    /// List published algorithm versions and their weights
    Versions(VersionsCommand),
}

#[derive(Args)]
pub struct AlgorithmArgs {
    /// Algorithm version to score with (overrides toolrank.toml)
    #[arg(long)]
    pub algorithm: Option<String>,
    /// Date age-based bonuses are measured against (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ScoreCommand {
    pub data_dir: PathBuf,
    #[command(flatten)]
    pub algorithm: AlgorithmArgs,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct RankCommand {
    pub data_dir: PathBuf,
    /// Ranking period (YYYY-MM)
    #[arg(long)]
    pub period: String,
    #[command(flatten)]
    pub algorithm: AlgorithmArgs,
    /// Snapshot directory (defaults to ranking.output_dir under DATA_DIR)
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ChangesCommand {
    pub previous: PathBuf,
    pub current: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct VersionsCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
