pub mod json;
pub mod md;

use crate::error::RankingError;
use crate::scoring::weights::AlgorithmVersion;
use crate::types::ranking::{ChangeReport, RankingPeriod};
use crate::types::scoring::ToolScore;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_scores(
    scores: &[ToolScore],
    version: &str,
    format: OutputFormat,
) -> Result<String, RankingError> {
    match format {
        OutputFormat::Json => json::to_json(&scores).map_err(RankingError::Json),
        OutputFormat::Md => Ok(md::scores_to_markdown(scores, version)),
    }
}

pub fn render_period(period: &RankingPeriod, format: OutputFormat) -> Result<String, RankingError> {
    match format {
        OutputFormat::Json => json::to_json(period).map_err(RankingError::Json),
        OutputFormat::Md => Ok(md::period_to_markdown(period)),
    }
}

pub fn render_changes(report: &ChangeReport, format: OutputFormat) -> Result<String, RankingError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RankingError::Json),
        OutputFormat::Md => Ok(md::changes_to_markdown(report)),
    }
}

pub fn render_versions(
    versions: &[AlgorithmVersion],
    format: OutputFormat,
) -> Result<String, RankingError> {
    match format {
        OutputFormat::Json => json::to_json(&versions).map_err(RankingError::Json),
        OutputFormat::Md => Ok(md::versions_to_markdown(versions)),
    }
}
