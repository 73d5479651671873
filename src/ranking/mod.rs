pub mod changes;

use crate::error::{RankingError, Result};
use crate::repository::ToolCatalog;
use crate::scoring::ScoringEngine;
use crate::types::ranking::{RankedTool, RankingPeriod};
use crate::types::scoring::ToolScore;
use crate::types::tool::ToolRecord;
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct RankingOptions {
    pub period: String,
    pub min_completeness: f64,
}

/// Scores every catalog tool in parallel, preserving catalog order.
pub fn score_catalog(engine: &ScoringEngine, catalog: &ToolCatalog) -> Vec<ToolScore> {
    catalog
        .tools
        .par_iter()
        .map(|tool| engine.calculate_tool_score(&tool.metrics, &tool.capabilities))
        .collect()
}

/// Builds the ranking snapshot for one period.
pub fn assemble(
    engine: &ScoringEngine,
    catalog: &ToolCatalog,
    options: &RankingOptions,
) -> Result<RankingPeriod> {
    validate_period(&options.period)?;

    let scores = score_catalog(engine, catalog);
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    for (tool, score) in catalog.tools.iter().zip(scores) {
        let completeness = tool.metrics.completeness();
        if completeness < options.min_completeness {
            tracing::warn!(
                tool = %tool.tool_id(),
                completeness,
                min_completeness = options.min_completeness,
                "excluding tool below completeness threshold"
            );
            excluded.push(tool.tool_id().to_string());
            continue;
        }
        included.push((tool, score, completeness));
    }

    included.sort_by(|(a_tool, a_score, _), (b_tool, b_score, _)| {
        compare_ranked(a_tool, a_score, b_tool, b_score)
    });

    let rankings = included
        .into_iter()
        .enumerate()
        .map(|(index, (tool, score, completeness))| RankedTool {
            position: index as u32 + 1,
            tool_name: tool.name.clone(),
            completeness,
            score,
        })
        .collect::<Vec<_>>();

    tracing::info!(
        period = %options.period,
        version = engine.version(),
        ranked = rankings.len(),
        excluded = excluded.len(),
        "assembled ranking period"
    );

    Ok(RankingPeriod {
        period: options.period.clone(),
        algorithm_version: engine.version().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        reference_date: engine.reference_date(),
        input_digest: catalog.digest.clone(),
        rankings,
        excluded,
    })
}

/// Overall score descending, then feature count descending, then name and id ascending.
fn compare_ranked(a_tool: &ToolRecord, a: &ToolScore, b_tool: &ToolRecord, b: &ToolScore) -> Ordering {
    b.overall_score
        .total_cmp(&a.overall_score)
        .then_with(|| {
            b_tool
                .capabilities
                .features
                .len()
                .cmp(&a_tool.capabilities.features.len())
        })
        .then_with(|| a_tool.name.cmp(&b_tool.name))
        .then_with(|| a.tool_id.cmp(&b.tool_id))
}

/// Accepts `YYYY-MM` periods.
pub fn validate_period(period: &str) -> Result<()> {
    NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .ok()
        .filter(|_| period.len() == 7)
        .map(|_| ())
        .ok_or_else(|| RankingError::InvalidPeriod(format!("{period} (expected YYYY-MM)")))
}
