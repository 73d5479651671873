use crate::types::scoring::Score;
use crate::types::tool::ToolCapabilities;
use chrono::{Datelike, NaiveDate};

pub const BASE_SCORE: f64 = 30.0;
pub const FEATURE_SCORE_CEILING: f64 = 85.0;
pub const POINTS_PER_FEATURE: f64 = 3.0;
pub const POINTS_PER_KEYWORD: f64 = 8.0;
pub const MIXTURE_OF_EXPERTS_BONUS: f64 = 5.0;
pub const SPECULATIVE_DECODING_BONUS: f64 = 5.0;
pub const FAST_INDEXING_BONUS: f64 = 3.0;

pub const INNOVATION_KEYWORDS: [&str; 11] = [
    "specification-driven",
    "autonomous",
    "agent",
    "mcp",
    "scaffolding",
    "multi-modal",
    "reasoning",
    "planning",
    "orchestration",
    "background agent",
    "speculative",
];

/// Unclamped innovation score; the engine caps it after every term is in.
pub fn innovation(capabilities: &ToolCapabilities, reference_date: NaiveDate) -> Score {
    let feature_count = capabilities.features.len();
    let mut score = if feature_count > 0 {
        (BASE_SCORE + feature_count as f64 * POINTS_PER_FEATURE).min(FEATURE_SCORE_CEILING)
    } else {
        BASE_SCORE
    };

    let matches = matched_keywords(
        capabilities.summary.as_deref(),
        capabilities.description.as_deref(),
    );
    score += matches as f64 * POINTS_PER_KEYWORD;

    let performance = &capabilities.performance;
    if performance.mixture_of_experts {
        score += MIXTURE_OF_EXPERTS_BONUS;
    }
    if performance.speculative_decoding {
        score += SPECULATIVE_DECODING_BONUS;
    }
    if performance.fast_indexing {
        score += FAST_INDEXING_BONUS;
    }

    score + maturity_bonus(capabilities.launch_year, reference_date)
}

/// Counts keywords found in the summary and description, each keyword once.
pub fn matched_keywords(summary: Option<&str>, description: Option<&str>) -> usize {
    let text = [summary, description]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return 0;
    }
    let lowered = text.to_lowercase();
    INNOVATION_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count()
}

/// Bonus by tool age in whole years relative to `reference_date`.
pub fn maturity_bonus(launch_year: Option<i32>, reference_date: NaiveDate) -> Score {
    let Some(launch_year) = launch_year else {
        return 0.0;
    };
    let Some(age) = reference_date.year().checked_sub(launch_year) else {
        return 0.0;
    };
    match age {
        age if age < 1 => 3.0,
        1..=3 => 10.0,
        4..=5 => 5.0,
        _ => 0.0,
    }
}
