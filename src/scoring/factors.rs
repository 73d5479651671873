//! Per-factor calculators. Each returns a raw score intended for `[0, 100]`;
//! the engine applies the final clamp.

use super::normalize::CalibrationRange;
use crate::error::Result;
use crate::types::scoring::Score;
use crate::types::tool::{ToolCapabilities, ToolMetrics};

pub const FUNDING_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 1_000_000_000.0);
pub const VALUATION_RANGE: CalibrationRange =
    CalibrationRange::from_bounds(0.0, 10_000_000_000.0);
pub const USERS_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 1_000_000.0);
pub const CONTEXT_WINDOW_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 200_000.0);
pub const STARS_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 100_000.0);
pub const FORKS_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 10_000.0);
pub const CONTRIBUTORS_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 1_000.0);
pub const COMMUNITY_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 50_000.0);
pub const COMMITS_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 500.0);
pub const MENTIONS_RANGE: CalibrationRange = CalibrationRange::from_bounds(0.0, 1_000.0);

pub const AUTONOMY_SCALE: f64 = 10.0;

pub const CALIBRATION_RANGES: [CalibrationRange; 10] = [
    FUNDING_RANGE,
    VALUATION_RANGE,
    USERS_RANGE,
    CONTEXT_WINDOW_RANGE,
    STARS_RANGE,
    FORKS_RANGE,
    CONTRIBUTORS_RANGE,
    COMMUNITY_RANGE,
    COMMITS_RANGE,
    MENTIONS_RANGE,
];

/// Re-checks every built-in range through the validating constructor.
pub fn check_calibration() -> Result<()> {
    for range in CALIBRATION_RANGES {
        CalibrationRange::new(range.min(), range.max())?;
    }
    Ok(())
}

pub fn market_traction(metrics: &ToolMetrics) -> Score {
    let funding = FUNDING_RANGE.normalize(metrics.funding_total());
    let valuation = VALUATION_RANGE.normalize(metrics.valuation_latest());
    let users = USERS_RANGE.normalize(metrics.estimated_users());
    (funding * 0.3 + valuation * 0.4 + users * 0.3) * 100.0
}

pub fn technical_capability(capabilities: &ToolCapabilities) -> Score {
    let autonomy = capabilities.autonomy_level() / AUTONOMY_SCALE * 100.0 * 0.5;
    let multi_file = if capabilities.supports_multi_file {
        10.0
    } else {
        0.0
    };
    let languages = (2.0 * capabilities.supported_languages.len() as f64).min(20.0);
    let context = CONTEXT_WINDOW_RANGE.normalize(capabilities.context_window_size()) * 20.0;
    autonomy + multi_file + languages + context
}

pub fn developer_adoption(metrics: &ToolMetrics) -> Score {
    STARS_RANGE.normalize(metrics.github_stars()) * 40.0
        + FORKS_RANGE.normalize(metrics.github_forks()) * 20.0
        + CONTRIBUTORS_RANGE.normalize(metrics.github_contributors()) * 20.0
        + COMMUNITY_RANGE.normalize(metrics.community_size()) * 20.0
}

pub fn development_velocity(metrics: &ToolMetrics) -> Score {
    let commits = COMMITS_RANGE.normalize(metrics.github_commits_last_month()) * 50.0;
    // Unknown cadence earns nothing rather than the "releases daily" maximum.
    let releases = metrics
        .release_frequency_days
        .map(|days| (100.0 - days).max(0.0) * 0.5)
        .unwrap_or(0.0);
    commits + releases
}

pub fn platform_resilience(capabilities: &ToolCapabilities) -> Score {
    let providers = (20.0 * capabilities.llm_providers.len() as f64).min(60.0);
    let deployments = (20.0 * capabilities.deployment_options.len() as f64).min(40.0);
    providers + deployments
}

/// Can go negative for negative sentiment.
pub fn community_sentiment(metrics: &ToolMetrics) -> Score {
    metrics.sentiment_score() * 50.0 + MENTIONS_RANGE.normalize(metrics.social_mentions_30d()) * 50.0
}
