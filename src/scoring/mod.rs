pub mod factors;
pub mod innovation;
pub mod normalize;
pub mod weights;

use crate::error::Result;
use crate::types::scoring::{round_score, Factor, FactorScores, Score, ToolScore};
use crate::types::tool::{ToolCapabilities, ToolMetrics};
use chrono::{NaiveDate, Utc};
use weights::{AlgorithmVersion, RankingWeights};

pub const MIN_FACTOR_SCORE: Score = 0.0;
pub const MAX_FACTOR_SCORE: Score = 100.0;

/// Scores tools under one algorithm version. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    version: &'static str,
    weights: RankingWeights,
    reference_date: NaiveDate,
}

impl ScoringEngine {
    pub fn new(version: &AlgorithmVersion) -> Result<Self> {
        Self::with_weights(version, version.weights.clone())
    }

    pub fn with_weights(version: &AlgorithmVersion, weights: RankingWeights) -> Result<Self> {
        version.check_weights(&weights)?;
        Ok(Self {
            version: version.id,
            weights,
            reference_date: Utc::now().date_naive(),
        })
    }

    /// Fixes the date age-based bonuses are measured against.
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn calculate_tool_score(
        &self,
        metrics: &ToolMetrics,
        capabilities: &ToolCapabilities,
    ) -> ToolScore {
        let mut factor_scores = FactorScores::new();
        let mut overall = 0.0;
        for (factor, weight) in self.weights.iter() {
            let raw = self.raw_factor(factor, metrics, capabilities);
            let score = clamp_factor(raw);
            if raw != score {
                tracing::debug!(
                    tool = %metrics.tool_id,
                    %factor,
                    raw,
                    "factor clamped into [0, 100]"
                );
            }
            overall += score * weight;
            factor_scores.insert(factor, score);
        }

        let overall_score = round_score(overall);
        tracing::debug!(tool = %metrics.tool_id, version = self.version, overall_score, "scored tool");
        ToolScore {
            tool_id: metrics.tool_id.clone(),
            overall_score,
            factor_scores,
        }
    }

    fn raw_factor(
        &self,
        factor: Factor,
        metrics: &ToolMetrics,
        capabilities: &ToolCapabilities,
    ) -> Score {
        match factor {
            Factor::MarketTraction => factors::market_traction(metrics),
            Factor::TechnicalCapability => factors::technical_capability(capabilities),
            Factor::DeveloperAdoption => factors::developer_adoption(metrics),
            Factor::DevelopmentVelocity => factors::development_velocity(metrics),
            Factor::PlatformResilience => factors::platform_resilience(capabilities),
            Factor::CommunitySentiment => factors::community_sentiment(metrics),
            Factor::Innovation => innovation::innovation(capabilities, self.reference_date),
        }
    }
}

/// The single cap every factor passes through, after all of its terms.
fn clamp_factor(raw: Score) -> Score {
    if raw.is_nan() {
        return MIN_FACTOR_SCORE;
    }
    raw.clamp(MIN_FACTOR_SCORE, MAX_FACTOR_SCORE)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::tool::{ToolCapabilities, ToolMetrics};

    pub fn reference_metrics() -> ToolMetrics {
        ToolMetrics {
            tool_id: "reference".to_string(),
            funding_total: Some(500_000_000.0),
            valuation_latest: Some(5_000_000_000.0),
            estimated_users: Some(500_000.0),
            github_stars: Some(50_000.0),
            github_forks: Some(5_000.0),
            github_contributors: Some(500.0),
            community_size: Some(25_000.0),
            github_commits_last_month: Some(250.0),
            release_frequency_days: Some(14.0),
            sentiment_score: Some(0.5),
            social_mentions_30d: Some(500.0),
        }
    }

    pub fn reference_capabilities() -> ToolCapabilities {
        ToolCapabilities {
            autonomy_level: Some(8.0),
            supports_multi_file: true,
            supported_languages: ["ts", "py", "go", "rs"].map(String::from).to_vec(),
            context_window_size: Some(100_000.0),
            llm_providers: ["openai", "anthropic"].map(String::from).to_vec(),
            deployment_options: ["cloud", "local"].map(String::from).to_vec(),
            ..ToolCapabilities::default()
        }
    }
}
