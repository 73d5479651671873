use serde::{Deserialize, Serialize};

/// Value substituted for any metric a tool record does not carry.
pub const MISSING_METRIC: f64 = 0.0;

/// Observable statistics for one tool. Absent fields read as [`MISSING_METRIC`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolMetrics {
    pub tool_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_latest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_users: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_forks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_contributors: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_commits_last_month: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_frequency_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_mentions_30d: Option<f64>,
}

fn or_missing(value: Option<f64>) -> f64 {
    value.unwrap_or(MISSING_METRIC)
}

impl ToolMetrics {
    pub const FIELD_COUNT: usize = 11;

    #[cfg(test)]
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            ..Self::default()
        }
    }

    pub fn funding_total(&self) -> f64 {
        or_missing(self.funding_total)
    }

    pub fn valuation_latest(&self) -> f64 {
        or_missing(self.valuation_latest)
    }

    pub fn estimated_users(&self) -> f64 {
        or_missing(self.estimated_users)
    }

    pub fn github_stars(&self) -> f64 {
        or_missing(self.github_stars)
    }

    pub fn github_forks(&self) -> f64 {
        or_missing(self.github_forks)
    }

    pub fn github_contributors(&self) -> f64 {
        or_missing(self.github_contributors)
    }

    pub fn community_size(&self) -> f64 {
        or_missing(self.community_size)
    }

    pub fn github_commits_last_month(&self) -> f64 {
        or_missing(self.github_commits_last_month)
    }

    pub fn sentiment_score(&self) -> f64 {
        or_missing(self.sentiment_score)
    }

    pub fn social_mentions_30d(&self) -> f64 {
        or_missing(self.social_mentions_30d)
    }

    /// Fraction of metric fields present on this record, in `[0, 1]`.
    pub fn completeness(&self) -> f64 {
        let present = [
            self.funding_total,
            self.valuation_latest,
            self.estimated_users,
            self.github_stars,
            self.github_forks,
            self.github_contributors,
            self.community_size,
            self.github_commits_last_month,
            self.release_frequency_days,
            self.sentiment_score,
            self.social_mentions_30d,
        ]
        .iter()
        .filter(|value| value.is_some())
        .count();
        present as f64 / Self::FIELD_COUNT as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTechniques {
    #[serde(default)]
    pub mixture_of_experts: bool,
    #[serde(default)]
    pub speculative_decoding: bool,
    #[serde(default)]
    pub fast_indexing: bool,
}

/// Structured facts about what a tool does. Only list lengths are scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autonomy_level: Option<f64>,
    #[serde(default)]
    pub supports_multi_file: bool,
    #[serde(default)]
    pub supported_languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window_size: Option<f64>,
    #[serde(default)]
    pub llm_providers: Vec<String>,
    #[serde(default)]
    pub deployment_options: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub performance: PerformanceTechniques,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_year: Option<i32>,
}

impl ToolCapabilities {
    pub fn autonomy_level(&self) -> f64 {
        or_missing(self.autonomy_level)
    }

    pub fn context_window_size(&self) -> f64 {
        or_missing(self.context_window_size)
    }
}

/// One tool as stored on disk: metric fields at the top level, capabilities nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub metrics: ToolMetrics,
    #[serde(default)]
    pub capabilities: ToolCapabilities,
}

impl ToolRecord {
    pub fn tool_id(&self) -> &str {
        &self.metrics.tool_id
    }
}
