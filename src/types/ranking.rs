use crate::types::scoring::{Factor, Score, ToolScore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTool {
    pub position: u32,
    pub tool_name: String,
    pub completeness: f64,
    pub score: ToolScore,
}

/// A persisted ranking snapshot for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPeriod {
    pub period: String,
    pub algorithm_version: String,
    pub generated_at: String,
    pub reference_date: NaiveDate,
    pub input_digest: String,
    pub rankings: Vec<RankedTool>,
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl RankingPeriod {
    pub fn find(&self, tool_id: &str) -> Option<&RankedTool> {
        self.rankings
            .iter()
            .find(|ranked| ranked.score.tool_id == tool_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    MajorRise,
    Rise,
    Stable,
    Decline,
    MajorDecline,
    NewEntry,
    Dropped,
}

impl ChangeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MajorRise => "major_rise",
            Self::Rise => "rise",
            Self::Stable => "stable",
            Self::Decline => "decline",
            Self::MajorDecline => "major_decline",
            Self::NewEntry => "new_entry",
            Self::Dropped => "dropped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorChange {
    pub factor: Factor,
    pub previous_value: Score,
    pub current_value: Score,
    pub change: Score,
    pub percent_change: Score,
    /// Contribution of this change to the overall score under the current weights.
    pub impact: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingChange {
    pub tool_id: String,
    pub tool_name: String,
    pub previous_position: Option<u32>,
    pub current_position: Option<u32>,
    pub position_change: i64,
    pub previous_score: Score,
    pub current_score: Score,
    pub score_change: Score,
    pub percent_change: Score,
    pub category: ChangeCategory,
    pub factor_changes: Vec<FactorChange>,
    pub primary_factor: Option<Factor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub previous_period: String,
    pub current_period: String,
    pub algorithm_version: String,
    pub major_movers: MajorMovers,
    pub factor_trends: BTreeMap<Factor, FactorTrend>,
    pub changes: Vec<RankingChange>,
}

/// Largest position swings, as tool ids ordered by size of move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorMovers {
    pub rise_count: usize,
    pub decline_count: usize,
    pub rises: Vec<String>,
    pub declines: Vec<String>,
}

/// Number of tools whose factor improved or declined this period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorTrend {
    pub improving: u32,
    pub declining: u32,
}
