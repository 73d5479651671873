use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type Score = f64;

/// Scoring factors, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    MarketTraction,
    TechnicalCapability,
    DeveloperAdoption,
    DevelopmentVelocity,
    PlatformResilience,
    CommunitySentiment,
    Innovation,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::MarketTraction,
        Factor::TechnicalCapability,
        Factor::DeveloperAdoption,
        Factor::DevelopmentVelocity,
        Factor::PlatformResilience,
        Factor::CommunitySentiment,
        Factor::Innovation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarketTraction => "market_traction",
            Self::TechnicalCapability => "technical_capability",
            Self::DeveloperAdoption => "developer_adoption",
            Self::DevelopmentVelocity => "development_velocity",
            Self::PlatformResilience => "platform_resilience",
            Self::CommunitySentiment => "community_sentiment",
            Self::Innovation => "innovation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MarketTraction => "Market Traction",
            Self::TechnicalCapability => "Technical Capability",
            Self::DeveloperAdoption => "Developer Adoption",
            Self::DevelopmentVelocity => "Development Velocity",
            Self::PlatformResilience => "Platform Resilience",
            Self::CommunitySentiment => "Community Sentiment",
            Self::Innovation => "Innovation",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Factor::ALL
            .into_iter()
            .find(|factor| factor.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

pub type FactorScores = BTreeMap<Factor, Score>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolScore {
    pub tool_id: String,
    pub overall_score: Score,
    pub factor_scores: FactorScores,
}

impl ToolScore {
    pub fn factor(&self, factor: Factor) -> Score {
        self.factor_scores.get(&factor).copied().unwrap_or(0.0)
    }
}

/// Rounds to the 3-decimal precision scores are published with.
pub fn round_score(value: Score) -> Score {
    (value * 1000.0).round() / 1000.0
}
