use crate::error::RankingError;
use crate::scoring::weights::AlgorithmRegistry;
use crate::types::scoring::Factor;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_ALGORITHM_VERSION: &str = "v7.3.1";
pub const DEFAULT_OUTPUT_DIR: &str = ".toolrank/snapshots";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingsConfig {
    pub algorithm: Option<AlgorithmConfig>,
    pub ranking: Option<RankingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlgorithmConfig {
    pub version: Option<String>,
    pub reference_date: Option<NaiveDate>,
    pub weights: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingConfig {
    pub min_completeness: Option<f64>,
    pub output_dir: Option<String>,
}

impl RankingsConfig {
    pub fn algorithm_version(&self) -> &str {
        self.algorithm
            .as_ref()
            .and_then(|algorithm| algorithm.version.as_deref())
            .unwrap_or(DEFAULT_ALGORITHM_VERSION)
    }

    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.algorithm
            .as_ref()
            .and_then(|algorithm| algorithm.reference_date)
    }

    /// Weight overrides keyed by factor. Unknown keys are dropped here and
    /// reported by [`RankingsConfig::validate`].
    pub fn weight_overrides(&self) -> BTreeMap<Factor, f64> {
        self.algorithm
            .as_ref()
            .and_then(|algorithm| algorithm.weights.as_ref())
            .map(|weights| {
                weights
                    .iter()
                    .filter_map(|(key, weight)| {
                        key.parse::<Factor>().ok().map(|factor| (factor, *weight))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn min_completeness(&self) -> f64 {
        self.ranking
            .as_ref()
            .and_then(|ranking| ranking.min_completeness)
            .unwrap_or(0.0)
    }

    pub fn output_dir(&self) -> &str {
        self.ranking
            .as_ref()
            .and_then(|ranking| ranking.output_dir.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    pub fn validate(&self, registry: &AlgorithmRegistry) -> Result<(), RankingError> {
        let version = registry.get(self.algorithm_version())?;

        if let Some(weights) = self
            .algorithm
            .as_ref()
            .and_then(|algorithm| algorithm.weights.as_ref())
        {
            let mut unknown = weights
                .keys()
                .filter(|key| key.parse::<Factor>().is_err())
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                unknown.sort();
                return Err(RankingError::ConfigParse(format!(
                    "algorithm.weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
            if weights.values().any(|weight| !(0.0..=1.0).contains(weight)) {
                return Err(RankingError::ConfigParse(
                    "algorithm.weights values must be between 0.0 and 1.0".to_string(),
                ));
            }
            version.check_weights(&version.weights.with_overrides(&self.weight_overrides()))?;
        }

        if !(0.0..=1.0).contains(&self.min_completeness()) {
            return Err(RankingError::ConfigParse(
                "ranking.min_completeness must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.output_dir().trim().is_empty() {
            return Err(RankingError::ConfigParse(
                "ranking.output_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
