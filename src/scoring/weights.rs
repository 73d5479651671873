use crate::error::{RankingError, Result};
use crate::types::scoring::Factor;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Named weight coefficients, one per scoring factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankingWeights(BTreeMap<Factor, f64>);

impl RankingWeights {
    pub fn new(entries: impl IntoIterator<Item = (Factor, f64)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn default_weights() -> Self {
        Self::new([
            (Factor::MarketTraction, 0.25),
            (Factor::TechnicalCapability, 0.20),
            (Factor::DeveloperAdoption, 0.20),
            (Factor::DevelopmentVelocity, 0.15),
            (Factor::PlatformResilience, 0.10),
            (Factor::CommunitySentiment, 0.10),
        ])
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.0.get(&factor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        self.0.iter().map(|(factor, weight)| (*factor, *weight))
    }

    pub fn factors(&self) -> BTreeSet<Factor> {
        self.0.keys().copied().collect()
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Returns a copy with `overrides` replacing matching entries.
    pub fn with_overrides(&self, overrides: &BTreeMap<Factor, f64>) -> Self {
        let mut merged = self.0.clone();
        for (factor, weight) in overrides {
            merged.insert(*factor, *weight);
        }
        Self(merged)
    }

    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(RankingError::Configuration(
                "weights must name at least one factor".to_string(),
            ));
        }
        if let Some((factor, weight)) = self
            .iter()
            .find(|(_, weight)| !weight.is_finite() || !(0.0..=1.0).contains(weight))
        {
            return Err(RankingError::Configuration(format!(
                "weight for {factor} must be between 0.0 and 1.0 (found {weight})"
            )));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RankingError::Configuration(format!(
                "weights must sum to 1.0 (found {sum:.6})"
            )));
        }
        Ok(())
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self::default_weights()
    }
}

/// An immutable pairing of a factor set and its weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmVersion {
    pub id: &'static str,
    pub name: &'static str,
    pub released: &'static str,
    pub weights: RankingWeights,
}

impl AlgorithmVersion {
    pub fn factors(&self) -> BTreeSet<Factor> {
        self.weights.factors()
    }

    /// Checks that `weights` covers exactly this version's factors and sums to 1.0.
    pub fn check_weights(&self, weights: &RankingWeights) -> Result<()> {
        let expected = self.factors();
        let supplied = weights.factors();
        if let Some(missing) = expected.difference(&supplied).next() {
            return Err(RankingError::Configuration(format!(
                "algorithm {} requires a weight for {missing}",
                self.id
            )));
        }
        if let Some(extra) = supplied.difference(&expected).next() {
            return Err(RankingError::Configuration(format!(
                "algorithm {} does not score {extra}",
                self.id
            )));
        }
        weights.validate().map_err(|err| match err {
            RankingError::Configuration(message) => {
                RankingError::Configuration(format!("algorithm {}: {message}", self.id))
            }
            other => other,
        })
    }
}

/// Published algorithm versions keyed by id.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry {
    versions: Vec<AlgorithmVersion>,
}

impl AlgorithmRegistry {
    pub fn builtin() -> Self {
        let v73_weights = RankingWeights::new([
            (Factor::TechnicalCapability, 0.45),
            (Factor::MarketTraction, 0.125),
            (Factor::DeveloperAdoption, 0.125),
            (Factor::CommunitySentiment, 0.125),
            (Factor::Innovation, 0.10),
            (Factor::DevelopmentVelocity, 0.05),
            (Factor::PlatformResilience, 0.025),
        ]);

        Self {
            versions: vec![
                AlgorithmVersion {
                    id: "v6",
                    name: "Weighted Factors",
                    released: "2025-06-09",
                    weights: RankingWeights::default_weights(),
                },
                AlgorithmVersion {
                    id: "v7",
                    name: "Innovation Factor",
                    released: "2025-07-01",
                    weights: RankingWeights::new([
                        (Factor::TechnicalCapability, 0.375),
                        (Factor::CommunitySentiment, 0.15),
                        (Factor::MarketTraction, 0.125),
                        (Factor::DeveloperAdoption, 0.125),
                        (Factor::Innovation, 0.125),
                        (Factor::DevelopmentVelocity, 0.05),
                        (Factor::PlatformResilience, 0.05),
                    ]),
                },
                AlgorithmVersion {
                    id: "v7.3",
                    name: "Capability Focus",
                    released: "2025-10-15",
                    weights: v73_weights.clone(),
                },
                AlgorithmVersion {
                    id: "v7.3.1",
                    name: "Capability Focus (innovation cap fix)",
                    released: "2025-11-01",
                    weights: v73_weights,
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Result<&AlgorithmVersion> {
        self.versions
            .iter()
            .find(|version| version.id == id)
            .ok_or_else(|| RankingError::UnknownVersion(id.to_string()))
    }

    pub fn versions(&self) -> &[AlgorithmVersion] {
        &self.versions
    }

    /// Checks every published weight set and the shared calibration ranges.
    pub fn validate_all(&self) -> Result<()> {
        super::factors::check_calibration()?;
        for version in &self.versions {
            version.check_weights(&version.weights)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_published_version_sums_to_one() {
        let registry = AlgorithmRegistry::builtin();
        for version in registry.versions() {
            assert!(
                (version.weights.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
                "{} sums to {}",
                version.id,
                version.weights.sum()
            );
        }
        registry.validate_all().expect("builtin registry should validate");
    }

    #[test]
    fn default_weights_are_the_v6_set() {
        let registry = AlgorithmRegistry::builtin();
        let v6 = registry.get("v6").expect("v6 should exist");
        assert_eq!(v6.weights, RankingWeights::default());
        assert!(!v6.factors().contains(&Factor::Innovation));
    }

    #[test]
    fn later_versions_add_innovation() {
        let registry = AlgorithmRegistry::builtin();
        for id in ["v7", "v7.3", "v7.3.1"] {
            let version = registry.get(id).expect("version should exist");
            assert_eq!(version.factors().len(), 7);
            assert!(version.weights.get(Factor::Innovation).is_some());
        }
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = AlgorithmRegistry::builtin()
            .get("v8")
            .expect_err("v8 should not exist");
        assert!(matches!(err, RankingError::UnknownVersion(ref id) if id == "v8"));
    }

    #[test]
    fn check_weights_rejects_bad_sum() {
        let registry = AlgorithmRegistry::builtin();
        let v6 = registry.get("v6").expect("v6 should exist");
        let mut overrides = BTreeMap::new();
        overrides.insert(Factor::MarketTraction, 0.5);
        let err = v6
            .check_weights(&v6.weights.with_overrides(&overrides))
            .expect_err("sum of 1.25 should fail");
        assert!(err.to_string().contains("algorithm v6"));
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn capability_focus_weights_technical_capability_highest() {
        let registry = AlgorithmRegistry::builtin();
        let v7 = registry.get("v7").expect("v7 should exist");
        assert_eq!(v7.weights.get(Factor::TechnicalCapability), Some(0.375));
        assert_eq!(v7.weights.get(Factor::Innovation), Some(0.125));

        let v73 = registry.get("v7.3").expect("v7.3 should exist");
        let v731 = registry.get("v7.3.1").expect("v7.3.1 should exist");
        assert_eq!(v73.weights, v731.weights);
        assert_eq!(v73.weights.get(Factor::TechnicalCapability), Some(0.45));
        assert_eq!(v73.weights.get(Factor::PlatformResilience), Some(0.025));
    }

    #[test]
    fn check_weights_rejects_factor_set_mismatch() {
        let registry = AlgorithmRegistry::builtin();
        let v6 = registry.get("v6").expect("v6 should exist");
        let v7 = registry.get("v7").expect("v7 should exist");

        let err = v6
            .check_weights(&v7.weights)
            .expect_err("v6 does not score innovation");
        assert!(err.to_string().contains("does not score innovation"));

        let err = v7
            .check_weights(&v6.weights)
            .expect_err("v7 needs innovation");
        assert!(err.to_string().contains("requires a weight for innovation"));
    }

    #[test]
    fn validate_rejects_out_of_range_weight() {
        let weights = RankingWeights::new([(Factor::MarketTraction, 1.5), (Factor::Innovation, -0.5)]);
        let err = weights.validate().expect_err("negative weight should fail");
        assert!(err.to_string().contains("between 0.0 and 1.0"));
    }
}
