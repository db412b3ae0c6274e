// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Distribution Estimator
//
// Fits the per-round Normal(mean, std_dev) a participant is assumed to score
// from in every remaining round.

use serde::{Deserialize, Serialize};

use crate::config::{validate_std_dev_floor, EstimationPolicy};
use crate::error::ProjectionError;
use crate::types::{ParticipantId, RoundHistory};

/// Fitted per-round performance of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedDistribution {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionEstimator {
    policy: EstimationPolicy,
    std_dev_floor: f64,
}

impl DistributionEstimator {
    /// Rejects a non-positive half-life and a negative or non-finite floor.
    pub fn new(policy: EstimationPolicy, std_dev_floor: f64) -> Result<Self, ProjectionError> {
        policy.validate()?;
        validate_std_dev_floor(std_dev_floor)?;
        Ok(Self { policy, std_dev_floor })
    }

    /// Fit a distribution to `history`. The returned std-dev is never below
    /// the configured floor.
    pub fn fit(
        &self,
        participant: ParticipantId,
        history: &RoundHistory,
    ) -> Result<FittedDistribution, ProjectionError> {
        if history.is_empty() {
            return Err(ProjectionError::InsufficientHistory { participant });
        }
        let points: Vec<f64> = history.points().iter().map(|&p| p as f64).collect();
        let weights = match self.policy {
            EstimationPolicy::Unweighted => vec![1.0; points.len()],
            EstimationPolicy::RecencyWeighted { half_life } => recency_weights(points.len(), half_life),
        };
        let (mean, variance) = weighted_moments(&points, &weights);

        Ok(FittedDistribution {
            mean,
            std_dev: variance.sqrt().max(self.std_dev_floor),
        })
    }
}

/// Weight of each round, oldest first, halving every `half_life` rounds of age.
/// Normalised to sum to 1. `half_life` must be positive.
pub fn recency_weights(len: usize, half_life: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..len)
        .map(|i| {
            let age = (len - 1 - i) as f64;
            0.5_f64.powf(age / half_life)
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Weighted mean and weighted (population) variance about that mean.
fn weighted_moments(points: &[f64], weights: &[f64]) -> (f64, f64) {
    let total_weight: f64 = weights.iter().sum();
    let mean = points.iter().zip(weights).map(|(x, w)| x * w).sum::<f64>() / total_weight;
    let variance = points
        .iter()
        .zip(weights)
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / total_weight;
    (mean, variance)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ID: ParticipantId = ParticipantId(1);

    fn history(points: &[u32]) -> RoundHistory {
        RoundHistory::new(points.to_vec())
    }

    #[test]
    fn unweighted_matches_population_moments() {
        let est = DistributionEstimator::new(EstimationPolicy::Unweighted, 0.0).expect("test: estimator");
        let fit = est.fit(ID, &history(&[40, 50, 60, 70])).expect("test: fit");
        assert!((fit.mean - 55.0).abs() < 1e-12);
        // population variance = (225 + 25 + 25 + 225) / 4 = 125
        assert!((fit.std_dev - 125.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn floor_applies_to_constant_history() {
        let est = DistributionEstimator::new(EstimationPolicy::Unweighted, 5.0).expect("test: estimator");
        let fit = est.fit(ID, &history(&[60, 60, 60])).expect("test: fit");
        assert_eq!(fit.mean, 60.0);
        assert_eq!(fit.std_dev, 5.0);

        let weighted = DistributionEstimator::new(EstimationPolicy::RecencyWeighted { half_life: 6.0 }, 5.0)
            .expect("test: estimator");
        assert_eq!(weighted.fit(ID, &history(&[60, 60, 60])).expect("test: fit").std_dev, 5.0);
    }

    #[test]
    fn empty_history_is_insufficient() {
        let est = DistributionEstimator::new(EstimationPolicy::default(), 5.0).expect("test: estimator");
        let err = est.fit(ID, &RoundHistory::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientHistory);
    }

    #[test]
    fn recency_weights_normalised_and_halving() {
        let w = recency_weights(7, 6.0);
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // oldest round is exactly one half-life older than the latest
        assert!((w[0] / w[6] - 0.5).abs() < 1e-12);
        assert!(w.windows(2).all(|p| p[0] < p[1]), "weights must grow toward recent rounds");
    }

    #[test]
    fn recency_weighting_favours_recent_form() {
        let points = history(&[30, 30, 30, 30, 90, 90]);
        let flat = DistributionEstimator::new(EstimationPolicy::Unweighted, 0.0)
            .expect("test: estimator")
            .fit(ID, &points)
            .expect("test: fit");
        let recent = DistributionEstimator::new(EstimationPolicy::RecencyWeighted { half_life: 2.0 }, 0.0)
            .expect("test: estimator")
            .fit(ID, &points)
            .expect("test: fit");
        assert!((flat.mean - 50.0).abs() < 1e-12);
        assert!(recent.mean > flat.mean, "weighted mean {} should exceed {}", recent.mean, flat.mean);
    }

    #[test]
    fn invalid_parameters_rejected_at_construction() {
        for half_life in [0.0, -1.0, f64::INFINITY] {
            let err = DistributionEstimator::new(EstimationPolicy::RecencyWeighted { half_life }, 5.0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }
        assert!(DistributionEstimator::new(EstimationPolicy::Unweighted, -0.5).is_err());
        assert!(DistributionEstimator::new(EstimationPolicy::Unweighted, f64::NAN).is_err());
    }

    #[test]
    fn single_round_history() {
        let est = DistributionEstimator::new(EstimationPolicy::default(), 5.0).expect("test: estimator");
        let fit = est.fit(ID, &history(&[72])).expect("test: fit");
        assert_eq!(fit.mean, 72.0);
        assert_eq!(fit.std_dev, 5.0);
    }
}
