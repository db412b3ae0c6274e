// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Projection Parameters
//
// Every tunable of a projection run lives here. Defaults reproduce the
// historical behaviour; a partial JSON document overrides only what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ProjectionError;
use crate::types::ScoreBounds;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_TRIALS: u32 = 10_000;
pub const DEFAULT_HALF_LIFE: f64 = 6.0;
pub const DEFAULT_STD_DEV_FLOOR: f64 = 5.0;
pub const DEFAULT_TOTAL_ROUNDS: u32 = 38;
pub const DEFAULT_SHARD_SIZE: usize = 1000;

// ---------------------------------------------------------------------------
// EstimationPolicy
// ---------------------------------------------------------------------------

/// How a round history is turned into a per-round distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EstimationPolicy {
    /// Every round weighted equally; population standard deviation.
    Unweighted,
    /// Exponentially decaying weights; a round `half_life` rounds older than
    /// the latest one carries half its weight.
    RecencyWeighted { half_life: f64 },
}

impl Default for EstimationPolicy {
    fn default() -> Self {
        Self::RecencyWeighted { half_life: DEFAULT_HALF_LIFE }
    }
}

impl EstimationPolicy {
    /// A recency half-life must be finite and positive.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if let Self::RecencyWeighted { half_life } = *self {
            if !half_life.is_finite() || half_life <= 0.0 {
                return Err(ProjectionError::invalid(format!(
                    "half-life must be positive, got {}",
                    half_life
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RoundsRemainingPolicy
// ---------------------------------------------------------------------------

/// How rounds-remaining is derived when completed-round counts differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundsRemainingPolicy {
    /// One shared value: total rounds minus the most rounds any participant completed.
    #[default]
    LeagueMax,
    /// Reject the run unless every participant completed the same number of rounds.
    Strict,
    /// Each participant simulates total rounds minus their own completed rounds.
    PerParticipant,
}

// ---------------------------------------------------------------------------
// ProjectionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Number of simulated season completions.
    pub trials: u32,
    pub estimation: EstimationPolicy,
    /// Lower bound applied to every fitted standard deviation.
    pub std_dev_floor: f64,
    pub score_bounds: ScoreBounds,
    /// Rounds in a full season.
    pub total_rounds: u32,
    pub rounds_policy: RoundsRemainingPolicy,
    /// Trials per parallel shard; cancellation is observed between shards.
    /// Values above `trials` behave as one shard.
    pub shard_size: usize,
    /// Record each participant's finishing-position distribution. Costs a
    /// participants-squared table and a sort per trial, so it is off by default.
    pub finish_distribution: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            estimation: EstimationPolicy::default(),
            std_dev_floor: DEFAULT_STD_DEV_FLOOR,
            score_bounds: ScoreBounds::default(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            rounds_policy: RoundsRemainingPolicy::default(),
            shard_size: DEFAULT_SHARD_SIZE,
            finish_distribution: false,
        }
    }
}

impl ProjectionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ProjectionError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ProjectionError::invalid(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ProjectionError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProjectionError::invalid(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Reject parameters no run could honour. Called before any work starts.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.trials == 0 {
            return Err(ProjectionError::invalid("trial count must be positive"));
        }
        self.estimation.validate()?;
        validate_std_dev_floor(self.std_dev_floor)?;
        self.score_bounds.validate()?;
        if self.shard_size == 0 {
            return Err(ProjectionError::invalid("shard size must be positive"));
        }
        Ok(())
    }

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_estimation(mut self, estimation: EstimationPolicy) -> Self {
        self.estimation = estimation;
        self
    }

    pub fn with_std_dev_floor(mut self, floor: f64) -> Self {
        self.std_dev_floor = floor;
        self
    }

    pub fn with_total_rounds(mut self, total_rounds: u32) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    pub fn with_rounds_policy(mut self, policy: RoundsRemainingPolicy) -> Self {
        self.rounds_policy = policy;
        self
    }

    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = shard_size;
        self
    }

    pub fn with_finish_distribution(mut self, enabled: bool) -> Self {
        self.finish_distribution = enabled;
        self
    }
}

pub(crate) fn validate_std_dev_floor(floor: f64) -> Result<(), ProjectionError> {
    if !floor.is_finite() || floor < 0.0 {
        return Err(ProjectionError::invalid(format!(
            "standard deviation floor must be non-negative, got {}",
            floor
        )));
    }
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
