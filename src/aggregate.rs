// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Outcome Aggregator
//
// Reduces an ensemble to expected rank, win probability and the projected
// table. Ties never depend on roster order: equal means and equal per-trial
// totals both go to the lower participant id.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::simulation::SimulationEnsemble;
use crate::stats::Stats;
use crate::types::{ParticipantId, ParticipantLabel, ParticipantProfile};

// ─── Result Types ───────────────────────────────────────────────────────────

/// One line of the projected final table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRow {
    /// 1-based rank by mean projected final total.
    pub rank: usize,
    pub participant: ParticipantId,
    pub name: String,
    pub manager: String,
    pub current_points: u64,
    /// Mean projected final total rounded to the nearest point.
    pub projected_points: i64,
    pub mean_final_points: f64,
    pub win_probability: f64,
    /// `finish_probabilities[k]` is the share of trials finishing in position `k + 1`.
    /// Empty unless the finish distribution was requested.
    pub finish_probabilities: Vec<f64>,
    pub final_points: Stats,
    pub rounds_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub target: ParticipantId,
    pub target_label: ParticipantLabel,
    pub expected_rank: usize,
    pub win_probability: f64,
    pub mean_final_points: BTreeMap<ParticipantId, f64>,
    /// Ordered by rank ascending.
    pub table: Vec<ProjectedRow>,
    pub trials: usize,
    /// Most rounds any participant still had to play.
    pub rounds_remaining: u32,
}

impl ProjectionResult {
    pub fn row(&self, participant: ParticipantId) -> Option<&ProjectedRow> {
        self.table.iter().find(|r| r.participant == participant)
    }
}

// ─── Ordering Helpers ───────────────────────────────────────────────────────

/// Higher total first, then lower id.
fn standing_order(a: (f64, ParticipantId), b: (f64, ParticipantId)) -> Ordering {
    b.0.total_cmp(&a.0).then(a.1.cmp(&b.1))
}

/// Participant indices ordered by mean projected total.
pub fn rank_order(means: &[f64], ids: &[ParticipantId]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..means.len()).collect();
    order.sort_by(|&a, &b| standing_order((means[a], ids[a]), (means[b], ids[b])));
    order
}

/// Index of the single winner of one trial.
pub fn trial_winner(totals: &[f64], ids: &[ParticipantId]) -> usize {
    let mut best = 0;
    for j in 1..totals.len() {
        if standing_order((totals[j], ids[j]), (totals[best], ids[best])) == Ordering::Less {
            best = j;
        }
    }
    best
}

// ─── Aggregator ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeAggregator {
    finish_distribution: bool,
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also tally every participant's finishing position in every trial.
    pub fn with_finish_distribution(mut self, enabled: bool) -> Self {
        self.finish_distribution = enabled;
        self
    }

    /// `profiles` and `rounds_remaining` must be in ensemble participant order.
    pub fn aggregate(
        &self,
        ensemble: &SimulationEnsemble,
        profiles: &[ParticipantProfile],
        rounds_remaining: &[u32],
        target: ParticipantId,
    ) -> Result<ProjectionResult, ProjectionError> {
        let ids = ensemble.participants();
        let width = ids.len();
        if profiles.len() != width
            || rounds_remaining.len() != width
            || profiles.iter().zip(ids).any(|(p, id)| p.id != *id)
        {
            return Err(ProjectionError::invalid("profiles do not match the ensemble"));
        }
        let target_index = ids
            .iter()
            .position(|&id| id == target)
            .ok_or_else(|| ProjectionError::invalid(format!("participant {} is not in the league", target)))?;

        let trials = ensemble.trial_count();
        if trials == 0 {
            return Err(ProjectionError::invalid("ensemble holds no trials"));
        }

        let means: Vec<f64> = (0..width).map(|j| ensemble.mean_total(j)).collect();
        let order = rank_order(&means, ids);
        let mut ranks = vec![0usize; width];
        for (position, &j) in order.iter().enumerate() {
            ranks[j] = position + 1;
        }

        // wins and finishing positions, one pass over the trials
        let mut wins = vec![0u64; width];
        let mut finishes = if self.finish_distribution {
            vec![vec![0u64; width]; width]
        } else {
            Vec::new()
        };
        let mut trial_order: Vec<usize> = (0..width).collect();
        for row in ensemble.trials() {
            wins[trial_winner(row, ids)] += 1;
            if self.finish_distribution {
                trial_order.sort_by(|&a, &b| standing_order((row[a], ids[a]), (row[b], ids[b])));
                for (position, &j) in trial_order.iter().enumerate() {
                    finishes[j][position] += 1;
                }
            }
        }

        let n = trials as f64;
        let table = order
            .iter()
            .map(|&j| {
                let profile = &profiles[j];
                ProjectedRow {
                    rank: ranks[j],
                    participant: profile.id,
                    name: profile.name.clone(),
                    manager: profile.manager.clone(),
                    current_points: profile.current_points,
                    projected_points: means[j].round() as i64,
                    mean_final_points: means[j],
                    win_probability: wins[j] as f64 / n,
                    finish_probabilities: finishes
                        .get(j)
                        .map(|counts| counts.iter().map(|&c| c as f64 / n).collect())
                        .unwrap_or_default(),
                    final_points: Stats::from_samples(ensemble.participant_totals(j)),
                    rounds_remaining: rounds_remaining[j],
                }
            })
            .collect();

        let target_profile = &profiles[target_index];
        Ok(ProjectionResult {
            target,
            target_label: ParticipantLabel {
                name: target_profile.name.clone(),
                manager: target_profile.manager.clone(),
            },
            expected_rank: ranks[target_index],
            win_probability: wins[target_index] as f64 / n,
            mean_final_points: ids.iter().copied().zip(means.iter().copied()).collect(),
            table,
            trials,
            rounds_remaining: rounds_remaining.iter().copied().max().unwrap_or(0),
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
