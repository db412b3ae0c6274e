// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Season Simulator
//
// Completes the season `trials` times. Each trial draws every remaining round
// for every participant independently from that participant's fitted Normal,
// clamps each round into the plausible score range and adds the sum to the
// points already accrued.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cancellation::CancellationToken;
use crate::config::RoundsRemainingPolicy;
use crate::error::ProjectionError;
use crate::types::{ParticipantId, ParticipantProfile, ScoreBounds};

// ─── Rounds Remaining ───────────────────────────────────────────────────────

/// Rounds left to simulate for each profile, in profile order.
pub fn rounds_remaining(
    profiles: &[ParticipantProfile],
    total_rounds: u32,
    policy: RoundsRemainingPolicy,
) -> Result<Vec<u32>, ProjectionError> {
    let league_played = profiles.iter().map(|p| p.played_rounds).max().unwrap_or(0);

    match policy {
        RoundsRemainingPolicy::LeagueMax => {
            let lagging = profiles.iter().filter(|p| p.played_rounds != league_played).count();
            if lagging > 0 {
                warn!(
                    lagging,
                    league_played,
                    "participants completed fewer rounds than the league; using the league count"
                );
            }
            Ok(vec![total_rounds.saturating_sub(league_played); profiles.len()])
        }
        RoundsRemainingPolicy::Strict => {
            if let Some(p) = profiles.iter().find(|p| p.played_rounds != league_played) {
                return Err(ProjectionError::UnsynchronizedRounds {
                    participant: p.id,
                    completed: p.played_rounds,
                    expected: league_played,
                });
            }
            Ok(vec![total_rounds.saturating_sub(league_played); profiles.len()])
        }
        RoundsRemainingPolicy::PerParticipant => Ok(profiles
            .iter()
            .map(|p| total_rounds.saturating_sub(p.played_rounds))
            .collect()),
    }
}

// ─── Simulation Ensemble ────────────────────────────────────────────────────

/// Simulated final totals of one trial, keyed by participant.
pub type TrialOutcome = BTreeMap<ParticipantId, f64>;

/// Final totals of every participant in every trial.
///
/// Stored trial-major: row `t` holds trial `t`'s totals in participant order,
/// so a trial's winner is a scan over one contiguous row.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEnsemble {
    participants: Vec<ParticipantId>,
    totals: Vec<f64>,
}

impl SimulationEnsemble {
    /// Build an ensemble from per-trial rows. Every row must carry one total
    /// per participant.
    pub fn from_trials(
        participants: Vec<ParticipantId>,
        trials: Vec<Vec<f64>>,
    ) -> Result<Self, ProjectionError> {
        if participants.is_empty() {
            return Err(ProjectionError::invalid("ensemble needs at least one participant"));
        }
        let mut totals = Vec::with_capacity(trials.len() * participants.len());
        for (t, row) in trials.into_iter().enumerate() {
            if row.len() != participants.len() {
                return Err(ProjectionError::invalid(format!(
                    "trial {} has {} totals for {} participants",
                    t,
                    row.len(),
                    participants.len()
                )));
            }
            totals.extend(row);
        }
        Ok(Self { participants, totals })
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn trial_count(&self) -> usize {
        self.totals.len() / self.participants.len()
    }

    pub fn trial(&self, t: usize) -> &[f64] {
        let width = self.participants.len();
        &self.totals[t * width..(t + 1) * width]
    }

    pub fn trials(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.totals.chunks(self.participants.len())
    }

    /// One participant's totals across all trials (column view).
    pub fn participant_totals(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.totals.iter().skip(index).step_by(self.participants.len()).copied()
    }

    pub fn mean_total(&self, index: usize) -> f64 {
        let n = self.trial_count();
        if n == 0 {
            return 0.0;
        }
        self.participant_totals(index).sum::<f64>() / n as f64
    }

    pub fn outcome(&self, t: usize) -> TrialOutcome {
        self.participants.iter().copied().zip(self.trial(t).iter().copied()).collect()
    }
}

// ─── Season Simulator ───────────────────────────────────────────────────────

/// What one participant contributes to every trial.
struct ParticipantPlan {
    accrued: f64,
    rounds: u32,
    /// `None` when nothing is left to play.
    normal: Option<Normal<f64>>,
}

impl ParticipantPlan {
    fn final_total<R: Rng + ?Sized>(&self, bounds: &ScoreBounds, rng: &mut R) -> f64 {
        match &self.normal {
            Some(normal) => {
                self.accrued
                    + (0..self.rounds).map(|_| bounds.clamp(normal.sample(rng))).sum::<f64>()
            }
            None => self.accrued,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeasonSimulator {
    bounds: ScoreBounds,
    shard_size: usize,
}

impl SeasonSimulator {
    /// Rejects an empty or inverted score range and a zero shard size.
    pub fn new(bounds: ScoreBounds, shard_size: usize) -> Result<Self, ProjectionError> {
        bounds.validate()?;
        if shard_size == 0 {
            return Err(ProjectionError::invalid("shard size must be positive"));
        }
        Ok(Self { bounds, shard_size })
    }

    /// Run `trials` season completions.
    ///
    /// Trials are split into shards of `shard_size`. One seed per shard is
    /// drawn from `rng` up front and each shard runs its own ChaCha8 stream,
    /// so the ensemble depends only on `rng`, never on thread scheduling.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        profiles: &[ParticipantProfile],
        rounds_remaining: &[u32],
        trials: usize,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<SimulationEnsemble, ProjectionError> {
        if profiles.is_empty() {
            return Err(ProjectionError::invalid("no participants to simulate"));
        }
        if rounds_remaining.len() != profiles.len() {
            return Err(ProjectionError::invalid(format!(
                "{} rounds-remaining values for {} participants",
                rounds_remaining.len(),
                profiles.len()
            )));
        }

        let plans = profiles
            .iter()
            .zip(rounds_remaining)
            .map(|(profile, &rounds)| {
                let normal = if rounds == 0 {
                    None
                } else {
                    Some(Normal::new(profile.mean, profile.std_dev).map_err(|e| {
                        ProjectionError::invalid(format!(
                            "participant {} distribution N({}, {}): {}",
                            profile.id, profile.mean, profile.std_dev, e
                        ))
                    })?)
                };
                Ok(ParticipantPlan { accrued: profile.current_points as f64, rounds, normal })
            })
            .collect::<Result<Vec<_>, ProjectionError>>()?;

        if trials == 0 {
            return Err(ProjectionError::invalid("trial count must be positive"));
        }
        let width = plans.len();
        let cells = trials.checked_mul(width).ok_or_else(|| {
            ProjectionError::invalid(format!("{} trials of {} participants is too large", trials, width))
        })?;
        // shard never exceeds trials, so shard * width <= cells
        let shard = self.shard_size.min(trials);
        let shard_count = trials.div_ceil(shard);
        let seeds: Vec<u64> = (0..shard_count).map(|_| rng.gen()).collect();
        let mut totals = vec![0.0_f64; cells];

        let bounds = self.bounds;
        totals
            .par_chunks_mut(shard * width)
            .zip(seeds.into_par_iter())
            .enumerate()
            .try_for_each(|(shard, (chunk, seed))| {
                if cancel.is_cancelled() {
                    return Err(ProjectionError::Cancelled);
                }
                let mut shard_rng = ChaCha8Rng::seed_from_u64(seed);
                for row in chunk.chunks_mut(width) {
                    for (slot, plan) in row.iter_mut().zip(&plans) {
                        *slot = plan.final_total(&bounds, &mut shard_rng);
                    }
                }
                debug!(shard, trials = chunk.len() / width, "shard complete");
                Ok(())
            })?;

        Ok(SimulationEnsemble {
            participants: profiles.iter().map(|p| p.id).collect(),
            totals,
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn profile(id: u64, history: &[u32], mean: f64, std_dev: f64) -> ParticipantProfile {
        ParticipantProfile {
            id: ParticipantId(id),
            name: format!("team-{}", id),
            manager: format!("manager-{}", id),
            current_points: history.iter().map(|&p| p as u64).sum(),
            mean,
            std_dev,
            played_rounds: history.len() as u32,
        }
    }

    fn simulator() -> SeasonSimulator {
        SeasonSimulator::new(ScoreBounds::default(), 250).expect("test: simulator")
    }

    #[test]
    fn no_rounds_left_collapses_to_current_points() {
        let profiles = vec![profile(1, &[60, 70], 65.0, 5.0), profile(2, &[50, 55], 52.5, 5.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ensemble = simulator()
            .simulate(&profiles, &[0, 0], 1000, &mut rng, &CancellationToken::new())
            .expect("test: simulate");

        assert_eq!(ensemble.trial_count(), 1000);
        assert!(ensemble.participant_totals(0).all(|t| t == 130.0));
        assert!(ensemble.participant_totals(1).all(|t| t == 105.0));
    }

    #[test]
    fn every_round_is_clamped_into_bounds() {
        // a wild distribution still lands inside [accrued + 35r, accrued + 100r]
        let profiles = vec![profile(1, &[50], 60.0, 400.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ensemble = simulator()
            .simulate(&profiles, &[4], 2000, &mut rng, &CancellationToken::new())
            .expect("test: simulate");

        for total in ensemble.participant_totals(0) {
            assert!(total >= 50.0 + 4.0 * 35.0 && total <= 50.0 + 4.0 * 100.0, "total {} out of range", total);
        }
    }

    #[test]
    fn mean_total_tracks_fitted_mean() {
        let profiles = vec![profile(1, &[60, 60], 60.0, 8.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ensemble = simulator()
            .simulate(&profiles, &[10], 10_000, &mut rng, &CancellationToken::new())
            .expect("test: simulate");
        let mean = ensemble.mean_total(0);
        assert!((mean - 720.0).abs() < 2.0, "mean {} far from 720", mean);
    }

    #[test]
    fn same_seed_same_ensemble() {
        let profiles = vec![profile(1, &[60], 60.0, 10.0), profile(2, &[55], 55.0, 12.0)];
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            simulator()
                .simulate(&profiles, &[5, 5], 1234, &mut rng, &CancellationToken::new())
                .expect("test: simulate")
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn cancelled_run_returns_cancelled() {
        let profiles = vec![profile(1, &[60], 60.0, 10.0)];
        let token = CancellationToken::new();
        token.cancel();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = simulator().simulate(&profiles, &[5], 5000, &mut rng, &token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn cancelling_mid_run_stops_between_shards() {
        let profiles = vec![profile(1, &[60], 60.0, 10.0)];
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(20));
                token.cancel();
            })
        };
        // far more work than 20ms, split into many small shards
        let small_shards = SeasonSimulator::new(ScoreBounds::default(), 16).expect("test: simulator");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = small_shards
            .simulate(&profiles, &[37], 4_000_000, &mut rng, &token)
            .unwrap_err();
        canceller.join().expect("test: canceller thread");
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn oversized_shard_runs_as_one_shard() {
        let profiles = vec![profile(1, &[60, 60], 60.0, 5.0), profile(2, &[50, 50], 50.0, 5.0)];
        let huge = SeasonSimulator::new(ScoreBounds::default(), usize::MAX).expect("test: simulator");
        let one_shard = SeasonSimulator::new(ScoreBounds::default(), 100).expect("test: simulator");
        let run = |simulator: SeasonSimulator| {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            simulator
                .simulate(&profiles, &[1, 1], 100, &mut rng, &CancellationToken::new())
                .expect("test: simulate")
        };
        let ensemble = run(huge);
        assert_eq!(ensemble.trial_count(), 100);
        assert!(ensemble.participant_totals(0).all(|t| t >= 120.0 + 35.0));
        assert!(ensemble.participant_totals(1).all(|t| t >= 100.0 + 35.0));
        assert_eq!(ensemble, run(one_shard));
    }

    #[test]
    fn invalid_simulator_parameters_rejected() {
        let err = SeasonSimulator::new(ScoreBounds::new(100.0, 35.0), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        let err = SeasonSimulator::new(ScoreBounds::default(), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn trial_and_column_views_agree() {
        let ensemble = SimulationEnsemble::from_trials(
            vec![ParticipantId(1), ParticipantId(2)],
            vec![vec![10.0, 20.0], vec![30.0, 40.0], vec![50.0, 60.0]],
        )
        .expect("test: ensemble");
        assert_eq!(ensemble.trial_count(), 3);
        assert_eq!(ensemble.trial(1), &[30.0, 40.0]);
        assert_eq!(ensemble.participant_totals(1).collect::<Vec<_>>(), vec![20.0, 40.0, 60.0]);
        assert_eq!(ensemble.mean_total(0), 30.0);
        assert_eq!(ensemble.outcome(2)[&ParticipantId(2)], 60.0);
    }

    #[test]
    fn ragged_trials_rejected() {
        let err = SimulationEnsemble::from_trials(
            vec![ParticipantId(1), ParticipantId(2)],
            vec![vec![10.0, 20.0], vec![30.0]],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    // -- Rounds remaining ---------------------------------------------------

    #[test]
    fn league_max_uses_most_completed_rounds() {
        let profiles = vec![profile(1, &[50, 50, 50], 50.0, 5.0), profile(2, &[50, 50], 50.0, 5.0)];
        let remaining = rounds_remaining(&profiles, 38, RoundsRemainingPolicy::LeagueMax).expect("test");
        assert_eq!(remaining, vec![35, 35]);
    }

    #[test]
    fn strict_rejects_mismatched_histories() {
        let profiles = vec![profile(1, &[50, 50, 50], 50.0, 5.0), profile(2, &[50, 50], 50.0, 5.0)];
        let err = rounds_remaining(&profiles, 38, RoundsRemainingPolicy::Strict).unwrap_err();
        match err {
            ProjectionError::UnsynchronizedRounds { participant, completed, expected } => {
                assert_eq!(participant, ParticipantId(2));
                assert_eq!(completed, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn per_participant_counts_own_rounds() {
        let profiles = vec![profile(1, &[50, 50, 50], 50.0, 5.0), profile(2, &[50, 50], 50.0, 5.0)];
        let remaining = rounds_remaining(&profiles, 5, RoundsRemainingPolicy::PerParticipant).expect("test");
        assert_eq!(remaining, vec![2, 3]);
    }

    #[test]
    fn finished_season_never_goes_negative() {
        let profiles = vec![profile(1, &[50; 40], 50.0, 5.0)];
        let remaining = rounds_remaining(&profiles, 38, RoundsRemainingPolicy::LeagueMax).expect("test");
        assert_eq!(remaining, vec![0]);
    }
}
