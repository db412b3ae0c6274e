// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Entry Point
//
// roster -> histories -> fitted profiles -> ensemble -> aggregated result.
// All validation happens before the first draw.

use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::aggregate::{OutcomeAggregator, ProjectionResult};
use crate::cancellation::CancellationToken;
use crate::config::ProjectionConfig;
use crate::error::ProjectionError;
use crate::estimator::DistributionEstimator;
use crate::provider::{HistoryProvider, RosterProvider};
use crate::simulation::{rounds_remaining, SeasonSimulator};
use crate::types::{LeagueId, ParticipantId, ParticipantProfile, RosterEntry};

/// Projects a league held by provider `P`.
pub struct ProjectionEngine<'a, P> {
    provider: &'a P,
    config: ProjectionConfig,
    cancel: CancellationToken,
}

impl<'a, P> ProjectionEngine<'a, P>
where
    P: HistoryProvider + RosterProvider,
{
    pub fn new(provider: &'a P, config: ProjectionConfig) -> Self {
        Self { provider, config, cancel: CancellationToken::new() }
    }

    /// Share a token the caller can use to abort the run.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Project with a fresh, unseeded random source.
    pub fn project(
        &self,
        league: LeagueId,
        target: ParticipantId,
    ) -> Result<ProjectionResult, ProjectionError> {
        self.project_with_rng(league, target, &mut rand::thread_rng())
    }

    /// Project drawing all randomness from `rng`. Identical inputs and an
    /// identically seeded `rng` give identical results.
    pub fn project_with_rng<R: Rng + ?Sized>(
        &self,
        league: LeagueId,
        target: ParticipantId,
        rng: &mut R,
    ) -> Result<ProjectionResult, ProjectionError> {
        let start = Instant::now();
        self.config.validate()?;

        let roster = self.provider.list_participants(league)?;
        let mut seen = HashSet::with_capacity(roster.len());
        if let Some(dup) = roster.iter().find(|entry| !seen.insert(entry.id)) {
            return Err(ProjectionError::invalid(format!(
                "participant {} listed twice in league {}",
                dup.id, league
            )));
        }
        if !roster.iter().any(|entry| entry.id == target) {
            return Err(ProjectionError::invalid(format!(
                "participant {} is not in league {}",
                target, league
            )));
        }

        let profiles = self.build_profiles(&roster)?;
        let remaining = rounds_remaining(&profiles, self.config.total_rounds, self.config.rounds_policy)?;

        info!(
            %league,
            %target,
            participants = profiles.len(),
            trials = self.config.trials,
            rounds_remaining = remaining.iter().copied().max().unwrap_or(0),
            "starting projection"
        );

        let simulator = SeasonSimulator::new(self.config.score_bounds, self.config.shard_size)?;
        let ensemble = simulator.simulate(
            &profiles,
            &remaining,
            self.config.trials as usize,
            rng,
            &self.cancel,
        )?;
        let result = OutcomeAggregator::new()
            .with_finish_distribution(self.config.finish_distribution)
            .aggregate(&ensemble, &profiles, &remaining, target)?;

        info!(
            %target,
            expected_rank = result.expected_rank,
            win_probability = result.win_probability,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "projection complete"
        );
        Ok(result)
    }

    fn build_profiles(
        &self,
        roster: &[RosterEntry],
    ) -> Result<Vec<ParticipantProfile>, ProjectionError> {
        let estimator = DistributionEstimator::new(self.config.estimation, self.config.std_dev_floor)?;
        roster
            .iter()
            .map(|entry| {
                let history = self.provider.round_history(entry.id)?;
                let label = self.provider.participant_label(entry.id)?;
                let fit = estimator.fit(entry.id, &history)?;
                debug!(
                    participant = %entry.id,
                    rounds = history.len(),
                    mean = fit.mean,
                    std_dev = fit.std_dev,
                    "fitted profile"
                );
                Ok(ParticipantProfile {
                    id: entry.id,
                    name: label.name,
                    manager: label.manager,
                    current_points: history.total(),
                    mean: fit.mean,
                    std_dev: fit.std_dev,
                    played_rounds: history.len() as u32,
                })
            })
            .collect()
    }
}

/// Project `target` in `league` with an unseeded random source.
pub fn project<P>(
    provider: &P,
    league: LeagueId,
    target: ParticipantId,
    config: &ProjectionConfig,
) -> Result<ProjectionResult, ProjectionError>
where
    P: HistoryProvider + RosterProvider,
{
    ProjectionEngine::new(provider, config.clone()).project(league, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::provider::LeagueSnapshot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn league() -> LeagueSnapshot {
        LeagueSnapshot::new(LeagueId(1), "test")
            .with_entry(1, "Alpha", "A", vec![60, 62, 58])
            .with_entry(2, "Bravo", "B", vec![50, 48, 52])
    }

    #[test]
    fn validation_runs_before_provider_data_is_used() {
        let snapshot = league();
        let engine = ProjectionEngine::new(&snapshot, ProjectionConfig::default().with_trials(0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = engine.project_with_rng(LeagueId(1), ParticipantId(1), &mut rng).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn duplicate_roster_entries_rejected() {
        let snapshot = league().with_entry(2, "Bravo again", "B", vec![50]);
        let engine = ProjectionEngine::new(&snapshot, ProjectionConfig::default().with_trials(10));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = engine.project_with_rng(LeagueId(1), ParticipantId(1), &mut rng).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn profiles_carry_provider_labels() {
        let snapshot = league();
        let engine = ProjectionEngine::new(&snapshot, ProjectionConfig::default().with_trials(200));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result = engine.project_with_rng(LeagueId(1), ParticipantId(2), &mut rng).expect("test: project");
        assert_eq!(result.target_label.name, "Bravo");
        assert_eq!(result.rounds_remaining, 35);
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.row(ParticipantId(1)).map(|r| r.current_points), Some(180));
    }

    #[test]
    fn unseeded_entry_point_runs() {
        let result = project(
            &league(),
            LeagueId(1),
            ParticipantId(1),
            &ProjectionConfig::default().with_trials(100),
        )
        .expect("test: project");
        assert_eq!(result.trials, 100);
    }
}
