// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine
//
// Projects a season-long points league: fits each participant's per-round
// scoring, simulates the remaining rounds many times and reports expected
// rank, win probability and a projected final table.

pub mod types;
pub mod error;
pub mod config;
pub mod provider;
pub mod estimator;
pub mod cancellation;
pub mod simulation;
pub mod stats;
pub mod aggregate;
pub mod engine;
pub mod telemetry;

pub use aggregate::{OutcomeAggregator, ProjectedRow, ProjectionResult};
pub use cancellation::CancellationToken;
pub use config::{EstimationPolicy, ProjectionConfig, RoundsRemainingPolicy};
pub use engine::{project, ProjectionEngine};
pub use error::{ErrorKind, ProjectionError};
pub use estimator::{DistributionEstimator, FittedDistribution};
pub use provider::{HistoryProvider, LeagueSnapshot, RosterProvider, SnapshotEntry};
pub use simulation::{SeasonSimulator, SimulationEnsemble, TrialOutcome};
pub use stats::Stats;
pub use types::*;
