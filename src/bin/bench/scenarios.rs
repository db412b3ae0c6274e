// Scenario Definitions — synthetic leagues covering the shapes a real season takes
// League histories are generated once from a fixed seed; runs vary only the projection seed

use league_engine::{
    ErrorKind, EstimationPolicy, LeagueId, LeagueSnapshot, ProjectionConfig, RoundsRemainingPolicy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Seed used to generate every scenario's round history.
const LEAGUE_SEED: u64 = 2024;

pub const BENCH_LEAGUE: LeagueId = LeagueId(1);

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    /// Participant whose expected rank and win probability are judged.
    pub target: u64,
    pub league: fn() -> LeagueSnapshot,
    pub config: fn() -> ProjectionConfig,
    pub criteria: PassCriteria,
}

#[derive(Default)]
pub struct PassCriteria {
    pub min_win_probability: Option<f64>,
    pub max_win_probability: Option<f64>,
    pub expected_rank: Option<usize>,
    pub max_expected_rank: Option<usize>,
    /// The run must fail with this error instead of producing a result.
    pub expect_error: Option<ErrorKind>,
}

// ─── League Builders ────────────────────────────────────────────────────────

/// Team shape: (id, name, manager, per-round mean, per-round std-dev, rounds played).
type TeamShape = (u64, &'static str, &'static str, f64, f64, u32);

fn synthetic_league(name: &str, teams: &[TeamShape]) -> LeagueSnapshot {
    let mut rng = ChaCha8Rng::seed_from_u64(LEAGUE_SEED);
    let mut snapshot = LeagueSnapshot::new(BENCH_LEAGUE, name);
    for &(id, team, manager, mean, std_dev, played) in teams {
        let history = match Normal::new(mean, std_dev) {
            Ok(normal) => (0..played)
                .map(|_| normal.sample(&mut rng).clamp(10.0, 150.0).round() as u32)
                .collect(),
            Err(_) => vec![mean.round() as u32; played as usize],
        };
        snapshot = snapshot.with_entry(id, team, manager, history);
    }
    snapshot
}

fn tight_race() -> LeagueSnapshot {
    synthetic_league("Tight Race", &[
        (1, "Salah Fingers", "Priya", 58.0, 14.0, 20),
        (2, "Klopp Idol", "Marcus", 57.5, 12.0, 20),
        (3, "Net Busters", "Olu", 57.0, 16.0, 20),
        (4, "Expected Toulouse", "Dana", 56.5, 13.0, 20),
        (5, "Pep Talk", "Ivan", 56.0, 15.0, 20),
        (6, "Xhaka Khan", "Mei", 55.5, 11.0, 20),
    ])
}

fn runaway_leader() -> LeagueSnapshot {
    synthetic_league("Runaway Leader", &[
        (1, "Cold Palmer", "Sam", 78.0, 10.0, 25),
        (2, "Dubravka Party", "Lee", 52.0, 12.0, 25),
        (3, "Trent Reznor", "Ade", 51.0, 12.0, 25),
        (4, "Obi-Wan Kenobi", "Kit", 50.0, 12.0, 25),
    ])
}

fn season_finished() -> LeagueSnapshot {
    LeagueSnapshot::new(BENCH_LEAGUE, "Season Finished")
        .with_entry(1, "Champions", "Ruth", vec![60; 38])
        .with_entry(2, "Runners Up", "Tom", vec![55; 38])
        .with_entry(3, "Also Rans", "Zed", vec![50; 38])
}

fn late_joiner() -> LeagueSnapshot {
    synthetic_league("Late Joiner", &[
        (1, "Early Birds", "Nina", 55.0, 12.0, 20),
        (2, "Steady Eddies", "Raj", 54.0, 10.0, 20),
        (3, "Johnny Come Lately", "Gus", 62.0, 12.0, 14),
    ])
}

fn large_league() -> LeagueSnapshot {
    const NAMES: [&str; 10] = [
        "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India", "Juliet",
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(LEAGUE_SEED);
    let mut snapshot = LeagueSnapshot::new(BENCH_LEAGUE, "Large League");
    for id in 1..=50u64 {
        let mean = 48.0 + (id % 13) as f64;
        let normal = Normal::new(mean, 13.0);
        let history: Vec<u32> = match normal {
            Ok(normal) => (0..10).map(|_| normal.sample(&mut rng).clamp(10.0, 150.0).round() as u32).collect(),
            Err(_) => vec![mean as u32; 10],
        };
        let name = format!("{} {}", NAMES[(id % 10) as usize], id);
        snapshot = snapshot.with_entry(id, &name, "bench", history);
    }
    snapshot
}

// ─── Config Variants ────────────────────────────────────────────────────────

fn default_config() -> ProjectionConfig {
    ProjectionConfig::default()
}

fn unweighted_config() -> ProjectionConfig {
    ProjectionConfig::default().with_estimation(EstimationPolicy::Unweighted)
}

fn per_participant_config() -> ProjectionConfig {
    ProjectionConfig::default().with_rounds_policy(RoundsRemainingPolicy::PerParticipant)
}

fn strict_config() -> ProjectionConfig {
    ProjectionConfig::default().with_rounds_policy(RoundsRemainingPolicy::Strict)
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario { name: "TIGHT_RACE", label: "Tight Race (6 teams)", category: "race",
            target: 1, league: tight_race, config: default_config,
            criteria: PassCriteria {
                min_win_probability: Some(0.02),
                max_win_probability: Some(0.75),
                ..Default::default()
            },
        },
        Scenario { name: "TIGHT_RACE_UNWEIGHTED", label: "Tight Race (unweighted)", category: "race",
            target: 1, league: tight_race, config: unweighted_config,
            criteria: PassCriteria {
                min_win_probability: Some(0.02),
                max_win_probability: Some(0.75),
                ..Default::default()
            },
        },
        Scenario { name: "RUNAWAY_LEADER", label: "Runaway Leader", category: "race",
            target: 1, league: runaway_leader, config: default_config,
            criteria: PassCriteria {
                min_win_probability: Some(0.95),
                expected_rank: Some(1),
                ..Default::default()
            },
        },
        Scenario { name: "RUNAWAY_CHASER", label: "Runaway Leader (chaser view)", category: "race",
            target: 4, league: runaway_leader, config: default_config,
            criteria: PassCriteria {
                max_win_probability: Some(0.05),
                max_expected_rank: Some(4),
                ..Default::default()
            },
        },
        Scenario { name: "SEASON_FINISHED", label: "Season Finished", category: "boundary",
            target: 1, league: season_finished, config: default_config,
            criteria: PassCriteria {
                min_win_probability: Some(1.0),
                expected_rank: Some(1),
                ..Default::default()
            },
        },
        Scenario { name: "LATE_JOINER", label: "Late Joiner (per-participant)", category: "rounds",
            target: 3, league: late_joiner, config: per_participant_config,
            criteria: PassCriteria {
                max_expected_rank: Some(3),
                ..Default::default()
            },
        },
        Scenario { name: "LATE_JOINER_STRICT", label: "Late Joiner (strict)", category: "rounds",
            target: 3, league: late_joiner, config: strict_config,
            criteria: PassCriteria {
                expect_error: Some(ErrorKind::UnsynchronizedRounds),
                ..Default::default()
            },
        },
        Scenario { name: "LARGE_LEAGUE", label: "Large League (50 teams)", category: "scale",
            target: 12, league: large_league, config: default_config,
            criteria: PassCriteria {
                max_expected_rank: Some(50),
                ..Default::default()
            },
        },
    ]
}
