// Monte Carlo Harness — N projection runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, reporting mean ± 95% CI

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use league_engine::*;

use crate::report::*;
use crate::scenarios::{Scenario, BENCH_LEAGUE};

use std::time::Instant;

/// Run a single projection of a scenario with a specific seed.
pub fn run_single(scenario: &Scenario, seed: u64, trials: Option<u32>) -> BenchResult {
    let league = (scenario.league)();
    let mut config = (scenario.config)();
    if let Some(trials) = trials {
        config.trials = trials;
    }
    let target = ParticipantId(scenario.target);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let start = Instant::now();
    let outcome = ProjectionEngine::new(&league, config.clone())
        .project_with_rng(BENCH_LEAGUE, target, &mut rng);
    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    let mut result = BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass: true,
        participants: league.entries.len(),
        trials: config.trials as usize,
        rounds_remaining: 0,
        expected_rank: None,
        win_probability: None,
        projected_points: None,
        win_probability_total: None,
        error: None,
        elapsed_ms: elapsed.as_millis(),
        trials_per_sec: config.trials as f64 / elapsed_secs,
    };
    let criteria = &scenario.criteria;

    match outcome {
        Ok(projection) => {
            result.rounds_remaining = projection.rounds_remaining;
            result.expected_rank = Some(projection.expected_rank);
            result.win_probability = Some(projection.win_probability);
            result.projected_points = projection.row(target).map(|r| r.projected_points);
            let total: f64 = projection.table.iter().map(|r| r.win_probability).sum();
            result.win_probability_total = Some(total);

            // every trial has exactly one winner
            if (total - 1.0).abs() > 1e-9 {
                result.pass = false;
            }
            if criteria.expect_error.is_some() {
                result.pass = false;
            }
            if let Some(min) = criteria.min_win_probability {
                if projection.win_probability < min {
                    result.pass = false;
                }
            }
            if let Some(max) = criteria.max_win_probability {
                if projection.win_probability > max {
                    result.pass = false;
                }
            }
            if let Some(rank) = criteria.expected_rank {
                if projection.expected_rank != rank {
                    result.pass = false;
                }
            }
            if let Some(max_rank) = criteria.max_expected_rank {
                if projection.expected_rank > max_rank {
                    result.pass = false;
                }
            }
        }
        Err(e) => {
            result.pass = criteria.expect_error == Some(e.kind());
            result.error = Some(e.to_string());
        }
    }

    result
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    trials: Option<u32>,
) -> MonteCarloReport {
    let results: Vec<BenchResult> = (0..n_runs)
        .map(|i| run_single(scenario, base_seed + i as u64, trials))
        .collect();

    aggregate(scenario, results)
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    let win_probability = Stats::from_samples(results.iter().filter_map(|r| r.win_probability));
    let expected_rank =
        Stats::from_samples(results.iter().filter_map(|r| r.expected_rank.map(|x| x as f64)));
    let projected_points =
        Stats::from_samples(results.iter().filter_map(|r| r.projected_points.map(|x| x as f64)));
    let elapsed_ms = Stats::from_samples(results.iter().map(|r| r.elapsed_ms as f64));
    let trials_per_sec = Stats::from_samples(results.iter().map(|r| r.trials_per_sec));

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        win_probability,
        expected_rank,
        projected_points,
        elapsed_ms,
        trials_per_sec,
        individual_runs: results,
    }
}
