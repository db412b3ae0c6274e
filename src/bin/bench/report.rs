// Benchmark Report Types
// Structured output for comparing projection stability across seeds and releases

use league_engine::Stats;
use serde::Serialize;

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub participants: usize,
    pub trials: usize,
    pub rounds_remaining: u32,
    pub expected_rank: Option<usize>,
    pub win_probability: Option<f64>,
    pub projected_points: Option<i64>,
    /// Sum of every participant's win probability; 1.0 when each trial has one winner.
    pub win_probability_total: Option<f64>,
    pub error: Option<String>,
    pub elapsed_ms: u128,
    pub trials_per_sec: f64,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub win_probability: Stats,
    pub expected_rank: Stats,
    pub projected_points: Stats,
    pub elapsed_ms: Stats,
    pub trials_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub trials_per_run: Option<u32>,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
