// League Projection Bench Runner
// Synthetic league scenarios × N seeds, seedable ChaCha8 PRNG, JSON report
//
// Usage:
//   cargo run --release --bin bench                          # All scenarios (10 runs each)
//   cargo run --release --bin bench -- --runs 3              # Quick mode
//   cargo run --release --bin bench -- RUNAWAY               # Filter by name
//   cargo run --release --bin bench -- --trials 2000         # Override trial count
//   cargo run --release --bin bench -- --seed 42             # Custom base seed
//   cargo run --release --bin bench -- --league league.json --target 123 [--config cfg.json] [--finish]
//   cargo run --release --bin bench -- --log debug               # Log filter (overrides LEAGUE_LOG)

mod report;
mod scenarios;
mod monte_carlo;

use league_engine::telemetry::{init_tracing, init_tracing_with_filter};
use league_engine::{
    LeagueSnapshot, ParticipantId, ProjectionConfig, ProjectionEngine, ProjectionError,
    ProjectionResult,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use report::*;
use scenarios::*;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: Option<u64>,
    trials: Option<u32>,
    filter: Option<String>,
    league: Option<PathBuf>,
    target: Option<u64>,
    config: Option<PathBuf>,
    finish: bool,
    log: Option<String>,
    unknown: Vec<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 10,
        seed: None,
        trials: None,
        filter: None,
        league: None,
        target: None,
        config: None,
        finish: false,
        log: None,
        unknown: Vec::new(),
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().ok();
                }
            }
            "--trials" => {
                i += 1;
                if i < args.len() {
                    cli.trials = args[i].parse().ok();
                }
            }
            "--league" => {
                i += 1;
                if i < args.len() {
                    cli.league = Some(PathBuf::from(&args[i]));
                }
            }
            "--target" => {
                i += 1;
                if i < args.len() {
                    cli.target = args[i].parse().ok();
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(PathBuf::from(&args[i]));
                }
            }
            "--log" => {
                i += 1;
                if i < args.len() {
                    cli.log = Some(args[i].clone());
                }
            }
            "--finish" => {
                cli.finish = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            arg => {
                cli.unknown.push(arg.to_string());
            }
        }
        i += 1;
    }

    cli
}

// ─── League Mode ────────────────────────────────────────────────────────────

fn project_league(cli: &CliArgs, path: &Path) -> Result<ProjectionResult, ProjectionError> {
    let snapshot = LeagueSnapshot::from_path(path)?;
    let mut config = match &cli.config {
        Some(cfg) => ProjectionConfig::from_path(cfg)?,
        None => ProjectionConfig::default(),
    };
    if let Some(trials) = cli.trials {
        config.trials = trials;
    }
    if cli.finish {
        config.finish_distribution = true;
    }
    let target = match cli.target {
        Some(id) => ParticipantId(id),
        None => {
            return Err(ProjectionError::InvalidConfiguration(
                "--league needs --target <participant id>".to_string(),
            ))
        }
    };

    let engine = ProjectionEngine::new(&snapshot, config);
    match cli.seed {
        Some(seed) => engine.project_with_rng(snapshot.league, target, &mut ChaCha8Rng::seed_from_u64(seed)),
        None => engine.project(snapshot.league, target),
    }
}

fn print_projection(result: &ProjectionResult) {
    println!("\n  Season projection after {} simulations ({} rounds left)",
        result.trials, result.rounds_remaining);
    println!("  {} ({})", result.target_label.name, result.target_label.manager);
    println!("  Expected final rank: {}   Win probability: {:.1}%\n",
        result.expected_rank, result.win_probability * 100.0);
    println!("  {:>4} {:<28} {:<18} {:>7} {:>10} {:>7}",
        "Rank", "Team", "Manager", "Points", "Projected", "Win%");
    println!("  {}", "-".repeat(78));
    for row in &result.table {
        let marker = if row.participant == result.target { "*" } else { " " };
        println!("{} {:>4} {:<28} {:<18} {:>7} {:>10} {:>6.1}%",
            marker,
            row.rank,
            row.name,
            row.manager,
            row.current_points,
            row.projected_points,
            row.win_probability * 100.0,
        );
    }

    if let Some(row) = result.row(result.target) {
        if !row.finish_probabilities.is_empty() {
            println!("\n  Finishing positions for {}:", row.name);
            for (position, p) in row.finish_probabilities.iter().enumerate() {
                if *p > 0.0 {
                    println!("  {:>4} {:>6.1}%", position + 1, p * 100.0);
                }
            }
        }
    }
    println!();
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    match &cli.log {
        Some(filter) => init_tracing_with_filter(filter),
        None => init_tracing(),
    }
    for arg in &cli.unknown {
        warn!("unknown argument: {}", arg);
    }

    if let Some(path) = &cli.league {
        match project_league(&cli, path) {
            Ok(result) => print_projection(&result),
            Err(e) => {
                error!("projection failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        error!("no scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let base_seed = cli.seed.unwrap_or(0);
    println!("\n  League Projection Bench");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, base_seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<34} {:>5} {:>14} {:>9} {:>10} {:>8}",
        "Scenario", "Pass%", "Win%", "Rank", "Projected", "Time");
    println!("  {}", "-".repeat(86));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, base_seed, cli.trials);

        let pass_pct = report.pass_rate * 100.0;
        let win_mean = report.win_probability.mean * 100.0;
        let win_ci = (report.win_probability.ci_upper - report.win_probability.ci_lower) / 2.0 * 100.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<34} {:>4}% {:>7.1}±{:<5.2} {:>9.1} {:>10.0} {:>6.0}ms  {}",
            report.label,
            pass_pct as u32,
            win_mean, win_ci,
            report.expected_rank.mean,
            report.projected_points.mean,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(86));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        trials_per_run: cli.trials,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    let path = dir.join(format!("bench-{}.json", timestamp));
    let written = std::fs::create_dir_all(dir)
        .map_err(|e| e.to_string())
        .and_then(|_| serde_json::to_string_pretty(&report).map_err(|e| e.to_string()))
        .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
    match written {
        Ok(()) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => warn!("failed to write {}: {}", path.display(), e),
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
