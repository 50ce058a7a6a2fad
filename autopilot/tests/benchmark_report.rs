use snake_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig, BenchmarkReport};
use snake_autopilot::bots::bot_ids;
use snake_autopilot::util::read_json;
use std::fs;
use tempfile::TempDir;

fn config(out_dir: Option<std::path::PathBuf>) -> BenchmarkConfig {
    BenchmarkConfig {
        bots: vec!["straight".to_string(), "greedy".to_string()],
        seeds: vec![1, 2, 3],
        max_ticks: 300,
        out_dir,
        jobs: Some(2),
    }
}

#[test]
fn benchmark_covers_every_bot_seed_pair() {
    let report = run_benchmark(config(None)).unwrap();
    assert_eq!(report.run_count, 6);
    assert_eq!(report.bot_rankings.len(), 2);
    for aggregate in &report.bot_rankings {
        assert_eq!(aggregate.runs, 3);
    }

    let straight = report
        .bot_rankings
        .iter()
        .find(|a| a.bot_id == "straight")
        .unwrap();
    assert_eq!(straight.wall_deaths, 3);
    assert_eq!(straight.survival_rate, 0.0);
}

#[test]
fn benchmark_is_deterministic_across_thread_counts() {
    let serial = run_benchmark(BenchmarkConfig {
        jobs: Some(1),
        ..config(None)
    })
    .unwrap();
    let parallel = run_benchmark(BenchmarkConfig {
        jobs: Some(4),
        ..config(None)
    })
    .unwrap();

    let key = |r: &BenchmarkReport| {
        r.runs
            .iter()
            .map(|run| (run.bot_id.clone(), run.seed, run.final_score, run.tick_count))
            .collect::<Vec<_>>()
    };
    assert_eq!(key(&serial), key(&parallel));
}

#[test]
fn benchmark_writes_summary_and_rankings() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("bench");
    let report = run_benchmark(config(Some(out.clone()))).unwrap();

    let summary: BenchmarkReport = read_json(&out.join("summary.json")).unwrap();
    assert_eq!(summary.run_count, report.run_count);

    let csv = fs::read_to_string(out.join("rankings.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + report.bot_rankings.len());
    assert!(csv.starts_with("rank,bot_id"));
}

#[test]
fn benchmark_rejects_empty_inputs() {
    assert!(run_benchmark(BenchmarkConfig {
        seeds: Vec::new(),
        ..config(None)
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        jobs: Some(0),
        ..config(None)
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        bots: vec!["missing".to_string()],
        ..config(None)
    })
    .is_err());
}

#[test]
fn bot_list_defaults_to_full_roster() {
    assert_eq!(resolve_bots(None).unwrap().len(), bot_ids().len());
    assert_eq!(
        resolve_bots(Some(" greedy , ,flood")).unwrap(),
        vec!["greedy", "flood"]
    );
    assert!(resolve_bots(Some(" , ")).is_err());
}
