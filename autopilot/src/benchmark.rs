use crate::bots::bot_ids;
use crate::runner::{run_bot, RunMetrics};
use crate::util::{now_unix_s, seed_to_hex, write_json};
use anyhow::{anyhow, Context, Result};
use ecocity_snake_core::GameOverCause;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u64,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub tick_count: u64,
    pub final_score: u32,
    pub final_length: usize,
    pub consumed: u32,
    pub turns: u32,
    pub game_over: bool,
    pub cause: Option<GameOverCause>,
}

impl From<&RunMetrics> for RunRecord {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            bot_id: metrics.bot_id.clone(),
            seed: metrics.seed,
            seed_hex: seed_to_hex(metrics.seed),
            tick_count: metrics.tick_count,
            final_score: metrics.final_score,
            final_length: metrics.final_length,
            consumed: metrics.consumed,
            turns: metrics.turns,
            game_over: metrics.game_over,
            cause: metrics.cause,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_ticks: f64,
    pub max_ticks: u64,
    pub avg_length: f64,
    /// Share of runs that reached the tick cap without a game over.
    pub survival_rate: f64,
    pub wall_deaths: usize,
    pub self_collisions: usize,
    pub board_clears: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_ticks: u64,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(bot_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let bots: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            if bots.is_empty() {
                return Err(anyhow!("--bots resolved to empty list"));
            }
            Ok(bots)
        }
    }
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<RunMetrics> {
        run_bot(bot_id, *seed, config.max_ticks)
            .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };
    let runs = run_results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut grouped: BTreeMap<&str, Vec<&RunMetrics>> = BTreeMap::new();
    for run in &runs {
        grouped.entry(run.bot_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, bot_runs)| aggregate(bot_id, &bot_runs, config.max_ticks))
        .collect();
    rankings.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| b.max_score.cmp(&a.max_score))
            .then_with(|| b.avg_ticks.total_cmp(&a.avg_ticks))
    });

    let mut run_records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
    run_records.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| b.tick_count.cmp(&a.tick_count))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    let report = BenchmarkReport {
        generated_unix_s: now_unix_s(),
        max_ticks: config.max_ticks,
        jobs: config.jobs,
        bots: config.bots,
        seeds: config.seeds,
        run_count: run_records.len(),
        bot_rankings: rankings,
        runs: run_records,
    };

    if let Some(out_dir) = &config.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed creating {}", out_dir.display()))?;
        write_json(&out_dir.join("summary.json"), &report)?;
        write_rankings_csv(&out_dir.join("rankings.csv"), &report.bot_rankings)?;
    }

    Ok(report)
}

fn aggregate(bot_id: &str, runs: &[&RunMetrics], max_ticks: u64) -> BotAggregate {
    let count = runs.len().max(1) as f64;
    let sum_score: u64 = runs.iter().map(|r| u64::from(r.final_score)).sum();
    let sum_ticks: u64 = runs.iter().map(|r| r.tick_count).sum();
    let sum_length: usize = runs.iter().map(|r| r.final_length).sum();
    let by_cause = |cause: GameOverCause| runs.iter().filter(|r| r.cause == Some(cause)).count();
    let survived = runs
        .iter()
        .filter(|r| !r.game_over && r.tick_count >= max_ticks)
        .count();

    BotAggregate {
        bot_id: bot_id.to_string(),
        runs: runs.len(),
        avg_score: sum_score as f64 / count,
        max_score: runs.iter().map(|r| r.final_score).max().unwrap_or_default(),
        avg_ticks: sum_ticks as f64 / count,
        max_ticks: runs.iter().map(|r| r.tick_count).max().unwrap_or_default(),
        avg_length: sum_length as f64 / count,
        survival_rate: survived as f64 / count,
        wall_deaths: by_cause(GameOverCause::Wall),
        self_collisions: by_cause(GameOverCause::SelfCollision),
        board_clears: by_cause(GameOverCause::BoardCleared),
    }
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,bot_id,runs,avg_score,max_score,avg_ticks,max_ticks,avg_length,survival_rate,wall_deaths,self_collisions,board_clears\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.2},{},{:.2},{},{:.2},{:.4},{},{},{}\n",
            idx + 1,
            row.bot_id,
            row.runs,
            row.avg_score,
            row.max_score,
            row.avg_ticks,
            row.max_ticks,
            row.avg_length,
            row.survival_rate,
            row.wall_deaths,
            row.self_collisions,
            row.board_clears
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
