use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use ecocity_snake_core::constants::LEADERBOARD_DISPLAY_LIMIT;
use ecocity_snake_core::leaderboard::build_display_leaderboard_with_limit;
use ecocity_snake_core::LeaderboardEntry;
use snake_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig};
use snake_autopilot::bots::{bot_ids, bot_manifest_entries, create_bot, describe_bots};
use snake_autopilot::runner::{run_bot, run_bot_realtime, RunMetrics};
use snake_autopilot::util::{
    parse_seed, parse_seed_csv, read_json, seed_from_clock, seed_to_hex, write_json,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "snake-autopilot")]
#[command(about = "Headless bots, benchmarks and leaderboard tools for the EcoCity snake game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots,
    /// Export the bot manifest as JSON
    RosterManifest {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play one session with a bot
    Run {
        #[arg(long)]
        bot: String,
        /// Decimal or 0x-prefixed hex. A clock-derived seed is used when omitted.
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = 5_000)]
        max_ticks: u64,
        /// Pace ticks on the wall clock instead of running headless
        #[arg(long)]
        realtime: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run multi-seed benchmark across one or more bots
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 5_000)]
        max_ticks: u64,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Merge a live leaderboard export with a seed list for display
    Leaderboard {
        #[arg(long)]
        live: PathBuf,
        #[arg(long)]
        seed: Option<PathBuf>,
        #[arg(long, default_value_t = LEADERBOARD_DISPLAY_LIMIT)]
        limit: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:12} {description}");
            }
        }
        Commands::RosterManifest { output } => {
            let manifest = bot_manifest_entries();
            match output {
                Some(path) => {
                    write_json(&path, &manifest)?;
                    println!("wrote={}", path.display());
                    println!("bots={}", manifest.len());
                }
                None => println!("{}", serde_json::to_string_pretty(&manifest)?),
            }
        }
        Commands::Run {
            bot,
            seed,
            max_ticks,
            realtime,
            output,
        } => {
            if create_bot(&bot).is_none() {
                let available = bot_ids().join(", ");
                return Err(anyhow!("unknown bot '{bot}'. available: {available}"));
            }
            let seed = match seed {
                Some(raw) => parse_seed(&raw)?,
                None => seed_from_clock(),
            };

            let metrics = if realtime {
                run_bot_realtime(&bot, seed, max_ticks, |progress| {
                    eprintln!(
                        "tick={} score={} length={} event={:?}",
                        progress.tick, progress.score, progress.length, progress.event
                    );
                })?
            } else {
                run_bot(&bot, seed, max_ticks)?
            };

            print_run(&metrics);
            if let Some(path) = output {
                write_json(&path, &metrics)?;
                println!("wrote={}", path.display());
            }
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_start,
            seed_count,
            max_ticks,
            out_dir,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let seeds = resolve_seeds(seeds.as_deref(), seed_start.as_deref(), seed_count)?;

            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                max_ticks,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            if let Some(dir) = &out_dir {
                println!("out_dir={}", dir.display());
            }
            println!("bots:");
            for (idx, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_score={:.1} max_score={} avg_ticks={:.1} avg_length={:.1} survival={:.0}% walls={} self={}",
                    idx + 1,
                    bot.bot_id,
                    bot.avg_score,
                    bot.max_score,
                    bot.avg_ticks,
                    bot.avg_length,
                    bot.survival_rate * 100.0,
                    bot.wall_deaths,
                    bot.self_collisions,
                );
            }
        }
        Commands::Leaderboard {
            live,
            seed,
            limit,
            output,
        } => {
            let entries = merge_leaderboard_files(&live, seed.as_deref(), limit)?;
            match output {
                Some(path) => {
                    write_json(&path, &entries)?;
                    println!("wrote={}", path.display());
                }
                None => {
                    for (idx, entry) in entries.iter().enumerate() {
                        println!(
                            "{:>2}. {:<24} {:>6}  ({})",
                            idx + 1,
                            entry.name,
                            entry.highest_score,
                            entry.id
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_run(metrics: &RunMetrics) {
    println!("bot={}", metrics.bot_id);
    println!("seed={}", seed_to_hex(metrics.seed));
    println!("ticks={}", metrics.tick_count);
    println!("score={}", metrics.final_score);
    println!("length={}", metrics.final_length);
    println!("consumed={}", metrics.consumed);
    println!("turns={}", metrics.turns);
    match metrics.cause {
        Some(cause) => println!("game_over={cause:?}"),
        None => println!("game_over=none (tick cap)"),
    }
}

fn merge_leaderboard_files(
    live: &Path,
    seed: Option<&Path>,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>> {
    let live: Vec<LeaderboardEntry> = read_json(live)?;
    let seed: Vec<LeaderboardEntry> = match seed {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    Ok(build_display_leaderboard_with_limit(&live, &seed, limit))
}

fn resolve_seeds(seeds: Option<&str>, seed_start: Option<&str>, seed_count: u32) -> Result<Vec<u32>> {
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }

    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => 0x5EED_0001,
    };

    let mut out = Vec::with_capacity(seed_count as usize);
    let mut cur = start;
    for _ in 0..seed_count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    Ok(out)
}
