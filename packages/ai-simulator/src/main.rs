//! AI Simulator CLI - bot-only Sequence games for comparing AIs.
//!
//! Each game runs through the real session service against an in-memory
//! store and a manual clock, so every move is validated and every record
//! is checked for consistency along the way.

mod metrics;
mod output;
mod simulator;
mod types;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use backend::ai::registry::{by_key, registered_ais};
use backend::ai::{create_ai, AiPlayer};
use backend::domain::Team;
use clap::Parser;
use metrics::build_game_metrics;
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::OutputFormat;

#[derive(Parser)]
#[command(name = "ai-simulator")]
#[command(about = "Bot-only Sequence games for AI evaluation")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// AI key per seat, comma separated (2 to 4 seats)
    #[arg(long, value_delimiter = ',', default_value = "heuristic,heuristic")]
    seats: Vec<String>,

    /// Base seed; game N uses seed + N. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Turns after which a game counts as a stalemate
    #[arg(long, default_value = "2000")]
    max_turns: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit engine logs as JSON (filtered by RUST_LOG)
    #[arg(long)]
    json_logs: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the JSON lines file
    #[arg(long)]
    compress: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    if args.json_logs {
        backend::telemetry::init_tracing();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if !(2..=4).contains(&args.seats.len()) {
        return Err(format!("need 2 to 4 seats, got {}", args.seats.len()).into());
    }
    for key in &args.seats {
        if by_key(key).is_none() {
            let known: Vec<&str> = registered_ais().iter().map(|f| f.key).collect();
            return Err(format!("unknown AI {key:?}; known: {}", known.join(", ")).into());
        }
    }
    if args.show_output {
        info!(games = args.games, seats = ?args.seats, "starting AI simulator");
    }

    let mut output_writer =
        OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let seed = match args.seed {
            Some(base) => base.wrapping_add(u64::from(game_num)),
            None => rand::random(),
        };
        let ais = create_seats(&args.seats, seed)?;

        match Simulator::new(seed, args.max_turns).simulate_game(&ais).await {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(game_num, seed, &result, duration_ms);
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(game = game_num, winner = ?result.winner, turns = result.turns, "game completed");
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let (jsonl_path, csv_path) = (jsonl_path.cloned(), csv_path.clone());
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

/// One AI per seat, each seeded from the game seed and its seat index.
fn create_seats(
    keys: &[String],
    seed: u64,
) -> Result<Vec<(String, Box<dyn AiPlayer>)>, Box<dyn std::error::Error>> {
    keys.iter()
        .enumerate()
        .map(|(seat, key)| {
            let config = serde_json::json!({ "seed": seed.wrapping_mul(31).wrapping_add(seat as u64) });
            create_ai(key, Some(&config))
                .map(|ai| (key.clone(), ai))
                .ok_or_else(|| format!("Unknown AI type: {key}").into())
        })
        .collect()
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let mut wins: BTreeMap<Team, u32> = BTreeMap::new();
    let mut stalemates = 0u32;
    let mut total_turns = 0u64;
    let mut removals = 0u64;
    for result in results {
        total_turns += u64::from(result.turns);
        removals += u64::from(result.removals);
        match result.winner {
            Some(team) => *wins.entry(team).or_default() += 1,
            None => stalemates += 1,
        }
    }

    let games = results.len() as f64;
    println!("Average turns: {:.1}", total_turns as f64 / games);
    println!("Average removals: {:.1}", removals as f64 / games);
    println!("Stalemates: {}", stalemates);

    println!("\n=== Wins by Team ===");
    for (team, count) in &wins {
        let ais: Vec<&str> = results[0]
            .seats
            .iter()
            .filter(|s| s.team == *team)
            .map(|s| s.ai.as_str())
            .collect();
        println!(
            "Team {:?} ({}): wins={} ({:.1}%)",
            team,
            ais.join(", "),
            count,
            f64::from(*count) / games * 100.0
        );
    }
}
