use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use trail_arena_server::constants::get_grid_size_by_player_count;
use trail_arena_server::engine::GameEngine;
use trail_arena_server::rng::Rng;
use trail_arena_server::strategy::{StrategyProfile, ROSTER};
use trail_arena_server::types::{AgentConfig, Snapshot, Winner};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Number of bot-only matches to run.
    #[arg(long, default_value_t = 20)]
    games: usize,
    /// Bots per match, drawn from the roster without repeats.
    #[arg(long, default_value_t = 4)]
    bots: usize,
    #[arg(long)]
    grid_size: Option<i32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 2_000)]
    max_ticks: usize,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct GameResultLine {
    game: usize,
    seed: u32,
    #[serde(rename = "gridSize")]
    grid_size: i32,
    bots: Vec<String>,
    ticks: usize,
    winner: String,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    games: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: usize,
    draws: usize,
    #[serde(rename = "winCounts")]
    win_counts: BTreeMap<String, usize>,
    results: Vec<GameResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    timestamp: String,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    game: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let base_seed = normalize_seed(cli.seed.unwrap_or_else(|| Utc::now().timestamp_millis() as u64));
    let bots_per_game = cli.bots.clamp(2, ROSTER.len());
    let run_id = format!("arena-{base_seed}-{}", Utc::now().timestamp_millis());

    emit_log(
        "info",
        "run_started",
        &run_id,
        None,
        Some(base_seed),
        json!({
            "games": cli.games,
            "botsPerGame": bots_per_game,
            "gridSize": cli.grid_size,
            "maxTicks": cli.max_ticks,
        }),
    );

    let mut results = Vec::with_capacity(cli.games);
    let mut win_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut draws = 0usize;
    let mut total_ticks = 0usize;
    let mut anomaly_count = 0usize;

    for game in 0..cli.games {
        let seed = base_seed.wrapping_add(game as u32);
        let result = run_game(game, seed, bots_per_game, cli.grid_size, cli.max_ticks);

        for message in &result.anomalies {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(game),
                Some(seed),
                json!({ "message": message }),
            );
        }

        anomaly_count += result.anomalies.len();
        total_ticks += result.ticks;
        if result.winner == "DRAW" {
            draws += 1;
        } else {
            *win_counts.entry(result.winner.clone()).or_insert(0) += 1;
        }

        println!(
            "{}",
            serde_json::to_string(&result).expect("game result should serialize")
        );
        results.push(result);
    }

    let summary = build_run_summary(run_id.clone(), results, win_counts, draws, total_ticks, anomaly_count);

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        json!({
            "games": summary.games,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "draws": summary.draws,
            "winCounts": summary.win_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if summary.anomaly_count > 0 {
        std::process::exit(1);
    }
}

fn run_game(
    game: usize,
    seed: u32,
    bots_per_game: usize,
    grid_size_override: Option<i32>,
    max_ticks: usize,
) -> GameResultLine {
    let mut rng = Rng::new(seed);
    let profiles: Vec<&'static StrategyProfile> = rng
        .sample_indices(ROSTER.len(), bots_per_game)
        .into_iter()
        .map(|idx| &ROSTER[idx])
        .collect();
    let configs: Vec<AgentConfig> = profiles
        .iter()
        .map(|profile| AgentConfig {
            name: profile.name.to_string(),
            color: profile.color.to_string(),
        })
        .collect();
    let grid_size =
        grid_size_override.unwrap_or_else(|| get_grid_size_by_player_count(bots_per_game));

    let mut engine = GameEngine::new(grid_size, &configs, &mut rng);
    let mut anomalies = Vec::new();
    let mut ticks = 0usize;

    while !engine.is_over() {
        if ticks >= max_ticks {
            anomalies.push(format!("tick safety limit exceeded after {max_ticks} ticks"));
            break;
        }
        let before = engine.build_snapshot();
        for (agent_id, profile) in profiles.iter().enumerate() {
            if let Some(direction) = profile.decide(&before, agent_id, &mut rng) {
                engine.submit_direction(agent_id, direction);
            }
        }
        engine.tick();
        ticks += 1;
        anomalies.extend(collect_snapshot_anomalies(&engine.build_snapshot()));
    }

    let last = engine.build_snapshot();
    let winner = match last.winner {
        Some(Winner::Agent(id)) => last
            .players
            .get(id)
            .map(|player| player.name.clone())
            .unwrap_or_else(|| format!("unknown_{id}")),
        Some(Winner::Draw) => "DRAW".to_string(),
        None => {
            anomalies.push("match ended without a winner".to_string());
            "DRAW".to_string()
        }
    };

    GameResultLine {
        game,
        seed,
        grid_size,
        bots: profiles.iter().map(|profile| profile.name.to_string()).collect(),
        ticks,
        winner,
        anomalies,
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot) -> Vec<String> {
    let mut anomalies = Vec::new();
    for player in &snapshot.players {
        if player.is_alive
            && !(0..snapshot.grid_size).contains(&player.x)
        {
            anomalies.push(format!("living agent {} off grid: x={}", player.name, player.x));
        }
        if player.is_alive && !(0..snapshot.grid_size).contains(&player.y) {
            anomalies.push(format!("living agent {} off grid: y={}", player.name, player.y));
        }
        if player.trail.is_empty() {
            anomalies.push(format!("agent {} lost its trail", player.name));
        }
    }

    let alive = snapshot.players.iter().filter(|player| player.is_alive).count();
    if !snapshot.game_over && alive <= 1 {
        anomalies.push(format!("{alive} agents alive but match still running"));
    }
    if snapshot.game_over && snapshot.winner.is_none() {
        anomalies.push("match over without a winner".to_string());
    }
    anomalies
}

fn build_run_summary(
    run_id: String,
    results: Vec<GameResultLine>,
    win_counts: BTreeMap<String, usize>,
    draws: usize,
    total_ticks: usize,
    anomaly_count: usize,
) -> RunSummary {
    let games = results.len();
    let average_ticks = if games == 0 { 0 } else { total_ticks / games };
    RunSummary {
        run_id,
        games,
        anomaly_count,
        average_ticks,
        draws,
        win_counts,
        results,
    }
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    game: Option<usize>,
    seed: Option<u32>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        game,
        seed,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(winner: &str, ticks: usize) -> GameResultLine {
        GameResultLine {
            game: 0,
            seed: 42,
            grid_size: 27,
            bots: vec!["gemini_bot".to_string(), "grok_bot".to_string()],
            ticks,
            winner: winner.to_string(),
            anomalies: Vec::new(),
        }
    }

    #[test]
    fn build_run_summary_averages_ticks() {
        let summary = build_run_summary(
            "arena-1-1".to_string(),
            vec![make_result("gemini_bot", 40), make_result("DRAW", 60)],
            BTreeMap::from([("gemini_bot".to_string(), 1usize)]),
            1,
            100,
            0,
        );
        assert_eq!(summary.average_ticks, 50);
        assert_eq!(summary.games, 2);
        assert_eq!(summary.draws, 1);
    }

    #[test]
    fn empty_run_has_zero_average() {
        let summary = build_run_summary(
            "arena-1-1".to_string(),
            Vec::new(),
            BTreeMap::new(),
            0,
            0,
            0,
        );
        assert_eq!(summary.average_ticks, 0);
    }

    #[test]
    fn finished_game_produces_no_anomalies() {
        let result = run_game(0, 1_234, 3, Some(14), 1_000);
        assert!(result.anomalies.is_empty(), "{:?}", result.anomalies);
        assert!(result.ticks > 0);
        assert!(result.winner == "DRAW" || result.bots.contains(&result.winner));
    }

    #[test]
    fn same_seed_reproduces_the_same_result() {
        let a = run_game(0, 777, 4, None, 2_000);
        let b = run_game(0, 777, 4, None, 2_000);
        assert_eq!(
            serde_json::to_string(&a).ok(),
            serde_json::to_string(&b).ok()
        );
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("trail-arena-missing-{}", Utc::now().timestamp_millis()))
            .join("summary.json");
        let summary = build_run_summary(
            "arena-1-1".to_string(),
            vec![make_result("DRAW", 10)],
            BTreeMap::new(),
            1,
            10,
            0,
        );
        assert!(write_summary(&target, &summary).is_err());
    }
}
