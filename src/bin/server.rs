use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::services::{ServeDir, ServeFile};
use trail_arena_server::server_protocol::{StartGameRequest, SubmitMoveRequest};
use trail_arena_server::session::GameSession;

type SharedState = Arc<Mutex<ServerState>>;

struct ServerState {
    session: Option<GameSession>,
}

impl ServerState {
    fn new() -> Self {
        Self { session: None }
    }
}

#[tokio::main]
async fn main() {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let state = Arc::new(Mutex::new(ServerState::new()));

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/start-game", post(start_game_handler))
        .route("/submit-move", post(submit_move_handler))
        .route("/game-tick", get(game_tick_handler))
        .with_state(state);

    let app = if let Some(static_dir) = resolve_static_dir() {
        let index_file = static_dir.join("index.html");
        println!(
            "[server] static file root: {}",
            static_dir.to_string_lossy()
        );
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        eprintln!("[server] static file root not found. arena API only.");
        app
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server socket");

    println!("[server] listening on :{port}");
    axum::serve(listener, app)
        .await
        .expect("server runtime failed");
}

fn resolve_static_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var("STATIC_DIR") {
        let path = PathBuf::from(raw);
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }

    let candidates = [PathBuf::from("static"), PathBuf::from("../static")];
    candidates
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Discards any running match and starts a fresh one with a random seed.
async fn start_game_handler(
    State(state): State<SharedState>,
    Json(request): Json<StartGameRequest>,
) -> impl IntoResponse {
    let seed = rand::random::<u32>();
    match GameSession::create(request.player_count, request.grid_size, seed) {
        Ok(session) => {
            let initial_state = session.snapshot();
            let mut guard = state.lock().await;
            guard.session = Some(session);
            println!(
                "[server] game started (players: {}, grid: {}, seed: {seed})",
                request.player_count, initial_state.grid_size
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Game started",
                    "initialState": initial_state,
                })),
            )
        }
        Err(error) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        ),
    }
}

/// Queues the human direction for the next tick. Always acknowledged;
/// reversals and post-game moves are silently ignored downstream.
async fn submit_move_handler(
    State(state): State<SharedState>,
    Json(request): Json<SubmitMoveRequest>,
) -> impl IntoResponse {
    let Some(direction) = request.parse_direction() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unknown direction: {}", request.direction) })),
        );
    };

    let mut guard = state.lock().await;
    if let Some(session) = guard.session.as_mut() {
        session.submit_human_move(direction);
    }
    (StatusCode::OK, Json(json!({ "success": true })))
}

async fn game_tick_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let mut guard = state.lock().await;
    match guard.session.as_mut() {
        Some(session) => (StatusCode::OK, Json(json!(session.advance_tick()))),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Game not started" })),
        ),
    }
}
