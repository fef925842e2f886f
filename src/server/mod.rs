//! Thin HTTP surface over the request pipeline. No pipeline logic lives
//! here; handlers translate between JSON and [`RequestOutcome`].

pub mod state;

pub use state::ServerState;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::lyrics_cache::LyricsCache;
use crate::request::RequestPipeline;
use state::{GuardedLyricsCache, GuardedPipeline};

#[derive(Serialize)]
struct ServerStats {
    uptime: String,
    hash: String,
}

#[derive(Deserialize, Debug)]
struct SubmitRequestBody {
    text: String,
}

#[derive(Serialize)]
struct CacheStats {
    entries: usize,
}

#[derive(Serialize)]
struct CacheClearResponse {
    cleared: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: env!("GIT_HASH").to_string(),
    })
}

async fn submit_request(
    State(pipeline): State<GuardedPipeline>,
    Json(body): Json<SubmitRequestBody>,
) -> Response {
    let text = body.text.trim();
    if text.is_empty() {
        return (StatusCode::BAD_REQUEST, "empty request text").into_response();
    }

    match pipeline.handle(text).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => {
            error!(error = %err, "Request pipeline failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response()
        }
    }
}

async fn cache_stats(State(cache): State<GuardedLyricsCache>) -> Response {
    match cache.len() {
        Ok(entries) => Json(CacheStats { entries }).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response(),
    }
}

async fn clear_cache(State(cache): State<GuardedLyricsCache>) -> Response {
    match cache.clear() {
        Ok(cleared) => {
            info!(cleared, "Lyrics cache cleared");
            Json(CacheClearResponse { cleared }).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response(),
    }
}

pub fn make_app(pipeline: Arc<RequestPipeline>, cache: Arc<dyn LyricsCache>) -> Router {
    let state = ServerState {
        start_time: Instant::now(),
        pipeline,
        lyrics_cache: cache,
    };

    Router::new()
        .route("/", get(home))
        .route("/api/request", post(submit_request))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/admin/cache/clear", post(clear_cache))
        .with_state(state)
}

pub async fn run_server(
    pipeline: Arc<RequestPipeline>,
    cache: Arc<dyn LyricsCache>,
    port: u16,
) -> Result<()> {
    let app = make_app(pipeline, cache);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
