use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cutplan::config::ServerConfig;
use cutplan::{
    Algorithm1D, Algorithm2D, Options1D, Options2D, Piece1D, Piece2D, Result1D, Result2D,
    Stock1D, Stock2D, ValidationError, optimize_1d, optimize_2d,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct BarRequest {
    pieces: Vec<Piece1D>,
    stock: Vec<Stock1D>,
    #[serde(default)]
    options: Options1D,
    #[serde(default)]
    algorithm: Algorithm1D,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetRequest {
    pieces: Vec<Piece2D>,
    stock: Vec<Stock2D>,
    #[serde(default)]
    options: Options2D,
    #[serde(default)]
    algorithm: Algorithm2D,
}

fn bad_request(err: ValidationError) -> (StatusCode, String) {
    tracing::info!(code = err.code_value(), "rejected: {err}");
    (StatusCode::BAD_REQUEST, err.to_string())
}

async fn optimize_bars(
    Json(req): Json<BarRequest>,
) -> Result<Json<Result1D>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize/1d"
    );

    optimize_1d(&req.pieces, &req.stock, &req.options, req.algorithm)
        .map(Json)
        .map_err(bad_request)
}

async fn optimize_sheets(
    Json(req): Json<SheetRequest>,
) -> Result<Json<Result2D>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize/2d"
    );

    optimize_2d(&req.pieces, &req.stock, &req.options, req.algorithm)
        .map(Json)
        .map_err(bad_request)
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize/1d", post(optimize_bars))
        .route("/optimize/2d", post(optimize_sheets))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| format!("failed to open {}: {e}", config.log_file))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Listening on {addr}");
    tracing::info!(%addr, reporting = config.sentry_dsn.is_some(), "server started");
    axum::serve(listener, app()).await?;
    Ok(())
}
