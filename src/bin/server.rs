use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cut_planner::solver::{DEFAULT_TRIALS, Solver};
use cut_planner::types::{Action, Outcome, deserialize_lengths};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PlanRequest {
    #[serde(deserialize_with = "deserialize_lengths")]
    bars: Vec<u64>,
    #[serde(deserialize_with = "deserialize_lengths")]
    wanted: Vec<u64>,
    #[serde(default = "default_trials")]
    trials: usize,
    #[serde(default)]
    seed: Option<u64>,
}

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

#[derive(Serialize)]
struct PlanResponse {
    feasible: bool,
    cuts: Option<u64>,
    actions: Vec<Action>,
}

async fn plan(Json(req): Json<PlanRequest>) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /plan"
    );

    if req.bars.iter().any(|&l| l == 0) || req.wanted.iter().any(|&l| l == 0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "lengths must be non-zero".to_string(),
        ));
    }

    let mut solver = Solver::new(req.bars, req.wanted);
    solver.set_trials(req.trials);
    if let Some(seed) = req.seed {
        solver.set_random_seed(seed);
    }

    let response = match solver.solve() {
        Outcome::Infeasible => PlanResponse {
            feasible: false,
            cuts: None,
            actions: Vec::new(),
        },
        Outcome::Solved(plan) => PlanResponse {
            feasible: true,
            cuts: Some(plan.cuts),
            actions: plan.actions,
        },
    };

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/plan", post(plan))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
