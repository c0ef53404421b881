//! HTTP API — Axum web server for the tracker.
//!
//! Serves the JSON REST API and a self-contained HTML page with the
//! player table, round form, and handicap chart. CORS enabled for
//! local development.

pub mod routes;

use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use routes::AppState;

/// The embedded index page (compiled into the binary).
const INDEX_HTML: &str = include_str!("templates/index.html");

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Player CRUD
        .route(
            "/api/players",
            post(routes::create_player).get(routes::list_players),
        )
        .route(
            "/api/players/:id",
            get(routes::get_player).delete(routes::delete_player),
        )
        // Round CRUD
        .route("/api/rounds", post(routes::create_round))
        .route(
            "/api/rounds/:id",
            get(routes::get_round).delete(routes::delete_round),
        )
        .route("/api/players/:id/rounds", get(routes::list_player_rounds))
        // Handicap
        .route("/api/players/:id/handicap", get(routes::get_handicap))
        .route(
            "/api/players/:id/handicap-history",
            get(routes::get_handicap_history),
        )
        .route("/health", get(routes::health))
        // Index page
        .route("/", get(serve_index))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded HTML page.
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
