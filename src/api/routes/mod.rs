//! Route wiring.

pub mod roster;
pub mod rounds;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::state::AppState;

/// Assemble the API router.
pub fn build_router(state: AppState) -> Router {
    build_router_with_cors(state, "*")
}

/// Assemble the API router with a specific CORS origin ("*" for any).
pub fn build_router_with_cors(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin {
        "*" => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!("invalid CORS origin {:?}, allowing any", origin);
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        },
    };

    Router::new()
        .route(
            "/tournaments/:tournament_id/rounds/:round_number/pairings",
            post(rounds::generate_round_pairings).get(rounds::get_round_pairings),
        )
        .route("/pairings/:pairing_id/result", post(rounds::record_result))
        .route("/rounds/:round_id/complete", post(rounds::complete_round))
        .route(
            "/tournaments/:tournament_id/placings",
            get(rounds::get_placings),
        )
        .route(
            "/tournaments/:tournament_id/roster",
            get(roster::list_roster),
        )
        .route(
            "/tournaments/:tournament_id/participants",
            post(roster::add_participant),
        )
        .route(
            "/tournaments/:tournament_id/check-in",
            post(roster::check_in_all),
        )
        .route(
            "/participants/:participant_id/army-list",
            post(roster::submit_army_list),
        )
        .route(
            "/participants/:participant_id/status",
            post(roster::set_status),
        )
        .route(
            "/participants/:participant_id",
            delete(roster::remove_participant),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
