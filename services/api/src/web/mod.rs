pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::trace_requests;
pub use state::AppState;

/// Builds the API router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dashboard", get(rest::get_dashboard))
        .route("/members", get(rest::list_members).post(rest::create_member))
        .route("/members/{id}", delete(rest::remove_member))
        .route("/members/{id}/points", get(rest::member_points))
        .route("/members/{id}/redemptions", get(rest::member_redemptions))
        .route("/members/{id}/nudge", post(rest::nudge_member))
        .route("/chores", get(rest::list_chores).post(rest::create_chore))
        .route("/chores/completed", delete(rest::clear_completed))
        .route("/chores/reset", post(rest::reset_recurring))
        .route("/chores/{id}", delete(rest::delete_chore))
        .route("/chores/{id}/toggle", post(rest::toggle_chore))
        .route("/rewards", get(rest::list_rewards).post(rest::create_reward))
        .route("/rewards/{id}/redeem", post(rest::redeem_reward))
        .route("/calendar/day/{date}", get(rest::day_calendar))
        .route("/calendar/{year}/{month}", get(rest::month_calendar))
        .route("/commands", post(rest::run_command))
        .layer(axum_middleware::from_fn(trace_requests))
        .with_state(state)
}
