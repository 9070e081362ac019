//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod players;

/// Assembles every route, ready for middleware layers and state.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/players", players::router())
}
