//! Route modules and the assembled application router.

use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod callbacks;
pub mod health;
pub mod submissions;

/// Builds the full router without state or middleware.
pub fn app() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest(
            "/api/v1",
            Router::new()
                .merge(submissions::router())
                .merge(admin::router())
                .merge(callbacks::router()),
        )
}
