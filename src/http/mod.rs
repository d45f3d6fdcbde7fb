pub mod cors;
pub mod handlers;
pub mod response;
pub mod state;

pub use state::AppState;

use axum::routing::{on, post, MethodFilter};
use axum::{middleware, Router};

pub const SUBMIT_PATH: &str = "/submit_form_data";
pub const READ_PATH: &str = "/read_form_data";

/// Exact-path routing; anything unmatched is a 404 (or 204 for OPTIONS).
pub fn router(state: AppState) -> Router {
    let mut router = Router::new().route(
        SUBMIT_PATH,
        post(handlers::submit_form_data).fallback(handlers::fallback),
    );

    if state.reader.is_some() {
        router = router.route(
            READ_PATH,
            // `get` would also answer HEAD
            on(MethodFilter::GET, handlers::read_form_data).fallback(handlers::fallback),
        );
    }

    router
        .fallback(handlers::fallback)
        .layer(middleware::map_response(cors::apply_cors_headers))
        .with_state(state)
}
