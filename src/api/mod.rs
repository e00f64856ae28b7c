mod error;
mod handlers;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::models::Period;
use crate::tracker::Tracker;

pub(crate) use error::ApiError;

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) tracker: Tracker,
    pub(crate) pinned_period: Option<Period>,
}

impl AppState {
    pub(crate) fn new(tracker: Tracker, pinned_period: Option<Period>) -> Self {
        Self {
            tracker,
            pinned_period,
        }
    }

    /// Resolved per request so a long-running server rolls over at month end.
    fn period(&self) -> Period {
        self.pinned_period.unwrap_or_else(Period::current)
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::root))
        .route(
            "/categories",
            get(handlers::list_categories)
                .post(handlers::add_category)
                .delete(handlers::remove_category),
        )
        .route("/budget", put(handlers::update_budget))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
