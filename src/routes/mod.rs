//! Route composition. `app` is the single construction point for the full
//! router; nothing registers itself globally.

pub mod common;
pub mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Request bodies larger than this are rejected before the handlers run.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The composed application: common routes plus the parameterized resource
/// routes, with request tracing and a body-size cap.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
}
