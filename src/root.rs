//! The root!
//!
//! Status of the service, and everything no other route wants

use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::http::Uri;
use serde::Serialize;

use crate::api::Error;
use crate::config::Config;

#[derive(Debug, Serialize)]
pub struct Status {
    status: String,
}

/// Tell the world we are running
pub async fn root(Extension(config): Extension<Arc<Config>>) -> Json<Status> {
    Json(Status {
        status: format!("{} API is running", config.app_name),
    })
}

/// All requests without a route end up here
pub async fn fallback(uri: Uri) -> Error {
    tracing::debug!("No route for {}", uri.path());

    Error::not_found("Not found")
}
