pub mod health;
pub mod metrics;
mod operations;

use axum::{Router, routing::post};

/// Build FHIR operation routes
pub fn fhir_routes() -> Router {
    Router::new()
        .route("/Bundle/$extract-features", post(operations::extract_features))
        .route(
            "/Encounter/$label-readmissions",
            post(operations::label_readmissions),
        )
}
