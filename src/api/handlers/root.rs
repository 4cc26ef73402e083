//! Root banner handler.

use axum::response::IntoResponse;

/// Service banner, mostly useful to confirm the thing answering is us.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
