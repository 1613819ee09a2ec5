//! Perimeter enforcement ahead of every page render.
//!
//! Installed on the router with `axum::middleware::from_fn_with_state`.  The
//! gate page itself and backend endpoints under `/api/` pass through
//! untouched; everything else needs a valid [`AccessMarker`] or is
//! redirected to the gate.  The original destination is not remembered.
//!
//! [`AccessMarker`]: super::AccessMarker

use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::AccessGate;

/// Path of the gate page.
pub const ACCESS_PATH: &str = "/access";

/// Prefix of backend query endpoints, which are exempt from the gate.
pub const API_PREFIX: &str = "/api/";

/// `true` for paths that bypass the marker check.
pub fn is_exempt(path: &str) -> bool {
    path == ACCESS_PATH || path.starts_with(API_PREFIX)
}

/// Middleware: redirect to the gate unless the request is exempt or carries
/// a valid marker.
pub async fn require_access(
    State(gate): State<Arc<AccessGate>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if is_exempt(&path) {
        return next.run(request).await;
    }

    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok());
    let marker = gate.marker_from_cookie_header(cookie_header);

    if marker.is_valid(SystemTime::now()) {
        next.run(request).await
    } else {
        log::debug!("access: no valid marker for {path}, redirecting to gate");
        Redirect::to(ACCESS_PATH).into_response()
    }
}
