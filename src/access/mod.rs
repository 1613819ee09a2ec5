//! Access gate: a single shared secret guarding every page.
//!
//! * [`AccessGate`]: checks the secret and renders the marker cookie.
//! * [`AccessMarker`]: the client-held marker with its validity predicate.
//! * [`require_access`]: axum middleware enforcing the perimeter.

pub mod gate;
pub mod middleware;

pub use gate::{AccessDecision, AccessGate, AccessMarker};
pub use middleware::{is_exempt, require_access, ACCESS_PATH, API_PREFIX};
