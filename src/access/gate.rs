//! Single shared-secret access gate and the marker it issues.
//!
//! The gate compares a submitted secret against one configured value.  It is
//! a coarse perimeter: there are no users, no credential store and no
//! per-visitor identity.  A successful check yields an [`AccessMarker`] that
//! the web layer turns into a cookie; the perimeter middleware later reads
//! the cookie back and asks [`AccessMarker::is_valid`].

use std::time::{Duration, SystemTime};

use crate::config::AccessConfig;

/// Cookie value carried by a granted marker.
const MARKER_VALUE: &str = "true";

// ---------------------------------------------------------------------------
// AccessMarker
// ---------------------------------------------------------------------------

/// Client-held proof of having passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessMarker {
    /// Whether the marker exists at all.
    pub present: bool,
    /// Instant after which the marker is no longer valid.
    ///
    /// `None` when the marker was read back from a request cookie: the
    /// server never learns the issuance time, so expiry is enforced by the
    /// client dropping the cookie once its `Max-Age` lapses.
    pub expires_at: Option<SystemTime>,
}

impl AccessMarker {
    /// A freshly issued marker, valid for `window` from `now`.  A window
    /// too large to represent never expires.
    pub fn issue(now: SystemTime, window: Duration) -> Self {
        Self {
            present: true,
            expires_at: now.checked_add(window),
        }
    }

    /// No marker.
    pub fn absent() -> Self {
        Self {
            present: false,
            expires_at: None,
        }
    }

    /// Interpret the marker cookie's value as found on a request.
    pub fn from_cookie_value(value: Option<&str>) -> Self {
        match value {
            Some(MARKER_VALUE) => Self {
                present: true,
                expires_at: None,
            },
            _ => Self::absent(),
        }
    }

    /// Extract the marker named `cookie_name` from a raw `Cookie` header.
    pub fn from_cookie_header(header: Option<&str>, cookie_name: &str) -> Self {
        let value = header.and_then(|h| {
            h.split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(name, _)| *name == cookie_name)
                .map(|(_, value)| value.trim())
        });
        Self::from_cookie_value(value)
    }

    /// Pure validity predicate checked at every navigation boundary.
    pub fn is_valid(&self, now: SystemTime) -> bool {
        match (self.present, self.expires_at) {
            (false, _) => false,
            (true, None) => true,
            (true, Some(expires_at)) => now < expires_at,
        }
    }
}

// ---------------------------------------------------------------------------
// AccessDecision
// ---------------------------------------------------------------------------

/// Outcome of [`AccessGate::check_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The secret matched; the caller should set the marker and go to `/`.
    Granted(AccessMarker),
    /// The secret did not match.  No detail about partial matches is given.
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// Verifies submitted secrets and renders the marker cookie.
#[derive(Debug, Clone)]
pub struct AccessGate {
    access_code: String,
    cookie_name: String,
    window: Duration,
}

impl AccessGate {
    /// User-facing message for a rejected secret.
    pub const DENIED_MESSAGE: &'static str = "Invalid access code";

    /// Route that lands the visitor after a successful check.
    pub const DEFAULT_ROUTE: &'static str = "/";

    pub fn from_config(config: &AccessConfig) -> Self {
        Self {
            access_code: config.access_code.clone(),
            cookie_name: config.cookie_name.clone(),
            window: config.window(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Exact comparison: case, whitespace and length all matter.
    pub fn check_access(&self, secret: &str, now: SystemTime) -> AccessDecision {
        if secret == self.access_code {
            log::info!("access: code accepted");
            AccessDecision::Granted(AccessMarker::issue(now, self.window))
        } else {
            log::info!("access: code rejected");
            AccessDecision::Denied
        }
    }

    /// `Set-Cookie` value for a granted marker: path-wide, `Max-Age` equal to
    /// the configured window.
    pub fn set_cookie_header(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}",
            self.cookie_name,
            MARKER_VALUE,
            self.window.as_secs()
        )
    }

    /// Read this gate's marker from a raw `Cookie` header.
    pub fn marker_from_cookie_header(&self, header: Option<&str>) -> AccessMarker {
        AccessMarker::from_cookie_header(header, &self.cookie_name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
