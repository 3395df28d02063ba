//! Admin access gate.
//!
//! A stateless predicate evaluated once per request:
//!
//! ```text
//! path outside prefix ─────────────► Allowed
//! path == login path ──────────────► Allowed
//! marker cookie missing ───────────► Denied(MissingMarker)  → redirect
//! marker present, policy presence ─► Allowed
//! marker present, policy signed ───► verify → Allowed | Denied(RejectedMarker)
//! ```
//!
//! Nothing is remembered between requests.

use std::fmt;
use std::sync::Arc;

use crate::config::{GateConfig, MarkerPolicy};
use crate::cookies::RequestCookies;
use crate::error::GateError;
use crate::marker::MarkerVerifier;

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the request unmodified.
    Allowed,
    /// Redirect to the login path.
    Denied(DenyReason),
}

impl GateDecision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The marker cookie was not sent.
    MissingMarker,
    /// The marker was sent but failed signed verification.
    RejectedMarker,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMarker => write!(f, "missing marker cookie"),
            Self::RejectedMarker => write!(f, "rejected marker cookie"),
        }
    }
}

/// Cookie-presence gate over the protected path prefix.
///
/// Cheap to clone; Axum clones middleware state per request.
#[derive(Debug, Clone)]
pub struct AccessGate {
    config: Arc<GateConfig>,
    verifier: Option<Arc<MarkerVerifier>>,
}

impl AccessGate {
    /// Builds a gate from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `GateError::InvalidConfig` if the configuration fails
    /// [`GateConfig::validate`].
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        config.validate()?;

        let verifier = match (config.policy, config.signing_secret.as_deref()) {
            (MarkerPolicy::Signed, Some(secret)) => {
                Some(Arc::new(MarkerVerifier::new(secret.as_bytes())))
            }
            _ => None,
        };

        tracing::debug!(
            prefix = %config.protected_prefix,
            login_path = %config.login_path,
            cookie = %config.cookie_name,
            policy = %config.policy,
            "Access gate configured"
        );

        Ok(Self {
            config: Arc::new(config),
            verifier,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Redirect target for denied requests.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.config.login_path
    }

    /// Returns `true` if `path` needs the marker cookie.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        path.starts_with(&self.config.protected_prefix) && path != self.config.login_path
    }

    /// Decides whether a request for `path` carrying `cookies` may proceed.
    #[must_use]
    pub fn evaluate(&self, path: &str, cookies: &RequestCookies) -> GateDecision {
        if !self.is_protected(path) {
            return GateDecision::Allowed;
        }

        let Some(value) = cookies.get(&self.config.cookie_name) else {
            return GateDecision::Denied(DenyReason::MissingMarker);
        };

        match &self.verifier {
            None => GateDecision::Allowed,
            Some(verifier) => match verifier.verify(value) {
                Ok(claims) => {
                    tracing::trace!(subject = %claims.sub, "Signed marker accepted");
                    GateDecision::Allowed
                }
                Err(e) => {
                    tracing::debug!(path = %path, error = %e, "Signed marker rejected");
                    GateDecision::Denied(DenyReason::RejectedMarker)
                }
            },
        }
    }
}
