//! # jobboard-auth
//!
//! Perimeter check for the job board's administrative section.
//!
//! This crate provides:
//! - The [`AccessGate`] decision predicate over a request path and its cookies
//! - Cookie header parsing ([`RequestCookies`])
//! - An Axum middleware that redirects denied requests to the login page
//! - An opt-in signed marker policy ([`MarkerSigner`], [`MarkerVerifier`])
//!
//! ## Overview
//!
//! By default the gate only checks that the marker cookie is *present* on
//! requests under the protected prefix. Its value is never inspected. This is
//! a coarse perimeter, not an authorization system: any caller who sets the
//! cookie name on its own request passes. Switching the policy to
//! [`MarkerPolicy::Signed`] requires the cookie to carry an HS256 token with a
//! valid signature and an unexpired `exp` claim.
//!
//! ## Modules
//!
//! - [`config`] - Gate configuration and validation
//! - [`cookies`] - `Cookie` header parsing
//! - [`gate`] - The allow/deny predicate
//! - [`marker`] - Signed marker issuance and verification
//! - [`middleware`] - Axum middleware wiring

pub mod config;
pub mod cookies;
pub mod error;
pub mod gate;
pub mod marker;
pub mod middleware;

pub use config::{ConfigError, GateConfig, MarkerPolicy};
pub use cookies::RequestCookies;
pub use error::GateError;
pub use gate::{AccessGate, DenyReason, GateDecision};
pub use marker::{MarkerClaims, MarkerSigner, MarkerVerifier};
pub use middleware::admin_gate_middleware;

/// Type alias for gate results.
pub type GateResult<T> = Result<T, GateError>;
