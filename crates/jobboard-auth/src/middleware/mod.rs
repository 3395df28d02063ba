//! HTTP middleware for the admin access gate.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use jobboard_auth::{AccessGate, GateConfig, admin_gate_middleware};
//!
//! let gate = AccessGate::new(GateConfig::default())?;
//!
//! let app = Router::new()
//!     .route("/admin", get(dashboard))
//!     .route("/admin/login", get(login_page))
//!     .layer(middleware::from_fn_with_state(gate, admin_gate_middleware));
//! ```

pub mod admin;

pub use admin::admin_gate_middleware;
