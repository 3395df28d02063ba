use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use jobboard_auth::{AccessGate, GateError, admin_gate_middleware};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::catalog::{CachedCatalog, InMemoryCatalog, JobCatalog};
use crate::{config::AppConfig, handlers, middleware as app_middleware};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CachedCatalog,
    pub gate: AccessGate,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state around `catalog`, the remote job database.
    pub fn new(cfg: AppConfig, catalog: Arc<dyn JobCatalog>) -> Result<Self, GateError> {
        let gate = AccessGate::new(cfg.gate.clone())?;
        let catalog = CachedCatalog::new(catalog, cfg.cache.default_ttl());
        Ok(Self {
            catalog,
            gate,
            config: Arc::new(cfg),
        })
    }
}

pub struct JobboardServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let gate = state.gate.clone();
    let login_path = gate.login_path().to_string();
    let prefix = gate.config().protected_prefix.trim_end_matches('/').to_string();

    Router::new()
        .route("/healthz", get(handlers::healthz))
        // Public catalog
        .route("/api/jobs/featured", get(handlers::featured_jobs))
        .route("/api/jobs/{id}", get(handlers::job_by_id))
        .route("/api/categories", get(handlers::categories))
        .route("/api/categories/{slug}/jobs", get(handlers::category_jobs))
        .route("/api/companies", get(handlers::companies))
        // Admin back-office
        .route(&login_path, get(handlers::admin_login))
        .route(&prefix, get(handlers::admin_dashboard))
        .route(
            &format!("{prefix}/cache/invalidate"),
            post(handlers::admin_invalidate),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        // Middleware stack, innermost first: admin gate -> compression -> trace -> request id -> body limit
        .layer(middleware::from_fn_with_state(gate, admin_gate_middleware))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .headers()
                        .get(app_middleware::REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    catalog: Option<Arc<dyn JobCatalog>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            catalog: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn JobCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> anyhow::Result<JobboardServer> {
        self.config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
        let catalog = self.catalog.unwrap_or_else(|| {
            tracing::warn!("No catalog backend configured, serving the in-memory seed data");
            Arc::new(InMemoryCatalog::seeded())
        });
        let state = AppState::new(self.config, catalog)?;

        Ok(JobboardServer {
            addr: self.addr,
            app: build_app(state),
        })
    }
}

impl JobboardServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_overlapping_gate() {
        let mut cfg = AppConfig::default();
        cfg.gate.protected_prefix = "/api".into();
        cfg.gate.login_path = "/api/companies".into();

        let err = ServerBuilder::new()
            .with_config(cfg)
            .build()
            .err()
            .expect("overlapping prefix must fail");
        assert!(err.to_string().contains("overlaps the public route"), "{err}");
    }

    #[test]
    fn test_build_with_custom_prefix() {
        let mut cfg = AppConfig::default();
        cfg.gate.protected_prefix = "/backoffice".into();
        cfg.gate.login_path = "/backoffice/login".into();

        assert!(ServerBuilder::new().with_config(cfg).build().is_ok());
    }
}
