use jobboard_auth::GateConfig;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

/// Roots of the routes served without the admin marker.
pub const PUBLIC_ROUTE_ROOTS: [&str; 2] = ["/api", "/healthz"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Admin access gate
    #[serde(default)]
    pub gate: GateConfig,
    /// Query cache
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.cache.default_ttl_ms == 0 {
            return Err("cache.default_ttl_ms must be > 0".into());
        }
        if self.cache.max_featured_limit == 0 {
            return Err("cache.max_featured_limit must be > 0".into());
        }
        self.gate
            .validate()
            .map_err(|e| format!("gate config error: {e}"))?;
        self.check_gate_against_public_routes()
    }

    /// The admin routes must not shadow or gate a public route.
    fn check_gate_against_public_routes(&self) -> Result<(), String> {
        let prefix = self.gate.protected_prefix.trim_end_matches('/');
        for root in PUBLIC_ROUTE_ROOTS {
            let gates_public = root.starts_with(prefix);
            let inside_public = prefix.starts_with(&format!("{root}/"));
            if gates_public || inside_public {
                return Err(format!(
                    "gate.protected_prefix '{}' overlaps the public route '{root}'",
                    self.gate.protected_prefix
                ));
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached catalog reads in milliseconds
    #[serde(default = "default_cache_ttl_ms")]
    pub default_ttl_ms: u64,
    /// Upper bound accepted for `?limit=` on featured jobs
    #[serde(default = "default_max_featured_limit")]
    pub max_featured_limit: usize,
}

fn default_cache_ttl_ms() -> u64 {
    300_000
}
fn default_max_featured_limit() -> usize {
    50
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_cache_ttl_ms(),
            max_featured_limit: default_max_featured_limit(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

pub mod loader {
    use std::path::Path;

    use config::{Config, Environment, File};

    use super::AppConfig;

    /// File read when no path is given.
    pub const DEFAULT_CONFIG_FILE: &str = "jobboard.toml";

    /// Prefix of environment overrides, e.g. `JOBBOARD__GATE__COOKIE_NAME`.
    pub const ENV_PREFIX: &str = "JOBBOARD";

    /// Layers the TOML file at `path` (or [`DEFAULT_CONFIG_FILE`]) and then
    /// `JOBBOARD__*` variables over the built-in defaults.
    ///
    /// A missing file leaves the defaults in place. The merged result is
    /// validated before it is returned.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let file = Path::new(path.unwrap_or(DEFAULT_CONFIG_FILE));

        let merged: AppConfig = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| format!("cannot read {}: {e}", file.display()))?;

        merged.validate()?;
        Ok(merged)
    }
}
