//! Access gate configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [gate]
//! protected_prefix = "/admin"
//! login_path = "/admin/login"
//! cookie_name = "admin_auth"
//! policy = "presence"
//! ```

use serde::{Deserialize, Serialize};

/// Minimum length of the HS256 secret used by the signed marker policy.
pub const MIN_SIGNING_SECRET_LEN: usize = 32;

/// How the marker cookie is checked once found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPolicy {
    /// Any value counts, including an empty one.
    #[default]
    Presence,
    /// The value must be a valid, unexpired HS256 token.
    Signed,
}

impl std::fmt::Display for MarkerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Presence => write!(f, "presence"),
            Self::Signed => write!(f, "signed"),
        }
    }
}

/// Configuration of the admin access gate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Path prefix that requires the marker cookie.
    /// Matched with a plain `starts_with`.
    pub protected_prefix: String,

    /// Login page under the prefix. Always reachable, and the redirect target
    /// for denied requests.
    pub login_path: String,

    /// Name of the marker cookie set by the login flow.
    pub cookie_name: String,

    /// Marker check policy.
    pub policy: MarkerPolicy,

    /// HS256 secret, required when `policy = "signed"`.
    /// Prefer `JOBBOARD__GATE__SIGNING_SECRET` over writing it to a file.
    pub signing_secret: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_prefix: "/admin".to_string(),
            login_path: "/admin/login".to_string(),
            cookie_name: "admin_auth".to_string(),
            policy: MarkerPolicy::Presence,
            signing_secret: None,
        }
    }
}

/// Errors from gate configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl GateConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The prefix or login path does not start with `/`
    /// - Either path contains route syntax (`{`, `}`, `*`, `:`), a query or
    ///   fragment marker, or whitespace
    /// - The login path is not strictly under the prefix
    /// - The cookie name is empty or contains `=`, `;` or whitespace
    /// - The signed policy is selected without a long enough secret
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.protected_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "protected_prefix must start with '/', got '{}'",
                self.protected_prefix
            )));
        }

        if !self.login_path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "login_path must start with '/', got '{}'",
                self.login_path
            )));
        }

        for (field, path) in [
            ("protected_prefix", &self.protected_prefix),
            ("login_path", &self.login_path),
        ] {
            if let Some(c) = path.chars().find(|c| is_reserved_path_char(*c)) {
                return Err(ConfigError::InvalidValue(format!(
                    "{field} must be a literal path, found '{c}' in '{path}'"
                )));
            }
        }

        let prefix = self.protected_prefix.trim_end_matches('/');
        if !self.login_path.starts_with(&self.protected_prefix)
            || self.login_path.trim_end_matches('/') == prefix
        {
            return Err(ConfigError::InvalidValue(format!(
                "login_path '{}' must be a sub-path of protected_prefix '{}'",
                self.login_path, self.protected_prefix
            )));
        }

        if self.cookie_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "cookie_name cannot be empty".to_string(),
            ));
        }

        if self
            .cookie_name
            .chars()
            .any(|c| c == '=' || c == ';' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidValue(format!(
                "cookie_name '{}' contains forbidden characters",
                self.cookie_name
            )));
        }

        if self.policy == MarkerPolicy::Signed {
            match self.signing_secret.as_deref() {
                None | Some("") => {
                    return Err(ConfigError::Missing(
                        "signing_secret is required for the signed policy".to_string(),
                    ));
                }
                Some(secret) if secret.len() < MIN_SIGNING_SECRET_LEN => {
                    return Err(ConfigError::InvalidValue(format!(
                        "signing_secret must be at least {MIN_SIGNING_SECRET_LEN} bytes"
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Characters the router would read as captures or wildcards, or that can
/// never appear in a request path.
fn is_reserved_path_char(c: char) -> bool {
    matches!(c, '{' | '}' | '*' | ':' | '?' | '#') || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.protected_prefix, "/admin");
        assert_eq!(config.login_path, "/admin/login");
        assert_eq!(config.policy, MarkerPolicy::Presence);
    }

    #[test]
    fn test_relative_paths_rejected() {
        let config = GateConfig {
            protected_prefix: "admin".to_string(),
            ..GateConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let config = GateConfig {
            login_path: "login".to_string(),
            ..GateConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_login_path_must_sit_under_prefix() {
        for bad in ["/login", "/admin", "/admin/"] {
            let config = GateConfig {
                login_path: bad.to_string(),
                ..GateConfig::default()
            };
            assert!(config.validate().is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn test_route_syntax_in_paths_rejected() {
        for (prefix, login) in [
            ("/admin/{id}", "/admin/{id}/login"),
            ("/admin", "/admin/{*rest}"),
            ("/admin", "/admin/:login"),
            ("/admin*", "/admin*/login"),
            ("/admin", "/admin/login?next=/"),
            ("/admin", "/admin/log in"),
        ] {
            let config = GateConfig {
                protected_prefix: prefix.to_string(),
                login_path: login.to_string(),
                ..GateConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue(_))),
                "expected '{prefix}' / '{login}' to be rejected"
            );
        }
    }

    #[test]
    fn test_cookie_name_rules() {
        for bad in ["", "admin auth", "a=b", "a;b"] {
            let config = GateConfig {
                cookie_name: bad.to_string(),
                ..GateConfig::default()
            };
            assert!(config.validate().is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn test_signed_policy_needs_secret() {
        let mut config = GateConfig {
            policy: MarkerPolicy::Signed,
            ..GateConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        config.signing_secret = Some("short".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        config.signing_secret = Some("k".repeat(MIN_SIGNING_SECRET_LEN));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(MarkerPolicy::Presence.to_string(), "presence");
        assert_eq!(MarkerPolicy::Signed.to_string(), "signed");
    }
}
