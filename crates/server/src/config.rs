// crates/server/src/config.rs
//! HTTP server settings read from the environment.

use std::path::PathBuf;

use echo_break_core::WindowDays;
use echo_break_db::ConfigError;

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 8501;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Window used when a request does not pass `?days=`.
    pub default_window: WindowDays,
    /// Frontend bundle served for non-API paths, if any.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_window: WindowDays::DEFAULT,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Read `ECHO_BREAK_PORT` (or `PORT`), `ECHO_BREAK_WINDOW_DAYS` and
    /// `STATIC_DIR`. Without `STATIC_DIR`, `./dist` is served if it exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if config.static_dir.is_none() {
            let dist = PathBuf::from("dist");
            config.static_dir = dist.exists().then_some(dist);
        }
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let port = lookup("ECHO_BREAK_PORT")
            .map(|raw| ("ECHO_BREAK_PORT", raw))
            .or_else(|| lookup("PORT").map(|raw| ("PORT", raw)));
        if let Some((key, raw)) = port {
            config.port = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value: raw.clone() })?;
        }

        if let Some(raw) = lookup("ECHO_BREAK_WINDOW_DAYS") {
            config.default_window = raw
                .parse::<i64>()
                .ok()
                .and_then(|days| WindowDays::new(days).ok())
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "ECHO_BREAK_WINDOW_DAYS",
                    value: raw.clone(),
                })?;
        }

        config.static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8501);
        assert_eq!(config.default_window.days(), 30);
    }

    #[test]
    fn test_port_precedence() {
        let config =
            ServerConfig::from_lookup(lookup(&[("ECHO_BREAK_PORT", "9000"), ("PORT", "9100")]))
                .unwrap();
        assert_eq!(config.port, 9000);

        let config = ServerConfig::from_lookup(lookup(&[("PORT", "9100")])).unwrap();
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err =
            ServerConfig::from_lookup(lookup(&[("ECHO_BREAK_WINDOW_DAYS", "0")])).unwrap_err();
        assert!(err.to_string().contains("ECHO_BREAK_WINDOW_DAYS"));
    }

    #[test]
    fn test_window_and_static_dir() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ECHO_BREAK_WINDOW_DAYS", "7"),
            ("STATIC_DIR", "/srv/echo-break"),
        ]))
        .unwrap();
        assert_eq!(config.default_window.days(), 7);
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/echo-break")));
    }
}
