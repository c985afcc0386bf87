use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Distance from the screen edges for the default overlay placement.
pub const OVERLAY_MARGIN: f32 = 30.0;

/// Where the bundled backend keeps the user's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsBackend {
    #[default]
    Keyring,
    File,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_host: String,
    pub backend_port: u16,
    pub backend_timeout: Duration,
    pub credentials_store: CredentialsBackend,
    pub credentials_fallback: bool,
    pub credentials_file: PathBuf,
    pub fetch_without_login: bool,
    pub log_level: String,
    pub overlay_title: String,
    pub overlay_width: f32,
    pub overlay_height: f32,
    /// Where the window opens; also the origin drag moves start from.
    pub overlay_position: (f32, f32),
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| v == "true" || v == "1").unwrap_or(false);

        let overlay_position = match (
            lookup("OVERLAY_X").and_then(|v| v.parse::<f32>().ok()),
            lookup("OVERLAY_Y").and_then(|v| v.parse::<f32>().ok()),
        ) {
            (Some(x), Some(y)) => (x, y),
            _ => (OVERLAY_MARGIN, OVERLAY_MARGIN),
        };

        let credentials_store = match lookup("CREDENTIALS_STORE").as_deref() {
            Some("file") => CredentialsBackend::File,
            _ => CredentialsBackend::Keyring,
        };

        Self {
            backend_host: lookup("BACKEND_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            backend_port: lookup("BACKEND_PORT").and_then(|p| p.parse().ok()).unwrap_or(5000),
            backend_timeout: Duration::from_secs(
                lookup("BACKEND_TIMEOUT_SECS").and_then(|v| v.parse().ok()).unwrap_or(10),
            ),
            credentials_store,
            credentials_fallback: flag("CREDENTIALS_FALLBACK"),
            credentials_file: lookup("CREDENTIALS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data").join("credentials.json")),
            fetch_without_login: flag("FETCH_WITHOUT_LOGIN"),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            overlay_title: lookup("OVERLAY_TITLE").unwrap_or_else(|| "ErpSnap v2.0".to_string()),
            overlay_width: lookup("OVERLAY_WIDTH").and_then(|v| v.parse().ok()).unwrap_or(300.0),
            overlay_height: lookup("OVERLAY_HEIGHT").and_then(|v| v.parse().ok()).unwrap_or(240.0),
            overlay_position,
        }
    }

    pub fn backend_endpoint(&self) -> String {
        format!("{}:{}", self.backend_host, self.backend_port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.backend_endpoint(), "127.0.0.1:5000");
        assert_eq!(cfg.backend_timeout, Duration::from_secs(10));
        assert_eq!(cfg.credentials_store, CredentialsBackend::Keyring);
        assert!(!cfg.credentials_fallback);
        assert!(!cfg.fetch_without_login);
        assert_eq!(cfg.credentials_file, PathBuf::from("data").join("credentials.json"));
        assert_eq!(cfg.overlay_title, "ErpSnap v2.0");
        assert_eq!(cfg.overlay_position, (OVERLAY_MARGIN, OVERLAY_MARGIN));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config_with(&[
            ("BACKEND_HOST", "erp.local"),
            ("BACKEND_PORT", "7000"),
            ("BACKEND_TIMEOUT_SECS", "3"),
            ("CREDENTIALS_STORE", "file"),
            ("CREDENTIALS_FALLBACK", "1"),
            ("FETCH_WITHOUT_LOGIN", "true"),
            ("OVERLAY_X", "1500"),
            ("OVERLAY_Y", "30"),
        ]);
        assert_eq!(cfg.backend_endpoint(), "erp.local:7000");
        assert_eq!(cfg.backend_timeout, Duration::from_secs(3));
        assert_eq!(cfg.credentials_store, CredentialsBackend::File);
        assert!(cfg.credentials_fallback);
        assert!(cfg.fetch_without_login);
        assert_eq!(cfg.overlay_position, (1500.0, 30.0));
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let cfg = config_with(&[
            ("BACKEND_PORT", "not-a-port"),
            ("FETCH_WITHOUT_LOGIN", "yes"),
            ("OVERLAY_X", "10"),
        ]);
        assert_eq!(cfg.backend_port, 5000);
        assert!(!cfg.fetch_without_login);
        // a position needs both coordinates
        assert_eq!(cfg.overlay_position, (OVERLAY_MARGIN, OVERLAY_MARGIN));
    }
}
