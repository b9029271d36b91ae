//! Runtime configuration for the HTTP service.

/// Default port the service listens on.
pub const DEFAULT_PORT: u16 = 3001;

/// Default append-mode log file.
pub const DEFAULT_LOG_FILE: &str = "development.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub log_file: String,
    /// Error reporting is enabled only when a DSN is configured.
    pub sentry_dsn: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_file: DEFAULT_LOG_FILE.to_string(),
            sentry_dsn: None,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `LOG_FILE` and `SENTRY_DSN` from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| format!("invalid PORT '{port}'"))?;
        }
        if let Some(log_file) = get("LOG_FILE") {
            config.log_file = log_file;
        }
        config.sentry_dsn = get("SENTRY_DSN");

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
