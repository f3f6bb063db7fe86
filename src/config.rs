//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::DEFAULT_SHARED_SECRET;

/// Top-level service configuration.
///
/// Loaded once at startup via [`TallyConfig::from_env`].
#[derive(Clone)]
pub struct TallyConfig {
    /// Socket address to bind the HTTP server to (e.g. `127.0.0.1:3000`).
    pub listen_addr: SocketAddr,

    /// Directory holding the JSON state files.
    pub data_dir: PathBuf,

    /// Master switch for the persistence layer. When off, state lives in
    /// memory only.
    pub persistence_enabled: bool,

    /// Seconds between automatic saves while a session is active
    /// (0 = disabled).
    pub autosave_interval_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Number of drinks listed in the statistics ranking.
    pub top_drinks_limit: usize,

    /// Shared secret for login and reset.
    pub admin_password: String,
}

impl TallyConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()?;

        let data_dir = std::env::var("DATA_DIR")
            .map_or_else(|_| PathBuf::from("./data"), PathBuf::from);

        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);
        let autosave_interval_secs = parse_env("AUTOSAVE_INTERVAL_SECS", 30);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);
        let top_drinks_limit = parse_env("TOP_DRINKS_LIMIT", 10);
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_SHARED_SECRET.to_string());

        Ok(Self {
            listen_addr,
            data_dir,
            persistence_enabled,
            autosave_interval_secs,
            event_bus_capacity,
            top_drinks_limit,
            admin_password,
        })
    }

    /// Autosave period, or `None` when disabled.
    #[must_use]
    pub fn autosave_period(&self) -> Option<Duration> {
        (self.autosave_interval_secs > 0).then(|| Duration::from_secs(self.autosave_interval_secs))
    }
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("./data"),
            persistence_enabled: true,
            autosave_interval_secs: 30,
            event_bus_capacity: 1024,
            top_drinks_limit: 10,
            admin_password: DEFAULT_SHARED_SECRET.to_string(),
        }
    }
}

impl std::fmt::Debug for TallyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TallyConfig")
            .field("listen_addr", &self.listen_addr)
            .field("data_dir", &self.data_dir)
            .field("persistence_enabled", &self.persistence_enabled)
            .field("autosave_interval_secs", &self.autosave_interval_secs)
            .field("event_bus_capacity", &self.event_bus_capacity)
            .field("top_drinks_limit", &self.top_drinks_limit)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
