use std::time::Duration;

use crate::probe::{ProbeTarget, DEFAULT_PROBE_TIMEOUT};

const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_EA_SERVER_HOST: &str = "localhost";
const DEFAULT_EA_SERVER_PORT: u16 = 9090;

/// Default timeout for a single gateway HTTP round trip (10 seconds).
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Default timeout for tool operations (30 seconds).
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub telegram_bot_token: Option<String>,
    pub telegram_user_id: Option<String>,
    pub telegram_group_id: Option<String>,
    pub telegram_api_base: String,
    pub api_base_url: String,
    pub ea_server_host: String,
    pub ea_server_port: u16,
    pub probe_timeout: Duration,
    pub gateway_timeout: Duration,
    pub tool_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_user_id: None,
            telegram_group_id: None,
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ea_server_host: DEFAULT_EA_SERVER_HOST.to_string(),
            ea_server_port: DEFAULT_EA_SERVER_PORT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            gateway_timeout: Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `TELEGRAM_BOT_TOKEN` (optional) — messaging API credential; tools that
    ///   need it report an error at call time when it is missing
    /// - `TELEGRAM_USER_ID` (optional) — default recipient for outgoing messages
    /// - `TELEGRAM_GROUP_ID` (optional) — secondary recipient / group chat
    /// - `TELEGRAM_API_BASE` (optional, default `https://api.telegram.org`)
    /// - `API_BASE_URL` (optional, default `http://127.0.0.1:8080`) — signals API
    /// - `EA_SERVER_HOST` / `EA_SERVER_PORT` (optional, default `localhost:9090`)
    /// - `PROBE_TIMEOUT_MS` (optional, default 3000) — TCP probe connect timeout
    /// - `GATEWAY_TIMEOUT_SECS` (optional, default 10) — HTTP round-trip timeout
    /// - `TOOL_TIMEOUT_SECS` (optional, default 30) — max seconds per tool call
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let ea_server_port = match get("EA_SERVER_PORT") {
            Some(val) => val
                .trim()
                .parse::<u16>()
                .map_err(|_| "EA_SERVER_PORT must be a valid TCP port".to_string())?,
            None => defaults.ea_server_port,
        };

        let probe_timeout = match get("PROBE_TIMEOUT_MS") {
            Some(val) => Duration::from_millis(parse_positive(&val, "PROBE_TIMEOUT_MS")?),
            None => defaults.probe_timeout,
        };

        let gateway_timeout = match get("GATEWAY_TIMEOUT_SECS") {
            Some(val) => Duration::from_secs(parse_positive(&val, "GATEWAY_TIMEOUT_SECS")?),
            None => defaults.gateway_timeout,
        };

        let tool_timeout = match get("TOOL_TIMEOUT_SECS") {
            Some(val) => Duration::from_secs(parse_positive(&val, "TOOL_TIMEOUT_SECS")?),
            None => defaults.tool_timeout,
        };

        Ok(Self {
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_user_id: get("TELEGRAM_USER_ID"),
            telegram_group_id: get("TELEGRAM_GROUP_ID"),
            telegram_api_base: get("TELEGRAM_API_BASE").unwrap_or(defaults.telegram_api_base),
            api_base_url: get("API_BASE_URL").unwrap_or(defaults.api_base_url),
            ea_server_host: get("EA_SERVER_HOST").unwrap_or(defaults.ea_server_host),
            ea_server_port,
            probe_timeout,
            gateway_timeout,
            tool_timeout,
        })
    }

    /// The EA / application server whose liveness `check_ea_connection` reports.
    pub fn ea_target(&self) -> ProbeTarget {
        ProbeTarget::new("EA Server", self.ea_server_host.clone(), self.ea_server_port)
    }

    /// Sibling services reported by `get_server_info`, in display order.
    pub fn probe_targets(&self) -> Vec<ProbeTarget> {
        vec![
            ProbeTarget::new("API Server", "127.0.0.1", 8080),
            ProbeTarget::new("FastAPI Server", "127.0.0.1", 8000),
            ProbeTarget::new(
                "EA Communication Server",
                self.ea_server_host.clone(),
                self.ea_server_port,
            ),
            ProbeTarget::new("Frontend Server", "127.0.0.1", 5173),
        ]
    }
}

fn parse_positive(val: &str, key: &str) -> Result<u64, String> {
    match val.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{key} must be a positive integer")),
    }
}
