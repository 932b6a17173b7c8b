//! Process configuration loaded once at startup.
//!
//! Settings come from environment variables (a `.env` file is honored when
//! present). Missing or malformed credentials are fatal: the server refuses
//! to start rather than serve requests it cannot authenticate.

use std::env;
use std::fmt;
use std::str::FromStr;

use url::Url;

/// Errors raised while reading or validating settings at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("DATABRICKS_HOST must be an http(s) URL: {0}")]
    InvalidHost(String),
    #[error("DATABRICKS_TOKEN must not be empty")]
    EmptyToken,
    #[error("SERVER_PORT must be a port number: {0}")]
    InvalidPort(String),
    #[error("MCP_TRANSPORT must be 'stdio' or 'tcp', got '{0}'")]
    InvalidTransport(String),
    #[error("LOG_LEVEL must be one of trace, debug, info, warn, error, got '{0}'")]
    InvalidLogLevel(String),
}

/// How protocol messages reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// Newline-delimited JSON-RPC over a TCP listener.
    Tcp,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "tcp" => Ok(Transport::Tcp),
            other => Err(ConfigError::InvalidTransport(other.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Tcp => write!(f, "tcp"),
        }
    }
}

/// Validated process settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub databricks_host: String,
    pub databricks_token: String,
    pub transport: Transport,
    pub server_host: String,
    pub server_port: u16,
    pub debug: bool,
    pub log_level: String,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("DATABRICKS_HOST").map_err(|_| ConfigError::Missing("DATABRICKS_HOST"))?;
        let token =
            env::var("DATABRICKS_TOKEN").map_err(|_| ConfigError::Missing("DATABRICKS_TOKEN"))?;

        let transport = env_or("MCP_TRANSPORT", "stdio").parse::<Transport>()?;
        let server_host = env_or("SERVER_HOST", "127.0.0.1");
        let server_port = {
            let raw = env_or("SERVER_PORT", "8000");
            raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?
        };
        let debug = env_or("DEBUG", "false").eq_ignore_ascii_case("true");
        let log_level = env_or("LOG_LEVEL", "info").to_ascii_lowercase();

        let settings = Settings {
            databricks_host: host,
            databricks_token: token,
            transport,
            server_host,
            server_port,
            debug,
            log_level,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.databricks_host)
            .map_err(|e| ConfigError::InvalidHost(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidHost(self.databricks_host.clone()));
        }

        if self.databricks_token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }

    /// Filter directive for the tracing subscriber.
    pub fn env_filter(&self) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
