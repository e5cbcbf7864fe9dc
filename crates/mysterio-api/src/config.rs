//! Server configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use mysterio_scenario::ScenarioSchema;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Time box for one scenario generation (`GENERATION_TIMEOUT_SECS`).
    pub generation_timeout: Duration,
    /// Scenario-schema definition to load instead of the built-in one
    /// (`SCENARIO_SCHEMA_PATH`).
    pub scenario_schema_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let timeout_secs: u64 = match lookup("GENERATION_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("GENERATION_TIMEOUT_SECS must be a whole number: {e}"))
            })?,
            None => DEFAULT_GENERATION_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "GENERATION_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }
        let scenario_schema_path = lookup("SCENARIO_SCHEMA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            generation_timeout: Duration::from_secs(timeout_secs),
            scenario_schema_path,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Loads the scenario schema from `scenario_schema_path`, or the standard
    /// definition when none is configured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Schema` if the file cannot be read or is invalid.
    pub fn load_schema(&self) -> Result<ScenarioSchema, AppError> {
        match &self.scenario_schema_path {
            Some(path) => Ok(ScenarioSchema::from_path(path)?),
            None => Ok(ScenarioSchema::standard()),
        }
    }
}
