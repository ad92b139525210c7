//! Application configuration
//!
//! Built once at startup and handed to everything that needs it

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use url::Url;

use crate::utils::env_var;
use crate::utils::parse_flag;
use crate::utils::parse_value;

const DEFAULT_APP_NAME: &str = "The Journal";
const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_DATABASE_URL: &str = "sqlite://journal.db";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL_NAME: &str = "qwen3:0.6b";
const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OLLAMA_BINARY: &str = "ollama";

/// Configuration of the whole application
#[derive(Clone, Debug)]
pub struct Config {
    /// Name used in the status message
    pub app_name: String,

    /// Address to listen on
    pub address: SocketAddr,

    /// `SQLite` database URL
    pub database_url: String,

    /// Local LLM settings
    pub ollama: OllamaConfig,
}

/// Configuration of the local Ollama server
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Base URL of the Ollama HTTP API
    pub base_url: Url,

    /// Chat model used for summaries
    pub model: String,

    /// Timeout of a single completion request
    pub timeout: Duration,

    /// Start (and stop) `ollama serve` together with the app
    pub manage_process: bool,

    /// The `ollama` executable, looked up in `PATH` unless it is a path
    pub binary: PathBuf,
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` when a variable is set to an invalid value
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Read the configuration using a lookup function
    ///
    /// The lookup returns `None` for unset (or empty) variables
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&'static str) -> Option<String>,
    {
        let mut address = parse_value::<SocketAddr>(
            "ADDRESS",
            &lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        )?;

        // optional override of just the port
        if let Some(port) = lookup("PORT") {
            address.set_port(parse_value::<u16>("PORT", &port)?);
        }

        let ollama = OllamaConfig {
            base_url: parse_value::<Url>(
                "OLLAMA_BASE_URL",
                &lookup("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            )?,
            model: lookup("OLLAMA_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL_NAME.to_string()),
            timeout: Duration::from_secs(
                lookup("OLLAMA_TIMEOUT_SECS")
                    .map(|value| parse_value::<u64>("OLLAMA_TIMEOUT_SECS", &value))
                    .transpose()?
                    .unwrap_or(DEFAULT_OLLAMA_TIMEOUT_SECS),
            ),
            manage_process: lookup("OLLAMA_MANAGE_PROCESS")
                .map(|value| parse_flag("OLLAMA_MANAGE_PROCESS", &value))
                .transpose()?
                .unwrap_or(false),
            binary: lookup("OLLAMA_BINARY")
                .map_or_else(|| PathBuf::from(DEFAULT_OLLAMA_BINARY), PathBuf::from),
        };

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            address,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            ollama,
        })
    }
}
