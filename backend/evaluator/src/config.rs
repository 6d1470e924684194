//! Application configuration loaded from environment variables.

use project_script::ledger::ScriptHash;
use project_script::ScriptParams;

use crate::errors::{EvaluatorError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Parameters the validator is evaluated with.
    pub params: ScriptParams,
    /// Port for the REST API server
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            params: ScriptParams {
                project_at_mph: script_hash("PROJECT_AT_MPH")?,
                protocol_nft_mph: script_hash("PROTOCOL_NFT_MPH")?,
            },
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3002".to_string())
                .parse()
                .map_err(|_| EvaluatorError::Config("Invalid API_PORT".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| EvaluatorError::Config(format!("Missing env var: {key}")))
}

fn script_hash(key: &'static str) -> Result<ScriptHash> {
    let raw = env_var(key).map_err(|_| {
        EvaluatorError::Config(format!("{key} environment variable is required"))
    })?;
    parse_script_hash(key, &raw)
}

/// Hex-encoded policy or validator hash, surrounding whitespace ignored.
pub fn parse_script_hash(key: &'static str, raw: &str) -> Result<ScriptHash> {
    hex::decode(raw.trim())
        .map(ScriptHash::new)
        .map_err(|e| EvaluatorError::Config(format!("Invalid {key}: {e}")))
}
