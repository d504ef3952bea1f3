use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use tracing::{error, info};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub api_key: String,
    pub model: String,
}

impl ServerConfig {
    /// Reads settings from the process environment. Call `dotenv::dotenv()`
    /// first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("ORBIT_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("ORBIT_ADDR must be a socket address such as 127.0.0.1:3000")?;

        let api_key = match lookup("OPENAI_API_KEY") {
            Some(key) if key.starts_with("sk-") => {
                info!("OpenAI API key loaded successfully");
                key
            }
            Some(_) => {
                error!("OPENAI_API_KEY found but doesn't start with 'sk-'. Please check your .env file");
                bail!("Invalid OpenAI API key format");
            }
            None => {
                error!("OPENAI_API_KEY not found. Please set it in your .env file");
                bail!("OPENAI_API_KEY must be set");
            }
        };

        let model = lookup("OPENAI_MODEL").context("OPENAI_MODEL must be set")?;

        Ok(Self {
            addr,
            api_key,
            model,
        })
    }
}
