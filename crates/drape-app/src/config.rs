use std::env;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub generator_url: String,
    pub remover_url: String,
    pub output_dir: PathBuf,
    pub backend_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the environment, with a `.env` file merged
    /// in when one exists. Every knob has a default.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let port = env_or("DRAPE_PORT", "8001")
            .parse()
            .context("DRAPE_PORT must be a number")?;
        let generator_url = env_or("DRAPE_GENERATOR_URL", "http://127.0.0.1:5000/generate");
        let remover_url = env_or("DRAPE_REMOVER_URL", "http://127.0.0.1:5001/remove");
        let output_dir = PathBuf::from(env_or("DRAPE_OUTPUT_DIR", "outputs/bg_removed"));
        let backend_timeout_secs = env_or("DRAPE_BACKEND_TIMEOUT_SECS", "300")
            .parse()
            .context("DRAPE_BACKEND_TIMEOUT_SECS must be a number")?;

        Ok(Self {
            port,
            generator_url,
            remover_url,
            output_dir,
            backend_timeout_secs,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
