use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::assistant::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Library seat reservation backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "seatmap", version, about)]
pub struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "SEATMAP_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "SEATMAP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Serve Prometheus metrics on this port. Disabled when unset.
    #[arg(long, env = "SEATMAP_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Artificial delay before every store operation, in milliseconds.
    #[arg(long, env = "SEATMAP_SIMULATED_LATENCY_MS", default_value_t = 300)]
    pub simulated_latency_ms: u64,

    /// API key for the assistant. Without it the assistant answers offline.
    #[arg(long, env = "SEATMAP_ASSISTANT_API_KEY", hide_env_values = true)]
    pub assistant_api_key: Option<String>,

    #[arg(long, env = "SEATMAP_ASSISTANT_MODEL", default_value = DEFAULT_MODEL)]
    pub assistant_model: String,

    #[arg(long, env = "SEATMAP_ASSISTANT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub assistant_base_url: Url,

    #[arg(long, env = "SEATMAP_ASSISTANT_TIMEOUT_SECS", default_value_t = 30)]
    pub assistant_timeout_secs: u64,
}

impl Args {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn assistant(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.assistant_api_key.clone().filter(|k| !k.trim().is_empty()),
            model: self.assistant_model.clone(),
            base_url: self.assistant_base_url.clone(),
            timeout: Duration::from_secs(self.assistant_timeout_secs),
        }
    }
}
