use std::net::SocketAddr;

use clap::Parser;

/// Command-line and environment settings for the HTTP service.
///
/// Upstream settings (`FRED_*`) are read separately by `FredConfig::from_env`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fredboard",
    version,
    about = "Rate-limited, cached HTTP front for FRED economic data"
)]
pub struct ServerArgs {
    /// Socket address to listen on.
    #[arg(long, env = "FREDBOARD_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "FREDBOARD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerArgs {
    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> String {
        format!(
            "fredboard_web={level},fredboard_core={level},tower_http=debug",
            level = self.log_level
        )
    }
}
