use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::defaults::DEFAULT_ENV_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "slack-gateway-agent",
    version,
    about = "Streaming agent endpoint for the Slack tool gateway"
)]
pub struct Cli {
    /// Address the runtime server listens on.
    #[arg(long, env = "AGENT_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
    /// Environment file loaded before reading configuration.
    #[arg(long, default_value = DEFAULT_ENV_PATH)]
    pub env_file: PathBuf,
    /// Origin allowed to call the server cross-site; repeatable.
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}
