//! Agent runtime server entry point.

use clap::Parser;
use slack_gateway_agent::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await
}
