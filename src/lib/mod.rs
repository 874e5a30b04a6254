pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::handler::{SlackGatewayAgent, classify_failure};
pub use application::{agent, credentials, handler, tooling};
pub use cli::Cli;
pub use domain::types;
pub use infrastructure::{identity, model, server};

use application::agent::StreamingAgentFactory;
use application::tooling::StreamableHttpConnector;
use config::{IdentitySettings, ModelSettings, ProcessEnv, ensure_env_loaded};
use infrastructure::identity::OAuthCredentialProvider;
use infrastructure::model::OpenAIClient;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let env_file = ensure_env_loaded(&cli.env_file);
    init_tracing();
    info!("Starting slack-gateway-agent");
    env_file.log();
    debug!(
        addr = %cli.addr,
        env_file = %cli.env_file.display(),
        cors_origins = ?cli.cors_origins,
        "CLI arguments parsed"
    );

    let agent = build_agent()?;
    server::serve(agent, cli.addr, &cli.cors_origins).await?;

    info!("Server stopped");
    Ok(())
}

/// Wires the production collaborators. Gateway and token settings are read
/// again on every invocation; model settings are fixed at startup.
pub fn build_agent() -> Result<SlackGatewayAgent, Box<dyn Error>> {
    let env = Arc::new(ProcessEnv);
    let model_settings = ModelSettings::from_source(env.as_ref())?;
    info!(
        endpoint = model_settings.endpoint.as_str(),
        max_cycles = model_settings.max_cycles,
        api_key = model_settings.api_key.is_some(),
        "Model runtime configured"
    );
    let identity = IdentitySettings::from_source(env.as_ref());
    debug!(settings = ?identity, "Identity settings loaded");

    let model = Arc::new(OpenAIClient::from_settings(&model_settings)?);
    Ok(SlackGatewayAgent::new(
        env,
        Arc::new(OAuthCredentialProvider::new(identity)?),
        Arc::new(StreamableHttpConnector::new()?),
        Arc::new(StreamingAgentFactory::new(model, model_settings.max_cycles)),
    ))
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
