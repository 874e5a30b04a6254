use crate::application::handler::SlackGatewayAgent;
use chrono::Utc;

pub(crate) struct ServerState {
    agent: SlackGatewayAgent,
    started_at: i64,
}

impl ServerState {
    pub(crate) fn new(agent: SlackGatewayAgent) -> Self {
        Self {
            agent,
            started_at: Utc::now().timestamp(),
        }
    }

    pub(crate) fn agent(&self) -> &SlackGatewayAgent {
        &self.agent
    }

    /// Unix seconds of the last health status change.
    pub(crate) fn started_at(&self) -> i64 {
        self.started_at
    }
}
