use super::error::GatewayError;
use super::interface::GatewaySession;
use crate::domain::ToolSet;
use tracing::{debug, info, warn};

/// Walks every page of the gateway's tool listing, following continuation
/// cursors until a page carries none. An empty result is an error.
pub async fn list_all_tools(session: &dyn GatewaySession) -> Result<ToolSet, GatewayError> {
    let mut tools = ToolSet::default();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = session.list_tools_page(cursor.as_deref()).await?;
        pages += 1;
        debug!(
            page = pages,
            page_tools = page.tools.len(),
            has_more = page.next_cursor.is_some(),
            "Received tool page"
        );
        tools.extend_page(page.tools);

        match page.next_cursor.filter(|next| !next.is_empty()) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(pages, tools = ?tools.names(), "Discovered gateway tools");

    if tools.is_empty() {
        warn!("Gateway advertised no tools");
        return Err(GatewayError::NoToolsAvailable);
    }
    Ok(tools)
}
