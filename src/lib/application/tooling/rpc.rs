//! JSON-RPC 2.0 framing for the streamable HTTP transport.
//!
//! A POST may be answered either with a plain JSON body or with a
//! `text/event-stream` body whose `data:` frames carry JSON-RPC messages.

use super::error::GatewayError;
use serde_json::{Value, json};

pub(crate) fn request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

pub(crate) fn notification(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    })
}

/// Splits an SSE body into the JSON payloads of its events.
/// Frames whose data is not JSON (keep-alives, comments) are skipped.
pub(crate) fn sse_messages(body: &str) -> Vec<Value> {
    fn flush(data: &mut String, messages: &mut Vec<Value>) {
        if !data.is_empty() {
            if let Ok(value) = serde_json::from_str::<Value>(data) {
                messages.push(value);
            }
            data.clear();
        }
    }

    let mut messages = Vec::new();
    let mut data = String::new();

    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            flush(&mut data, &mut messages);
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    flush(&mut data, &mut messages);
    messages
}

fn matches_id(message: &Value, id: u64) -> bool {
    match message.get("id") {
        Some(Value::Number(number)) => number.as_u64() == Some(id),
        Some(Value::String(text)) => text.parse::<u64>().ok() == Some(id),
        _ => false,
    }
}

/// Picks the response to request `id` out of a decoded body.
pub(crate) fn find_response(
    messages: Vec<Value>,
    id: u64,
    method: &str,
) -> Result<Value, GatewayError> {
    messages
        .into_iter()
        .find(|message| matches_id(message, id))
        .ok_or_else(|| GatewayError::MissingResult {
            method: method.to_string(),
        })
}

/// Unwraps a JSON-RPC response into its `result`.
pub(crate) fn into_result(message: Value, method: &str) -> Result<Value, GatewayError> {
    if let Some(error) = message.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32000);
        let text = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(GatewayError::Rpc {
            code,
            message: text,
        });
    }
    message
        .get("result")
        .cloned()
        .ok_or_else(|| GatewayError::MissingResult {
            method: method.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_response_from_event_stream() {
        let body = "event: message\n\
                    data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\",\"params\":{}}\n\
                    \n\
                    : keep-alive\n\
                    \n\
                    event: message\n\
                    data: {\"jsonrpc\":\"2.0\",\"id\":7,\"result\":{\"tools\":[]}}\n\n";
        let messages = sse_messages(body);
        assert_eq!(messages.len(), 2);

        let response = find_response(messages, 7, "tools/list").expect("response found");
        let result = into_result(response, "tools/list").expect("result");
        assert_eq!(result, json!({"tools": []}));
    }

    #[test]
    fn joins_multi_line_data() {
        let body = "data: {\"jsonrpc\":\"2.0\",\r\ndata: \"id\":\"3\",\"result\":1}\r\n\r\n";
        let messages = sse_messages(body);
        let response = find_response(messages, 3, "ping").expect("response found");
        assert_eq!(into_result(response, "ping").expect("result"), json!(1));
    }

    #[test]
    fn rpc_error_is_surfaced() {
        let message = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "bad cursor"}});
        let err = into_result(message, "tools/list").expect_err("rpc error");
        assert!(matches!(err, GatewayError::Rpc { code: -32602, .. }));
        assert_eq!(err.to_string(), "gateway returned JSON-RPC error -32602: bad cursor");
    }

    #[test]
    fn missing_response_is_reported() {
        let err = find_response(vec![json!({"id": 2, "result": {}})], 1, "initialize")
            .expect_err("no match");
        assert!(matches!(err, GatewayError::MissingResult { .. }));
    }
}
