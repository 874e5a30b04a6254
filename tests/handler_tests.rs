// Handler tests - invocation flow with stub collaborators
//
// Each test drives SlackGatewayAgent::invoke end to end and inspects the
// emitted events together with what the stubs recorded.

mod common;

use common::{Harness, RecordingCredentials, Step, StubConnector, env, page, valid_env};
use futures::StreamExt;
use serde_json::{Value, json};
use slack_gateway_agent::config::EnvSource;
use slack_gateway_agent::domain::{AgentEvent, InvocationContext};
use std::sync::Arc;

async fn collect(harness: &Harness, env: Arc<dyn EnvSource>, payload: Value) -> Vec<Value> {
    harness
        .agent(env)
        .invoke(payload, InvocationContext::default())
        .map(|event| event.to_json())
        .collect()
        .await
}

fn single_page_gateway() -> StubConnector {
    StubConnector::new(vec![page(&["slack___chatPostMessage", "tavily___search"], None)])
}

fn emitted() -> Vec<Step> {
    vec![
        Step::Emit(AgentEvent::data("E1")),
        Step::Emit(AgentEvent::record(
            "current_tool_use",
            json!({"toolUseId": "t1", "name": "tavily___search", "input": {"query": "rust"}}),
        )),
        Step::Emit(AgentEvent::data("E3")),
    ]
}

// ============================================================================
// Configuration and payload validation
// ============================================================================

#[tokio::test]
async fn missing_required_configuration_yields_one_error_and_no_data() {
    for pairs in [
        vec![("COGNITO_SCOPE", "gateway/invoke")],
        vec![("GATEWAY_URL", "https://gateway.example/mcp")],
        vec![("GATEWAY_URL", "  "), ("COGNITO_SCOPE", "gateway/invoke")],
        vec![],
    ] {
        let harness = Harness::new(single_page_gateway(), emitted());
        let events = collect(&harness, env(&pairs), json!({"prompt": "hi"})).await;

        assert_eq!(events.len(), 1, "config {pairs:?}");
        let message = events[0]["error"].as_str().expect("error event");
        assert!(message.starts_with("configuration error: "));
        assert!(message.ends_with("Ensure GATEWAY_URL and COGNITO_SCOPE are set."));
        assert!(events.iter().all(|event| event.get("data").is_none()));
        assert_eq!(harness.credentials.calls(), 0);
    }
}

#[tokio::test]
async fn payload_without_prompt_is_rejected_before_any_external_call() {
    for payload in [
        json!({}),
        json!({"message": "hi"}),
        json!({"Prompt": "hi"}),
        json!(["prompt"]),
        Value::Null,
    ] {
        let harness = Harness::new(single_page_gateway(), emitted());
        let events = collect(&harness, valid_env(), payload.clone()).await;

        assert_eq!(
            events,
            vec![json!({"error": "invalid payload: 'prompt' field required"})],
            "payload {payload}"
        );
        assert_eq!(harness.credentials.calls(), 0);
        assert_eq!(harness.gateway.connects(), 0);
        assert_eq!(harness.runtime.builds(), 0);
    }
}

#[tokio::test]
async fn non_string_prompt_is_rejected() {
    let harness = Harness::new(single_page_gateway(), emitted());
    let events = collect(&harness, valid_env(), json!({"prompt": 42})).await;

    assert_eq!(events.len(), 1);
    assert!(events[0]["error"].as_str().unwrap().contains("'prompt'"));
    assert_eq!(harness.credentials.calls(), 0);
}

// ============================================================================
// Tool discovery
// ============================================================================

#[tokio::test]
async fn paginated_tools_reach_the_runtime_in_order() {
    let gateway = StubConnector::new(vec![page(&["A", "B"], Some("c1")), page(&["C"], None)]);
    let harness = Harness::new(gateway, emitted());

    let events = collect(&harness, valid_env(), json!({"prompt": "post hello"})).await;

    assert_eq!(events.len(), 3);
    assert_eq!(harness.runtime.tool_names(0), vec!["A", "B", "C"]);
    let session = harness.gateway.session(0);
    assert_eq!(
        *session.cursors.lock().unwrap(),
        vec![None, Some("c1".to_string())]
    );
    assert_eq!(session.closes(), 1);
    assert_eq!(
        *harness.runtime.prompts.lock().unwrap(),
        vec!["post hello".to_string()]
    );
    assert_eq!(
        harness.gateway.urls.lock().unwrap()[0],
        "https://gateway.example/mcp"
    );
}

#[tokio::test]
async fn zero_tools_fail_without_building_the_runtime() {
    let gateway = StubConnector::new(vec![page(&[], Some("c1")), page(&[], None)]);
    let harness = Harness::new(gateway, emitted());

    let events = collect(&harness, valid_env(), json!({"prompt": "hi"})).await;

    assert_eq!(events.len(), 1);
    let message = events[0]["error"].as_str().expect("error event");
    assert!(message.contains("no tools available"), "{message}");
    assert_eq!(harness.runtime.builds(), 0);
    assert_eq!(harness.gateway.session(0).closes(), 1);
}

#[tokio::test]
async fn gateway_connection_failure_is_classified() {
    let harness = Harness::new(StubConnector::failing("connection refused"), emitted());

    let events = collect(&harness, valid_env(), json!({"prompt": "hi"})).await;

    assert_eq!(
        events,
        vec![json!({"error": "Agent execution failed: connection refused"})]
    );
    assert_eq!(harness.runtime.builds(), 0);
}

// ============================================================================
// Relay
// ============================================================================

#[tokio::test]
async fn runtime_events_pass_through_unmodified_and_in_order() {
    let harness = Harness::new(single_page_gateway(), emitted());

    let events = collect(&harness, valid_env(), json!({"prompt": "hi"})).await;

    assert_eq!(
        events,
        vec![
            json!({"data": "E1"}),
            json!({"current_tool_use": {"toolUseId": "t1", "name": "tavily___search", "input": {"query": "rust"}}}),
            json!({"data": "E3"}),
        ]
    );
}

#[tokio::test]
async fn runtime_failure_ends_with_one_classified_error() {
    let steps = vec![
        Step::Emit(AgentEvent::data("E1")),
        Step::Fail("model stream reset".into()),
        Step::Emit(AgentEvent::data("never")),
    ];
    let harness = Harness::new(single_page_gateway(), steps);

    let events = collect(&harness, valid_env(), json!({"prompt": "hi"})).await;

    assert_eq!(
        events,
        vec![
            json!({"data": "E1"}),
            json!({"error": "Agent execution failed: model stream reset"}),
        ]
    );
    assert_eq!(harness.gateway.session(0).closes(), 1);
}

#[tokio::test]
async fn runtime_error_events_are_terminal() {
    let steps = vec![
        Step::Emit(AgentEvent::data("E1")),
        Step::Emit(AgentEvent::error("throttled")),
        Step::Emit(AgentEvent::data("never")),
    ];
    let harness = Harness::new(single_page_gateway(), steps);

    let events = collect(&harness, valid_env(), json!({"prompt": "hi"})).await;

    assert_eq!(
        events,
        vec![json!({"data": "E1"}), json!({"error": "throttled"})]
    );
    assert_eq!(harness.gateway.session(0).closes(), 1);
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn credential_failures_are_classified_by_message() {
    let cases = [
        (
            "Read timeout on endpoint URL: \"None\"",
            "Gateway URL configuration error: Read timeout on endpoint URL: \"None\"",
        ),
        (
            "Read timeout on endpoint URL: \"https://identity.example\"",
            "Gateway response timeout: Read timeout on endpoint URL: \"https://identity.example\"",
        ),
        ("invalid_scope", "Agent execution failed: invalid_scope"),
    ];

    for (failure, expected) in cases {
        let harness = Harness::new(single_page_gateway(), emitted())
            .with_credentials(RecordingCredentials::failing(failure));

        let events = collect(&harness, valid_env(), json!({"prompt": "hi"})).await;

        assert_eq!(events, vec![json!({ "error": expected })]);
        assert_eq!(harness.credentials.calls(), 1);
        assert_eq!(harness.gateway.connects(), 0);
    }
}

#[tokio::test]
async fn token_request_uses_configured_identity() {
    let harness = Harness::new(single_page_gateway(), emitted());
    let env = env(&[
        ("GATEWAY_URL", "https://gateway.example/mcp"),
        ("COGNITO_SCOPE", "gateway/invoke"),
        ("WORKLOAD_NAME", "custom-workload"),
    ]);

    collect(&harness, env, json!({"prompt": "hi"})).await;

    let requests = harness.credentials.requests.lock().unwrap();
    assert_eq!(requests[0].provider_name, "agentcore-identity-for-gateway");
    assert_eq!(requests[0].scopes, vec!["gateway/invoke".to_string()]);
    assert_eq!(requests[0].workload_name, "custom-workload");
    assert_eq!(requests[0].user_id, "m2m-user-001");
    assert!(!requests[0].force_authentication);
}

#[tokio::test]
async fn runtime_user_id_overrides_configured_user() {
    let harness = Harness::new(single_page_gateway(), emitted());
    let context = InvocationContext {
        runtime_user_id: Some("U123".into()),
        session_id: Some("session-1".into()),
    };

    let _: Vec<AgentEvent> = harness
        .agent(valid_env())
        .invoke(json!({"prompt": "hi"}), context)
        .collect()
        .await;

    assert_eq!(harness.credentials.requests.lock().unwrap()[0].user_id, "U123");
}

// ============================================================================
// Isolation between invocations
// ============================================================================

#[tokio::test]
async fn every_invocation_reacquires_token_and_tools() {
    let gateway = StubConnector::new(vec![page(&["A", "B"], Some("c1")), page(&["C"], None)]);
    let harness = Harness::new(gateway, emitted());

    let first = collect(&harness, valid_env(), json!({"prompt": "one"})).await;
    let second = collect(&harness, valid_env(), json!({"prompt": "two"})).await;

    assert_eq!(first, second);
    assert_eq!(harness.credentials.calls(), 2);
    assert_eq!(harness.gateway.connects(), 2);
    assert_eq!(harness.runtime.builds(), 2);
    for index in 0..2 {
        assert_eq!(harness.gateway.session(index).cursors.lock().unwrap().len(), 2);
        assert_eq!(harness.runtime.tool_names(index), vec!["A", "B", "C"]);
    }
}
