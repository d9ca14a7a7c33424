use std::sync::Arc;
use std::time::Duration;

use clickup::ClickUpClient;
use httpmock::prelude::*;
use jules::JulesClient;
use processor::{ProcessingError, TaskProcessor};
use serde_json::json;
use translation::{ServiceCredentials, TaskId};

fn processor_for(server: &MockServer) -> TaskProcessor {
    let credentials =
        ServiceCredentials::new("test_clickup_key", "test_jules_key").expect("credentials");
    let timeout = Duration::from_secs(5);
    let source = ClickUpClient::new(&server.url("/api/v2"), &credentials, timeout)
        .expect("clickup client");
    let target =
        JulesClient::new(&server.url("/v1alpha"), &credentials, timeout).expect("jules client");
    TaskProcessor::new(Arc::new(source), Arc::new(target))
}

#[tokio::test]
async fn integration_task_is_fetched_translated_and_submitted() {
    let server = MockServer::start();
    let get_task = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/task/test_task_123")
            .header("authorization", "test_clickup_key");
        then.status(200).json_body(json!({
            "id": "test_task_123",
            "name": "Implement Login",
            "description": "Create a login page using Flask.",
            "custom_fields": [
                {
                    "name": "Repository",
                    "value": "https://github.com/myuser/myrepo"
                }
            ]
        }));
    });
    let create_session = server.mock(|when, then| {
        when.method(POST)
            .path("/v1alpha/sessions")
            .header("x-goog-api-key", "test_jules_key")
            .json_body(json!({
                "title": "Implement Login",
                "prompt": "Create a login page using Flask.",
                "sourceContext": {
                    "source": "sources/github/myuser/myrepo",
                    "githubRepoContext": {
                        "startingBranch": "main"
                    }
                }
            }));
        then.status(200).json_body(json!({ "name": "sessions/123" }));
    });

    let ack = processor_for(&server)
        .process_task(&TaskId::new("test_task_123").expect("task id"))
        .await
        .expect("process task");

    assert_eq!(ack.session_name(), Some("sessions/123"));
    get_task.assert_calls(1);
    create_session.assert_calls(1);
}

#[tokio::test]
async fn integration_fetch_failure_abandons_task_without_submitting() {
    let server = MockServer::start();
    let get_task = server.mock(|when, then| {
        when.method(GET).path("/api/v2/task/gone");
        then.status(500).body("upstream exploded");
    });
    let create_session = server.mock(|when, then| {
        when.method(POST).path("/v1alpha/sessions");
        then.status(200).json_body(json!({}));
    });

    let error = processor_for(&server)
        .process_task(&TaskId::new("gone").expect("task id"))
        .await
        .expect_err("fetch failure must abandon the task");

    assert!(matches!(error, ProcessingError::FetchTask(_)));
    assert_eq!(error.transport().status(), Some(500));
    get_task.assert_calls(1);
    create_session.assert_calls(0);
}

#[tokio::test]
async fn integration_spawned_task_without_repository_submits_plain_request() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/task/plain");
        then.status(200).json_body(json!({
            "id": "plain",
            "name": "Triage inbox",
            "custom_fields": []
        }));
    });
    let create_session = server.mock(|when, then| {
        when.method(POST)
            .path("/v1alpha/sessions")
            .json_body(json!({ "title": "Triage inbox", "prompt": "" }));
        then.status(200).json_body(json!({ "name": "sessions/7" }));
    });

    processor_for(&server)
        .spawn(TaskId::new("plain").expect("task id"))
        .await
        .expect("background task joins");

    create_session.assert_calls(1);
}
