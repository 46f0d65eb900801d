//! HTTP fetch and `generate_from_url` against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wsgen_core::{GenerateError, GeneratorConfig, fetch, generate_from_url};

fn document() -> serde_json::Value {
    json!({
        "asyncapi": "3.0.0",
        "channels": {
            "chat": {
                "title": "chat",
                "address": "/chat/{room}",
                "messages": {
                    "Say": {
                        "payload": {
                            "type": "array",
                            "items": [
                                { "type": "string", "const": "say" },
                                { "type": "object", "properties": { "text": { "type": "string" } }, "required": ["text"] }
                            ]
                        }
                    }
                }
            }
        },
        "operations": {
            "ChatSay": {
                "action": "receive",
                "channel": { "$ref": "#/channels/chat" },
                "messages": [{ "$ref": "#/channels/chat/messages/Say" }]
            }
        }
    })
}

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_json_document() {
    let server = serve("/asyncapi.json", ResponseTemplate::new(200).set_body_json(document())).await;
    let url = fetch::parse_target(&format!("{}/asyncapi.json", server.uri())).unwrap();

    let value = fetch::fetch_document(&url).await.unwrap();
    assert_eq!(value, document());
}

#[tokio::test]
async fn test_fetch_yaml_document() {
    let body = "asyncapi: 3.0.0\nchannels: {}\noperations: {}\n";
    let server = serve(
        "/asyncapi",
        ResponseTemplate::new(200).set_body_raw(body, "application/yaml"),
    )
    .await;
    let url = fetch::parse_target(&format!("{}/asyncapi", server.uri())).unwrap();

    let value = fetch::fetch_document(&url).await.unwrap();
    assert_eq!(value, json!({ "asyncapi": "3.0.0", "channels": {}, "operations": {} }));
}

#[tokio::test]
async fn test_fetch_error_status_is_fatal() {
    let server = serve("/missing", ResponseTemplate::new(404)).await;
    let url = fetch::parse_target(&format!("{}/missing", server.uri())).unwrap();

    let err = fetch::fetch_document(&url).await.unwrap_err();
    assert!(matches!(err, GenerateError::Fetch { ref reason, .. } if reason.contains("404")), "{err}");
}

#[tokio::test]
async fn test_fetch_unparseable_body_is_fatal() {
    let server = serve(
        "/broken",
        ResponseTemplate::new(200).set_body_raw("<html>", "text/html"),
    )
    .await;
    let url = fetch::parse_target(&format!("{}/broken", server.uri())).unwrap();

    let err = fetch::fetch_document(&url).await.unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)), "{err}");
}

#[tokio::test]
async fn test_generate_from_url_uses_target_host() {
    let server = serve("/asyncapi.json", ResponseTemplate::new(200).set_body_json(document())).await;
    let target = format!("{}/asyncapi.json", server.uri());
    let host = server.uri().trim_start_matches("http://").to_string();

    let out = generate_from_url(&target, &GeneratorConfig::default())
        .await
        .unwrap();

    assert!(out.starts_with("export namespace ChatChannel {\n"), "{out}");
    assert!(out.contains("    say: SayCommandData;\n"));
    assert!(out.contains("  chat: `/chat/${string}`;\n"));
    assert!(out.contains(&format!("  \"{host}\": string;\n")));
}
