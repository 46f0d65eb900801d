//! Document retrieval over HTTP.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::asyncapi::spec::host_with_port;
use crate::error::{GenerateError, Result};

/// Parse and validate the operator-supplied target URL.
pub fn parse_target(target: &str) -> Result<Url> {
    Url::parse(target).map_err(|source| GenerateError::InvalidTarget {
        target: target.to_string(),
        source,
    })
}

/// `host[:port]` of the target, used when the document declares no servers.
pub fn fallback_host(target: &Url) -> Result<String> {
    host_with_port(target).ok_or_else(|| GenerateError::InvalidTarget {
        target: target.to_string(),
        source: url::ParseError::EmptyHost,
    })
}

fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder().build().map_err(|err| {
        warn!(error = %err, "Failed to build HTTP client.");
        GenerateError::Fetch {
            url: String::new(),
            reason: format!("Failed to build HTTP client: {err}"),
        }
    })
}

/// GET the document at `target` and parse it.
///
/// The body is read as JSON. When that fails and the response is marked as
/// YAML, by content type or by a `.yaml`/`.yml` path, it is read as YAML.
pub async fn fetch_document(target: &Url) -> Result<Value> {
    let client = build_client()?;
    let fetch_error = |reason: String| GenerateError::Fetch {
        url: target.to_string(),
        reason,
    };

    debug!(url = %target, "Fetching AsyncAPI document.");
    let response = client
        .get(target.clone())
        .send()
        .await
        .map_err(|err| fetch_error(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP status {status}")));
    }

    let yaml_content = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("yaml"));
    let body = response
        .text()
        .await
        .map_err(|err| fetch_error(format!("Failed to read response body: {err}")))?;
    debug!(url = %target, %status, bytes = body.len(), "Received AsyncAPI document.");

    parse_document(&body, yaml_content || has_yaml_extension(target))
}

fn has_yaml_extension(url: &Url) -> bool {
    let path = url.path();
    path.ends_with(".yaml") || path.ends_with(".yml")
}

/// Parse a document body as JSON, falling back to YAML when `yaml_hint` is set.
pub fn parse_document(body: &str, yaml_hint: bool) -> Result<Value> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(json_err) if yaml_hint => serde_yaml::from_str(body)
            .map_err(|yaml_err| GenerateError::Parse(format!("{json_err}; as YAML: {yaml_err}"))),
        Err(json_err) => Err(GenerateError::Parse(json_err.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_host_keeps_port() {
        let url = parse_target("http://localhost:3000/asyncapi.json").unwrap();
        assert_eq!(fallback_host(&url).unwrap(), "localhost:3000");

        let url = parse_target("https://api.example.com/docs/ws").unwrap();
        assert_eq!(fallback_host(&url).unwrap(), "api.example.com");
    }

    #[test]
    fn test_invalid_target() {
        let err = parse_target("not a url").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidTarget { .. }));

        let url = parse_target("data:text/plain,hello").unwrap();
        assert!(matches!(
            fallback_host(&url).unwrap_err(),
            GenerateError::InvalidTarget { .. }
        ));
    }

    #[test]
    fn test_parse_document_json_and_yaml() {
        assert_eq!(
            parse_document(r#"{"asyncapi":"3.0.0"}"#, false).unwrap(),
            json!({ "asyncapi": "3.0.0" })
        );
        assert_eq!(
            parse_document("asyncapi: 3.0.0\nchannels: {}\n", true).unwrap(),
            json!({ "asyncapi": "3.0.0", "channels": {} })
        );
        assert!(matches!(
            parse_document("asyncapi: 3.0.0\n", false).unwrap_err(),
            GenerateError::Parse(_)
        ));
    }

    #[test]
    fn test_yaml_extension() {
        assert!(has_yaml_extension(&parse_target("http://h/spec.yaml").unwrap()));
        assert!(has_yaml_extension(&parse_target("http://h/spec.yml").unwrap()));
        assert!(!has_yaml_extension(&parse_target("http://h/spec.json").unwrap()));
    }
}
