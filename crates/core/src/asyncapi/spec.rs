//! AsyncAPI document views for serde deserialization.
//!
//! The document itself stays a `serde_json::Value` so that `$ref` pointers can
//! be resolved against it. The structs here are deserialized on demand from
//! the nodes a pointer lands on, and only cover what type generation needs.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A `{ "$ref": "..." }` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    /// The JSON pointer fragment.
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

/// Either a reference object or an inline definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeRef<T> {
    /// `{ "$ref": "#/..." }`
    Ref(Reference),
    /// Inline definition.
    Inline(T),
}

impl<T> MaybeRef<T> {
    /// The reference string, if this entry is a reference.
    pub fn as_ref_path(&self) -> Option<&str> {
        match self {
            MaybeRef::Ref(r) => Some(&r.ref_path),
            MaybeRef::Inline(_) => None,
        }
    }
}

/// Operation direction as seen from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `action: receive` - the caller sends, the service receives.
    Command,
    /// Any other action - the service sends to the caller.
    Event,
}

impl Direction {
    /// Classify an operation `action` value.
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            Some("receive") => Direction::Command,
            _ => Direction::Event,
        }
    }

    /// Suffix appended to the discriminator to build the type name.
    pub fn type_suffix(self) -> &'static str {
        match self {
            Direction::Command => "CommandData",
            Direction::Event => "EventData",
        }
    }
}

/// An operation entry under `operations`.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// `send` or `receive`.
    pub action: Option<String>,
    /// The channel this operation targets.
    pub channel: Option<MaybeRef<Value>>,
    /// Ordered message entries.
    pub messages: Option<Vec<MaybeRef<Value>>>,
}

impl Operation {
    /// Direction derived from `action`.
    pub fn direction(&self) -> Direction {
        Direction::from_action(self.action.as_deref())
    }
}

/// A channel object.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    /// Display name, used for namespace and map keys.
    pub title: Option<String>,
    /// Address template, e.g. `/rooms/{roomId}`.
    pub address: Option<String>,
    /// Protocol bindings.
    pub bindings: Option<ChannelBindings>,
}

impl Channel {
    /// The address template, if present and non-empty.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }

    /// The WebSocket binding, if declared.
    pub fn ws_binding(&self) -> Option<&WsChannelBinding> {
        self.bindings.as_ref().and_then(|b| b.ws.as_ref())
    }
}

/// Channel bindings keyed by protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelBindings {
    /// WebSocket binding.
    pub ws: Option<WsChannelBinding>,
}

/// WebSocket channel binding: handshake query and header schemas.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsChannelBinding {
    /// Query parameter schema, inline or by reference.
    pub query: Option<Value>,
    /// Header schema, inline or by reference.
    pub headers: Option<Value>,
    /// Binding version string.
    pub binding_version: Option<String>,
}

impl WsChannelBinding {
    /// The query schema node, if it is an object.
    pub fn query(&self) -> Option<&Value> {
        self.query.as_ref().filter(|v| v.is_object())
    }

    /// The headers schema node, if it is an object.
    pub fn headers(&self) -> Option<&Value> {
        self.headers.as_ref().filter(|v| v.is_object())
    }
}

/// A server entry under `servers`.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// Host (AsyncAPI 3.x).
    pub host: Option<String>,
    /// Full URL (AsyncAPI 2.x).
    pub url: Option<String>,
    /// Protocol, e.g. `ws` or `wss`.
    pub protocol: Option<String>,
}

impl Server {
    /// The host this server is reachable at.
    pub fn host(&self) -> Option<String> {
        if let Some(host) = self.host.as_deref().filter(|h| !h.is_empty()) {
            return Some(host.to_string());
        }
        let parsed = url::Url::parse(self.url.as_deref()?).ok()?;
        host_with_port(&parsed)
    }
}

/// `host[:port]` of a URL, the way a browser's `URL.host` reports it.
pub fn host_with_port(url: &url::Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Top-level accessors over a document value.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    root: &'a Value,
}

impl<'a> Document<'a> {
    /// Wrap a parsed document.
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// The raw root value, for pointer resolution.
    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// The `operations` collection.
    pub fn operations(&self) -> Option<&'a Map<String, Value>> {
        self.root.get("operations").and_then(Value::as_object)
    }

    /// The `channels` collection.
    pub fn channels(&self) -> Option<&'a Map<String, Value>> {
        self.root.get("channels").and_then(Value::as_object)
    }

    /// The `servers` collection.
    pub fn servers(&self) -> Option<&'a Map<String, Value>> {
        self.root.get("servers").and_then(Value::as_object)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_from_action() {
        assert_eq!(Direction::from_action(Some("receive")), Direction::Command);
        assert_eq!(Direction::from_action(Some("send")), Direction::Event);
        assert_eq!(Direction::from_action(Some("publish")), Direction::Event);
        assert_eq!(Direction::from_action(None), Direction::Event);
    }

    #[test]
    fn test_operation_channel_reference() {
        let op: Operation = serde_json::from_value(json!({
            "action": "receive",
            "channel": { "$ref": "#/channels/test" },
            "messages": [
                { "$ref": "#/channels/test/messages/A" },
                { "payload": { "type": "string" } }
            ]
        }))
        .unwrap();

        assert_eq!(op.direction(), Direction::Command);
        assert_eq!(
            op.channel.as_ref().and_then(|c| c.as_ref_path()),
            Some("#/channels/test")
        );
        let messages = op.messages.unwrap();
        assert_eq!(messages[0].as_ref_path(), Some("#/channels/test/messages/A"));
        assert!(messages[1].as_ref_path().is_none());
    }

    #[test]
    fn test_channel_binding_accessors() {
        let channel: Channel = serde_json::from_value(json!({
            "title": "chat",
            "address": "",
            "bindings": { "ws": { "query": { "type": "object" }, "headers": true } }
        }))
        .unwrap();

        assert!(channel.address().is_none());
        let ws = channel.ws_binding().unwrap();
        assert!(ws.query().is_some());
        assert!(ws.headers().is_none());
    }

    #[test]
    fn test_server_host_fallback_to_url() {
        let v3: Server =
            serde_json::from_value(json!({ "host": "api.example.com", "protocol": "wss" }))
                .unwrap();
        assert_eq!(v3.host().as_deref(), Some("api.example.com"));

        let v2: Server =
            serde_json::from_value(json!({ "url": "ws://localhost:8080/ws", "protocol": "ws" }))
                .unwrap();
        assert_eq!(v2.host().as_deref(), Some("localhost:8080"));

        let neither: Server = serde_json::from_value(json!({ "protocol": "ws" })).unwrap();
        assert!(neither.host().is_none());
    }
}
