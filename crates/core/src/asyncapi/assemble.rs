//! Whole-document assembly: channel namespaces plus the address, server and
//! client augmentation declarations.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::channel::{
    COMMAND_MAP, ChannelOutput, EVENT_MAP, Extraction, HEADERS_TYPE, QUERY_TYPE, extract_channel,
};
use super::group::group_by_channel;
use super::pointer::follow;
use super::spec::{Channel, Document, Server};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::schema::ShapeCompiler;
use crate::schema::types::{
    TemplatePart, TsDecl, TsModule, TsPrimitive, TsProp, TsType, TsTypeDef,
};

const ADDRESSES_TYPE: &str = "WebsocketAddresses";
const SERVERS_TYPE: &str = "WebsocketServers";
const MAP_TYPE: &str = "WebsocketAsyncAPIMap";

/// A channel that declares an address template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedChannel {
    /// Channel title, the key in every aggregate map.
    pub title: String,
    /// Raw address template, e.g. `/rooms/{roomId}`.
    pub address: String,
}

/// Build the full declaration module for a document.
///
/// `fallback_host` is used as the only server when the document declares no
/// server with a protocol.
pub fn assemble(
    doc: Document<'_>,
    fallback_host: &str,
    compiler: &dyn ShapeCompiler,
    config: &GeneratorConfig,
) -> Result<TsModule> {
    let groups = group_by_channel(doc)?;
    debug!(channels = groups.len(), "Grouped operations by channel");

    let mut outputs = Vec::with_capacity(groups.len());
    for group in &groups {
        match extract_channel(&group.channel_ref, &group.operations, doc.root(), compiler)? {
            Extraction::Generated(output) => outputs.push(output),
            Extraction::Skipped(_) => {}
        }
    }

    let mut module = TsModule::default();
    module
        .decls
        .extend(outputs.iter().map(ChannelOutput::to_namespace));

    let addressed = addressed_channels(doc);
    module.decls.push(addresses_declaration(&addressed));

    let hosts = server_hosts(doc, fallback_host);
    module.decls.push(servers_declaration(&hosts));

    module.decls.push(augmentation(&addressed, &outputs, config));

    info!(
        namespaces = outputs.len(),
        addresses = addressed.len(),
        servers = hosts.len(),
        "Assembled declarations"
    );
    Ok(module)
}

/// Channels with a non-empty address and a title, in document order.
pub fn addressed_channels(doc: Document<'_>) -> Vec<AddressedChannel> {
    let Some(channels) = doc.channels() else {
        return Vec::new();
    };

    channels
        .iter()
        .filter_map(|(key, node)| {
            let channel = follow(node, doc.root()).and_then(|n| Channel::deserialize(n).ok())?;
            let address = channel.address()?.to_string();
            match channel.title.filter(|t| !t.is_empty()) {
                Some(title) => Some(AddressedChannel { title, address }),
                None => {
                    warn!(channel = %key, %address, "Channel has an address but no title, leaving it out");
                    None
                }
            }
        })
        .collect()
}

/// Hosts of every server carrying a protocol, or `fallback_host` if none do.
pub fn server_hosts(doc: Document<'_>, fallback_host: &str) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for (key, node) in doc.servers().into_iter().flatten() {
        let Some(server) = follow(node, doc.root()).and_then(|n| Server::deserialize(n).ok())
        else {
            debug!(server = %key, "Skipping unreadable server entry");
            continue;
        };
        if server.protocol.is_none() {
            continue;
        }
        match server.host() {
            Some(host) if !hosts.contains(&host) => hosts.push(host),
            Some(_) => {}
            None => debug!(server = %key, "Server has no host"),
        }
    }

    if hosts.is_empty() {
        hosts.push(fallback_host.to_string());
    }
    hosts
}

/// Turn `/rooms/{roomId}` into the parts of `` `/rooms/${string}` ``.
///
/// Empty `{}` and an unclosed `{` are kept as literal text.
pub fn address_to_type(address: &str) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = address;

    while let Some(open) = rest.find('{') {
        match rest[open + 1..].find('}') {
            Some(0) => {
                literal.push_str(&rest[..open + 2]);
                rest = &rest[open + 2..];
            }
            Some(len) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    parts.push(TemplatePart::Static(std::mem::take(&mut literal)));
                }
                parts.push(TemplatePart::Hole(TsType::Primitive(TsPrimitive::String)));
                rest = &rest[open + len + 2..];
            }
            None => break,
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(TemplatePart::Static(literal));
    }
    parts
}

fn addresses_declaration(channels: &[AddressedChannel]) -> TsDecl {
    let props = channels
        .iter()
        .map(|channel| TsProp {
            name: channel.title.clone(),
            ty: TsType::Template(address_to_type(&channel.address)),
            optional: false,
            doc: Some(channel.address.clone()),
        })
        .collect();
    TsDecl::TypeDef(TsTypeDef::interface(ADDRESSES_TYPE, props))
}

fn servers_declaration(hosts: &[String]) -> TsDecl {
    let props = hosts
        .iter()
        .map(|host| TsProp::required(host.clone(), TsType::Primitive(TsPrimitive::String)))
        .collect();
    TsDecl::TypeDef(TsTypeDef::interface(SERVERS_TYPE, props))
}

fn augmentation(
    channels: &[AddressedChannel],
    outputs: &[ChannelOutput],
    config: &GeneratorConfig,
) -> TsDecl {
    let by_title: HashMap<&str, &ChannelOutput> = outputs
        .iter()
        .rev()
        .map(|output| (output.title.as_str(), output))
        .collect();

    let data = channels
        .iter()
        .map(|channel| {
            let entry = match by_title.get(channel.title.as_str()) {
                Some(output) => channel_entry(output),
                None => {
                    debug!(channel = %channel.title, "No generated namespace, using empty maps");
                    TsType::Object(vec![
                        TsProp::required("commandMap", TsType::Object(Vec::new())),
                        TsProp::required("eventMap", TsType::Object(Vec::new())),
                    ])
                }
            };
            TsProp::required(channel.title.clone(), entry)
        })
        .collect();

    let map = TsTypeDef::interface(
        MAP_TYPE,
        vec![
            TsProp::required("addresses", TsType::Ref(ADDRESSES_TYPE.to_string())),
            TsProp::required("data", TsType::Object(data)),
        ],
    );

    TsDecl::DeclareModule {
        module: config.client_module.clone(),
        body: vec![TsDecl::TypeDef(map)],
    }
}

fn channel_entry(output: &ChannelOutput) -> TsType {
    let member = |name: &str| TsType::Ref(format!("{}.{name}", output.namespace));

    let mut props = Vec::with_capacity(4);
    if output.has_query {
        props.push(TsProp::required("query", member(QUERY_TYPE)));
    }
    if output.has_headers {
        props.push(TsProp::required("headers", member(HEADERS_TYPE)));
    }
    props.push(TsProp::required("commandMap", member(COMMAND_MAP)));
    props.push(TsProp::required("eventMap", member(EVENT_MAP)));
    TsType::Object(props)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::schema::Emit;
    use serde_json::json;

    #[test]
    fn test_address_to_type() {
        let ty = TsType::Template(address_to_type("/test/{id}"));
        assert_eq!(ty.emit(), "`/test/${string}`");

        let ty = TsType::Template(address_to_type("/rooms/{room}/users/{user}"));
        assert_eq!(ty.emit(), "`/rooms/${string}/users/${string}`");

        let ty = TsType::Template(address_to_type("{tenant}"));
        assert_eq!(ty.emit(), "`${string}`");

        let ty = TsType::Template(address_to_type("/plain"));
        assert_eq!(ty.emit(), "`/plain`");
    }

    #[test]
    fn test_address_to_type_keeps_unmatched_braces() {
        let ty = TsType::Template(address_to_type("/a/{}/b/{id}/{open"));
        assert_eq!(ty.emit(), "`/a/{}/b/${string}/{open`");
    }

    #[test]
    fn test_server_hosts_with_protocol() {
        let root = json!({
            "servers": {
                "prod": { "host": "api.example.com", "protocol": "wss" },
                "docs": { "host": "docs.example.com" },
                "legacy": { "url": "ws://legacy.example.com:9000/ws", "protocol": "ws" },
                "dup": { "host": "api.example.com", "protocol": "ws" }
            }
        });
        assert_eq!(
            server_hosts(Document::new(&root), "localhost:3000"),
            ["api.example.com", "legacy.example.com:9000"]
        );
    }

    #[test]
    fn test_server_hosts_fallback() {
        let root = json!({ "servers": { "docs": { "host": "docs.example.com" } } });
        assert_eq!(
            server_hosts(Document::new(&root), "localhost:3000"),
            ["localhost:3000"]
        );

        let root = json!({});
        assert_eq!(server_hosts(Document::new(&root), "example.com"), ["example.com"]);
    }

    #[test]
    fn test_addressed_channels_skip_untitled_and_empty() {
        let root = json!({
            "channels": {
                "a": { "title": "a", "address": "/a" },
                "b": { "title": "b", "address": "" },
                "c": { "title": "c" },
                "d": { "address": "/d" }
            }
        });
        let channels = addressed_channels(Document::new(&root));
        assert_eq!(
            channels,
            [AddressedChannel {
                title: "a".into(),
                address: "/a".into()
            }]
        );
    }

    #[test]
    fn test_augmentation_uses_generated_bindings_only() {
        let channels = [
            AddressedChannel {
                title: "chat".into(),
                address: "/chat".into(),
            },
            AddressedChannel {
                title: "idle".into(),
                address: "/idle".into(),
            },
        ];
        let outputs = [ChannelOutput {
            title: "chat".into(),
            namespace: "ChatChannel".into(),
            declarations: Vec::new(),
            command_map: Vec::new(),
            event_map: Vec::new(),
            has_query: true,
            has_headers: false,
        }];

        let out = augmentation(&channels, &outputs, &GeneratorConfig::default()).emit();
        let expected = "declare module \"@ws-asyncapi/client\" {\n  export interface WebsocketAsyncAPIMap {\n    addresses: WebsocketAddresses;\n    data: { chat: { query: ChatChannel.QueryType; commandMap: ChatChannel.CommandMap; eventMap: ChatChannel.EventMap }; idle: { commandMap: {}; eventMap: {} } };\n  }\n}\n";
        assert_eq!(out, expected);
    }
}
