//! Per-channel extraction of message types and direction maps.
//!
//! A channel's output is a self-contained record: the declarations that go
//! into its namespace plus the command and event maps. Nothing is shared
//! between channels, so two channels may use the same discriminator.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::naming::{canonicalize, channel_namespace};
use super::pointer::{follow, resolve};
use super::spec::{Channel, Direction, Operation};
use crate::error::{ChannelSkip, GenerateError, MessageError, Result};
use crate::schema::types::{TsDecl, TsPrimitive, TsProp, TsType, TsTypeDef};
use crate::schema::{CompileOptions, ShapeCompiler, with_closed_default};

/// Name of the declaration generated from the WebSocket query binding.
pub const QUERY_TYPE: &str = "QueryType";
/// Name of the declaration generated from the WebSocket headers binding.
pub const HEADERS_TYPE: &str = "HeadersType";
/// Name of the discriminator-to-type map for caller-to-service messages.
pub const COMMAND_MAP: &str = "CommandMap";
/// Name of the discriminator-to-type map for service-to-caller messages.
pub const EVENT_MAP: &str = "EventMap";

/// Everything generated for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutput {
    /// The channel's title.
    pub title: String,
    /// Namespace name, `<Title>Channel` canonicalized.
    pub namespace: String,
    /// Binding and message declarations in generation order.
    pub declarations: Vec<TsDecl>,
    /// Discriminator to type name, for `receive` operations.
    pub command_map: Vec<(String, String)>,
    /// Discriminator to type name, for every other operation.
    pub event_map: Vec<(String, String)>,
    /// Whether `QueryType` was generated.
    pub has_query: bool,
    /// Whether `HeadersType` was generated.
    pub has_headers: bool,
}

impl ChannelOutput {
    /// Wrap the declarations and both maps into the channel's namespace block.
    pub fn to_namespace(&self) -> TsDecl {
        let mut body = self.declarations.clone();
        body.push(map_declaration(COMMAND_MAP, &self.command_map));
        body.push(map_declaration(EVENT_MAP, &self.event_map));
        TsDecl::Namespace {
            name: self.namespace.clone(),
            body,
        }
    }
}

/// Outcome of extracting one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The channel produced a namespace.
    Generated(ChannelOutput),
    /// The channel was skipped; the run continues.
    Skipped(ChannelSkip),
}

/// A validated message payload.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MessageParts<'a> {
    discriminator: &'a str,
    body: &'a Value,
}

/// Extract the declarations and direction maps for one channel.
///
/// An unresolvable or untitled channel is reported and skipped. Messages that
/// fail to resolve or validate are reported and skipped individually. Shape
/// compiler failures and type name collisions abort the run.
pub fn extract_channel(
    channel_ref: &str,
    operations: &[Operation],
    root: &Value,
    compiler: &dyn ShapeCompiler,
) -> Result<Extraction> {
    let channel = match load_channel(channel_ref, root) {
        Ok(channel) => channel,
        Err(skip) => {
            warn!(channel = %channel_ref, error = %skip, "Skipping channel");
            return Ok(Extraction::Skipped(skip));
        }
    };
    let Some(title) = channel.title.clone().filter(|t| !t.is_empty()) else {
        let skip = ChannelSkip::Untitled(channel_ref.to_string());
        warn!(channel = %channel_ref, error = %skip, "Skipping channel");
        return Ok(Extraction::Skipped(skip));
    };

    let mut output = ChannelOutput {
        namespace: channel_namespace(&title),
        title,
        declarations: Vec::new(),
        command_map: Vec::new(),
        event_map: Vec::new(),
        has_query: false,
        has_headers: false,
    };

    if let Some(binding) = channel.ws_binding() {
        let query = binding_declaration(binding.query(), QUERY_TYPE, channel_ref, root, compiler)?;
        if let Some(decl) = query {
            output.declarations.push(decl);
            output.has_query = true;
        }
        let headers =
            binding_declaration(binding.headers(), HEADERS_TYPE, channel_ref, root, compiler)?;
        if let Some(decl) = headers {
            output.declarations.push(decl);
            output.has_headers = true;
        }
    }

    // type name -> message reference that produced it
    let mut claimed: HashMap<String, String> = HashMap::new();

    for operation in operations {
        let direction = operation.direction();
        for message_ref in operation
            .messages
            .iter()
            .flatten()
            .filter_map(|m| m.as_ref_path())
        {
            let parts = match message_parts(message_ref, root) {
                Ok(parts) => parts,
                Err(err) => {
                    warn!(channel = %channel_ref, message = %message_ref, error = %err, "Skipping message");
                    continue;
                }
            };

            let type_name = canonicalize(&format!(
                "{}{}",
                parts.discriminator,
                direction.type_suffix()
            ));

            if let Some(first) = claimed.get(&type_name) {
                if first == message_ref {
                    debug!(channel = %channel_ref, message = %message_ref, "Message already generated");
                    continue;
                }
                return Err(GenerateError::DuplicateTypeName {
                    channel: channel_ref.to_string(),
                    type_name,
                    first: first.clone(),
                    second: message_ref.to_string(),
                });
            }

            output
                .declarations
                .push(body_declaration(parts.body, &type_name, compiler)?);
            debug!(channel = %channel_ref, message = %message_ref, %type_name, "Generated message type");

            let entry = (parts.discriminator.to_string(), type_name.clone());
            match direction {
                Direction::Command => output.command_map.push(entry),
                Direction::Event => output.event_map.push(entry),
            }
            claimed.insert(type_name, message_ref.to_string());
        }
    }

    Ok(Extraction::Generated(output))
}

fn load_channel(channel_ref: &str, root: &Value) -> std::result::Result<Channel, ChannelSkip> {
    let node =
        resolve(channel_ref, root).ok_or_else(|| ChannelSkip::Unresolved(channel_ref.to_string()))?;
    Channel::deserialize(node).map_err(|err| ChannelSkip::Malformed {
        reference: channel_ref.to_string(),
        reason: err.to_string(),
    })
}

/// Compile a query or headers binding schema, following a `$ref` if present.
///
/// A binding whose reference does not resolve is treated as absent.
fn binding_declaration(
    node: Option<&Value>,
    type_name: &str,
    channel_ref: &str,
    root: &Value,
    compiler: &dyn ShapeCompiler,
) -> Result<Option<TsDecl>> {
    let Some(node) = node else {
        return Ok(None);
    };
    let Some(schema) = follow(node, root) else {
        warn!(channel = %channel_ref, binding = type_name, "Binding schema reference not found");
        return Ok(None);
    };
    let code = compiler
        .compile(&with_closed_default(schema), type_name, CompileOptions::default())
        .map_err(|source| GenerateError::Compile {
            type_name: type_name.to_string(),
            source,
        })?;
    Ok(Some(TsDecl::Raw(code)))
}

/// Resolve a message reference and validate its `[discriminator, body]` payload.
fn message_parts<'a>(
    message_ref: &str,
    root: &'a Value,
) -> std::result::Result<MessageParts<'a>, MessageError> {
    let message =
        resolve(message_ref, root).ok_or_else(|| MessageError::Unresolved(message_ref.to_string()))?;
    let payload = message.get("payload").ok_or(MessageError::MissingPayload)?;
    let payload = follow(payload, root).ok_or(MessageError::MissingPayload)?;

    let Some([tag, body]) = payload
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
    else {
        return Err(MessageError::NotAPair);
    };

    let discriminator = follow(tag, root)
        .and_then(|tag| tag.get("const"))
        .and_then(Value::as_str)
        .ok_or(MessageError::MissingDiscriminator)?;
    let body = follow(body, root)
        .filter(|body| body.is_object())
        .ok_or(MessageError::InvalidBody)?;

    Ok(MessageParts {
        discriminator,
        body,
    })
}

/// A body whose `not` matches everything can never be sent.
fn is_unsatisfiable(body: &Value) -> bool {
    match body.get("not") {
        Some(Value::Object(not)) => not.is_empty(),
        Some(Value::Bool(true)) => true,
        _ => false,
    }
}

fn body_declaration(
    body: &Value,
    type_name: &str,
    compiler: &dyn ShapeCompiler,
) -> Result<TsDecl> {
    if is_unsatisfiable(body) {
        return Ok(TsDecl::TypeDef(TsTypeDef::alias(
            type_name,
            TsType::Primitive(TsPrimitive::Never),
        )));
    }
    let code = compiler
        .compile(&with_closed_default(body), type_name, CompileOptions::closed())
        .map_err(|source| GenerateError::Compile {
            type_name: type_name.to_string(),
            source,
        })?;
    Ok(TsDecl::Raw(code))
}

fn map_declaration(name: &str, entries: &[(String, String)]) -> TsDecl {
    let props = entries
        .iter()
        .map(|(discriminator, type_name)| {
            TsProp::required(discriminator.clone(), TsType::Ref(type_name.clone()))
        })
        .collect();
    TsDecl::TypeDef(TsTypeDef::interface(name, props))
}
