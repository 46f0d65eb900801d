//! Error types for document generation.
//!
//! Fatal conditions abort the whole run and are reported as [`GenerateError`].
//! Per-channel and per-message problems are recoverable: they are logged and
//! the offending item is skipped, see [`ChannelSkip`] and [`MessageError`].

use std::path::PathBuf;

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The document has no `operations` collection.
    #[error("No operations found in AsyncAPI document")]
    MissingOperations,

    /// The document has no `channels` collection.
    #[error("No channels found in AsyncAPI document")]
    MissingChannels,

    /// The target URL could not be parsed.
    #[error("Invalid target URL '{target}': {source}")]
    InvalidTarget {
        /// The operator-supplied target.
        target: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request failed or returned a non-success status.
    #[error("Failed to fetch AsyncAPI document from {url}: {reason}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// Human readable failure reason.
        reason: String,
    },

    /// The response body is not a JSON (or YAML) document.
    #[error("Failed to parse AsyncAPI document: {0}")]
    Parse(String),

    /// The shape compiler rejected a schema.
    #[error("Failed to compile schema for {type_name}: {source}")]
    Compile {
        /// The type name being generated.
        type_name: String,
        /// Underlying compiler error.
        #[source]
        source: CompileError,
    },

    /// Two different messages in one channel produce the same type name.
    #[error(
        "Type name {type_name} in channel {channel} is produced by both {first} and {second}"
    )]
    DuplicateTypeName {
        /// Channel reference the collision occurred in.
        channel: String,
        /// The colliding type name.
        type_name: String,
        /// Message reference that claimed the name first.
        first: String,
        /// Message reference that collided with it.
        second: String,
    },

    /// Writing the generated file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the shape compiler.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The schema subtree does not deserialize as a JSON Schema.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A `$ref` inside the schema points nowhere.
    #[error("unresolvable reference {0}")]
    UnresolvedRef(String),
}

/// Why a message entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// The message reference does not resolve.
    #[error("Message {0} not found")]
    Unresolved(String),

    /// The resolved message has no payload.
    #[error("message has no payload")]
    MissingPayload,

    /// `payload.items` is not a two-element sequence.
    #[error("payload items must be a [discriminator, body] pair")]
    NotAPair,

    /// Element 0 of the pair carries no string `const`.
    #[error("discriminator has no string const value")]
    MissingDiscriminator,

    /// Element 1 of the pair is not a schema object.
    #[error("message body is not a schema object")]
    InvalidBody,
}

/// Why a whole channel was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelSkip {
    /// The channel reference does not resolve.
    #[error("Channel {0} not found")]
    Unresolved(String),

    /// The channel resolved but carries no title.
    #[error("Channel {0} has no title")]
    Untitled(String),

    /// The channel node is not a channel object.
    #[error("Channel {reference} is malformed: {reason}")]
    Malformed {
        /// Channel reference.
        reference: String,
        /// Deserialization failure.
        reason: String,
    },
}

/// Result alias for fatal generation errors.
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
