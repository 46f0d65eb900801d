//! AsyncAPI to TypeScript declaration generator.
//!
//! This module reads an AsyncAPI 3 document describing WebSocket channels and
//! generates a TypeScript file with:
//! - One namespace per channel holding its message body types, optional
//!   `QueryType`/`HeadersType` from the `ws` binding, and the `CommandMap` /
//!   `EventMap` discriminator lookups
//! - `WebsocketAddresses` and `WebsocketServers` aggregate interfaces
//! - A `declare module` augmentation of the client's `WebsocketAsyncAPIMap`
//!
//! Channels and messages must be given by `$ref`; inline definitions are
//! skipped.

pub mod assemble;
pub mod channel;
mod emitter;
pub mod group;
pub mod naming;
pub mod pointer;
pub mod spec;

pub use emitter::{generate, generate_with};
