//! Core library for `wsgen`: turns a WebSocket AsyncAPI document into
//! TypeScript declarations for `@ws-asyncapi/client`.
//!
//! The pipeline is fetch -> [`asyncapi::generate`] -> write. Only the fetch is
//! asynchronous; generation is a pure function of the document.

pub mod asyncapi;
pub mod config;
pub mod error;
pub mod fetch;
pub mod schema;

pub use asyncapi::{generate, generate_with};
pub use config::GeneratorConfig;
pub use error::{GenerateError, Result};

use std::path::Path;

use tracing::info;

/// Fetch the document at `target` and render the declaration file.
///
/// Nothing is written; see [`write_output`].
pub async fn generate_from_url(target: &str, config: &GeneratorConfig) -> Result<String> {
    let url = fetch::parse_target(target)?;
    let host = fetch::fallback_host(&url)?;
    let document = fetch::fetch_document(&url).await?;
    generate(&document, &host, config)
}

/// Write the generated text to `path` in one call.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote generated declarations");
    Ok(())
}
