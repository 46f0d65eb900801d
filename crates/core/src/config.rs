//! Generator configuration.

use std::path::PathBuf;

/// File the generated declarations are written to.
pub const DEFAULT_OUTPUT_PATH: &str = "generated.ts";

/// Client package whose `WebsocketAsyncAPIMap` the output augments.
pub const DEFAULT_CLIENT_MODULE: &str = "@ws-asyncapi/client";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Where the generated file is written, relative to the working directory.
    pub output_path: PathBuf,
    /// Module name used in the `declare module` augmentation.
    pub client_module: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            client_module: DEFAULT_CLIENT_MODULE.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Override the output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }
}
