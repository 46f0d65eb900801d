//! Generation entry points.
//!
//! The pipeline is group -> extract per channel -> assemble -> emit. The
//! document is only read, and the whole file is rendered in one pass.

use serde_json::Value;

use super::assemble::assemble;
use super::spec::Document;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::schema::{Emit, ShapeCompiler, TsShapeCompiler};

/// Generate the TypeScript declaration file for an AsyncAPI document.
pub fn generate(document: &Value, fallback_host: &str, config: &GeneratorConfig) -> Result<String> {
    generate_with(document, fallback_host, &TsShapeCompiler::new(document), config)
}

/// Same as [`generate`], with a caller-supplied shape compiler.
pub fn generate_with(
    document: &Value,
    fallback_host: &str,
    compiler: &dyn ShapeCompiler,
    config: &GeneratorConfig,
) -> Result<String> {
    // Parse -> group -> extract per channel -> assemble, then emit once
    let module = assemble(Document::new(document), fallback_host, compiler, config)?;
    Ok(module.emit())
}
