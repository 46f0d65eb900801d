//! JSON Schema to TypeScript shape compiler.
//!
//! The pipeline is:
//! 1. Parse: schema subtree -> `Schema`
//! 2. Normalize: `Schema` -> `TsTypeDef` (refs inlined, objects closed or open)
//! 3. Emit: `TsTypeDef` -> declaration text (via `Emit`)
//!
//! ## Module Structure
//!
//! - `spec`: JSON Schema serde structs
//! - `types`: TypeScript IR (TsType, TsTypeDef, TsDecl, TsModule)
//! - `normalize`: Schema -> TypeScript IR
//! - `emit`: TypeScript IR -> code strings (via Emit trait)
//! - `utils`: quoting, escaping and doc comment helpers

mod emit;
mod normalize;
mod spec;
pub mod types;
mod utils;

use serde_json::Value;

use crate::error::CompileError;

pub use emit::Emit;

use normalize::{Normalizer, boolean_schema_type, parse_schema};
use spec::SchemaOrBool;
use types::TsTypeDef;

/// Options for a single compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Whether objects without an explicit `additionalProperties` accept
    /// undeclared properties. `false` closes them.
    pub additional_properties: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            additional_properties: true,
        }
    }
}

impl CompileOptions {
    /// Reject properties not explicitly declared.
    pub fn closed() -> Self {
        Self {
            additional_properties: false,
        }
    }
}

/// Turns one schema subtree into a named TypeScript declaration.
pub trait ShapeCompiler {
    /// Compile `schema` into the text of a declaration named `type_name`.
    fn compile(
        &self,
        schema: &Value,
        type_name: &str,
        options: CompileOptions,
    ) -> Result<String, CompileError>;
}

/// The built-in compiler. `$ref`s inside a schema resolve against `root`.
#[derive(Debug, Clone, Copy)]
pub struct TsShapeCompiler<'a> {
    root: &'a Value,
}

impl<'a> TsShapeCompiler<'a> {
    /// Create a compiler for schemas taken from `root`.
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }
}

impl ShapeCompiler for TsShapeCompiler<'_> {
    fn compile(
        &self,
        schema: &Value,
        type_name: &str,
        options: CompileOptions,
    ) -> Result<String, CompileError> {
        let def = match parse_schema(schema)? {
            SchemaOrBool::Schema(schema) => {
                Normalizer::new(self.root, options).typedef(type_name, &schema)?
            }
            SchemaOrBool::Bool(allowed) => TsTypeDef::alias(type_name, boolean_schema_type(allowed)),
        };
        Ok(def.emit())
    }
}

/// Insert `additionalProperties: false` into an object schema that does not
/// set it, leaving every other key untouched.
pub fn with_closed_default(schema: &Value) -> Value {
    let mut schema = schema.clone();
    if let Value::Object(map) = &mut schema
        && !map.contains_key("additionalProperties")
    {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }
    schema
}
