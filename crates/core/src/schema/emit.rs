//! TypeScript code emission via the Emit trait.
//!
//! Each IR type implements `Emit` so that declarations compose into the
//! final file by plain string concatenation.

use super::types::{
    TemplatePart, TsDecl, TsLiteral, TsModule, TsPrimitive, TsProp, TsTupleElement, TsType,
    TsTypeDef, TypeDefKind,
};
use super::utils::{escape_js_string, escape_template, format_doc, indent_block, quote_if_needed};

/// Trait for emitting TypeScript code from IR nodes.
pub trait Emit {
    /// Convert the IR node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        let keyword = match self {
            TsPrimitive::String => "string",
            TsPrimitive::Number => "number",
            TsPrimitive::Boolean => "boolean",
            TsPrimitive::Null => "null",
            TsPrimitive::Unknown => "unknown",
            TsPrimitive::Never => "never",
        };
        keyword.to_string()
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

/// Wrap unions and intersections in parentheses where precedence requires it.
fn emit_grouped(ty: &TsType) -> String {
    let s = ty.emit();
    match ty {
        TsType::Union(types) | TsType::Intersection(types) if types.len() > 1 => format!("({s})"),
        _ => s,
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => format!("{}[]", emit_grouped(inner)),
            TsType::Tuple { elements, rest } => {
                let mut parts: Vec<String> = elements.iter().map(Emit::emit).collect();
                if let Some(rest) = rest {
                    parts.push(format!("...{}[]", emit_grouped(rest)));
                }
                format!("[{}]", parts.join(", "))
            }
            TsType::Union(types) => match types.as_slice() {
                [] => TsPrimitive::Never.emit(),
                [single] => single.emit(),
                _ => types.iter().map(Emit::emit).collect::<Vec<_>>().join(" | "),
            },
            TsType::Intersection(types) => match types.as_slice() {
                [] => TsPrimitive::Unknown.emit(),
                [single] => single.emit(),
                _ => types
                    .iter()
                    .map(|t| {
                        if matches!(t, TsType::Union(_)) {
                            emit_grouped(t)
                        } else {
                            t.emit()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" & "),
            },
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(Emit::emit).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => escape_template(s),
                        TemplatePart::Hole(ty) => format!("${{{}}}", ty.emit()),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsType::Ref(name) => name.clone(),
        }
    }
}

impl Emit for TsTupleElement {
    fn emit(&self) -> String {
        if self.optional {
            format!("{}?", emit_grouped(&self.ty))
        } else {
            self.ty.emit()
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = self
            .doc
            .as_deref()
            .map(|doc| format_doc(doc, 0))
            .unwrap_or_default();
        match &self.kind {
            TypeDefKind::Interface { properties, index } => {
                output.push_str(&format!("export interface {} {{\n", self.name));
                for prop in properties {
                    if let Some(doc) = &prop.doc {
                        output.push_str(&format_doc(doc, 1));
                    }
                    output.push_str(&format!("  {};\n", prop.emit()));
                }
                if let Some(index) = index {
                    output.push_str(&format!("  [k: string]: {};\n", index.emit()));
                }
                output.push_str("}\n");
            }
            TypeDefKind::TypeAlias { ty } => {
                output.push_str(&format!("export type {} = {};\n", self.name, ty.emit()));
            }
        }
        output
    }
}

// =============================================================================
// Blocks
// =============================================================================

fn emit_body(body: &[TsDecl]) -> String {
    let inner: String = body.iter().map(Emit::emit).collect();
    indent_block(&inner, 1)
}

impl Emit for TsDecl {
    fn emit(&self) -> String {
        match self {
            TsDecl::TypeDef(def) => def.emit(),
            TsDecl::Raw(code) => {
                if code.ends_with('\n') {
                    code.clone()
                } else {
                    format!("{code}\n")
                }
            }
            TsDecl::Namespace { name, body } => {
                format!("export namespace {name} {{\n{}}}\n", emit_body(body))
            }
            TsDecl::DeclareModule { module, body } => {
                format!(
                    "declare module \"{}\" {{\n{}}}\n",
                    escape_js_string(module),
                    emit_body(body)
                )
            }
        }
    }
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        self.decls
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================
