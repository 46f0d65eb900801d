//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript type system representation:
//! - TsType: Types (primitives, arrays, tuples, unions, objects, etc.)
//! - TsTypeDef: Named `interface` / `type` declarations
//! - TsDecl: Top-level blocks of a generated file (namespaces, module augmentation)

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, unknown, never
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Tuple type: [A, B?, ...C[]]
    Tuple {
        /// Positional elements.
        elements: Vec<TsTupleElement>,
        /// Element type of the open tail, if any.
        rest: Option<Box<TsType>>,
    },
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    Record {
        /// Key type.
        key: Box<TsType>,
        /// Value type.
        value: Box<TsType>,
    },
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Template literal type: `/rooms/${string}`
    Template(Vec<TemplatePart>),
    /// Named type reference
    Ref(String),
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// `unknown`
    Unknown,
    /// `never`
    Never,
}

/// One positional element of a tuple type.
#[derive(Debug, Clone, PartialEq)]
pub struct TsTupleElement {
    /// Element type.
    pub ty: TsType,
    /// Whether the element may be absent.
    pub optional: bool,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    /// Property key, quoted on emission when not an identifier.
    pub name: String,
    /// Property type.
    pub ty: TsType,
    /// Whether the property may be absent.
    pub optional: bool,
    /// Doc comment.
    pub doc: Option<String>,
}

impl TsProp {
    /// A required property without documentation.
    pub fn required(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            doc: None,
        }
    }
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    /// String literal.
    String(String),
    /// Floating point literal.
    Number(f64),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool),
    /// `null`
    Null,
}

/// Template literal part
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Type hole: ${string}
    Hole(TsType),
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// interface Foo { ... }
    Interface {
        /// Declared properties, in order.
        properties: Vec<TsProp>,
        /// Value type of the `[k: string]` index signature, if open.
        index: Option<TsType>,
    },
    /// type Foo = ...
    TypeAlias {
        /// Aliased type.
        ty: TsType,
    },
}

/// Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    /// Declared name.
    pub name: String,
    /// Doc comment.
    pub doc: Option<String>,
    /// Interface or alias.
    pub kind: TypeDefKind,
}

impl TsTypeDef {
    /// `export interface <name> { ... }` with no index signature.
    pub fn interface(name: impl Into<String>, properties: Vec<TsProp>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            kind: TypeDefKind::Interface {
                properties,
                index: None,
            },
        }
    }

    /// `export type <name> = <ty>;`
    pub fn alias(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            doc: None,
            kind: TypeDefKind::TypeAlias { ty },
        }
    }
}

/// A top-level block of the generated file.
#[derive(Debug, Clone, PartialEq)]
pub enum TsDecl {
    /// A structured type definition.
    TypeDef(TsTypeDef),
    /// Declaration text produced by the shape compiler.
    Raw(String),
    /// export namespace Name { ... }
    Namespace {
        /// Namespace name.
        name: String,
        /// Nested declarations.
        body: Vec<TsDecl>,
    },
    /// declare module "name" { ... }
    DeclareModule {
        /// Module specifier being augmented.
        module: String,
        /// Nested declarations.
        body: Vec<TsDecl>,
    },
}

/// Complete TypeScript module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsModule {
    /// Blocks in emission order.
    pub decls: Vec<TsDecl>,
}
