//! Normalization from JSON Schema to TypeScript IR.
//!
//! This module handles all the JSON Schema specific logic:
//! - `$ref` resolution against the enclosing document, with cycle detection
//! - Schema to TypeScript type conversion
//! - Deciding between `interface` and `type` declarations

use serde::Deserialize as _;
use serde_json::Value;
use tracing::debug;

use crate::asyncapi::pointer;
use crate::error::CompileError;

use super::CompileOptions;
use super::spec::{EnumValue, Items, Schema, SchemaOrBool, SchemaType};
use super::types::{TsPrimitive, TsProp, TsTupleElement, TsType, TsTypeDef, TypeDefKind};
use super::utils::{enum_value_to_type, json_value_to_ts_type, make_string_record};

/// Walks one schema tree, resolving references against `root`.
#[derive(Debug)]
pub struct Normalizer<'a> {
    root: &'a Value,
    options: CompileOptions,
    /// References currently being expanded, innermost last.
    stack: Vec<String>,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer over `root`.
    pub fn new(root: &'a Value, options: CompileOptions) -> Self {
        Self {
            root,
            options,
            stack: Vec::new(),
        }
    }

    /// Convert a top-level schema into a named type definition.
    pub fn typedef(&mut self, name: &str, schema: &Schema) -> Result<TsTypeDef, CompileError> {
        if let Some(ref_path) = &schema.ref_path {
            if self.stack.iter().any(|r| r == ref_path) {
                return Ok(TsTypeDef::alias(name, TsType::Primitive(TsPrimitive::Unknown)));
            }
            let mut def = match self.load_ref(ref_path)? {
                SchemaOrBool::Schema(target) => {
                    self.stack.push(ref_path.clone());
                    let def = self.typedef(name, &target);
                    self.stack.pop();
                    def
                }
                SchemaOrBool::Bool(allowed) => {
                    Ok(TsTypeDef::alias(name, boolean_schema_type(allowed)))
                }
            };
            if let Ok(def) = &mut def
                && def.doc.is_none()
            {
                def.doc.clone_from(&schema.description);
            }
            return def;
        }

        let kind = if schema.is_object_like() {
            let properties = self.properties(schema)?;
            let index = self.index_signature(schema)?;
            TypeDefKind::Interface { properties, index }
        } else {
            TypeDefKind::TypeAlias {
                ty: self.ts_type(schema)?,
            }
        };

        Ok(TsTypeDef {
            name: name.to_string(),
            doc: schema.description.clone(),
            kind,
        })
    }

    /// Convert a subschema, boolean or not, to a TsType.
    pub fn subschema_type(&mut self, schema: &SchemaOrBool) -> Result<TsType, CompileError> {
        match schema {
            SchemaOrBool::Bool(allowed) => Ok(boolean_schema_type(*allowed)),
            SchemaOrBool::Schema(schema) => self.ts_type(schema),
        }
    }

    /// Convert a schema to a TsType.
    pub fn ts_type(&mut self, schema: &Schema) -> Result<TsType, CompileError> {
        // Handle $ref first
        if let Some(ref_path) = &schema.ref_path {
            return self.expand_ref(ref_path);
        }

        // Handle const keyword
        if let Some(const_value) = &schema.const_value {
            return Ok(json_value_to_ts_type(const_value));
        }

        if let Some(enum_values) = &schema.enum_values {
            return Ok(enum_to_union_type(enum_values));
        }

        // Handle allOf (intersection)
        if let Some(all_of) = &schema.all_of {
            let types = self.ts_types(all_of)?;
            return Ok(match types.len() {
                0 => TsType::Primitive(TsPrimitive::Unknown),
                _ => TsType::Intersection(types),
            });
        }

        // Handle anyOf / oneOf (union)
        if let Some(variants) = schema.any_of.as_ref().or(schema.one_of.as_ref()) {
            return Ok(TsType::Union(self.ts_types(variants)?));
        }

        match &schema.schema_type {
            Some(SchemaType::Single(t)) => self.schema_type_to_ts(t, schema),
            Some(SchemaType::Multiple(types)) => {
                let mut ts_types = types
                    .iter()
                    .filter(|t| *t != "null")
                    .map(|t| self.schema_type_to_ts(t, schema))
                    .collect::<Result<Vec<_>, _>>()?;
                if types.iter().any(|t| t == "null") {
                    ts_types.push(TsType::Primitive(TsPrimitive::Null));
                }
                Ok(TsType::Union(ts_types))
            }
            None => {
                // No type specified - infer from the keywords that are present
                if schema.properties.is_some() || schema.additional_properties.is_some() {
                    self.object_type(schema)
                } else if schema.items.is_some() {
                    self.array_type(schema)
                } else {
                    Ok(TsType::Primitive(TsPrimitive::Unknown))
                }
            }
        }
    }

    fn ts_types(&mut self, schemas: &[SchemaOrBool]) -> Result<Vec<TsType>, CompileError> {
        schemas.iter().map(|s| self.subschema_type(s)).collect()
    }

    /// Convert single schema type to TsType
    fn schema_type_to_ts(&mut self, schema_type: &str, schema: &Schema) -> Result<TsType, CompileError> {
        match schema_type {
            "string" => Ok(TsType::Primitive(TsPrimitive::String)),
            "number" | "integer" => Ok(TsType::Primitive(TsPrimitive::Number)),
            "boolean" => Ok(TsType::Primitive(TsPrimitive::Boolean)),
            "null" => Ok(TsType::Primitive(TsPrimitive::Null)),
            "array" => self.array_type(schema),
            "object" => self.object_type(schema),
            other => {
                debug!(schema_type = other, "Unknown schema type, emitting unknown.");
                Ok(TsType::Primitive(TsPrimitive::Unknown))
            }
        }
    }

    fn array_type(&mut self, schema: &Schema) -> Result<TsType, CompileError> {
        match &schema.items {
            Some(Items::Single(items)) => Ok(TsType::Array(Box::new(self.ts_type(items)?))),
            Some(Items::Tuple(items)) => self.tuple_type(items, schema),
            Some(Items::Bool(false)) => Ok(TsType::Tuple {
                elements: Vec::new(),
                rest: None,
            }),
            Some(Items::Bool(true)) | None => Ok(TsType::Array(Box::new(TsType::Primitive(
                TsPrimitive::Unknown,
            )))),
        }
    }

    /// Positional `items`: elements past `minItems` are optional, and the
    /// tail stays open unless `additionalItems: false` or `maxItems` closes it.
    fn tuple_type(&mut self, items: &[SchemaOrBool], schema: &Schema) -> Result<TsType, CompileError> {
        let min = schema
            .min_items
            .map_or(0, |m| usize::try_from(m).unwrap_or(usize::MAX));
        let elements = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Ok(TsTupleElement {
                    ty: self.subschema_type(item)?,
                    optional: i >= min,
                })
            })
            .collect::<Result<Vec<_>, CompileError>>()?;

        let bounded = schema
            .max_items
            .is_some_and(|max| usize::try_from(max).is_ok_and(|max| max <= items.len()));
        let rest = match &schema.additional_items {
            Some(SchemaOrBool::Bool(false)) => None,
            _ if bounded => None,
            Some(SchemaOrBool::Schema(s)) => Some(Box::new(self.ts_type(s)?)),
            Some(SchemaOrBool::Bool(true)) | None => {
                Some(Box::new(TsType::Primitive(TsPrimitive::Unknown)))
            }
        };

        Ok(TsType::Tuple { elements, rest })
    }

    /// Inline object type: props, record, or props & record.
    fn object_type(&mut self, schema: &Schema) -> Result<TsType, CompileError> {
        let props = self.properties(schema)?;
        let index = self.index_signature(schema)?;
        Ok(match (props.is_empty(), index) {
            (_, None) => TsType::Object(props),
            (true, Some(value)) => make_string_record(value),
            (false, Some(value)) => {
                TsType::Intersection(vec![TsType::Object(props), make_string_record(value)])
            }
        })
    }

    fn properties(&mut self, schema: &Schema) -> Result<Vec<TsProp>, CompileError> {
        let Some(properties) = &schema.properties else {
            return Ok(Vec::new());
        };
        properties
            .iter()
            .map(|(name, prop_schema)| {
                let doc = match prop_schema {
                    SchemaOrBool::Schema(s) => s.description.clone(),
                    SchemaOrBool::Bool(_) => None,
                };
                Ok(TsProp {
                    name: name.clone(),
                    ty: self.subschema_type(prop_schema)?,
                    optional: !schema.requires(name),
                    doc,
                })
            })
            .collect()
    }

    /// Value type of undeclared properties, `None` when the object is closed.
    fn index_signature(&mut self, schema: &Schema) -> Result<Option<TsType>, CompileError> {
        match &schema.additional_properties {
            Some(SchemaOrBool::Bool(false)) => Ok(None),
            Some(SchemaOrBool::Bool(true)) => Ok(Some(TsType::Primitive(TsPrimitive::Unknown))),
            Some(SchemaOrBool::Schema(s)) => Ok(Some(self.ts_type(s)?)),
            None if self.options.additional_properties => {
                Ok(Some(TsType::Primitive(TsPrimitive::Unknown)))
            }
            None => Ok(None),
        }
    }

    fn expand_ref(&mut self, ref_path: &str) -> Result<TsType, CompileError> {
        if self.stack.iter().any(|r| r == ref_path) {
            debug!(reference = ref_path, "Cyclic schema reference, emitting unknown.");
            return Ok(TsType::Primitive(TsPrimitive::Unknown));
        }
        let target = self.load_ref(ref_path)?;
        self.stack.push(ref_path.to_string());
        let ty = self.subschema_type(&target);
        self.stack.pop();
        ty
    }

    fn load_ref(&self, ref_path: &str) -> Result<SchemaOrBool, CompileError> {
        let node = pointer::resolve(ref_path, self.root)
            .ok_or_else(|| CompileError::UnresolvedRef(ref_path.to_string()))?;
        parse_schema(node)
    }
}

/// Deserialize a schema node, which may be `true` or `false`.
pub fn parse_schema(node: &Value) -> Result<SchemaOrBool, CompileError> {
    SchemaOrBool::deserialize(node).map_err(|e| CompileError::InvalidSchema(e.to_string()))
}

/// `true` accepts any value, `false` none.
pub const fn boolean_schema_type(allowed: bool) -> TsType {
    TsType::Primitive(if allowed {
        TsPrimitive::Unknown
    } else {
        TsPrimitive::Never
    })
}

/// Convert enum values to union of literal types
fn enum_to_union_type(values: &[EnumValue]) -> TsType {
    TsType::Union(values.iter().map(enum_value_to_type).collect())
}
