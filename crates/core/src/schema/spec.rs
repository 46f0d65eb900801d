//! JSON Schema structs for serde deserialization.
//!
//! This covers the subset of JSON Schema that AsyncAPI message bodies and
//! WebSocket binding schemas use in practice.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// JSON Schema definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array, null).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema in the same document.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types, in declaration order.
    #[serde(default, deserialize_with = "ordered_properties")]
    pub properties: Option<Vec<(String, SchemaOrBool)>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema (list) or positional item schemas (tuple).
    pub items: Option<Items>,

    /// Schema for tuple elements past the positional ones.
    pub additional_items: Option<SchemaOrBool>,

    /// Minimum items for arrays.
    pub min_items: Option<u64>,

    /// Maximum items for arrays.
    pub max_items: Option<u64>,

    /// Enum values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Constant value - schema matches only this exact value.
    #[serde(rename = "const", default, deserialize_with = "present")]
    pub const_value: Option<serde_json::Value>,

    /// Union type (any of these schemas).
    pub any_of: Option<Vec<SchemaOrBool>>,

    /// Union type (exactly one of these schemas).
    pub one_of: Option<Vec<SchemaOrBool>>,

    /// Intersection type (all of these schemas combined).
    pub all_of: Option<Vec<SchemaOrBool>>,

    /// Additional properties for object types.
    pub additional_properties: Option<SchemaOrBool>,

    /// Human readable description, emitted as a doc comment.
    pub description: Option<String>,
}

/// Enum value can be string, integer, float, boolean, null, or any other
/// JSON value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    /// String member.
    String(String),
    /// Integer member.
    Integer(i64),
    /// Floating point member.
    Float(f64),
    /// Boolean member.
    Bool(bool),
    /// `null` member.
    Null,
    /// Object or array member.
    Json(serde_json::Value),
}

/// Schema type can be a single type or an array of types, e.g. `["string", "null"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(String),
    /// `"type": ["string", "null"]`
    Multiple(Vec<String>),
}

/// `items` is a single schema for lists or a sequence of schemas for tuples.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Items {
    /// Positional item schemas.
    Tuple(Vec<SchemaOrBool>),
    /// Boolean schema: `true` allows anything, `false` nothing.
    Bool(bool),
    /// One schema for every item.
    Single(Box<Schema>),
}

/// A subschema position that also accepts `true` (anything) or `false`
/// (nothing).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    /// `true` or `false`.
    Bool(bool),
    /// A full schema.
    Schema(Box<Schema>),
}

impl Schema {
    /// Check if this schema describes a plain object.
    pub fn is_object_like(&self) -> bool {
        let typed_object = matches!(&self.schema_type, Some(SchemaType::Single(t)) if t == "object");
        (typed_object || self.properties.is_some())
            && self.ref_path.is_none()
            && self.const_value.is_none()
            && self.enum_values.is_none()
            && self.any_of.is_none()
            && self.one_of.is_none()
            && self.all_of.is_none()
    }

    /// Check if `name` is listed in `required`.
    pub fn requires(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|r| r == name))
    }
}

/// Keep a present `const: null` as `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Deserialize `properties` preserving the document's key order.
fn ordered_properties<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<(String, SchemaOrBool)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = Vec<(String, SchemaOrBool)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of property schemas")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut props = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, schema)) = map.next_entry::<String, SchemaOrBool>()? {
                props.push((name, schema));
            }
            Ok(props)
        }
    }

    deserializer.deserialize_map(PropertiesVisitor).map(Some)
}
