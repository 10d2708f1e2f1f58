//! Schema model decoded from the untyped document.
//!
//! Schemas arrive as arbitrary JSON. They are decoded exactly once, at the
//! document boundary, into the [`Schema`] variant so that every consumer is an
//! exhaustive match. Decoding is total: any JSON value maps to some variant,
//! with [`Schema::Unknown`] absorbing everything unrecognized.
//!
//! # Decoding precedence
//!
//! | Input | Variant |
//! |-------|---------|
//! | `$ref: "#/components/schemas/Name"` | `Reference("Name")` |
//! | non-empty `enum` | `Enum(literals)` |
//! | `type: string/integer/number/boolean` | `Primitive` |
//! | `type: array` | `Array(items)` |
//! | `type: object`, `properties`, `additionalProperties` | `Object` |
//! | anything else, including `null` and `{}` | `Unknown` |

use serde_json::{Map, Value};
use tracing::debug;

/// Prefix of a local reference to a reusable schema.
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// A decoded schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Pointer to a reusable schema by name.
    Reference(String),
    /// Ordered list of allowed literal values.
    Enum(Vec<Value>),
    /// Scalar type.
    Primitive(Primitive),
    /// Homogeneous list.
    Array(Box<Schema>),
    /// Object shape.
    Object(ObjectSchema),
    /// Absent or unrecognized shape.
    Unknown,
}

/// Scalar schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
}

/// Object schema details.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Declared properties in document order; `None` when `properties` is absent.
    pub properties: Option<Vec<Property>>,

    /// Value schema of the open map; `None` when absent or `false`.
    pub additional_properties: Option<Box<Schema>>,
}

/// A declared object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name as written in the document.
    pub name: String,

    /// Decoded property schema.
    pub schema: Schema,

    /// Whether the property is listed in `required`.
    pub required: bool,

    /// Property-level description.
    pub description: Option<String>,
}

impl Schema {
    /// Decode a schema from an untyped value. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Schema::Unknown;
        };

        if let Some(reference) = obj.get("$ref") {
            return match reference.as_str().and_then(local_reference_name) {
                Some(name) => Schema::Reference(type_identifier(&name)),
                None => {
                    debug!(reference = %reference, "unresolvable schema reference treated as unknown");
                    Schema::Unknown
                }
            };
        }

        if let Some(Value::Array(values)) = obj.get("enum") {
            if !values.is_empty() {
                return Schema::Enum(values.clone());
            }
        }

        match obj.get("type").and_then(Value::as_str) {
            Some("string") => return Schema::Primitive(Primitive::String),
            Some("integer") => return Schema::Primitive(Primitive::Integer),
            Some("number") => return Schema::Primitive(Primitive::Number),
            Some("boolean") => return Schema::Primitive(Primitive::Boolean),
            Some("array") => {
                let items = obj.get("items").map_or(Schema::Unknown, Schema::from_value);
                return Schema::Array(Box::new(items));
            }
            Some("object") => return Schema::Object(ObjectSchema::from_map(obj)),
            _ => {}
        }

        if obj.contains_key("properties") || obj.contains_key("additionalProperties") {
            return Schema::Object(ObjectSchema::from_map(obj));
        }

        Schema::Unknown
    }

    /// Whether this schema declares an object shape.
    pub fn is_object_like(&self) -> bool {
        matches!(self, Schema::Object(_))
    }
}

impl ObjectSchema {
    fn from_map(obj: &Map<String, Value>) -> Self {
        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let properties = obj.get("properties").and_then(Value::as_object).map(|props| {
            props
                .iter()
                .map(|(name, value)| Property {
                    name: name.clone(),
                    schema: Schema::from_value(value),
                    required: required.contains(&name.as_str()),
                    description: description_of(value),
                })
                .collect()
        });

        let additional_properties = match obj.get("additionalProperties") {
            None | Some(Value::Bool(false)) => None,
            Some(Value::Bool(true)) => Some(Box::new(Schema::Unknown)),
            Some(value) => Some(Box::new(Schema::from_value(value))),
        };

        Self {
            properties,
            additional_properties,
        }
    }
}

/// Extract a non-empty `description` string from an untyped schema node.
pub fn description_of(value: &Value) -> Option<String> {
    value
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve a local `#/components/schemas/<Name>` reference to `Name`.
///
/// JSON pointer escapes (`~1`, `~0`) are decoded. Any other reference,
/// including remote documents and nested pointers, yields `None`.
pub fn local_reference_name(reference: &str) -> Option<String> {
    let raw = reference.strip_prefix(COMPONENT_SCHEMA_PREFIX)?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(raw.replace("~1", "/").replace("~0", "~"))
}

/// Turn a component schema name into a TypeScript identifier.
///
/// Each run of characters outside `[A-Za-z0-9_$]` becomes one `_`, and a
/// leading digit gets a `_` prefix. Declarations and references both pass
/// through here, so `Market-Summary` is declared and referenced as
/// `Market_Summary`.
pub fn type_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
