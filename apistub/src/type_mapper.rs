//! Schema to TypeScript type mappings.
//!
//! This module provides the [`TypeMapper`], which renders a decoded
//! [`Schema`] as a TypeScript type expression. Both mapping modes are total:
//! every schema, however malformed the input it was decoded from, produces a
//! type string.
//!
//! # Structural mode
//!
//! Used for property types inside the type-declarations module.
//!
//! | Schema | TypeScript |
//! |--------|------------|
//! | `Reference(Foo)` | `Foo` |
//! | `Enum(["A", "B"])` | `"A" \| "B"` |
//! | `string` | `string` |
//! | `integer`, `number` | `number` |
//! | `boolean` | `boolean` |
//! | `Array(T)` | `T[]` |
//! | object with `additionalProperties: V` | `Record<string, V>` |
//! | object with `properties` | `Record<string, unknown>` |
//! | anything else | `unknown` |
//!
//! # Qualified mode
//!
//! Used for operation parameter and result types. References are prefixed
//! with the namespace the type-declarations module is imported under, arrays
//! recurse, primitives map as above, and every other shape yields `None`.

use crate::schema::{ObjectSchema, Primitive, Schema};
use serde_json::Value;

/// Type used when nothing better is known.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Result type of operations that return no value.
pub const VOID_TYPE: &str = "void";

/// Namespace the type-declarations module is imported under in stubs.
pub const TYPES_NAMESPACE: &str = "Types";

/// Maps schemas to TypeScript type expressions.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    /// Namespace used by [`TypeMapper::map_qualified`].
    namespace: String,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapper {
    /// Create a mapper qualifying references with [`TYPES_NAMESPACE`].
    pub fn new() -> Self {
        Self::with_namespace(TYPES_NAMESPACE)
    }

    /// Create a mapper qualifying references with a custom namespace.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Namespace references are qualified with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Map a schema structurally.
    pub fn map_structural(&self, schema: &Schema) -> String {
        match schema {
            Schema::Reference(name) => name.clone(),
            Schema::Enum(values) => map_enum(values),
            Schema::Primitive(primitive) => map_primitive(*primitive).to_string(),
            Schema::Array(item) => array_of(self.map_structural(item)),
            Schema::Object(object) => self.map_object(object),
            Schema::Unknown => UNKNOWN_TYPE.to_string(),
        }
    }

    /// Map a schema for use in an operation signature.
    ///
    /// Returns `None` for shapes that have no named counterpart in the
    /// type-declarations module; callers fall back to [`UNKNOWN_TYPE`].
    pub fn map_qualified(&self, schema: &Schema) -> Option<String> {
        match schema {
            Schema::Reference(name) => Some(format!("{}.{}", self.namespace, name)),
            Schema::Array(item) => {
                let item = self
                    .map_qualified(item)
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
                Some(array_of(item))
            }
            Schema::Primitive(primitive) => Some(map_primitive(*primitive).to_string()),
            Schema::Enum(_) | Schema::Object(_) | Schema::Unknown => None,
        }
    }

    /// Map an object schema that is used as a value rather than declared.
    fn map_object(&self, object: &ObjectSchema) -> String {
        if let Some(value) = &object.additional_properties {
            format!("Record<string, {}>", self.map_structural(value))
        } else if object.properties.is_some() {
            "Record<string, unknown>".to_string()
        } else {
            UNKNOWN_TYPE.to_string()
        }
    }
}

fn map_primitive(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "string",
        Primitive::Integer | Primitive::Number => "number",
        Primitive::Boolean => "boolean",
    }
}

/// Render enum literals as a union. Non-scalar literals have no literal type
/// and degrade to `unknown`.
fn map_enum(values: &[Value]) -> String {
    let literals: Vec<String> = values
        .iter()
        .map(|value| match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value.to_string(),
            Value::Array(_) | Value::Object(_) => UNKNOWN_TYPE.to_string(),
        })
        .collect();

    if literals.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        literals.join(" | ")
    }
}

/// Append an array suffix, parenthesizing unions so the suffix binds to the
/// whole item type.
fn array_of(item: String) -> String {
    if item.contains(" | ") {
        format!("({})[]", item)
    } else {
        format!("{}[]", item)
    }
}
