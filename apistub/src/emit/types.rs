//! Type-declarations emitter.

use super::{doc_comment, property_key, GENERATED_HEADER};
use crate::document::NamedSchema;
use crate::schema::{ObjectSchema, Schema};
use crate::type_mapper::TypeMapper;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Renders the module declaring every reusable schema.
#[derive(Debug, Clone, Default)]
pub struct TypeEmitter {
    mapper: TypeMapper,
}

impl TypeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render declarations for the given schemas in order.
    ///
    /// Object shapes become interfaces; everything else becomes a type alias
    /// of its structural mapping. A name seen twice keeps its first
    /// declaration.
    pub fn render(&self, schemas: &[NamedSchema]) -> String {
        let mut seen = HashSet::new();
        let blocks: Vec<String> = schemas
            .iter()
            .filter(|named| {
                let fresh = seen.insert(named.name.as_str());
                if !fresh {
                    debug!(name = %named.name, "skipping duplicate schema declaration");
                }
                fresh
            })
            .map(|named| self.declaration(named))
            .collect();

        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push('\n');

        if blocks.is_empty() {
            out.push_str("export {};\n");
        } else {
            out.push_str(&blocks.join("\n"));
        }
        out
    }

    fn declaration(&self, named: &NamedSchema) -> String {
        let mut out = String::new();
        if let Some(description) = &named.description {
            out.push_str(&doc_comment(description, ""));
        }

        match &named.schema {
            Schema::Object(object) => {
                trace!(name = %named.name, "declaring interface");
                out.push_str(&self.interface(&named.name, object));
            }
            schema => {
                trace!(name = %named.name, "declaring type alias");
                out.push_str(&format!(
                    "export type {} = {};\n",
                    named.name,
                    self.mapper.map_structural(schema)
                ));
            }
        }
        out
    }

    fn interface(&self, name: &str, object: &ObjectSchema) -> String {
        let properties = object.properties.as_deref().unwrap_or_default();
        if properties.is_empty() && object.additional_properties.is_none() {
            return format!("export interface {} {{}}\n", name);
        }

        let mut out = format!("export interface {} {{\n", name);
        for property in properties {
            if let Some(description) = &property.description {
                out.push_str(&doc_comment(description, "  "));
            }
            out.push_str(&format!(
                "  {}{}: {};\n",
                property_key(&property.name),
                if property.required { "" } else { "?" },
                self.mapper.map_structural(&property.schema)
            ));
        }
        if object.additional_properties.is_some() {
            out.push_str("  [key: string]: unknown;\n");
        }
        out.push_str("}\n");
        out
    }
}
