//! Operation stub emitter.
//!
//! Each stub is a standalone module exporting one asynchronous function whose
//! signature is typed from the operation's request body and success response,
//! and whose body throws until someone implements it. Stubs import the shared
//! request-transport helper so an implementation can call it, but the
//! generated body never does.

use super::{doc_comment, escape_string, GENERATED_HEADER};
use crate::document::{Content, Operation};
use crate::naming::EndpointLayout;
use crate::type_mapper::{TypeMapper, UNKNOWN_TYPE, VOID_TYPE};

/// Statuses whose content decides the result type, in preference order.
pub const SUCCESS_STATUSES: [&str; 3] = ["200", "201", "202"];

/// Status whose presence means the operation returns nothing.
pub const NO_CONTENT_STATUS: &str = "204";

/// Module specifiers the stubs import from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubImports {
    /// Specifier of the type-declarations module.
    pub types: String,

    /// Specifier of the request-transport helper.
    pub transport: String,
}

impl Default for StubImports {
    fn default() -> Self {
        Self {
            types: "@/generated/types/api".to_string(),
            transport: "@/lib/api/request".to_string(),
        }
    }
}

/// Renders operation stub modules.
#[derive(Debug, Clone)]
pub struct StubEmitter {
    mapper: TypeMapper,
    imports: StubImports,
}

impl Default for StubEmitter {
    fn default() -> Self {
        Self::new(StubImports::default())
    }
}

impl StubEmitter {
    /// Create an emitter importing from the given modules.
    pub fn new(imports: StubImports) -> Self {
        Self {
            mapper: TypeMapper::new(),
            imports,
        }
    }

    /// Render the stub module for one operation.
    pub fn render(&self, layout: &EndpointLayout, route: &str, operation: &Operation) -> String {
        let method = operation.method.to_string();
        let name = &layout.function_name;

        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push_str("// Regenerating overwrites this file, including any implementation added by hand.\n");
        out.push_str("/* eslint-disable @typescript-eslint/no-unused-vars */\n\n");

        out.push_str(&format!(
            "import type * as {} from \"{}\";\n",
            self.mapper.namespace(),
            escape_string(&self.imports.types)
        ));
        out.push_str(&format!(
            "import {{ request, type ApiContext }} from \"{}\";\n\n",
            escape_string(&self.imports.transport)
        ));

        let signature_line = format!("{} {}", method, route);
        match operation.summary.as_ref().or(operation.description.as_ref()) {
            Some(text) => out.push_str(&doc_comment(&format!("{}\n\n{}", text, signature_line), "")),
            None => out.push_str(&format!("// {}\n", signature_line)),
        }

        let params = match self.request_type(operation) {
            Some(ty) => format!("params: {}", ty),
            None => format!("params?: {}", UNKNOWN_TYPE),
        };

        out.push_str(&format!(
            "export async function {}(ctx: ApiContext, {}): Promise<{}> {{\n",
            name,
            params,
            self.response_type(operation)
        ));
        out.push_str(&format!(
            "  throw new Error(\"{} is not implemented ({})\");\n",
            name,
            escape_string(&signature_line)
        ));
        out.push_str("}\n");

        out
    }

    /// Qualified type of the request body, if it has one.
    pub fn request_type(&self, operation: &Operation) -> Option<String> {
        operation
            .request_body
            .as_ref()
            .and_then(|content| self.content_type(content))
    }

    /// Result type of the operation.
    ///
    /// A `204` response anywhere means `void`. Otherwise the first of
    /// `200`, `201`, `202` carrying a media entry with a schema decides the
    /// type; with none, or with an inline schema, the result is `unknown`.
    pub fn response_type(&self, operation: &Operation) -> String {
        if operation.response(NO_CONTENT_STATUS).is_some() {
            return VOID_TYPE.to_string();
        }

        SUCCESS_STATUSES
            .iter()
            .filter_map(|status| operation.response(status))
            .find_map(|response| {
                let media = response.content.as_ref()?.preferred()?;
                let schema = media.schema.as_ref()?;
                Some(
                    self.mapper
                        .map_qualified(schema)
                        .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
                )
            })
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
    }

    fn content_type(&self, content: &Content) -> Option<String> {
        let schema = content.preferred()?.schema.as_ref()?;
        self.mapper.map_qualified(schema)
    }
}

/// Accumulates one re-export per emitted stub.
#[derive(Debug, Default, Clone)]
pub struct StubIndex {
    entries: Vec<String>,
}

impl StubIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stub by its module path relative to the index.
    pub fn push(&mut self, module_path: impl Into<String>) {
        self.entries.push(module_path.into());
    }

    /// Recorded module paths in emission order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the index module.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push('\n');

        if self.entries.is_empty() {
            out.push_str("export {};\n");
            return out;
        }

        for entry in &self.entries {
            out.push_str(&format!("export * from \"./{}\";\n", escape_string(entry)));
        }
        out
    }
}
