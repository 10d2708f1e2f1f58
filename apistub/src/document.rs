//! Typed view of an API description document.
//!
//! The document is decoded from an order-preserving JSON value. Only the parts
//! the generator consumes are modelled: routes, operations and their
//! request/response content, and the reusable schemas under
//! `components.schemas`. Everything else is ignored.

use crate::error::DocumentError;
use crate::schema::{description_of, type_identifier, Schema};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A decoded API description document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Routes in document key order.
    pub paths: Vec<PathItem>,

    /// Reusable schemas in document key order.
    pub schemas: Vec<NamedSchema>,
}

/// All operations declared on one route.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    /// Route template, e.g. `/v0/markets/{id}`.
    pub route: String,

    /// Operations in [`Method::ALL`] order.
    pub operations: Vec<Operation>,
}

/// One HTTP method on one route.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: Method,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub request_body: Option<Content>,
    pub responses: Vec<Response>,
}

/// A response descriptor keyed by status code.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code exactly as written, e.g. `"200"` or `"default"`.
    pub status: String,
    pub content: Option<Content>,
}

/// Media-type map of a request body or response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Content {
    /// Entries in document order.
    pub media: Vec<MediaType>,
}

/// One media-type entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
    /// Media type label, e.g. `application/json`.
    pub name: String,
    pub schema: Option<Schema>,
}

/// A named reusable schema.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSchema {
    pub name: String,
    pub description: Option<String>,
    pub schema: Schema,
}

/// HTTP methods recognized under a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Trace,
}

impl Method {
    /// Every recognized method, in traversal priority order.
    pub const ALL: [Method; 8] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Trace,
    ];

    /// Lower-case key used in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Options => "options",
            Method::Head => "head",
            Method::Trace => "trace",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown HTTP method '{}'", s.trim()))
    }
}

impl Document {
    /// Decode a document from a parsed value.
    ///
    /// Fails only when the value is not an object or lacks an object-valued
    /// `paths`.
    pub fn decode(value: &Value) -> Result<Self, DocumentError> {
        let root = value.as_object().ok_or(DocumentError::RootNotObject)?;

        let paths = match root.get("paths") {
            Some(Value::Object(paths)) => paths,
            Some(_) => return Err(DocumentError::PathsNotObject),
            None => return Err(DocumentError::MissingPaths),
        };

        let paths = paths
            .iter()
            .map(|(route, item)| PathItem::decode(route, item))
            .collect();

        let schemas = value
            .pointer("/components/schemas")
            .and_then(Value::as_object)
            .map(|schemas| {
                schemas
                    .iter()
                    .map(|(name, schema)| NamedSchema {
                        name: type_identifier(name),
                        description: description_of(schema),
                        schema: Schema::from_value(schema),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { paths, schemas })
    }

    /// Iterate every operation in traversal order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths
            .iter()
            .flat_map(|item| item.operations.iter().map(move |op| (item.route.as_str(), op)))
    }
}

impl PathItem {
    fn decode(route: &str, item: &Value) -> Self {
        let operations = match item.as_object() {
            Some(methods) => Method::ALL
                .into_iter()
                .filter_map(|method| {
                    let op = methods.get(method.as_str())?;
                    Some(Operation::decode(method, op.as_object()?))
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            route: route.to_string(),
            operations,
        }
    }
}

impl Operation {
    fn decode(method: Method, op: &Map<String, Value>) -> Self {
        let tags = op
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let responses = op
            .get("responses")
            .and_then(Value::as_object)
            .map(|responses| {
                responses
                    .iter()
                    .map(|(status, response)| Response {
                        status: status.clone(),
                        content: response.get("content").and_then(Content::decode),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            method,
            operation_id: text(op, "operationId"),
            tags,
            summary: text(op, "summary"),
            description: text(op, "description"),
            request_body: op
                .get("requestBody")
                .and_then(|body| body.get("content"))
                .and_then(Content::decode),
            responses,
        }
    }

    /// Look up a response by exact status code.
    pub fn response(&self, status: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.status == status)
    }
}

impl Content {
    fn decode(value: &Value) -> Option<Self> {
        let media = value
            .as_object()?
            .iter()
            .map(|(name, entry)| MediaType {
                name: name.clone(),
                schema: entry.get("schema").map(Schema::from_value),
            })
            .collect();
        Some(Self { media })
    }

    /// The preferred entry: `application/json` if present, else the first.
    pub fn preferred(&self) -> Option<&MediaType> {
        self.media
            .iter()
            .find(|m| m.is_json())
            .or_else(|| self.media.first())
    }
}

impl MediaType {
    /// Whether the label is `application/json`, ignoring parameters.
    pub fn is_json(&self) -> bool {
        self.name
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
