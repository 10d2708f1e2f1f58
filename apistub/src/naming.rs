//! Endpoint naming.
//!
//! Derives where a stub lives and what it is called from nothing but the
//! route, the HTTP method and the operation's tags, then makes the derived
//! names unique across one generation run.
//!
//! ```text
//! GET /v0/markets/{id}  tags: [Markets]
//!      │    │       │
//!      │    │       └─ token "by-id" ─► PascalCase "ById"
//!      │    └───────── resource, covered by the topic
//!      └────────────── version "v0"
//!
//! topic:         first tag "Markets" ─► "markets"
//! function name: "get" + "ById" = "getById"
//! module path:   api/v0/markets/getById
//! ```

use crate::document::{Method, Operation};
use convert_case::{Case, Casing};
use std::collections::{HashMap, HashSet};

/// Version used when the route has no `v<digits>` segment.
pub const DEFAULT_VERSION: &str = "v0";

/// Topic used when the operation has no tags.
pub const DEFAULT_TOPIC: &str = "misc";

/// Placement and name of one generated stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointLayout {
    /// API version segment, e.g. `v0`.
    pub version: String,

    /// Camel-cased topic, e.g. `markets`.
    pub topic: String,

    /// Exported function name, e.g. `getById`.
    pub function_name: String,
}

impl EndpointLayout {
    /// Module path relative to the output directory, without extension.
    pub fn module_path(&self) -> String {
        format!("api/{}/{}/{}", self.version, self.topic, self.function_name)
    }
}

/// Derive the layout of an operation.
///
/// The name is built from the route segments that follow the version and
/// resource segments: `{param}` segments become `by-param`, the rest pass
/// through, and the joined tokens are PascalCased behind the lower-case
/// method. A route with no segments left falls back to the first tag, then
/// to the topic.
pub fn derive_layout(route: &str, method: Method, operation: &Operation) -> EndpointLayout {
    let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    let version_index = segments.iter().position(|s| is_version_segment(s));

    let version = version_index
        .map(|i| segments[i].to_string())
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());

    let first_tag = operation.tags.first();
    let topic = first_tag
        .map(|tag| to_camel(tag))
        .filter(|topic| !topic.is_empty())
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

    // The segment right after the version names the resource.
    let start = version_index.map_or(0, |i| i + 1);
    let rest = segments.get(start + 1..).unwrap_or(&[]);
    let tokens: Vec<String> = rest.iter().map(|s| tokenize_segment(s)).collect();

    let slug = if tokens.is_empty() {
        first_tag.cloned().unwrap_or_else(|| topic.clone())
    } else {
        tokens.join("_")
    };

    EndpointLayout {
        version,
        topic,
        function_name: format!("{}{}", method.as_str(), to_pascal(&slug)),
    }
}

/// Whether a path segment is `v` followed by one or more digits.
fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// `{id}` becomes `by-id`; anything else is kept verbatim.
fn tokenize_segment(segment: &str) -> String {
    match segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
    {
        Some(param) => format!("by-{}", param),
        None => segment.to_string(),
    }
}

/// Normalize every run of non-alphanumeric characters to a single `_` so the
/// case conversion only ever sees identifier characters.
fn identifier_words(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn to_pascal(s: &str) -> String {
    identifier_words(s).to_case(Case::Pascal)
}

fn to_camel(s: &str) -> String {
    identifier_words(s).to_case(Case::Camel)
}

/// Counting accumulator that makes derived names unique.
///
/// The first claim of a free name returns it unchanged. The Nth claim of a
/// name returns it suffixed with the smallest number from N upwards whose
/// result is not already taken, so a derived name that happens to end in a
/// digit cannot shadow a later suffixed duplicate. Uniqueness depends on
/// claims being made in a fixed traversal order. A counter belongs to
/// exactly one generation run.
#[derive(Debug, Default, Clone)]
pub struct NameCounter {
    counts: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl NameCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a name, returning the unique form to emit.
    pub fn claim(&mut self, name: &str) -> String {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count += 1;

        if *count == 1 && self.taken.insert(name.to_string()) {
            return name.to_string();
        }

        let mut suffix = (*count).max(2);
        loop {
            let candidate = format!("{}{}", name, suffix);
            if self.taken.insert(candidate.clone()) {
                *count = suffix;
                return candidate;
            }
            suffix += 1;
        }
    }
}
