//! TypeScript emitters.
//!
//! # Components
//!
//! - [`StubEmitter`] - renders one operation stub module
//! - [`StubIndex`] - accumulates re-exports of every emitted stub
//! - [`TypeEmitter`] - renders the type-declarations module
//!
//! Every emitter returns strings; nothing here touches the filesystem.

pub mod stub;
pub mod types;

pub use stub::{StubEmitter, StubImports, StubIndex};
pub use types::TypeEmitter;

use std::path::PathBuf;

/// Banner at the top of every generated module.
pub const GENERATED_HEADER: &str = "// Auto-generated by apistub. Do not edit manually.\n";

/// A rendered module and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Output path, already joined with the configured output directory.
    pub path: PathBuf,

    /// Complete file contents.
    pub contents: String,
}

impl GeneratedModule {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Render a JSDoc comment at the given indentation.
///
/// A single line renders inline (`/** text */`); anything longer renders as a
/// block. Empty lines are kept as bare ` *` separators.
pub(crate) fn doc_comment(text: &str, indent: &str) -> String {
    let lines: Vec<String> = text.lines().map(|line| escape_comment(line.trim_end())).collect();

    if lines.len() == 1 {
        return format!("{indent}/** {} */\n", lines[0]);
    }

    let mut out = format!("{indent}/**\n");
    for line in &lines {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

/// Keep comment text from closing the comment early.
fn escape_comment(s: &str) -> String {
    s.replace("*/", "*\\/")
}

/// Escape a string for use inside a double-quoted TypeScript literal.
pub(crate) fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Render an object key, quoting it unless it is a plain identifier.
pub(crate) fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        name.to_string()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}
