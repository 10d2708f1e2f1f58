//! Generation pipeline.
//!
//! Walks a loaded [`Document`] once: every operation that is not excluded is
//! named, de-duplicated and rendered as a stub, then every reusable schema is
//! rendered into the type-declarations module. The result is held in memory;
//! writing it anywhere is the caller's business.

use crate::document::{Document, Method, Operation};
use crate::emit::{GeneratedModule, StubEmitter, StubImports, StubIndex, TypeEmitter};
use crate::naming::{derive_layout, NameCounter};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// An operation that never gets a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedOperation {
    pub method: Method,

    /// Route template, compared literally.
    pub path: String,
}

impl ExcludedOperation {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Whether this entry excludes the given operation.
    pub fn matches(&self, route: &str, method: Method) -> bool {
        self.method == method && self.path == route
    }
}

impl Default for ExcludedOperation {
    fn default() -> Self {
        Self::new(Method::Get, "/v0/health")
    }
}

impl fmt::Display for ExcludedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Parses `"METHOD /route"`.
impl FromStr for ExcludedOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (method, path) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("expected \"METHOD /route\", got '{}'", s.trim()))?;

        let path = path.trim();
        if path.is_empty() {
            return Err(format!("missing route in '{}'", s.trim()));
        }

        Ok(Self::new(method.parse()?, path))
    }
}

/// Where generated modules go and how they import each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Directory holding the index and the `api/` stub tree.
    pub out_dir: PathBuf,

    /// Index module filename inside `out_dir`.
    pub index_file: String,

    /// Directory holding the type-declarations module.
    pub types_dir: PathBuf,

    /// Type-declarations module filename inside `types_dir`.
    pub types_file: String,

    /// Module specifiers imported by every stub.
    pub imports: StubImports,

    /// Operations skipped entirely.
    pub exclude: Vec<ExcludedOperation>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("./src/generated"),
            index_file: "index.ts".to_string(),
            types_dir: PathBuf::from("./src/generated/types"),
            types_file: "api.ts".to_string(),
            imports: StubImports::default(),
            exclude: vec![ExcludedOperation::default()],
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// One module per emitted operation, in traversal order.
    pub stubs: Vec<GeneratedModule>,

    /// Index re-exporting every stub.
    pub index: GeneratedModule,

    /// Type-declarations module.
    pub types: GeneratedModule,

    /// Exclusions that matched no operation.
    pub unmatched_exclusions: Vec<ExcludedOperation>,
}

impl GeneratedOutput {
    /// Every module, stubs first, then the index and the types module.
    pub fn modules(&self) -> impl Iterator<Item = &GeneratedModule> {
        self.stubs
            .iter()
            .chain(std::iter::once(&self.index))
            .chain(std::iter::once(&self.types))
    }

    pub fn module_count(&self) -> usize {
        self.stubs.len() + 2
    }
}

/// Turns a document into generated modules.
pub struct StubGenerator {
    options: GeneratorOptions,
    stubs: StubEmitter,
    types: TypeEmitter,
}

impl StubGenerator {
    /// Create a generator with the given options.
    pub fn new(options: GeneratorOptions) -> Self {
        let stubs = StubEmitter::new(options.imports.clone());
        Self {
            options,
            stubs,
            types: TypeEmitter::new(),
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Run the pipeline over a document.
    ///
    /// Each call starts from a fresh [`NameCounter`], so repeated calls with
    /// the same document yield identical output.
    pub fn generate(&self, document: &Document) -> GeneratedOutput {
        let mut counter = NameCounter::new();
        let mut index = StubIndex::new();
        let mut stubs = Vec::new();
        let mut matched = vec![false; self.options.exclude.len()];

        for (route, operation) in document.operations() {
            if let Some(i) = self.exclusion_index(route, operation) {
                debug!(method = %operation.method, route, "excluded operation");
                matched[i] = true;
                continue;
            }

            let mut layout = derive_layout(route, operation.method, operation);
            layout.function_name = counter.claim(&layout.function_name);

            let module_path = layout.module_path();
            debug!(
                method = %operation.method,
                route,
                module = %module_path,
                "emitting stub"
            );

            stubs.push(GeneratedModule::new(
                self.options.out_dir.join(format!("{}.ts", module_path)),
                self.stubs.render(&layout, route, operation),
            ));
            index.push(module_path);
        }

        let unmatched_exclusions: Vec<ExcludedOperation> = self
            .options
            .exclude
            .iter()
            .zip(&matched)
            .filter(|(_, matched)| !**matched)
            .map(|(exclusion, _)| exclusion.clone())
            .collect();
        for exclusion in &unmatched_exclusions {
            debug!(%exclusion, "exclusion matched no operation");
        }

        let index = GeneratedModule::new(
            self.options.out_dir.join(&self.options.index_file),
            index.render(),
        );
        let types = GeneratedModule::new(
            self.options.types_dir.join(&self.options.types_file),
            self.types.render(&document.schemas),
        );

        info!(
            stubs = stubs.len(),
            schemas = document.schemas.len(),
            "generation complete"
        );

        GeneratedOutput {
            stubs,
            index,
            types,
            unmatched_exclusions,
        }
    }

    fn exclusion_index(&self, route: &str, operation: &Operation) -> Option<usize> {
        self.options
            .exclude
            .iter()
            .position(|exclusion| exclusion.matches(route, operation.method))
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::path::Path;

    fn document(value: Value) -> Document {
        Document::decode(&value).unwrap()
    }

    fn stub_paths(output: &GeneratedOutput) -> Vec<&Path> {
        output.stubs.iter().map(|m| m.path.as_path()).collect()
    }

    // =========================================================================
    // Exclusions
    // =========================================================================

    #[test]
    fn test_parse_exclusion() {
        let exclusion: ExcludedOperation = "get /v0/health".parse().unwrap();
        assert_eq!(exclusion, ExcludedOperation::new(Method::Get, "/v0/health"));
        assert_eq!(exclusion.to_string(), "GET /v0/health");

        let exclusion: ExcludedOperation = "  DELETE   /v1/bets/{id} ".parse().unwrap();
        assert_eq!(exclusion.method, Method::Delete);
        assert_eq!(exclusion.path, "/v1/bets/{id}");
    }

    #[test]
    fn test_parse_exclusion_errors() {
        assert!("GET".parse::<ExcludedOperation>().is_err());
        assert!("FETCH /v0/health".parse::<ExcludedOperation>().is_err());
        assert!("".parse::<ExcludedOperation>().is_err());
    }

    #[test]
    fn test_exclusion_matches_literally() {
        let exclusion = ExcludedOperation::default();
        assert!(exclusion.matches("/v0/health", Method::Get));
        assert!(!exclusion.matches("/v0/health/", Method::Get));
        assert!(!exclusion.matches("/v0/health", Method::Post));
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    #[test]
    fn test_health_check_excluded_by_default() {
        let doc = document(json!({
            "paths": {
                "/v0/health": { "get": {}, "post": {} },
                "/v0/markets": { "get": { "tags": ["Markets"] } }
            }
        }));

        let output = StubGenerator::default().generate(&doc);

        assert_eq!(
            stub_paths(&output),
            vec![
                Path::new("./src/generated/api/v0/misc/postMisc.ts"),
                Path::new("./src/generated/api/v0/markets/getMarkets.ts"),
            ]
        );
        assert!(!output.index.contents.contains("getMisc"));
        assert!(output.unmatched_exclusions.is_empty());
    }

    #[test]
    fn test_excluded_operations_claim_no_name() {
        let doc = document(json!({
            "paths": {
                "/v0/a/{id}": { "get": {} },
                "/v0/b/{id}": { "get": {} }
            }
        }));
        let options = GeneratorOptions {
            exclude: vec![ExcludedOperation::new(Method::Get, "/v0/a/{id}")],
            ..GeneratorOptions::default()
        };

        let output = StubGenerator::new(options).generate(&doc);

        assert_eq!(output.stubs.len(), 1);
        assert!(output.stubs[0].path.ends_with("api/v0/misc/getById.ts"));
    }

    #[test]
    fn test_unmatched_exclusions_reported() {
        let doc = document(json!({ "paths": { "/v0/markets": { "get": {} } } }));
        let output = StubGenerator::default().generate(&doc);

        assert_eq!(output.unmatched_exclusions, vec![ExcludedOperation::default()]);
    }

    #[test]
    fn test_collisions_suffixed_in_traversal_order() {
        let doc = document(json!({
            "paths": {
                "/v0/bets/{id}": { "delete": {}, "get": {} },
                "/v1/bets/{id}": { "get": {} }
            }
        }));

        let output = StubGenerator::default().generate(&doc);
        let index = &output.index.contents;

        let expected = [
            "./api/v0/misc/getById\"",
            "./api/v0/misc/deleteById\"",
            "./api/v1/misc/getById2\"",
        ];
        let positions: Vec<usize> = expected.iter().map(|e| index.find(e).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_suffixed_duplicate_skips_name_ending_in_digit() {
        let doc = document(json!({
            "paths": {
                "/v0/a/{id}": { "get": {} },
                "/v0/b/{id2}": { "get": {} },
                "/v0/c/{id}": { "get": {} }
            }
        }));

        let output = StubGenerator::default().generate(&doc);

        assert_eq!(
            stub_paths(&output),
            vec![
                Path::new("./src/generated/api/v0/misc/getById.ts"),
                Path::new("./src/generated/api/v0/misc/getById2.ts"),
                Path::new("./src/generated/api/v0/misc/getById3.ts"),
            ]
        );
        assert_eq!(
            output.index.contents.matches("./api/v0/misc/getById2\"").count(),
            1
        );
        assert!(output.stubs[2]
            .contents
            .contains("export async function getById3("));
    }

    #[test]
    fn test_output_locations() {
        let doc = document(json!({
            "paths": { "/v0/markets/{id}": { "get": { "tags": ["Markets"] } } }
        }));
        let options = GeneratorOptions {
            out_dir: PathBuf::from("out"),
            index_file: "api.ts".to_string(),
            types_dir: PathBuf::from("types"),
            types_file: "schema.d.ts".to_string(),
            ..GeneratorOptions::default()
        };

        let output = StubGenerator::new(options).generate(&doc);

        assert_eq!(output.stubs[0].path, Path::new("out/api/v0/markets/getById.ts"));
        assert_eq!(output.index.path, Path::new("out/api.ts"));
        assert_eq!(output.types.path, Path::new("types/schema.d.ts"));
        assert_eq!(output.module_count(), 3);
        assert_eq!(output.modules().count(), 3);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let doc = document(json!({
            "paths": {
                "/v0/x/{id}": { "get": {}, "put": {} },
                "/v1/x/{id}": { "get": {} }
            }
        }));
        let generator = StubGenerator::default();
        assert_eq!(generator.generate(&doc), generator.generate(&doc));
    }
}
