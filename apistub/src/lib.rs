//! # apistub
//!
//! Generates TypeScript operation stubs and type declarations from an OpenAPI
//! document.
//!
//! Every operation becomes a standalone module exporting one typed, not yet
//! implemented async function, laid out by API version and topic. Every
//! reusable schema becomes an interface or type alias in a single
//! declarations module the stubs import under the `Types` namespace.
//!
//! ## Architecture
//!
//! - [`loader`] - reads JSON or YAML documents
//! - [`document`] - typed view of routes, operations and reusable schemas
//! - [`schema`] - schema model decoded once at the document boundary
//! - [`type_mapper`] - schema to TypeScript type expressions
//! - [`naming`] - stub placement, names and collision suffixes
//! - [`emit`] - stub, index and type-declarations renderers
//! - [`generator`] - the end-to-end pipeline
//! - [`error`] - load errors
//!
//! ## Example
//!
//! ```no_run
//! use apistub::{GeneratorOptions, SpecLoader, StubGenerator};
//! use std::path::Path;
//!
//! let document = SpecLoader::load(Path::new("openapi.json"))?;
//! let output = StubGenerator::new(GeneratorOptions::default()).generate(&document);
//! for module in output.modules() {
//!     println!("{}", module.path.display());
//! }
//! # Ok::<(), apistub::LoadError>(())
//! ```

pub mod document;
pub mod emit;
pub mod error;
pub mod generator;
pub mod loader;
pub mod naming;
pub mod schema;
pub mod type_mapper;

// Re-export main types for convenience
pub use document::{Document, Method, NamedSchema, Operation};
pub use emit::{GeneratedModule, StubEmitter, StubImports, StubIndex, TypeEmitter};
pub use error::{DocumentError, LoadError, LoadResult};
pub use generator::{ExcludedOperation, GeneratedOutput, GeneratorOptions, StubGenerator};
pub use loader::{SpecFormat, SpecLoader};
pub use naming::{derive_layout, EndpointLayout, NameCounter};
pub use schema::Schema;
pub use type_mapper::TypeMapper;
