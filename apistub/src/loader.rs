//! Specification loader.
//!
//! Reads an API description document from disk, parses it as JSON or YAML and
//! performs the minimal validation the generator depends on. Key order of the
//! input is preserved in both formats.

use crate::document::Document;
use crate::error::{LoadError, LoadResult};
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::debug;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Detect the format from a file extension. Anything but `.yaml`/`.yml`
    /// is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SpecFormat::Yaml
            }
            _ => SpecFormat::Json,
        }
    }
}

/// Loader for API description documents.
pub struct SpecLoader;

impl SpecLoader {
    /// Load and validate the document at `path`.
    pub fn load(path: &Path) -> LoadResult<Document> {
        if !path.exists() {
            return Err(LoadError::not_found(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let format = SpecFormat::from_path(path);
        debug!(path = %path.display(), ?format, bytes = content.len(), "loading specification");

        Self::load_str(&content, format, path)
    }

    /// Parse and validate an in-memory document.
    ///
    /// `origin` is only used to label errors.
    pub fn load_str(content: &str, format: SpecFormat, origin: &Path) -> LoadResult<Document> {
        let value = match format {
            SpecFormat::Json => serde_json::from_str::<Value>(content)
                .map_err(|e| LoadError::parse(origin.to_path_buf(), e.to_string()))?,
            SpecFormat::Yaml => serde_yaml::from_str::<serde_yaml::Value>(content)
                .map(yaml_to_json)
                .map_err(|e| LoadError::parse(origin.to_path_buf(), e.to_string()))?,
        };

        Document::decode(&value).map_err(|reason| LoadError::invalid(origin.to_path_buf(), reason))
    }
}

/// Convert a YAML value into JSON, stringifying scalar mapping keys.
///
/// YAML allows unquoted integer keys such as `200:` under `responses`; JSON
/// object keys must be strings. Keys that are not scalars are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    _ => continue,
                };
                map.insert(key, yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SpecFormat::from_path(Path::new("a.yaml")), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path(Path::new("a.YML")), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path(Path::new("a.json")), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path(Path::new("openapi")), SpecFormat::Json);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SpecLoader::load(Path::new("/nonexistent/openapi.json"));
        assert!(matches!(result, Err(LoadError::SpecNotFound { .. })));
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("openapi.json");
        fs::write(&path, r#"{ "paths": { "/v0/me": { "get": {} } } }"#).unwrap();

        let doc = SpecLoader::load(&path).unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].route, "/v0/me");
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let result = SpecLoader::load_str("{ not json", SpecFormat::Json, Path::new("x.json"));
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_missing_paths() {
        let result = SpecLoader::load_str(
            r#"{ "openapi": "3.0.0" }"#,
            SpecFormat::Json,
            Path::new("x.json"),
        );
        assert!(matches!(
            result,
            Err(LoadError::InvalidSpec {
                reason: DocumentError::MissingPaths,
                ..
            })
        ));

        let result = SpecLoader::load_str("[]", SpecFormat::Json, Path::new("x.json"));
        assert!(matches!(
            result,
            Err(LoadError::InvalidSpec {
                reason: DocumentError::RootNotObject,
                ..
            })
        ));
    }

    #[test]
    fn test_load_yaml_with_integer_status_keys() {
        let yaml = r#"
paths:
  /v0/markets:
    get:
      tags: [Markets]
      responses:
        200:
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Market'
"#;
        let doc = SpecLoader::load_str(yaml, SpecFormat::Yaml, &PathBuf::from("x.yaml")).unwrap();
        let op = &doc.paths[0].operations[0];
        assert_eq!(op.responses[0].status, "200");
        assert!(op.response("200").unwrap().content.is_some());
    }

    #[test]
    fn test_yaml_preserves_key_order() {
        let yaml = "paths:\n  /b: {}\n  /a: {}\n  /c: {}\n";
        let doc = SpecLoader::load_str(yaml, SpecFormat::Yaml, Path::new("x.yaml")).unwrap();
        let routes: Vec<_> = doc.paths.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(routes, vec!["/b", "/a", "/c"]);
    }
}
