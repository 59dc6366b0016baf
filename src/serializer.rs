//! Serialization module for converting assembled documents to JSON or YAML.
//!
//! Serialization is a direct structural transcription: unset optional fields
//! are omitted, and map order follows insertion order.

use crate::definitions::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to JSON with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Parent
/// directories are created as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!(
        "Successfully wrote {} bytes to {}",
        content.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SpecificationBuilder;
    use crate::routes::RouteCollection;
    use tempfile::TempDir;

    fn empty_document() -> OpenApiDocument {
        SpecificationBuilder::new().build(&RouteCollection::new())
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&empty_document()).unwrap();
        assert!(json.contains("\"openapi\": \"3.0.0\""));
        assert!(json.contains("\"title\": \"API\""));
        // Unset optionals must be omitted, not emitted as null.
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&empty_document()).unwrap();
        assert!(yaml.contains("openapi: 3.0.0") || yaml.contains("openapi: '3.0.0'"));
        assert!(yaml.contains("title: API"));
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/openapi.json");

        let json = serialize_json(&empty_document()).unwrap();
        write_to_file(&json, &path).unwrap();

        let read_back = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_back, json);
    }
}
