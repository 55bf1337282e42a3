//! Reading schema descriptions and configuration files.

use std::fs;
use std::path::Path;

use config_conformance_core::{CompiledSchema, SchemaDocument};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Serialization format of an input file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// `.yml` and `.yaml` files are YAML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Reads and deserializes a JSON or YAML file.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let format = InputFormat::from_path(path);
    debug!(path = %path.display(), ?format, bytes = text.len(), "parsing input");

    match format {
        InputFormat::Json => serde_json::from_str(&text)
            .map_err(|err| format!("Failed to parse '{}' as JSON: {err}", path.display())),
        InputFormat::Yaml => serde_yaml::from_str(&text)
            .map_err(|err| format!("Failed to parse '{}' as YAML: {err}", path.display())),
    }
}

/// Reads a schema description and resolves its types.
pub fn load_schema(path: &Path) -> Result<CompiledSchema, String> {
    let document: SchemaDocument = load_document(path)?;
    document
        .compile()
        .map_err(|err| format!("Invalid schema '{}': {err}", path.display()))
}
