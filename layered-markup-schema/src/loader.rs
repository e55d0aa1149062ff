//! Schema file loading.

use std::fs;
use std::path::Path;

use crate::{Schema, SchemaError};

/// Load a single YAML schema file.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaError> {
    let content = fs::read_to_string(path).map_err(|e| SchemaError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "loading schema");
    Schema::from_yaml(&content)
}

/// Load every `*.yaml` / `*.yml` schema directly inside `dir`, sorted by
/// file name.
pub fn load_all_schemas(dir: &Path) -> Result<Vec<(String, Schema)>, SchemaError> {
    let entries = fs::read_dir(dir).map_err(|e| SchemaError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut schemas = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SchemaError::Load {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml");
        if path.is_file() && is_yaml {
            let name = entry.file_name().to_string_lossy().into_owned();
            schemas.push((name, load_schema(&path)?));
        }
    }
    schemas.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(schemas)
}
