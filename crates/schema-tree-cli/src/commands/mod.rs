pub mod check;
pub mod completions;
pub mod inspect;
pub mod tree;

use std::path::{Path, PathBuf};

use schema_tree_core::description::ContextDescription;
use schema_tree_core::{ModuleId, SchemaContext, SchemaError};

use crate::error::CliError;

/// A compiled schema set and the files it was loaded from.
pub struct LoadedSchema {
    pub files: Vec<PathBuf>,
    pub modules: usize,
    pub context: SchemaContext,
}

/// Discover description files from a list of paths.
///
/// Paths can be files (used directly) or directories (searched recursively
/// for files matching `**/*.json`).
pub fn discover_description_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let pattern = path.join("**").join("*.json").display().to_string();
            let entries = glob::glob(&pattern).map_err(|e| CliError::Other(e.to_string()))?;
            for entry in entries {
                let entry = entry.map_err(|e| CliError::Other(e.to_string()))?;
                files.push(entry);
            }
        } else {
            return Err(CliError::NoSchemaFiles { path: path.clone() });
        }
    }

    if files.is_empty() {
        let display_path = paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("schemas/"));
        return Err(CliError::NoSchemaFiles { path: display_path });
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Reads one description file. Syntax errors keep the source text so they
/// can be shown with a snippet.
pub fn read_description(file: &Path) -> Result<ContextDescription, CliError> {
    let source_text = std::fs::read_to_string(file).map_err(|e| CliError::Io {
        path: file.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&source_text).map_err(|e| CliError::Description {
        error: SchemaError::from(e),
        source_text,
        file: file.to_path_buf(),
    })
}

/// Loads every description under `paths` and compiles them as one schema
/// set, so imports and augments may cross files.
pub fn load_schema(paths: &[PathBuf]) -> Result<LoadedSchema, CliError> {
    let files = discover_description_files(paths)?;
    let mut merged = ContextDescription {
        modules: Vec::new(),
    };
    for file in &files {
        let description = read_description(file)?;
        tracing::debug!(
            file = %file.display(),
            modules = description.modules.len(),
            "read description"
        );
        merged.modules.extend(description.modules);
    }
    let context = SchemaContext::from_description(&merged)?;
    tracing::info!(
        files = files.len(),
        modules = merged.modules.len(),
        nodes = context.node_count(),
        "schema loaded"
    );
    Ok(LoadedSchema {
        files,
        modules: merged.modules.len(),
        context,
    })
}

/// Looks up a module or submodule by name.
pub fn find_module(ctx: &SchemaContext, name: &str) -> Result<ModuleId, CliError> {
    ctx.module_by_name(name)
        .ok_or_else(|| CliError::ModuleNotFound {
            name: name.to_string(),
        })
}
