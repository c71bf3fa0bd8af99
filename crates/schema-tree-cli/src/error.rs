use std::path::PathBuf;

use schema_tree_core::SchemaError;
use schema_tree_printer::TreeError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage error
/// - 3: description load or validation failure
/// - 4: subtree path matched no node, or several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    #[allow(dead_code)]
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    LoadError = 3,
    PathError = 4,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A description file is not valid JSON or does not match the format.
    #[error("invalid description in {}: {error}", file.display())]
    Description {
        error: SchemaError,
        source_text: String,
        file: PathBuf,
    },

    /// `check` found description files that do not load.
    #[error("{failed} description file(s) failed to load")]
    InvalidFiles { failed: usize },

    /// The merged descriptions do not compile into a schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Rendering failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// IO errors (file not found, permission denied).
    #[error("IO error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// No description files under the given path.
    #[error("no description files found in {}", path.display())]
    NoSchemaFiles { path: PathBuf },

    /// `-m` named a module the loaded descriptions do not define.
    #[error("module '{name}' not found")]
    ModuleNotFound { name: String },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Description { .. } | Self::InvalidFiles { .. } | Self::Schema(_) => {
                ExitCode::LoadError
            }
            Self::Tree(TreeError::PathNotFound { .. } | TreeError::PathAmbiguous { .. }) => {
                ExitCode::PathError
            }
            Self::Config { .. } | Self::NoSchemaFiles { .. } | Self::ModuleNotFound { .. } => {
                ExitCode::InvalidArguments
            }
            Self::Tree(_) | Self::Io { .. } | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Description { error, file, .. } => {
                let mut json = serde_json::json!({
                    "error": "description_error",
                    "file": file.display().to_string(),
                    "message": error.to_string(),
                });
                if let SchemaError::InvalidDescription { line, column, .. } = error {
                    json["line"] = (*line).into();
                    json["column"] = (*column).into();
                }
                json
            }
            Self::Schema(e) => serde_json::json!({
                "error": "schema_error",
                "message": e.to_string(),
            }),
            Self::Tree(TreeError::PathAmbiguous { path, matches }) => serde_json::json!({
                "error": "path_ambiguous",
                "path": path,
                "matches": matches,
            }),
            Self::Tree(TreeError::PathNotFound { path }) => serde_json::json!({
                "error": "path_not_found",
                "path": path,
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
