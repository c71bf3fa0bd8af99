use std::path::{Path, PathBuf};

use schema_tree_printer::{RenderFlags, TreeOptions};
use serde::{Deserialize, Serialize};

use crate::cli::TreeArgs;
use crate::error::CliError;

/// CLI configuration loaded from schema-tree.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub cli: CliSettings,
}

/// Rendering defaults; each flag can also be switched on from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// 0 disables wrapping.
    pub line_length: u16,
    pub rfc: bool,
    pub groupings: bool,
    pub uses: bool,
    pub no_leafref_target: bool,
}

/// CLI-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_schema_dir")]
    pub default_schema_dir: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_schema_dir: default_schema_dir(),
        }
    }
}

fn default_schema_dir() -> String {
    "schemas/".to_string()
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit, or `SCHEMA_TREE_CONFIG` through clap)
/// 2. `./schema-tree.toml` (project-local)
/// 3. `$XDG_CONFIG_HOME/schema-tree/config.toml`
/// 4. `~/.config/schema-tree/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    let local = PathBuf::from("schema-tree.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("schema-tree/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/schema-tree/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    tracing::debug!(path = %path.display(), "loading config");
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

/// Merges `[tree]` settings with the `tree` flags. A `-l` value replaces the
/// configured width; boolean flags can only switch options on.
pub fn resolve_tree_options(settings: &TreeSettings, args: &TreeArgs) -> TreeOptions {
    let mut flags = RenderFlags::empty();
    flags.set(RenderFlags::RFC, settings.rfc || args.rfc);
    flags.set(RenderFlags::GROUPINGS, settings.groupings || args.groupings);
    flags.set(RenderFlags::USES, settings.uses || args.uses);
    flags.set(
        RenderFlags::NO_LEAFREF_TARGET,
        settings.no_leafref_target || args.no_leafref_target,
    );
    TreeOptions::new(args.line_length.unwrap_or(settings.line_length), flags)
}

/// The description paths to load: the ones given, else the configured
/// default directory.
pub fn resolve_schema_paths(paths: &[PathBuf], settings: &CliSettings) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(&settings.default_schema_dir)]
    } else {
        paths.to_vec()
    }
}
