use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Tree diagrams for YANG-style schema modules.
///
/// schema-tree loads JSON schema descriptions (modules, imports, features,
/// augments) and prints the indented tree diagrams used in RFC 8340.
#[derive(Parser)]
#[command(
    name = "schema-tree",
    version,
    about = "Render schema modules as tree diagrams",
    after_help = "Use 'schema-tree <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: SCHEMA_TREE_CONFIG]
    #[arg(short = 'c', long = "config", global = true, env = "SCHEMA_TREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Render tree diagrams of schema modules
    Tree(TreeArgs),

    /// Load and validate schema description files
    Check(CheckArgs),

    /// Summarise the modules of a schema set
    Inspect(InspectArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Arguments for `schema-tree tree`.
#[derive(Args)]
pub struct TreeArgs {
    /// Description files or directories (default: [cli] default_schema_dir)
    pub paths: Vec<PathBuf>,

    /// Module or submodule to render (default: every main module)
    #[arg(short = 'm', long = "module")]
    pub module: Option<String>,

    /// Render only the subtree at this schema path, e.g. /ex:system/ex:server
    #[arg(short = 'p', long = "path", requires = "module")]
    pub target: Option<String>,

    /// Wrap the type column past this many characters (0 disables)
    #[arg(short = 'l', long = "line-length")]
    pub line_length: Option<u16>,

    /// RFC 8340 output: prefixes instead of module names, no defaults
    #[arg(long = "rfc")]
    pub rfc: bool,

    /// Append the module's groupings
    #[arg(long = "groupings")]
    pub groupings: bool,

    /// Show uses statements instead of expanding them
    #[arg(long = "uses")]
    pub uses: bool,

    /// Print 'leafref' instead of leafref target paths
    #[arg(long = "no-leafref-target")]
    pub no_leafref_target: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Arguments for `schema-tree check`.
#[derive(Args)]
pub struct CheckArgs {
    /// Description files or directories (default: [cli] default_schema_dir)
    pub paths: Vec<PathBuf>,
}

/// Arguments for `schema-tree inspect`.
#[derive(Args)]
pub struct InspectArgs {
    /// Description files or directories (default: [cli] default_schema_dir)
    pub paths: Vec<PathBuf>,

    /// Show a single module
    #[arg(short = 'm', long = "module")]
    pub module: Option<String>,
}

/// Arguments for `schema-tree completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell: bash, zsh, fish, powershell, elvish
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_args() {
        let cli = Cli::try_parse_from(["schema-tree", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn parse_global_verbose() {
        let cli = Cli::try_parse_from(["schema-tree", "-vvv", "check"]).unwrap();
        assert_eq!(cli.global.verbose, 3);
    }

    #[test]
    fn parse_global_quiet() {
        let cli = Cli::try_parse_from(["schema-tree", "-q", "check"]).unwrap();
        assert!(cli.global.quiet);
    }

    #[test]
    fn parse_global_format_json() {
        let cli = Cli::try_parse_from(["schema-tree", "--format", "json", "check"]).unwrap();
        assert_eq!(cli.global.format, "json");
    }

    #[test]
    fn parse_tree_command() {
        let cli = Cli::try_parse_from([
            "schema-tree",
            "tree",
            "schemas/",
            "-m",
            "example",
            "-p",
            "/system",
            "-l",
            "72",
            "--rfc",
        ])
        .unwrap();
        let Commands::Tree(args) = cli.command else {
            panic!("expected Tree command");
        };
        assert_eq!(args.paths, vec![PathBuf::from("schemas/")]);
        assert_eq!(args.module.as_deref(), Some("example"));
        assert_eq!(args.target.as_deref(), Some("/system"));
        assert_eq!(args.line_length, Some(72));
        assert!(args.rfc);
        assert!(!args.groupings);
    }

    #[test]
    fn subtree_path_requires_module() {
        assert!(Cli::try_parse_from(["schema-tree", "tree", "-p", "/system"]).is_err());
    }

    #[test]
    fn parse_inspect_command() {
        let cli = Cli::try_parse_from(["schema-tree", "inspect", "-m", "example", "a.json"]).unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("expected Inspect command");
        };
        assert_eq!(args.module.as_deref(), Some("example"));
        assert_eq!(args.paths, vec![PathBuf::from("a.json")]);
    }
}
