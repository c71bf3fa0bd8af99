use std::io::Write;
use std::path::Path;

use schema_tree_core::{ModuleId, SchemaContext};
use schema_tree_printer::{render_tree, IoSink, Sink, TreeError, TreeOptions};

use crate::cli::{GlobalOpts, TreeArgs};
use crate::config::{load_config, resolve_schema_paths, resolve_tree_options};
use crate::error::CliError;
use crate::output::Reporter;

/// Run the `tree` command: render diagrams to stdout or a file.
pub fn run(args: TreeArgs, global: &GlobalOpts, reporter: &Reporter) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let options = resolve_tree_options(&config.tree, &args);
    let paths = resolve_schema_paths(&args.paths, &config.cli);
    let loaded = super::load_schema(&paths)?;
    let ctx = &loaded.context;

    let modules = match &args.module {
        Some(name) => vec![super::find_module(ctx, name)?],
        None => main_modules(ctx),
    };
    let target = args.target.as_deref();

    match &args.output {
        Some(path) => {
            // Buffered so a failed render never leaves a partial file behind.
            let mut buffer = Vec::new();
            render_modules(&mut buffer, ctx, &modules, target, options)?;
            write_file(path, &buffer)?;
            reporter.diagrams_written(modules.len(), path);
        }
        None => {
            let mut sink = IoSink::new(std::io::stdout().lock());
            render_modules(&mut sink, ctx, &modules, target, options)?;
            sink.into_inner().flush().map_err(TreeError::Write)?;
        }
    }
    Ok(())
}

/// Every main module, in load order.
fn main_modules(ctx: &SchemaContext) -> Vec<ModuleId> {
    ctx.modules()
        .filter(|(_, m)| !m.is_submodule())
        .map(|(id, _)| id)
        .collect()
}

/// Renders the modules one after another, separated by a blank line.
fn render_modules(
    sink: &mut dyn Sink,
    ctx: &SchemaContext,
    modules: &[ModuleId],
    target: Option<&str>,
    options: TreeOptions,
) -> Result<(), TreeError> {
    for (i, &module) in modules.iter().enumerate() {
        if i > 0 {
            sink.write_str("\n")?;
        }
        tracing::debug!(module = %ctx.module(module).name, "rendering");
        render_tree(sink, ctx, module, target, options)?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
