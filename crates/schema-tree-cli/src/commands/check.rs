use schema_tree_core::description::ContextDescription;
use schema_tree_core::SchemaContext;

use crate::cli::{CheckArgs, GlobalOpts};
use crate::config::{load_config, resolve_schema_paths};
use crate::error::CliError;
use crate::output::{CheckSummary, FileReport, Reporter, Totals};

use super::{discover_description_files, read_description};

/// Run the `check` command: load every description file, report each one,
/// then compile the set and summarise.
pub fn run(args: CheckArgs, global: &GlobalOpts, reporter: &Reporter) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = resolve_schema_paths(&args.paths, &config.cli);
    let files = discover_description_files(&paths)?;

    let mut merged = ContextDescription {
        modules: Vec::new(),
    };
    let mut results = Vec::with_capacity(files.len());
    let mut failed = 0usize;

    for file in &files {
        let filename = file.display().to_string();
        match read_description(file) {
            Ok(description) => {
                let report = FileReport {
                    file: filename,
                    modules: description
                        .modules
                        .iter()
                        .map(|m| m.name.to_string())
                        .collect(),
                    error: None,
                };
                reporter.file_loaded(&report);
                results.push(report);
                merged.modules.extend(description.modules);
            }
            Err(err) => {
                failed += 1;
                reporter.file_failed(&err);
                results.push(FileReport {
                    file: filename,
                    modules: Vec::new(),
                    error: Some(err.to_json()),
                });
            }
        }
    }

    if failed > 0 {
        reporter.check_summary(&CheckSummary {
            results,
            totals: None,
        });
        return Err(CliError::InvalidFiles { failed });
    }

    let ctx = SchemaContext::from_description(&merged)?;
    reporter.check_summary(&CheckSummary {
        results,
        totals: Some(Totals {
            modules: merged.modules.len(),
            nodes: ctx.node_count(),
        }),
    });
    Ok(())
}
