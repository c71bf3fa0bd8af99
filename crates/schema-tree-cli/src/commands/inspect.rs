use schema_tree_core::context::ModuleStats;
use schema_tree_core::{ModuleId, SchemaContext};

use crate::cli::{GlobalOpts, InspectArgs};
use crate::config::{load_config, resolve_schema_paths};
use crate::error::CliError;
use crate::output::{OutputMode, Reporter};

/// Run the `inspect` command: list the loaded modules and their node counts.
pub fn run(args: InspectArgs, global: &GlobalOpts, reporter: &Reporter) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = resolve_schema_paths(&args.paths, &config.cli);
    let loaded = super::load_schema(&paths)?;
    let ctx = &loaded.context;

    let modules: Vec<ModuleId> = match &args.module {
        Some(name) => vec![super::find_module(ctx, name)?],
        None => ctx.modules().map(|(id, _)| id).collect(),
    };
    let rows: Vec<ModuleRow<'_>> = modules.iter().map(|&m| ModuleRow::new(ctx, m)).collect();

    reporter.set_loaded(loaded.modules, loaded.files.len());
    match reporter.mode {
        OutputMode::Human => render_table(&rows),
        OutputMode::Json => {
            let json_modules: Vec<serde_json::Value> =
                rows.iter().map(ModuleRow::to_json).collect();
            reporter.print_json(&serde_json::json!({ "modules": json_modules }));
        }
        OutputMode::Plain => {
            for row in &rows {
                let s = row.stats;
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    row.name, row.kind, row.prefix, s.nodes, s.rpcs, s.notifications, s.augments,
                    s.features
                );
            }
        }
    }
    Ok(())
}

struct ModuleRow<'a> {
    name: &'a str,
    kind: &'static str,
    prefix: &'a str,
    belongs_to: Option<&'a str>,
    stats: ModuleStats,
}

impl<'a> ModuleRow<'a> {
    fn new(ctx: &'a SchemaContext, id: ModuleId) -> Self {
        let module = ctx.module(id);
        let main = ctx.main_module(id);
        Self {
            name: &module.name,
            kind: if module.is_submodule() {
                "submodule"
            } else {
                "module"
            },
            prefix: &ctx.module(main).prefix,
            belongs_to: module.belongs_to().map(|m| ctx.module(m).name.as_str()),
            stats: ctx.module_stats(id),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        let mut json = serde_json::json!({
            "name": self.name,
            "kind": self.kind,
            "prefix": self.prefix,
            "belongs_to": self.belongs_to,
        });
        if let Ok(serde_json::Value::Object(stats)) = serde_json::to_value(self.stats) {
            if let Some(obj) = json.as_object_mut() {
                obj.extend(stats);
            }
        }
        json
    }
}

fn render_table(rows: &[ModuleRow<'_>]) {
    println!(
        "{:<24} {:<10} {:<8} {:>6} {:>5} {:>7} {:>8} {:>8}",
        "Module", "Kind", "Prefix", "Nodes", "RPCs", "Notifs", "Augments", "Features"
    );
    println!(
        "{:<24} {:<10} {:<8} {:>6} {:>5} {:>7} {:>8} {:>8}",
        "------", "----", "------", "-----", "----", "------", "--------", "--------"
    );
    for row in rows {
        let s = row.stats;
        println!(
            "{:<24} {:<10} {:<8} {:>6} {:>5} {:>7} {:>8} {:>8}",
            row.name, row.kind, row.prefix, s.nodes, s.rpcs, s.notifications, s.augments, s.features
        );
    }
}
