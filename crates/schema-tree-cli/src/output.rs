use std::path::Path;

use console::{Style, Term};
use serde_json::{json, Value};

use crate::cli::GlobalOpts;
use crate::diagnostic::description_report;
use crate::error::CliError;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

/// How one description file fared under `check`.
#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    pub modules: Vec<String>,
    pub error: Option<Value>,
}

impl FileReport {
    fn to_json(&self) -> Value {
        json!({
            "file": self.file,
            "modules": self.modules,
            "error": self.error,
        })
    }
}

/// Module and node totals of a description set that compiled.
#[derive(Debug, Clone, Copy)]
pub struct Totals {
    pub modules: usize,
    pub nodes: usize,
}

/// Outcome of a `check` run. `totals` is only present when every file
/// loaded and the merged set compiled.
#[derive(Debug)]
pub struct CheckSummary {
    pub results: Vec<FileReport>,
    pub totals: Option<Totals>,
}

impl CheckSummary {
    fn to_json(&self) -> Value {
        let results: Vec<Value> = self.results.iter().map(FileReport::to_json).collect();
        let mut json = json!({
            "files": self.results.len(),
            "valid": self.totals.is_some(),
            "results": results,
        });
        if let (Some(t), Some(obj)) = (self.totals, json.as_object_mut()) {
            obj.insert("modules".into(), t.modules.into());
            obj.insert("nodes".into(), t.nodes.into());
        }
        json
    }

    fn human_line(&self) -> Option<String> {
        self.totals.map(|t| {
            format!(
                "{} modules, {} schema nodes from {} files",
                t.modules,
                t.nodes,
                self.results.len()
            )
        })
    }

    fn plain_line(&self) -> Option<String> {
        self.totals
            .map(|t| format!("{}\t{}\t{}", self.results.len(), t.modules, t.nodes))
    }
}

fn diagrams_message(count: usize, path: &Path) -> String {
    let noun = if count == 1 { "diagram" } else { "diagrams" };
    format!("wrote {count} {noun} to {}", path.display())
}

/// Reports command progress and results in the selected output mode.
///
/// Diagrams rendered to stdout bypass the reporter entirely; everything
/// here is either a summary on stdout or a note on stderr.
pub struct Reporter {
    pub mode: OutputMode,
    pub quiet: bool,
    pub use_color: bool,
}

impl Reporter {
    pub fn from_global(global: &GlobalOpts) -> Self {
        let mode = match global.format.as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        };

        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode,
            quiet: global.quiet,
            use_color,
        }
    }

    fn tagged(&self, tag: &str, style: Style, msg: &str) {
        if self.use_color {
            eprintln!("{} {msg}", style.apply_to(tag));
        } else {
            eprintln!("{tag} {msg}");
        }
    }

    fn human_note(&self) -> bool {
        !self.quiet && self.mode == OutputMode::Human
    }

    /// `tree -o`: the diagrams landed in `path`.
    pub fn diagrams_written(&self, count: usize, path: &Path) {
        match self.mode {
            OutputMode::Human if !self.quiet => {
                self.tagged("ok", Style::new().green().bold(), &diagrams_message(count, path));
            }
            OutputMode::Json => self.print_json(&json!({
                "diagrams": count,
                "path": path.display().to_string(),
            })),
            _ => {}
        }
    }

    /// `check`: one description file parsed.
    pub fn file_loaded(&self, report: &FileReport) {
        if report.modules.is_empty() && !self.quiet && self.mode != OutputMode::Json {
            self.tagged(
                "warning:",
                Style::new().yellow().bold(),
                &format!("{} defines no modules", report.file),
            );
        }
        match self.mode {
            OutputMode::Human if !self.quiet => {
                eprintln!("  {} .... {} modules", report.file, report.modules.len());
            }
            OutputMode::Plain => println!("{}\tok\t{}", report.file, report.modules.len()),
            _ => {}
        }
    }

    /// `check`: one description file was rejected. JSON mode defers the
    /// error to the summary.
    pub fn file_failed(&self, err: &CliError) {
        if self.mode != OutputMode::Json {
            self.print_error(err);
        }
    }

    pub fn check_summary(&self, summary: &CheckSummary) {
        match self.mode {
            OutputMode::Json => self.print_json(&summary.to_json()),
            OutputMode::Human if !self.quiet => {
                if let Some(line) = summary.human_line() {
                    self.tagged("ok", Style::new().green().bold(), &line);
                }
            }
            OutputMode::Plain => {
                if let Some(line) = summary.plain_line() {
                    println!("{line}");
                }
            }
            _ => {}
        }
    }

    /// `inspect`: size of the loaded set, ahead of the module table.
    pub fn set_loaded(&self, modules: usize, files: usize) {
        if self.human_note() {
            eprintln!("{modules} modules from {files} files");
        }
    }

    /// In human mode a description syntax error is shown as a source snippet.
    pub fn print_error(&self, err: &CliError) {
        match self.mode {
            OutputMode::Human => {
                if let Some(report) = description_report(err) {
                    eprintln!("{report:?}");
                } else {
                    self.tagged("error:", Style::new().red().bold(), &err.to_string());
                }
            }
            OutputMode::Json => eprintln!("{}", err.to_json()),
            OutputMode::Plain => eprintln!("error\t{err}"),
        }
    }

    pub fn print_json(&self, value: &Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }
}
