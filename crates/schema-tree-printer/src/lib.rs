//! # schema-tree-printer
//!
//! Renders a compiled schema module as a tree diagram: one node per line,
//! `|` connectors between siblings, status and config glyphs, and an aligned
//! type column that wraps at a configurable width.
//!
//! # Example
//!
//! ```
//! use schema_tree_core::SchemaContext;
//! use schema_tree_printer::{render_tree_to_string, TreeOptions};
//!
//! let ctx = SchemaContext::from_json(r#"{"modules": [{
//!   "name": "example", "prefix": "ex",
//!   "data": [{ "kind": "container", "name": "top", "children": [
//!     { "kind": "leaf", "name": "id", "type": "uint32", "mandatory": true },
//!     { "kind": "leaf", "name": "name", "type": "string" }
//!   ]}]
//! }]}"#).unwrap();
//! let module = ctx.module_by_name("example").unwrap();
//!
//! let tree = render_tree_to_string(&ctx, module, None, TreeOptions::default()).unwrap();
//! assert_eq!(
//!     tree,
//!     "module: example\n  +--rw top\n     +--rw id      uint32\n     +--rw name?   string\n"
//! );
//! ```

mod assemble;
pub mod error;
mod format;
mod line;
pub mod options;
mod printer;
pub mod sink;
mod visibility;
mod walk;
mod width;
mod writer;

pub use error::TreeError;
pub use options::{RenderFlags, TreeOptions};
pub use sink::{CallbackSink, IoSink, Sink};

use schema_tree_core::path::find_path;
use schema_tree_core::{ModuleId, SchemaContext};

use printer::Printer;
use writer::LineWriter;

/// Renders `module` (a module or submodule) into `sink`.
///
/// Without `target_path` the whole module is rendered. With a path, only the
/// addressed node is rendered, below the chain of its ancestors; the path
/// must resolve to exactly one node, otherwise nothing is written.
pub fn render_tree(
    sink: &mut dyn Sink,
    ctx: &SchemaContext,
    module: ModuleId,
    target_path: Option<&str>,
    options: TreeOptions,
) -> Result<(), TreeError> {
    let printer = Printer::new(ctx, module, options);
    let Some(path) = target_path else {
        let mut out = LineWriter::new(sink);
        printer.render_module(&mut out)?;
        return Ok(());
    };

    let matches = find_path(ctx, module, path).unwrap_or_else(|e| {
        tracing::debug!(path, error = %e, "target path did not resolve");
        Vec::new()
    });
    match matches.as_slice() {
        [] => Err(TreeError::PathNotFound {
            path: path.to_string(),
        }),
        [target] => {
            let mut out = LineWriter::new(sink);
            printer.render_subtree(&mut out, *target)?;
            Ok(())
        }
        many => Err(TreeError::PathAmbiguous {
            path: path.to_string(),
            matches: many.len(),
        }),
    }
}

/// Like [`render_tree`], collecting the diagram into a `String`.
pub fn render_tree_to_string(
    ctx: &SchemaContext,
    module: ModuleId,
    target_path: Option<&str>,
    options: TreeOptions,
) -> Result<String, TreeError> {
    let mut out = String::new();
    render_tree(&mut out, ctx, module, target_path, options)?;
    Ok(out)
}
