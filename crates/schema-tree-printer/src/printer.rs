//! Shared rendering state.
//!
//! The walk is split over several `impl Printer` blocks: `visibility`
//! decides the `|` connectors, `width` sizes the type column, `line` writes a
//! single node, `walk` recurses into children and `assemble` lays out whole
//! modules and subtrees.

use std::io;

use schema_tree_core::{KindSet, ModuleId, NodeId, SchemaContext};

use crate::options::{RenderFlags, TreeOptions};
use crate::writer::LineWriter;

/// Indentation of module data lines.
pub(crate) const MODULE_DATA_INDENT: usize = 2;
/// Indentation of augment, rpc, notification and grouping bodies.
pub(crate) const OP_DATA_INDENT: usize = 4;
/// Minimum gap between a node name and its type.
pub(crate) const TYPE_GAP: usize = 3;
/// Extra indentation of a wrapped continuation line.
pub(crate) const WRAP_OFFSET: usize = 5;
/// Depth at which connector bits run out.
pub(crate) const MAX_DEPTH: usize = 64;

/// One connector bit per depth: set when a later sibling at that depth is
/// still to be printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Indent(u64);

impl Indent {
    pub(crate) fn is_set(self, level: usize) -> bool {
        level < MAX_DEPTH && self.0 & (1 << level) != 0
    }

    pub(crate) fn with(self, level: usize, set: bool) -> Self {
        if level >= MAX_DEPTH {
            return self;
        }
        let cleared = self.0 & !(1u64 << level);
        Self(if set { cleared | (1 << level) } else { cleared })
    }
}

/// Config glyph forced on everything below an input, output or notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ConfigOverride {
    #[default]
    None,
    WriteOnly,
    ReadOnly,
}

/// Where a line starts: base indentation, depth, connectors and the config
/// override in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) base: usize,
    pub(crate) level: usize,
    pub(crate) indent: Indent,
    pub(crate) config: ConfigOverride,
}

impl Frame {
    pub(crate) fn new(base: usize) -> Self {
        Self {
            base,
            level: 0,
            indent: Indent::default(),
            config: ConfigOverride::None,
        }
    }

    pub(crate) fn deeper(self, indent: Indent) -> Self {
        Self {
            level: self.level + 1,
            indent,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Normal,
    /// A shallow line above a subtree target.
    Ancestor,
    /// The target of a subtree render; it never has printed siblings.
    SubtreeRoot,
}

/// A node to render together with the scope it is rendered in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub(crate) id: NodeId,
    /// Widest name among the node's siblings, for the type column.
    pub(crate) max_width: usize,
    /// Kinds printed in this scope.
    pub(crate) mask: KindSet,
    /// The augment whose children are being printed, if any.
    pub(crate) augment: Option<NodeId>,
    pub(crate) role: Role,
}

impl Entry {
    pub(crate) fn new(id: NodeId, max_width: usize, mask: KindSet) -> Self {
        Self {
            id,
            max_width,
            mask,
            augment: None,
            role: Role::Normal,
        }
    }

    pub(crate) fn in_augment(mut self, augment: NodeId) -> Self {
        self.augment = Some(augment);
        self
    }

    pub(crate) fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

pub(crate) struct Printer<'a> {
    pub(crate) ctx: &'a SchemaContext,
    /// The module or submodule being rendered.
    pub(crate) module: ModuleId,
    pub(crate) main: ModuleId,
    pub(crate) submodule: bool,
    pub(crate) options: TreeOptions,
}

impl<'a> Printer<'a> {
    pub(crate) fn new(ctx: &'a SchemaContext, module: ModuleId, options: TreeOptions) -> Self {
        Self {
            ctx,
            module,
            main: ctx.main_module(module),
            submodule: ctx.module(module).is_submodule(),
            options,
        }
    }

    pub(crate) fn rfc(&self) -> bool {
        self.options.flags.contains(RenderFlags::RFC)
    }

    pub(crate) fn literal_uses(&self) -> bool {
        self.options.flags.contains(RenderFlags::USES)
    }

    /// Disabled by its own if-features or, for augment-injected nodes, by
    /// those of the augment and its target.
    pub(crate) fn disabled(&self, id: NodeId) -> bool {
        self.ctx.is_disabled(id, true)
    }

    /// When rendering a submodule, nodes declared elsewhere are left out.
    pub(crate) fn foreign_to_submodule(&self, id: NodeId) -> bool {
        self.submodule && self.ctx.node(id).module != self.module
    }

    pub(crate) fn write_indent(&self, out: &mut LineWriter<'_>, frame: Frame) -> io::Result<()> {
        out.spaces(frame.base)?;
        for level in 0..frame.level {
            out.text(if frame.indent.is_set(level) { "|  " } else { "   " })?;
        }
        Ok(())
    }

    /// Writes `text` after a gap of `gap` spaces, or on a continuation line
    /// under `frame` when it would overflow the line length.
    pub(crate) fn write_wrapped(
        &self,
        out: &mut LineWriter<'_>,
        frame: Frame,
        gap: usize,
        text: &str,
    ) -> io::Result<()> {
        let limit = usize::from(self.options.line_length);
        if limit > 0 && out.column() + gap + text.chars().count() > limit {
            out.newline()?;
            self.write_indent(out, frame)?;
            out.spaces(WRAP_OFFSET)?;
        } else {
            out.spaces(gap)?;
        }
        out.text(text)
    }
}
