//! Whole-module and subtree layouts.

use std::io;

use schema_tree_core::path::to_prefixes;
use schema_tree_core::{KindSet, NodeData, NodeId, NodeKind};

use crate::options::RenderFlags;
use crate::printer::{Entry, Frame, Printer, Role, MODULE_DATA_INDENT, OP_DATA_INDENT};
use crate::walk::config_below;
use crate::writer::LineWriter;

const TOP_DATA: KindSet = KindSet::CHOICE
    .union(KindSet::CONTAINER)
    .union(KindSet::LEAF)
    .union(KindSet::LEAF_LIST)
    .union(KindSet::LIST)
    .union(KindSet::ANY)
    .union(KindSet::USES);

const AUGMENT_DATA: KindSet = TOP_DATA
    .union(KindSet::CASE)
    .union(KindSet::ACTION)
    .union(KindSet::NOTIFICATION);

const ANCESTORS: KindSet = KindSet::CHOICE
    .union(KindSet::CASE)
    .union(KindSet::CONTAINER)
    .union(KindSet::LIST)
    .union(KindSet::NOTIFICATION)
    .union(KindSet::RPC)
    .union(KindSet::ACTION)
    .union(KindSet::INPUT)
    .union(KindSet::OUTPUT);

const AUGMENT_PREFIX: &str = "  augment \"";

impl Printer<'_> {
    fn write_header(&self, out: &mut LineWriter<'_>) -> io::Result<()> {
        let module = self.ctx.module(self.module);
        match module.belongs_to() {
            Some(main) => out.text(&format!(
                "submodule: {} (belongs-to {})\n",
                module.name,
                self.ctx.module(main).name
            )),
            None => out.text(&format!("module: {}\n", module.name)),
        }
    }

    pub(crate) fn render_module(&self, out: &mut LineWriter<'_>) -> io::Result<()> {
        self.write_header(out)?;

        let top: Vec<NodeId> = self.ctx.top_level(self.module).collect();
        let data = Frame::new(MODULE_DATA_INDENT);
        let width = self.max_name_width(&top, None, TOP_DATA);
        let (mut rpcs, mut notifications, mut groupings) = (false, false, false);
        for &id in &top {
            let enabled = !self.ctx.is_disabled(id, false);
            match self.ctx.node(id).kind() {
                NodeKind::Rpc => rpcs |= enabled,
                NodeKind::Notification => notifications |= enabled,
                NodeKind::Grouping => {
                    groupings |= enabled && self.options.flags.contains(RenderFlags::GROUPINGS)
                }
                _ => self.render_node(out, data, Entry::new(id, width, TOP_DATA))?,
            }
        }

        self.render_augments(out)?;

        let ops = Frame::new(OP_DATA_INDENT);
        if rpcs {
            out.text("\n  rpcs:\n")?;
            for &id in &top {
                self.render_node(out, ops, Entry::new(id, 0, KindSet::RPC))?;
            }
        }
        if notifications {
            out.text("\n  notifications:\n")?;
            for &id in &top {
                self.render_node(out, ops, Entry::new(id, 0, KindSet::NOTIFICATION))?;
            }
        }
        if groupings {
            out.newline()?;
            for &id in &top {
                let node = self.ctx.node(id);
                if node.kind() != NodeKind::Grouping || self.ctx.is_disabled(id, false) {
                    continue;
                }
                out.text(&format!("  grouping {}:\n", node.name))?;
                self.render_node(out, ops, Entry::new(id, 0, KindSet::GROUPING))?;
            }
        }
        Ok(())
    }

    fn render_augments(&self, out: &mut LineWriter<'_>) -> io::Result<()> {
        for &aug in &self.ctx.module(self.module).augments {
            let node = self.ctx.node(aug);
            let NodeData::Augment {
                target,
                target_path,
            } = &node.data
            else {
                tracing::error!(node = %node.name, "non-augment in augment list");
                continue;
            };
            let local_target = if self.submodule {
                self.ctx.node(*target).module == self.module
            } else {
                self.ctx.node_module(*target) == self.module
            };
            if local_target || self.ctx.is_disabled(aug, false) {
                continue;
            }
            out.newline()?;
            self.write_augment_header(out, target_path)?;

            let width = self.max_name_width(&node.children, Some(aug), AUGMENT_DATA);
            for &child in &node.children {
                let entry = Entry::new(child, width, AUGMENT_DATA).in_augment(aug);
                self.render_node(out, Frame::new(OP_DATA_INDENT), entry)?;
            }
        }
        Ok(())
    }

    /// `  augment "<path>":`, breaking the path at `/` when it would pass
    /// the line length. Continuation lines start just past the opening quote.
    fn write_augment_header(&self, out: &mut LineWriter<'_>, path: &str) -> io::Result<()> {
        let path = if self.rfc() {
            to_prefixes(self.ctx, self.module, path).unwrap_or_else(|e| {
                tracing::warn!(path, error = %e, "keeping module names in augment path");
                path.to_string()
            })
        } else {
            path.to_string()
        };
        let limit = usize::from(self.options.line_length);
        out.text(AUGMENT_PREFIX)?;
        let continuation = out.column();

        let mut pieces: Vec<String> = Vec::new();
        for (i, seg) in path.split('/').enumerate() {
            if i > 0 {
                pieces.push(format!("/{seg}"));
            } else if !seg.is_empty() {
                pieces.push(seg.to_string());
            }
        }

        let last = pieces.len().saturating_sub(1);
        for (i, piece) in pieces.iter().enumerate() {
            let closing = if i == last { "\":" } else { "" };
            let len = piece.chars().count() + closing.len();
            if limit > 0 && i > 0 && out.column() + len > limit {
                out.newline()?;
                out.spaces(continuation)?;
            }
            out.text(piece)?;
            out.text(closing)?;
        }
        if pieces.is_empty() {
            out.text("\":")?;
        }
        out.newline()
    }

    pub(crate) fn render_subtree(
        &self,
        out: &mut LineWriter<'_>,
        target: NodeId,
    ) -> io::Result<()> {
        self.write_header(out)?;

        let mut ancestors = Vec::new();
        let mut cur = self.ctx.parent(target);
        while let Some(p) = cur {
            if self.ctx.node(p).kind() != NodeKind::Uses {
                ancestors.push(p);
            }
            cur = self.ctx.parent(p);
        }
        let root = ancestors.last().copied().unwrap_or(target);

        let mut frame = match self.ctx.node(root).kind() {
            NodeKind::Rpc => {
                out.text("\n  rpcs:\n")?;
                Frame::new(OP_DATA_INDENT)
            }
            NodeKind::Notification => {
                out.text("\n  notifications:\n")?;
                Frame::new(OP_DATA_INDENT)
            }
            _ => Frame::new(MODULE_DATA_INDENT),
        };

        for &ancestor in ancestors.iter().rev() {
            let entry = Entry::new(ancestor, 0, ANCESTORS).with_role(Role::Ancestor);
            self.render_node(out, frame, entry)?;
            let kind = self.ctx.node(ancestor).kind();
            frame = Frame {
                config: config_below(kind, frame.config),
                ..frame.deeper(frame.indent)
            };
        }

        let width = self.max_name_width(&[target], None, KindSet::all());
        let entry = Entry::new(target, width, KindSet::all() - KindSet::AUGMENT)
            .with_role(Role::SubtreeRoot);
        self.render_node(out, frame, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TreeOptions;
    use crate::printer::ConfigOverride;
    use schema_tree_core::{BaseType, ContextBuilder, LeafType, ModuleId, NewNode, SchemaContext};

    fn header(ctx: &SchemaContext, m: ModuleId, path: &str, width: u16) -> String {
        let p = Printer::new(ctx, m, TreeOptions::default().with_line_length(width));
        let mut buf = String::new();
        let mut out = LineWriter::new(&mut buf);
        p.write_augment_header(&mut out, path).unwrap();
        buf
    }

    #[test]
    fn augment_header_wraps_at_segments() {
        let mut b = ContextBuilder::new();
        let m = b.add_module("m", "m").unwrap();
        let ctx = b.build();
        let path = "/m:interfaces/m:interface/m:config";

        assert_eq!(
            header(&ctx, m, path, 0),
            "  augment \"/m:interfaces/m:interface/m:config\":\n"
        );
        assert_eq!(
            header(&ctx, m, path, 40),
            "  augment \"/m:interfaces/m:interface\n           /m:config\":\n"
        );
    }

    #[test]
    fn subtree_ancestors_keep_the_operation_override() {
        let mut b = ContextBuilder::new();
        let m = b.add_module("m", "m").unwrap();
        let rpc = b.add_top_level(m, NewNode::rpc("reset")).unwrap();
        let output = b.add_child(rpc, NewNode::output()).unwrap();
        let leaf = b
            .add_child(output, NewNode::leaf("status", LeafType::builtin(BaseType::String)))
            .unwrap();
        let ctx = b.build();
        let p = Printer::new(&ctx, m, TreeOptions::default());

        let mut buf = String::new();
        let mut out = LineWriter::new(&mut buf);
        p.render_subtree(&mut out, leaf).unwrap();
        assert_eq!(
            buf,
            "module: m\n\n  rpcs:\n    +---x reset\n       +--ro output\n          +--ro status?   string\n"
        );
    }

    #[test]
    fn frames_start_clean() {
        let frame = Frame::new(OP_DATA_INDENT);
        assert_eq!(frame.level, 0);
        assert_eq!(frame.config, ConfigOverride::None);
    }
}
