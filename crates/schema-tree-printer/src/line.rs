//! A single node line: `<indent><status>--<config><name><suffix>` followed
//! by the type column.

use std::io;

use schema_tree_core::{Config, KindSet, NodeData, NodeId, NodeKind, SchemaNode, Status};

use crate::printer::{ConfigOverride, Entry, Frame, Printer, Role, MAX_DEPTH, TYPE_GAP};
use crate::writer::LineWriter;

/// Kinds whose line lists if-features.
const FEATURE_KINDS: KindSet = KindSet::CONTAINER
    .union(KindSet::LIST)
    .union(KindSet::CHOICE)
    .union(KindSet::CASE)
    .union(KindSet::ANY)
    .union(KindSet::LEAF)
    .union(KindSet::LEAF_LIST)
    .union(KindSet::RPC)
    .union(KindSet::ACTION)
    .union(KindSet::NOTIFICATION)
    .union(KindSet::USES);

fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Deprecated => "x--",
        Status::Obsolete => "o--",
        Status::Current => "+--",
    }
}

fn config_glyph(node: &SchemaNode, config: ConfigOverride) -> &'static str {
    match node.kind() {
        NodeKind::Input => "-w ",
        NodeKind::Output => "ro ",
        NodeKind::Rpc | NodeKind::Action => "-x ",
        NodeKind::Notification => "-n ",
        NodeKind::Uses => "-u ",
        NodeKind::Case => ":(",
        _ => match (config, node.flags.config) {
            (ConfigOverride::WriteOnly, _) => "-w ",
            (ConfigOverride::ReadOnly, _) => "ro ",
            (ConfigOverride::None, Some(Config::ReadWrite)) => "rw ",
            (ConfigOverride::None, Some(Config::ReadOnly)) => "ro ",
            (ConfigOverride::None, None) => "-- ",
        },
    }
}

impl Printer<'_> {
    /// True for a leaf that is a key of the nearest enclosing list.
    fn is_list_key(&self, id: NodeId) -> bool {
        let mut parent = self.ctx.parent(id);
        while let Some(p) = parent.filter(|p| self.ctx.node(*p).kind() == NodeKind::Uses) {
            parent = self.ctx.parent(p);
        }
        parent.is_some_and(|p| self.ctx.node(p).keys().contains(&id))
    }

    fn suffix(&self, id: NodeId) -> &'static str {
        let node = self.ctx.node(id);
        let mandatory = node.flags.mandatory;
        match &node.data {
            NodeData::Leaf { .. } if !mandatory && !self.is_list_key(id) => "?",
            NodeData::Anydata | NodeData::Anyxml if !mandatory => "?",
            NodeData::Container { presence: Some(_) } => "!",
            NodeData::List { .. } | NodeData::LeafList { .. } => "*",
            NodeData::Case => ")",
            NodeData::Choice { .. } if mandatory => ")",
            NodeData::Choice { .. } => ")?",
            _ => "",
        }
    }

    /// Connector state for the children of `id`, which sits at `frame.level`.
    fn child_indent(&self, frame: Frame, id: NodeId, augment: Option<NodeId>) -> Frame {
        let node = self.ctx.node(id);
        let parent_kind = self.ctx.parent(id).map(|p| self.ctx.node(p).kind());
        let next_is_case = node.kind() != NodeKind::Case
            && matches!(parent_kind, Some(NodeKind::Case | NodeKind::Choice))
            && self
                .ctx
                .next_sibling(id)
                .and_then(|n| self.ctx.parent(n))
                .is_some_and(|p| self.ctx.node(p).kind() == NodeKind::Choice);
        let connect = !next_is_case && self.has_printed_sibling(id, augment);
        frame.deeper(frame.indent.with(frame.level, connect))
    }

    /// Renders a node and, unless it is a subtree ancestor or a literal uses,
    /// everything below it.
    pub(crate) fn render_node(
        &self,
        out: &mut LineWriter<'_>,
        frame: Frame,
        entry: Entry,
    ) -> io::Result<()> {
        let node = self.ctx.node(entry.id);
        let kind = node.kind();
        if !kind.is_in(entry.mask) || self.disabled(entry.id) {
            return Ok(());
        }
        if frame.level >= MAX_DEPTH {
            tracing::error!(
                node = %node.name,
                depth = frame.level,
                "tree too deep for connector tracking, subtree skipped"
            );
            return Ok(());
        }
        if node.flags.implicit {
            match kind {
                NodeKind::Input | NodeKind::Output => return Ok(()),
                NodeKind::Case
                    if node
                        .children
                        .first()
                        .map_or(true, |&c| self.ctx.is_disabled(c, false)) =>
                {
                    return Ok(())
                }
                _ => {}
            }
        }
        match kind {
            NodeKind::Uses if !self.literal_uses() => {
                return self.render_children(out, frame, entry);
            }
            NodeKind::Grouping => return self.render_children(out, frame, entry),
            _ => {}
        }

        self.write_indent(out, frame)?;
        out.text(status_glyph(node.flags.status))?;
        out.text(config_glyph(node, frame.config))?;
        if kind == NodeKind::Choice {
            out.text("(")?;
        }
        let name_start = out.column();
        if let Some(q) = self.name_qualifier(entry.id) {
            out.text(q)?;
            out.text(":")?;
        }
        out.text(&node.name)?;
        out.text(self.suffix(entry.id))?;
        let name_width = out.column() - name_start;

        let child = match entry.role {
            Role::Normal => self.child_indent(frame, entry.id, entry.augment),
            Role::Ancestor | Role::SubtreeRoot => frame.deeper(frame.indent),
        };
        let type_gap = TYPE_GAP + entry.max_width.saturating_sub(name_width);

        match &node.data {
            NodeData::Leaf { ty, .. } | NodeData::LeafList { ty, .. } => {
                self.write_wrapped(out, child, type_gap, &self.type_text(ty))?;
            }
            NodeData::Anydata => self.write_wrapped(out, child, type_gap, "<anydata>")?,
            NodeData::Anyxml => self.write_wrapped(out, child, type_gap, "<anyxml>")?,
            NodeData::List { .. } => {
                if let Some(keys) = self.keys_text(entry.id) {
                    self.write_wrapped(out, child, 1, &keys)?;
                }
            }
            _ => {}
        }
        if !self.rfc() {
            if let Some(default) = self.default_text(entry.id) {
                self.write_wrapped(out, child, 1, &default)?;
            }
        }
        if kind.is_in(FEATURE_KINDS) {
            if let Some(features) = self.if_features_text(entry.id) {
                self.write_wrapped(out, child, 1, &features)?;
            }
        }
        out.newline()?;

        if kind == NodeKind::Uses || entry.role == Role::Ancestor {
            return Ok(());
        }
        self.render_children(out, child, entry)
    }
}
