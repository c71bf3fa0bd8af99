//! Recursion into a node's children.

use std::io;

use schema_tree_core::{KindSet, NodeKind};

use crate::printer::{ConfigOverride, Entry, Frame, Printer};
use crate::writer::LineWriter;

const BODY: KindSet = KindSet::CHOICE
    .union(KindSet::CONTAINER)
    .union(KindSet::LEAF)
    .union(KindSet::LEAF_LIST)
    .union(KindSet::LIST)
    .union(KindSet::ANY)
    .union(KindSet::USES);

/// Kinds printed below a node of `kind`; `None` for kinds without children.
pub(crate) fn child_mask(kind: NodeKind) -> Option<KindSet> {
    let nested_ops = KindSet::ACTION.union(KindSet::NOTIFICATION);
    match kind {
        NodeKind::Rpc | NodeKind::Action => Some(KindSet::INPUT | KindSet::OUTPUT),
        NodeKind::Choice => Some(KindSet::CASE | (BODY - KindSet::USES)),
        NodeKind::Case => Some(BODY | nested_ops),
        NodeKind::Input | NodeKind::Output | NodeKind::Notification => Some(BODY),
        NodeKind::Container | NodeKind::List | NodeKind::Grouping | NodeKind::Uses => {
            Some(BODY | nested_ops)
        }
        NodeKind::Leaf
        | NodeKind::LeafList
        | NodeKind::Anydata
        | NodeKind::Anyxml
        | NodeKind::Augment => None,
    }
}

/// The config override in force below a node of `kind`.
pub(crate) fn config_below(kind: NodeKind, current: ConfigOverride) -> ConfigOverride {
    match kind {
        NodeKind::Input => ConfigOverride::WriteOnly,
        NodeKind::Output | NodeKind::Notification => ConfigOverride::ReadOnly,
        _ => current,
    }
}

impl Printer<'_> {
    /// Renders the children of `entry.id` at `frame`. Uses pass their own
    /// column width and augment scope down; every other kind sizes the
    /// column from its children.
    pub(crate) fn render_children(
        &self,
        out: &mut LineWriter<'_>,
        frame: Frame,
        entry: Entry,
    ) -> io::Result<()> {
        let node = self.ctx.node(entry.id);
        let kind = node.kind();
        let Some(mask) = child_mask(kind) else {
            if kind == NodeKind::Augment {
                tracing::error!(node = %node.name, "augment reached as a tree child");
            }
            return Ok(());
        };
        let frame = Frame {
            config: config_below(kind, frame.config),
            ..frame
        };
        let max_width = if kind == NodeKind::Uses {
            entry.max_width
        } else {
            self.max_name_width(&node.children, None, mask)
        };

        for &child in &node.children {
            let foreign = self.submodule
                && self.ctx.owner(child) != Some(entry.id)
                && self.ctx.node(child).module != self.module;
            if foreign {
                continue;
            }
            let mut child_entry = Entry::new(child, max_width, mask);
            if kind == NodeKind::Uses {
                child_entry.augment = entry.augment;
            }
            self.render_node(out, frame, child_entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_by_kind() {
        assert_eq!(
            child_mask(NodeKind::Rpc),
            Some(KindSet::INPUT | KindSet::OUTPUT)
        );
        let choice = child_mask(NodeKind::Choice).unwrap();
        assert!(NodeKind::Case.is_in(choice));
        assert!(!NodeKind::Uses.is_in(choice));
        let case = child_mask(NodeKind::Case).unwrap();
        assert!(NodeKind::Action.is_in(case));
        assert!(!NodeKind::Case.is_in(case));
        let input = child_mask(NodeKind::Input).unwrap();
        assert!(!NodeKind::Notification.is_in(input));
        assert!(NodeKind::Uses.is_in(input));
        assert_eq!(child_mask(NodeKind::Leaf), None);
    }

    #[test]
    fn overrides_follow_operation_bodies() {
        assert_eq!(
            config_below(NodeKind::Input, ConfigOverride::None),
            ConfigOverride::WriteOnly
        );
        assert_eq!(
            config_below(NodeKind::Notification, ConfigOverride::WriteOnly),
            ConfigOverride::ReadOnly
        );
        assert_eq!(
            config_below(NodeKind::Container, ConfigOverride::ReadOnly),
            ConfigOverride::ReadOnly
        );
    }
}
