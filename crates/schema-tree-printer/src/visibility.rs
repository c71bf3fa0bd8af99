//! Whether a node still has siblings to print below it, which decides the
//! `|` connector drawn through its children's lines.

use schema_tree_core::{KindSet, NodeId, NodeKind};

use crate::printer::Printer;

/// Which later siblings count, by the kind of the node asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Rpcs,
    Notifications,
    /// Each grouping gets its own header, so nothing follows one.
    Groupings,
    Data,
}

const DATA_SIBLINGS: KindSet = KindSet::CONTAINER
    .union(KindSet::LEAF)
    .union(KindSet::LEAF_LIST)
    .union(KindSet::LIST)
    .union(KindSet::ANY)
    .union(KindSet::CHOICE)
    .union(KindSet::CASE)
    .union(KindSet::ACTION);

impl Printer<'_> {
    fn pass_of(&self, id: NodeId) -> Pass {
        match self.ctx.node(id).kind() {
            NodeKind::Rpc => Pass::Rpcs,
            NodeKind::Notification if !self.is_nested(id) => Pass::Notifications,
            NodeKind::Grouping => Pass::Groupings,
            _ => Pass::Data,
        }
    }

    /// True when some ancestor other than a uses exists.
    fn is_nested(&self, id: NodeId) -> bool {
        let mut cur = self.ctx.parent(id);
        while let Some(p) = cur {
            if self.ctx.node(p).kind() != NodeKind::Uses {
                return true;
            }
            cur = self.ctx.parent(p);
        }
        false
    }

    /// True when a sibling after `id` will produce a line, so the children
    /// of `id` need a connector at its depth.
    pub(crate) fn has_printed_sibling(&self, id: NodeId, augment: Option<NodeId>) -> bool {
        self.scan_siblings(id, false, self.pass_of(id), augment, true)
    }

    fn scan_siblings(
        &self,
        id: NodeId,
        include_self: bool,
        pass: Pass,
        augment: Option<NodeId>,
        climb: bool,
    ) -> bool {
        let ctx = self.ctx;
        let uses_parent = ctx
            .parent(id)
            .filter(|&p| ctx.node(p).kind() == NodeKind::Uses);
        // Nodes of a uses all belong to it; the augment scope applies again
        // once the scan climbs out.
        let scope = if uses_parent.is_some() { None } else { augment };
        for &cur in ctx.later_siblings(id, include_self) {
            if scope.is_some() && ctx.owner(cur) != scope {
                return false;
            }
            if self.foreign_to_submodule(cur) || self.disabled(cur) {
                continue;
            }
            let node = ctx.node(cur);
            let kind = node.kind();
            let shorthand_case = kind == NodeKind::Case && node.flags.implicit;
            let transparent = kind == NodeKind::Uses || shorthand_case;
            if transparent {
                if let Some(&first) = node.children.first() {
                    if self.scan_siblings(first, true, pass, None, false) {
                        return true;
                    }
                }
                continue;
            }
            match pass {
                Pass::Rpcs if kind == NodeKind::Rpc => return true,
                Pass::Notifications if kind == NodeKind::Notification => return true,
                Pass::Data => {
                    if kind.is_in(DATA_SIBLINGS) {
                        return true;
                    }
                    let operation_body = matches!(kind, NodeKind::Input | NodeKind::Output);
                    if operation_body && !node.children.is_empty() {
                        return true;
                    }
                    if kind == NodeKind::Notification && self.is_nested(cur) {
                        return true;
                    }
                }
                _ => {}
            }
        }

        // Nodes of a uses continue with the siblings of the uses itself.
        match uses_parent {
            Some(uses) if climb => self.scan_siblings(uses, false, pass, augment, true),
            _ => false,
        }
    }
}
