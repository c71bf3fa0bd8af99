//! Name widths, for aligning the type column of sibling leaves.

use schema_tree_core::{KindSet, NodeId, NodeKind};

use crate::printer::Printer;

impl Printer<'_> {
    /// The qualifier printed before a node declared outside the rendered
    /// module: its module name, or its module's prefix in RFC mode.
    pub(crate) fn name_qualifier(&self, id: NodeId) -> Option<&str> {
        let owner = self.ctx.node_module(id);
        if owner == self.main {
            return None;
        }
        let declared = self.ctx.module(self.ctx.node(id).module);
        Some(if self.rfc() {
            declared.prefix.as_str()
        } else {
            self.ctx.module(owner).name.as_str()
        })
    }

    /// Width of a node's qualified name plus its suffix slot.
    pub(crate) fn name_width(&self, id: NodeId) -> usize {
        let node = self.ctx.node(id);
        let qualifier = self.name_qualifier(id).map_or(0, |q| q.chars().count() + 1);
        let suffix = match node.kind() {
            NodeKind::Leaf
            | NodeKind::LeafList
            | NodeKind::List
            | NodeKind::Anydata
            | NodeKind::Anyxml
            | NodeKind::Container
            | NodeKind::Case => 1,
            NodeKind::Choice if node.flags.mandatory => 2,
            NodeKind::Choice => 3,
            _ => 0,
        };
        qualifier + node.name.chars().count() + suffix
    }

    /// Widest name among the nodes of `list` printed under `mask`. Uses are
    /// looked through unless they are shown literally.
    pub(crate) fn max_name_width(
        &self,
        list: &[NodeId],
        augment: Option<NodeId>,
        mask: KindSet,
    ) -> usize {
        list.iter()
            .filter(|&&id| {
                let node = self.ctx.node(id);
                !self.foreign_to_submodule(id)
                    && (augment.is_none() || node.owner == augment)
                    && node.kind().is_in(mask)
                    && !self.disabled(id)
            })
            .map(|&id| {
                let node = self.ctx.node(id);
                if node.kind() == NodeKind::Uses && !self.literal_uses() {
                    self.max_name_width(&node.children, None, mask)
                } else {
                    self.name_width(id)
                }
            })
            .max()
            .unwrap_or(0)
    }
}
