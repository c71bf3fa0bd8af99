//! The compiled, read-only schema graph.

use serde::Serialize;

use crate::types::{
    Feature, FeatureId, IfFeatureExpr, Module, ModuleId, NodeData, NodeId, NodeKind, SchemaNode,
};

/// Arena holding every module, node and feature of a compiled schema set.
///
/// A context is built once (through [`ContextBuilder`](crate::ContextBuilder)
/// or a [description](crate::description)) and never changes afterwards, so it
/// can be shared freely between threads and renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaContext {
    pub(crate) modules: Vec<Module>,
    pub(crate) nodes: Vec<SchemaNode>,
    pub(crate) features: Vec<Feature>,
}

impl SchemaContext {
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id.index()]
    }

    /// All modules and submodules in creation order.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, m)| (ModuleId::from_index(i), m))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The main module of a module or submodule.
    pub fn main_module(&self, id: ModuleId) -> ModuleId {
        self.module(id).belongs_to().unwrap_or(id)
    }

    /// The main module a node belongs to.
    pub fn node_module(&self, id: NodeId) -> ModuleId {
        self.main_module(self.node(id).module)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).owner
    }

    /// The list a node lives in: its parent's children, the module's augment
    /// list for augments, or the main module's top-level list.
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        match (node.parent, &node.data) {
            (Some(parent), _) => &self.node(parent).children,
            (None, NodeData::Augment { .. }) => &self.module(node.module).augments,
            (None, _) => &self.module(self.node_module(id)).data,
        }
    }

    /// Siblings following `id` in declaration order, optionally starting at
    /// `id` itself.
    pub fn later_siblings(&self, id: NodeId, include_self: bool) -> &[NodeId] {
        let siblings = self.siblings(id);
        match siblings.iter().position(|&s| s == id) {
            Some(pos) if include_self => &siblings[pos..],
            Some(pos) => &siblings[pos + 1..],
            None => &[],
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.later_siblings(id, false).first().copied()
    }

    pub fn feature_enabled(&self, id: FeatureId) -> bool {
        self.feature(id).enabled
    }

    pub fn eval_if_feature(&self, expr: &IfFeatureExpr) -> bool {
        expr.eval(&|f: &FeatureId| self.feature_enabled(*f))
    }

    fn own_features_enabled(&self, id: NodeId) -> bool {
        self.node(id)
            .if_features
            .iter()
            .all(|e| self.eval_if_feature(e))
    }

    /// True when one of the node's if-feature expressions is false.
    ///
    /// With `through_owner`, a node declared by an augment is also disabled
    /// when the augment, the augment target or any ancestor of the target is.
    pub fn is_disabled(&self, id: NodeId, through_owner: bool) -> bool {
        if !self.own_features_enabled(id) {
            return true;
        }
        if !through_owner {
            return false;
        }
        let node = self.node(id);
        let Some(owner) = node.owner.filter(|o| self.node(*o).kind() == NodeKind::Augment) else {
            return false;
        };
        let mut cur = Some(owner);
        while let Some(c) = cur {
            if !self.own_features_enabled(c) {
                return true;
            }
            cur = match &self.node(c).data {
                NodeData::Augment { target, .. } => Some(*target),
                _ => self.node(c).parent,
            };
        }
        false
    }

    /// The prefix `from` uses to refer to `target`: its own prefix when both
    /// share a main module, else the import prefix, else the target's own.
    pub fn prefix_for(&self, from: ModuleId, target: ModuleId) -> &str {
        let main_from = self.main_module(from);
        let main_target = self.main_module(target);
        if main_from == main_target {
            return &self.module(main_from).prefix;
        }
        [from, main_from]
            .into_iter()
            .flat_map(|m| self.module(m).imports.iter())
            .find(|i| i.module == main_target)
            .map(|i| i.prefix.as_str())
            .unwrap_or(self.module(main_target).prefix.as_str())
    }

    pub fn module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.modules().find(|(_, m)| m.name == name).map(|(id, _)| id)
    }

    /// Resolves a prefix as seen from `from` to a main module.
    pub fn module_by_prefix(&self, from: ModuleId, prefix: &str) -> Option<ModuleId> {
        let main_from = self.main_module(from);
        if self.module(from).prefix == prefix || self.module(main_from).prefix == prefix {
            return Some(main_from);
        }
        [from, main_from]
            .into_iter()
            .find_map(|m| self.module(m).import_by_prefix(prefix))
            .map(|i| self.main_module(i.module))
    }

    /// Finds a feature by name among the features of a main module and its
    /// submodules.
    pub fn feature_by_name(&self, module: ModuleId, name: &str) -> Option<FeatureId> {
        let main = self.main_module(module);
        self.features
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name && self.main_module(f.module) == main)
            .map(|(i, _)| FeatureId::from_index(i))
    }

    /// Top-level nodes declared in `module`. For a main module this includes
    /// the nodes of its submodules.
    pub fn top_level(&self, module: ModuleId) -> impl Iterator<Item = NodeId> + '_ {
        let submodule = self.module(module).is_submodule();
        self.module(self.main_module(module))
            .data
            .iter()
            .copied()
            .filter(move |&id| !submodule || self.node(id).module == module)
    }
}

/// Counts of the node kinds in a module, as shown by summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    pub nodes: usize,
    pub rpcs: usize,
    pub notifications: usize,
    pub groupings: usize,
    pub augments: usize,
    pub features: usize,
}

impl SchemaContext {
    /// Summarises the nodes declared in `module` (or submodule).
    pub fn module_stats(&self, module: ModuleId) -> ModuleStats {
        let mut stats = ModuleStats {
            augments: self.module(module).augments.len(),
            features: self.module(module).features.len(),
            ..ModuleStats::default()
        };
        for node in self.nodes.iter().filter(|n| n.module == module) {
            match node.kind() {
                NodeKind::Rpc => stats.rpcs += 1,
                NodeKind::Notification if node.parent.is_none() => stats.notifications += 1,
                NodeKind::Grouping => stats.groupings += 1,
                _ => {}
            }
            if node.kind() != NodeKind::Augment {
                stats.nodes += 1;
            }
        }
        stats
    }
}
