//! Programmatic construction of a [`SchemaContext`].
//!
//! The builder applies the normalisations a compiled schema is expected to
//! have: shorthand choice members get an implicit case, operations get
//! implicit input and output nodes, config is inherited and augments are
//! spliced into their targets.

use crate::context::SchemaContext;
use crate::error::SchemaError;
use crate::path::{find_path, to_module_names};
use crate::types::{
    is_identifier, parse_if_feature, Config, Feature, FeatureId, FeatureName, IfFeatureExpr,
    Import, KindSet, LeafType, Module, ModuleId, ModuleKind, NodeData, NodeFlags, NodeId,
    NodeKind, SchemaNode, Status,
};

/// Kinds allowed directly in a module body.
const TOP_LEVEL: KindSet = KindSet::CONTAINER
    .union(KindSet::CHOICE)
    .union(KindSet::LEAF)
    .union(KindSet::LEAF_LIST)
    .union(KindSet::LIST)
    .union(KindSet::ANY)
    .union(KindSet::USES)
    .union(KindSet::GROUPING)
    .union(KindSet::RPC)
    .union(KindSet::NOTIFICATION);

/// A node about to be added to the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    name: String,
    data: NodeData,
    config: Option<Config>,
    status: Status,
    mandatory: bool,
    implicit: bool,
    if_features: Vec<String>,
    when: Option<String>,
}

impl NewNode {
    fn with_data(name: impl Into<String>, data: NodeData) -> Self {
        Self {
            name: name.into(),
            data,
            config: None,
            status: Status::Current,
            mandatory: false,
            implicit: false,
            if_features: Vec::new(),
            when: None,
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Container { presence: None })
    }

    pub fn choice(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Choice { default_case: None })
    }

    pub fn case(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Case)
    }

    pub fn leaf(name: impl Into<String>, ty: LeafType) -> Self {
        Self::with_data(name, NodeData::Leaf { ty, default: None })
    }

    pub fn leaf_list(name: impl Into<String>, ty: LeafType) -> Self {
        Self::with_data(
            name,
            NodeData::LeafList {
                ty,
                defaults: Vec::new(),
            },
        )
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::with_data(
            name,
            NodeData::List {
                keys: Vec::new(),
                min_elements: 0,
                max_elements: None,
            },
        )
    }

    pub fn anydata(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Anydata)
    }

    pub fn anyxml(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Anyxml)
    }

    /// A `uses` of `grouping`, which may carry a `prefix:` qualifier.
    pub fn uses(grouping: impl Into<String>) -> Self {
        let grouping = grouping.into();
        let name = grouping
            .split_once(':')
            .map_or(grouping.as_str(), |(_, local)| local)
            .to_string();
        Self::with_data(name, NodeData::Uses { grouping })
    }

    pub fn grouping(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Grouping)
    }

    pub fn rpc(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Rpc)
    }

    pub fn action(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Action)
    }

    pub fn input() -> Self {
        Self::with_data("input", NodeData::Input)
    }

    pub fn output() -> Self {
        Self::with_data("output", NodeData::Output)
    }

    pub fn notification(name: impl Into<String>) -> Self {
        Self::with_data(name, NodeData::Notification)
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Explicit `config` statement.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Adds an if-feature expression in schema syntax.
    pub fn if_feature(mut self, expr: impl Into<String>) -> Self {
        self.if_features.push(expr.into());
        self
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.when = Some(condition.into());
        self
    }

    /// Sets the presence statement; ignored on anything but a container.
    pub fn presence(mut self, text: impl Into<String>) -> Self {
        if let NodeData::Container { presence } = &mut self.data {
            *presence = Some(text.into());
        }
        self
    }

    /// Sets the default of a leaf, or appends one to a leaf-list.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        match &mut self.data {
            NodeData::Leaf { default, .. } => *default = Some(value.into()),
            NodeData::LeafList { defaults, .. } => defaults.push(value.into()),
            _ => {}
        }
        self
    }

    /// Sets the element bounds of a list.
    pub fn elements(mut self, min: u32, max: Option<u32>) -> Self {
        if let NodeData::List {
            min_elements,
            max_elements,
            ..
        } = &mut self.data
        {
            *min_elements = min;
            *max_elements = max;
        }
        self
    }

    fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }
}

/// Incrementally assembles a [`SchemaContext`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    ctx: SchemaContext,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context built so far.
    pub fn context(&self) -> &SchemaContext {
        &self.ctx
    }

    pub fn build(self) -> SchemaContext {
        tracing::debug!(
            modules = self.ctx.modules.len(),
            nodes = self.ctx.nodes.len(),
            features = self.ctx.features.len(),
            "schema context built"
        );
        self.ctx
    }

    fn node_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.ctx.nodes[id.index()]
    }

    fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.ctx.modules[id.index()]
    }

    fn push_module(&mut self, module: Module) -> Result<ModuleId, SchemaError> {
        if !is_identifier(&module.name) {
            return Err(SchemaError::InvalidIdentifier(module.name));
        }
        if self.ctx.module_by_name(&module.name).is_some() {
            return Err(SchemaError::DuplicateModule(module.name));
        }
        let id = ModuleId::from_index(self.ctx.modules.len());
        self.ctx.modules.push(module);
        Ok(id)
    }

    pub fn add_module(&mut self, name: &str, prefix: &str) -> Result<ModuleId, SchemaError> {
        if !is_identifier(prefix) {
            return Err(SchemaError::InvalidIdentifier(prefix.to_string()));
        }
        self.push_module(Module {
            name: name.to_string(),
            prefix: prefix.to_string(),
            namespace: None,
            revision: None,
            kind: ModuleKind::Module,
            imports: Vec::new(),
            data: Vec::new(),
            augments: Vec::new(),
            features: Vec::new(),
        })
    }

    /// Adds a submodule of `belongs_to`. The submodule shares the main
    /// module's prefix.
    pub fn add_submodule(
        &mut self,
        name: &str,
        belongs_to: ModuleId,
    ) -> Result<ModuleId, SchemaError> {
        let main = self.ctx.main_module(belongs_to);
        let prefix = self.ctx.module(main).prefix.clone();
        self.push_module(Module {
            name: name.to_string(),
            prefix,
            namespace: None,
            revision: None,
            kind: ModuleKind::Submodule { belongs_to: main },
            imports: Vec::new(),
            data: Vec::new(),
            augments: Vec::new(),
            features: Vec::new(),
        })
    }

    pub fn set_namespace(&mut self, module: ModuleId, namespace: &str) {
        self.module_mut(module).namespace = Some(namespace.to_string());
    }

    pub fn set_revision(&mut self, module: ModuleId, revision: &str) {
        self.module_mut(module).revision = Some(revision.to_string());
    }

    pub fn add_import(
        &mut self,
        module: ModuleId,
        imported: ModuleId,
        prefix: &str,
    ) -> Result<(), SchemaError> {
        if !is_identifier(prefix) {
            return Err(SchemaError::InvalidIdentifier(prefix.to_string()));
        }
        self.module_mut(module).imports.push(Import {
            module: imported,
            prefix: prefix.to_string(),
        });
        Ok(())
    }

    pub fn add_feature(
        &mut self,
        module: ModuleId,
        name: &str,
        enabled: bool,
    ) -> Result<FeatureId, SchemaError> {
        if !is_identifier(name) {
            return Err(SchemaError::InvalidIdentifier(name.to_string()));
        }
        if self.ctx.feature_by_name(module, name).is_some() {
            return Err(SchemaError::DuplicateFeature(name.to_string()));
        }
        let id = FeatureId::from_index(self.ctx.features.len());
        self.ctx.features.push(Feature {
            name: name.to_string(),
            module,
            enabled,
        });
        self.module_mut(module).features.push(id);
        Ok(id)
    }

    /// Parses `expr` and resolves its feature names as seen from `module`.
    pub fn resolve_if_feature(
        &self,
        module: ModuleId,
        expr: &str,
    ) -> Result<IfFeatureExpr, SchemaError> {
        let ctx = &self.ctx;
        parse_if_feature(expr)?.try_map(&mut |f: &FeatureName| {
            let target = match &f.prefix {
                None => module,
                Some(p) => ctx
                    .module_by_prefix(module, p)
                    .or_else(|| ctx.module_by_name(p))
                    .ok_or_else(|| SchemaError::UnknownPrefix {
                        module: ctx.module(module).name.clone(),
                        prefix: p.clone(),
                    })?,
            };
            ctx.feature_by_name(target, &f.name).ok_or_else(|| {
                SchemaError::UnknownFeature(match &f.prefix {
                    Some(p) => format!("{p}:{}", f.name),
                    None => f.name.clone(),
                })
            })
        })
    }

    /// Adds an if-feature expression to an existing node (typically an
    /// augment).
    pub fn add_if_feature(&mut self, node: NodeId, expr: &str) -> Result<(), SchemaError> {
        let resolved = self.resolve_if_feature(self.ctx.node(node).module, expr)?;
        self.node_mut(node).if_features.push(resolved);
        Ok(())
    }

    pub fn add_top_level(&mut self, module: ModuleId, node: NewNode) -> Result<NodeId, SchemaError> {
        if !node.kind().is_in(TOP_LEVEL) {
            return Err(SchemaError::InvalidTopLevel(node.kind()));
        }
        self.place(module, None, None, node)
    }

    pub fn add_child(&mut self, parent: NodeId, node: NewNode) -> Result<NodeId, SchemaError> {
        if self.ctx.node(parent).kind() == NodeKind::Augment {
            return self.add_augment_child(parent, node);
        }
        let module = self.ctx.node(parent).module;
        self.place(module, Some(parent), Some(parent), node)
    }

    /// Declares an augment of the node at `target_path`, resolved from
    /// `module`.
    pub fn add_augment(&mut self, module: ModuleId, target_path: &str) -> Result<NodeId, SchemaError> {
        let matches = find_path(&self.ctx, module, target_path)?;
        let &[target] = matches.as_slice() else {
            return Err(SchemaError::AugmentTargetNotFound(target_path.to_string()));
        };
        let target_kind = self.ctx.node(target).kind();
        if target_kind.allowed_children().is_empty() {
            return Err(SchemaError::InvalidChild {
                parent: target_kind,
                child: NodeKind::Augment,
            });
        }
        let canonical = to_module_names(&self.ctx, module, target_path)?;
        if matches!(target_kind, NodeKind::Input | NodeKind::Output) {
            self.mark_explicit(target);
        }

        let id = NodeId::from_index(self.ctx.nodes.len());
        let config = self.ctx.node(target).flags.config;
        self.ctx.nodes.push(SchemaNode {
            name: canonical.clone(),
            module,
            flags: NodeFlags {
                config,
                ..NodeFlags::default()
            },
            if_features: Vec::new(),
            when: None,
            parent: None,
            owner: None,
            children: Vec::new(),
            data: NodeData::Augment {
                target,
                target_path: canonical,
            },
        });
        self.module_mut(module).augments.push(id);
        tracing::debug!(augment = %id, target = %target, "augment resolved");
        Ok(id)
    }

    /// Adds a node declared by `augment`; it is spliced into the augment
    /// target's children.
    pub fn add_augment_child(&mut self, augment: NodeId, node: NewNode) -> Result<NodeId, SchemaError> {
        let aug = self.ctx.node(augment);
        let NodeData::Augment { target, .. } = aug.data else {
            return Err(SchemaError::InvalidChild {
                parent: aug.kind(),
                child: node.kind(),
            });
        };
        let module = aug.module;
        self.place(module, Some(target), Some(augment), node)
    }

    fn place(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        owner: Option<NodeId>,
        node: NewNode,
    ) -> Result<NodeId, SchemaError> {
        if !is_identifier(&node.name) {
            return Err(SchemaError::InvalidIdentifier(node.name));
        }
        let kind = node.kind();
        if let Some(p) = parent {
            let parent_kind = self.ctx.node(p).kind();
            if !kind.is_in(parent_kind.allowed_children()) {
                return Err(SchemaError::InvalidChild {
                    parent: parent_kind,
                    child: kind,
                });
            }
            if parent_kind == NodeKind::Choice && kind != NodeKind::Case {
                let case = self.place(module, parent, owner, NewNode::case(&node.name).implicit())?;
                return self.place(module, Some(case), Some(case), node);
            }
            if matches!(kind, NodeKind::Input | NodeKind::Output) {
                if let Some(existing) = self.find_child(p, kind) {
                    self.mark_explicit(existing);
                    return Ok(existing);
                }
            }
            if matches!(parent_kind, NodeKind::Input | NodeKind::Output) {
                self.mark_explicit(p);
            }
        }
        self.check_duplicate(module, parent, &node)?;

        let if_features = node
            .if_features
            .iter()
            .map(|e| self.resolve_if_feature(module, e))
            .collect::<Result<Vec<_>, _>>()?;
        let config = self.effective_config(parent, &node);

        let id = NodeId::from_index(self.ctx.nodes.len());
        self.ctx.nodes.push(SchemaNode {
            name: node.name,
            module,
            flags: NodeFlags {
                config,
                status: node.status,
                mandatory: node.mandatory,
                implicit: node.implicit,
            },
            if_features,
            when: node.when,
            parent,
            owner,
            children: Vec::new(),
            data: node.data,
        });

        match parent {
            Some(p) => {
                self.node_mut(p).children.push(id);
                if let Some(o) = owner.filter(|&o| Some(o) != parent) {
                    self.node_mut(o).children.push(id);
                }
            }
            None => {
                let main = self.ctx.main_module(module);
                self.module_mut(main).data.push(id);
            }
        }

        if matches!(kind, NodeKind::Rpc | NodeKind::Action) {
            self.place(module, Some(id), Some(id), NewNode::input().implicit())?;
            self.place(module, Some(id), Some(id), NewNode::output().implicit())?;
        }
        Ok(id)
    }

    fn find_child(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ctx
            .node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.ctx.node(c).kind() == kind)
    }

    fn check_duplicate(
        &self,
        module: ModuleId,
        parent: Option<NodeId>,
        node: &NewNode,
    ) -> Result<(), SchemaError> {
        if node.kind() == NodeKind::Uses {
            return Ok(());
        }
        let main = self.ctx.main_module(module);
        let siblings = match parent {
            Some(p) => &self.ctx.node(p).children,
            None => &self.ctx.module(main).data,
        };
        let grouping = node.kind() == NodeKind::Grouping;
        let clash = siblings.iter().any(|&s| {
            let other = self.ctx.node(s);
            other.name == node.name
                && other.kind() != NodeKind::Uses
                && (other.kind() == NodeKind::Grouping) == grouping
                && self.ctx.node_module(s) == main
        });
        if clash {
            return Err(SchemaError::DuplicateNode(node.name.clone()));
        }
        Ok(())
    }

    fn effective_config(&self, parent: Option<NodeId>, node: &NewNode) -> Option<Config> {
        let no_config = KindSet::GROUPING
            | KindSet::RPC
            | KindSet::ACTION
            | KindSet::INPUT
            | KindSet::OUTPUT
            | KindSet::NOTIFICATION;
        if node.kind().is_in(no_config) {
            return None;
        }
        match parent.map(|p| self.ctx.node(p).flags.config) {
            None => Some(node.config.unwrap_or(Config::ReadWrite)),
            Some(None) => node.config,
            Some(Some(Config::ReadOnly)) => Some(Config::ReadOnly),
            Some(Some(Config::ReadWrite)) => Some(node.config.unwrap_or(Config::ReadWrite)),
        }
    }

    /// Sets the key leaves of a list. Keys are searched among the list's
    /// children, looking through `uses`.
    pub fn set_list_keys(&mut self, list: NodeId, keys: &[&str]) -> Result<(), SchemaError> {
        if self.ctx.node(list).kind() != NodeKind::List {
            return Err(SchemaError::KeyNotFound {
                list: self.ctx.node(list).name.clone(),
                key: keys.join(" "),
            });
        }
        let mut resolved = Vec::with_capacity(keys.len());
        for key in keys {
            let found = self.find_key_leaf(&self.ctx.node(list).children, key);
            let id = found.ok_or_else(|| SchemaError::KeyNotFound {
                list: self.ctx.node(list).name.clone(),
                key: key.to_string(),
            })?;
            resolved.push(id);
        }
        if let NodeData::List { keys: slot, .. } = &mut self.node_mut(list).data {
            *slot = resolved;
        }
        Ok(())
    }

    fn find_key_leaf(&self, children: &[NodeId], key: &str) -> Option<NodeId> {
        children.iter().find_map(|&c| {
            let node = self.ctx.node(c);
            match node.kind() {
                NodeKind::Leaf if node.name == key => Some(c),
                NodeKind::Uses => self.find_key_leaf(&node.children, key),
                _ => None,
            }
        })
    }

    pub fn set_default_case(&mut self, choice: NodeId, case: &str) -> Result<(), SchemaError> {
        let found = self
            .ctx
            .node(choice)
            .children
            .iter()
            .copied()
            .find(|&c| self.ctx.node(c).kind() == NodeKind::Case && self.ctx.node(c).name == case);
        let Some(case_id) = found else {
            return Err(SchemaError::DefaultCaseNotFound {
                choice: self.ctx.node(choice).name.clone(),
                case: case.to_string(),
            });
        };
        if let NodeData::Choice { default_case } = &mut self.node_mut(choice).data {
            *default_case = Some(case_id);
        }
        Ok(())
    }

    /// Clears the implicit flag of a shorthand case or an un-authored
    /// input/output.
    pub fn mark_explicit(&mut self, node: NodeId) {
        self.node_mut(node).flags.implicit = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BaseType;

    fn string() -> LeafType {
        LeafType::builtin(BaseType::String)
    }

    fn module() -> (ContextBuilder, ModuleId) {
        let mut b = ContextBuilder::new();
        let m = b.add_module("example", "ex").unwrap();
        (b, m)
    }

    #[test]
    fn rejects_invalid_and_duplicate_modules() {
        let (mut b, _) = module();
        assert!(matches!(
            b.add_module("example", "e2"),
            Err(SchemaError::DuplicateModule(_))
        ));
        assert!(matches!(
            b.add_module("9bad", "b"),
            Err(SchemaError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn choice_shorthand_gets_implicit_case() {
        let (mut b, m) = module();
        let choice = b.add_top_level(m, NewNode::choice("transport")).unwrap();
        let tcp = b.add_child(choice, NewNode::leaf("tcp", string())).unwrap();
        let ctx = b.build();

        let case = ctx.parent(tcp).unwrap();
        assert_eq!(ctx.node(case).kind(), NodeKind::Case);
        assert!(ctx.node(case).flags.implicit);
        assert_eq!(ctx.node(case).name, "tcp");
        assert_eq!(ctx.node(choice).children, vec![case]);
    }

    #[test]
    fn rpc_gets_implicit_input_and_output() {
        let (mut b, m) = module();
        let rpc = b.add_top_level(m, NewNode::rpc("reset")).unwrap();
        let output = b.add_child(rpc, NewNode::output()).unwrap();
        b.add_child(output, NewNode::leaf("result", string())).unwrap();
        let ctx = b.build();

        let children = &ctx.node(rpc).children;
        assert_eq!(children.len(), 2);
        let input = ctx.node(children[0]);
        assert_eq!(input.kind(), NodeKind::Input);
        assert!(input.flags.implicit);
        assert_eq!(children[1], output);
        assert!(!ctx.node(output).flags.implicit);
        assert_eq!(input.flags.config, None);
    }

    #[test]
    fn config_inheritance() {
        let (mut b, m) = module();
        let state = b
            .add_top_level(m, NewNode::container("state").config(Config::ReadOnly))
            .unwrap();
        let inner = b
            .add_child(state, NewNode::leaf("x", string()).config(Config::ReadWrite))
            .unwrap();
        let g = b.add_top_level(m, NewNode::grouping("g")).unwrap();
        let in_group = b.add_child(g, NewNode::leaf("y", string())).unwrap();
        let top = b.add_top_level(m, NewNode::container("top")).unwrap();
        let ctx = b.build();

        assert_eq!(ctx.node(inner).flags.config, Some(Config::ReadOnly));
        assert_eq!(ctx.node(in_group).flags.config, None);
        assert_eq!(ctx.node(top).flags.config, Some(Config::ReadWrite));
    }

    #[test]
    fn invalid_child_kind() {
        let (mut b, m) = module();
        let leaf = b.add_top_level(m, NewNode::leaf("l", string())).unwrap();
        assert!(matches!(
            b.add_child(leaf, NewNode::container("c")),
            Err(SchemaError::InvalidChild { .. })
        ));
        assert!(matches!(
            b.add_top_level(m, NewNode::case("c")),
            Err(SchemaError::InvalidTopLevel(NodeKind::Case))
        ));
    }

    #[test]
    fn duplicate_siblings() {
        let (mut b, m) = module();
        b.add_top_level(m, NewNode::container("top")).unwrap();
        assert!(matches!(
            b.add_top_level(m, NewNode::leaf("top", string())),
            Err(SchemaError::DuplicateNode(_))
        ));
        b.add_top_level(m, NewNode::grouping("top")).unwrap();
    }

    #[test]
    fn list_keys_through_uses() {
        let (mut b, m) = module();
        let list = b.add_top_level(m, NewNode::list("entry")).unwrap();
        let uses = b.add_child(list, NewNode::uses("key-fields")).unwrap();
        let name = b.add_child(uses, NewNode::leaf("name", string())).unwrap();
        b.set_list_keys(list, &["name"]).unwrap();
        assert!(matches!(
            b.set_list_keys(list, &["missing"]),
            Err(SchemaError::KeyNotFound { .. })
        ));
        let ctx = b.build();
        assert_eq!(ctx.node(list).keys(), &[name]);
    }

    #[test]
    fn default_case() {
        let (mut b, m) = module();
        let choice = b.add_top_level(m, NewNode::choice("c")).unwrap();
        b.add_child(choice, NewNode::leaf("a", string())).unwrap();
        b.set_default_case(choice, "a").unwrap();
        assert!(matches!(
            b.set_default_case(choice, "b"),
            Err(SchemaError::DefaultCaseNotFound { .. })
        ));
    }

    #[test]
    fn augment_splices_children_into_target() {
        let mut b = ContextBuilder::new();
        let base = b.add_module("base", "b").unwrap();
        let ext = b.add_module("ext", "x").unwrap();
        b.add_import(ext, base, "b").unwrap();
        let top = b.add_top_level(base, NewNode::container("top")).unwrap();
        let own = b.add_child(top, NewNode::leaf("own", string())).unwrap();

        let aug = b.add_augment(ext, "/b:top").unwrap();
        let added = b.add_child(aug, NewNode::leaf("extra", string())).unwrap();
        let ctx = b.build();

        assert_eq!(ctx.node(top).children, vec![own, added]);
        assert_eq!(ctx.node(aug).children, vec![added]);
        assert_eq!(ctx.parent(added), Some(top));
        assert_eq!(ctx.owner(added), Some(aug));
        assert!(ctx.node(added).is_injected());
        assert_eq!(ctx.module(ext).augments, vec![aug]);
        match &ctx.node(aug).data {
            NodeData::Augment { target_path, .. } => assert_eq!(target_path, "/base:top"),
            other => panic!("expected augment data, got {other:?}"),
        }
    }

    #[test]
    fn augment_target_must_exist() {
        let (mut b, m) = module();
        assert!(matches!(
            b.add_augment(m, "/ex:nothing"),
            Err(SchemaError::AugmentTargetNotFound(_))
        ));
    }

    #[test]
    fn augmenting_implicit_output_makes_it_explicit() {
        let (mut b, m) = module();
        let rpc = b.add_top_level(m, NewNode::rpc("run")).unwrap();
        let aug = b.add_augment(m, "/ex:run/ex:output").unwrap();
        b.add_augment_child(aug, NewNode::leaf("log", string())).unwrap();
        let ctx = b.build();
        let output = ctx.node(rpc).children[1];
        assert!(!ctx.node(output).flags.implicit);
    }

    #[test]
    fn if_feature_resolution() {
        let (mut b, m) = module();
        b.add_feature(m, "fancy", true).unwrap();
        assert!(matches!(
            b.add_feature(m, "fancy", true),
            Err(SchemaError::DuplicateFeature(_))
        ));
        b.add_top_level(m, NewNode::container("a").if_feature("ex:fancy"))
            .unwrap();
        assert!(matches!(
            b.add_top_level(m, NewNode::container("b").if_feature("missing")),
            Err(SchemaError::UnknownFeature(_))
        ));
    }
}
