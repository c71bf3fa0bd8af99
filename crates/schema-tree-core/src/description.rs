//! Declarative JSON description of a schema set.
//!
//! A description lists modules with their imports, features, data trees and
//! augments. [`SchemaContext::from_json`] compiles it into a context:
//!
//! ```
//! use schema_tree_core::SchemaContext;
//!
//! let ctx = SchemaContext::from_json(r#"{
//!   "modules": [{
//!     "name": "example",
//!     "prefix": "ex",
//!     "data": [{
//!       "kind": "container", "name": "top",
//!       "children": [
//!         { "kind": "leaf", "name": "id", "type": "uint32", "mandatory": true },
//!         { "kind": "leaf", "name": "name", "type": "string" }
//!       ]
//!     }]
//!   }]
//! }"#).unwrap();
//!
//! let m = ctx.module_by_name("example").unwrap();
//! assert_eq!(ctx.module(m).data.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::builder::{ContextBuilder, NewNode};
use crate::context::SchemaContext;
use crate::error::SchemaError;
use crate::path::{find_path, to_module_names};
use crate::types::{BaseType, Config, Identifier, LeafType, ModuleId, NodeId, Status, TypedefRef};

/// Root of a description document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescription {
    pub modules: Vec<ModuleDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDescription {
    pub name: Identifier,
    /// Defaults to the module name. Ignored for submodules, which share the
    /// prefix of the module they belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Present for submodules: the name of the main module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belongs_to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<NodeDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub augments: Vec<AugmentDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDescription {
    pub module: String,
    pub prefix: Identifier,
}

/// A feature: either a bare name (enabled) or `{ "name", "enabled" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureDescription {
    Enabled(Identifier),
    Detailed {
        name: Identifier,
        #[serde(default = "enabled_by_default")]
        enabled: bool,
    },
}

fn enabled_by_default() -> bool {
    true
}

impl FeatureDescription {
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Enabled(name) | Self::Detailed { name, .. } => name,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Self::Enabled(_) => true,
            Self::Detailed { enabled, .. } => *enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AugmentDescription {
    /// Absolute schema path of the target; prefixes are those of the
    /// augmenting module.
    pub target: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
}

/// One node of a data tree. The `kind` tag selects the kind-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeDescription {
    /// Node name; for `uses` the (optionally prefixed) grouping name.
    pub name: String,
    #[serde(flatten)]
    pub body: NodeBody,
    /// `true` for configuration, `false` for state; inherited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<bool>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeBody {
    Container {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        presence: Option<String>,
    },
    Choice {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    Case,
    Leaf {
        #[serde(rename = "type")]
        ty: TypeDescription,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    LeafList {
        #[serde(rename = "type")]
        ty: TypeDescription,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        defaults: Vec<String>,
    },
    #[serde(rename_all = "kebab-case")]
    List {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        keys: Vec<String>,
        #[serde(default)]
        min_elements: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_elements: Option<u32>,
    },
    Anydata,
    Anyxml,
    Uses,
    Grouping,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
}

/// A leaf type: a bare built-in name or a detailed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDescription {
    Builtin(BaseType),
    Detailed {
        base: BaseType,
        /// Typedef the type derives from, optionally `prefix:`-qualified.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        typedef: Option<String>,
        /// Leafref target path.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
}

impl SchemaContext {
    /// Parses and compiles a JSON description.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let description: ContextDescription = serde_json::from_str(json)?;
        Self::from_description(&description)
    }

    /// Compiles a description into a context.
    pub fn from_description(description: &ContextDescription) -> Result<Self, SchemaError> {
        Compiler::new(description).run()
    }
}

enum Place {
    Top,
    Child(NodeId),
    Augment(NodeId),
}

struct Compiler<'a> {
    description: &'a ContextDescription,
    builder: ContextBuilder,
    /// Module id of each description entry, by position.
    ids: Vec<ModuleId>,
}

impl<'a> Compiler<'a> {
    fn new(description: &'a ContextDescription) -> Self {
        Self {
            description,
            builder: ContextBuilder::new(),
            ids: Vec::with_capacity(description.modules.len()),
        }
    }

    fn run(mut self) -> Result<SchemaContext, SchemaError> {
        self.create_modules()?;
        self.wire_modules()?;

        let description = self.description;
        for (i, module) in description.modules.iter().enumerate() {
            tracing::debug!(module = %module.name, "compiling data tree");
            for node in &module.data {
                self.compile_node(self.ids[i], &Place::Top, node, &mut Vec::new())?;
            }
        }

        self.resolve_augments()?;
        Ok(self.builder.build())
    }

    fn create_modules(&mut self) -> Result<(), SchemaError> {
        let modules = &self.description.modules;
        let mut ids = vec![None; modules.len()];
        for (i, m) in modules.iter().enumerate() {
            if m.belongs_to.is_none() {
                let prefix = m.prefix.as_ref().unwrap_or(&m.name);
                ids[i] = Some(self.builder.add_module(m.name.as_str(), prefix.as_str())?);
            }
        }
        for (i, m) in modules.iter().enumerate() {
            if let Some(main) = &m.belongs_to {
                let main_id = self
                    .builder
                    .context()
                    .module_by_name(main)
                    .ok_or_else(|| SchemaError::UnknownModule(main.clone()))?;
                ids[i] = Some(self.builder.add_submodule(m.name.as_str(), main_id)?);
            }
        }
        self.ids = ids.into_iter().flatten().collect();
        Ok(())
    }

    fn wire_modules(&mut self) -> Result<(), SchemaError> {
        for (i, m) in self.description.modules.iter().enumerate() {
            let id = self.ids[i];
            if let Some(ns) = &m.namespace {
                self.builder.set_namespace(id, ns);
            }
            if let Some(rev) = &m.revision {
                self.builder.set_revision(id, rev);
            }
            for import in &m.imports {
                let imported = self
                    .builder
                    .context()
                    .module_by_name(&import.module)
                    .ok_or_else(|| SchemaError::UnknownModule(import.module.clone()))?;
                self.builder.add_import(id, imported, import.prefix.as_str())?;
            }
            for feature in &m.features {
                self.builder
                    .add_feature(id, feature.name().as_str(), feature.enabled())?;
            }
        }
        Ok(())
    }

    fn resolve_augments(&mut self) -> Result<(), SchemaError> {
        let description = self.description;
        let mut pending: Vec<(ModuleId, &'a AugmentDescription)> = description
            .modules
            .iter()
            .enumerate()
            .flat_map(|(i, m)| m.augments.iter().map(move |a| (i, a)))
            .map(|(i, a)| (self.ids[i], a))
            .collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::new();
            for (module, aug) in pending {
                let targets = find_path(self.builder.context(), module, &aug.target)?;
                match targets.len() {
                    0 => {
                        waiting.push((module, aug));
                        continue;
                    }
                    1 => {}
                    _ => return Err(SchemaError::AugmentTargetNotFound(aug.target.clone())),
                }
                let id = self.builder.add_augment(module, &aug.target)?;
                for expr in &aug.if_features {
                    self.builder.add_if_feature(id, expr)?;
                }
                for child in &aug.children {
                    self.compile_node(module, &Place::Augment(id), child, &mut Vec::new())?;
                }
            }
            if waiting.len() == before {
                let (_, first) = waiting[0];
                return Err(SchemaError::UnresolvedAugment(first.target.clone()));
            }
            tracing::debug!(remaining = waiting.len(), "augment pass finished");
            pending = waiting;
        }
        Ok(())
    }

    fn compile_node(
        &mut self,
        module: ModuleId,
        place: &Place,
        node: &'a NodeDescription,
        expanding: &mut Vec<String>,
    ) -> Result<NodeId, SchemaError> {
        let new = self.new_node(module, node)?;
        let id = match place {
            Place::Top => self.builder.add_top_level(module, new)?,
            Place::Child(parent) => self.builder.add_child(*parent, new)?,
            Place::Augment(aug) => self.builder.add_augment_child(*aug, new)?,
        };

        if matches!(node.body, NodeBody::Uses) && node.children.is_empty() {
            let (key, grouping) = self.find_grouping(module, &node.name)?;
            if expanding.contains(&key) {
                return Err(SchemaError::RecursiveGrouping(key));
            }
            expanding.push(key);
            for child in &grouping.children {
                self.compile_node(module, &Place::Child(id), child, expanding)?;
            }
            expanding.pop();
        } else {
            for child in &node.children {
                self.compile_node(module, &Place::Child(id), child, expanding)?;
            }
        }

        match &node.body {
            NodeBody::List { keys, .. } if !keys.is_empty() => {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                self.builder.set_list_keys(id, &keys)?;
            }
            NodeBody::Choice {
                default: Some(case),
            } => self.builder.set_default_case(id, case)?,
            _ => {}
        }
        Ok(id)
    }

    /// Finds the top-level grouping a `uses` refers to. Returns a key naming
    /// the grouping uniquely together with its description.
    fn find_grouping(
        &self,
        module: ModuleId,
        reference: &str,
    ) -> Result<(String, &'a NodeDescription), SchemaError> {
        let ctx = self.builder.context();
        let (target, name) = match reference.split_once(':') {
            Some((prefix, name)) => {
                let target = ctx
                    .module_by_prefix(module, prefix)
                    .or_else(|| ctx.module_by_name(prefix).map(|m| ctx.main_module(m)))
                    .ok_or_else(|| SchemaError::UnknownGrouping(reference.to_string()))?;
                (target, name)
            }
            None => (ctx.main_module(module), reference),
        };

        let description = self.description;
        description
            .modules
            .iter()
            .zip(&self.ids)
            .filter(|(_, id)| ctx.main_module(**id) == target)
            .flat_map(|(m, _)| m.data.iter())
            .find(|n| matches!(n.body, NodeBody::Grouping) && n.name == name)
            .map(|g| (format!("{}:{name}", ctx.module(target).name), g))
            .ok_or_else(|| SchemaError::UnknownGrouping(reference.to_string()))
    }

    fn new_node(&self, module: ModuleId, node: &NodeDescription) -> Result<NewNode, SchemaError> {
        let name = node.name.as_str();
        let mut new = match &node.body {
            NodeBody::Container { presence } => {
                let c = NewNode::container(name);
                match presence {
                    Some(p) => c.presence(p.as_str()),
                    None => c,
                }
            }
            NodeBody::Choice { .. } => NewNode::choice(name),
            NodeBody::Case => NewNode::case(name),
            NodeBody::Leaf { ty, default } => {
                let leaf = NewNode::leaf(name, self.leaf_type(module, ty)?);
                match default {
                    Some(d) => leaf.default_value(d.as_str()),
                    None => leaf,
                }
            }
            NodeBody::LeafList { ty, defaults } => defaults.iter().fold(
                NewNode::leaf_list(name, self.leaf_type(module, ty)?),
                |n, d| n.default_value(d.as_str()),
            ),
            NodeBody::List {
                min_elements,
                max_elements,
                ..
            } => NewNode::list(name).elements(*min_elements, *max_elements),
            NodeBody::Anydata => NewNode::anydata(name),
            NodeBody::Anyxml => NewNode::anyxml(name),
            NodeBody::Uses => NewNode::uses(name),
            NodeBody::Grouping => NewNode::grouping(name),
            NodeBody::Rpc => NewNode::rpc(name),
            NodeBody::Action => NewNode::action(name),
            NodeBody::Input => NewNode::input(),
            NodeBody::Output => NewNode::output(),
            NodeBody::Notification => NewNode::notification(name),
        };

        if let Some(config) = node.config {
            new = new.config(if config {
                Config::ReadWrite
            } else {
                Config::ReadOnly
            });
        }
        new = new.status(node.status).mandatory(node.mandatory);
        for expr in &node.if_features {
            new = new.if_feature(expr.as_str());
        }
        if let Some(when) = &node.when {
            new = new.when(when.as_str());
        }
        Ok(new)
    }

    fn leaf_type(&self, module: ModuleId, ty: &TypeDescription) -> Result<LeafType, SchemaError> {
        let (base, typedef, path) = match ty {
            TypeDescription::Builtin(base) => return Ok(LeafType::builtin(*base)),
            TypeDescription::Detailed {
                base,
                typedef,
                path,
            } => (*base, typedef, path),
        };
        let ctx = self.builder.context();
        let typedef = match typedef {
            None => None,
            Some(reference) => Some(match reference.split_once(':') {
                Some((prefix, name)) => TypedefRef {
                    name: name.to_string(),
                    module: ctx
                        .module_by_prefix(module, prefix)
                        .or_else(|| ctx.module_by_name(prefix))
                        .ok_or_else(|| SchemaError::UnknownPrefix {
                            module: ctx.module(module).name.clone(),
                            prefix: prefix.to_string(),
                        })?,
                },
                None => TypedefRef {
                    name: reference.clone(),
                    module,
                },
            }),
        };
        let leafref_path = path
            .as_deref()
            .map(|p| to_module_names(ctx, module, p))
            .transpose()?;
        Ok(LeafType {
            base,
            typedef,
            leafref_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeData, NodeKind};

    const INTERFACES: &str = r#"{
      "modules": [
        {
          "name": "ietf-interfaces",
          "prefix": "if",
          "features": [{ "name": "arbitrary-names", "enabled": false }],
          "data": [
            { "kind": "container", "name": "interfaces", "children": [
              { "kind": "list", "name": "interface", "keys": ["name"], "children": [
                { "kind": "leaf", "name": "name", "type": "string" },
                { "kind": "leaf", "name": "type", "mandatory": true,
                  "type": { "base": "identityref", "typedef": "interface-type" } }
              ]}
            ]}
          ]
        },
        {
          "name": "example-ip",
          "prefix": "ip",
          "imports": [{ "module": "ietf-interfaces", "prefix": "if" }],
          "augments": [
            { "target": "/if:interfaces/if:interface/ip:ipv4",
              "children": [{ "kind": "leaf", "name": "mtu", "type": "uint16" }] },
            { "target": "/if:interfaces/if:interface",
              "children": [{ "kind": "container", "name": "ipv4" }] }
          ]
        }
      ]
    }"#;

    #[test]
    fn compiles_modules_and_imports() {
        let ctx = SchemaContext::from_json(INTERFACES).unwrap();
        let base = ctx.module_by_name("ietf-interfaces").unwrap();
        let ip = ctx.module_by_name("example-ip").unwrap();
        assert_eq!(ctx.module(ip).imports[0].module, base);
        assert_eq!(ctx.module(base).features.len(), 1);
        assert!(!ctx.feature_enabled(ctx.module(base).features[0]));
    }

    #[test]
    fn augments_resolve_in_dependency_order() {
        let ctx = SchemaContext::from_json(INTERFACES).unwrap();
        let base = ctx.module_by_name("ietf-interfaces").unwrap();
        let ip = ctx.module_by_name("example-ip").unwrap();
        assert_eq!(ctx.module(ip).augments.len(), 2);

        let mtu = find_path(&ctx, base, "/interfaces/interface/example-ip:ipv4/mtu").unwrap();
        assert_eq!(mtu.len(), 1);
        let owner = ctx.owner(mtu[0]).unwrap();
        assert_eq!(ctx.node(owner).kind(), NodeKind::Augment);
    }

    #[test]
    fn list_keys_and_typedefs() {
        let ctx = SchemaContext::from_json(INTERFACES).unwrap();
        let base = ctx.module_by_name("ietf-interfaces").unwrap();
        let list = find_path(&ctx, base, "/interfaces/interface").unwrap()[0];
        let name = find_path(&ctx, base, "/interfaces/interface/name").unwrap()[0];
        assert_eq!(ctx.node(list).keys(), &[name]);

        let ty = find_path(&ctx, base, "/interfaces/interface/type").unwrap()[0];
        let leaf_type = ctx.node(ty).leaf_type().unwrap();
        assert_eq!(leaf_type.name(), "interface-type");
        assert_eq!(leaf_type.base, BaseType::Identityref);
    }

    #[test]
    fn uses_expands_grouping() {
        let ctx = SchemaContext::from_json(
            r#"{"modules": [{
              "name": "m", "prefix": "m",
              "data": [
                { "kind": "grouping", "name": "endpoint", "children": [
                  { "kind": "leaf", "name": "address", "type": "string" },
                  { "kind": "leaf", "name": "port", "type": "uint16" }
                ]},
                { "kind": "container", "name": "server", "children": [
                  { "kind": "uses", "name": "endpoint" }
                ]}
              ]
            }]}"#,
        )
        .unwrap();
        let m = ctx.module_by_name("m").unwrap();
        let server = find_path(&ctx, m, "/server").unwrap()[0];
        let uses = ctx.node(server).children[0];
        assert_eq!(ctx.node(uses).kind(), NodeKind::Uses);
        assert_eq!(ctx.node(uses).children.len(), 2);
        assert_eq!(find_path(&ctx, m, "/server/port").unwrap().len(), 1);
        assert_eq!(ctx.node(server).flags.config, Some(Config::ReadWrite));
    }

    #[test]
    fn recursive_grouping_is_rejected() {
        let err = SchemaContext::from_json(
            r#"{"modules": [{
              "name": "m",
              "data": [
                { "kind": "grouping", "name": "g", "children": [
                  { "kind": "container", "name": "c", "children": [
                    { "kind": "uses", "name": "g" }
                  ]}
                ]},
                { "kind": "uses", "name": "g" }
              ]
            }]}"#,
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::RecursiveGrouping("m:g".into()));
    }

    #[test]
    fn unresolvable_augment() {
        let err = SchemaContext::from_json(
            r#"{"modules": [{
              "name": "m",
              "augments": [{ "target": "/m:missing", "children": [] }]
            }]}"#,
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::UnresolvedAugment("/m:missing".into()));
    }

    #[test]
    fn submodule_nodes_are_tagged() {
        let ctx = SchemaContext::from_json(
            r#"{"modules": [
              { "name": "main", "prefix": "mn",
                "data": [{ "kind": "container", "name": "a" }] },
              { "name": "main-sub", "belongs-to": "main",
                "data": [{ "kind": "container", "name": "b" }] }
            ]}"#,
        )
        .unwrap();
        let main = ctx.module_by_name("main").unwrap();
        let sub = ctx.module_by_name("main-sub").unwrap();
        assert_eq!(ctx.module(sub).belongs_to(), Some(main));
        assert_eq!(ctx.module(main).data.len(), 2);
        let b = ctx.top_level(sub).next().unwrap();
        assert_eq!(ctx.node(b).name, "b");
        assert_eq!(ctx.module(sub).prefix, "mn");
    }

    #[test]
    fn leafref_paths_are_canonical() {
        let ctx = SchemaContext::from_json(
            r#"{"modules": [
              { "name": "base", "prefix": "b",
                "data": [{ "kind": "leaf", "name": "id", "type": "string" }] },
              { "name": "user", "prefix": "u",
                "imports": [{ "module": "base", "prefix": "bs" }],
                "data": [{ "kind": "leaf", "name": "ref",
                  "type": { "base": "leafref", "path": "/bs:id" } }] }
            ]}"#,
        )
        .unwrap();
        let user = ctx.module_by_name("user").unwrap();
        let r = ctx.top_level(user).next().unwrap();
        match &ctx.node(r).data {
            NodeData::Leaf { ty, .. } => {
                assert_eq!(ty.leafref_path.as_deref(), Some("/base:id"));
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn syntax_errors_carry_position() {
        let err = SchemaContext::from_json("{\n \"modules\": [ }").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDescription { line: 2, .. }));
    }
}
