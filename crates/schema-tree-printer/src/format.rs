//! Text of the type column: types, keys, defaults and if-features.

use schema_tree_core::path::to_prefixes;
use schema_tree_core::{FeatureId, LeafType, ModuleId, NodeData, NodeId, NodeKind};

use crate::options::RenderFlags;
use crate::printer::Printer;

impl Printer<'_> {
    /// How a module other than the rendered one is referred to in types,
    /// feature names and paths.
    fn module_qualifier(&self, module: ModuleId) -> &str {
        if self.rfc() {
            self.ctx.prefix_for(self.module, module)
        } else {
            &self.ctx.module(self.ctx.main_module(module)).name
        }
    }

    /// Rewrites a module-name path into prefixes for RFC output.
    fn display_path(&self, path: &str) -> String {
        if !self.rfc() {
            return path.to_string();
        }
        to_prefixes(self.ctx, self.module, path).unwrap_or_else(|e| {
            tracing::warn!(path, error = %e, "keeping module names in path");
            path.to_string()
        })
    }

    pub(crate) fn type_text(&self, ty: &LeafType) -> String {
        if ty.is_inline_leafref() {
            let path = match &ty.leafref_path {
                Some(path) if !self.options.flags.contains(RenderFlags::NO_LEAFREF_TARGET) => path,
                _ => return "leafref".to_string(),
            };
            return format!("-> {}", self.display_path(path));
        }
        match &ty.typedef {
            Some(td) if self.ctx.main_module(td.module) != self.main => {
                format!("{}:{}", self.module_qualifier(td.module), td.name)
            }
            _ => ty.name().to_string(),
        }
    }

    pub(crate) fn keys_text(&self, id: NodeId) -> Option<String> {
        let keys = self.ctx.node(id).keys();
        if keys.is_empty() {
            return None;
        }
        let names: Vec<&str> = keys.iter().map(|&k| self.ctx.node(k).name.as_str()).collect();
        Some(format!("[{}]", names.join(" ")))
    }

    pub(crate) fn default_text(&self, id: NodeId) -> Option<String> {
        match &self.ctx.node(id).data {
            NodeData::Leaf {
                default: Some(value),
                ..
            } => Some(format!("<{value}>")),
            NodeData::Choice {
                default_case: Some(case),
            } => Some(format!("<{}>", self.ctx.node(*case).name)),
            _ => None,
        }
    }

    fn feature_name(&self, feature: FeatureId) -> String {
        let f = self.ctx.feature(feature);
        if self.ctx.main_module(f.module) == self.main {
            f.name.clone()
        } else {
            format!("{}:{}", self.module_qualifier(f.module), f.name)
        }
    }

    /// `{a,b}?` from the node's if-features followed by those of the augment
    /// that declared it.
    pub(crate) fn if_features_text(&self, id: NodeId) -> Option<String> {
        let node = self.ctx.node(id);
        let inherited = node
            .owner
            .map(|o| self.ctx.node(o))
            .filter(|o| o.kind() == NodeKind::Augment)
            .map_or(&[][..], |o| o.if_features.as_slice());
        let exprs: Vec<String> = node
            .if_features
            .iter()
            .chain(inherited)
            .map(|e| e.render(&|f: &FeatureId| self.feature_name(*f)))
            .collect();
        if exprs.is_empty() {
            return None;
        }
        Some(format!("{{{}}}?", exprs.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TreeOptions;
    use schema_tree_core::{BaseType, ContextBuilder, NewNode, SchemaContext, TypedefRef};

    struct Fixture {
        ctx: SchemaContext,
        base: schema_tree_core::ModuleId,
        ext: schema_tree_core::ModuleId,
    }

    fn fixture() -> Fixture {
        let mut b = ContextBuilder::new();
        let base = b.add_module("ietf-interfaces", "if").unwrap();
        let ext = b.add_module("example", "ex").unwrap();
        b.add_import(ext, base, "ifs").unwrap();
        b.add_feature(base, "arbitrary-names", true).unwrap();
        b.add_feature(ext, "fast", true).unwrap();
        Fixture {
            ctx: b.build(),
            base,
            ext,
        }
    }

    #[test]
    fn typedefs_from_other_modules_are_qualified() {
        let f = fixture();
        let ty = LeafType {
            base: BaseType::String,
            typedef: Some(TypedefRef {
                name: "interface-ref".into(),
                module: f.base,
            }),
            leafref_path: None,
        };
        let plain = Printer::new(&f.ctx, f.ext, TreeOptions::default());
        assert_eq!(plain.type_text(&ty), "ietf-interfaces:interface-ref");
        let rfc = Printer::new(&f.ctx, f.ext, TreeOptions::default().with_flags(RenderFlags::RFC));
        assert_eq!(rfc.type_text(&ty), "ifs:interface-ref");
        let local = Printer::new(&f.ctx, f.base, TreeOptions::default());
        assert_eq!(local.type_text(&ty), "interface-ref");
    }

    #[test]
    fn leafref_targets() {
        let f = fixture();
        let mut ty = LeafType::builtin(BaseType::Leafref);
        ty.leafref_path = Some("/ietf-interfaces:interfaces/ietf-interfaces:interface".into());

        let plain = Printer::new(&f.ctx, f.ext, TreeOptions::default());
        assert_eq!(
            plain.type_text(&ty),
            "-> /ietf-interfaces:interfaces/ietf-interfaces:interface"
        );
        let rfc = Printer::new(&f.ctx, f.ext, TreeOptions::default().with_flags(RenderFlags::RFC));
        assert_eq!(rfc.type_text(&ty), "-> /ifs:interfaces/ifs:interface");
        let hidden = Printer::new(
            &f.ctx,
            f.ext,
            TreeOptions::default().with_flags(RenderFlags::NO_LEAFREF_TARGET),
        );
        assert_eq!(hidden.type_text(&ty), "leafref");
    }

    #[test]
    fn builtin_type_names() {
        let f = fixture();
        let p = Printer::new(&f.ctx, f.ext, TreeOptions::default());
        assert_eq!(p.type_text(&LeafType::builtin(BaseType::Uint32)), "uint32");
    }

    #[test]
    fn feature_lists() {
        let mut b = ContextBuilder::new();
        let base = b.add_module("base", "b").unwrap();
        let ext = b.add_module("ext", "e").unwrap();
        b.add_import(ext, base, "b").unwrap();
        b.add_feature(base, "remote", true).unwrap();
        b.add_feature(ext, "fast", true).unwrap();
        b.add_feature(ext, "slow", true).unwrap();
        let top = b.add_top_level(base, NewNode::container("top")).unwrap();
        let aug = b.add_augment(ext, "/b:top").unwrap();
        b.add_if_feature(aug, "slow").unwrap();
        let leaf = b
            .add_child(
                aug,
                NewNode::leaf("x", LeafType::builtin(BaseType::String))
                    .if_feature("fast and b:remote"),
            )
            .unwrap();
        let ctx = b.build();

        let p = Printer::new(&ctx, ext, TreeOptions::default());
        assert_eq!(p.if_features_text(leaf).as_deref(), Some("{fast and base:remote,slow}?"));
        let from_base = Printer::new(&ctx, base, TreeOptions::default());
        assert_eq!(
            from_base.if_features_text(leaf).as_deref(),
            Some("{ext:fast and remote,ext:slow}?")
        );
        assert_eq!(p.if_features_text(top), None);
    }
}
