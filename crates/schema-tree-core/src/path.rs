//! Schema-path resolution and prefix rewriting.
//!
//! Paths are absolute, `/`-separated sequences of `[prefix:]name` segments. A
//! qualifier may be a module name, the module's own prefix or an import
//! prefix; an unqualified segment inherits the module of the segment before
//! it.

use crate::context::SchemaContext;
use crate::error::SchemaError;
use crate::types::{is_identifier, ModuleId, NodeId, NodeKind};

struct Segment<'a> {
    qualifier: Option<&'a str>,
    name: &'a str,
}

fn split_segments(path: &str) -> Result<Vec<Segment<'_>>, SchemaError> {
    let invalid = || SchemaError::InvalidPath(path.to_string());
    let rest = path.strip_prefix('/').ok_or_else(invalid)?;
    rest.split('/')
        .map(|seg| {
            let (qualifier, name) = match seg.split_once(':') {
                Some((q, n)) => (Some(q), n),
                None => (None, seg),
            };
            let valid = is_identifier(name) && qualifier.map_or(true, is_identifier);
            valid.then_some(Segment { qualifier, name }).ok_or_else(invalid)
        })
        .collect()
}

/// Resolves a qualifier seen from `module`: prefix first, then module name.
fn resolve_qualifier(
    ctx: &SchemaContext,
    module: ModuleId,
    qualifier: &str,
) -> Result<ModuleId, SchemaError> {
    ctx.module_by_prefix(module, qualifier)
        .or_else(|| ctx.module_by_name(qualifier).map(|m| ctx.main_module(m)))
        .ok_or_else(|| SchemaError::UnknownPrefix {
            module: ctx.module(module).name.clone(),
            prefix: qualifier.to_string(),
        })
}

/// Collects nodes of `list` named `name` in module `module`, looking through
/// uses, choices and cases. Shorthand case wrappers are looked through but
/// never matched themselves.
fn collect_matches(
    ctx: &SchemaContext,
    list: &[NodeId],
    module: ModuleId,
    name: &str,
    out: &mut Vec<NodeId>,
) {
    for &id in list {
        let node = ctx.node(id);
        match node.kind() {
            NodeKind::Grouping | NodeKind::Augment => {}
            NodeKind::Uses => collect_matches(ctx, &node.children, module, name, out),
            kind => {
                let shorthand = kind == NodeKind::Case && node.flags.implicit;
                if !shorthand
                    && node.name == name
                    && ctx.node_module(id) == module
                    && !out.contains(&id)
                {
                    out.push(id);
                }
                if matches!(kind, NodeKind::Choice | NodeKind::Case) {
                    collect_matches(ctx, &node.children, module, name, out);
                }
            }
        }
    }
}

/// Finds every node addressed by `path`, resolving qualifiers from `module`.
///
/// Zero or several matches are not an error here; the caller decides.
pub fn find_path(
    ctx: &SchemaContext,
    module: ModuleId,
    path: &str,
) -> Result<Vec<NodeId>, SchemaError> {
    let segments = split_segments(path)?;
    let mut current_module = ctx.main_module(module);
    let mut matches: Vec<NodeId> = Vec::new();

    for (i, seg) in segments.iter().enumerate() {
        if let Some(q) = seg.qualifier {
            current_module = resolve_qualifier(ctx, module, q)?;
        }
        let mut next = Vec::new();
        if i == 0 {
            let top = &ctx.module(current_module).data;
            collect_matches(ctx, top, current_module, seg.name, &mut next);
        } else {
            for &m in &matches {
                collect_matches(ctx, &ctx.node(m).children, current_module, seg.name, &mut next);
            }
        }
        if next.is_empty() {
            return Ok(next);
        }
        matches = next;
    }
    Ok(matches)
}

/// Rewrites every `qualifier:` token of `path` through `rewrite`.
fn rewrite_qualifiers(
    path: &str,
    mut rewrite: impl FnMut(&str) -> Result<String, SchemaError>,
) -> Result<String, SchemaError> {
    let mut out = String::with_capacity(path.len());
    let mut token_start: Option<usize> = None;
    for (i, c) in path.char_indices() {
        let ident_char = c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
        if ident_char {
            if token_start.is_none() {
                token_start = Some(i);
            }
            continue;
        }
        if let Some(start) = token_start.take() {
            let token = &path[start..i];
            if c == ':' && is_identifier(token) {
                out.push_str(&rewrite(token)?);
            } else {
                out.push_str(token);
            }
        }
        out.push(c);
    }
    if let Some(start) = token_start {
        out.push_str(&path[start..]);
    }
    Ok(out)
}

/// Rewrites the qualifiers of a path (or leafref expression) written in
/// `module` into module names.
pub fn to_module_names(
    ctx: &SchemaContext,
    module: ModuleId,
    path: &str,
) -> Result<String, SchemaError> {
    rewrite_qualifiers(path, |q| {
        let target = resolve_qualifier(ctx, module, q)?;
        Ok(ctx.module(target).name.clone())
    })
}

/// Rewrites the qualifiers of a path (or leafref expression) into the
/// prefixes `module` uses for them.
pub fn to_prefixes(
    ctx: &SchemaContext,
    module: ModuleId,
    path: &str,
) -> Result<String, SchemaError> {
    rewrite_qualifiers(path, |q| {
        let target = ctx
            .module_by_name(q)
            .map(|m| ctx.main_module(m))
            .map_or_else(|| resolve_qualifier(ctx, module, q), Ok)?;
        Ok(ctx.prefix_for(module, target).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ContextBuilder, NewNode};
    use crate::types::{BaseType, LeafType};

    struct Fixture {
        ctx: SchemaContext,
        base: ModuleId,
        example: ModuleId,
        interface: NodeId,
        name: NodeId,
        ethernet: NodeId,
    }

    fn fixture() -> Fixture {
        let mut b = ContextBuilder::new();
        let base = b.add_module("ietf-interfaces", "if").unwrap();
        let example = b.add_module("example", "ex").unwrap();
        b.add_import(example, base, "if").unwrap();

        let ifs = b.add_top_level(base, NewNode::container("interfaces")).unwrap();
        let interface = b.add_child(ifs, NewNode::list("interface")).unwrap();
        let name = b
            .add_child(interface, NewNode::leaf("name", LeafType::builtin(BaseType::String)))
            .unwrap();
        let choice = b.add_child(interface, NewNode::choice("media")).unwrap();
        let ethernet = b.add_child(choice, NewNode::container("ethernet")).unwrap();
        Fixture {
            ctx: b.build(),
            base,
            example,
            interface,
            name,
            ethernet,
        }
    }

    #[test]
    fn finds_nodes_by_prefix_and_module_name() {
        let f = fixture();
        let by_prefix = find_path(&f.ctx, f.example, "/if:interfaces/if:interface").unwrap();
        assert_eq!(by_prefix, vec![f.interface]);
        let by_name =
            find_path(&f.ctx, f.example, "/ietf-interfaces:interfaces/interface/name").unwrap();
        assert_eq!(by_name, vec![f.name]);
    }

    #[test]
    fn unqualified_first_segment_uses_context_module() {
        let f = fixture();
        assert_eq!(
            find_path(&f.ctx, f.base, "/interfaces/interface").unwrap(),
            vec![f.interface]
        );
        assert!(find_path(&f.ctx, f.example, "/interfaces").unwrap().is_empty());
    }

    #[test]
    fn choice_and_case_are_transparent() {
        let f = fixture();
        let direct = find_path(&f.ctx, f.base, "/interfaces/interface/ethernet").unwrap();
        assert_eq!(direct, vec![f.ethernet]);
        let named = find_path(&f.ctx, f.base, "/interfaces/interface/media/ethernet").unwrap();
        assert!(named.contains(&f.ethernet));
    }

    #[test]
    fn malformed_paths() {
        let f = fixture();
        for p in ["interfaces", "/", "/a//b", "/a:b:c", "/9a"] {
            assert!(
                matches!(find_path(&f.ctx, f.base, p), Err(SchemaError::InvalidPath(_))),
                "expected InvalidPath for '{p}'"
            );
        }
        assert!(matches!(
            find_path(&f.ctx, f.example, "/nope:interfaces"),
            Err(SchemaError::UnknownPrefix { .. })
        ));
    }

    #[test]
    fn rewrites_qualifiers_both_ways() {
        let f = fixture();
        let canonical = to_module_names(&f.ctx, f.example, "/if:interfaces/if:interface").unwrap();
        assert_eq!(canonical, "/ietf-interfaces:interfaces/ietf-interfaces:interface");
        let back = to_prefixes(&f.ctx, f.example, &canonical).unwrap();
        assert_eq!(back, "/if:interfaces/if:interface");
    }

    #[test]
    fn rewrite_leaves_relative_paths_alone() {
        let f = fixture();
        let p = "../if:name[. = current()/../x]";
        assert_eq!(
            to_module_names(&f.ctx, f.example, p).unwrap(),
            "../ietf-interfaces:name[. = current()/../x]"
        );
        assert_eq!(to_module_names(&f.ctx, f.example, "../name").unwrap(), "../name");
    }
}
