use proptest::prelude::*;
use schema_tree_core::types::{is_identifier, parse_if_feature, FeatureName, Identifier, IfFeature};
use schema_tree_core::{path, ContextBuilder};

fn if_feature_expr() -> impl Strategy<Value = String> {
    let leaf = "[a-z][a-z0-9-]{0,8}".prop_filter("keyword or reserved prefix", |s| {
        !matches!(s.as_str(), "not" | "and" | "or") && !s.starts_with("xml")
    });
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("not {e}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} and {b}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} or {b}")),
            inner.prop_map(|e| format!("({e})")),
        ]
    })
}

proptest! {
    #[test]
    fn identifier_display_roundtrip(s in "[a-wyzA-WYZ_][a-zA-Z0-9_.-]{0,30}") {
        let id = Identifier::new(&s).unwrap();
        let back = Identifier::new(id.to_string()).unwrap();
        prop_assert_eq!(id, back);
    }

    #[test]
    fn identifier_rejects_leading_digit(s in "[0-9][a-z]{0,10}") {
        prop_assert!(!is_identifier(&s));
        prop_assert!(Identifier::new(&s).is_err());
    }

    #[test]
    fn rendered_if_feature_parses_to_same_tree(src in if_feature_expr()) {
        let parsed = parse_if_feature(&src).unwrap();
        let rendered = parsed.render(&|f: &FeatureName| f.name.clone());
        let reparsed = parse_if_feature(&rendered).unwrap();
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn prefix_rewrite_is_reversible(
        segments in prop::collection::vec(("(a|um)", "[a-z][a-z0-9]{0,6}"), 1..6)
    ) {
        let mut b = ContextBuilder::new();
        let base = b.add_module("base-module", "bm").unwrap();
        let user = b.add_module("user-module", "um").unwrap();
        b.add_import(user, base, "a").unwrap();
        let ctx = b.build();

        let prefixed: String = segments
            .iter()
            .map(|(q, n)| format!("/{q}:{n}"))
            .collect();
        let canonical = path::to_module_names(&ctx, user, &prefixed).unwrap();
        prop_assert!(!canonical.contains("/a:"));
        let back = path::to_prefixes(&ctx, user, &canonical).unwrap();
        prop_assert_eq!(back, prefixed);
    }
}

#[test]
fn parser_matches_not_precedence() {
    let e = parse_if_feature("not a or b").unwrap();
    assert!(matches!(e, IfFeature::Or(..)));
}
