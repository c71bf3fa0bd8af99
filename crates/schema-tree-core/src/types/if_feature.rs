use crate::error::SchemaError;

use super::identifier::is_identifier;
use super::ids::FeatureId;

/// A boolean expression over features.
///
/// The leaf type is generic so that the same shape serves both the parsed
/// (name-based) form and the resolved (`FeatureId`-based) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IfFeature<T> {
    Feature(T),
    Not(Box<IfFeature<T>>),
    And(Box<IfFeature<T>>, Box<IfFeature<T>>),
    Or(Box<IfFeature<T>>, Box<IfFeature<T>>),
}

/// A resolved if-feature expression stored on compiled nodes.
pub type IfFeatureExpr = IfFeature<FeatureId>;

/// A feature reference as written: optional prefix plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureName {
    pub prefix: Option<String>,
    pub name: String,
}

impl<T> IfFeature<T> {
    /// Evaluates the expression, asking `enabled` about each feature.
    pub fn eval(&self, enabled: &impl Fn(&T) -> bool) -> bool {
        match self {
            Self::Feature(f) => enabled(f),
            Self::Not(e) => !e.eval(enabled),
            Self::And(a, b) => a.eval(enabled) && b.eval(enabled),
            Self::Or(a, b) => a.eval(enabled) || b.eval(enabled),
        }
    }

    /// Rewrites every feature reference, failing on the first error.
    pub fn try_map<U, E>(
        &self,
        f: &mut impl FnMut(&T) -> Result<U, E>,
    ) -> Result<IfFeature<U>, E> {
        Ok(match self {
            Self::Feature(t) => IfFeature::Feature(f(t)?),
            Self::Not(e) => IfFeature::Not(Box::new(e.try_map(f)?)),
            Self::And(a, b) => IfFeature::And(Box::new(a.try_map(f)?), Box::new(b.try_map(f)?)),
            Self::Or(a, b) => IfFeature::Or(Box::new(a.try_map(f)?), Box::new(b.try_map(f)?)),
        })
    }

    /// Renders the expression in schema syntax, naming features through
    /// `name`. Operands are parenthesised wherever reparsing would otherwise
    /// build a different tree.
    pub fn render(&self, name: &impl Fn(&T) -> String) -> String {
        match self {
            Self::Feature(t) => name(t),
            Self::Not(e) => match e.as_ref() {
                Self::Feature(_) | Self::Not(_) => format!("not {}", e.render(name)),
                _ => format!("not ({})", e.render(name)),
            },
            Self::And(a, b) => {
                let lhs = match a.as_ref() {
                    Self::And(..) | Self::Or(..) => format!("({})", a.render(name)),
                    _ => a.render(name),
                };
                let rhs = match b.as_ref() {
                    Self::Or(..) => format!("({})", b.render(name)),
                    _ => b.render(name),
                };
                format!("{lhs} and {rhs}")
            }
            Self::Or(a, b) => {
                let lhs = match a.as_ref() {
                    Self::Or(..) => format!("({})", a.render(name)),
                    _ => a.render(name),
                };
                format!("{lhs} or {}", b.render(name))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok<'a> {
    Open,
    Close,
    Not,
    And,
    Or,
    Ref(&'a str),
}

fn tokenize(expr: &str) -> Vec<Tok<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in expr.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(word(&expr[s..i]));
            }
            match c {
                '(' => tokens.push(Tok::Open),
                ')' => tokens.push(Tok::Close),
                _ => {}
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(word(&expr[s..]));
    }
    tokens
}

fn word(w: &str) -> Tok<'_> {
    match w {
        "not" => Tok::Not,
        "and" => Tok::And,
        "or" => Tok::Or,
        other => Tok::Ref(other),
    }
}

struct ExprParser<'a> {
    source: &'a str,
    tokens: Vec<Tok<'a>>,
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn error(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::InvalidIfFeature {
            expr: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn next(&mut self) -> Option<Tok<'a>> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn peek(&self) -> Option<&Tok<'a>> {
        self.tokens.get(self.pos)
    }

    /// expr = term ["or" expr]
    fn expr(&mut self) -> Result<IfFeature<FeatureName>, SchemaError> {
        let term = self.term()?;
        if self.peek() == Some(&Tok::Or) {
            self.pos += 1;
            let rest = self.expr()?;
            return Ok(IfFeature::Or(Box::new(term), Box::new(rest)));
        }
        Ok(term)
    }

    /// term = factor ["and" term]
    fn term(&mut self) -> Result<IfFeature<FeatureName>, SchemaError> {
        let factor = self.factor()?;
        if self.peek() == Some(&Tok::And) {
            self.pos += 1;
            let rest = self.term()?;
            return Ok(IfFeature::And(Box::new(factor), Box::new(rest)));
        }
        Ok(factor)
    }

    /// factor = "not" factor / "(" expr ")" / identifier-ref
    fn factor(&mut self) -> Result<IfFeature<FeatureName>, SchemaError> {
        match self.next() {
            Some(Tok::Not) => Ok(IfFeature::Not(Box::new(self.factor()?))),
            Some(Tok::Open) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Tok::Close) => Ok(inner),
                    _ => Err(self.error("missing ')'")),
                }
            }
            Some(Tok::Ref(r)) => parse_feature_ref(r)
                .map(IfFeature::Feature)
                .ok_or_else(|| self.error(format!("'{r}' is not a feature reference"))),
            Some(other) => Err(self.error(format!("unexpected {other:?}"))),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

fn parse_feature_ref(r: &str) -> Option<FeatureName> {
    match r.split_once(':') {
        Some((prefix, name)) if is_identifier(prefix) && is_identifier(name) => Some(FeatureName {
            prefix: Some(prefix.to_string()),
            name: name.to_string(),
        }),
        None if is_identifier(r) => Some(FeatureName {
            prefix: None,
            name: r.to_string(),
        }),
        _ => None,
    }
}

/// Parses an if-feature expression such as `"a and (b or not c)"`.
pub fn parse_if_feature(expr: &str) -> Result<IfFeature<FeatureName>, SchemaError> {
    let mut parser = ExprParser {
        source: expr,
        tokens: tokenize(expr),
        pos: 0,
    };
    let parsed = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("trailing tokens"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(expr: &IfFeature<FeatureName>) -> String {
        expr.render(&|f: &FeatureName| match &f.prefix {
            Some(p) => format!("{p}:{}", f.name),
            None => f.name.clone(),
        })
    }

    #[test]
    fn single_feature() {
        let e = parse_if_feature("fancy").unwrap();
        assert_eq!(
            e,
            IfFeature::Feature(FeatureName {
                prefix: None,
                name: "fancy".into()
            })
        );
    }

    #[test]
    fn prefixed_feature() {
        let e = parse_if_feature("if:arbitrary-names").unwrap();
        assert_eq!(render(&e), "if:arbitrary-names");
    }

    #[test]
    fn precedence_not_and_or() {
        let e = parse_if_feature("not a and b or c").unwrap();
        assert_eq!(render(&e), "not a and b or c");
        match e {
            IfFeature::Or(lhs, _) => assert!(matches!(*lhs, IfFeature::And(..))),
            other => panic!("expected Or at the root, got {other:?}"),
        }
    }

    #[test]
    fn parentheses_are_kept_where_needed() {
        let e = parse_if_feature("a and (b or c)").unwrap();
        assert_eq!(render(&e), "a and (b or c)");
        let e = parse_if_feature("not (a or b)").unwrap();
        assert_eq!(render(&e), "not (a or b)");
        let e = parse_if_feature("((a))").unwrap();
        assert_eq!(render(&e), "a");
    }

    #[test]
    fn eval_uses_enabled_set() {
        let e = parse_if_feature("a and not b").unwrap();
        let on = |names: &'static [&'static str]| {
            move |f: &FeatureName| names.contains(&f.name.as_str())
        };
        assert!(e.eval(&on(&["a"])));
        assert!(!e.eval(&on(&["a", "b"])));
        assert!(!e.eval(&on(&[])));
    }

    #[test]
    fn malformed_expressions() {
        for src in ["", "a and", "(a", "a b", "not", "a or or b", "9x", "a:b:c"] {
            assert!(parse_if_feature(src).is_err(), "expected error for '{src}'");
        }
    }

    #[test]
    fn try_map_resolves_names() {
        let e = parse_if_feature("a or b").unwrap();
        let mapped: IfFeature<usize> = e
            .try_map(&mut |f: &FeatureName| Ok::<_, ()>(f.name.len()))
            .unwrap();
        assert!(matches!(mapped, IfFeature::Or(..)));
    }
}
