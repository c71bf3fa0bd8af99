use std::fmt;

use crate::types::NodeKind;

/// Errors that occur when constructing or querying a schema graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Identifier failed `[A-Za-z_][A-Za-z0-9_.-]*` validation.
    InvalidIdentifier(String),
    /// Two modules (or submodules) share a name.
    DuplicateModule(String),
    /// A module referenced by name is not part of the context.
    UnknownModule(String),
    /// A prefix is neither the module's own prefix nor an import prefix.
    UnknownPrefix { module: String, prefix: String },
    /// An if-feature expression names a feature nobody defines.
    UnknownFeature(String),
    /// A module defines the same feature twice.
    DuplicateFeature(String),
    /// An if-feature expression could not be parsed.
    InvalidIfFeature { expr: String, reason: String },
    /// A node kind is not allowed under the given parent kind.
    InvalidChild { parent: NodeKind, child: NodeKind },
    /// A node kind cannot appear directly in a module body.
    InvalidTopLevel(NodeKind),
    /// Two siblings of the same module share a name.
    DuplicateNode(String),
    /// A list key does not name a leaf child of the list.
    KeyNotFound { list: String, key: String },
    /// A choice default does not name one of its cases.
    DefaultCaseNotFound { choice: String, case: String },
    /// A schema path is syntactically invalid.
    InvalidPath(String),
    /// An augment target path resolved to nothing (or to several nodes).
    AugmentTargetNotFound(String),
    /// Augments remained whose targets never appeared.
    UnresolvedAugment(String),
    /// A `uses` names a grouping that the module does not define.
    UnknownGrouping(String),
    /// A grouping is expanded, directly or indirectly, inside itself.
    RecursiveGrouping(String),
    /// A description document could not be deserialized.
    InvalidDescription {
        message: String,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(s) => {
                write!(
                    f,
                    "invalid identifier '{s}': must match [A-Za-z_][A-Za-z0-9_.-]*"
                )
            }
            Self::DuplicateModule(name) => write!(f, "duplicate module '{name}'"),
            Self::UnknownModule(name) => write!(f, "unknown module '{name}'"),
            Self::UnknownPrefix { module, prefix } => {
                write!(f, "unknown prefix '{prefix}' in module '{module}'")
            }
            Self::UnknownFeature(name) => write!(f, "unknown feature '{name}'"),
            Self::DuplicateFeature(name) => write!(f, "duplicate feature '{name}'"),
            Self::InvalidIfFeature { expr, reason } => {
                write!(f, "invalid if-feature expression '{expr}': {reason}")
            }
            Self::InvalidChild { parent, child } => {
                write!(f, "a {child} node is not allowed inside a {parent}")
            }
            Self::InvalidTopLevel(kind) => {
                write!(f, "a {kind} node cannot appear at the top level of a module")
            }
            Self::DuplicateNode(name) => write!(f, "duplicate node '{name}'"),
            Self::KeyNotFound { list, key } => {
                write!(f, "key '{key}' of list '{list}' is not a leaf child")
            }
            Self::DefaultCaseNotFound { choice, case } => {
                write!(f, "default case '{case}' of choice '{choice}' does not exist")
            }
            Self::InvalidPath(path) => {
                write!(f, "invalid schema path '{path}': expected /[prefix:]name/...")
            }
            Self::AugmentTargetNotFound(path) => {
                write!(f, "augment target '{path}' does not resolve to exactly one node")
            }
            Self::UnresolvedAugment(path) => {
                write!(f, "augment target '{path}' could never be resolved")
            }
            Self::UnknownGrouping(name) => write!(f, "unknown grouping '{name}'"),
            Self::RecursiveGrouping(name) => {
                write!(f, "grouping '{name}' is used inside its own definition")
            }
            Self::InvalidDescription {
                message,
                line,
                column,
            } => {
                write!(f, "invalid description at {line}:{column}: {message}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidDescription {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let cases = vec![
            (
                SchemaError::InvalidIdentifier("9lives".into()),
                "invalid identifier '9lives'",
            ),
            (
                SchemaError::DuplicateModule("example".into()),
                "duplicate module 'example'",
            ),
            (
                SchemaError::UnknownModule("ietf-interfaces".into()),
                "unknown module 'ietf-interfaces'",
            ),
            (
                SchemaError::UnknownPrefix {
                    module: "example".into(),
                    prefix: "if".into(),
                },
                "unknown prefix 'if' in module 'example'",
            ),
            (
                SchemaError::UnknownFeature("fancy".into()),
                "unknown feature 'fancy'",
            ),
            (
                SchemaError::InvalidChild {
                    parent: NodeKind::Leaf,
                    child: NodeKind::Container,
                },
                "a container node is not allowed inside a leaf",
            ),
            (
                SchemaError::KeyNotFound {
                    list: "interface".into(),
                    key: "name".into(),
                },
                "key 'name' of list 'interface'",
            ),
            (
                SchemaError::InvalidPath("top".into()),
                "invalid schema path 'top'",
            ),
            (
                SchemaError::AugmentTargetNotFound("/x:y".into()),
                "augment target '/x:y'",
            ),
            (
                SchemaError::InvalidDescription {
                    message: "expected value".into(),
                    line: 3,
                    column: 7,
                },
                "invalid description at 3:7",
            ),
        ];

        for (error, expected_prefix) in cases {
            let msg = error.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error display for {error:?} = '{msg}', expected to start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(SchemaError::InvalidIdentifier("x y".into()));
        assert!(err.to_string().contains("invalid identifier"));
    }

    #[test]
    fn serde_json_error_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }").unwrap_err();
        let converted = SchemaError::from(err);
        match converted {
            SchemaError::InvalidDescription { line, .. } => assert_eq!(line, 2),
            other => panic!("expected InvalidDescription, got {other:?}"),
        }
    }
}
