use std::fmt;
use std::io;

/// Errors returned by [`render_tree`](crate::render_tree).
#[derive(Debug)]
#[non_exhaustive]
pub enum TreeError {
    /// The target path matched no node.
    PathNotFound { path: String },

    /// The target path matched more than one node.
    PathAmbiguous { path: String, matches: usize },

    /// The output sink rejected a write.
    Write(io::Error),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotFound { path } => write!(f, "schema path '{path}' not found"),
            Self::PathAmbiguous { path, matches } => {
                write!(f, "schema path '{path}' matches {matches} nodes")
            }
            Self::Write(e) => write!(f, "failed to write tree output: {e}"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TreeError {
    fn from(e: io::Error) -> Self {
        Self::Write(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_path_errors() {
        let err = TreeError::PathNotFound {
            path: "/a/b".into(),
        };
        assert_eq!(err.to_string(), "schema path '/a/b' not found");
        let err = TreeError::PathAmbiguous {
            path: "/a".into(),
            matches: 2,
        };
        assert_eq!(err.to_string(), "schema path '/a' matches 2 nodes");
    }

    #[test]
    fn write_error_has_source() {
        let err = TreeError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("closed"));
        let err = TreeError::PathNotFound { path: "/".into() };
        assert!(err.source().is_none());
    }
}
