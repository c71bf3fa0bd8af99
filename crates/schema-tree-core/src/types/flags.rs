use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a data node holds configuration or state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Config {
    ReadWrite,
    ReadOnly,
}

/// Life-cycle status of a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Obsolete,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Deprecated => write!(f, "deprecated"),
            Self::Obsolete => write!(f, "obsolete"),
        }
    }
}

/// Compiled flags shared by every node kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Effective config; `None` where config does not apply (groupings,
    /// operations, notifications).
    pub config: Option<Config>,
    pub status: Status,
    pub mandatory: bool,
    /// Set on shorthand case wrappers and on input/output nodes that were
    /// never authored.
    pub implicit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        let flags = NodeFlags::default();
        assert_eq!(flags.config, None);
        assert_eq!(flags.status, Status::Current);
        assert!(!flags.mandatory);
        assert!(!flags.implicit);
    }

    #[test]
    fn status_serde_names() {
        let s: Status = serde_json::from_str("\"deprecated\"").unwrap();
        assert_eq!(s, Status::Deprecated);
        assert_eq!(Status::Obsolete.to_string(), "obsolete");
    }

    #[test]
    fn config_serde_names() {
        let c: Config = serde_json::from_str("\"read-only\"").unwrap();
        assert_eq!(c, Config::ReadOnly);
    }
}
