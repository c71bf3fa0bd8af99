use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a compiled schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Container,
    Choice,
    Case,
    Leaf,
    LeafList,
    List,
    Anydata,
    Anyxml,
    Uses,
    Grouping,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
    Augment,
}

bitflags::bitflags! {
    /// A set of node kinds, used as a filter while walking the tree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KindSet: u32 {
        const CONTAINER = 1 << 0;
        const CHOICE = 1 << 1;
        const CASE = 1 << 2;
        const LEAF = 1 << 3;
        const LEAF_LIST = 1 << 4;
        const LIST = 1 << 5;
        const ANYDATA = 1 << 6;
        const ANYXML = 1 << 7;
        const USES = 1 << 8;
        const GROUPING = 1 << 9;
        const RPC = 1 << 10;
        const ACTION = 1 << 11;
        const INPUT = 1 << 12;
        const OUTPUT = 1 << 13;
        const NOTIFICATION = 1 << 14;
        const AUGMENT = 1 << 15;

        /// Anydata and anyxml always travel together in filters.
        const ANY = Self::ANYDATA.bits() | Self::ANYXML.bits();
        /// Kinds that instantiate data (plus the transparent choice/case).
        const DATA = Self::CONTAINER.bits()
            | Self::CHOICE.bits()
            | Self::CASE.bits()
            | Self::LEAF.bits()
            | Self::LEAF_LIST.bits()
            | Self::LIST.bits()
            | Self::ANY.bits();
        /// Kinds that may carry child nodes.
        const INNER = Self::CONTAINER.bits()
            | Self::CHOICE.bits()
            | Self::CASE.bits()
            | Self::LIST.bits()
            | Self::USES.bits()
            | Self::GROUPING.bits()
            | Self::RPC.bits()
            | Self::ACTION.bits()
            | Self::INPUT.bits()
            | Self::OUTPUT.bits()
            | Self::NOTIFICATION.bits()
            | Self::AUGMENT.bits();
    }
}

impl NodeKind {
    /// Returns the flag for this kind.
    pub const fn as_set(self) -> KindSet {
        match self {
            Self::Container => KindSet::CONTAINER,
            Self::Choice => KindSet::CHOICE,
            Self::Case => KindSet::CASE,
            Self::Leaf => KindSet::LEAF,
            Self::LeafList => KindSet::LEAF_LIST,
            Self::List => KindSet::LIST,
            Self::Anydata => KindSet::ANYDATA,
            Self::Anyxml => KindSet::ANYXML,
            Self::Uses => KindSet::USES,
            Self::Grouping => KindSet::GROUPING,
            Self::Rpc => KindSet::RPC,
            Self::Action => KindSet::ACTION,
            Self::Input => KindSet::INPUT,
            Self::Output => KindSet::OUTPUT,
            Self::Notification => KindSet::NOTIFICATION,
            Self::Augment => KindSet::AUGMENT,
        }
    }

    /// Returns true if `set` admits this kind.
    pub fn is_in(self, set: KindSet) -> bool {
        set.intersects(self.as_set())
    }

    /// The schema-language keyword of this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::List => "list",
            Self::Anydata => "anydata",
            Self::Anyxml => "anyxml",
            Self::Uses => "uses",
            Self::Grouping => "grouping",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
            Self::Augment => "augment",
        }
    }

    /// Kinds that may be declared directly under a node of this kind.
    ///
    /// Module top level is not a node; see [`KindSet`] constants used by the
    /// builder for that case.
    pub fn allowed_children(self) -> KindSet {
        let data_def = KindSet::CONTAINER
            | KindSet::CHOICE
            | KindSet::LEAF
            | KindSet::LEAF_LIST
            | KindSet::LIST
            | KindSet::ANY
            | KindSet::USES;
        match self {
            Self::Container | Self::List | Self::Grouping | Self::Uses | Self::Case => {
                data_def | KindSet::ACTION | KindSet::NOTIFICATION
            }
            Self::Augment => data_def | KindSet::CASE | KindSet::ACTION | KindSet::NOTIFICATION,
            Self::Input | Self::Output | Self::Notification => data_def,
            Self::Choice => KindSet::CASE | (data_def - KindSet::USES),
            Self::Rpc | Self::Action => KindSet::INPUT | KindSet::OUTPUT,
            Self::Leaf | Self::LeafList | Self::Anydata | Self::Anyxml => KindSet::empty(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
