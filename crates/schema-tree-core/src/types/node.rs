use super::flags::NodeFlags;
use super::if_feature::IfFeatureExpr;
use super::ids::{ModuleId, NodeId};
use super::leaf_type::LeafType;
use super::node_kind::NodeKind;

/// Kind-specific attributes of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Container {
        /// Presence statement; a container with one is rendered with `!`.
        presence: Option<String>,
    },
    Choice {
        default_case: Option<NodeId>,
    },
    Case,
    Leaf {
        ty: LeafType,
        default: Option<String>,
    },
    LeafList {
        ty: LeafType,
        defaults: Vec<String>,
    },
    List {
        /// Key leaves, in key order; each is a descendant leaf of the list.
        keys: Vec<NodeId>,
        min_elements: u32,
        max_elements: Option<u32>,
    },
    Anydata,
    Anyxml,
    Uses {
        grouping: String,
    },
    Grouping,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
    Augment {
        target: NodeId,
        /// Target path in module-name form.
        target_path: String,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Container { .. } => NodeKind::Container,
            Self::Choice { .. } => NodeKind::Choice,
            Self::Case => NodeKind::Case,
            Self::Leaf { .. } => NodeKind::Leaf,
            Self::LeafList { .. } => NodeKind::LeafList,
            Self::List { .. } => NodeKind::List,
            Self::Anydata => NodeKind::Anydata,
            Self::Anyxml => NodeKind::Anyxml,
            Self::Uses { .. } => NodeKind::Uses,
            Self::Grouping => NodeKind::Grouping,
            Self::Rpc => NodeKind::Rpc,
            Self::Action => NodeKind::Action,
            Self::Input => NodeKind::Input,
            Self::Output => NodeKind::Output,
            Self::Notification => NodeKind::Notification,
            Self::Augment { .. } => NodeKind::Augment,
        }
    }
}

/// One compiled node of the schema tree.
///
/// Two parent-like links are kept apart:
/// - `parent` is where the node sits in the schema tree. For a node injected
///   by an augment this is the augment target.
/// - `owner` is the statement that declared the node. For an injected node
///   this is the augment itself; otherwise it equals `parent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    pub name: String,
    /// Module (or submodule) the node was declared in.
    pub module: ModuleId,
    pub flags: NodeFlags,
    pub if_features: Vec<IfFeatureExpr>,
    pub when: Option<String>,
    pub parent: Option<NodeId>,
    pub owner: Option<NodeId>,
    /// Children in declaration order; augment-injected nodes are appended.
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

impl SchemaNode {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// True when the node was declared by an augment rather than by its
    /// tree parent.
    pub fn is_injected(&self) -> bool {
        self.owner != self.parent
    }

    /// The leaf type of a leaf or leaf-list.
    pub fn leaf_type(&self) -> Option<&LeafType> {
        match &self.data {
            NodeData::Leaf { ty, .. } | NodeData::LeafList { ty, .. } => Some(ty),
            _ => None,
        }
    }

    /// Key leaves of a list; empty for every other kind.
    pub fn keys(&self) -> &[NodeId] {
        match &self.data {
            NodeData::List { keys, .. } => keys,
            _ => &[],
        }
    }
}
