mod flags;
mod identifier;
mod if_feature;
mod ids;
mod leaf_type;
mod module;
mod node;
mod node_kind;

pub use flags::{Config, NodeFlags, Status};
pub use identifier::{is_identifier, Identifier};
pub use if_feature::{parse_if_feature, FeatureName, IfFeature, IfFeatureExpr};
pub use ids::{FeatureId, ModuleId, NodeId};
pub use leaf_type::{BaseType, LeafType, TypedefRef};
pub use module::{Feature, Import, Module, ModuleKind};
pub use node::{NodeData, SchemaNode};
pub use node_kind::{KindSet, NodeKind};
