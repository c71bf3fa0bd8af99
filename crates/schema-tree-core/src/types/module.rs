use super::ids::{FeatureId, ModuleId, NodeId};

/// Whether a module stands alone or is part of another module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Module,
    Submodule { belongs_to: ModuleId },
}

/// An imported module and the prefix it is known by locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    pub module: ModuleId,
    pub prefix: String,
}

/// A feature definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feature {
    pub name: String,
    pub module: ModuleId,
    pub enabled: bool,
}

/// A compiled module or submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub prefix: String,
    pub namespace: Option<String>,
    pub revision: Option<String>,
    pub kind: ModuleKind,
    pub imports: Vec<Import>,
    /// Top-level nodes in declaration order, including rpcs, notifications
    /// and groupings. Always empty for submodules: their top-level nodes are
    /// stored in the main module's list.
    pub data: Vec<NodeId>,
    pub augments: Vec<NodeId>,
    pub features: Vec<FeatureId>,
}

impl Module {
    pub fn is_submodule(&self) -> bool {
        matches!(self.kind, ModuleKind::Submodule { .. })
    }

    /// The module this submodule belongs to, if it is one.
    pub fn belongs_to(&self) -> Option<ModuleId> {
        match self.kind {
            ModuleKind::Module => None,
            ModuleKind::Submodule { belongs_to } => Some(belongs_to),
        }
    }

    /// Looks up an import by its local prefix.
    pub fn import_by_prefix(&self, prefix: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.prefix == prefix)
    }
}
