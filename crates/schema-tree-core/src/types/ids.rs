use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or(u32::MAX))
            }

            /// Position of the entry inside its arena.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Stable handle of a schema node inside a `SchemaContext`.
    NodeId,
    "node"
);

arena_id!(
    /// Stable handle of a module or submodule inside a `SchemaContext`.
    ModuleId,
    "module"
);

arena_id!(
    /// Stable handle of a feature definition inside a `SchemaContext`.
    FeatureId,
    "feature"
);
