use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::ModuleId;

/// Built-in types of the schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseType {
    Binary,
    Bits,
    Boolean,
    Decimal64,
    Empty,
    Enumeration,
    Identityref,
    InstanceIdentifier,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Leafref,
    String,
    Union,
}

impl BaseType {
    const ALL: [BaseType; 19] = [
        Self::Binary,
        Self::Bits,
        Self::Boolean,
        Self::Decimal64,
        Self::Empty,
        Self::Enumeration,
        Self::Identityref,
        Self::InstanceIdentifier,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Leafref,
        Self::String,
        Self::Union,
    ];

    /// The keyword used for this type in schema text.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::Identityref => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Leafref => "leafref",
            Self::String => "string",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for BaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.keyword() == s)
            .ok_or_else(|| format!("unknown built-in type '{s}'"))
    }
}

/// Reference to the typedef a leaf type was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedefRef {
    pub name: String,
    /// Module defining the typedef.
    pub module: ModuleId,
}

/// The resolved type of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafType {
    pub base: BaseType,
    pub typedef: Option<TypedefRef>,
    /// Target path of a leafref, kept in module-name form (`/mod:a/mod:b`).
    pub leafref_path: Option<String>,
}

impl LeafType {
    /// A plain built-in type.
    pub fn builtin(base: BaseType) -> Self {
        Self {
            base,
            typedef: None,
            leafref_path: None,
        }
    }

    /// The name the type is known by: the typedef name when derived,
    /// otherwise the built-in keyword.
    pub fn name(&self) -> &str {
        match &self.typedef {
            Some(t) => &t.name,
            None => self.base.keyword(),
        }
    }

    /// True for a leafref declared in place (not through a typedef).
    pub fn is_inline_leafref(&self) -> bool {
        self.base == BaseType::Leafref && self.typedef.is_none()
    }
}
