//! Canonical type kind definitions.
//!
//! Every type handle is classified into exactly one of these kinds, and the
//! descriptor builder and both synthesizers dispatch on it exhaustively.

use std::fmt;

use serde::Serialize;

/// Structural category of a type.
///
/// `Interface` and `Func` are terminal: they are never compared structurally.
/// `Unknown` covers everything the universe cannot classify (channels,
/// dangling references).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub enum TypeKind {
    #[default]
    Unknown,
    /// Predeclared scalar (`int`, `string`, ...) or a defined type over one.
    Builtin,
    Struct,
    /// Fixed-size `[N]T`.
    Array,
    Slice,
    Map,
    Interface,
    Pointer,
    Func,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Builtin => "builtin",
            Self::Struct => "struct",
            Self::Array => "array",
            Self::Slice => "slice",
            Self::Map => "map",
            Self::Interface => "interface",
            Self::Pointer => "pointer",
            Self::Func => "func",
        }
    }

    /// Whether values of this kind are addressed by index or key.
    ///
    /// Diff keys produced for these kinds start with `[`.
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::Array | Self::Slice | Self::Map)
    }

    /// Whether this kind wraps a single element (element, value or pointee).
    pub fn has_element(self) -> bool {
        matches!(self, Self::Array | Self::Slice | Self::Map | Self::Pointer)
    }

    /// Whether this kind can never be synthesized.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Unknown | Self::Interface | Self::Func)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
