//! Type model for eqdiff.
//!
//! The generator never inspects Go source itself. A collaborator describes
//! every reachable package and type in a [`Universe`], and the builder walks
//! it through the [`TypeHandle`] trait.

mod handle;
mod kind;
mod universe;
pub mod utils;

#[cfg(test)]
mod kind_tests;
#[cfg(test)]
mod universe_tests;
#[cfg(test)]
mod utils_tests;

pub use handle::{FieldHandle, TypeHandle, UniverseType};
pub use kind::TypeKind;
pub use universe::{
    BUILTIN_TYPES, FieldDef, INTERFACE_BUILTINS, Method, NamedType, Package, PackageBuilder,
    RawPackage, RawUniverse, TypeDef, TypeExpr, Universe, UniverseBuilder, UniverseError,
    parse_universe,
};
