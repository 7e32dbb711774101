//! Generated-function naming and Go type spelling.
//!
//! Helper names are derived from the type's Go spelling alone, so the same
//! structural shape always maps to the same helper and can be shared across
//! unrelated roots.

use std::collections::BTreeSet;

use eqdiff_core::utils::capitalize;
use eqdiff_core::{TypeHandle, TypeKind};
use serde::Serialize;

use crate::descriptor::Import;

/// Function family being synthesized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum Family {
    Equal,
    Diff,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Equal, Family::Diff];

    /// Method name, also the prefix of every helper name.
    pub fn method_name(self) -> &'static str {
        match self {
            Family::Equal => "Equal",
            Family::Diff => "Diff",
        }
    }

    pub fn result_type(self) -> &'static str {
        match self {
            Family::Equal => "bool",
            Family::Diff => "map[string][]interface{}",
        }
    }

    /// Middle part of the generated file name.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Family::Equal => "equal",
            Family::Diff => "diff",
        }
    }
}

/// Identifier-safe rendering of a Go type spelling.
///
/// `[]` becomes `Slice`, `[N]` becomes `ArrayN`, each leading `*` becomes
/// `Pointer`, and every other token is capitalized.
pub fn fqn(type_text: &str) -> String {
    let text = type_text.replace("[]", "[Slice]");
    text.split(|c: char| !(c.is_alphanumeric() || c == '*'))
        .filter(|token| !token.is_empty())
        .map(word)
        .collect()
}

fn word(token: &str) -> String {
    if token.chars().all(|c| c.is_ascii_digit()) {
        let len = token
            .parse::<u64>()
            .map_or_else(|_| token.to_string(), |n| n.to_string());
        return format!("Array{len}");
    }
    let rest = token.trim_start_matches('*');
    let stars = token.len() - rest.len();
    format!("{}{}", "Pointer".repeat(stars), capitalize(rest))
}

/// Name of the helper generated for `type_text` in `family`.
///
/// ```
/// use eqdiff_compiler::naming::function_name;
/// use eqdiff_compiler::Family;
/// assert_eq!(function_name(Family::Equal, "[]string"), "EqualSliceString");
/// assert_eq!(function_name(Family::Diff, "map[string]*int"), "DiffMapStringPointerInt");
/// ```
pub fn function_name(family: Family, type_text: &str) -> String {
    format!("{}{}", family.method_name(), fqn(type_text))
}

/// Go spelling of `ty` as seen from package `referrer`.
///
/// Types from other packages are qualified by package name and their import
/// is recorded in `imports`.
pub fn spell<H: TypeHandle>(ty: &H, referrer: &str, imports: &mut BTreeSet<Import>) -> String {
    if ty.is_defined() {
        if ty.package_path() == referrer {
            return ty.name().to_string();
        }
        imports.insert(Import::new(ty.package_path(), ty.package_name()));
        return format!("{}.{}", ty.package_name(), ty.name());
    }

    let elem = |imports: &mut BTreeSet<Import>| match ty.elem() {
        Some(elem) => spell(&elem, referrer, imports),
        None => String::from("invalid"),
    };
    match ty.kind() {
        TypeKind::Builtin => ty.name().to_string(),
        TypeKind::Array => format!("[{}]{}", ty.array_len(), elem(imports)),
        TypeKind::Slice => format!("[]{}", elem(imports)),
        TypeKind::Pointer => format!("*{}", elem(imports)),
        TypeKind::Map => {
            let key = match ty.key() {
                Some(key) => spell(&key, referrer, imports),
                None => String::from("invalid"),
            };
            format!("map[{key}]{}", elem(imports))
        }
        TypeKind::Struct => {
            let fields: Vec<String> = ty
                .fields()
                .iter()
                .map(|f| format!("{} {}", f.name, spell(&f.ty, referrer, imports)))
                .collect();
            if fields.is_empty() {
                String::from("struct{}")
            } else {
                format!("struct {{ {} }}", fields.join("; "))
            }
        }
        TypeKind::Interface if !ty.name().is_empty() => ty.name().to_string(),
        TypeKind::Interface => String::from("interface{}"),
        TypeKind::Func => String::from("func()"),
        TypeKind::Unknown => ty.type_string(),
    }
}
