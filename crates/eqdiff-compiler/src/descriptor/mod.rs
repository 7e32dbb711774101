//! Type descriptors: the family-independent description of one type or
//! field occurrence.

mod builder;


use std::collections::BTreeSet;

use eqdiff_core::TypeKind;
use eqdiff_core::utils::path_base;
use serde::Serialize;

pub use builder::{BuilderConfig, DEFAULT_SKIP_TYPES, DescriptorBuilder};

/// One Go import: path plus the name the generated code refers to it by.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Import {
    pub path: String,
    pub name: String,
}

impl Import {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn fmt() -> Self {
        Self::new("fmt", "fmt")
    }

    /// Import spec line: `"path"` or `name "path"` when an alias is needed.
    pub fn spec(&self) -> String {
        if self.name == path_base(&self.path) {
            format!("\"{}\"", self.path)
        } else {
            format!("{} \"{}\"", self.name, self.path)
        }
    }
}

/// Passive descriptor node. Built once per root, read by both synthesizers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TypeDescriptor {
    /// Field name; empty for roots and container elements.
    pub name: String,
    /// `Backend`, `int`; empty for anonymous types.
    pub declared_type_name: String,
    /// `models.Backend`, `int`; empty for anonymous types except pointers,
    /// which inherit their pointee's.
    pub qualified_type_name: String,
    /// `import/path.Name` for defined types; override lookups use it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub kind: TypeKind,
    pub defining_package: String,
    pub package_name: String,
    /// Package of the unit this node's code is written into.
    pub referrer_package: String,
    pub same_module_as_referrer: bool,
    /// Go spelling in `referrer_package`.
    pub type_text: String,
    pub has_preexisting_equal: bool,
    pub has_preexisting_diff: bool,
    pub is_primitive_comparable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TypeDescriptor>,
    #[serde(skip_serializing_if = "is_zero")]
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_node: Option<Box<TypeDescriptor>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub map_key_type_name: String,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub required_imports: BTreeSet<Import>,
    pub unsupported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported_reason: Option<String>,
    /// Second occurrence of a visited type within the same root; no children.
    pub revisit: bool,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl TypeDescriptor {
    pub fn is_field(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn is_defined(&self) -> bool {
        self.full_name.is_some()
    }

    /// Defined struct, container or predeclared-based type: gets its own
    /// destination unit and methods.
    pub fn owns_unit(&self) -> bool {
        self.is_defined()
            && matches!(
                self.kind,
                TypeKind::Builtin
                    | TypeKind::Struct
                    | TypeKind::Array
                    | TypeKind::Slice
                    | TypeKind::Map
            )
    }

    /// Defined pointer type. Go forbids methods on these, so they get a
    /// helper in the enclosing unit instead.
    pub fn is_named_pointer(&self) -> bool {
        self.is_defined() && self.kind == TypeKind::Pointer
    }

    pub fn has_preexisting(&self, family: crate::Family) -> bool {
        match family {
            crate::Family::Equal => self.has_preexisting_equal,
            crate::Family::Diff => self.has_preexisting_diff,
        }
    }

    pub(crate) fn mark_unsupported(&mut self, reason: impl Into<String>) {
        self.unsupported = true;
        self.unsupported_reason = Some(reason.into());
    }

    /// Depth-first walk over this node and all of its descendants.
    pub fn walk(&self, visit: &mut impl FnMut(&TypeDescriptor)) {
        visit(self);
        for field in &self.fields {
            field.walk(visit);
        }
        if let Some(sub) = &self.sub_node {
            sub.walk(visit);
        }
    }
}
