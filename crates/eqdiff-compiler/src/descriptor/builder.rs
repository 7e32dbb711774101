//! Type handle → descriptor tree.

use std::collections::{BTreeSet, HashMap};

use eqdiff_core::{TypeHandle, TypeKind};
use indexmap::IndexSet;

use super::TypeDescriptor;
use crate::naming::spell;

/// Envelope types that never take part in generated comparison.
pub const DEFAULT_SKIP_TYPES: &[&str] = &["v1.TypeMeta", "v1.ObjectMeta", "v1.ListMeta"];

/// Configuration for descriptor building.
#[derive(Clone, Debug)]
pub struct BuilderConfig {
    /// Field types to leave out, as `pkg.Name` or `import/path.Name`.
    pub(crate) skip_types: IndexSet<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            skip_types: DEFAULT_SKIP_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the deny-list.
    pub fn skip_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Add one entry to the deny-list.
    pub fn skip_type(mut self, ty: impl Into<String>) -> Self {
        self.skip_types.insert(ty.into());
        self
    }

    pub fn is_skipped(&self, qualified: &str, full_name: Option<&str>) -> bool {
        self.skip_types.contains(qualified)
            || full_name.is_some_and(|full| self.skip_types.contains(full))
    }
}

/// State of a defined type within the current root.
#[derive(Clone, Debug)]
enum Visit {
    /// Still being described; a revisit now is a cycle.
    InProgress,
    /// Described; `Some` carries the reason it cannot be compared.
    Done(Option<String>),
}

/// Builds one descriptor tree per root.
///
/// The visited map breaks cycles through defined types and lets later
/// occurrences of a type share the outcome of the first one. It is cleared
/// for every root, so each root's tree is complete on its own.
pub struct DescriptorBuilder<'c> {
    config: &'c BuilderConfig,
    visited: HashMap<String, Visit>,
}

impl<'c> DescriptorBuilder<'c> {
    pub fn new(config: &'c BuilderConfig) -> Self {
        Self {
            config,
            visited: HashMap::new(),
        }
    }

    pub fn build_root<H: TypeHandle>(&mut self, root: &H) -> TypeDescriptor {
        self.visited.clear();
        self.build(root, "", root.package_path())
    }

    /// Describe `ty`, occurring as field `name` (or unnamed) in code that
    /// lives in package `referrer`.
    pub fn build<H: TypeHandle>(&mut self, ty: &H, name: &str, referrer: &str) -> TypeDescriptor {
        let mut node = describe(ty, name, referrer);
        tracing::trace!(
            field = name,
            type_text = %node.type_text,
            kind = %node.kind,
            "descriptor"
        );

        let key = visit_key(&node);
        if let Some(key) = &key
            && let Some(visit) = self.visited.get(key)
        {
            node.revisit = true;
            if let Visit::Done(Some(reason)) = visit {
                node.mark_unsupported(reason.clone());
            }
            return node;
        }
        if let Some(key) = &key {
            self.visited.insert(key.clone(), Visit::InProgress);
        }

        // code for a unit's children is written into the unit's own package
        let inner = if node.owns_unit() {
            node.defining_package.clone()
        } else {
            referrer.to_string()
        };
        let expand = !(node.has_preexisting_equal && node.has_preexisting_diff);

        match node.kind {
            TypeKind::Builtin => {}
            TypeKind::Struct if !node.is_defined() => {
                if !node.is_primitive_comparable {
                    node.mark_unsupported("anonymous struct is not comparable");
                }
            }
            TypeKind::Struct => {
                if expand {
                    self.build_fields(ty, &inner, &mut node);
                }
            }
            TypeKind::Array | TypeKind::Slice | TypeKind::Pointer => {
                node.length = ty.array_len();
                if expand {
                    self.build_element(ty, &inner, &mut node);
                }
            }
            TypeKind::Map => {
                let mut key_imports = BTreeSet::new();
                if let Some(key) = ty.key() {
                    node.map_key_type_name = spell(&key, &inner, &mut key_imports);
                }
                if !node.is_defined() {
                    node.required_imports.extend(key_imports);
                }
                if expand {
                    self.build_element(ty, &inner, &mut node);
                }
            }
            TypeKind::Interface => node.mark_unsupported("interface values are not compared"),
            TypeKind::Func => node.mark_unsupported("func values are not compared"),
            TypeKind::Unknown => {
                let reason = format!("`{}` is not supported", node.type_text);
                node.mark_unsupported(reason);
            }
        }

        if node.kind == TypeKind::Pointer
            && !node.is_defined()
            && let Some(sub) = &node.sub_node
        {
            node.qualified_type_name = sub.qualified_type_name.clone();
        }
        if let Some(key) = key {
            let outcome = node
                .unsupported
                .then(|| node.unsupported_reason.clone().unwrap_or_default());
            self.visited.insert(key, Visit::Done(outcome));
        }
        node
    }

    fn build_fields<H: TypeHandle>(&mut self, ty: &H, referrer: &str, node: &mut TypeDescriptor) {
        for field in ty.fields() {
            let qualified = field.ty.type_string();
            if self
                .config
                .is_skipped(&qualified, field.ty.full_name().as_deref())
            {
                tracing::trace!(field = %field.name, %qualified, "skipping deny-listed field");
                continue;
            }
            node.fields.push(self.build(&field.ty, &field.name, referrer));
        }

        if !node.fields.is_empty() && node.fields.iter().all(|f| f.unsupported) {
            node.mark_unsupported("no field can be compared");
        }
    }

    fn build_element<H: TypeHandle>(&mut self, ty: &H, referrer: &str, node: &mut TypeDescriptor) {
        let Some(elem) = ty.elem() else {
            node.mark_unsupported("element type is unknown");
            return;
        };
        let sub = self.build(&elem, "", referrer);
        if sub.unsupported {
            let reason = match &sub.unsupported_reason {
                Some(reason) => format!("element: {reason}"),
                None => String::from("element cannot be compared"),
            };
            node.mark_unsupported(reason);
        }
        node.sub_node = Some(Box::new(sub));
    }
}

/// The handle-derived part of a descriptor, without children.
fn describe<H: TypeHandle>(ty: &H, name: &str, referrer: &str) -> TypeDescriptor {
    let mut required_imports = BTreeSet::new();
    let type_text = spell(ty, referrer, &mut required_imports);
    let defining_package = ty.package_path().to_string();
    let qualified_type_name = if ty.name().is_empty() {
        String::new()
    } else {
        ty.type_string()
    };

    TypeDescriptor {
        name: name.to_string(),
        declared_type_name: ty.name().to_string(),
        qualified_type_name,
        full_name: ty.full_name(),
        kind: ty.kind(),
        same_module_as_referrer: defining_package.is_empty() || defining_package == referrer,
        defining_package,
        package_name: ty.package_name().to_string(),
        referrer_package: referrer.to_string(),
        type_text,
        has_preexisting_equal: ty.has_equal_method(),
        has_preexisting_diff: ty.has_diff_method(),
        is_primitive_comparable: ty.comparable(),
        required_imports,
        ..TypeDescriptor::default()
    }
}

/// Key under which a node joins the visited set, if it does at all.
///
/// Named pointers get their helper in the referring package, so they are
/// tracked per referrer.
fn visit_key(node: &TypeDescriptor) -> Option<String> {
    let full = node.full_name.as_ref()?;
    if node.owns_unit() {
        Some(full.clone())
    } else if node.is_named_pointer() {
        Some(format!("{full}@{}", node.referrer_package))
    } else {
        None
    }
}
