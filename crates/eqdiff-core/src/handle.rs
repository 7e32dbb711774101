//! The type-handle contract consumed by the descriptor builder.

use std::fmt;

use crate::TypeKind;
use crate::universe::{INTERFACE_BUILTINS, NamedType, TypeExpr, Universe};

/// Depth limit for following named chains and nested comparability checks.
const MAX_DEPTH: usize = 64;

/// A struct field as seen through a handle.
#[derive(Clone, Debug)]
pub struct FieldHandle<H> {
    pub name: String,
    pub ty: H,
}

/// What the builder needs to know about one type.
///
/// Implementations are trusted: method signatures reported by
/// [`has_equal_method`](TypeHandle::has_equal_method) and
/// [`has_diff_method`](TypeHandle::has_diff_method) are not re-checked.
pub trait TypeHandle: Clone {
    fn kind(&self) -> TypeKind;

    /// Declared name. Predeclared builtins report their own name; anonymous
    /// types report `""`.
    fn name(&self) -> &str;

    /// Import path of the defining package; `""` for predeclared and
    /// anonymous types.
    fn package_path(&self) -> &str;

    fn package_name(&self) -> &str;

    /// Whether Go's `==` is defined for the type.
    fn comparable(&self) -> bool;

    /// `Equal(T) bool` exists on the type.
    fn has_equal_method(&self) -> bool;

    /// `Diff(T) map[string][]interface{}` exists on the type.
    fn has_diff_method(&self) -> bool;

    /// Element, map value or pointee.
    fn elem(&self) -> Option<Self>;

    fn key(&self) -> Option<Self>;

    /// Length of a fixed-size array, zero otherwise.
    fn array_len(&self) -> usize;

    fn fields(&self) -> Vec<FieldHandle<Self>>;

    /// Go spelling, qualified by package name (`models.Backend`, `[]string`).
    fn type_string(&self) -> String;

    /// Whether this is a defined type living in some package.
    fn is_defined(&self) -> bool {
        !self.package_path().is_empty()
    }

    /// `import/path.Name` for defined types.
    fn full_name(&self) -> Option<String> {
        self.is_defined()
            .then(|| format!("{}.{}", self.package_path(), self.name()))
    }
}

#[derive(Clone, Copy)]
enum Node<'u> {
    Defined(&'u NamedType),
    Anonymous(&'u TypeExpr),
}

/// [`TypeHandle`] backed by a [`Universe`].
#[derive(Clone, Copy)]
pub struct UniverseType<'u> {
    universe: &'u Universe,
    node: Node<'u>,
}

impl<'u> UniverseType<'u> {
    pub(crate) fn new(universe: &'u Universe, expr: &'u TypeExpr) -> Self {
        let node = match expr {
            TypeExpr::Named { package, name } => match universe.named_parts(package, name) {
                Some(named) => Node::Defined(named),
                None => Node::Anonymous(expr),
            },
            _ => Node::Anonymous(expr),
        };
        Self { universe, node }
    }

    pub(crate) fn defined(universe: &'u Universe, named: &'u NamedType) -> Self {
        Self {
            universe,
            node: Node::Defined(named),
        }
    }

    pub fn named_type(&self) -> Option<&'u NamedType> {
        match self.node {
            Node::Defined(named) => Some(named),
            Node::Anonymous(_) => None,
        }
    }

    /// The structural expression behind this handle, following named chains.
    fn structure(&self) -> Option<&'u TypeExpr> {
        let mut expr = match self.node {
            Node::Defined(named) => &named.underlying,
            Node::Anonymous(expr) => expr,
        };
        for _ in 0..MAX_DEPTH {
            match expr {
                TypeExpr::Named { package, name } => {
                    expr = &self.universe.named_parts(package, name)?.underlying;
                }
                other => return Some(other),
            }
        }
        None
    }

    fn wrap(&self, expr: &'u TypeExpr) -> Self {
        Self::new(self.universe, expr)
    }

    fn comparable_within(&self, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        match self.kind() {
            TypeKind::Builtin | TypeKind::Pointer | TypeKind::Interface => true,
            TypeKind::Slice | TypeKind::Map | TypeKind::Func => false,
            // channels are comparable, dangling references are not
            TypeKind::Unknown => matches!(self.structure(), Some(TypeExpr::Chan { .. })),
            TypeKind::Array => self
                .elem()
                .is_some_and(|elem| elem.comparable_within(depth + 1)),
            TypeKind::Struct => self
                .fields()
                .iter()
                .all(|f| f.ty.comparable_within(depth + 1)),
        }
    }

    fn method_signature(&self, name: &str) -> Option<(&'u [String], &'u [String])> {
        let method = self.named_type()?.method(name)?;
        Some((method.params.as_slice(), method.results.as_slice()))
    }
}

impl TypeHandle for UniverseType<'_> {
    fn kind(&self) -> TypeKind {
        let Some(expr) = self.structure() else {
            return TypeKind::Unknown;
        };
        match expr {
            TypeExpr::Builtin { name } if INTERFACE_BUILTINS.contains(&name.as_str()) => {
                TypeKind::Interface
            }
            TypeExpr::Builtin { .. } => TypeKind::Builtin,
            TypeExpr::Struct { .. } => TypeKind::Struct,
            TypeExpr::Array { .. } => TypeKind::Array,
            TypeExpr::Slice { .. } => TypeKind::Slice,
            TypeExpr::Map { .. } => TypeKind::Map,
            TypeExpr::Pointer { .. } => TypeKind::Pointer,
            TypeExpr::Interface => TypeKind::Interface,
            TypeExpr::Func => TypeKind::Func,
            TypeExpr::Named { .. } | TypeExpr::Chan { .. } => TypeKind::Unknown,
        }
    }

    fn name(&self) -> &str {
        match self.node {
            Node::Defined(named) => &named.name,
            Node::Anonymous(TypeExpr::Builtin { name }) => name,
            Node::Anonymous(_) => "",
        }
    }

    fn package_path(&self) -> &str {
        match self.node {
            Node::Defined(named) => &named.package,
            Node::Anonymous(_) => "",
        }
    }

    fn package_name(&self) -> &str {
        self.universe
            .package(self.package_path())
            .map_or("", |p| p.name.as_str())
    }

    fn comparable(&self) -> bool {
        self.comparable_within(0)
    }

    fn has_equal_method(&self) -> bool {
        self.method_signature("Equal")
            .is_some_and(|(params, results)| params.len() == 1 && results == ["bool"])
    }

    fn has_diff_method(&self) -> bool {
        self.method_signature("Diff").is_some_and(|(params, results)| {
            params.len() == 1 && results.len() == 1 && is_diff_result(&results[0])
        })
    }

    fn elem(&self) -> Option<Self> {
        match self.structure()? {
            TypeExpr::Array { elem, .. }
            | TypeExpr::Slice { elem }
            | TypeExpr::Pointer { elem }
            | TypeExpr::Chan { elem } => Some(self.wrap(elem)),
            TypeExpr::Map { value, .. } => Some(self.wrap(value)),
            _ => None,
        }
    }

    fn key(&self) -> Option<Self> {
        match self.structure()? {
            TypeExpr::Map { key, .. } => Some(self.wrap(key)),
            _ => None,
        }
    }

    fn array_len(&self) -> usize {
        match self.structure() {
            Some(TypeExpr::Array { len, .. }) => *len,
            _ => 0,
        }
    }

    fn fields(&self) -> Vec<FieldHandle<Self>> {
        match self.structure() {
            Some(TypeExpr::Struct { fields }) => fields
                .iter()
                .map(|f| FieldHandle {
                    name: f.name.clone(),
                    ty: self.wrap(&f.ty),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn type_string(&self) -> String {
        match self.node {
            Node::Defined(named) => format!("{}.{}", self.package_name(), named.name),
            Node::Anonymous(expr) => self.universe.spell(expr),
        }
    }
}

impl fmt::Debug for UniverseType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UniverseType")
            .field(&self.type_string())
            .finish()
    }
}

fn is_diff_result(result: &str) -> bool {
    let normalized: String = result.chars().filter(|c| !c.is_whitespace()).collect();
    matches!(
        normalized.as_str(),
        "map[string][]interface{}" | "map[string][]any"
    )
}
