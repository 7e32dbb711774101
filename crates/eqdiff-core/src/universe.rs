//! The type universe: every package and defined type a generation run may
//! touch, as delivered by the type-resolution collaborator.
//!
//! Two layers:
//! - **Deserialization layer**: 1:1 mapping to the universe JSON document
//! - **Analysis layer**: validated, `path.Name`-indexed lookups

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::handle::UniverseType;
use crate::utils::{default_package_name, is_identifier, split_full_name};

/// Predeclared Go types that are compared with `==`.
pub const BUILTIN_TYPES: &[&str] = &[
    "bool", "string", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "byte", "rune", "float32", "float64", "complex64",
    "complex128",
];

/// Predeclared Go types that are interfaces.
pub const INTERFACE_BUILTINS: &[&str] = &["error", "any"];

/// Errors raised while loading or querying a universe.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    #[error("invalid type universe: {0}")]
    Json(#[from] serde_json::Error),

    #[error("package `{0}` is declared more than once")]
    DuplicatePackage(String),

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("package `{package}` declares invalid type name `{name}`")]
    InvalidTypeName { package: String, name: String },

    #[error("`{referrer}` refers to unknown type `{target}`")]
    UnresolvedType { referrer: String, target: String },

    #[error("`{referrer}` uses unknown builtin `{name}`")]
    UnknownBuiltin { referrer: String, name: String },

    #[error("type `{0}` is defined in terms of itself")]
    UnderlyingCycle(String),

    #[error("invalid type `{0}`: expected `import/path.TypeName`")]
    InvalidTypeSpec(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("unknown package `{0}`")]
    UnknownPackage(String),
}

// ============================================================================
// Deserialization Layer
// ============================================================================

/// A type expression as written in definitions, fields and element positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Builtin {
        name: String,
    },
    /// Reference to a defined type, resolved against the universe.
    Named {
        package: String,
        name: String,
    },
    Struct {
        #[serde(default)]
        fields: Vec<FieldDef>,
    },
    Array {
        len: usize,
        elem: Box<TypeExpr>,
    },
    Slice {
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Pointer {
        elem: Box<TypeExpr>,
    },
    Interface,
    Func,
    Chan {
        elem: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin { name: name.into() }
    }

    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn structure(fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self::Struct {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn array(len: usize, elem: TypeExpr) -> Self {
        Self::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeExpr) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn pointer(elem: TypeExpr) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn chan(elem: TypeExpr) -> Self {
        Self::Chan {
            elem: Box::new(elem),
        }
    }
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Method signature, with parameter and result types spelled as Go source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
}

impl Method {
    pub fn new<P, R>(name: impl Into<String>, params: P, results: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            results: results.into_iter().map(Into::into).collect(),
        }
    }
}

/// A defined type: `type Name <underlying>` plus its method set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a hand-written `Equal(T) bool`.
    pub fn with_equal(self) -> Self {
        let param = self.name.clone();
        self.with_method(Method::new("Equal", [param], ["bool"]))
    }

    /// Declare a hand-written `Diff(T) map[string][]interface{}`.
    pub fn with_diff(self) -> Self {
        let param = self.name.clone();
        self.with_method(Method::new("Diff", [param], ["map[string][]interface{}"]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPackage {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exported free functions; `None` when the collaborator did not list them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<String>>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUniverse {
    #[serde(default)]
    pub packages: Vec<RawPackage>,
}

/// Parse universe JSON without validating references.
pub fn parse_universe(json: &str) -> Result<RawUniverse, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Analysis Layer
// ============================================================================

#[derive(Debug, Clone)]
pub struct Package {
    pub path: String,
    pub name: String,
    pub functions: Option<IndexSet<String>>,
}

impl Package {
    /// `None` when the function list is unknown.
    pub fn has_function(&self, name: &str) -> Option<bool> {
        self.functions.as_ref().map(|f| f.contains(name))
    }
}

#[derive(Debug, Clone)]
pub struct NamedType {
    pub package: String,
    pub name: String,
    pub underlying: TypeExpr,
    pub methods: Vec<Method>,
}

impl NamedType {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Validated universe, indexed by `import/path.Name`.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    packages: IndexMap<String, Package>,
    types: IndexMap<String, NamedType>,
}

impl Universe {
    pub fn from_json(json: &str) -> Result<Self, UniverseError> {
        Self::from_raw(parse_universe(json)?)
    }

    pub fn from_raw(raw: RawUniverse) -> Result<Self, UniverseError> {
        let mut universe = Universe::default();

        for package in raw.packages {
            if universe.packages.contains_key(&package.path) {
                return Err(UniverseError::DuplicatePackage(package.path));
            }
            let name = package
                .name
                .unwrap_or_else(|| default_package_name(&package.path));
            for def in package.types {
                if !is_identifier(&def.name) {
                    return Err(UniverseError::InvalidTypeName {
                        package: package.path,
                        name: def.name,
                    });
                }
                let named = NamedType {
                    package: package.path.clone(),
                    name: def.name,
                    underlying: def.ty,
                    methods: def.methods,
                };
                let full = named.full_name();
                if universe.types.contains_key(&full) {
                    return Err(UniverseError::DuplicateType(full));
                }
                universe.types.insert(full, named);
            }
            universe.packages.insert(
                package.path.clone(),
                Package {
                    path: package.path,
                    name,
                    functions: package.functions.map(|f| f.into_iter().collect()),
                },
            );
        }

        universe.validate()?;
        Ok(universe)
    }

    fn validate(&self) -> Result<(), UniverseError> {
        for (full, named) in &self.types {
            self.validate_expr(full, &named.underlying)?;
            self.check_underlying_chain(full, named)?;
        }
        Ok(())
    }

    fn validate_expr(&self, referrer: &str, expr: &TypeExpr) -> Result<(), UniverseError> {
        match expr {
            TypeExpr::Builtin { name } => {
                let name = name.as_str();
                if BUILTIN_TYPES.contains(&name) || INTERFACE_BUILTINS.contains(&name) {
                    Ok(())
                } else {
                    Err(UniverseError::UnknownBuiltin {
                        referrer: referrer.to_string(),
                        name: name.to_string(),
                    })
                }
            }
            TypeExpr::Named { package, name } => match self.named_parts(package, name) {
                Some(_) => Ok(()),
                None => Err(UniverseError::UnresolvedType {
                    referrer: referrer.to_string(),
                    target: format!("{package}.{name}"),
                }),
            },
            TypeExpr::Struct { fields } => fields
                .iter()
                .try_for_each(|f| self.validate_expr(referrer, &f.ty)),
            TypeExpr::Array { elem, .. }
            | TypeExpr::Slice { elem }
            | TypeExpr::Pointer { elem }
            | TypeExpr::Chan { elem } => self.validate_expr(referrer, elem),
            TypeExpr::Map { key, value } => {
                self.validate_expr(referrer, key)?;
                self.validate_expr(referrer, value)
            }
            TypeExpr::Interface | TypeExpr::Func => Ok(()),
        }
    }

    /// `type A B; type B A` has no underlying type.
    fn check_underlying_chain(&self, full: &str, named: &NamedType) -> Result<(), UniverseError> {
        let mut seen = IndexSet::new();
        seen.insert(full.to_string());
        let mut expr = &named.underlying;
        while let TypeExpr::Named { package, name } = expr {
            let next = format!("{package}.{name}");
            if !seen.insert(next) {
                return Err(UniverseError::UnderlyingCycle(full.to_string()));
            }
            match self.named_parts(package, name) {
                Some(n) => expr = &n.underlying,
                None => break,
            }
        }
        Ok(())
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.get(path)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn named(&self, full_name: &str) -> Option<&NamedType> {
        self.types.get(full_name)
    }

    pub(crate) fn named_parts(&self, package: &str, name: &str) -> Option<&NamedType> {
        self.types.get(&format!("{package}.{name}"))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Handle for a defined type by `import/path.Name`.
    pub fn lookup(&self, full_name: &str) -> Option<UniverseType<'_>> {
        self.named(full_name)
            .map(|named| UniverseType::defined(self, named))
    }

    /// Like [`Universe::lookup`], but reports why a root cannot be resolved.
    pub fn resolve(&self, spec: &str) -> Result<UniverseType<'_>, UniverseError> {
        if split_full_name(spec).is_none() {
            return Err(UniverseError::InvalidTypeSpec(spec.to_string()));
        }
        self.lookup(spec)
            .ok_or_else(|| UniverseError::UnknownType(spec.to_string()))
    }

    /// Every defined type of a package, in declaration order.
    pub fn package_types(&self, path: &str) -> Result<Vec<UniverseType<'_>>, UniverseError> {
        if !self.packages.contains_key(path) {
            return Err(UniverseError::UnknownPackage(path.to_string()));
        }
        Ok(self
            .types
            .values()
            .filter(|t| t.package == path)
            .map(|t| UniverseType::defined(self, t))
            .collect())
    }

    /// Handle for an arbitrary expression evaluated in this universe.
    pub fn type_of<'u>(&'u self, expr: &'u TypeExpr) -> UniverseType<'u> {
        UniverseType::new(self, expr)
    }

    /// Go spelling of `expr`, qualified by package name.
    pub fn spell(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::Builtin { name } => name.clone(),
            TypeExpr::Named { package, name } => match self.package(package) {
                Some(p) => format!("{}.{}", p.name, name),
                None => name.clone(),
            },
            TypeExpr::Struct { fields } if fields.is_empty() => "struct {}".to_string(),
            TypeExpr::Struct { fields } => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{} {}", f.name, self.spell(&f.ty)))
                    .collect();
                format!("struct {{ {} }}", fields.join("; "))
            }
            TypeExpr::Array { len, elem } => format!("[{len}]{}", self.spell(elem)),
            TypeExpr::Slice { elem } => format!("[]{}", self.spell(elem)),
            TypeExpr::Map { key, value } => {
                format!("map[{}]{}", self.spell(key), self.spell(value))
            }
            TypeExpr::Pointer { elem } => format!("*{}", self.spell(elem)),
            TypeExpr::Interface => "interface {}".to_string(),
            TypeExpr::Func => "func()".to_string(),
            TypeExpr::Chan { elem } => format!("chan {}", self.spell(elem)),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Programmatic alternative to universe JSON.
#[derive(Debug, Clone, Default)]
pub struct UniverseBuilder {
    raw: RawUniverse,
}

impl UniverseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(mut self, package: PackageBuilder) -> Self {
        self.raw.packages.push(package.raw);
        self
    }

    pub fn into_raw(self) -> RawUniverse {
        self.raw
    }

    pub fn build(self) -> Result<Universe, UniverseError> {
        Universe::from_raw(self.raw)
    }
}

#[derive(Debug, Clone)]
pub struct PackageBuilder {
    raw: RawPackage,
}

impl PackageBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            raw: RawPackage {
                path: path.into(),
                ..RawPackage::default()
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.raw.name = Some(name.into());
        self
    }

    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.raw
            .functions
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    pub fn type_def(mut self, def: TypeDef) -> Self {
        self.raw.types.push(def);
        self
    }

    /// Shorthand for a struct definition without methods.
    pub fn structure<'a>(
        self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (&'a str, TypeExpr)>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|(field, ty)| FieldDef::new(field, ty));
        self.type_def(TypeDef::new(name, TypeExpr::structure(fields)))
    }

    /// Shorthand for `type Name <ty>` without methods.
    pub fn defined(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.type_def(TypeDef::new(name, ty))
    }
}
