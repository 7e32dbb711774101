//! User-supplied replacements for synthesized functions.

use eqdiff_core::Universe;
use eqdiff_core::utils::{default_package_name, is_identifier, split_full_name};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::Import;
use crate::naming::Family;
use crate::{Error, Result};

/// Reference to a hand-written function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncRef {
    /// Import path of the defining package.
    pub pkg: String,
    pub name: String,
    /// Package name bound from the universe; defaults to the path's last
    /// segment.
    #[serde(skip)]
    package_name: Option<String>,
}

impl FuncRef {
    pub fn new(pkg: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pkg: pkg.into(),
            name: name.into(),
            package_name: None,
        }
    }

    pub fn package_name(&self) -> String {
        self.package_name
            .clone()
            .unwrap_or_else(|| default_package_name(&self.pkg))
    }

    pub fn import(&self) -> Import {
        Import::new(&self.pkg, self.package_name())
    }

    /// Callee as spelled from code in package `unit_package`.
    pub fn callee(&self, unit_package: &str) -> String {
        if self.pkg == unit_package {
            self.name.clone()
        } else {
            format!("{}.{}", self.package_name(), self.name)
        }
    }
}

/// Overrides for one type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFuncs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal: Option<FuncRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<FuncRef>,
    /// Accepted for compatibility with existing override files; unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<FuncRef>,
}

impl OverrideFuncs {
    pub fn get(&self, family: Family) -> Option<&FuncRef> {
        match family {
            Family::Equal => self.equal.as_ref(),
            Family::Diff => self.diff.as_ref(),
        }
    }
}

/// `import/path.TypeName` → overrides, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: IndexMap<String, OverrideFuncs>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, funcs: OverrideFuncs) {
        self.entries.insert(type_name.into(), funcs);
    }

    pub fn with(mut self, type_name: impl Into<String>, funcs: OverrideFuncs) -> Self {
        self.insert(type_name, funcs);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&OverrideFuncs> {
        self.entries.get(type_name)
    }

    pub fn lookup(&self, type_name: &str, family: Family) -> Option<&FuncRef> {
        self.get(type_name)?.get(family)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideFuncs)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check every entry against `universe` and bind package names of known
    /// packages. Runs before any synthesis.
    pub fn validate(&mut self, universe: &Universe) -> Result<()> {
        for (key, funcs) in &mut self.entries {
            let Some((_, type_name)) = split_full_name(key) else {
                return Err(invalid(key, "expected `import/path.TypeName`"));
            };
            if !is_identifier(type_name) {
                return Err(invalid(key, format!("`{type_name}` is not a valid type name")));
            }
            if universe.named(key).is_none() {
                tracing::warn!(type_name = %key, "override for a type outside the universe");
            }

            for func in [funcs.equal.as_mut(), funcs.diff.as_mut()].into_iter().flatten() {
                bind_func(key, func, universe)?;
            }
        }
        Ok(())
    }
}

fn bind_func(key: &str, func: &mut FuncRef, universe: &Universe) -> Result<()> {
    if func.pkg.is_empty() {
        return Err(invalid(key, format!("function `{}` has no package", func.name)));
    }
    if !is_identifier(&func.name) {
        return Err(invalid(key, format!("`{}` is not a valid function name", func.name)));
    }
    let Some(package) = universe.package(&func.pkg) else {
        return Ok(());
    };
    if package.has_function(&func.name) == Some(false) {
        return Err(invalid(
            key,
            format!("function `{}` does not exist in `{}`", func.name, func.pkg),
        ));
    }
    func.package_name = Some(package.name.clone());
    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::InvalidOverride {
        key: key.to_string(),
        reason: reason.into(),
    }
}
