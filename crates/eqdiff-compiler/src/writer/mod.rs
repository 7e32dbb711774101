//! Destination units: flattening, deduplication and file assembly.
//!
//! A generation context tree is flattened into one [`UnitFile`] per
//! destination unit. [`EmissionState`] spans a whole run: a unit file is
//! written at most once, and a helper name at most once per output
//! directory, whichever root reaches it first.

mod format;

#[cfg(test)]
mod format_tests;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::descriptor::Import;
use crate::naming::Family;
use crate::synth::{DIFF_KEY_JOIN, GenContext, GeneratedFunction, diff_key_join};

pub use format::{FormatError, Formatter, Gofmt, Goimports, Passthrough};

/// First line after the user header in every generated file.
pub const GENERATED_MARKER: &str = "// Code generated by eqdiff. DO NOT EDIT.";

/// Functions bound for one generated file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitFile {
    /// Relative to the output directory.
    pub path: PathBuf,
    pub family: Family,
    pub package_path: String,
    pub package_name: String,
    pub functions: Vec<GeneratedFunction>,
}

impl UnitFile {
    fn directory(&self) -> PathBuf {
        self.path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

/// Group the functions of `ctx` by destination unit, in traversal order.
///
/// Unsupported subtrees are skipped.
pub fn flatten(family: Family, ctx: &GenContext) -> Vec<UnitFile> {
    let mut units = Vec::new();
    collect(family, ctx, None, &mut units);
    units
}

fn collect(family: Family, ctx: &GenContext, enclosing: Option<usize>, units: &mut Vec<UnitFile>) {
    if ctx.unsupported.is_some() {
        return;
    }
    let current = match &ctx.unit {
        Some(unit) => {
            let path = unit.relative_path(family);
            let index = match units.iter().position(|u| u.path == path) {
                Some(index) => index,
                None => {
                    units.push(UnitFile {
                        path,
                        family,
                        package_path: unit.package_path.clone(),
                        package_name: unit.package_name.clone(),
                        functions: Vec::new(),
                    });
                    units.len() - 1
                }
            };
            Some(index)
        }
        None => enclosing,
    };

    if let Some(index) = current {
        units[index].functions.extend(ctx.functions.iter().cloned());
    }
    for child in &ctx.children {
        collect(family, child, current, units);
    }
}

/// What has been emitted so far in one run.
#[derive(Debug, Default)]
pub struct EmissionState {
    written_units: HashSet<PathBuf>,
    helpers: HashMap<PathBuf, HashSet<String>>,
}

impl EmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time `path` is claimed.
    pub fn claim_unit(&mut self, path: &Path) -> bool {
        self.written_units.insert(path.to_path_buf())
    }

    /// `true` the first time helper `name` is claimed in `dir`.
    pub fn claim_helper(&mut self, dir: &Path, name: &str) -> bool {
        self.helpers
            .entry(dir.to_path_buf())
            .or_default()
            .insert(name.to_string())
    }

    pub fn is_written(&self, path: &Path) -> bool {
        self.written_units.contains(path)
    }
}

/// Drop units written earlier in the run and helpers already present in
/// their directory. The first diff unit of a directory also receives
/// `diffKeyJoin`.
pub fn dedup(units: Vec<UnitFile>, state: &mut EmissionState) -> Vec<UnitFile> {
    let mut kept = Vec::with_capacity(units.len());
    for mut unit in units {
        if !state.claim_unit(&unit.path) {
            tracing::trace!(path = %unit.path.display(), "unit already written");
            continue;
        }
        let dir = unit.directory();
        unit.functions
            .retain(|f| f.method || state.claim_helper(&dir, &f.name));
        if unit.family == Family::Diff && state.claim_helper(&dir, DIFF_KEY_JOIN) {
            unit.functions.push(diff_key_join());
        }
        kept.push(unit);
    }
    kept
}

/// Render a unit as a Go source file.
pub fn assemble(unit: &UnitFile, header: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(header) = header.map(str::trim).filter(|h| !h.is_empty()) {
        out.push_str(header);
        out.push_str("\n\n");
    }
    out.push_str(GENERATED_MARKER);
    out.push_str("\n\n");
    let _ = writeln!(out, "package {}", unit.package_name);

    let imports: BTreeSet<&Import> = unit
        .functions
        .iter()
        .flat_map(|f| &f.imports)
        .filter(|import| import.path != unit.package_path)
        .collect();
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for import in imports {
            let _ = writeln!(out, "\t{}", import.spec());
        }
        out.push_str(")\n");
    }

    for function in &unit.functions {
        out.push('\n');
        out.push_str(&function.text);
        out.push('\n');
    }
    out
}
