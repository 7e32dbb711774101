//! Multi-root orchestration: build, synthesize, deduplicate, format, write.
//!
//! Roots are processed strictly one after another. A root's files are
//! written before the next root is built, and the [`EmissionState`] carried
//! by the [`Generator`] decides which units and helpers later roots may
//! still emit.

use std::fs;
use std::path::{Path, PathBuf};

use eqdiff_core::{TypeHandle, Universe, UniverseType};
use serde::Serialize;

use crate::descriptor::{BuilderConfig, DescriptorBuilder, TypeDescriptor};
use crate::naming::Family;
use crate::overrides::OverrideTable;
use crate::synth::synthesize;
use crate::writer::{EmissionState, Formatter, Gofmt, assemble, dedup, flatten};
use crate::{Error, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Generation options.
pub struct Options {
    pub(crate) output_dir: PathBuf,
    pub(crate) overrides: OverrideTable,
    pub(crate) header: Option<String>,
    pub(crate) builder: BuilderConfig,
    pub(crate) formatter: Box<dyn Formatter>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            overrides: OverrideTable::new(),
            header: None,
            builder: BuilderConfig::default(),
            formatter: Box::new(Gofmt::new()),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Overrides must already be validated against the universe.
    pub fn overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Text placed above the generated-code marker of every file.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Replace the deny-list of field types.
    pub fn skip_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder = self.builder.skip_types(types);
        self
    }

    pub fn builder_config(mut self, config: BuilderConfig) -> Self {
        self.builder = config;
        self
    }

    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedFile {
    /// Relative to the output directory.
    pub path: PathBuf,
    pub family: Family,
    pub contents: String,
    /// Set when formatting failed and `contents` is the unformatted text.
    pub format_error: Option<String>,
}

/// A field or element left out of generated comparisons.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Omission {
    pub root: String,
    /// Go spelling of the omitted value's type.
    pub type_name: String,
    /// Path from the root: `Hook`, `Servers[].Handler`; empty for the root.
    pub field: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderedRoot {
    pub files: Vec<RenderedFile>,
    pub omissions: Vec<Omission>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormatFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    /// Joined onto the output directory, in write order.
    pub written: Vec<PathBuf>,
    pub omissions: Vec<Omission>,
    pub format_failures: Vec<FormatFailure>,
}

// ============================================================================
// Root selection
// ============================================================================

/// Which types to generate for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RootSelection {
    /// Explicit `import/path.Type` specs.
    Types(Vec<String>),
    /// Every type defined in one package.
    Package(String),
}

pub fn resolve_roots<'u>(
    universe: &'u Universe,
    selection: &RootSelection,
) -> Result<Vec<UniverseType<'u>>> {
    match selection {
        RootSelection::Types(specs) => specs
            .iter()
            .map(|spec| universe.resolve(spec).map_err(Error::UnknownRoot))
            .collect(),
        RootSelection::Package(path) => universe.package_types(path).map_err(Error::UnknownRoot),
    }
}

/// Topmost unsupported nodes of a descriptor tree.
pub fn collect_omissions(root: &TypeDescriptor) -> Vec<Omission> {
    let root_name = root
        .full_name
        .clone()
        .unwrap_or_else(|| root.type_text.clone());
    let mut omissions = Vec::new();
    omissions_below(root, &root_name, String::new(), &mut omissions);
    omissions
}

fn omissions_below(node: &TypeDescriptor, root: &str, path: String, out: &mut Vec<Omission>) {
    if node.unsupported {
        out.push(Omission {
            root: root.to_string(),
            type_name: node.type_text.clone(),
            field: path,
            reason: node
                .unsupported_reason
                .clone()
                .unwrap_or_else(|| String::from("cannot be compared")),
        });
        return;
    }
    for field in &node.fields {
        let field_path = if path.is_empty() {
            field.name.clone()
        } else {
            format!("{path}.{}", field.name)
        };
        omissions_below(field, root, field_path, out);
    }
    if let Some(sub) = &node.sub_node {
        omissions_below(sub, root, format!("{path}[]"), out);
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Runs the pipeline over many roots with shared deduplication state.
pub struct Generator {
    options: Options,
    state: EmissionState,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            state: EmissionState::new(),
        }
    }

    pub fn describe<H: TypeHandle>(&self, root: &H) -> TypeDescriptor {
        DescriptorBuilder::new(&self.options.builder).build_root(root)
    }

    /// Build, synthesize and assemble both families for one root.
    ///
    /// Units already rendered earlier in this generator's life are left out.
    #[tracing::instrument(level = "debug", skip_all, fields(root = %root.type_string()))]
    pub fn render_root<H: TypeHandle>(&mut self, root: &H) -> RenderedRoot {
        let descriptor = self.describe(root);
        let omissions = collect_omissions(&descriptor);
        for omission in &omissions {
            tracing::warn!(
                root = %omission.root,
                field = %omission.field,
                reason = %omission.reason,
                "not compared"
            );
        }

        let mut files = Vec::new();
        for family in Family::ALL {
            let ctx = synthesize(family, &descriptor, &self.options.overrides);
            for unit in dedup(flatten(family, &ctx), &mut self.state) {
                let source = assemble(&unit, self.options.header.as_deref());
                let (contents, format_error) = match self.options.formatter.format(&source) {
                    Ok(formatted) => (formatted, None),
                    Err(err) => {
                        tracing::warn!(
                            path = %unit.path.display(),
                            error = %err,
                            "formatting failed, keeping unformatted source"
                        );
                        (source, Some(err.to_string()))
                    }
                };
                tracing::debug!(
                    path = %unit.path.display(),
                    functions = unit.functions.len(),
                    "unit rendered"
                );
                files.push(RenderedFile {
                    path: unit.path,
                    family,
                    contents,
                    format_error,
                });
            }
        }

        RenderedRoot { files, omissions }
    }

    /// Render and write every root, one root at a time.
    ///
    /// The first I/O failure aborts the run; files already written stay.
    pub fn generate<H: TypeHandle>(&mut self, roots: &[H]) -> Result<GenerateReport> {
        let mut report = GenerateReport::default();
        for root in roots {
            let rendered = self.render_root(root);
            report.omissions.extend(rendered.omissions);
            for file in rendered.files {
                let path = self.options.output_dir.join(&file.path);
                write_file(&path, &file.contents)?;
                if let Some(message) = file.format_error {
                    report.format_failures.push(FormatFailure {
                        path: path.clone(),
                        message,
                    });
                }
                report.written.push(path);
            }
        }
        tracing::debug!(files = report.written.len(), "generation finished");
        Ok(report)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
