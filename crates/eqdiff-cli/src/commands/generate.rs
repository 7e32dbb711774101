use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use eqdiff_compiler::{
    Generator, Gofmt, Goimports, Options, OverrideTable, Passthrough, RootSelection, resolve_roots,
};

use super::fail;
use super::loader::{load_header, load_overrides, load_universe};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatterKind {
    Gofmt,
    Goimports,
    None,
}

pub struct GenerateArgs {
    pub universe: PathBuf,
    pub roots: RootSelection,
    pub output_dir: PathBuf,
    pub overrides: Option<PathBuf>,
    pub header_file: Option<PathBuf>,
    pub skip_types: Option<Vec<String>>,
    pub formatter: FormatterKind,
}

pub fn run(args: GenerateArgs) {
    let universe = load_universe(&args.universe).unwrap_or_else(|e| fail(e));

    let mut overrides = match &args.overrides {
        Some(path) => load_overrides(path).unwrap_or_else(|e| fail(e)),
        None => OverrideTable::new(),
    };
    if let Err(e) = overrides.validate(&universe) {
        fail(e);
    }

    let roots = resolve_roots(&universe, &args.roots).unwrap_or_else(|e| fail(e));
    if roots.is_empty() {
        fail("no root types selected");
    }

    let mut options = Options::new()
        .output_dir(&args.output_dir)
        .overrides(overrides);
    if let Some(path) = &args.header_file {
        options = options.header(load_header(path).unwrap_or_else(|e| fail(e)));
    }
    if let Some(skip_types) = args.skip_types {
        options = options.skip_types(skip_types);
    }
    options = match args.formatter {
        FormatterKind::Gofmt => options.formatter(Gofmt::new()),
        FormatterKind::Goimports => options.formatter(Goimports::new()),
        FormatterKind::None => options.formatter(Passthrough),
    };

    if let Err(e) = clear_output_dir(&args.output_dir) {
        fail(format!(
            "cannot clear output directory '{}': {e}",
            args.output_dir.display()
        ));
    }

    let report = Generator::new(options)
        .generate(&roots)
        .unwrap_or_else(|e| fail(e));

    for path in &report.written {
        println!("{}", path.display());
    }
    if !report.format_failures.is_empty() {
        eprintln!(
            "warning: {} file(s) written without formatting",
            report.format_failures.len()
        );
    }
}

/// Remove `dir` and everything below it, then recreate it empty.
pub fn clear_output_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        let resolved = dir.canonicalize()?;
        if resolved.parent().is_none() || resolved == std::env::current_dir()?.canonicalize()? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to clear a filesystem root or the working directory",
            ));
        }
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}
