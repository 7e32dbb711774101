//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use eqdiff_compiler::RootSelection;

use crate::commands::generate::{FormatterKind, GenerateArgs};
use crate::commands::inspect::InspectArgs;

pub struct GenerateParams {
    pub universe: PathBuf,
    pub roots: RootSelection,
    pub output_dir: PathBuf,
    pub overrides: Option<PathBuf>,
    pub header_file: Option<PathBuf>,
    pub skip_types: Option<Vec<String>>,
    pub formatter: String,
    pub no_format: bool,
    pub verbose: u8,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            universe: universe(m),
            roots: roots(m),
            output_dir: m
                .get_one::<PathBuf>("output_dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("./generated")),
            overrides: m.get_one::<PathBuf>("overrides").cloned(),
            header_file: m.get_one::<PathBuf>("header_file").cloned(),
            skip_types: skip_types(m),
            formatter: m
                .get_one::<String>("formatter")
                .cloned()
                .unwrap_or_else(|| String::from("gofmt")),
            no_format: m.get_flag("no_format"),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            universe: p.universe,
            roots: p.roots,
            output_dir: p.output_dir,
            overrides: p.overrides,
            header_file: p.header_file,
            skip_types: p.skip_types,
            formatter: match (p.no_format, p.formatter.as_str()) {
                (true, _) => FormatterKind::None,
                (false, "goimports") => FormatterKind::Goimports,
                (false, _) => FormatterKind::Gofmt,
            },
        }
    }
}

pub struct InspectParams {
    pub universe: PathBuf,
    pub roots: RootSelection,
    pub skip_types: Option<Vec<String>>,
    pub verbose: u8,
}

impl InspectParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            universe: universe(m),
            roots: roots(m),
            skip_types: skip_types(m),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<InspectParams> for InspectArgs {
    fn from(p: InspectParams) -> Self {
        Self {
            universe: p.universe,
            roots: p.roots,
            skip_types: p.skip_types,
        }
    }
}

fn universe(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("universe").cloned().unwrap_or_default()
}

/// `--scan` wins; clap's group already rejects giving both.
fn roots(m: &ArgMatches) -> RootSelection {
    match m.get_one::<String>("scan") {
        Some(package) => RootSelection::Package(package.clone()),
        None => RootSelection::Types(
            m.get_many::<String>("types")
                .map(|types| types.cloned().collect())
                .unwrap_or_default(),
        ),
    }
}

/// `None` keeps the default deny-list.
fn skip_types(m: &ArgMatches) -> Option<Vec<String>> {
    m.get_many::<String>("skip_type")
        .map(|types| types.cloned().collect())
}
