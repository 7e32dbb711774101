use std::path::PathBuf;

use eqdiff_compiler::{Generator, Options, RootSelection, resolve_roots};

use super::fail;
use super::loader::load_universe;

pub struct InspectArgs {
    pub universe: PathBuf,
    pub roots: RootSelection,
    pub skip_types: Option<Vec<String>>,
}

pub fn run(args: InspectArgs) {
    let universe = load_universe(&args.universe).unwrap_or_else(|e| fail(e));
    let roots = resolve_roots(&universe, &args.roots).unwrap_or_else(|e| fail(e));

    let mut options = Options::new();
    if let Some(skip_types) = args.skip_types {
        options = options.skip_types(skip_types);
    }
    let generator = Generator::new(options);
    let descriptors: Vec<_> = roots.iter().map(|root| generator.describe(root)).collect();

    match serde_json::to_string_pretty(&descriptors) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }
}
