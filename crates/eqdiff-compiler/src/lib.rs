//! eqdiff compiler: turns Go type graphs into `Equal`/`Diff` methods.
//!
//! Pipeline, one root type at a time:
//! - `descriptor` - type handle → descriptor tree (cycle breaking, deny-list)
//! - `synth` - descriptor tree → generation contexts, once per family
//! - `writer` - contexts → deduplicated, assembled destination units
//! - `generate` - orchestration, formatting and persistence

use std::path::PathBuf;

pub mod codegen;
pub mod descriptor;
pub mod generate;
pub mod naming;
pub mod overrides;
pub mod synth;
pub mod writer;

#[cfg(test)]
mod naming_tests;
#[cfg(test)]
pub mod test_utils;

pub use descriptor::{BuilderConfig, DescriptorBuilder, Import, TypeDescriptor};
pub use generate::{
    FormatFailure, GenerateReport, Generator, Omission, Options, RenderedFile, RenderedRoot,
    RootSelection, collect_omissions, resolve_roots,
};
pub use naming::Family;
pub use overrides::{FuncRef, OverrideFuncs, OverrideTable};
pub use writer::{EmissionState, FormatError, Formatter, Gofmt, Goimports, Passthrough};

/// Errors surfaced to the caller. Unsupported types are never errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid override for `{key}`: {reason}")]
    InvalidOverride { key: String, reason: String },

    #[error("cannot resolve root type: {0}")]
    UnknownRoot(#[source] eqdiff_core::UniverseError),

    #[error("cannot create directory `{}`: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write `{}`: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
