//! Input files: type universe, override table, header snippet.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use eqdiff_compiler::OverrideTable;
use eqdiff_core::{Universe, UniverseError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid type universe '{}': {source}", path.display())]
    Universe {
        path: PathBuf,
        source: UniverseError,
    },

    #[error("invalid override file '{}': {source}", path.display())]
    OverridesYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid override file '{}': {source}", path.display())]
    OverridesJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn read(path: &Path) -> Result<String, LoadError> {
    let read_err = |source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(read_err)
}

/// Universe JSON from a file, or stdin for `-`.
pub fn load_universe(path: &Path) -> Result<Universe, LoadError> {
    let text = read(path)?;
    let universe = Universe::from_json(&text).map_err(|source| LoadError::Universe {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), types = universe.len(), "universe loaded");
    Ok(universe)
}

/// Override table; `.json` files are read as JSON, anything else as YAML.
pub fn load_overrides(path: &Path) -> Result<OverrideTable, LoadError> {
    let text = read(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let table = if is_json {
        serde_json::from_str(&text).map_err(|source| LoadError::OverridesJson {
            path: path.to_path_buf(),
            source,
        })?
    } else if text.trim().is_empty() {
        OverrideTable::new()
    } else {
        serde_yaml::from_str(&text).map_err(|source| LoadError::OverridesYaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    tracing::debug!(path = %path.display(), entries = table.len(), "overrides loaded");
    Ok(table)
}

pub fn load_header(path: &Path) -> Result<String, LoadError> {
    read(path)
}
