//! Source formatting of assembled files.

use std::io::{self, Write as _};
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("cannot run `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("`{program}` rejected the source: {stderr}")]
    Rejected { program: String, stderr: String },

    #[error("formatter I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("formatter output is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Canonical formatting of a generated Go file.
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Pipes source through an external `gofmt`.
#[derive(Clone, Debug)]
pub struct Gofmt {
    program: String,
}

impl Default for Gofmt {
    fn default() -> Self {
        Self {
            program: String::from("gofmt"),
        }
    }
}

impl Gofmt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another executable, reading stdin and writing stdout like gofmt.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Formatter for Gofmt {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        pipe(&self.program, source)
    }
}

/// Pipes source through an external `goimports`, which also repairs the
/// import block.
#[derive(Clone, Debug)]
pub struct Goimports {
    program: String,
}

impl Default for Goimports {
    fn default() -> Self {
        Self {
            program: String::from("goimports"),
        }
    }
}

impl Goimports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Formatter for Goimports {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        pipe(&self.program, source)
    }
}

/// Run `program` with `source` on stdin and return its stdout.
fn pipe(program: &str, source: &str) -> Result<String, FormatError> {
    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| FormatError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // both formatters read all of stdin before writing; stdin closes on drop.
    // A program that exits early is reported through its status.
    if let Some(mut stdin) = child.stdin.take()
        && let Err(err) = stdin.write_all(source.as_bytes())
        && err.kind() != io::ErrorKind::BrokenPipe
    {
        return Err(err.into());
    }
    let output = child.wait_with_output()?;

    if !output.status.success() {
        return Err(FormatError::Rejected {
            program: program.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8(output.stdout)?)
}

/// Leaves source untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Formatter for Passthrough {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}
