//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so `generate` and `inspect` select
//! their roots the same way.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Type universe JSON (--universe).
pub fn universe_arg() -> Arg {
    Arg::new("universe")
        .short('u')
        .long("universe")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Type universe JSON (`-` reads stdin)")
}

/// Root types (positional, repeatable).
pub fn types_arg() -> Arg {
    Arg::new("types")
        .value_name("TYPES")
        .num_args(1..)
        .help("Root types as import/path.Type")
}

/// Package scan (--scan).
pub fn scan_arg() -> Arg {
    Arg::new("scan")
        .long("scan")
        .value_name("PKG_PATH")
        .help("Use every type defined in this package as a root")
}

/// Output directory (-o/--output-dir).
pub fn output_dir_arg() -> Arg {
    Arg::new("output_dir")
        .short('o')
        .long("output-dir")
        .value_name("DIR")
        .default_value("./generated")
        .value_parser(value_parser!(PathBuf))
        .help("Output directory, cleared before generation")
}

/// Override table (--overrides).
pub fn overrides_arg() -> Arg {
    Arg::new("overrides")
        .long("overrides")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Override table (YAML, or JSON with a .json extension)")
}

/// Header snippet (--header-file).
pub fn header_file_arg() -> Arg {
    Arg::new("header_file")
        .long("header-file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Text placed at the top of every generated file")
}

/// Deny-listed field types (--skip-type, repeatable).
pub fn skip_type_arg() -> Arg {
    Arg::new("skip_type")
        .long("skip-type")
        .value_name("TYPE")
        .action(ArgAction::Append)
        .help("Field type to leave out (pkg.Name or import/path.Name); replaces the defaults")
}

/// Formatting program (--formatter).
pub fn formatter_arg() -> Arg {
    Arg::new("formatter")
        .long("formatter")
        .value_name("PROGRAM")
        .default_value("gofmt")
        .value_parser(["gofmt", "goimports"])
        .help("Formatter for generated files (goimports also fixes imports)")
}

/// Skip formatting (--no-format).
pub fn no_format_arg() -> Arg {
    Arg::new("no_format")
        .long("no-format")
        .action(ArgAction::SetTrue)
        .help("Write generated files without running gofmt")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for debug, -vv for trace)")
}
