//! Command builders for the CLI.

use clap::{ArgGroup, Command};

use super::args::*;

/// Universe plus exactly one of positional types or `--scan`.
fn with_root_selection(cmd: Command) -> Command {
    cmd.arg(universe_arg())
        .arg(types_arg())
        .arg(scan_arg())
        .group(
            ArgGroup::new("roots")
                .args(["types", "scan"])
                .required(true),
        )
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("eqdiff")
        .about("Generate structural Equal and Diff methods for Go types")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(inspect_command())
}

/// Generate Equal/Diff files.
pub fn generate_command() -> Command {
    let cmd = Command::new("generate")
        .about("Generate Equal and Diff methods for root types")
        .override_usage(
            "\
  eqdiff generate -u <FILE> <TYPES>...
  eqdiff generate -u <FILE> --scan <PKG_PATH>",
        )
        .after_help(
            r#"EXAMPLES:
  eqdiff generate -u types.json example.com/app/models.Backend
  eqdiff generate -u types.json --scan example.com/app/models -o gen/
  eqdiff generate -u types.json --scan example.com/app/models --overrides overrides.yaml
  eqdiff generate -u types.json --scan example.com/app/models --skip-type v1.ObjectMeta"#,
        );

    with_root_selection(cmd)
        .arg(output_dir_arg())
        .arg(overrides_arg())
        .arg(header_file_arg())
        .arg(skip_type_arg())
        .arg(formatter_arg())
        .arg(no_format_arg())
        .arg(verbose_arg())
}

/// Print descriptor trees.
pub fn inspect_command() -> Command {
    let cmd = Command::new("inspect")
        .about("Print the type descriptors of root types as JSON")
        .after_help(
            r#"EXAMPLES:
  eqdiff inspect -u types.json example.com/app/models.Backend
  eqdiff inspect -u types.json --scan example.com/app/models"#,
        );

    with_root_selection(cmd)
        .arg(skip_type_arg())
        .arg(verbose_arg())
}
