mod cli;
mod commands;
mod logging;

#[cfg(test)]
mod logging_tests;

use cli::{GenerateParams, InspectParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("generate", m)) => {
            let params = GenerateParams::from_matches(m);
            logging::init(params.verbose);
            commands::generate::run(params.into());
        }
        Some(("inspect", m)) => {
            let params = InspectParams::from_matches(m);
            logging::init(params.verbose);
            commands::inspect::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
