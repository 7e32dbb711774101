pub mod generate;
pub mod inspect;
pub mod loader;

#[cfg(test)]
mod loader_tests;

use std::fmt::Display;

/// Report `err` the way every command does and exit with status 1.
pub fn fail(err: impl Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
