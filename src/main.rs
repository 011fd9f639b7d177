//! plainweave - Command-line tool for weaving color patterns into WIF drafts and PNG swatches

use std::process::ExitCode;

use plainweave::cli;

fn main() -> ExitCode {
    cli::run()
}
