use std::process::ExitCode;

use clap::Parser;

use rankscore_cli::cli::{Cli, run};

fn main() -> anyhow::Result<ExitCode> {
    run(Cli::parse())
}
