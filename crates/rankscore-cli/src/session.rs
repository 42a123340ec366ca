use std::io::BufRead;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::{Action, AppController, execute};
use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "session", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    action: Action,
}

/// Line-oriented loop over the same actions as the command line. Stops at
/// end of input or on `quit`. Returns false if any line was rejected, either
/// by the parser or by the game.
pub fn run<R: BufRead>(controller: &mut AppController, config: &AppConfig, input: R) -> Result<bool> {
    println!("Enter commands (start, select east, commit, history, ...) or 'quit'.");
    let mut clean = true;
    for line in input.lines() {
        let line = line.context("reading session input")?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            _ => {}
        }
        match SessionLine::try_parse_from(words) {
            Ok(parsed) => {
                clean &= execute(controller, config, parsed.action)?;
            }
            Err(err) => {
                let _ = err.print();
                clean = false;
            }
        }
    }
    Ok(clean)
}
