mod agents;
mod catalog;
mod cli;
mod error;
mod gradle;
mod maven;
mod repository;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::VERBOSE_ENV, "1");
        }
    }

    let result = match cli.command {
        Commands::Generate {
            path,
            search_latest,
        } => workflow::execute_generate(path, search_latest),
        Commands::Version => workflow::execute_version(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
