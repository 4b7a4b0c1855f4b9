//! Main entry point for the rat-rs CLI

mod cli;
mod commands;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set verbosity
    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    // Execute command
    match cli.command {
        Commands::Info { file, detailed } => commands::anim::handle_info(file, detailed),

        Commands::Validate { file } => commands::anim::handle_validate(file),

        Commands::Compress {
            input,
            output,
            mesh,
            indices,
            keep_raw_first_frame,
            bit_width_cap,
            budget,
        } => commands::anim::handle_compress(
            input,
            output,
            mesh,
            indices,
            keep_raw_first_frame,
            bit_width_cap,
            budget,
        ),

        Commands::Decompress { input, output } => {
            commands::anim::handle_decompress(input, output)
        }

        Commands::Assemble { chunks, output } => commands::anim::handle_assemble(chunks, output),

        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
