mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::{CompareFlags, RunOptions};
use stoker::FindCriteria;
use stoker::report::ExitStatus;

fn main() -> ExitCode {
    let cli = Cli::parse();
    stoker::logging::init(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(status) => exit_code(status),
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code(ExitStatus::Fatal)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitStatus> {
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(ExitStatus::Interrupted.code());
    })
    .context("Failed to set Ctrl+C handler")?;

    let options = RunOptions::new(
        cli.format.into(),
        cli.config.as_deref(),
        cli.no_config,
        &cli.ignore,
    );

    match &cli.command {
        Commands::Compare {
            left,
            right,
            all,
            compare_times,
            checksum_threshold,
        } => {
            let flags = CompareFlags {
                all: *all,
                compare_times: *compare_times,
                checksum_threshold: *checksum_threshold,
            };
            commands::Compare::execute(left, right, &flags, &options)
                .context("Failed to execute compare command")
        }
        Commands::CheckAccess { dir } => commands::CheckAccess::execute(dir, &options)
            .context("Failed to execute check_access command"),
        Commands::Find {
            dir,
            extensions,
            users,
            no_compressed,
            full_paths,
        } => {
            let criteria =
                FindCriteria::parse(extensions.as_deref(), users.as_deref(), *no_compressed);
            commands::Find::execute(dir, &criteria, *full_paths, &options)
                .context("Failed to execute find command")
        }
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    u8::try_from(status.code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
