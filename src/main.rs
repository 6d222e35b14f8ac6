use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use linkedbx::command;
use linkedbx::runtime::{self, LogLevel, LogMode};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    // Log filter: error, warn, info, debug or trace
    #[arg(long = "log-level", global = true, default_value = "info")]
    log_level: LogLevel,

    // Where log lines go: terminal, file or discard
    #[arg(long = "log-mode", global = true, default_value = "terminal")]
    log_mode: LogMode,

    // Log file, used with --log-mode file
    #[arg(long = "log-path", global = true, default_value = "linkedbx.log")]
    log_path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    Detect(command::DetectCMD),
    Standardize(command::StandardizeCMD),
    Batch(command::BatchCMD),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = runtime::setup_global_logger(cli.log_level, cli.log_mode, &cli.log_path) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Detect(mut cmd) => cmd.try_execute(),
        Commands::Standardize(mut cmd) => cmd.try_execute(),
        Commands::Batch(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
