use autounattend::cli::cmd::Commands;
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CommandLine {
    #[clap(subcommand)]
    command: Commands,
}

pub fn main() -> ExitCode {
    // Parse command line options before we configure logging so we can set the
    // default level
    let command_line = CommandLine::parse();

    // Configure logging
    let default_level = match &command_line.command {
        Commands::Generate { debug: true, .. } => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    // Dispatch command
    match command_line.command {
        cmd @ Commands::Generate { .. } => autounattend::cli::cmd::generate::run(cmd),
        cmd @ Commands::Validate { .. } => autounattend::cli::cmd::validate::run(cmd),
        cmd @ Commands::Init { .. } => autounattend::cli::cmd::init::run(cmd),
    }
}
