mod agents;
mod aws;
mod beanstalk;
mod cli;
mod config;
mod credentials;
mod error;
mod iam;
mod messages;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ebrelease=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let credentials = cli.credentials.as_path();

    let result = match cli.command {
        Commands::Release { target, vars } => {
            workflow::execute_release(config, credentials, target.into(), &vars)
        }
        Commands::Validate {
            target,
            check_credential,
        } => workflow::execute_validate(config, credentials, target.into(), check_credential),
        Commands::List { what, json } => {
            workflow::execute_list(config, credentials, what, json).map(|()| true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
