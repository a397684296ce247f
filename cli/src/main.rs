use clap::Parser;
use client::ClientError;
use std::process::ExitCode;
use subtrack::commands::{self, Cli};
use subtrack::{app, config, logger, render};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    logger::setup_logger(config.logging(), cli.verbose)?;

    let client = app::build_client(&config)?;
    commands::run(cli.command, &client, &config).await
}

fn report(error: &anyhow::Error) {
    eprintln!("Error: {error}");
    if let Some(client_error) = error.downcast_ref::<ClientError>() {
        for line in render::field_messages(client_error) {
            eprintln!("  {line}");
        }
        if client_error.is_unauthorized() {
            eprintln!("Log in with `subtrack login`.");
        }
    }
}
