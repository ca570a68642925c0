// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! mockshell - a simulated Linux terminal answered by a language model
//!
//! Entry point for the mockshell CLI application.

use std::sync::Arc;

use clap::Parser;

use mockshell::cli::{repl, Cli, Commands, ReplArgs, ServeArgs};
use mockshell::command::Classifier;
use mockshell::config::Settings;
use mockshell::error::Result;
use mockshell::server::{self, CommandService};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    let mut directives: Vec<&str> = Vec::new();
    if matches!(cli.command, Some(Commands::Serve(_))) {
        directives.push("mockshell.server=info");
    }
    if cli.verbose > 0 {
        directives.extend([
            "mockshell.server=debug",
            "mockshell.rate_limit=debug",
            "mockshell.llm=debug",
            "mockshell.session=debug",
        ]);
    }
    if cli.verbose > 1 {
        directives.push("tower_http=debug");
    }
    for directive in directives {
        if let Ok(parsed) = directive.parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Load settings
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    settings.validate()?;

    match cli.command {
        Some(Commands::Serve(args)) => run_serve(&settings, args).await,
        Some(Commands::Repl(args)) => run_repl(&settings, args).await,
        Some(Commands::Classify(args)) => {
            let category = Classifier::default().classify(&args.line());
            println!("{}", category.label());
            Ok(())
        }
        None => run_repl(&settings, ReplArgs::default()).await,
    }
}

async fn run_serve(settings: &Settings, args: ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| settings.server.bind.clone());
    let service = Arc::new(CommandService::from_settings(settings)?);
    let router = server::router(service, &settings.server.client_ip_header)?;
    server::serve(router, &bind).await
}

async fn run_repl(settings: &Settings, args: ReplArgs) -> Result<()> {
    let server_url = args.server.or_else(|| settings.terminal.server_url.clone());
    repl::run_repl(settings, server_url.as_deref()).await
}
