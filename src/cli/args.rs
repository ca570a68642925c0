// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// mockshell - a simulated Linux terminal answered by a language model
#[derive(Parser, Debug)]
#[command(name = "mockshell")]
#[command(version, about = "A simulated Linux terminal answered by a language model")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP command endpoint
    Serve(ServeArgs),

    /// Start an interactive terminal (default when no command given)
    Repl(ReplArgs),

    /// Print the category of a command line
    Classify(ClassifyArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address (overrides server.bind)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for the repl command
#[derive(Args, Debug, Default)]
pub struct ReplArgs {
    /// Command server root URL; the service runs in-process when omitted
    #[arg(short, long)]
    pub server: Option<String>,
}

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The command line, as separate words
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

impl ClassifyArgs {
    pub fn line(&self) -> String {
        self.words.join(" ")
    }
}
