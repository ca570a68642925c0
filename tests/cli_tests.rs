// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use clap::Parser;
use mockshell::cli::{Cli, Commands};

#[test]
fn test_parse_serve_command() {
    let cli = Cli::try_parse_from(["mockshell", "serve"]).unwrap();
    match cli.command {
        Some(Commands::Serve(args)) => assert!(args.bind.is_none()),
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_parse_serve_short_bind() {
    let cli = Cli::try_parse_from(["mockshell", "serve", "-b", "0.0.0.0:3000"]).unwrap();
    match cli.command {
        Some(Commands::Serve(args)) => assert_eq!(args.bind.as_deref(), Some("0.0.0.0:3000")),
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_parse_repl_without_server() {
    let cli = Cli::try_parse_from(["mockshell", "repl"]).unwrap();
    match cli.command {
        Some(Commands::Repl(args)) => assert!(args.server.is_none()),
        _ => panic!("Expected Repl command"),
    }
}

#[test]
fn test_parse_classify_command() {
    let cli = Cli::try_parse_from(["mockshell", "classify", "cowsay", "dog", "Woof"]).unwrap();
    match cli.command {
        Some(Commands::Classify(args)) => {
            assert_eq!(args.words, vec!["cowsay", "dog", "Woof"]);
            assert_eq!(args.line(), "cowsay dog Woof");
        }
        _ => panic!("Expected Classify command"),
    }
}

#[test]
fn test_parse_verbose_count() {
    let cli = Cli::try_parse_from(["mockshell", "-vvv"]).unwrap();
    assert_eq!(cli.verbose, 3);
}

#[test]
fn test_parse_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["mockshell", "chat"]).is_err());
}
