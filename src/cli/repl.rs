// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Interactive simulated terminal on stdin/stdout.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    ExecutableCommand,
};

use crate::command::AnimationKind;
use crate::config::Settings;
use crate::error::Result;
use crate::server::CommandService;
use crate::session::{
    CommandBackend, DispatchOutcome, Dispatcher, LocalBackend, RemoteBackend, Session, SideEffect,
    TranscriptEntry,
};

const PROMPT: &str = "user@mockshell:~$ ";
/// Extra time the HTTP client waits on top of the model timeout.
const REMOTE_GRACE_SECS: u64 = 10;
/// Delay before the waiting notice is shown.
const WAITING_NOTICE_AFTER: Duration = Duration::from_millis(800);

/// Pick the backend: a remote server when a URL is given, otherwise the
/// command service in this process.
pub fn build_backend(
    settings: &Settings,
    server_url: Option<&str>,
) -> Result<Arc<dyn CommandBackend>> {
    match server_url {
        Some(url) => {
            let timeout = Duration::from_secs(settings.model.timeout_secs + REMOTE_GRACE_SECS);
            Ok(Arc::new(RemoteBackend::new(url, timeout)?))
        }
        None => {
            let service = CommandService::from_settings(settings)?;
            Ok(Arc::new(LocalBackend::new(Arc::new(service))))
        }
    }
}

/// Run the interactive loop until end of input.
pub async fn run_repl(settings: &Settings, server_url: Option<&str>) -> Result<()> {
    let backend = build_backend(settings, server_url)?;
    let backend_name = backend.name().to_string();
    let mut session = Session::new(Dispatcher::new(backend)).with_viewport(
        settings.terminal.viewport_width,
        settings.terminal.viewport_height,
    );

    print_welcome(&backend_name, server_url)?;

    while let Some(line) = read_command()? {
        let flag = session.processing_flag();
        let notice = tokio::spawn(async move {
            tokio::time::sleep(WAITING_NOTICE_AFTER).await;
            if flag.is_set() {
                let _ = print_colored(Color::DarkGrey, "(waiting for the model...)");
            }
        });

        let outcome = session.submit(&line).await;
        notice.abort();

        match outcome {
            Ok(outcome) => render_outcome(&outcome)?,
            Err(e) => print_colored(Color::Red, &format!("Error: {}", e))?,
        }
    }

    println!();
    Ok(())
}

fn print_welcome(backend: &str, server_url: Option<&str>) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Cyan))?;
    println!("mockshell v{}", env!("CARGO_PKG_VERSION"));
    stdout.execute(ResetColor)?;
    println!("A simulated Linux terminal. Nothing you type touches this machine.");
    match server_url {
        Some(url) => println!("Backend: {} ({})", backend, url),
        None => println!("Backend: {}", backend),
    }
    println!("Type 'help' for commands, Ctrl-D to leave.");
    println!();
    Ok(())
}

/// Read one line, without its line terminator. `None` at end of input.
fn read_command() -> Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Green))?;
    print!("{}", PROMPT);
    stdout.execute(ResetColor)?;
    stdout.flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    let trimmed_len = input.trim_end_matches(['\n', '\r']).len();
    input.truncate(trimmed_len);
    Ok(Some(input))
}

fn render_outcome(outcome: &DispatchOutcome) -> Result<()> {
    if outcome.clears_transcript() {
        let mut stdout = io::stdout();
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;
    }

    // The echo is already on screen as the typed line.
    for entry in outcome.appended.iter().filter(|e| !e.is_echo()) {
        let (color, text) = styled_entry(entry);
        match color {
            Some(color) => print_colored(color, &text)?,
            None => println!("{}", text),
        }
    }

    for effect in &outcome.effects {
        if let Some(note) = effect_note(effect) {
            print_colored(Color::DarkGrey, &note)?;
        }
    }
    Ok(())
}

fn print_colored(color: Color, text: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(color))?;
    println!("{}", text);
    stdout.execute(ResetColor)?;
    Ok(())
}

fn styled_entry(entry: &TranscriptEntry) -> (Option<Color>, String) {
    let text = entry.to_string();
    if text.starts_with("Error: ") || text.starts_with("Operation not permitted") {
        (Some(Color::Red), text)
    } else {
        (None, text)
    }
}

/// One-line stand-in for effects a graphical terminal would draw.
fn effect_note(effect: &SideEffect) -> Option<String> {
    match effect {
        SideEffect::ClearTranscript => None,
        SideEffect::TogglePet { visible: true } => Some("(the cat wakes up)".to_string()),
        SideEffect::TogglePet { visible: false } => Some("(the cat goes to sleep)".to_string()),
        SideEffect::StartAnimation(kind) => Some(match kind {
            AnimationKind::Train => "(a steam locomotive rolls across the screen)".to_string(),
            other => format!("({} is running, any other command closes it)", other.name()),
        }),
        SideEffect::DismissOverlays => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::NOT_PERMITTED_MESSAGE;

    #[test]
    fn test_styled_entry_colors_errors() {
        let (color, text) = styled_entry(&TranscriptEntry::output("Error: Request timed out"));
        assert_eq!(color, Some(Color::Red));
        assert_eq!(text, "Error: Request timed out");

        let (color, _) = styled_entry(&TranscriptEntry::output(NOT_PERMITTED_MESSAGE));
        assert_eq!(color, Some(Color::Red));

        let (color, _) = styled_entry(&TranscriptEntry::output("total 0"));
        assert_eq!(color, None);
    }

    #[test]
    fn test_effect_notes() {
        assert!(effect_note(&SideEffect::ClearTranscript).is_none());
        assert!(effect_note(&SideEffect::DismissOverlays).is_none());
        assert!(effect_note(&SideEffect::StartAnimation(AnimationKind::Train))
            .unwrap()
            .contains("locomotive"));
        assert!(effect_note(&SideEffect::StartAnimation(AnimationKind::Matrix))
            .unwrap()
            .contains("matrix is running"));
    }

    #[test]
    fn test_build_backend_remote() {
        let settings = Settings::default();
        let backend = build_backend(&settings, Some("http://127.0.0.1:3000")).unwrap();
        assert_eq!(backend.name(), "remote");
    }

    #[test]
    fn test_build_backend_local() {
        let settings = Settings::default();
        let backend = build_backend(&settings, None).unwrap();
        assert_eq!(backend.name(), "local");
    }
}
