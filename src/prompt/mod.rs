// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Prompt construction for the remote model
//!
//! Builds a fresh system/user prompt pair for every remote-bound command.
//! Only already classified input reaches this module; local categories yield
//! no prompt at all.

pub mod calendar;

use chrono::{Local, NaiveDate};

use crate::command::{ArtForm, AsciiArtRequest, CommandCategory, CommandLine};

/// Widest figure the model is asked to draw.
pub const FIGURE_MAX_COLUMNS: usize = 80;

/// Widest calendar frame the model is asked to draw.
pub const CALENDAR_MAX_COLUMNS: usize = 60;

/// Characters removed from pass-through commands before they reach the model.
const STRIPPED_CHARS: &[char] = &['`', '$', '|', '<', '>'];

const TERMINAL_SYSTEM_PROMPT: &str = "You are a Linux terminal simulator. Follow these rules strictly:

1. ONLY accept and respond to valid Linux commands written in English
2. NEVER respond to questions or conversations
3. NEVER provide explanations or any text besides the command output
4. EXACTLY reproduce the output format of a real Linux terminal, giving one plausible result
5. For unknown commands, ONLY return \"bash: <command>: command not found\"";

const POEM_SYSTEM_PROMPT: &str = "You are a reciter of classical Tang dynasty poetry. Follow these rules strictly:

1. Output exactly one complete, well-known classical poem
2. Put the title on the first line and the verses on the following lines
3. End with a citation line in the form \"-- <Dynasty> . <Poet>\"
4. Choose a different poem each time when possible
5. Return ONLY the poem and its citation, no explanations or additional text";

/// A system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds prompts from classified commands.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    /// Fixed date for calendar prompts; the local date is used when unset
    today: Option<NaiveDate>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date used for calendar prompts.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Build the prompt for a remote-bound category, `None` for local ones.
    pub fn build(&self, category: &CommandCategory, line: &CommandLine) -> Option<Prompt> {
        match category {
            CommandCategory::PassThrough => Some(Self::pass_through(line)),
            CommandCategory::AsciiArtRequest(request) => Some(match request.form {
                ArtForm::Figure => Self::figure(request),
                ArtForm::Poem => Self::poem(request),
                ArtForm::Calendar => Self::calendar(self.today()),
            }),
            CommandCategory::Empty
            | CommandCategory::ContainsForeignScript
            | CommandCategory::BuiltinClear
            | CommandCategory::BuiltinHelp
            | CommandCategory::BuiltinToggleAnimation(_)
            | CommandCategory::AnimationTrigger(_)
            | CommandCategory::DangerousRejected
            | CommandCategory::Unrecognized { .. } => None,
        }
    }

    fn pass_through(line: &CommandLine) -> Prompt {
        Prompt {
            system: TERMINAL_SYSTEM_PROMPT.to_string(),
            user: sanitize_command(line.raw()),
        }
    }

    fn figure(request: &AsciiArtRequest) -> Prompt {
        let style = request
            .style
            .as_deref()
            .unwrap_or(crate::command::DEFAULT_FIGURE_STYLE);

        let system = format!(
            "You are an ASCII art generator. Generate ASCII art based on the following rules:

1. If the input names a specific animal or object (like cat, dog, tux), draw that
2. Always put the text in a speech bubble above the ASCII art
3. Make the art cute and recognizable
4. Use simple ASCII characters only, to ensure compatibility
5. Keep the art within {} columns
6. Return ONLY the ASCII art, no explanations or additional text

If no specific type is provided, default to drawing Tux, the Linux penguin.",
            FIGURE_MAX_COLUMNS
        );

        Prompt {
            system,
            user: format!(
                "{}: generate ASCII art of type \"{}\" saying \"{}\"",
                request.subtype, style, request.text
            ),
        }
    }

    fn poem(request: &AsciiArtRequest) -> Prompt {
        let user = if request.text.is_empty() {
            format!("{}: recite one classical poem", request.subtype)
        } else {
            format!(
                "{}: recite one classical poem related to \"{}\"",
                request.subtype, request.text
            )
        };

        Prompt {
            system: POEM_SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    fn calendar(today: NaiveDate) -> Prompt {
        let system = format!(
            "You are a calendar artist working in a monospace terminal. Follow these rules strictly:

1. Draw the month shown in the reference grid below inside a decorative ASCII frame
2. Keep the whole drawing within {} columns
3. Keep every day in the same weekday column as the reference grid
4. Mark today's date clearly, for example as [19]
5. Return ONLY the calendar, no explanations or additional text

Reference grid:
{}",
            CALENDAR_MAX_COLUMNS,
            calendar::month_grid(today)
        );

        Prompt {
            system,
            user: format!(
                "cal: draw the calendar for {} and highlight today, {}",
                today.format("%B %Y"),
                today.format("%A %-d %B %Y")
            ),
        }
    }
}

/// Strip shell metacharacters that could alter the prompt structure.
///
/// This narrows what a user can smuggle into the prompt; it is not a
/// security boundary.
pub fn sanitize_command(command: &str) -> String {
    command
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect()
}
