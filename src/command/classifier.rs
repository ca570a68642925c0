// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Pure classification of command lines
//!
//! Precedence (first match wins): empty, foreign script, clear, help, pet
//! toggle, animation, ASCII art, dangerous, unrecognized, pass-through.
//! Dangerous commands are checked before validity because the two sets
//! overlap on purpose.

use std::sync::Arc;

use super::{
    ArtForm, AsciiArtRequest, CommandCategory, CommandLine, CommandSets, DEFAULT_FIGURE_CAPTION,
    DEFAULT_FIGURE_STYLE,
};

/// Maps command lines to categories using a fixed set configuration.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    sets: Arc<CommandSets>,
}

impl Classifier {
    pub fn new(sets: CommandSets) -> Self {
        Self {
            sets: Arc::new(sets),
        }
    }

    /// Share an existing set configuration.
    pub fn with_shared(sets: Arc<CommandSets>) -> Self {
        Self { sets }
    }

    pub fn sets(&self) -> &CommandSets {
        &self.sets
    }

    /// Classify a raw line.
    pub fn classify(&self, raw: &str) -> CommandCategory {
        self.classify_line(&CommandLine::new(raw))
    }

    /// Classify an already captured line.
    pub fn classify_line(&self, line: &CommandLine) -> CommandCategory {
        if line.trimmed().is_empty() {
            return CommandCategory::Empty;
        }

        let sets = &self.sets;
        if sets.contains_foreign_script(line.raw()) {
            return CommandCategory::ContainsForeignScript;
        }

        let token = line.main_token();

        if token == sets.clear_token {
            return CommandCategory::BuiltinClear;
        }
        if token == sets.help_token {
            return CommandCategory::BuiltinHelp;
        }
        if let Some(kind) = sets.toggles.get(&token) {
            return CommandCategory::BuiltinToggleAnimation(*kind);
        }
        if let Some(kind) = sets.animations.get(&token) {
            return CommandCategory::AnimationTrigger(*kind);
        }
        if let Some(form) = sets.ascii_art.get(&token) {
            return CommandCategory::AsciiArtRequest(parse_art_request(line, token, *form));
        }
        if sets.is_dangerous(&token) {
            return CommandCategory::DangerousRejected;
        }
        if !sets.is_valid(&token) {
            return CommandCategory::Unrecognized {
                token: line.first_token().to_string(),
            };
        }

        CommandCategory::PassThrough
    }
}

/// Split the arguments of an art command into style and caption.
///
/// Figures take an optional creature before the caption: with a single
/// argument that argument is the caption.
fn parse_art_request(line: &CommandLine, subtype: String, form: ArtForm) -> AsciiArtRequest {
    match form {
        ArtForm::Figure => {
            let args = line.arguments();
            let (style, caption) = match args.as_slice() {
                [] => (DEFAULT_FIGURE_STYLE.to_string(), DEFAULT_FIGURE_CAPTION.to_string()),
                [caption] => (DEFAULT_FIGURE_STYLE.to_string(), caption.to_string()),
                [style, rest @ ..] => (style.to_lowercase(), rest.join(" ")),
            };
            AsciiArtRequest {
                subtype,
                form,
                style: Some(style),
                text: caption,
            }
        }
        ArtForm::Poem | ArtForm::Calendar => AsciiArtRequest {
            subtype,
            form,
            style: None,
            text: line.argument_text().to_string(),
        },
    }
}
