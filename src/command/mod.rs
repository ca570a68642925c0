// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command classification for the simulated terminal
//!
//! Every submitted line is mapped to exactly one [`CommandCategory`]. The
//! terminal client and the command service both classify through
//! [`Classifier`], built from the same [`CommandSets`], so the two sides can
//! never disagree about what is dangerous or valid.

mod classifier;
mod sets;

pub use classifier::Classifier;
pub use sets::{CommandSets, FOREIGN_SCRIPT};

use std::fmt;

/// Style used by the figure generator when none is given.
pub const DEFAULT_FIGURE_STYLE: &str = "tux";

/// Caption used by the figure generator when none is given.
pub const DEFAULT_FIGURE_CAPTION: &str = "Hello, World!";

/// Output for input written in an unsupported script.
pub const FOREIGN_SCRIPT_MESSAGE: &str = "bash: command not found";

/// Output shown by the terminal for a refused command.
pub const NOT_PERMITTED_MESSAGE: &str =
    "Operation not permitted: this command could damage the system and has been disabled";

/// Static help listing, one entry per output line.
pub const HELP_LINES: &[&str] = &[
    "Available commands:",
    "- help: show this help",
    "- clear: clear the terminal",
    "- cowsay: draw ASCII art with a speech bubble, several creatures supported",
    "  Examples:",
    "  - cowsay Hello World     # draws Tux the penguin",
    "  - cowsay cat Hello       # draws a cat",
    "  - cowsay dog Woof        # draws a dog",
    "- sl: watch a steam train go by",
    "- fortune: recite a randomly chosen classical poem",
    "- cmatrix: show Matrix-style digital rain",
    "- asciiquarium: show an aquarium",
    "- dashboard: show a system monitoring dashboard",
    "- oneko: toggle the cat that follows your pointer",
    "- cal: show a decorated calendar of the current month",
    "- Other standard Linux commands are simulated by the AI model",
    "Note: some dangerous commands (rm, chmod and similar) are disabled",
];

/// The help listing joined into a single block of text.
pub fn help_text() -> String {
    HELP_LINES.join("\n")
}

/// Shell-style message for an unknown command, using the token as typed.
pub fn command_not_found(token: &str) -> String {
    format!("bash: {}: command not found", token)
}

/// A raw line as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    raw: String,
}

impl CommandLine {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The line exactly as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The line without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.raw.trim()
    }

    /// First whitespace-delimited token, as typed.
    pub fn first_token(&self) -> &str {
        self.raw.split_whitespace().next().unwrap_or("")
    }

    /// First whitespace-delimited token, case-folded.
    pub fn main_token(&self) -> String {
        self.first_token().to_lowercase()
    }

    /// Everything after the first token, with surrounding whitespace removed.
    pub fn argument_text(&self) -> &str {
        let trimmed = self.trimmed();
        match trimmed.find(char::is_whitespace) {
            Some(idx) => trimmed[idx..].trim(),
            None => "",
        }
    }

    /// Whitespace-delimited arguments after the first token.
    pub fn arguments(&self) -> Vec<&str> {
        self.raw.split_whitespace().skip(1).collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Visual effects the terminal can start locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Pointer-following cat, toggled on and off
    Pet,
    /// Steam train crossing the screen
    Train,
    /// Digital rain
    Matrix,
    /// Fish tank
    Aquarium,
    /// Fake monitoring dashboard
    Dashboard,
}

impl AnimationKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationKind::Pet => "pet",
            AnimationKind::Train => "train",
            AnimationKind::Matrix => "matrix",
            AnimationKind::Aquarium => "aquarium",
            AnimationKind::Dashboard => "dashboard",
        }
    }
}

/// Kinds of generated art the model can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtForm {
    /// A creature or object with a speech bubble
    Figure,
    /// A classical poem with attribution
    Poem,
    /// A decorated calendar of the current month
    Calendar,
}

/// A parsed request for generated art.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiArtRequest {
    /// The command token that selected the art form
    pub subtype: String,
    pub form: ArtForm,
    /// Creature or object to draw; only set for figures
    pub style: Option<String>,
    /// Caption for figures, free argument text otherwise
    pub text: String,
}

/// The single category a command line belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandCategory {
    /// Nothing but whitespace
    Empty,
    /// Contains characters from the unsupported script range
    ContainsForeignScript,
    BuiltinClear,
    BuiltinHelp,
    /// Animation with on/off semantics
    BuiltinToggleAnimation(AnimationKind),
    /// Timed or until-dismissed animation
    AnimationTrigger(AnimationKind),
    AsciiArtRequest(AsciiArtRequest),
    DangerousRejected,
    /// Unknown command; `token` is the first token as typed
    Unrecognized { token: String },
    /// Known command forwarded to the model
    PassThrough,
}

impl CommandCategory {
    /// Whether the category is answered by the remote model.
    pub fn requires_remote(&self) -> bool {
        matches!(
            self,
            CommandCategory::AsciiArtRequest(_) | CommandCategory::PassThrough
        )
    }

    pub fn is_ascii_art(&self) -> bool {
        matches!(self, CommandCategory::AsciiArtRequest(_))
    }

    /// Short name used in logs and the `classify` subcommand.
    pub fn label(&self) -> &'static str {
        match self {
            CommandCategory::Empty => "empty",
            CommandCategory::ContainsForeignScript => "foreign-script",
            CommandCategory::BuiltinClear => "builtin-clear",
            CommandCategory::BuiltinHelp => "builtin-help",
            CommandCategory::BuiltinToggleAnimation(_) => "builtin-toggle-animation",
            CommandCategory::AnimationTrigger(_) => "animation",
            CommandCategory::AsciiArtRequest(_) => "ascii-art",
            CommandCategory::DangerousRejected => "dangerous",
            CommandCategory::Unrecognized { .. } => "unrecognized",
            CommandCategory::PassThrough => "pass-through",
        }
    }
}
