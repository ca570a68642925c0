// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::fmt;

/// One rendered line of the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A submitted command, rendered as `$ <raw>`
    EchoedCommand(String),
    Output(String),
}

impl TranscriptEntry {
    pub fn echo(raw: impl Into<String>) -> Self {
        TranscriptEntry::EchoedCommand(raw.into())
    }

    pub fn output(text: impl Into<String>) -> Self {
        TranscriptEntry::Output(text.into())
    }

    pub fn is_echo(&self) -> bool {
        matches!(self, TranscriptEntry::EchoedCommand(_))
    }

    /// The text without the prompt marker.
    pub fn text(&self) -> &str {
        match self {
            TranscriptEntry::EchoedCommand(text) | TranscriptEntry::Output(text) => text,
        }
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEntry::EchoedCommand(raw) => write!(f, "$ {}", raw),
            TranscriptEntry::Output(text) => f.write_str(text),
        }
    }
}

/// Append-only log of terminal lines. Only `clear` removes entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = TranscriptEntry>) {
        self.entries.extend(entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rendered lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(ToString::to_string)
    }
}
