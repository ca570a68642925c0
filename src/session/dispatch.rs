// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Client-side dispatch pipeline
//!
//! Classifies a submitted line, applies local actions, and sends everything
//! else to a [`CommandBackend`]. The server re-classifies whatever it
//! receives, so nothing here is trusted for safety.

use std::sync::Arc;

use crate::command::{
    command_not_found, help_text, AnimationKind, Classifier, CommandCategory, CommandLine,
    FOREIGN_SCRIPT_MESSAGE, NOT_PERMITTED_MESSAGE,
};
use crate::error::MockshellError;
use crate::server::CommandRequest;

use super::animation::AnimationState;
use super::backend::CommandBackend;
use super::transcript::TranscriptEntry;

/// Visible changes a dispatch made besides appending lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Empty the whole transcript
    ClearTranscript,
    /// Pet shown or hidden
    TogglePet { visible: bool },
    StartAnimation(AnimationKind),
    /// Overlay animations were hidden
    DismissOverlays,
}

/// What one dispatch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub category: Option<CommandCategory>,
    pub appended: Vec<TranscriptEntry>,
    pub effects: Vec<SideEffect>,
}

impl DispatchOutcome {
    pub fn clears_transcript(&self) -> bool {
        self.effects.contains(&SideEffect::ClearTranscript)
    }
}

/// Routes each line to a local action or the backend.
pub struct Dispatcher {
    classifier: Classifier,
    backend: Arc<dyn CommandBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn CommandBackend>) -> Self {
        Self {
            classifier: Classifier::default(),
            backend,
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn backend(&self) -> &dyn CommandBackend {
        self.backend.as_ref()
    }

    /// Dispatch one submitted line, updating `animations` in place.
    pub async fn dispatch(&self, raw: &str, animations: &mut AnimationState) -> DispatchOutcome {
        let line = CommandLine::new(raw);
        let category = self.classifier.classify_line(&line);

        let mut outcome = DispatchOutcome::default();
        if category == CommandCategory::Empty {
            return outcome;
        }

        tracing::debug!(
            target: "mockshell.session",
            category = category.label(),
            "dispatching command"
        );

        // Only animation triggers leave the overlays up.
        if !matches!(category, CommandCategory::AnimationTrigger(_)) && animations.dismiss_overlays()
        {
            outcome.effects.push(SideEffect::DismissOverlays);
        }

        if category == CommandCategory::BuiltinClear {
            outcome.effects.push(SideEffect::ClearTranscript);
            outcome.category = Some(category);
            return outcome;
        }

        outcome.appended.push(TranscriptEntry::echo(line.raw()));

        match &category {
            CommandCategory::Empty | CommandCategory::BuiltinClear => {}
            CommandCategory::ContainsForeignScript => {
                outcome.appended.push(TranscriptEntry::output(FOREIGN_SCRIPT_MESSAGE));
            }
            CommandCategory::Unrecognized { token } => {
                outcome.appended.push(TranscriptEntry::output(command_not_found(token)));
            }
            CommandCategory::DangerousRejected => {
                outcome.appended.push(TranscriptEntry::output(NOT_PERMITTED_MESSAGE));
            }
            CommandCategory::BuiltinHelp => {
                outcome.appended.push(TranscriptEntry::output(help_text()));
            }
            CommandCategory::BuiltinToggleAnimation(_) => {
                let visible = animations.toggle_pet();
                outcome.effects.push(SideEffect::TogglePet { visible });
            }
            CommandCategory::AnimationTrigger(kind) => {
                animations.trigger(*kind);
                outcome.effects.push(SideEffect::StartAnimation(*kind));
            }
            CommandCategory::AsciiArtRequest(_) | CommandCategory::PassThrough => {
                let keep_blank = category.is_ascii_art();
                let request = CommandRequest::new(line.raw()).with_ascii_art(keep_blank);
                match self.backend.execute(request).await {
                    Ok(text) => {
                        outcome.appended.extend(
                            text.split('\n')
                                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                                .filter(|l| keep_blank || !l.trim().is_empty())
                                .map(TranscriptEntry::output),
                        );
                    }
                    Err(err) => {
                        tracing::warn!(
                            target: "mockshell.session",
                            backend = self.backend.name(),
                            error = %err,
                            "command failed"
                        );
                        outcome
                            .appended
                            .push(TranscriptEntry::output(format!("Error: {}", describe(&err))));
                    }
                }
            }
        }

        outcome.category = Some(category);
        outcome
    }
}

/// User-facing description of a failure, without the category prefix.
fn describe(err: &MockshellError) -> String {
    match err {
        MockshellError::Api(api) => api.to_string(),
        other => other.to_string(),
    }
}
