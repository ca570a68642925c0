// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Terminal session
//!
//! A [`Session`] owns the transcript and animation state of one simulated
//! terminal and feeds submitted lines through the [`Dispatcher`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{MockshellError, Result};

pub mod animation;
pub mod backend;
pub mod dispatch;
pub mod transcript;

pub use animation::{AnimationState, PetMotion, Point};
pub use backend::{CommandBackend, LocalBackend, RemoteBackend, LOCAL_IDENTITY};
pub use dispatch::{DispatchOutcome, Dispatcher, SideEffect};
pub use transcript::{Transcript, TranscriptEntry};

/// Shared view of whether a session is waiting on a command.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag, failing if it already was.
    fn acquire(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ProcessingGuard(self.clone()))
    }
}

/// Clears the flag when the submission finishes, however it finishes.
struct ProcessingGuard(ProcessingFlag);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::SeqCst);
    }
}

/// One simulated terminal.
pub struct Session {
    dispatcher: Dispatcher,
    transcript: Transcript,
    animations: AnimationState,
    processing: ProcessingFlag,
}

impl Session {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            transcript: Transcript::new(),
            animations: AnimationState::default(),
            processing: ProcessingFlag::default(),
        }
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.animations = AnimationState::new(width, height);
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn animations(&self) -> &AnimationState {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut AnimationState {
        &mut self.animations
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// A handle a renderer can poll while a submission is in flight.
    pub fn processing_flag(&self) -> ProcessingFlag {
        self.processing.clone()
    }

    /// Submit one line and apply its outcome to the transcript.
    ///
    /// Fails only when another submission is still being processed.
    pub async fn submit(&mut self, raw: &str) -> Result<DispatchOutcome> {
        let _guard = self.processing.acquire().ok_or_else(|| {
            MockshellError::Session("a command is already being processed".to_string())
        })?;

        let outcome = self.dispatcher.dispatch(raw, &mut self.animations).await;

        if outcome.clears_transcript() {
            self.transcript.clear();
        }
        self.transcript.extend(outcome.appended.iter().cloned());

        Ok(outcome)
    }
}
