// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! JSON shapes exchanged with terminal clients.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,

    /// Client-side hint that the command renders as art. Display only; the
    /// server always classifies the raw text itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascii_art: Option<bool>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ascii_art: None,
        }
    }

    pub fn with_ascii_art(mut self, ascii_art: bool) -> Self {
        self.ascii_art = Some(ascii_art);
        self
    }
}

/// Successful reply, shaped like a chat completion so clients always read
/// `choices[0].message.content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub choices: Vec<ReplyChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyChoice {
    pub message: ReplyMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub content: String,
}

impl CommandReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ReplyChoice {
                message: ReplyMessage {
                    content: content.into(),
                },
            }],
        }
    }

    /// Content of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Error body for every non-2xx reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<usize>,

    /// Seconds until another request will be admitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}
