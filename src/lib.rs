// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! mockshell - a simulated Linux terminal answered by a language model.
//!
//! Typed commands are classified locally into built-ins, animations,
//! refusals and requests for the model. The same classification runs again
//! behind the HTTP endpoint, which adds per-client rate limiting and prompt
//! templating before calling an OpenAI-compatible completion API.
//!
//! Architecture highlights:
//! - `command`: shared command sets and the classifier
//! - `prompt`: system/user prompts for pass-through and art commands
//! - `rate_limit`: per-client sliding window governor
//! - `llm`: model provider abstraction and the OpenAI-compatible client
//! - `server`: the command service and its axum front end
//! - `session`: transcript, animation state and the client dispatch pipeline

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod rate_limit;
pub mod server;
pub mod session;

pub use error::{MockshellError, Result};
