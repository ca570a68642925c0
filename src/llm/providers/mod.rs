// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM provider implementations

pub(crate) mod common;
pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
