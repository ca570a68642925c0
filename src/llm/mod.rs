// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM module for mockshell
//!
//! Provides the abstraction over the remote model that produces simulated
//! command output.

pub mod mock_provider;
pub mod provider;
pub mod providers;

pub use provider::*;
