// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;          // block config loading
pub mod engine;          // thread block engine
pub mod errors;          // error handling
pub mod observability;   // structured log messages
pub mod traits;          // transformation + hook abstractions
pub mod transformations; // closure adapters
