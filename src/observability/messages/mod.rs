// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message implements `Display` for the human-readable line and [`StructuredLog`]
//! to emit the same event with typed fields at the right level.

use tracing::Span;

pub mod engine;
pub mod item;

/// A message that knows its own level and fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
