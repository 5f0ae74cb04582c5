// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for the thread block.
//!
//! Two families live here and they never mix:
//!
//! * [`BlockError`] - structural misuse of a block (mutating a sealed queue, re-entering a
//!   running block, bad parallelism). Returned synchronously to the caller.
//! * [`ItemFailure`] - anything that went wrong while processing one item. Recorded in the
//!   exception store, never propagated out of the engine.

mod block;
mod config;
mod item;

pub use block::BlockError;
pub use config::ConfigError;
pub use item::ItemFailure;
