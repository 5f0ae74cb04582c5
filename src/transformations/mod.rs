// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ready-made [`Transformation`](crate::traits::Transformation) adapters.
//!
//! - [`from_fn`] wraps an async closure; the engine can abort it at an await point.
//! - [`from_blocking_fn`] runs a synchronous closure on tokio's blocking pool; it cannot be
//!   aborted once started.

pub mod blocking;
pub mod function;
#[cfg(test)]
pub(crate) mod stub;

pub use blocking::{from_blocking_fn, BlockingTransformation};
pub use function::{from_fn, FnTransformation};
