// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in the thread block. Message types follow a struct-based pattern with
//! `Display` so that log wording lives in one place instead of being scattered across the
//! engine as magic strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - run lifecycle, state transitions, continuous-mode cycles
//! * `messages::item` - per-item failures and hook failures
//!
//! # Usage
//!
//! ```rust
//! use threadblock::observability::messages::StructuredLog;
//! use threadblock::observability::messages::engine::RunStarted;
//!
//! let msg = RunStarted {
//!     mode: "batch",
//!     queued: 20,
//!     max_degree_of_parallelism: 5,
//! };
//!
//! msg.log();
//! ```
//!
//! The library never installs a subscriber; binaries decide where logs go.

pub mod messages;
