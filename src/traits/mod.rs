// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod hooks;
pub mod transformation;

pub use hooks::{
    BatchContinuationHook, ItemContinuationHook, QueueEmptiedHook, WarmupHook,
};
pub use transformation::{BlockItem, BlockOutput, Transformation};
