// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default number of transformations allowed in flight at once
pub const DEFAULT_MAX_DEGREE_OF_PARALLELISM: usize = 1;
/// Default interval between queue-emptied notifications in continuous mode (1 second)
pub const DEFAULT_EMPTY_QUEUE_POLL_MS: u64 = 1_000;
/// Default capacity of the block event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;
