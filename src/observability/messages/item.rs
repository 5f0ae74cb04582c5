// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-item outcomes and hook failures.

use crate::engine::DispatchId;
use crate::errors::ItemFailure;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An item landed in the exception store.
///
/// # Log Level
/// `warn!` - The batch carries on; the failure is recorded, not raised
///
/// # Example
/// ```
/// use threadblock::engine::DispatchId;
/// use threadblock::errors::ItemFailure;
/// use threadblock::observability::messages::item::ItemFailed;
/// use std::time::Duration;
///
/// let failure = ItemFailure::TimedOut { elapsed: Duration::from_secs(5) };
/// let msg = ItemFailed {
///     dispatch_id: DispatchId(7),
///     transformation: "resize_image",
///     failure: &failure,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ItemFailed<'a> {
    pub dispatch_id: DispatchId,
    pub transformation: &'a str,
    pub failure: &'a ItemFailure,
}

impl Display for ItemFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Item {} failed in {}: {}",
            self.dispatch_id, self.transformation, self.failure
        )
    }
}

impl StructuredLog for ItemFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            dispatch_id = self.dispatch_id.0,
            transformation = self.transformation,
            kind = self.failure.kind(),
            error = %self.failure,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "item_failed",
            span_name = name,
            dispatch_id = self.dispatch_id.0,
            transformation = self.transformation,
            kind = self.failure.kind(),
        )
    }
}

/// A batch-level hook (batch continuation, queue emptied) failed or panicked.
///
/// # Log Level
/// `warn!` - Batch hooks have no item to charge the failure to
pub struct HookFailed<'a> {
    pub hook: &'a str,
    pub error: &'a str,
}

impl Display for HookFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} hook failed: {}", self.hook, self.error)
    }
}

impl StructuredLog for HookFailed<'_> {
    fn log(&self) {
        tracing::warn!(hook = self.hook, error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("hook_failed", span_name = name, hook = self.hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_item_failed_names_the_transformation() {
        let failure = ItemFailure::TimedOut {
            elapsed: Duration::from_millis(20),
        };
        let msg = ItemFailed {
            dispatch_id: DispatchId(3),
            transformation: "parse_or_zero",
            failure: &failure,
        };
        assert_eq!(
            msg.to_string(),
            "Item #3 failed in parse_or_zero: transformation timed out after 20ms"
        );
    }

    #[test]
    fn test_hook_failed_renders() {
        let msg = HookFailed {
            hook: "queue_emptied",
            error: "refill source closed",
        };
        assert_eq!(msg.to_string(), "queue_emptied hook failed: refill source closed");
    }
}
