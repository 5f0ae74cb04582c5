// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a single item ended up in the exception store.
///
/// Caller errors are kept behind an `Arc` so that snapshots can hand out copies
/// without re-running anything.
#[derive(Debug, Clone, Error)]
pub enum ItemFailure {
    #[error("warmup failed: {0}")]
    Warmup(Arc<anyhow::Error>),

    #[error("transformation failed: {0}")]
    Transformation(Arc<anyhow::Error>),

    #[error("item continuation failed: {0}")]
    Continuation(Arc<anyhow::Error>),

    /// The transformation or one of the hooks panicked.
    #[error("panicked: {message}")]
    Panicked { message: String },

    /// The transformation did not finish in time and was aborted at its next await point.
    #[error("transformation timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },

    /// The transformation did not finish in time, but runs on a thread that cannot be
    /// aborted. It was detached and left to finish on its own.
    #[error("transformation timed out after {elapsed:?} and cannot be aborted; detached")]
    AbortUnsupported { elapsed: Duration },
}

impl ItemFailure {
    pub(crate) fn warmup(error: anyhow::Error) -> Self {
        ItemFailure::Warmup(Arc::new(error))
    }

    pub(crate) fn transformation(error: anyhow::Error) -> Self {
        ItemFailure::Transformation(Arc::new(error))
    }

    pub(crate) fn continuation(error: anyhow::Error) -> Self {
        ItemFailure::Continuation(Arc::new(error))
    }

    pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> Self {
        ItemFailure::Panicked {
            message: panic_message(payload.as_ref()),
        }
    }

    /// Short label used in logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            ItemFailure::Warmup(_) => "warmup",
            ItemFailure::Transformation(_) => "transformation",
            ItemFailure::Continuation(_) => "continuation",
            ItemFailure::Panicked { .. } => "panicked",
            ItemFailure::TimedOut { .. } => "timed_out",
            ItemFailure::AbortUnsupported { .. } => "abort_unsupported",
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transformation_failure_displays_cause() {
        let failure = ItemFailure::transformation(anyhow::anyhow!("Data was multiple of 5"));
        assert_eq!(
            failure.to_string(),
            "transformation failed: Data was multiple of 5"
        );
        assert_eq!(failure.kind(), "transformation");
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = ItemFailure::panicked(Box::new("boom"));
        let from_string = ItemFailure::panicked(Box::new(String::from("bang")));
        let opaque = ItemFailure::panicked(Box::new(42_u32));

        assert_eq!(from_str.to_string(), "panicked: boom");
        assert_eq!(from_string.to_string(), "panicked: bang");
        assert_eq!(opaque.to_string(), "panicked: non-string panic payload");
    }

    #[test]
    fn test_clone_shares_cause() {
        let failure = ItemFailure::warmup(anyhow::anyhow!("cold"));
        let copy = failure.clone();
        match (&failure, &copy) {
            (ItemFailure::Warmup(a), ItemFailure::Warmup(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected warmup failures"),
        }
    }
}
