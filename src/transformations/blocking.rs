// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::traits::Transformation;

/// Transformation backed by a synchronous closure run on the blocking thread pool.
///
/// Once started the closure runs to completion: a timed-out item is detached and recorded
/// as `AbortUnsupported`. Long-running closures can poll the token to give up early.
pub struct BlockingTransformation<F> {
    name: String,
    func: Arc<F>,
}

pub fn from_blocking_fn<T, R, F>(func: F) -> BlockingTransformation<F>
where
    F: Fn(T, CancellationToken) -> anyhow::Result<R> + Send + Sync + 'static,
{
    BlockingTransformation {
        name: "blocking".to_string(),
        func: Arc::new(func),
    }
}

impl<F> BlockingTransformation<F> {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<T, R, F> Transformation<T, R> for BlockingTransformation<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationToken) -> anyhow::Result<R> + Send + Sync + 'static,
{
    async fn transform(&self, item: T, cancel: CancellationToken) -> anyhow::Result<R> {
        let func = Arc::clone(&self.func);
        match tokio::task::spawn_blocking(move || func(item, cancel)).await {
            Ok(result) => result,
            // Re-raise so the engine records it as a panic rather than an error.
            Err(join_error) if join_error.is_panic() => {
                std::panic::resume_unwind(join_error.into_panic())
            }
            Err(join_error) => Err(anyhow::Error::new(join_error)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_abort(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_runs_closure_on_blocking_pool() {
        let transformation = from_blocking_fn(|text: String, _cancel| {
            text.parse::<i32>().map_err(anyhow::Error::from)
        });

        let output = transformation
            .transform("17".to_string(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, 17);

        let error = transformation
            .transform("four".to_string(), CancellationToken::new())
            .await;
        assert!(error.is_err());
    }

    #[test]
    fn test_reports_no_abort_support() {
        let transformation = from_blocking_fn(|item: u8, _cancel| Ok(item)).named("sync");
        assert!(!Transformation::<u8, u8>::supports_abort(&transformation));
        assert_eq!(Transformation::<u8, u8>::name(&transformation), "sync");
    }
}
