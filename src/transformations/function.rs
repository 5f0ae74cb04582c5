// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::traits::Transformation;

/// Transformation backed by an async closure.
pub struct FnTransformation<F> {
    name: String,
    func: F,
}

/// Wrap an async closure as a transformation.
///
/// ```rust
/// use threadblock::engine::ThreadBlock;
/// use threadblock::transformations::from_fn;
///
/// let block: ThreadBlock<String, usize> =
///     ThreadBlock::new(from_fn(|word: String, _cancel| async move { anyhow::Ok(word.len()) }));
/// ```
pub fn from_fn<T, R, F, Fut>(func: F) -> FnTransformation<F>
where
    F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    FnTransformation {
        name: "fn".to_string(),
        func,
    }
}

impl<F> FnTransformation<F> {
    /// Name used in logs and spans.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<T, R, F, Fut> Transformation<T, R> for FnTransformation<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    async fn transform(&self, item: T, cancel: CancellationToken) -> anyhow::Result<R> {
        (self.func)(item, cancel).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
