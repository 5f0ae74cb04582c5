// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::errors::BlockError;

/// Handle to a run started with `ThreadBlock::execute_continuous`.
///
/// Dropping the handle does not stop the run; call [`ContinuousHandle::stop`] or
/// `ThreadBlock::stop` for that.
pub struct ContinuousHandle {
    token: CancellationToken,
    task: JoinHandle<Result<(), BlockError>>,
}

impl ContinuousHandle {
    pub(crate) fn new(token: CancellationToken, task: JoinHandle<Result<(), BlockError>>) -> Self {
        Self { token, task }
    }

    /// Same as `ThreadBlock::stop` for this run.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to finish its last cycle.
    pub async fn join(self) -> Result<(), BlockError> {
        self.task.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stop_cancels_token_and_join_returns_task_result() {
        let token = CancellationToken::new();
        let watched = token.clone();
        let task = tokio::spawn(async move {
            watched.cancelled().await;
            Ok(())
        });

        let handle = ContinuousHandle::new(token, task);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());

        handle.stop();
        handle.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_join_surfaces_task_panic() {
        let task: JoinHandle<Result<(), BlockError>> =
            tokio::spawn(async { panic!("continuous loop blew up") });
        let handle = ContinuousHandle::new(CancellationToken::new(), task);
        assert!(matches!(handle.join().await, Err(BlockError::Join(_))));
    }
}
