//! One-shot delayed follow-ups
//!
//! A `FollowUp` runs a task once after a delay. Cancelling it, or dropping
//! it, stops the task if it has not completed yet.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A task scheduled to run once after a delay
#[derive(Debug)]
pub struct FollowUp<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> FollowUp<T> {
    /// Run `task` once, `delay` from now
    pub fn schedule<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Wait for the task, `None` if it was cancelled
    ///
    /// Dropping the returned future cancels the task as well.
    pub async fn wait(mut self) -> Option<T> {
        let handle = self.handle.as_mut()?;
        let result = handle.await;
        self.handle = None;
        match result {
            Ok(value) => Some(value),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::error!("Follow-up task failed: {}", e);
                None
            }
        }
    }
}

impl<T> FollowUp<T> {
    /// Stop the task if it has not run yet
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True once the task has completed or been cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

impl<T> Drop for FollowUp<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
