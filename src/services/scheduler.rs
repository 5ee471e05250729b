use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A callback that runs once after a delay unless cancelled first.
///
/// Dropping the handle cancels the callback, so a closed session cannot leak
/// a pending reset.
#[derive(Debug)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
}

impl DelayedTask {
    pub fn schedule<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Release the handle without cancelling. A task that is currently
    /// running its callback uses this to discard its own handle.
    pub fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runs_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _task = DelayedTask::schedule(Duration::from_millis(10), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_detached_task_still_runs() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        DelayedTask::schedule(Duration::from_millis(10), async move {
            flag.store(true, Ordering::SeqCst);
        })
        .detach();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_and_drop_prevent_callback() {
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let task = DelayedTask::schedule(Duration::from_millis(20), async move {
            flag.store(true, Ordering::SeqCst);
        });
        task.cancel();

        let flag = fired.clone();
        drop(DelayedTask::schedule(Duration::from_millis(20), async move {
            flag.store(true, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
