//! Background cache writes.
//!
//! Storing a response must never delay handing it to the caller, so the
//! client spawns the write and moves on. [`WriteOffload`] keeps track of
//! those tasks so they can be awaited (tests, graceful shutdown) or
//! cancelled.
//!
//! Dropping the future of a request does not cancel a write it already
//! spawned.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use smol_str::SmolStr;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug_span, trace, warn};

#[derive(Debug)]
struct WriteOffloadInner {
    tasks: DashMap<u64, JoinHandle<()>>,
    next_id: AtomicU64,
}

/// Tracker of spawned background writes. Clones share the same task set.
#[derive(Clone, Debug)]
pub struct WriteOffload {
    inner: Arc<WriteOffloadInner>,
}

impl Default for WriteOffload {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteOffload {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(WriteOffloadInner {
                tasks: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Spawns `task` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn<F>(&self, kind: impl Into<SmolStr>, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cleanup_finished();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let kind = kind.into();
        let span = debug_span!("offload", %kind, id);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(
            async move {
                task.await;
                trace!("offloaded task finished");
                inner.tasks.remove(&id);
            }
            .instrument(span),
        );
        if !handle.is_finished() {
            self.inner.tasks.insert(id, handle);
        }
    }

    /// Tasks still running.
    pub fn active_task_count(&self) -> usize {
        self.inner
            .tasks
            .iter()
            .filter(|entry| !entry.value().is_finished())
            .count()
    }

    pub fn cleanup_finished(&self) {
        self.inner.tasks.retain(|_, handle| !handle.is_finished());
    }

    /// Aborts every running task.
    pub fn cancel_all(&self) {
        for entry in self.inner.tasks.iter() {
            entry.value().abort();
        }
    }

    /// Waits until every spawned task has finished, including tasks spawned
    /// while waiting.
    ///
    /// Handles are taken out of the tracker and awaited one by one, so a task
    /// being awaited here is no longer reached by [`cancel_all`](Self::cancel_all).
    pub async fn wait_all(&self) {
        loop {
            let Some(id) = self.inner.tasks.iter().next().map(|entry| *entry.key()) else {
                break;
            };
            let Some((_, handle)) = self.inner.tasks.remove(&id) else {
                continue;
            };
            if let Err(error) = handle.await {
                if error.is_panic() {
                    warn!(id, "offloaded task panicked");
                }
            }
        }
    }

    /// [`wait_all`](Self::wait_all) bounded by `timeout`. Returns `false` on timeout.
    pub async fn wait_all_timeout(&self, timeout: std::time::Duration) -> bool {
        tokio::time::timeout(timeout, self.wait_all()).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_all_waits_for_spawned_tasks() {
        let offload = WriteOffload::new();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let done = Arc::clone(&done);
            offload.spawn("test", async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(offload.wait_all_timeout(Duration::from_secs(5)).await);
        assert_eq!(done.load(Ordering::SeqCst), 4);
        assert_eq!(offload.active_task_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_all_sleeps_until_tasks_finish() {
        let offload = WriteOffload::new();
        let done = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&done);
        offload.spawn("slow", async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            inner.fetch_add(1, Ordering::SeqCst);
        });

        // Paused time only advances while every task is idle.
        offload.wait_all().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(offload.active_task_count(), 0);
    }

    #[tokio::test]
    async fn wait_all_picks_up_tasks_spawned_meanwhile() {
        let offload = WriteOffload::new();
        let done = Arc::new(AtomicUsize::new(0));

        let nested = offload.clone();
        let outer_done = Arc::clone(&done);
        offload.spawn("outer", async move {
            let inner_done = Arc::clone(&outer_done);
            nested.spawn("inner", async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                inner_done.fetch_add(1, Ordering::SeqCst);
            });
            outer_done.fetch_add(1, Ordering::SeqCst);
        });

        assert!(offload.wait_all_timeout(Duration::from_secs(5)).await);
        assert_eq!(done.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cancel_all_aborts_pending_tasks() {
        let offload = WriteOffload::new();
        offload.spawn("test", std::future::pending());

        offload.cancel_all();
        assert!(offload.wait_all_timeout(Duration::from_secs(5)).await);
    }
}
