use std::future::Future;

use tokio::task::JoinHandle;

/// A single-purpose timer slot. At most one task is pending per slot;
/// arming aborts whatever was pending before.
///
/// Each arm gets a generation number. A task that fires hands its generation
/// back to [`TaskSlot::settle`], which refuses stale generations, so a timer
/// that was re-armed or cancelled after it woke up does nothing.
#[derive(Default)]
pub struct TaskSlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm<F, Fut>(&mut self, task: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        self.handle = Some(tokio::spawn(task(generation)));
        generation
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Claims the slot for a task that has fired. Returns false when the
    /// generation is stale. The handle is released without aborting, since
    /// the caller is usually that task.
    pub fn settle(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.handle = None;
        true
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_the_previous_task() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut slot = TaskSlot::new();

        for _ in 0..3 {
            let fired = fired.clone();
            slot.arm(|_| async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                fired.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::advance(Duration::from_millis(50)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut slot = TaskSlot::new();
        let counter = fired.clone();
        slot.arm(|_| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            counter.fetch_add(1, Ordering::SeqCst);
        });
        slot.cancel();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn settle_rejects_stale_generations() {
        let mut slot = TaskSlot::new();
        let first = slot.arm(|_| async {});
        let second = slot.arm(|_| async {});
        assert_ne!(first, second);

        assert!(!slot.settle(first));
        assert!(slot.settle(second));
        assert!(!slot.settle(second));

        let third = slot.arm(|_| async {});
        slot.cancel();
        assert!(!slot.settle(third));
    }
}
