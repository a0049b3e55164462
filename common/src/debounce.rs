//! Trailing-edge debounce on the tokio timer.
//!
//! Each [`Debouncer::call`] replaces the pending call; the wrapped function
//! runs once, `wait` after the last call, with the last call's arguments.
//! No leading-edge call, no max wait.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Slot {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

pub struct Debouncer<A, F> {
    func: Arc<F>,
    wait: Duration,
    slot: Arc<Mutex<Slot>>,
    _args: PhantomData<fn(A)>,
}

pub fn debounce<A, F, Fut>(func: F, wait: Duration) -> Debouncer<A, F>
where
    A: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Debouncer::new(func, wait)
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    // A panic inside the wrapped function never holds this lock
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A, F, Fut> Debouncer<A, F>
where
    A: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub fn new(func: F, wait: Duration) -> Self {
        Self {
            func: Arc::new(func),
            wait,
            slot: Arc::new(Mutex::new(Slot::default())),
            _args: PhantomData,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Schedule `func(args)` after the quiet period, cancelling any pending call.
    /// Must be called from within a tokio runtime.
    pub fn call(&self, args: A) {
        let mut slot = lock(&self.slot);
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        let func = Arc::clone(&self.func);
        let shared = Arc::clone(&self.slot);
        let wait = self.wait;
        slot.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            {
                let mut slot = lock(&shared);
                if slot.generation != generation {
                    return;
                }
                // Detach: from here on a newer call must not abort this invocation
                slot.pending = None;
            }
            (*func)(args).await;
        }));
    }

    /// Drop the pending call, if any. An invocation already running is not affected.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).pending.is_some()
    }
}

impl<A, F> Drop for Debouncer<A, F> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            if let Some(pending) = slot.pending.take() {
                pending.abort();
            }
        }
    }
}
