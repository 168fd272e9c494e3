//! Bounded worker pool.
//!
//! Jobs are queued on an unbounded channel and drained by worker tasks.
//! Workers are spawned on demand, up to `capacity`, and exit after sitting
//! idle for `idle_expiry`. A retiring worker may pick up one last job, so the
//! worker count can briefly overshoot; the number of jobs actually running is
//! capped by a semaphore with `capacity` permits. Each job runs behind a
//! panic boundary, so a panicking job is logged and the worker carries on.
//!
//! The pool must be used from within a Tokio runtime.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, Mutex, Semaphore};

use crate::error_handling::PoolError;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// State shared between the pool handle and its workers.
struct PoolShared {
    capacity: usize,
    idle_expiry: Duration,
    /// Number of live workers
    running: AtomicUsize,
    /// Caps the number of jobs executing at once
    permits: Semaphore,
    queue: Mutex<mpsc::UnboundedReceiver<Job>>,
}

/// A pool running at most `capacity` jobs at a time.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    sender: mpsc::UnboundedSender<Job>,
    closed: AtomicBool,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("capacity", &self.shared.capacity)
            .field("idle_expiry", &self.shared.idle_expiry)
            .field("running", &self.running())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl WorkerPool {
    /// Creates a pool with room for `capacity` concurrent jobs.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize, idle_expiry: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        WorkerPool {
            shared: Arc::new(PoolShared {
                capacity: capacity.max(1),
                idle_expiry,
                running: AtomicUsize::new(0),
                permits: Semaphore::new(capacity.max(1)),
                queue: Mutex::new(receiver),
            }),
            sender,
            closed: AtomicBool::new(false),
        }
    }

    /// Queues `task` for execution.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Closed` if the pool has been released.
    pub fn submit<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            return Err(PoolError::Closed);
        }

        self.sender
            .send(Box::pin(task))
            .map_err(|_| PoolError::Closed)?;
        self.spawn_worker_if_needed();
        Ok(())
    }

    /// Stops accepting new jobs.
    ///
    /// Jobs already queued or running are left to finish. Calling this more
    /// than once has no further effect.
    pub fn release(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            log::debug!(
                "Worker pool released ({} worker(s) still running)",
                self.running()
            );
        }
    }

    /// Returns `true` once [`release`](Self::release) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of live workers.
    pub fn running(&self) -> usize {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Maximum number of concurrent workers.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    fn spawn_worker_if_needed(&self) {
        let running = &self.shared.running;
        let mut current = running.load(Ordering::SeqCst);
        while current < self.shared.capacity {
            match running.compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => {
                    tokio::spawn(worker_loop(Arc::clone(&self.shared)));
                    return;
                }
                Err(actual) => current = actual,
            }
        }
    }
}

/// Pulls jobs off the queue until the worker has been idle for too long or
/// the pool is dropped.
async fn worker_loop(shared: Arc<PoolShared>) {
    loop {
        let next = tokio::time::timeout(shared.idle_expiry, async {
            shared.queue.lock().await.recv().await
        })
        .await;

        let job = match next {
            Ok(Some(job)) => job,
            Ok(None) => {
                shared.running.fetch_sub(1, Ordering::SeqCst);
                return;
            }
            Err(_) => {
                // Retire first, then drain once: a job queued while the
                // submitter still counted us must not be stranded.
                shared.running.fetch_sub(1, Ordering::SeqCst);
                match shared.queue.lock().await.try_recv() {
                    Ok(job) => {
                        shared.running.fetch_add(1, Ordering::SeqCst);
                        job
                    }
                    Err(_) => {
                        log::trace!(
                            "Pool worker idle for {:?}, exiting",
                            shared.idle_expiry
                        );
                        return;
                    }
                }
            }
        };

        run_job(&shared, job).await;
    }
}

async fn run_job(shared: &PoolShared, job: Job) {
    // The semaphore is never closed, so this only fails if that changes
    let Ok(_permit) = shared.permits.acquire().await else {
        log::error!("Worker pool semaphore closed, dropping job");
        return;
    };
    if let Err(panic) = AssertUnwindSafe(job).catch_unwind().await {
        log::error!(
            "Unrecoverable panic occurred in scan task: {}",
            panic_message(panic.as_ref())
        );
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
