//! fetch — bounded-concurrency pool for page fetch tasks.
//!
//! One queue, N workers: the worker count IS the global in-flight cap, and
//! it is shared by every caller (not per run). Queued jobs start in
//! submission order as slots free up. cancel() stops admitting queued jobs;
//! jobs already running finish (a fetch is an atomic unit, not abortable
//! mid-flight).

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolShared {
    queue: Mutex<VecDeque<Job>>,
    available: Condvar,
    cancelled: AtomicBool,
    shutdown: AtomicBool,
}

pub struct FetchPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl FetchPool {
    /// `limit`: maximum number of concurrently running jobs (clamped to >= 1).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        let shared = Arc::new(PoolShared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            cancelled: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        });
        let mut workers = Vec::with_capacity(limit);
        for _ in 0..limit {
            let sh = Arc::clone(&shared);
            workers.push(thread::spawn(move || worker_loop(sh)));
        }
        Self { shared, workers }
    }

    /// Submit a job; the handle blocks on `wait()` until the job finishes.
    pub fn submit<T, F>(&self, f: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        if self.shared.cancelled.load(Ordering::SeqCst) {
            let _ = tx.send(Err(anyhow!("fetch pool cancelled")));
            return TaskHandle { rx };
        }
        let job: Job = Box::new(move || {
            let _ = tx.send(f());
        });
        {
            let mut q = self.shared.queue.lock().unwrap();
            q.push_back(job);
        }
        self.shared.available.notify_one();
        TaskHandle { rx }
    }

    /// Stop admitting queued jobs; their handles resolve to an error.
    /// Jobs already running complete normally.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        self.shared.available.notify_all();
    }
}

impl Drop for FetchPool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.available.notify_all();
        for w in self.workers.drain(..) {
            let _ = w.join();
        }
    }
}

pub struct TaskHandle<T> {
    rx: mpsc::Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the job finishes. A job dropped without running (cancel,
    /// pool teardown) yields an error rather than a hang.
    pub fn wait(self) -> Result<T> {
        match self.rx.recv() {
            Ok(r) => r,
            Err(_) => Err(anyhow!("fetch task dropped before completion")),
        }
    }
}

fn worker_loop(shared: Arc<PoolShared>) {
    loop {
        let job = {
            let mut q = shared.queue.lock().unwrap();
            loop {
                if shared.shutdown.load(Ordering::SeqCst) {
                    return;
                }
                if shared.cancelled.load(Ordering::SeqCst) {
                    // Drop whatever is still queued; waiting handles see the
                    // sender disconnect.
                    q.clear();
                }
                if let Some(j) = q.pop_front() {
                    break j;
                }
                q = shared.available.wait(q).unwrap();
            }
        };
        job();
    }
}
