//! 后台清扫模块：一个定时任务驱动全部注册的清扫回调。
//!
//! # Background Sweeper Module
//!
//! One shared scheduler instead of one timer per subsystem: subsystems
//! register a sweep callback (cache expiry, stale rate windows, pool
//! flush), and a single tokio interval task drives them all. Teardown is
//! uniform: [`Sweeper::shutdown`] stops all background work with one call.
//!
//! [`Sweeper::run_once`] runs the registered callbacks synchronously, which
//! keeps tests deterministic without waiting on the interval.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

type SweepFn = Box<dyn Fn() -> usize + Send + Sync>;

struct SweepTask {
    name: String,
    run: SweepFn,
}

pub struct Sweeper {
    tasks: Arc<RwLock<Vec<SweepTask>>>,
    shutdown: Arc<Notify>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Sweeper {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(Vec::new())),
            shutdown: Arc::new(Notify::new()),
            worker: Mutex::new(None),
        }
    }

    /// Register a sweep callback. The callback returns how many entries it
    /// removed and must not block or await.
    pub fn register(
        &self,
        name: impl Into<String>,
        run: impl Fn() -> usize + Send + Sync + 'static,
    ) {
        self.tasks.write().unwrap().push(SweepTask {
            name: name.into(),
            run: Box::new(run),
        });
    }

    /// Run every registered callback once. Returns the total removed.
    pub fn run_once(&self) -> usize {
        run_tasks(&self.tasks)
    }

    /// Spawn the background interval task. A second call while one is
    /// running is a no-op.
    pub fn spawn(&self, interval: Duration) {
        let mut worker = self.worker.lock().unwrap();
        if worker.is_some() {
            return;
        }
        let tasks = Arc::clone(&self.tasks);
        let shutdown = Arc::clone(&self.shutdown);
        tracing::info!(interval_ms = interval.as_millis() as u64, "sweeper started");
        *worker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_tasks(&tasks);
                    }
                    _ = shutdown.notified() => break,
                }
            }
            tracing::info!("sweeper stopped");
        }));
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().unwrap().is_some()
    }

    /// Stop the background task and wait for it to exit. Safe to call when
    /// nothing is running.
    pub async fn shutdown(&self) {
        let handle = self.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            self.shutdown.notify_one();
            let _ = handle.await;
        }
    }
}

impl Default for Sweeper {
    fn default() -> Self {
        Self::new()
    }
}

fn run_tasks(tasks: &RwLock<Vec<SweepTask>>) -> usize {
    let tasks = tasks.read().unwrap();
    let mut total = 0;
    for task in tasks.iter() {
        let removed = (task.run)();
        if removed > 0 {
            tracing::debug!(task = %task.name, removed, "sweep removed entries");
        }
        total += removed;
    }
    total
}
