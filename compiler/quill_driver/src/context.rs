//! Shared driver state and the diagnostic engine.
//!
//! A [`Context`] is the state every thread touching the driver shares: the
//! configuration, the source registry, the task queue, the worker list, and
//! the diagnostic counters and flags. The owning [`Driver`](crate::Driver)
//! and every worker thread hold it through an `Arc`; methods that may need
//! to hand the context to a new thread take `self: &Arc<Context>`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::{Mutex, RwLock};

use quill_diagnostic::{Diagnostic, DiagnosticCode, Level};
use quill_ir::{SourceId, SourceLocation};

use crate::config::{DriverConfig, Verbosity};
use crate::source::{Source, SourceManager};
use crate::task::TaskQueue;
use crate::worker::Worker;

/// Sink for every diagnostic the driver produces.
///
/// Invoked under the driver's callback lock, so the callback itself need not
/// be reentrant-safe. It must not emit diagnostics of its own, which would
/// deadlock on that lock. It may read any `Context` state that is stable
/// during a stage (source contents referenced by a diagnostic's location in
/// particular) without further locking.
pub type DiagnosticCallback = Arc<dyn Fn(&Context, &Diagnostic) + Send + Sync>;

/// Shared state of one driver instance.
pub struct Context {
    config: DriverConfig,
    callback: DiagnosticCallback,
    /// Serializes diagnostic delivery. Leaf lock: nothing else is acquired
    /// while it is held.
    callback_mutex: Mutex<()>,
    pub(crate) sources: RwLock<SourceManager>,
    pub(crate) tasks: Mutex<TaskQueue>,
    pub(crate) workers: Mutex<Vec<Arc<Worker>>>,
    num_errors: AtomicUsize,
    pub(crate) num_threads_running: AtomicUsize,
    pub(crate) task_group_running: AtomicBool,
    hit_fail_condition: AtomicBool,
    pub(crate) shutting_down_threads: AtomicBool,
}

impl Context {
    pub(crate) fn new(config: DriverConfig, callback: DiagnosticCallback) -> Self {
        debug_assert!(config.max_num_errors > 0, "max_num_errors cannot be 0");

        Context {
            config,
            callback,
            callback_mutex: Mutex::new(()),
            sources: RwLock::new(SourceManager::new()),
            tasks: Mutex::new(TaskQueue::default()),
            workers: Mutex::new(Vec::new()),
            num_errors: AtomicUsize::new(0),
            num_threads_running: AtomicUsize::new(0),
            task_group_running: AtomicBool::new(false),
            hit_fail_condition: AtomicBool::new(false),
            shutting_down_threads: AtomicBool::new(false),
        }
    }

    /// The configuration the driver was built with.
    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Whether stages drain inline on the caller thread.
    #[inline]
    pub fn is_single_threaded(&self) -> bool {
        self.config.num_threads == 0
    }

    /// Whether stages drain on the worker pool.
    #[inline]
    pub fn is_multi_threaded(&self) -> bool {
        self.config.num_threads != 0
    }

    // Source access

    /// Run `f` against the source registry under the read lock.
    ///
    /// Mid-stage readers must go through this (or [`source`](Context::source));
    /// after a task group has drained, the registry is quiescent and clones
    /// handed out earlier stay valid without locking.
    pub fn with_sources<R>(&self, f: impl FnOnce(&SourceManager) -> R) -> R {
        f(&self.sources.read())
    }

    /// Clone out the source for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this driver.
    pub fn source(&self, id: SourceId) -> Arc<Source> {
        Arc::clone(self.sources.read().get(id))
    }

    /// Clone out the source for `id`, if it exists.
    pub fn try_source(&self, id: SourceId) -> Option<Arc<Source>> {
        self.sources.read().try_get(id).map(Arc::clone)
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.read().len()
    }

    // Counters and flags

    /// Errors counted so far. Saturates at the configured ceiling.
    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors.load(Ordering::SeqCst)
    }

    /// Whether the error budget has been exhausted.
    #[inline]
    pub fn has_hit_fail_condition(&self) -> bool {
        self.hit_fail_condition.load(Ordering::SeqCst)
    }

    /// Whether a stage's task group is still active.
    #[inline]
    pub fn is_task_group_running(&self) -> bool {
        self.task_group_running.load(Ordering::SeqCst)
    }

    /// Whether the worker pool is up and not currently being torn down.
    pub fn workers_running(&self) -> bool {
        debug_assert!(self.is_multi_threaded(), "driver is not multi-threaded");

        if self.workers.lock().is_empty() {
            return false;
        }
        !self.shutting_down_threads.load(Ordering::SeqCst)
    }

    // Diagnostic engine

    /// Emit a diagnostic.
    ///
    /// Delivery is serialized under the callback lock. `Fatal` and `Error`
    /// levels count toward the error budget; the increment that first
    /// reaches the ceiling latches the fail condition.
    pub fn emit(self: &Arc<Self>, diagnostic: Diagnostic) {
        let counts = diagnostic.is_error();
        self.deliver(&diagnostic);

        if counts {
            let ceiling = self.config.max_num_errors;
            let reached = self
                .num_errors
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                    if n >= ceiling {
                        None // saturate; the budget is already exhausted
                    } else {
                        Some(n + 1)
                    }
                })
                .map(|previous| previous + 1 >= ceiling)
                .unwrap_or(false);

            if reached {
                self.raise_fail_condition();
            }
        }
    }

    /// Convenience wrapper building a diagnostic from parts.
    pub fn emit_internal(
        self: &Arc<Self>,
        level: Level,
        code: DiagnosticCode,
        location: Option<SourceLocation>,
        message: impl Into<String>,
    ) {
        let mut diagnostic = Diagnostic::new(level, code).with_message(message);
        diagnostic.location = location;
        self.emit(diagnostic);
    }

    /// Deliver a driver debug message if the configured verbosity allows.
    pub(crate) fn emit_debug(self: &Arc<Self>, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{message}");
        if self.config.verbosity >= Verbosity::Verbose {
            self.emit_internal(Level::Info, DiagnosticCode::MiscDebug, None, message);
        }
    }

    /// Deliver a per-task trace message if the configured verbosity allows.
    pub(crate) fn emit_trace(self: &Arc<Self>, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!("{message}");
        if self.config.verbosity >= Verbosity::Trace {
            self.emit_internal(Level::Info, DiagnosticCode::MiscTrace, None, message);
        }
    }

    fn deliver(&self, diagnostic: &Diagnostic) {
        let _guard = self.callback_mutex.lock();
        (self.callback)(self, diagnostic);
    }

    /// Called by a worker whose task returned failure.
    pub(crate) fn notify_task_errored(self: &Arc<Self>) {
        if self.num_errors.load(Ordering::SeqCst) >= self.config.max_num_errors {
            self.raise_fail_condition();
        }
    }

    /// Latch the fail condition. The first transition delivers the
    /// budget-exhausted notice and, in multi-threaded mode, hands pool
    /// teardown to a detached helper thread.
    ///
    /// The helper thread is load-bearing: this path is reached from inside a
    /// worker, and a worker cannot tear down its own pool: it has not yet
    /// decremented the live-thread counter, so a synchronous shutdown would
    /// spin on that counter forever.
    pub(crate) fn raise_fail_condition(self: &Arc<Self>) {
        let already_hit = self.hit_fail_condition.swap(true, Ordering::SeqCst);
        if already_hit {
            return;
        }

        tracing::debug!("error budget exhausted, abandoning pending work");
        self.deliver(
            &Diagnostic::fatal(DiagnosticCode::MiscHitMaxErrors).with_message(format!(
                "Hit maximum number of errors ({}), stopping",
                self.config.max_num_errors
            )),
        );

        if self.is_multi_threaded() {
            let context = Arc::clone(self);
            thread::spawn(move || {
                context.shutdown_workers();
            });
        }
    }

    /// Tear down the worker pool. Fail-safe: a concurrent caller is a no-op,
    /// and the pool may already be empty.
    ///
    /// Requests stop on every worker, then spin-waits for the live-thread
    /// counter to reach zero before clearing the worker list. The wait holds
    /// no lock a worker acquires.
    pub(crate) fn shutdown_workers(&self) {
        debug_assert!(self.is_multi_threaded(), "driver is not multi-threaded");

        let already_shutting_down = self.shutting_down_threads.swap(true, Ordering::SeqCst);
        if already_shutting_down {
            return;
        }

        {
            let workers = self.workers.lock();
            for worker in workers.iter() {
                worker.request_stop();
            }
        }

        while self.num_threads_running.load(Ordering::SeqCst) != 0 {
            thread::sleep(crate::worker::TASK_POLL_INTERVAL);
        }

        self.workers.lock().clear();
        self.task_group_running.store(false, Ordering::SeqCst);
        self.shutting_down_threads.store(false, Ordering::SeqCst);

        tracing::debug!("driver shut down worker threads");
    }
}

#[cfg(test)]
mod tests;
