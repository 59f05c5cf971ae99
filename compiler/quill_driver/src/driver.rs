//! Driver lifecycle: pool startup/teardown, stage entry points, quiescence.

use std::ops::Deref;
use std::sync::atomic::Ordering;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::config::DriverConfig;
use crate::context::{Context, DiagnosticCallback};
use crate::task::Task;
use crate::worker::{Worker, TASK_POLL_INTERVAL};

/// The compilation driver.
///
/// Owns the lifecycle of the shared [`Context`]: worker pool startup and
/// teardown, the stage entry points, and the wait for task-group
/// quiescence. Dereferences to [`Context`] for read access (sources,
/// counters, flags).
///
/// # Modes
///
/// With `num_threads == 0` the stage entry points drain the queue inline on
/// the caller thread. Otherwise the caller must call
/// [`start_workers`](Driver::start_workers) once, and each stage is followed
/// by [`wait_for_all_tasks`](Driver::wait_for_all_tasks).
///
/// # Ordering
///
/// Within a stage, tasks start in enqueue order but complete in any order.
/// Source ids therefore match file-path order only in single-threaded mode;
/// callers that need deterministic ids must not use a pool.
///
/// Dropping the driver tears the pool down if it is still running.
pub struct Driver {
    context: Arc<Context>,
}

impl Driver {
    /// Create a driver.
    ///
    /// `config.max_num_errors` must be greater than zero (checked builds
    /// assert).
    pub fn new(config: DriverConfig, callback: DiagnosticCallback) -> Self {
        Driver {
            context: Arc::new(Context::new(config, callback)),
        }
    }

    /// Start the worker pool.
    ///
    /// Multi-threaded mode only; the pool must not already be running.
    /// Threads are detached; teardown is coordinated through the
    /// live-thread counter, not join handles.
    pub fn start_workers(&self) {
        debug_assert!(self.context.is_multi_threaded(), "driver is not multi-threaded");
        debug_assert!(!self.workers_running(), "workers already running");

        let num_threads = self.context.config().num_threads;
        let mut workers = self.context.workers.lock();
        workers.reserve(num_threads);

        for i in 0..num_threads {
            let worker = Arc::new(Worker::new());
            workers.push(Arc::clone(&worker));

            let context = Arc::clone(&self.context);
            self.context
                .num_threads_running
                .fetch_add(1, Ordering::SeqCst);

            thread::Builder::new()
                .name(format!("quill-worker-{i}"))
                .spawn(move || worker.run(&context))
                .expect("failed to spawn worker thread");
        }
        drop(workers);

        self.context.emit_debug("driver started worker threads");
    }

    /// Whether the pool is up and not currently being torn down.
    pub fn workers_running(&self) -> bool {
        self.context.workers_running()
    }

    /// Tear down the worker pool.
    ///
    /// Idempotent and safe to race: a test-and-set sentinel makes
    /// concurrent calls no-ops. Blocks until every worker thread has
    /// terminated; pending tasks may be abandoned.
    pub fn shutdown_workers(&self) {
        self.context.shutdown_workers();
    }

    /// Block until the current task group has fully drained.
    ///
    /// Two-phase: first until the queue is empty, then until no worker is
    /// mid-task, since a worker may still be executing the last task it popped
    /// when the queue first appears empty. Only then is the task group
    /// marked finished.
    ///
    /// Valid only while workers are running and no fail condition has been
    /// hit (after a fail condition, the pool is being torn down instead).
    pub fn wait_for_all_tasks(&self) {
        debug_assert!(self.context.is_multi_threaded(), "driver is not multi-threaded");
        debug_assert!(self.workers_running(), "workers are not running");
        debug_assert!(
            !self.context.has_hit_fail_condition(),
            "driver hit a fail condition, shut down workers instead"
        );

        if self
            .context
            .shutting_down_threads
            .load(Ordering::SeqCst)
        {
            return;
        }

        while !self.context.tasks.lock().is_empty() {
            thread::sleep(TASK_POLL_INTERVAL);
        }

        loop {
            let all_done = self
                .context
                .workers
                .lock()
                .iter()
                .all(|worker| !worker.is_working());
            if all_done {
                break;
            }
            thread::sleep(TASK_POLL_INTERVAL);
        }

        self.context
            .task_group_running
            .store(false, Ordering::SeqCst);
    }

    /// Stage entry point: load a batch of files from disk.
    ///
    /// Enqueues one task per path and marks the task group active. No task
    /// group may already be running. In single-threaded mode the queue is
    /// drained before returning.
    pub fn load_files<I>(&self, paths: I)
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        debug_assert!(
            self.context.is_single_threaded() || self.workers_running(),
            "driver is multi-threaded but workers are not running"
        );
        debug_assert!(
            !self.context.is_task_group_running(),
            "task group already running"
        );

        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();

        self.context
            .task_group_running
            .store(true, Ordering::SeqCst);
        self.context.sources.write().reserve(paths.len());

        {
            let mut tasks = self.context.tasks.lock();
            for path in paths {
                tasks.push(Task::LoadFile { path });
            }
        }

        if self.context.is_single_threaded() {
            self.drain_single_threaded();
        }
    }

    /// Stage entry point: tokenize every loaded source.
    ///
    /// Enqueues one task per registered source. No task group may already be
    /// running. In single-threaded mode the queue is drained before
    /// returning.
    pub fn tokenize_loaded_files(&self) {
        debug_assert!(
            self.context.is_single_threaded() || self.workers_running(),
            "driver is multi-threaded but workers are not running"
        );
        debug_assert!(
            !self.context.is_task_group_running(),
            "task group already running"
        );

        {
            let sources = self.context.sources.read();
            self.context
                .task_group_running
                .store(true, Ordering::SeqCst);

            let mut tasks = self.context.tasks.lock();
            for source in sources.sources() {
                tasks.push(Task::TokenizeFile {
                    source_id: source.id(),
                });
            }
        }

        if self.context.is_single_threaded() {
            self.drain_single_threaded();
        }
    }

    /// Drain the queue on the caller thread, stopping early if the error
    /// budget runs out.
    fn drain_single_threaded(&self) {
        debug_assert!(self.context.is_single_threaded(), "driver is not single-threaded");

        let worker = Worker::new();
        loop {
            if self.context.has_hit_fail_condition() || self.context.tasks.lock().is_empty() {
                break;
            }
            worker.step_single_threaded(&self.context);
        }

        self.context
            .task_group_running
            .store(false, Ordering::SeqCst);
    }
}

impl Deref for Driver {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if self.context.is_multi_threaded() && self.context.workers_running() {
            self.context.shutdown_workers();
        }
    }
}
