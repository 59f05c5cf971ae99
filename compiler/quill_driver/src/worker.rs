//! Workers: the task loop and the task handlers.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use quill_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink, Level};
use quill_ir::SourceId;

use crate::context::Context;
use crate::task::Task;

/// Poll interval for idle workers and the driver's quiescence waits.
/// Coarse on purpose: task bursts are measured in whole files.
pub(crate) const TASK_POLL_INTERVAL: Duration = Duration::from_millis(32);

/// One worker: an OS thread in multi-threaded mode, or a caller-thread
/// stand-in for the single-threaded drain.
pub(crate) struct Worker {
    /// Set while a task is executing; the quiescence signal for
    /// `wait_for_all_tasks`.
    is_working: AtomicBool,
    /// Set by `shutdown_workers`; checked before each dequeue.
    stop_requested: AtomicBool,
}

impl Worker {
    pub(crate) fn new() -> Self {
        Worker {
            is_working: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn is_working(&self) -> bool {
        self.is_working.load(Ordering::SeqCst)
    }

    #[inline]
    pub(crate) fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Thread body for a pooled worker.
    ///
    /// Pops one task at a time; a worker that finds the queue empty clears
    /// the task-group flag (under the task lock, so the observation is
    /// consistent) and idles. In-flight tasks always run to completion; the
    /// stop request is only honored between tasks.
    pub(crate) fn run(self: &Arc<Self>, context: &Arc<Context>) {
        debug_assert!(context.is_multi_threaded(), "driver is not multi-threaded");

        while !self.stop_requested.load(Ordering::SeqCst) {
            let task = {
                let mut tasks = context.tasks.lock();
                let task = tasks.pop();
                if task.is_none() {
                    context.task_group_running.store(false, Ordering::SeqCst);
                }
                task
            };

            match task {
                None => {
                    self.is_working.store(false, Ordering::SeqCst);
                    thread::sleep(TASK_POLL_INTERVAL);
                }
                Some(task) => {
                    self.is_working.store(true, Ordering::SeqCst);
                    self.run_task(context, task);
                }
            }
        }

        // Done: only after this decrement may shutdown consider us gone.
        self.is_working.store(false, Ordering::SeqCst);
        context.num_threads_running.fetch_sub(1, Ordering::SeqCst);
    }

    /// Run at most one pending task on the caller thread.
    pub(crate) fn step_single_threaded(&self, context: &Arc<Context>) {
        debug_assert!(context.is_single_threaded(), "driver is not single-threaded");

        self.is_working.store(true, Ordering::SeqCst);
        let task = context.tasks.lock().pop();
        if let Some(task) = task {
            self.run_task(context, task);
        }
        self.is_working.store(false, Ordering::SeqCst);
    }

    fn run_task(&self, context: &Arc<Context>, task: Task) {
        let succeeded = match task {
            Task::LoadFile { path } => run_load_file(context, &path),
            Task::TokenizeFile { source_id } => run_tokenize_file(context, source_id),
        };

        if !succeeded {
            context.notify_task_errored();
        }
    }
}

fn run_load_file(context: &Arc<Context>, path: &Path) -> bool {
    if !path.exists() {
        context.emit_internal(
            Level::Error,
            DiagnosticCode::MiscFileDoesNotExist,
            None,
            format!("File \"{}\" does not exist", path.display()),
        );
        return false;
    }

    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::debug!("reading {} failed: {err}", path.display());
            context.emit_internal(
                Level::Error,
                DiagnosticCode::MiscLoadFileFailed,
                None,
                format!("Failed to load file: \"{}\"", path.display()),
            );
            return false;
        }
    };

    context.sources.write().add_source(path.to_path_buf(), data);
    context.emit_trace(format!("Loaded file: \"{}\"", path.display()));
    true
}

fn run_tokenize_file(context: &Arc<Context>, source_id: SourceId) -> bool {
    // Source data is immutable after registration; no lock is needed beyond
    // cloning the handle out.
    let source = context.source(source_id);

    let sink = ContextSink { context };
    match quill_lexer::tokenize(source_id, source.data(), &sink) {
        // The tokenizer has already emitted its own diagnostics.
        Err(_) => false,
        Ok(buffer) => {
            let installed = source.install_token_buffer(buffer);
            debug_assert!(installed, "token buffer for {source_id:?} written twice");
            context.emit_trace(format!("Tokenized file: \"{}\"", source.origin()));
            installed
        }
    }
}

/// Adapter routing tokenizer diagnostics into the driver's counted,
/// serialized emit path.
struct ContextSink<'a> {
    context: &'a Arc<Context>,
}

impl DiagnosticSink for ContextSink<'_> {
    fn emit(&self, diagnostic: Diagnostic) {
        self.context.emit(diagnostic);
    }
}
