use std::sync::Arc;

use parking_lot::Mutex;

use quill_diagnostic::{Diagnostic, DiagnosticCode, Level};

use crate::config::{DriverConfig, Verbosity};
use crate::context::{Context, DiagnosticCallback};

fn collecting_context(config: DriverConfig) -> (Arc<Context>, Arc<Mutex<Vec<Diagnostic>>>) {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&collected);
    let callback: DiagnosticCallback = Arc::new(move |_context, diagnostic| {
        sink.lock().push(diagnostic.clone());
    });
    (Arc::new(Context::new(config, callback)), collected)
}

#[test]
fn errors_and_fatals_increment_the_counter() {
    let (context, collected) = collecting_context(DriverConfig::default());

    context.emit_internal(Level::Error, DiagnosticCode::MiscLoadFileFailed, None, "one");
    assert_eq!(context.num_errors(), 1);
    context.emit_internal(Level::Fatal, DiagnosticCode::MiscLoadFileFailed, None, "two");
    assert_eq!(context.num_errors(), 2);

    assert_eq!(collected.lock().len(), 2);
}

#[test]
fn warnings_and_infos_do_not_count() {
    let (context, collected) = collecting_context(DriverConfig::default());

    context.emit_internal(Level::Warning, DiagnosticCode::MiscDebug, None, "warn");
    context.emit_internal(Level::Info, DiagnosticCode::MiscDebug, None, "info");

    assert_eq!(context.num_errors(), 0);
    assert!(!context.has_hit_fail_condition());
    assert_eq!(collected.lock().len(), 2);
}

#[test]
fn counter_saturates_at_the_ceiling() {
    let (context, _) = collecting_context(DriverConfig::default().with_max_num_errors(3));

    for _ in 0..10 {
        context.emit(Diagnostic::error(DiagnosticCode::MiscLoadFileFailed).with_message("x"));
    }

    assert_eq!(context.num_errors(), 3);
    assert!(context.has_hit_fail_condition());
}

#[test]
fn reaching_the_ceiling_latches_and_notifies_once() {
    let (context, collected) = collecting_context(DriverConfig::default().with_max_num_errors(2));

    context.emit(Diagnostic::error(DiagnosticCode::MiscFileDoesNotExist).with_message("a"));
    assert!(!context.has_hit_fail_condition());

    context.emit(Diagnostic::error(DiagnosticCode::MiscFileDoesNotExist).with_message("b"));
    assert!(context.has_hit_fail_condition());

    // Past the ceiling: still delivered, no second notice.
    context.emit(Diagnostic::error(DiagnosticCode::MiscFileDoesNotExist).with_message("c"));

    let notices: Vec<Diagnostic> = collected
        .lock()
        .iter()
        .filter(|d| d.code == DiagnosticCode::MiscHitMaxErrors)
        .cloned()
        .collect();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, Level::Fatal);
}

#[test]
fn ceiling_of_one_latches_on_the_first_error() {
    let (context, _) = collecting_context(DriverConfig::default().with_max_num_errors(1));

    context.emit(Diagnostic::error(DiagnosticCode::MiscLoadFileFailed).with_message("x"));

    assert!(context.has_hit_fail_condition());
    assert_eq!(context.num_errors(), 1);
}

#[test]
fn notify_below_the_ceiling_does_not_latch() {
    let (context, _) = collecting_context(DriverConfig::default().with_max_num_errors(5));

    context.emit(Diagnostic::error(DiagnosticCode::MiscLoadFileFailed).with_message("x"));
    context.notify_task_errored();

    assert!(!context.has_hit_fail_condition());
}

#[test]
fn trace_and_debug_are_gated_by_verbosity() {
    let (quiet, quiet_collected) = collecting_context(DriverConfig::default());
    quiet.emit_trace("invisible");
    quiet.emit_debug("invisible");
    assert!(quiet_collected.lock().is_empty());

    let (verbose, verbose_collected) =
        collecting_context(DriverConfig::default().with_verbosity(Verbosity::Verbose));
    verbose.emit_trace("still invisible");
    verbose.emit_debug("visible");
    {
        let collected = verbose_collected.lock();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].code, DiagnosticCode::MiscDebug);
        assert_eq!(collected[0].level, Level::Info);
    }

    let (trace, trace_collected) =
        collecting_context(DriverConfig::default().with_verbosity(Verbosity::Trace));
    trace.emit_trace("visible");
    trace.emit_debug("visible");
    assert_eq!(trace_collected.lock().len(), 2);
}

#[test]
fn callback_sees_context_state() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let callback: DiagnosticCallback = Arc::new(move |context, _diagnostic| {
        sink.lock().push(context.num_errors());
    });
    let context = Arc::new(Context::new(DriverConfig::default(), callback));

    context.emit(Diagnostic::error(DiagnosticCode::MiscLoadFileFailed).with_message("x"));
    context.emit(Diagnostic::error(DiagnosticCode::MiscLoadFileFailed).with_message("y"));

    // Delivery happens before the increment, so the callback observes the
    // pre-increment counts.
    assert_eq!(*observed.lock(), vec![0, 1]);
}
