//! Driver configuration.

use std::thread;

/// How chatty the driver's internal diagnostics are.
///
/// Gates the `Info`-level trace/debug diagnostics delivered through the
/// diagnostic callback. Independent of `tracing` filtering, which the host
/// controls through its subscriber.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum Verbosity {
    /// Only user-facing diagnostics.
    #[default]
    Normal,
    /// Also deliver driver debug messages.
    Verbose,
    /// Also deliver per-task trace messages.
    Trace,
}

/// Configuration for a [`Driver`](crate::Driver).
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Worker pool size. `0` means single-threaded: stage entry points drain
    /// the queue inline on the caller thread.
    pub num_threads: usize,
    /// Error budget. Must be greater than zero; when the error count reaches
    /// it, the driver latches its fail condition and abandons pending work.
    pub max_num_errors: usize,
    /// Internal diagnostic verbosity.
    pub verbosity: Verbosity,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            num_threads: 0,
            max_num_errors: 20,
            verbosity: Verbosity::Normal,
        }
    }
}

impl DriverConfig {
    /// Set the worker pool size (`0` = single-threaded).
    #[must_use]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Set the error budget.
    #[must_use]
    pub fn with_max_num_errors(mut self, max_num_errors: usize) -> Self {
        self.max_num_errors = max_num_errors;
        self
    }

    /// Set the internal diagnostic verbosity.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Suggested worker pool size for this machine: one less than the available
/// parallelism, leaving a core for the caller thread. At least 1.
pub fn suggested_num_threads() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get().saturating_sub(1).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_single_threaded_with_a_budget() {
        let config = DriverConfig::default();
        assert_eq!(config.num_threads, 0);
        assert!(config.max_num_errors > 0);
        assert_eq!(config.verbosity, Verbosity::Normal);
    }

    #[test]
    fn builders_override_fields() {
        let config = DriverConfig::default()
            .with_num_threads(8)
            .with_max_num_errors(1)
            .with_verbosity(Verbosity::Trace);
        assert_eq!(config.num_threads, 8);
        assert_eq!(config.max_num_errors, 1);
        assert_eq!(config.verbosity, Verbosity::Trace);
    }

    #[test]
    fn suggested_threads_is_positive() {
        assert!(suggested_num_threads() >= 1);
    }

    #[test]
    fn verbosity_levels_are_ordered() {
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert!(Verbosity::Verbose < Verbosity::Trace);
    }
}
