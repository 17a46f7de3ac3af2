//! Diagnostic queue for collecting and ordering diagnostics.
//!
//! Generation accumulates; it never fail-fasts. The queue collects every
//! diagnostic raised during a run, counts errors (so the driver can mark
//! artifacts invalid and pick an exit code), and flushes them in a
//! stable, origin-sorted order so output does not depend on planning
//! order or parallelism.

use crate::{Diagnostic, DiagnosticSink};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept before further errors are counted
    /// but dropped (0 = unlimited).
    pub error_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }
}

/// Accumulating queue of diagnostics.
#[derive(Default, Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    config: DiagnosticConfig,
    errors: usize,
    /// Errors dropped once the limit was hit; still counted.
    suppressed: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic to the queue.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors += 1;
            if self.config.error_limit != 0 && self.errors > self.config.error_limit {
                self.suppressed += 1;
                return;
            }
        }
        self.diagnostics.push(diagnostic);
    }

    /// Number of error-severity diagnostics seen (including suppressed).
    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Errors counted but dropped due to the error limit.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    /// Merge another queue into this one (used when parallel workers
    /// each accumulated locally).
    pub fn absorb(&mut self, other: DiagnosticQueue) {
        for diag in other.diagnostics {
            self.push(diag);
        }
        self.suppressed += other.suppressed;
    }

    /// Drain all diagnostics in stable origin order.
    ///
    /// Sorting is by declaration path, then severity, then code, so the
    /// same graph always reports in the same order regardless of how
    /// many workers planned it.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by(|a, b| {
            a.origin
                .cmp(&b.origin)
                .then_with(|| a.severity.cmp(&b.severity))
                .then_with(|| a.code.cmp(&b.code))
        });
        out
    }

    /// Peek at the queued diagnostics without draining.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use ffb_ir::{Name, Origin};

    fn err(code: ErrorCode, decl: u32) -> Diagnostic {
        Diagnostic::error(code)
            .with_origin(Origin::decl(Name::from_raw(decl)))
            .with_message("boom")
    }

    #[test]
    fn counts_errors() {
        let mut queue = DiagnosticQueue::new();
        queue.push(err(ErrorCode::E2001, 1));
        queue.push(Diagnostic::warning(ErrorCode::E3002).with_message("unused slot"));
        assert_eq!(queue.error_count(), 1);
        assert!(queue.has_errors());
    }

    #[test]
    fn flush_is_origin_ordered() {
        let mut queue = DiagnosticQueue::new();
        queue.push(err(ErrorCode::E2001, 9));
        queue.push(err(ErrorCode::E2003, 1));
        queue.push(err(ErrorCode::E2002, 4));
        let flushed = queue.flush();
        let decls: Vec<u32> = flushed.iter().map(|d| d.origin.decl.raw()).collect();
        assert_eq!(decls, vec![1, 4, 9]);
    }

    #[test]
    fn error_limit_suppresses_but_counts() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig { error_limit: 2 });
        for i in 0..5 {
            queue.push(err(ErrorCode::E2001, i));
        }
        assert_eq!(queue.error_count(), 5);
        assert_eq!(queue.suppressed_count(), 3);
        assert_eq!(queue.flush().len(), 2);
    }

    #[test]
    fn absorb_merges_worker_queues() {
        let mut main = DiagnosticQueue::new();
        let mut worker = DiagnosticQueue::new();
        worker.push(err(ErrorCode::E2001, 2));
        main.push(err(ErrorCode::E3001, 1));
        main.absorb(worker);
        assert_eq!(main.error_count(), 2);
    }
}
