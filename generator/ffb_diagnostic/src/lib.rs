//! Diagnostic system for the binding generator.
//!
//! Generation never aborts on the first problem: every bad field or
//! function is reported and processing continues with its siblings, so
//! one run surfaces everything that is wrong with a description graph.
//!
//! - Error codes for searchability (`ffbgen explain E2001`)
//! - Clear messages (what went wrong)
//! - Declaration origin (where it went wrong)
//! - Notes (why it's wrong, what to change)

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;

use ffb_ir::Origin;

/// Where diagnostics go.
///
/// The queue implements this; tests may substitute a recording sink.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    /// Convenience for the common error path.
    fn error(&mut self, code: ErrorCode, origin: Origin, message: &str) {
        self.report(
            Diagnostic::error(code)
                .with_origin(origin)
                .with_message(message),
        );
    }
}

/// Sink that discards everything.
///
/// Used when a stage re-resolves types whose failures were already
/// reported by an earlier stage, so nothing is reported twice.
#[derive(Default, Debug, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}
