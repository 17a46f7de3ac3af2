//! Plain-text rendering of diagnostics.
//!
//! Diagnostics point at declaration paths, not source bytes, so
//! rendering is a one-line header plus indented notes. Name resolution
//! is injected so this crate stays independent of interner storage.

use std::io::Write;

use ffb_ir::Name;

use crate::Diagnostic;

/// Writes diagnostics as plain text to any `Write` target.
pub struct TextEmitter<W: Write, F: FnMut(Name) -> String> {
    out: W,
    resolve: F,
    emitted: usize,
}

impl<W: Write, F: FnMut(Name) -> String> TextEmitter<W, F> {
    pub fn new(out: W, resolve: F) -> Self {
        TextEmitter {
            out,
            resolve,
            emitted: 0,
        }
    }

    /// Render one diagnostic. IO errors are ignored: diagnostics go to
    /// stderr and a broken pipe must not abort the run that is trying
    /// to report problems.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        self.emitted += 1;
        let origin = diagnostic.origin.render(&mut self.resolve);
        let _ = writeln!(
            self.out,
            "{} [{}]: {}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        );
        if !origin.is_empty() {
            let _ = writeln!(self.out, "  --> {origin}");
        }
        for note in &diagnostic.notes {
            let _ = writeln!(self.out, "  = note: {note}");
        }
    }

    /// Number of diagnostics rendered so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
