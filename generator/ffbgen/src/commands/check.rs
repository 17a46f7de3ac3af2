//! The `check` command: validate a manifest without writing artifacts.

use ffb_emit::MemorySink;

use super::{load_module, report};
use crate::{generate, GenerateOptions};

/// Run the full pipeline against an in-memory sink and report.
///
/// Exits 1 when any diagnostic of error severity was raised, so CI can
/// gate on manifests staying generatable.
pub fn check_manifest(path: &str) {
    let (module, interner, mut queue) = load_module(path);

    let mut sink = MemorySink::default();
    let outcome = match generate(&module, &interner, &GenerateOptions::default(), &mut sink) {
        Ok(outcome) => outcome,
        Err(_) => {
            // MemorySink never fails.
            return;
        }
    };

    queue.absorb(outcome.diagnostics);
    report(&mut queue, &interner);

    if queue.has_errors() {
        eprintln!(
            "{}: {} error(s), {} artifact(s) would be invalid",
            path,
            queue.error_count(),
            outcome.invalid_artifacts
        );
        std::process::exit(1);
    }
    println!(
        "{}: ok, {} artifact(s) from {} declaration(s)",
        path,
        outcome.artifacts,
        module.aggregates.len() + module.interfaces.len()
    );
}
