//! CLI command implementations.

mod check;
mod explain;
mod generate;

pub use check::check_manifest;
pub use explain::explain_error;
pub use generate::{generate_bindings, parse_generate_options, GenerateCliOptions};

use ffb_diagnostic::emitter::TextEmitter;
use ffb_diagnostic::DiagnosticQueue;
use ffb_ir::{Module, NameInterner};

use crate::input;

/// Install the tracing subscriber for one CLI invocation.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
        .try_init();
}

/// Read and lower a manifest file, exiting on IO or JSON failures.
///
/// Structural-kind problems are diagnostics, not exits: they land in
/// the returned queue and the run continues with the declarations
/// that lowered.
fn load_module(path: &str) -> (Module, NameInterner, DiagnosticQueue) {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read `{path}`: {err}");
            std::process::exit(1);
        }
    };
    let manifest = match input::parse_manifest(&text) {
        Ok(manifest) => manifest,
        Err(err) => {
            eprintln!("error: `{path}` is not a valid manifest: {err}");
            std::process::exit(1);
        }
    };

    let interner = NameInterner::new();
    let mut queue = DiagnosticQueue::new();
    let module = input::lower(&manifest, &interner, &mut queue);
    (module, interner, queue)
}

/// Render every queued diagnostic to stderr in stable order.
fn report(queue: &mut DiagnosticQueue, interner: &NameInterner) {
    let suppressed = queue.suppressed_count();
    let mut emitter = TextEmitter::new(std::io::stderr(), |name| interner.resolve(name));
    for diagnostic in queue.flush() {
        emitter.emit(&diagnostic);
    }
    if suppressed > 0 {
        eprintln!("note: {suppressed} further errors suppressed by the error limit");
    }
}
