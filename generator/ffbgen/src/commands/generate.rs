//! The `generate` command: emit binding artifacts from a manifest.

use std::path::PathBuf;

use ffb_emit::{Artifact, ArtifactSink};
use ffb_resolve::Target;

use super::{load_module, report};
use crate::{generate, GenerateOptions};

/// Options parsed from the command line.
#[derive(Clone, Debug)]
pub struct GenerateCliOptions {
    pub out_dir: PathBuf,
    pub pointer_width: u64,
    pub error_limit: usize,
    pub verbose: bool,
}

impl Default for GenerateCliOptions {
    fn default() -> Self {
        GenerateCliOptions {
            out_dir: PathBuf::from("."),
            pointer_width: 8,
            error_limit: 0,
            verbose: false,
        }
    }
}

/// Parse one flag into an options delta.
///
/// `-o` takes a lookahead value and is handled by the caller; this
/// covers the `key=value` and boolean flags.
pub fn parse_generate_options(arg: &str, options: &mut GenerateCliOptions) -> bool {
    if let Some(value) = arg.strip_prefix("--pointer-width=") {
        match value.parse::<u64>() {
            Ok(width) if width.is_power_of_two() => options.pointer_width = width,
            _ => {
                eprintln!("error: invalid pointer width `{value}`");
                std::process::exit(1);
            }
        }
        true
    } else if let Some(value) = arg.strip_prefix("--error-limit=") {
        match value.parse::<usize>() {
            Ok(limit) => options.error_limit = limit,
            Err(_) => {
                eprintln!("error: invalid error limit `{value}`");
                std::process::exit(1);
            }
        }
        true
    } else if arg == "--verbose" || arg == "-v" {
        options.verbose = true;
        true
    } else {
        false
    }
}

/// Sink writing one `.rs` file per artifact into the output directory.
struct FsSink {
    dir: PathBuf,
}

impl ArtifactSink for FsSink {
    fn accept(&mut self, artifact: Artifact) -> std::io::Result<()> {
        std::fs::write(self.dir.join(format!("{}.rs", artifact.name)), artifact.text)
    }
}

/// Generate artifacts for a manifest file.
///
/// All diagnostics are reported before exiting; artifacts for invalid
/// declarations are still written, marked as such in their header.
pub fn generate_bindings(path: &str, options: &GenerateCliOptions) {
    let (module, interner, mut queue) = load_module(path);

    if let Err(err) = std::fs::create_dir_all(&options.out_dir) {
        eprintln!(
            "error: cannot create output directory `{}`: {err}",
            options.out_dir.display()
        );
        std::process::exit(1);
    }
    let mut sink = FsSink {
        dir: options.out_dir.clone(),
    };

    let generate_options = GenerateOptions {
        target: Target {
            pointer_width: options.pointer_width,
        },
        error_limit: options.error_limit,
    };
    let outcome = match generate(&module, &interner, &generate_options, &mut sink) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: writing artifacts failed: {err}");
            std::process::exit(1);
        }
    };

    queue.absorb(outcome.diagnostics);
    report(&mut queue, &interner);

    if outcome.invalid_artifacts > 0 {
        eprintln!(
            "wrote {} artifacts to `{}` ({} invalid)",
            outcome.artifacts,
            options.out_dir.display(),
            outcome.invalid_artifacts
        );
    } else {
        println!(
            "wrote {} artifacts to `{}`",
            outcome.artifacts,
            options.out_dir.display()
        );
    }

    if queue.has_errors() {
        std::process::exit(1);
    }
}
