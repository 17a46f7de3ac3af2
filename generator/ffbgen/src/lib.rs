//! Binding generator driver.
//!
//! The pipeline: a JSON manifest describes the native surface; lowering
//! interns it into the description graph; the resolver computes every
//! aggregate layout; the planners derive accessor and call-binding
//! plans; emission serializes plans into generated modules. Every
//! stage accumulates diagnostics and keeps going, so one run reports
//! everything wrong with a manifest.

pub mod commands;
pub mod input;

mod generate;

pub use generate::{generate, GenerateOptions, GenerationOutcome};
