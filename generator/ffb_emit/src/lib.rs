//! Artifact emission: serializing plans into Rust source text.
//!
//! Everything here is pure serialization. Layout and marshalling
//! decisions were all made by `ffb_resolve` and `ffb_plan`; this crate
//! turns the resulting plans into the text of generated modules that
//! link against `ffb_rt`. The same plan always produces byte-identical
//! text, so artifacts can be diffed and cached.
//!
//! One artifact per declaration: a module per aggregate (layout
//! constant, field offsets, allocation routine, accessors) and a
//! module per interface (one-time symbol binding plus one call thunk
//! per function).

mod aggregate;
mod interface;
mod source;

pub use aggregate::emit_aggregate;
pub use interface::emit_interface;

/// Which kind of declaration an artifact was generated from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ArtifactKind {
    Aggregate,
    Interface,
}

/// One generated source artifact, keyed by its originating declaration.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Artifact {
    /// Declaration name; the driver derives the file name from it.
    pub name: String,
    pub kind: ArtifactKind,
    /// False when generation reported errors for the declaration; the
    /// text then covers only the members that survived.
    pub valid: bool,
    pub text: String,
}

/// Where generated artifacts go.
///
/// The driver writes files; `check` runs and tests collect in memory.
pub trait ArtifactSink {
    fn accept(&mut self, artifact: Artifact) -> std::io::Result<()>;
}

/// Sink that collects artifacts in memory.
#[derive(Default, Debug)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSink for MemorySink {
    fn accept(&mut self, artifact: Artifact) -> std::io::Result<()> {
        self.artifacts.push(artifact);
        Ok(())
    }
}
