//! ffb IR - Interface Description Graph
//!
//! This crate contains the input data model for the binding generator:
//! - `Name` for interned identifiers
//! - `ScalarKind` for fixed-width primitive kinds
//! - `Markers` for by-value / by-address annotations on a type use
//! - `TypeDesc`, `FieldDesc`, `AggregateDesc`, `FunctionDesc`,
//!   `InterfaceDesc` describing the declared native surface
//! - `Origin` location hints carried into diagnostics
//!
//! The graph is plain data: it is constructed once per generation run
//! (by hand in tests, or from a description file in the driver), never
//! mutated afterwards, and consumed by the resolver and planners. There
//! is no live reflection handle anywhere in the pipeline.
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)` handles, so
//!   equality and map keys are O(1) integer comparisons.
//! - **Flat, owned data**: every descriptor is owned by its parent;
//!   nothing is shared or reference-counted across declarations.

mod desc;
mod interner;
mod markers;
mod name;
mod origin;
mod scalar;

pub use desc::{
    AggregateDesc, AggregateKind, FieldDesc, FunctionDesc, InterfaceDesc, LibraryRef, Module,
    ParamDesc, TypeDesc,
};
pub use interner::{InternError, NameInterner, SharedInterner};
pub use markers::Markers;
pub use name::Name;
pub use origin::Origin;
pub use scalar::ScalarKind;
