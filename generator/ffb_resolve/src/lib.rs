//! Type resolution for the binding generator.
//!
//! Maps semantic type descriptions to layout descriptors through one
//! ordered precedence list, consulted everywhere a type must be
//! resolved: struct fields and function parameters go through the same
//! function, so the two can never disagree.
//!
//! Precedence (first match wins):
//! 1. conflicting by-value/by-address markers: ambiguous, unsupported;
//! 2. explicit by-value marker with a known aggregate layout: embed it;
//! 3. explicit by-address marker: pointer-sized, tagged with the
//!    referenced aggregate for call planning only;
//! 4. no marker: fall back to the referenced declaration's own default
//!    and re-apply the rules above;
//! 5. primitive scalar kinds: fixed layouts;
//! 6. string-like and opaque handle types: pointer-sized;
//! 7. fixed-length sequences: repeated element layout;
//! 8. anything else: unsupported, diagnostic raised, siblings continue.
//!
//! Aggregate layouts are resolved in dependency order. An aggregate
//! that transitively embeds itself by value is a definition error,
//! detected before any layout computation and excluded from the run.

mod registry;
mod resolved;
mod target;

pub use registry::{AggregateEntry, Resolver};
pub use resolved::{ResolvedType, Unresolved, ValueClass};
pub use target::Target;
