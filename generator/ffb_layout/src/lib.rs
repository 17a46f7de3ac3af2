//! Layout algebra for the binding generator.
//!
//! Pure functions from ordered member layouts to padded aggregate
//! layouts. Nothing here consults the description graph or emits
//! diagnostics; callers hand in `(size, alignment)` pairs and get back
//! byte-exact offsets. Field declaration order is preserved and
//! directly determines offsets; no reordering or packing optimization
//! is ever performed.
//!
//! The two aggregate forms:
//! - structs: members laid out sequentially, padding inserted before
//!   any member whose natural offset would violate its alignment, plus
//!   a trailing pad so the whole aggregate tiles correctly in an array.
//! - unions: every member at offset 0, size is the maximum member size
//!   rounded up to the maximum member alignment.

mod aggregate;
mod layout;
mod pad;

pub use aggregate::{struct_layout, union_layout, AggregateLayout};
pub use layout::Layout;
pub use pad::{pad, Entry, PaddedEntry, PaddedSeq};
