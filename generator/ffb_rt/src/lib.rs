//! Runtime support for generated binding artifacts.
//!
//! Generated modules link against this crate, not against the
//! generator: it provides the byte regions their accessors operate on
//! ([`Segment`]), the call-scoped arena their thunks allocate marshal
//! copies from ([`Scratch`]), and the one-time symbol table a generated
//! interface binds through ([`BindingTable`]).
//!
//! Every invocation of a generated call owns its own scratch region;
//! the only process-wide shared state is the binding table, written
//! once before the first call and never mutated afterwards. Nothing in
//! this crate takes a lock on the call path.

mod bind;
mod error;
mod invoke;
mod scratch;
mod segment;

pub use bind::{BindingTable, SymbolAddr, SymbolSource};
pub use error::RtError;
pub use ffb_layout::Layout;
pub use invoke::{translate_fault, unexpected_return, CallValue, InvokeError, NativeInvoker};
pub use scratch::{Scratch, SegmentAllocator};
pub use segment::{Scalar, Segment};
