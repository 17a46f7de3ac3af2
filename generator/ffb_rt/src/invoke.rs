//! The downcall seam between generated thunks and the host.
//!
//! The generator and this crate never perform a native call
//! themselves; a generated thunk marshals its arguments into
//! [`CallValue`]s and hands them to whatever [`NativeInvoker`] the
//! host built on its FFI layer. Tests substitute a recording invoker.

use crate::{RtError, SymbolAddr};

/// One value crossing the native boundary.
///
/// Integer scalars widen to `i64`, floats to `f64`; everything
/// pointer-like crosses as a host address. The thunk knows the exact
/// boundary layout from its plan and narrows on the way back out.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CallValue {
    Void,
    Int(i64),
    Float(f64),
    Address(usize),
}

/// What an invoker reports when the call does not complete normally.
#[derive(Debug)]
pub enum InvokeError {
    /// A well-known runtime condition; passes through to the caller
    /// unchanged.
    Runtime(RtError),
    /// Anything else the native side raised.
    Fault(String),
}

/// Performs the actual downcall at a resolved symbol address.
pub trait NativeInvoker {
    fn invoke(&self, addr: SymbolAddr, args: &[CallValue]) -> Result<CallValue, InvokeError>;
}

/// Translate an invoker failure into the caller-facing error.
///
/// Runtime conditions pass through unchanged; any other fault wraps
/// into a fatal [`RtError::NativeFault`] naming the symbol, signaling
/// a binding inconsistency rather than a recoverable condition.
pub fn translate_fault(symbol: &str, err: InvokeError) -> RtError {
    match err {
        InvokeError::Runtime(err) => err,
        InvokeError::Fault(message) => RtError::NativeFault {
            symbol: symbol.to_owned(),
            message,
        },
    }
}

/// The error a thunk raises when the invoker answers with a value of
/// the wrong shape.
pub fn unexpected_return(symbol: &str, value: &CallValue) -> RtError {
    RtError::NativeFault {
        symbol: symbol.to_owned(),
        message: format!("unexpected return value {value:?}"),
    }
}
