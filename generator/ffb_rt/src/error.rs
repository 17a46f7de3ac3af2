use thiserror::Error;

/// Errors raised by generated artifacts at call time.
///
/// `LengthMismatch` and `OffsetOutOfBounds` are ordinary logic errors
/// the caller can act on. `NativeFault` is not: it signals a
/// binding/runtime inconsistency and is never retried or absorbed.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum RtError {
    /// Bulk replace was handed a sequence of the wrong length. The
    /// target field is untouched.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// A typed access fell outside the segment's byte range.
    #[error("access of {len} bytes at offset {offset} exceeds segment size {size}")]
    OffsetOutOfBounds { offset: u64, len: u64, size: u64 },

    /// A typed access at an offset the value's alignment does not
    /// permit.
    #[error("offset {offset} is not aligned to {align}")]
    MisalignedOffset { offset: u64, align: u64 },

    /// Symbol lookup failed while binding an interface.
    #[error("symbol `{symbol}` not found{}", in_library(.library.as_deref()))]
    UnboundSymbol {
        symbol: String,
        library: Option<String>,
    },

    /// A call went through an interface that was never bound.
    #[error("interface used before it was bound: `{symbol}` has no address")]
    NotBound { symbol: String },

    /// The native side faulted during a call. Fatal; the binding state
    /// can no longer be trusted.
    #[error("native call `{symbol}` faulted: {message}")]
    NativeFault { symbol: String, message: String },
}

fn in_library(library: Option<&str>) -> String {
    match library {
        Some(name) => format!(" in library `{name}`"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = RtError::LengthMismatch {
            expected: 5,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: expected 5 elements, got 4"
        );

        let err = RtError::UnboundSymbol {
            symbol: "getpid".into(),
            library: Some("libc".into()),
        };
        assert_eq!(
            err.to_string(),
            "symbol `getpid` not found in library `libc`"
        );

        let err = RtError::UnboundSymbol {
            symbol: "getpid".into(),
            library: None,
        };
        assert_eq!(err.to_string(), "symbol `getpid` not found");
    }
}
