use std::fmt;
use std::str::FromStr;

/// Error codes for all generator diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Definition errors (the graph itself is malformed)
/// - E2xxx: Resolution errors (a type does not resolve to a layout)
/// - E3xxx: Call-planning errors (signature contract violations)
/// - E9xxx: Internal generator errors
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Definition Errors (E1xxx)
    /// Wrong structural kind for a binding declaration
    E1001,
    /// Duplicate field name within an aggregate
    E1002,
    /// Invalid repeat count on a sequence field
    E1003,

    // Resolution Errors (E2xxx)
    /// Type is not supported by the layout table
    E2001,
    /// Conflicting by-value and by-address markers on one declaration
    E2002,
    /// Aggregate transitively embeds itself by value
    E2003,
    /// Reference to an unknown aggregate
    E2004,

    // Call-Planning Errors (E3xxx)
    /// Scratch-allocator slot required but missing or misplaced
    E3001,
    /// Scratch-allocator slot declared but nothing requires it
    E3002,

    // Internal Errors (E9xxx)
    /// Internal invariant breached during generation
    E9001,
}

impl ErrorCode {
    /// Short human description, shown by `ffbgen explain`.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => {
                "A binding declaration uses the wrong structural kind. Function \
                 interfaces must be declared as interfaces and value types as \
                 plain field records; nothing else can carry binding annotations."
            }
            ErrorCode::E1002 => {
                "Two fields of the same aggregate share a name. Field names are \
                 the keys of the layout's offset table and must be unique within \
                 their owning aggregate."
            }
            ErrorCode::E1003 => {
                "A sequence field declares an invalid repeat count: zero, or one \
                 large enough that the total byte size overflows. Repeat counts \
                 are 1 or greater; a count of 1 behaves exactly like a scalar."
            }
            ErrorCode::E2001 => {
                "A member or parameter's type does not resolve to a native \
                 layout. The supported forms are fixed-width scalars, declared \
                 aggregates embedded by value, addresses of aggregates, \
                 string-like values, opaque handles, and fixed-length sequences \
                 of scalars. The surrounding declaration is still processed, but \
                 its artifact is marked invalid."
            }
            ErrorCode::E2002 => {
                "One declaration carries both the by-value and the by-address \
                 marker. The two are mutually exclusive and the generator never \
                 silently picks one; remove one of the markers."
            }
            ErrorCode::E2003 => {
                "An aggregate transitively embeds itself by value, so its size \
                 would be infinite. The cycle is reported once and the aggregate \
                 is excluded from layout computation. Break the cycle by holding \
                 the inner aggregate by address instead."
            }
            ErrorCode::E2004 => {
                "A type use references an aggregate that is not declared in the \
                 description graph."
            }
            ErrorCode::E3001 => {
                "The function's return value must be materialized through a \
                 scratch allocation, so the declared parameter list must supply \
                 a scratch-allocator slot as its first parameter. The slot is \
                 missing or in the wrong position."
            }
            ErrorCode::E3002 => {
                "The function declares a scratch-allocator slot, but neither its \
                 return value nor any parameter requires one."
            }
            ErrorCode::E9001 => {
                "The generator reached a state its own invariants rule out. This \
                 is a bug in the generator, not in the description graph."
            }
        }
    }

    const ALL: [ErrorCode; 10] = [
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E9001,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Error for an unrecognized code string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownErrorCode(pub String);

impl fmt::Display for UnknownErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code: {}", self.0)
    }
}

impl std::error::Error for UnknownErrorCode {}

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.to_string() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_variant_name() {
        assert_eq!(ErrorCode::E2001.to_string(), "E2001");
        assert_eq!(ErrorCode::E3001.to_string(), "E3001");
    }

    #[test]
    fn parse_round_trip() {
        for code in ErrorCode::ALL {
            assert_eq!(code.to_string().parse::<ErrorCode>(), Ok(code));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("E7777".parse::<ErrorCode>().is_err());
        assert!("garbage".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn every_code_is_documented() {
        for code in ErrorCode::ALL {
            assert!(!code.description().is_empty(), "{code}");
        }
    }
}
