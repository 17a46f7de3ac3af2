//! The `explain` command: documentation for generator error codes.

use ffb_diagnostic::ErrorCode;

/// Print the documentation for one error code string.
pub fn explain_error(code_str: &str) {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E1002, E2001, E2003, E3001");
        std::process::exit(1);
    };

    println!("{code}: {}", code.description());
}
