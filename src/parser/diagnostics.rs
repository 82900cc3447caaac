//! Diagnostic values accumulated by the parse driver.

use thiserror::Error;

/// One diagnostic produced during a parse pass.
///
/// Diagnostics never abort the parse; they accumulate on the driver and make
/// [`crate::Parser::found_no_errors`] report `false` for the rest of the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct Diagnostic {
    /// The file being parsed when the diagnostic was raised.
    pub file: String,
    /// 1-based source line, threaded in from the token that triggered it.
    pub line: u32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let diagnostic = Diagnostic {
            file: "IFoo.aidl".to_string(),
            line: 12,
            message: "expected ';'".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "IFoo.aidl:12: expected ';'");
    }
}
