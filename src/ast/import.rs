//! Import records and import-statement resolution.
//!
//! Imports are recorded during the parse but resolved to concrete
//! declarations by a later compiler stage; this module only derives the
//! canonical dotted class name from the statement text.

use std::fmt;

/// One reference to another declaration file, recorded by the parse driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// 1-based line of the `import` keyword.
    pub line: u32,
    /// The statement text as written, e.g. `import android.os.IBinder;`.
    pub raw_statement: String,
    /// Canonical dotted class name, e.g. `android.os.IBinder` or `android.os.*`.
    pub resolved_name: String,
    /// The file that was being parsed when this import was registered.
    pub owning_file: String,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: import {}", self.owning_file, self.line, self.resolved_name)
    }
}

/// Derive the dotted class name from an import statement.
///
/// The accepted grammar is fixed and small: the `import` keyword, a dotted
/// identifier, an optional trailing `.*` wildcard, and an optional `;`.
/// Whitespace around the dots is tolerated (the tokenizer treats it as
/// trivia) and normalized away, so the returned name is always canonical.
/// Returns `None` on anything else; resolution is pure and deterministic.
pub fn resolve_import(statement: &str) -> Option<String> {
    let rest = statement.trim().strip_prefix("import")?;
    // Require a separator after the keyword so `importx.y` is rejected.
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim().trim_end_matches(';').trim_end();
    if name.is_empty() {
        return None;
    }

    let segments: Vec<&str> = name.split('.').map(str::trim).collect();
    for (i, segment) in segments.iter().enumerate() {
        let is_last = i + 1 == segments.len();
        if is_last && *segment == "*" && segments.len() > 1 {
            continue;
        }
        // Internal whitespace fails here: `a b` is not an identifier.
        if !is_identifier(segment) {
            return None;
        }
    }

    Some(segments.join("."))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple() {
        assert_eq!(resolve_import("import a.b.C;"), Some("a.b.C".to_string()));
    }

    #[test]
    fn test_resolve_unqualified() {
        assert_eq!(resolve_import("import IBinder;"), Some("IBinder".to_string()));
    }

    #[test]
    fn test_resolve_wildcard() {
        assert_eq!(
            resolve_import("import android.os.*;"),
            Some("android.os.*".to_string())
        );
    }

    #[test]
    fn test_resolve_tolerates_whitespace() {
        assert_eq!(
            resolve_import("  import   a.b.C  ;  "),
            Some("a.b.C".to_string())
        );
    }

    #[test]
    fn test_resolve_normalizes_spaced_dots() {
        assert_eq!(resolve_import("import a . b.C;"), Some("a.b.C".to_string()));
        assert_eq!(
            resolve_import("import a .b. C ;"),
            Some("a.b.C".to_string())
        );
        assert_eq!(
            resolve_import("import android.os . *;"),
            Some("android.os.*".to_string())
        );
    }

    #[test]
    fn test_resolve_missing_semicolon() {
        // The trailing `;` is optional in the raw text; the grammar enforces it.
        assert_eq!(resolve_import("import a.b.C"), Some("a.b.C".to_string()));
    }

    #[test]
    fn test_resolve_rejects_malformed() {
        assert_eq!(resolve_import("import ;"), None);
        assert_eq!(resolve_import("import a..b;"), None);
        assert_eq!(resolve_import("import 9lives;"), None);
        assert_eq!(resolve_import("import a.b c;"), None);
        assert_eq!(resolve_import("import *;"), None);
        assert_eq!(resolve_import("importx.y;"), None);
        assert_eq!(resolve_import("package a.b;"), None);
    }
}
