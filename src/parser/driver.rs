//! The parse driver.
//!
//! One [`Parser`] owns everything needed to run one parse of one file: the
//! scanner state, the single live scan buffer, the accumulated diagnostics,
//! the import records, and the resulting document. The grammar layer calls
//! back into it while it runs; downstream stages query it afterwards.

use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use crate::ast::{Document, Import, resolve_import};
use crate::parser::diagnostics::Diagnostic;
use crate::parser::grammar::Grammar;
use crate::parser::lexer;

// ============================================================================
// Scanner state and buffers
// ============================================================================

/// Per-driver scanner state. Allocated at driver construction; hands out scan
/// buffers and accounts for how many are live.
struct ScanState {
    live_buffers: Rc<Cell<usize>>,
}

impl ScanState {
    fn new() -> Self {
        Self {
            live_buffers: Rc::new(Cell::new(0)),
        }
    }

    fn scan_string(&self, text: String) -> ScanBuffer {
        self.live_buffers.set(self.live_buffers.get() + 1);
        ScanBuffer {
            text,
            live: Rc::clone(&self.live_buffers),
        }
    }

    fn live_buffers(&self) -> usize {
        self.live_buffers.get()
    }
}

/// The in-memory staging region holding the source text currently fed to the
/// tokenizer. Deregisters itself from the scanner state on drop.
struct ScanBuffer {
    text: String,
    live: Rc<Cell<usize>>,
}

impl Drop for ScanBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parse driver for exactly one file.
///
/// Construct one per parse attempt, supply input with [`open_from_disk`] or
/// [`set_contents`], call [`run`] once, then read [`document`] and
/// [`imports`]. Callers gate all use of the results on [`run`]'s return value
/// or [`found_no_errors`]; after a failed parse the document may hold a
/// partial tree that is safe to read but not complete.
///
/// No method panics on well-formed use and none returns `Err`: I/O failure is
/// [`open_from_disk`]'s boolean, everything else funnels through the sticky
/// diagnostic list.
///
/// [`open_from_disk`]: Parser::open_from_disk
/// [`set_contents`]: Parser::set_contents
/// [`run`]: Parser::run
/// [`document`]: Parser::document
/// [`imports`]: Parser::imports
/// [`found_no_errors`]: Parser::found_no_errors
pub struct Parser {
    filename: String,
    // Declared before `scanner` so the buffer is released first on drop.
    buffer: Option<ScanBuffer>,
    scanner: ScanState,
    package: Option<String>,
    document: Option<Document>,
    imports: Vec<Import>,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Create a driver for `filename`. Allocates the scanner state but does
    /// not touch the filesystem or install a buffer.
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        tracing::trace!(file = %filename, "parser created");
        Self {
            filename,
            buffer: None,
            scanner: ScanState::new(),
            package: None,
            document: None,
            imports: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The file this driver was constructed for.
    pub fn file_name(&self) -> &str {
        &self.filename
    }

    /// The package declared by the parsed file, or `""` if none was declared
    /// (or the parse has not run yet).
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }

    pub(crate) fn set_package(&mut self, package: String) {
        self.package = Some(package);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Open this driver's file for reading and install its contents as the
    /// scan buffer. Returns `false` if the file cannot be read; no diagnostic
    /// is recorded, the caller decides how to report that.
    pub fn open_from_disk(&mut self) -> bool {
        match fs::read_to_string(&self.filename) {
            Ok(text) => {
                self.install_buffer(text);
                true
            }
            Err(error) => {
                tracing::debug!(file = %self.filename, %error, "failed to open input file");
                false
            }
        }
    }

    /// Install `text` as an in-memory scan buffer, bypassing the filesystem.
    /// Any previously installed buffer is released first, so at most one
    /// buffer is ever live for this driver.
    pub fn set_contents(&mut self, text: impl Into<String>) {
        self.install_buffer(text.into());
    }

    fn install_buffer(&mut self, text: String) {
        // Release before install: at most one live buffer per scanner.
        self.buffer = None;
        self.buffer = Some(self.scanner.scan_string(text));
    }

    /// The currently installed buffer text, if any.
    pub fn contents(&self) -> Option<&str> {
        self.buffer.as_ref().map(|b| b.text.as_str())
    }

    /// How many scan buffers this driver's scanner currently has live.
    /// Always 0 or 1.
    pub fn live_buffers(&self) -> usize {
        self.scanner.live_buffers()
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Run the grammar over the installed buffer. Returns `true` iff the
    /// grammar accepted the input and no diagnostic was reported during the
    /// pass.
    ///
    /// Call this once per installed buffer. Calling it with no buffer
    /// installed is a caller error: it fails fast in debug builds and returns
    /// `false` in release builds.
    pub fn run(&mut self) -> bool {
        let Some(buffer) = self.buffer.as_ref() else {
            debug_assert!(false, "run() called with no input installed");
            return false;
        };
        tracing::debug!(file = %self.filename, bytes = buffer.text.len(), "parsing");

        let tokens = lexer::tokenize(&buffer.text);
        let accepted = Grammar::new(self, tokens).parse_document();

        tracing::debug!(
            file = %self.filename,
            accepted,
            diagnostics = self.diagnostics.len(),
            imports = self.imports.len(),
            "parse finished"
        );
        accepted && self.found_no_errors()
    }

    // ========================================================================
    // Accumulation (called by the grammar layer)
    // ========================================================================

    /// Record a diagnostic at `line`. Never fatal: the grammar keeps going,
    /// but [`Parser::found_no_errors`] reports `false` for the rest of the
    /// pass.
    pub fn report_error(&mut self, line: u32, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            file: self.filename.clone(),
            line,
            message: message.into(),
        };
        tracing::error!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Register an import statement seen at `line`. The resolved class name
    /// is derived from the raw text; a malformed statement is reported as a
    /// diagnostic instead of being recorded.
    pub fn add_import(&mut self, raw_statement: &str, line: u32) {
        match resolve_import(raw_statement) {
            Some(resolved_name) => self.imports.push(Import {
                line,
                raw_statement: raw_statement.to_string(),
                resolved_name,
                owning_file: self.filename.clone(),
            }),
            None => {
                self.report_error(
                    line,
                    format!("malformed import statement: {}", raw_statement.trim()),
                );
            }
        }
    }

    /// Attach the parsed document. Expected to be called at most once per
    /// parse.
    pub fn set_document(&mut self, document: Document) {
        debug_assert!(self.document.is_none(), "document attached twice");
        self.document = Some(document);
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// The parsed document, if the grammar attached one.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The import records, in declaration order.
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// `true` until the first diagnostic of the pass, permanently `false`
    /// afterwards.
    pub fn found_no_errors(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Every diagnostic reported so far, in the order raised.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_driver_state() {
        let driver = Parser::new("IFoo.aidl");
        assert_eq!(driver.file_name(), "IFoo.aidl");
        assert_eq!(driver.package(), "");
        assert!(driver.found_no_errors());
        assert!(driver.document().is_none());
        assert!(driver.imports().is_empty());
        assert_eq!(driver.live_buffers(), 0);
        assert!(driver.contents().is_none());
    }

    #[test]
    fn test_set_contents_replaces_buffer() {
        let mut driver = Parser::new("IFoo.aidl");
        driver.set_contents("interface First {}");
        assert_eq!(driver.live_buffers(), 1);

        driver.set_contents("interface Second {}");
        assert_eq!(driver.live_buffers(), 1);
        assert_eq!(driver.contents(), Some("interface Second {}"));
    }

    #[test]
    fn test_error_flag_is_sticky() {
        let mut driver = Parser::new("IFoo.aidl");
        assert!(driver.found_no_errors());

        driver.report_error(3, "expected ';'");
        assert!(!driver.found_no_errors());

        // A later well-formed import does not clear the flag
        driver.add_import("import a.b.C;", 5);
        assert!(!driver.found_no_errors());
        assert_eq!(driver.imports().len(), 1);
    }

    #[test]
    fn test_diagnostic_carries_file_and_line() {
        let mut driver = Parser::new("IFoo.aidl");
        driver.report_error(7, "unexpected token");
        assert_eq!(
            driver.diagnostics()[0].to_string(),
            "IFoo.aidl:7: unexpected token"
        );
    }

    #[test]
    fn test_add_import_record() {
        let mut driver = Parser::new("IFoo.aidl");
        driver.add_import("import a.b.C;", 5);

        let imports = driver.imports();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].resolved_name, "a.b.C");
        assert_eq!(imports[0].raw_statement, "import a.b.C;");
        assert_eq!(imports[0].owning_file, "IFoo.aidl");
        assert_eq!(imports[0].line, 5);
        assert!(driver.found_no_errors());
    }

    #[test]
    fn test_add_import_malformed_reports_error() {
        let mut driver = Parser::new("IFoo.aidl");
        driver.add_import("import a..b;", 2);
        assert!(driver.imports().is_empty());
        assert!(!driver.found_no_errors());
        assert_eq!(driver.diagnostics()[0].line, 2);
    }

    #[test]
    fn test_imports_keep_declaration_order() {
        let mut driver = Parser::new("IFoo.aidl");
        driver.add_import("import a.A;", 1);
        driver.add_import("import b.B;", 2);
        let names: Vec<_> = driver.imports().iter().map(|i| i.resolved_name.as_str()).collect();
        assert_eq!(names, ["a.A", "b.B"]);
    }

    #[test]
    fn test_drivers_do_not_share_package_state() {
        let mut first = Parser::new("a.aidl");
        let mut second = Parser::new("b.aidl");
        first.set_contents("package com.first;");
        second.set_contents("package com.second;");
        assert!(first.run());
        assert!(second.run());
        assert_eq!(first.package(), "com.first");
        assert_eq!(second.package(), "com.second");
    }

    #[test]
    fn test_buffer_released_on_drop() {
        let mut driver = Parser::new("IFoo.aidl");
        driver.set_contents("parcelable P;");
        assert_eq!(driver.live_buffers(), 1);
        drop(driver);
        // The buffer guard decremented the count before the scanner state
        // went away; nothing to observe here beyond "no panic on drop order".
    }
}
