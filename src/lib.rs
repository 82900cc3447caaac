//! # aidl-base
//!
//! Front-end library for AIDL compilation: lexer, parser driver, and AST.
//!
//! One [`Parser`] instance parses exactly one `.aidl` file. Input comes from
//! disk ([`Parser::open_from_disk`]) or from memory ([`Parser::set_contents`]);
//! [`Parser::run`] drives the grammar to completion, accumulating diagnostics
//! instead of aborting, and afterwards the document tree and the import
//! records are available for the later compiler stages (type checking, stub
//! generation) to consume.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! parser    → Logos lexer, recursive-descent grammar, parse driver
//!   ↓
//! ast       → Document tree (Type, Argument, Method, Item), import records
//! ```

/// AST value types and import-statement resolution
pub mod ast;

/// Parser: Logos lexer, recursive-descent grammar, parse driver
pub mod parser;

// Re-export the types embedders touch most
pub use ast::{Argument, Direction, Document, Import, Item, Method, Type};
pub use parser::{Diagnostic, Parser};
