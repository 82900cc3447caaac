//! Parser for AIDL files.
//!
//! This module bridges the generated-lexer layer to a structured document:
//! - **logos** for fast lexing ([`lexer`])
//! - a recursive-descent grammar that calls back into the driver
//! - the [`Parser`] driver owning the scan-buffer lifecycle, the sticky
//!   diagnostic state, and the parse results
//!
//! ```
//! use aidl::Parser;
//!
//! let mut parser = Parser::new("IFoo.aidl");
//! parser.set_contents("interface IFoo { void ping(); }");
//! assert!(parser.run());
//! assert!(parser.document().is_some());
//! ```

mod diagnostics;
mod driver;
mod grammar;
pub mod lexer;

pub use diagnostics::Diagnostic;
pub use driver::Parser;
pub use lexer::{Lexer, Token, TokenKind, tokenize};
