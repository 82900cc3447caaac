//! Recursive-descent grammar for AIDL.
//!
//! Runs over the token stream produced by the lexer and calls back into the
//! driver (`add_import`, `set_package`, `set_document`, `report_error`) and
//! the AST constructors. Diagnostics are never fatal: on a syntax error the
//! grammar reports, synchronizes on `;` or `}`, and keeps going, so the
//! driver ends up with a consistent (possibly partial) document either way.

use smol_str::SmolStr;

use crate::ast::{Argument, Direction, Document, Interface, Item, Method, Parcelable, Type};
use crate::parser::Parser;
use crate::parser::lexer::{Token, TokenKind};

/// Grammar state for one pass over one token stream.
pub(crate) struct Grammar<'a> {
    driver: &'a mut Parser,
    tokens: Vec<Token>,
    pos: usize,
    /// Doc comments seen since the last declaration, waiting to attach.
    pending_comments: String,
    /// Line reported for diagnostics at end of input.
    eof_line: u32,
    /// Set when the input is too broken to keep the top-level structure.
    fatal: bool,
}

impl<'a> Grammar<'a> {
    pub(crate) fn new(driver: &'a mut Parser, tokens: Vec<Token>) -> Self {
        let eof_line = tokens.last().map(|t| t.line).unwrap_or(1);
        let mut grammar = Self {
            driver,
            tokens,
            pos: 0,
            pending_comments: String::new(),
            eof_line,
            fatal: false,
        };
        grammar.skip_trivia();
        grammar
    }

    /// Parse one whole file and attach the document to the driver.
    /// Returns `false` only when the grammar could not keep the top-level
    /// structure intact (the yacc-style reject code).
    pub(crate) fn parse_document(mut self) -> bool {
        let mut items = Vec::new();

        while !self.at_eof() && !self.fatal {
            match self.current_kind() {
                TokenKind::PackageKw => self.parse_package(),
                TokenKind::ImportKw => self.parse_import(),
                TokenKind::ParcelableKw => {
                    if let Some(parcelable) = self.parse_parcelable() {
                        items.push(Item::Parcelable(parcelable));
                    }
                }
                TokenKind::InterfaceKw | TokenKind::OnewayKw => {
                    if let Some(interface) = self.parse_interface() {
                        items.push(Item::Interface(interface));
                    }
                }
                _ => {
                    self.error_here(format!(
                        "unexpected '{}'; expected a declaration",
                        self.current_text()
                    ));
                    self.recover_to_declaration();
                }
            }
        }

        self.driver.set_document(Document { items });
        !self.fatal
    }

    // =========================================================================
    // Productions
    // =========================================================================

    fn parse_package(&mut self) {
        let line = self.current_line();
        self.bump(); // 'package'

        let Some(name) = self.parse_dotted_name() else {
            self.error_here("expected package name after 'package'");
            self.recover_past_semicolon();
            return;
        };
        self.expect(TokenKind::Semicolon, "expected ';' after package declaration");

        if self.driver.package().is_empty() {
            self.driver.set_package(name);
        } else {
            self.driver.report_error(line, "duplicate package declaration");
        }
    }

    fn parse_import(&mut self) {
        let line = self.current_line();
        let start = self.current_offset();
        self.bump(); // 'import'

        if self.parse_dotted_name().is_none() {
            self.error_here("expected class name after 'import'");
            self.recover_past_semicolon();
            return;
        }
        // Optional wildcard tail: `.*`
        if self.at(TokenKind::Dot) {
            self.bump();
            if !self.expect(TokenKind::Star, "expected '*' in wildcard import") {
                self.recover_past_semicolon();
                return;
            }
        }
        if !self.at(TokenKind::Semicolon) {
            self.error_here("expected ';' after import");
            self.recover_past_semicolon();
            return;
        }
        let end = self.current_end_offset();
        self.bump(); // ';'

        // Hand the statement text as written to the driver; it re-derives the
        // class name through the fixed import grammar.
        let raw = self
            .driver
            .contents()
            .map(|text| text[start as usize..end as usize].to_string())
            .unwrap_or_default();
        self.driver.add_import(&raw, line);
    }

    fn parse_parcelable(&mut self) -> Option<Parcelable> {
        let comments = self.take_comments();
        let line = self.current_line();
        self.bump(); // 'parcelable'

        let Some(name) = self.parse_dotted_name() else {
            self.error_here("expected parcelable name");
            self.recover_past_semicolon();
            return None;
        };
        if !self.expect(TokenKind::Semicolon, "expected ';' after parcelable declaration") {
            self.recover_past_semicolon();
        }
        Some(Parcelable {
            name: SmolStr::new(name),
            line,
            comments,
        })
    }

    fn parse_interface(&mut self) -> Option<Interface> {
        let comments = self.take_comments();
        let line = self.current_line();
        let oneway = self.eat(TokenKind::OnewayKw);

        if !self.expect(TokenKind::InterfaceKw, "expected 'interface'") {
            self.recover_past_semicolon();
            return None;
        }
        if !self.at(TokenKind::Ident) {
            self.error_here("expected interface name");
            self.recover_past_semicolon();
            return None;
        }
        let name = self.current_text();
        self.bump();

        if !self.expect(TokenKind::LBrace, "expected '{' after interface name") {
            self.recover_past_semicolon();
            return None;
        }

        let mut methods = Vec::new();
        loop {
            if self.at(TokenKind::RBrace) {
                self.bump();
                break;
            }
            if self.at_eof() {
                self.error_here("unexpected end of file inside interface body");
                self.fatal = true;
                break;
            }
            match self.parse_method() {
                Some(method) => methods.push(method),
                None => self.recover_past_semicolon(),
            }
        }
        self.eat(TokenKind::Semicolon); // tolerated after '}'

        Some(Interface {
            name,
            oneway,
            line,
            comments,
            methods,
        })
    }

    fn parse_method(&mut self) -> Option<Method> {
        let comments = self.take_comments();
        let line = self.current_line();
        let oneway = self.eat(TokenKind::OnewayKw);

        let return_type = self.parse_type()?;

        if !self.at(TokenKind::Ident) {
            self.error_here("expected method name");
            return None;
        }
        let name = self.current_text();
        self.bump();

        if !self.expect(TokenKind::LParen, "expected '(' after method name") {
            return None;
        }
        let arguments = self.parse_arguments()?;

        // Optional explicit transaction id: `= 3`
        let id = if self.eat(TokenKind::Eq) {
            if self.at(TokenKind::Integer) {
                let id = self.current_text().parse::<u32>().ok();
                if id.is_none() {
                    self.error_here("method id out of range");
                }
                self.bump();
                id
            } else {
                self.error_here("expected method id after '='");
                None
            }
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "expected ';' after method declaration");
        Some(Method::new(
            comments,
            oneway,
            return_type,
            name,
            line,
            arguments,
            id,
        ))
    }

    fn parse_arguments(&mut self) -> Option<Vec<Argument>> {
        let mut arguments = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Some(arguments);
        }
        loop {
            arguments.push(self.parse_argument()?);
            if self.eat(TokenKind::Comma) {
                continue;
            }
            if self.expect(TokenKind::RParen, "expected ')' after argument list") {
                return Some(arguments);
            }
            return None;
        }
    }

    fn parse_argument(&mut self) -> Option<Argument> {
        let line = self.current_line();
        let direction = match self.current_kind() {
            TokenKind::InKw => {
                self.bump();
                Some(Direction::In)
            }
            TokenKind::OutKw => {
                self.bump();
                Some(Direction::Out)
            }
            TokenKind::InoutKw => {
                self.bump();
                Some(Direction::Inout)
            }
            _ => None,
        };

        let arg_type = self.parse_type()?;

        if !self.at(TokenKind::Ident) {
            self.error_here("expected argument name");
            return None;
        }
        let name = self.current_text();
        self.bump();

        Some(match direction {
            Some(direction) => Argument::with_direction(direction, arg_type, name, line),
            None => Argument::new(arg_type, name, line),
        })
    }

    fn parse_type(&mut self) -> Option<Type> {
        let comments = self.take_comments();
        let line = self.current_line();

        let Some(name) = self.parse_dotted_name() else {
            self.error_here(format!("expected type, found '{}'", self.current_text()));
            return None;
        };
        let mut dimension = 0;
        while self.eat(TokenKind::LBracket) {
            if !self.expect(TokenKind::RBracket, "expected ']' in array type") {
                break;
            }
            dimension += 1;
        }
        Some(Type::new(name, line, comments, dimension))
    }

    /// `Ident ('.' Ident)*`, stopping before a `.` that is not followed by an
    /// identifier (so a wildcard tail stays unconsumed for the import rule).
    fn parse_dotted_name(&mut self) -> Option<String> {
        if !self.at(TokenKind::Ident) {
            return None;
        }
        let mut name = self.current_text().to_string();
        self.bump();
        while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
            self.bump(); // '.'
            name.push('.');
            name.push_str(&self.current_text());
            self.bump();
        }
        Some(name)
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Error)
    }

    fn current_text(&self) -> SmolStr {
        self.current().map(|t| t.text.clone()).unwrap_or_default()
    }

    fn current_line(&self) -> u32 {
        self.current().map(|t| t.line).unwrap_or(self.eof_line)
    }

    fn current_offset(&self) -> u32 {
        self.current().map(|t| t.offset).unwrap_or(0)
    }

    fn current_end_offset(&self) -> u32 {
        self.current()
            .map(|t| t.offset + t.text.len() as u32)
            .unwrap_or(0)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Kind of the `n`th non-trivia token ahead of the current one.
    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.skip_trivia();
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_here(message);
            false
        }
    }

    /// Advance past trivia, capturing doc comments for the next declaration.
    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            if token.kind == TokenKind::DocComment {
                if !self.pending_comments.is_empty() {
                    self.pending_comments.push('\n');
                }
                self.pending_comments.push_str(&token.text);
            }
            self.pos += 1;
        }
    }

    fn take_comments(&mut self) -> String {
        std::mem::take(&mut self.pending_comments)
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    fn error_here(&mut self, message: impl Into<String>) {
        let line = self.current_line();
        self.driver.report_error(line, message);
    }

    /// Skip until just past the next `;`, stopping early before `}` or at end
    /// of input. Shared by statement-level and interface-member recovery.
    fn recover_past_semicolon(&mut self) {
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            if self.eat(TokenKind::Semicolon) {
                return;
            }
            self.bump();
        }
    }

    /// Skip until the next token that can start a top-level declaration.
    /// Always makes progress when not already at one.
    fn recover_to_declaration(&mut self) {
        self.bump();
        while !self.at_eof()
            && !matches!(
                self.current_kind(),
                TokenKind::PackageKw
                    | TokenKind::ImportKw
                    | TokenKind::ParcelableKw
                    | TokenKind::InterfaceKw
                    | TokenKind::OnewayKw
            )
        {
            self.bump();
        }
    }
}
