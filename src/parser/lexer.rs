//! Logos-based lexer for AIDL.
//!
//! Tokenizes a whole scan buffer up front. Every token carries its 1-based
//! source line so the grammar can thread positions into diagnostics, and its
//! byte offset so raw statement text can be recovered from the buffer.

use logos::Logos;
use smol_str::SmolStr;

/// A token with its kind, text, source line, and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// Byte offset of the token's first character in the buffer.
    pub offset: u32,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            line: 1,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.inner.span().start as u32;
        let line = self.line;
        self.line += text.bytes().filter(|b| *b == b'\n').count() as u32;

        let kind = match result {
            // `/**` with a body is documentation; `/**/` is an ordinary
            // (empty) comment.
            Ok(LogosToken::BlockComment) if text.starts_with("/**") && text.len() > 4 => {
                TokenKind::DocComment
            }
            Ok(token) => token.into(),
            Err(()) => TokenKind::Error,
        };
        Some(Token {
            kind,
            text: SmolStr::new(text),
            line,
            offset,
        })
    }
}

/// Tokenize an entire buffer into a Vec.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

/// Token kinds for the AIDL surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    LineComment,
    /// A `/** */` documentation comment.
    DocComment,
    /// A plain `/* */` comment.
    BlockComment,
    // Literals
    Ident,
    Integer,
    // Keywords
    PackageKw,
    ImportKw,
    ParcelableKw,
    InterfaceKw,
    OnewayKw,
    InKw,
    OutKw,
    InoutKw,
    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Eq,
    Star,
    /// Any character no rule recognizes, or an unterminated comment.
    Error,
}

impl TokenKind {
    /// Trivia is skipped by the grammar; doc comments are trivia that the
    /// grammar additionally captures as documentation.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment | Self::DocComment
        )
    }
}

/// Logos token enum - maps to TokenKind. Doc comments are split off from
/// plain block comments by the [`Lexer`] wrapper, so the state machine only
/// ever sees one comment rule.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("package")]
    PackageKw,

    #[token("import")]
    ImportKw,

    #[token("parcelable")]
    ParcelableKw,

    #[token("interface")]
    InterfaceKw,

    #[token("oneway")]
    OnewayKw,

    #[token("in")]
    InKw,

    #[token("out")]
    OutKw,

    #[token("inout")]
    InoutKw,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("=")]
    Eq,

    #[token("*")]
    Star,
}

/// Consume a block comment through its closing `*/`. Failing on an
/// unterminated comment surfaces it as [`TokenKind::Error`].
fn lex_block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => Self::Whitespace,
            LogosToken::LineComment => Self::LineComment,
            LogosToken::BlockComment => Self::BlockComment,
            LogosToken::Ident => Self::Ident,
            LogosToken::Integer => Self::Integer,
            LogosToken::PackageKw => Self::PackageKw,
            LogosToken::ImportKw => Self::ImportKw,
            LogosToken::ParcelableKw => Self::ParcelableKw,
            LogosToken::InterfaceKw => Self::InterfaceKw,
            LogosToken::OnewayKw => Self::OnewayKw,
            LogosToken::InKw => Self::InKw,
            LogosToken::OutKw => Self::OutKw,
            LogosToken::InoutKw => Self::InoutKw,
            LogosToken::LBrace => Self::LBrace,
            LogosToken::RBrace => Self::RBrace,
            LogosToken::LParen => Self::LParen,
            LogosToken::RParen => Self::RParen,
            LogosToken::LBracket => Self::LBracket,
            LogosToken::RBracket => Self::RBracket,
            LogosToken::Semicolon => Self::Semicolon,
            LogosToken::Comma => Self::Comma,
            LogosToken::Dot => Self::Dot,
            LogosToken::Eq => Self::Eq,
            LogosToken::Star => Self::Star,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("package import parcelable interface oneway in out inout foo"),
            vec![
                TokenKind::PackageKw,
                TokenKind::ImportKw,
                TokenKind::ParcelableKw,
                TokenKind::InterfaceKw,
                TokenKind::OnewayKw,
                TokenKind::InKw,
                TokenKind::OutKw,
                TokenKind::InoutKw,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_ident() {
        // `interface2` and `int` must not lex as keywords
        assert_eq!(kinds("interface2 int input"), vec![
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
        ]);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("{ } ( ) [ ] ; , . = *"),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Eq,
                TokenKind::Star,
            ]
        );
    }

    #[test]
    fn test_comment_kinds() {
        let tokens = tokenize("/** doc */ /* plain */ // line\nfoo");
        assert_eq!(tokens[0].kind, TokenKind::DocComment);
        assert_eq!(tokens[0].text, "/** doc */");
        assert_eq!(tokens[2].kind, TokenKind::BlockComment);
        assert_eq!(tokens[2].text, "/* plain */");
        assert_eq!(tokens[4].kind, TokenKind::LineComment);
    }

    #[test]
    fn test_plain_block_comment_alone() {
        let tokens = tokenize("/* plain */");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert!(tokens[0].kind.is_trivia());
    }

    #[test]
    fn test_block_comment_with_inner_stars() {
        let tokens = tokenize("/* a * b ** c */");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, "/* a * b ** c */");
    }

    #[test]
    fn test_empty_comment_is_not_documentation() {
        assert_eq!(tokenize("/**/")[0].kind, TokenKind::BlockComment);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = tokenize("/* never closed");
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn test_line_tracking() {
        let tokens = tokenize("package a;\n\ninterface Foo {\n}\n");
        let interface = tokens
            .iter()
            .find(|t| t.kind == TokenKind::InterfaceKw)
            .unwrap();
        assert_eq!(interface.line, 3);
        let rbrace = tokens.iter().find(|t| t.kind == TokenKind::RBrace).unwrap();
        assert_eq!(rbrace.line, 4);
    }

    #[test]
    fn test_multiline_doc_comment_advances_line() {
        let tokens = tokenize("/**\n * doc\n */\ninterface I {}");
        assert_eq!(tokens[0].kind, TokenKind::DocComment);
        let interface = tokens
            .iter()
            .find(|t| t.kind == TokenKind::InterfaceKw)
            .unwrap();
        assert_eq!(interface.line, 4);
    }

    #[test]
    fn test_unrecognized_input() {
        let tokens = tokenize("interface @ Foo");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("ab cd");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[2].offset, 3);
    }
}
