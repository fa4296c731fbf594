//! Logos-based lexer for MAL
//!
//! Fast tokenization using the logos crate. Trivia (whitespace and
//! comments) is recognised by the generated lexer and dropped by
//! [`Lexer`], so the parser only ever sees significant tokens.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let logos_token = self.inner.next()?;
            let kind = match logos_token {
                Ok(t) if t.is_trivia() => continue,
                Ok(t) => t,
                Err(()) => TokenKind::Error,
            };
            let offset = TextSize::new(self.inner.span().start as u32);
            return Some(Token {
                kind,
                text: self.inner.slice(),
                offset,
            });
        }
    }
}

/// Tokenize an entire string into a Vec of significant tokens
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Skip past the closing `*/`; an unterminated comment is an error.
fn block_comment(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Token kinds of the MAL language.
///
/// The single letters `E`, `C`, `I` and `A` are lexed as [`TokenKind::Ident`]
/// and given meaning by the parser depending on where they appear.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("include")]
    Include,

    #[token("info")]
    Info,

    #[token("category")]
    Category,

    #[token("abstract")]
    Abstract,

    #[token("asset")]
    Asset,

    #[token("extends")]
    Extends,

    #[token("associations")]
    Associations,

    #[token("let")]
    Let,

    #[token("!E")]
    NotExist,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("<--")]
    LArrow,

    #[token("-->")]
    RArrow,

    #[token("+>")]
    Inherit,

    #[token("->")]
    Override,

    #[token("<-")]
    Require,

    #[token("\\/")]
    Union,

    #[token("/\\")]
    Intersect,

    #[token("..")]
    DotDot,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("#")]
    Hash,

    #[token(":")]
    Colon,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("@")]
    At,

    #[token(",")]
    Comma,

    #[token("=")]
    Eq,

    #[token(".")]
    Dot,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    /// Any character the lexer does not recognise.
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }

    /// Human-readable form used in "expected ..., found ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::LineComment | Self::BlockComment => "comment",
            Self::Include => "'include'",
            Self::Info => "'info'",
            Self::Category => "'category'",
            Self::Abstract => "'abstract'",
            Self::Asset => "'asset'",
            Self::Extends => "'extends'",
            Self::Associations => "'associations'",
            Self::Let => "'let'",
            Self::NotExist => "'!E'",
            Self::Ident => "identifier",
            Self::Int => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::LArrow => "'<--'",
            Self::RArrow => "'-->'",
            Self::Inherit => "'+>'",
            Self::Override => "'->'",
            Self::Require => "'<-'",
            Self::Union => "'\\/'",
            Self::Intersect => "'/\\'",
            Self::DotDot => "'..'",
            Self::Hash => "'#'",
            Self::Colon => "':'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Amp => "'&'",
            Self::Pipe => "'|'",
            Self::At => "'@'",
            Self::Comma => "','",
            Self::Eq => "'='",
            Self::Dot => "'.'",
            Self::Star => "'*'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Slash => "'/'",
            Self::Caret => "'^'",
            Self::Error => "invalid character",
        }
    }
}
