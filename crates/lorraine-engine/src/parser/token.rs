//! Token definitions for Lua++.
//!
//! This module defines every token the lexer can produce, together with the
//! source location model (`Position`/`Location`) that is attached to tokens
//! and AST nodes alike.

use std::fmt;
use std::ops::Range;

/// A point in the source text.
///
/// `line` is 1-based, `column` is the 0-based byte distance from the start of
/// the line. `offset` is the absolute byte index, kept so that spans can be
/// mapped back onto the source for snippet rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}

/// A half-open span of source text: `end` is the position just past the last
/// character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width location at a single position.
    pub fn at(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Location) -> Location {
        Location::new(self.start, other.end)
    }

    /// Byte range covered by this location.
    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset.max(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset >= self.end.offset
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or("")
    }
}

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    And,
    Break,
    Do,
    Else,
    Elseif,
    End,
    False,
    For,
    Function,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    Const,
    Class,
    Constructor,
    Implicit,
    Type,
    Import,
    Export,
    From,
    Extern,
    Interface,
    While,

    // Single-character symbols
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Greater,
    Less,
    Hash,
    Dot,
    Colon,
    Equals,
    Comma,
    Semicolon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Tilde,
    Question,
    Pipe,

    // Combination operators
    EqualEqual,
    GreaterEqual,
    LessEqual,
    TildeEqual,
    DotDot,
    Ellipsis,
    PlusPlus,
    /// Reserved: `--` always opens a comment in source text.
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    DotDotEqual,
    Arrow,

    // Literals
    String,
    Number,

    Identifier,
    Eof,
}

impl TokenKind {
    /// Keyword kind for a word, if the word is reserved.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "and" => TokenKind::And,
            "break" => TokenKind::Break,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::Elseif,
            "end" => TokenKind::End,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "in" => TokenKind::In,
            "local" => TokenKind::Local,
            "nil" => TokenKind::Nil,
            "not" => TokenKind::Not,
            "or" => TokenKind::Or,
            "repeat" => TokenKind::Repeat,
            "return" => TokenKind::Return,
            "then" => TokenKind::Then,
            "true" => TokenKind::True,
            "until" => TokenKind::Until,
            "const" => TokenKind::Const,
            "class" => TokenKind::Class,
            "constructor" => TokenKind::Constructor,
            "implicit" => TokenKind::Implicit,
            "type" => TokenKind::Type,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            "from" => TokenKind::From,
            "extern" => TokenKind::Extern,
            "interface" => TokenKind::Interface,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(&self) -> bool {
        (*self as u8) <= (TokenKind::While as u8)
    }

    /// Source text of a keyword or symbol; `None` for literal classes.
    pub fn as_str(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::And => "and",
            TokenKind::Break => "break",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::Elseif => "elseif",
            TokenKind::End => "end",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Local => "local",
            TokenKind::Nil => "nil",
            TokenKind::Not => "not",
            TokenKind::Or => "or",
            TokenKind::Repeat => "repeat",
            TokenKind::Return => "return",
            TokenKind::Then => "then",
            TokenKind::True => "true",
            TokenKind::Until => "until",
            TokenKind::Const => "const",
            TokenKind::Class => "class",
            TokenKind::Constructor => "constructor",
            TokenKind::Implicit => "implicit",
            TokenKind::Type => "type",
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::From => "from",
            TokenKind::Extern => "extern",
            TokenKind::Interface => "interface",
            TokenKind::While => "while",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::Hash => "#",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Equals => "=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Tilde => "~",
            TokenKind::Question => "?",
            TokenKind::Pipe => "|",
            TokenKind::EqualEqual => "==",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::TildeEqual => "~=",
            TokenKind::DotDot => "..",
            TokenKind::Ellipsis => "...",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::PercentEqual => "%=",
            TokenKind::CaretEqual => "^=",
            TokenKind::DotDotEqual => "..=",
            TokenKind::Arrow => "=>",
            TokenKind::String | TokenKind::Number | TokenKind::Identifier | TokenKind::Eof => {
                return None
            }
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "'{}'", text),
            None => match self {
                TokenKind::String => write!(f, "<string>"),
                TokenKind::Number => write!(f, "<number>"),
                TokenKind::Identifier => write!(f, "<identifier>"),
                _ => write!(f, "<eof>"),
            },
        }
    }
}

/// A token produced by the lexer.
///
/// For string tokens `text` holds the unescaped value, for every other kind it
/// is the literal source slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn eof(position: Position) -> Self {
        Self::new(TokenKind::Eof, "", Location::at(position))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.text.escape_default()),
            TokenKind::Number => write!(f, "{}", self.text),
            TokenKind::Identifier => write!(f, "'{}'", self.text),
            kind => write!(f, "{}", kind),
        }
    }
}
