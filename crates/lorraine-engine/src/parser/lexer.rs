//! Lexer for Lua++.
//!
//! The lexer is pull based: it always holds exactly one materialized token
//! (`current()`), produced on demand by `next()`. Whitespace, comments and
//! string literals (including `[==[ long ]==]` brackets) are scanned by hand so
//! that line tracking stays exact; everything else (keywords, identifiers,
//! numbers, operators) goes through a logos-generated table.

use crate::parser::error::SyntaxError;
use crate::parser::token::{Location, Position, Token, TokenKind};
use log::trace;
use logos::Logos;
use unicode_xid::UnicodeXID;

/// Logos token table for the fixed part of the grammar.
///
/// Converted to `TokenKind` right after matching.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // Keywords (must come before identifiers)
    #[token("and")]
    And,
    #[token("break")]
    Break,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("elseif")]
    Elseif,
    #[token("end")]
    End,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("local")]
    Local,
    #[token("nil")]
    Nil,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("repeat")]
    Repeat,
    #[token("return")]
    Return,
    #[token("then")]
    Then,
    #[token("true")]
    True,
    #[token("until")]
    Until,
    #[token("const")]
    Const,
    #[token("class")]
    Class,
    #[token("constructor")]
    Constructor,
    #[token("implicit")]
    Implicit,
    #[token("type")]
    Type,
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("from")]
    From,
    #[token("extern")]
    Extern,
    #[token("interface")]
    Interface,
    #[token("while")]
    While,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // Validation is deferred to the parser, which converts the text
    #[regex(r"[0-9]([0-9A-Za-z_.]|[eE][+-])*")]
    #[regex(r"\.[0-9]([0-9A-Za-z_.]|[eE][+-])*")]
    Number,

    // Combination operators
    #[token("==")]
    EqualEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<=")]
    LessEqual,
    #[token("~=")]
    TildeEqual,
    #[token("..")]
    DotDot,
    #[token("...")]
    Ellipsis,
    #[token("..=")]
    DotDotEqual,
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("^=")]
    CaretEqual,
    #[token("=>")]
    Arrow,

    // Single-character symbols
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token(">")]
    Greater,
    #[token("<")]
    Less,
    #[token("#")]
    Hash,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
}

/// Pull lexer over a single source buffer.
///
/// Cloning a lexer snapshots its whole state, which is how `peek` looks ahead
/// without disturbing the stream.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    line: u32,
    line_start: usize,
    current: Token,
}

impl<'a> Lexer<'a> {
    /// Create a lexer and pre-fetch the first token.
    pub fn new(source: &'a str) -> Result<Self, SyntaxError> {
        let mut lexer = Self {
            source,
            offset: 0,
            line: 1,
            line_start: 0,
            current: Token::eof(Position::new(1, 0, 0)),
        };
        lexer.next()?;
        Ok(lexer)
    }

    /// The most recently produced token.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Advance to the next token.
    pub fn next(&mut self) -> Result<(), SyntaxError> {
        self.current = self.read_token()?;
        trace!(
            "token {} at {}",
            self.current,
            self.current.location.start
        );
        Ok(())
    }

    /// Look `count` tokens ahead without moving. `peek(0)` is `current()`.
    pub fn peek(&self, count: usize) -> Result<Token, SyntaxError> {
        let mut ahead = self.clone();
        for _ in 0..count {
            if ahead.current.is(TokenKind::Eof) {
                break;
            }
            ahead.next()?;
        }
        Ok(ahead.current)
    }

    /// Drain the remaining stream, including the final `eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let done = self.current.is(TokenKind::Eof);
            tokens.push(self.current.clone());
            if done {
                return Ok(tokens);
            }
            self.next()?;
        }
    }

    pub fn current_position(&self) -> Position {
        Position::new(
            self.line,
            (self.offset - self.line_start) as u32,
            self.offset,
        )
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    // ========================================================================
    // Character access
    // ========================================================================

    fn peek_byte(&self, count: usize) -> Option<u8> {
        self.source.as_bytes().get(self.offset + count).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn consume_character(&mut self) {
        if let Some(c) = self.peek_char() {
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.line_start = self.offset;
            }
        }
    }

    fn consume_bytes(&mut self, count: usize) {
        for _ in 0..count {
            self.consume_character();
        }
    }

    fn error_from(&self, start: Position, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(Location::new(start, self.current_position()), message)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn read_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments()?;

        let start = self.current_position();
        let Some(c) = self.peek_char() else {
            return Ok(Token::eof(start));
        };

        match c {
            '\'' | '"' => self.read_string(c, start),
            '[' => match self.long_bracket_level() {
                Some(level) => match self.read_long_bracket(level) {
                    Some(value) => Ok(Token::new(
                        TokenKind::String,
                        value,
                        Location::new(start, self.current_position()),
                    )),
                    None => Err(self.error_from(start, "unfinished long string near <eof>")),
                },
                None if self.peek_byte(1) == Some(b'=') => {
                    self.consume_character();
                    Err(self.error_from(start, "invalid long string delimiter"))
                }
                None => self.read_table_token(start),
            },
            c if !c.is_ascii() => {
                if UnicodeXID::is_xid_start(c) {
                    Ok(self.read_identifier(start))
                } else {
                    self.consume_character();
                    Err(self.error_from(start, format!("unexpected character '{}'", c)))
                }
            }
            _ => self.read_table_token(start),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek_byte(0) {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c) => self.consume_character(),
                Some(b'-') if self.peek_byte(1) == Some(b'-') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.current_position();
        self.consume_bytes(2);

        if self.peek_byte(0) == Some(b'[') {
            if let Some(level) = self.long_bracket_level() {
                return match self.read_long_bracket(level) {
                    Some(_) => Ok(()),
                    None => Err(self.error_from(start, "unfinished long comment near <eof>")),
                };
            }
        }

        while !matches!(self.peek_byte(0), None | Some(b'\n')) {
            self.consume_character();
        }
        Ok(())
    }

    // ========================================================================
    // Strings
    // ========================================================================

    fn read_string(&mut self, quote: char, start: Position) -> Result<Token, SyntaxError> {
        self.consume_character();
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error_from(
                        start,
                        format!("unfinished string, expected closing {}", quote),
                    ));
                }
                Some(c) if c == quote => {
                    self.consume_character();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.current_position();
                    self.consume_character();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('a') => '\u{07}',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0c}',
                        Some('v') => '\u{0b}',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\n') => '\n',
                        Some(other) => {
                            self.consume_character();
                            return Err(self.error_from(
                                escape_start,
                                format!("invalid escape sequence '\\{}'", other),
                            ));
                        }
                        None => continue,
                    };
                    self.consume_character();
                    value.push(escaped);
                }
                Some(c) => {
                    self.consume_character();
                    value.push(c);
                }
            }
        }

        Ok(Token::new(
            TokenKind::String,
            value,
            Location::new(start, self.current_position()),
        ))
    }

    /// Level of a long bracket opening at the current `[`: the number of `=`
    /// between the two brackets. `None` when this is not a long bracket.
    fn long_bracket_level(&self) -> Option<usize> {
        let mut level = 0;
        while self.peek_byte(1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_byte(1 + level) == Some(b'[')).then_some(level)
    }

    /// Read a `[==[ ... ]==]` body. Returns `None` on EOF before the closing
    /// bracket of the same level.
    fn read_long_bracket(&mut self, level: usize) -> Option<String> {
        self.consume_bytes(level + 2);

        // A newline right after the opening bracket is not part of the value
        if self.peek_byte(0) == Some(b'\r') && self.peek_byte(1) == Some(b'\n') {
            self.consume_bytes(2);
        } else if self.peek_byte(0) == Some(b'\n') {
            self.consume_character();
        }

        let content_start = self.offset;
        loop {
            match self.peek_byte(0) {
                None => return None,
                Some(b']') if self.closes_long_bracket(level) => {
                    let value = self.source[content_start..self.offset].to_string();
                    self.consume_bytes(level + 2);
                    return Some(value);
                }
                Some(_) => self.consume_character(),
            }
        }
    }

    fn closes_long_bracket(&self, level: usize) -> bool {
        (1..=level).all(|i| self.peek_byte(i) == Some(b'='))
            && self.peek_byte(level + 1) == Some(b']')
    }

    // ========================================================================
    // Table-driven tokens
    // ========================================================================

    fn read_identifier(&mut self, start: Position) -> Token {
        while let Some(c) = self.peek_char() {
            if c == '_' || UnicodeXID::is_xid_continue(c) {
                self.consume_character();
            } else {
                break;
            }
        }
        let source = self.source;
        let text = &source[start.offset..self.offset];
        Token::new(
            TokenKind::Identifier,
            text,
            Location::new(start, self.current_position()),
        )
    }

    fn read_table_token(&mut self, start: Position) -> Result<Token, SyntaxError> {
        let source = self.source;
        let rest = &source[self.offset..];
        let mut logos_lexer = LogosToken::lexer(rest);

        match logos_lexer.next() {
            Some(Ok(logos_token)) => {
                let length = logos_lexer.span().end;
                let kind = convert_token(logos_token);

                // `naïve`: an ASCII prefix followed by Unicode identifier characters
                if kind == TokenKind::Identifier || kind.is_keyword() {
                    let continues = rest[length..]
                        .chars()
                        .next()
                        .is_some_and(|c| !c.is_ascii() && UnicodeXID::is_xid_continue(c));
                    if continues {
                        return Ok(self.read_identifier(start));
                    }
                }

                self.consume_bytes(length);
                Ok(Token::new(
                    kind,
                    &rest[..length],
                    Location::new(start, self.current_position()),
                ))
            }
            Some(Err(())) => {
                let c = rest.chars().next().unwrap_or('\0');
                self.consume_character();
                Err(self.error_from(start, format!("unexpected character '{}'", c)))
            }
            None => Ok(Token::eof(start)),
        }
    }
}

fn convert_token(token: LogosToken) -> TokenKind {
    match token {
        LogosToken::And => TokenKind::And,
        LogosToken::Break => TokenKind::Break,
        LogosToken::Do => TokenKind::Do,
        LogosToken::Else => TokenKind::Else,
        LogosToken::Elseif => TokenKind::Elseif,
        LogosToken::End => TokenKind::End,
        LogosToken::False => TokenKind::False,
        LogosToken::For => TokenKind::For,
        LogosToken::Function => TokenKind::Function,
        LogosToken::If => TokenKind::If,
        LogosToken::In => TokenKind::In,
        LogosToken::Local => TokenKind::Local,
        LogosToken::Nil => TokenKind::Nil,
        LogosToken::Not => TokenKind::Not,
        LogosToken::Or => TokenKind::Or,
        LogosToken::Repeat => TokenKind::Repeat,
        LogosToken::Return => TokenKind::Return,
        LogosToken::Then => TokenKind::Then,
        LogosToken::True => TokenKind::True,
        LogosToken::Until => TokenKind::Until,
        LogosToken::Const => TokenKind::Const,
        LogosToken::Class => TokenKind::Class,
        LogosToken::Constructor => TokenKind::Constructor,
        LogosToken::Implicit => TokenKind::Implicit,
        LogosToken::Type => TokenKind::Type,
        LogosToken::Import => TokenKind::Import,
        LogosToken::Export => TokenKind::Export,
        LogosToken::From => TokenKind::From,
        LogosToken::Extern => TokenKind::Extern,
        LogosToken::Interface => TokenKind::Interface,
        LogosToken::While => TokenKind::While,
        LogosToken::Identifier => TokenKind::Identifier,
        LogosToken::Number => TokenKind::Number,
        LogosToken::EqualEqual => TokenKind::EqualEqual,
        LogosToken::GreaterEqual => TokenKind::GreaterEqual,
        LogosToken::LessEqual => TokenKind::LessEqual,
        LogosToken::TildeEqual => TokenKind::TildeEqual,
        LogosToken::DotDot => TokenKind::DotDot,
        LogosToken::Ellipsis => TokenKind::Ellipsis,
        LogosToken::DotDotEqual => TokenKind::DotDotEqual,
        LogosToken::PlusPlus => TokenKind::PlusPlus,
        LogosToken::PlusEqual => TokenKind::PlusEqual,
        LogosToken::MinusEqual => TokenKind::MinusEqual,
        LogosToken::StarEqual => TokenKind::StarEqual,
        LogosToken::SlashEqual => TokenKind::SlashEqual,
        LogosToken::PercentEqual => TokenKind::PercentEqual,
        LogosToken::CaretEqual => TokenKind::CaretEqual,
        LogosToken::Arrow => TokenKind::Arrow,
        LogosToken::Plus => TokenKind::Plus,
        LogosToken::Minus => TokenKind::Minus,
        LogosToken::Star => TokenKind::Star,
        LogosToken::Slash => TokenKind::Slash,
        LogosToken::Percent => TokenKind::Percent,
        LogosToken::Caret => TokenKind::Caret,
        LogosToken::Greater => TokenKind::Greater,
        LogosToken::Less => TokenKind::Less,
        LogosToken::Hash => TokenKind::Hash,
        LogosToken::Dot => TokenKind::Dot,
        LogosToken::Colon => TokenKind::Colon,
        LogosToken::Equals => TokenKind::Equals,
        LogosToken::Comma => TokenKind::Comma,
        LogosToken::Semicolon => TokenKind::Semicolon,
        LogosToken::LeftParen => TokenKind::LeftParen,
        LogosToken::RightParen => TokenKind::RightParen,
        LogosToken::LeftBracket => TokenKind::LeftBracket,
        LogosToken::RightBracket => TokenKind::RightBracket,
        LogosToken::LeftBrace => TokenKind::LeftBrace,
        LogosToken::RightBrace => TokenKind::RightBrace,
        LogosToken::Tilde => TokenKind::Tilde,
        LogosToken::Question => TokenKind::Question,
        LogosToken::Pipe => TokenKind::Pipe,
    }
}
