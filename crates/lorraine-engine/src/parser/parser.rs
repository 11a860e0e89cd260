//! Recursive descent parser for Lua++.
//!
//! The parser pulls tokens from a [`Lexer`] and builds a [`Module`] while
//! keeping an explicit [`ScopeStack`] of the blocks currently open. Names are
//! resolved as soon as they are parsed, so the finished tree only contains
//! variable references, type wrappers and fully built types.
//!
//! Parsing stops at the first error. [`Parser::parse`] reports it through the
//! compiler session, [`Parser::try_parse`] hands it back to the caller.

use crate::compiler::Compiler;
use crate::parser::ast::{Module, ModuleInfo};
use crate::parser::error::SyntaxError;
use crate::parser::lexer::Lexer;
use crate::parser::symbols::{Scope, ScopeStack, Variable, VariableId};
use crate::parser::token::{Location, Position, Token, TokenKind};
use crate::parser::types::{PrimitiveType, TypeId};
use log::debug;

pub mod expr;
pub mod guards;
pub mod module;
pub mod stmt;
pub mod types;

/// Parser state for one module
pub struct Parser<'src, 'c> {
    pub(crate) lexer: Lexer<'src>,
    pub(crate) compiler: &'c mut Compiler,
    pub(crate) info: ModuleInfo,
    pub(crate) scopes: ScopeStack,
    /// Current nesting depth, see [`guards::with_depth`]
    pub(crate) depth: usize,
    /// End of the last consumed token
    last_end: Position,
}

impl<'src, 'c> Parser<'src, 'c> {
    /// Create a parser for `source`, read from the file at `path`.
    ///
    /// Fails if the first token cannot be lexed.
    pub fn new(
        path: impl AsRef<std::path::Path>,
        source: &'src str,
        compiler: &'c mut Compiler,
    ) -> Result<Self, SyntaxError> {
        let lexer = Lexer::new(source)?;
        Ok(Self {
            lexer,
            compiler,
            info: ModuleInfo::new(path, source),
            scopes: ScopeStack::new(),
            depth: 0,
            last_end: Position::default(),
        })
    }

    /// Parse the module, reporting the first error through the compiler.
    pub fn parse(mut self) -> Option<Module> {
        match module::parse_module(&mut self) {
            Ok(module) => Some(module),
            Err(error) => {
                self.compiler.report(&self.info, &error);
                None
            }
        }
    }

    /// Parse the module, returning the first error.
    pub fn try_parse(mut self) -> Result<Module, SyntaxError> {
        module::parse_module(&mut self)
    }

    // ========================================================================
    // Token access
    // ========================================================================

    pub fn current(&self) -> &Token {
        self.lexer.current()
    }

    pub fn current_location(&self) -> Location {
        self.lexer.current().location
    }

    /// Kind of the token `count` positions ahead. `peek_kind(0)` is the
    /// current token.
    pub fn peek_kind(&self, count: usize) -> Result<TokenKind, SyntaxError> {
        Ok(self.lexer.peek(count)?.kind)
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.lexer.current().is(kind)
    }

    pub fn at_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume the current token.
    pub fn advance(&mut self) -> Result<(), SyntaxError> {
        self.last_end = self.lexer.current().location.end;
        self.lexer.next()
    }

    /// Take the current token and advance past it.
    pub fn bump(&mut self) -> Result<Token, SyntaxError> {
        let token = self.lexer.current().clone();
        self.advance()?;
        Ok(token)
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Result<bool, SyntaxError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Assert the current token's kind, consuming it on success.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if !self.check(kind) {
            return Err(SyntaxError::expected(kind, self.current()));
        }
        self.bump()
    }

    /// Assert the current token is an identifier and return its text.
    pub fn expect_identifier(&mut self) -> Result<(String, Location), SyntaxError> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok((token.text, token.location))
    }

    /// Span from `start` to the end of the last consumed token
    pub fn span_from(&self, start: Location) -> Location {
        Location::new(start.start, self.last_end)
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// The root scope of every module: the primitive type names
    pub(crate) fn root_scope(&self) -> Scope {
        let mut scope = Scope::new();
        for primitive in [
            PrimitiveType::String,
            PrimitiveType::Number,
            PrimitiveType::Boolean,
            PrimitiveType::Void,
            PrimitiveType::Any,
        ] {
            scope.types.insert(
                primitive.name().to_string(),
                self.compiler.types.primitive(primitive),
            );
        }
        scope
    }

    /// Allocate a variable in the session arena
    pub(crate) fn alloc_variable(&mut self, variable: Variable) -> VariableId {
        self.compiler.variables.alloc(variable)
    }

    pub(crate) fn variable_type(&self, id: VariableId) -> TypeId {
        self.compiler
            .variables
            .get(id)
            .map(|variable| variable.ty)
            .unwrap_or_else(|| self.compiler.types.any_type())
    }

    /// Bind a type name in the innermost scope, rejecting redefinitions
    pub(crate) fn define_type(
        &mut self,
        name: &str,
        ty: TypeId,
        location: Location,
    ) -> Result<(), SyntaxError> {
        self.scopes.define_type(name, ty, location).map_err(|err| {
            SyntaxError::new(
                err.duplicate,
                format!("the type '{}' is already defined in this scope", err.name),
            )
        })
    }

    /// Bind a variable that must be unique in the innermost scope
    pub(crate) fn declare_variable(
        &mut self,
        name: &str,
        id: VariableId,
        location: Location,
    ) -> Result<(), SyntaxError> {
        self.scopes.declare_variable(name, id, location).map_err(|err| {
            SyntaxError::new(
                err.duplicate,
                format!("'{}' is already declared in this scope", err.name),
            )
        })
    }

    pub(crate) fn any_type(&self) -> TypeId {
        self.compiler.types.any_type()
    }

    pub(crate) fn trace_module(&self, what: &str) {
        debug!("{} module '{}'", what, self.info.path().display());
    }
}
