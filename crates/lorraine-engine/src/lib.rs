//! Lorraine: the Lua++ compiler front end
//!
//! This crate turns Lua++ source into a validated AST:
//! - **Parser**: lexer, recursive-descent parser, scopes and imports (`parser` module)
//! - **Types**: interned type algebra and structural compatibility (`parser::types`)
//! - **Checker**: type validation over the AST (`parser::checker`)
//! - **Lowering**: the interface code generators implement (`lowering` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use lorraine_engine::{Compiler, Config};
//!
//! let mut compiler = Compiler::new(Config::load(None)?);
//! let module = compiler.compile_file("main.lua")?;
//! println!("{} statements", module.statements().len());
//! ```

#![allow(clippy::derivable_impls)]
#![allow(clippy::needless_return)]

// ============================================================================
// Core Modules
// ============================================================================

/// Parser module: lexer, parser, types and type validation
pub mod parser;

/// Compilation session shared by every module of one build
pub mod compiler;

/// Compiler options, loaded from `lorraine.toml`
pub mod config;

/// Error rendering
pub mod diagnostic;

/// Backend-facing interface
pub mod lowering;

// ============================================================================
// Re-exports
// ============================================================================

pub use compiler::{CompileError, Compiler};
pub use config::{Config, ConfigError};
pub use diagnostic::DiagnosticSink;
pub use lowering::{ExternCollector, ExternSymbol, Lowering};

pub use parser::{
    Lexer, Location, Parser, Position, SyntaxError, Token, TokenKind, Type, TypeContext, TypeId,
    TypeValidator,
};
