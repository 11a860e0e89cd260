//! Lua++ front end: lexer, parser, types and type validation.
//!
//! # Example
//!
//! ```ignore
//! use lorraine_engine::parser::Lexer;
//!
//! let tokens = Lexer::new("local x: number = 1")?.tokenize()?;
//! for token in &tokens {
//!     println!("{:?} at {}", token.kind, token.location.start);
//! }
//! ```

pub mod token;
pub mod lexer;
pub mod error;
pub mod ast;
pub mod symbols;
pub mod parser;

// Type algebra
pub mod types;

// Type validation
pub mod checker;

pub use token::{Location, Position, Token, TokenKind};
pub use lexer::Lexer;
pub use error::SyntaxError;
pub use parser::Parser;
pub use types::{Type, TypeContext, TypeId};
pub use checker::TypeValidator;
