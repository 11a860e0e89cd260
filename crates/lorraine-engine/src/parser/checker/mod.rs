//! Lua++ type validation
//!
//! Runs after parsing. Names are already resolved by the parser, so this pass
//! only has to:
//! - check `local` arity and declared types
//! - infer table and array constructor types
//! - check calls, field access and indexing

pub mod validator;

pub use validator::TypeValidator;
