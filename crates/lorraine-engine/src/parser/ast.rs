//! Abstract Syntax Tree (AST) for Lua++.
//!
//! This module defines the complete AST structure, including:
//! - Module and block structure
//! - Statements (local assignments, imports, exports, externs)
//! - Expressions (literals, references, calls, indexing, constructors)
//!
//! Every AST node includes a `Location`, and every expression carries the
//! `TypeId` inferred for it (`any` until the parser or validator assigns one).

use crate::parser::symbols::Scope;
use crate::parser::token::Location;
use std::path::{Path, PathBuf};

// Re-export submodules
pub mod expression;
pub mod statement;
pub mod visitor;

pub use expression::*;
pub use statement::*;
pub use visitor::*;

/// Where a module came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Directory imports are resolved against
    pub directory: PathBuf,
    pub filename: String,
    /// File name without extension
    pub name: String,
    pub source: String,
}

impl ModuleInfo {
    /// Source file extension appended to import paths
    pub const EXTENSION: &'static str = "lua";

    pub fn new(path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        let path = path.as_ref();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());

        Self {
            directory,
            filename,
            name,
            source: source.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// The module's path made absolute against the working directory
    pub fn absolute(&self) -> PathBuf {
        let path = self.path();
        std::path::absolute(&path).unwrap_or(path)
    }

    /// File an import path refers to, relative to this module.
    ///
    /// Only `.`-prefixed relative paths are supported.
    pub fn resolve_import(&self, module_path: &str) -> Option<PathBuf> {
        if !module_path.starts_with('.') {
            return None;
        }
        let relative = module_path.strip_prefix("./").unwrap_or(module_path);
        if relative.is_empty() {
            return None;
        }
        Some(
            self.directory
                .join(format!("{}.{}", relative, Self::EXTENSION)),
        )
    }
}

/// Root node: one compiled source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub info: ModuleInfo,
    pub body: Block,
}

impl Module {
    pub fn new(info: ModuleInfo, body: Block) -> Self {
        Self { info, body }
    }

    pub fn location(&self) -> Location {
        self.body.location
    }

    /// Top-level statements
    pub fn statements(&self) -> &[Statement] {
        &self.body.body
    }

    pub fn visit<V: Visitor>(&mut self, visitor: &mut V) {
        walk_module(visitor, self);
    }
}

/// A lexical scope: its statements plus the symbol tables declared in it
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Statement>,
    pub scope: Scope,
    pub location: Location,
}

impl Block {
    pub fn new(body: Vec<Statement>, scope: Scope, location: Location) -> Self {
        Self {
            body,
            scope,
            location,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_info_from_path() {
        let info = ModuleInfo::new("src/game/main.lua", "");
        assert_eq!(info.directory, PathBuf::from("src/game"));
        assert_eq!(info.filename, "main.lua");
        assert_eq!(info.name, "main");
        assert!(info.absolute().is_absolute());
    }

    #[test]
    fn test_resolve_import() {
        let info = ModuleInfo::new("src/main.lua", "");
        assert_eq!(
            info.resolve_import("./util"),
            Some(PathBuf::from("src/util.lua"))
        );
        assert_eq!(
            info.resolve_import("../shared/math"),
            Some(PathBuf::from("src/../shared/math.lua"))
        );
        assert_eq!(info.resolve_import("socket"), None);
        assert_eq!(info.resolve_import("./"), None);
    }
}
