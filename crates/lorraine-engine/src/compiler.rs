//! Compilation session
//!
//! A [`Compiler`] owns everything shared by the modules of one compilation:
//! the configuration, the type arena, the variable arena, the stack of
//! modules currently being loaded (for import cycle detection) and the
//! errors reported so far.

use crate::config::Config;
use crate::diagnostic::{self, DiagnosticSink};
use crate::parser::ast::{Module, ModuleInfo};
use crate::parser::checker::TypeValidator;
use crate::parser::error::SyntaxError;
use crate::parser::parser::Parser;
use crate::parser::symbols::VariableArena;
use crate::parser::types::TypeContext;
use log::{debug, error};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a file-level compilation
#[derive(Debug, Error)]
pub enum CompileError {
    /// The root file could not be read
    #[error("unable to open file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A syntax, resolution or type error, already reported
    #[error("{0}")]
    Syntax(SyntaxError),
}

/// Shared state of one compilation
#[derive(Debug)]
pub struct Compiler {
    pub config: Config,
    pub types: TypeContext,
    pub variables: VariableArena,
    /// Canonical paths of the modules being parsed, outermost first
    loading: Vec<PathBuf>,
    reported: Vec<SyntaxError>,
    sink: DiagnosticSink,
}

impl Compiler {
    /// Create a session that writes errors to stderr
    pub fn new(config: Config) -> Self {
        Self::with_sink(config, DiagnosticSink::stderr())
    }

    /// Create a session that writes errors to `sink`
    pub fn with_sink(config: Config, sink: DiagnosticSink) -> Self {
        Self {
            config,
            types: TypeContext::new(),
            variables: VariableArena::new(),
            loading: Vec::new(),
            reported: Vec::new(),
            sink,
        }
    }

    /// Create a session that collects rendered errors in memory, see
    /// [`Compiler::output`]
    pub fn buffered(config: Config) -> Self {
        Self::with_sink(config, DiagnosticSink::buffer())
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Parse `source` as the module at `path`, reporting the first error.
    pub fn parse(&mut self, path: impl AsRef<Path>, source: &str) -> Option<Module> {
        let path = path.as_ref();
        self.loading.push(module_key(path));
        let result = Parser::new(path, source, self).and_then(Parser::try_parse);
        self.loading.pop();

        match result {
            Ok(module) => Some(module),
            Err(error) => {
                self.report(&ModuleInfo::new(path, source), &error);
                None
            }
        }
    }

    /// Type-check a parsed module, reporting the first error.
    pub fn validate(&mut self, module: &mut Module) -> bool {
        debug!("validating module '{}'", module.info.path().display());

        let mut validator = TypeValidator::new(&mut self.types, &self.variables, &self.config);
        module.visit(&mut validator);

        match validator.finish() {
            Ok(()) => true,
            Err(error) => {
                self.report(&module.info, &error);
                false
            }
        }
    }

    /// Parse then validate.
    pub fn compile(&mut self, path: impl AsRef<Path>, source: &str) -> Option<Module> {
        let mut module = self.parse(path, source)?;
        self.validate(&mut module).then_some(module)
    }

    /// Read, parse and validate the file at `path`.
    pub fn compile_file(&mut self, path: impl AsRef<Path>) -> Result<Module, CompileError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let before = self.reported.len();
        self.compile(path, &source).ok_or_else(|| {
            let error = self.reported[before..]
                .first()
                .cloned()
                .unwrap_or_else(|| SyntaxError::new(Default::default(), "compilation failed"));
            CompileError::Syntax(error)
        })
    }

    /// Parse and validate an imported module.
    ///
    /// The caller has already checked for cycles and read the file.
    pub(crate) fn load_module(&mut self, path: &Path, source: &str) -> Option<Module> {
        debug!("loading module '{}'", path.display());
        self.compile(path, source)
    }

    /// Whether the module at `path` is already being parsed
    pub(crate) fn is_loading(&self, path: &Path) -> bool {
        let key = module_key(path);
        self.loading.contains(&key)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Record an error and write it to the diagnostic sink.
    pub fn report(&mut self, info: &ModuleInfo, error: &SyntaxError) {
        error!("{}", diagnostic::header(info, error));
        self.reported.push(error.clone());

        if let Err(io_error) =
            diagnostic::emit(&mut self.sink, info, error, self.config.detailed_errors)
        {
            debug!("unable to write diagnostic: {}", io_error);
        }
    }

    /// Every error reported in this session, in order
    pub fn reported(&self) -> &[SyntaxError] {
        &self.reported
    }

    /// Rendered diagnostics, when the session was created with
    /// [`Compiler::buffered`]
    pub fn output(&self) -> Option<String> {
        self.sink.contents()
    }
}

/// Identity of a module file: its canonical path when it exists, otherwise
/// its absolute path.
fn module_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
