//! Backend-facing interface
//!
//! Code generators consume a validated [`Module`] through the [`Lowering`]
//! trait. No backend lives in this crate; [`ExternCollector`] gathers the
//! externally linked symbols every backend has to declare first.

use crate::compiler::Compiler;
use crate::parser::ast::*;
use crate::parser::symbols::VariableId;
use crate::parser::token::Location;
use crate::parser::types::TypeId;

/// A backend that turns a validated module into its target representation
pub trait Lowering {
    type Output;
    type Error;

    /// Lower `module`. The compiler session provides the type and variable
    /// arenas the module's ids refer to.
    fn lower(&mut self, module: &mut Module, compiler: &Compiler) -> Result<Self::Output, Self::Error>;
}

/// One externally linked symbol
#[derive(Debug, Clone, PartialEq)]
pub struct ExternSymbol {
    pub name: String,
    pub variable: VariableId,
    pub ty: TypeId,
    pub location: Location,
}

/// Collects `extern` declarations in source order
pub struct ExternCollector<'a> {
    compiler: &'a Compiler,
    symbols: Vec<ExternSymbol>,
}

impl<'a> ExternCollector<'a> {
    pub fn new(compiler: &'a Compiler) -> Self {
        Self {
            compiler,
            symbols: Vec::new(),
        }
    }

    /// Collect the externs declared directly in `module` (not in the modules
    /// it imports)
    pub fn collect(compiler: &'a Compiler, module: &mut Module) -> Vec<ExternSymbol> {
        let mut collector = Self::new(compiler);
        module.visit(&mut collector);
        collector.symbols
    }

    fn push(&mut self, variable: VariableId, location: Location) {
        if let Some(declared) = self.compiler.variables.get(variable) {
            self.symbols.push(ExternSymbol {
                name: declared.name.clone(),
                variable,
                ty: declared.ty,
                location,
            });
        }
    }
}

impl Visitor for ExternCollector<'_> {
    fn visit_external_declaration(&mut self, stmt: &mut ExternalDeclaration) -> Traversal {
        self.push(stmt.variable, stmt.location);
        Traversal::Skip
    }

    fn visit_extern_item(&mut self, stmt: &mut ExternItem) -> Traversal {
        self.push(stmt.prototype.variable, stmt.location);
        Traversal::Skip
    }

    fn visit_import(&mut self, _stmt: &mut Import) -> Traversal {
        Traversal::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_collects_externs_in_order() {
        let mut compiler = Compiler::buffered(Config::default());
        let mut module = compiler
            .compile(
                "main.lua",
                "extern function puts(s: string): number\n\
                 extern stdout: any\n\
                 do\n  extern function exit(code: number): void\nend\n",
            )
            .unwrap();

        let symbols = ExternCollector::collect(&compiler, &mut module);
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["puts", "stdout", "exit"]);
        assert_eq!(compiler.types.display(symbols[0].ty), "(string): number");
        assert_eq!(compiler.types.display(symbols[2].ty), "(number): void");
    }

    struct CountingBackend;

    impl Lowering for CountingBackend {
        type Output = usize;
        type Error = String;

        fn lower(&mut self, module: &mut Module, compiler: &Compiler) -> Result<usize, String> {
            Ok(ExternCollector::collect(compiler, module).len())
        }
    }

    #[test]
    fn test_lowering_trait_object() {
        let mut compiler = Compiler::buffered(Config::default());
        let mut module = compiler
            .compile("main.lua", "extern function puts(s: string): void\nputs \"hi\"\n")
            .unwrap();

        let mut backend = CountingBackend;
        assert_eq!(backend.lower(&mut module, &compiler), Ok(1));
    }
}
