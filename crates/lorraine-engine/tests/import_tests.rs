//! Multi-module compilation: import resolution, export lookup and cycles.

use lorraine_engine::parser::ast::*;
use lorraine_engine::{CompileError, Compiler, Config, SyntaxError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write `files` into a fresh directory
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
    }
    dir
}

fn compile_main(dir: &Path) -> (Compiler, Result<Module, CompileError>) {
    init_logging();
    let mut compiler = Compiler::buffered(Config::default().with_detailed_errors(false));
    let result = compiler.compile_file(dir.join("main.lua"));
    (compiler, result)
}

fn syntax_error(result: Result<Module, CompileError>) -> SyntaxError {
    match result {
        Err(CompileError::Syntax(error)) => error,
        Err(other) => panic!("expected a syntax error, got {}", other),
        Ok(module) => panic!("expected an error, got {:?}", module.statements()),
    }
}

fn absolute(path: PathBuf) -> String {
    std::path::absolute(&path).unwrap_or(path).display().to_string()
}

#[test]
fn test_import_variables_and_types() {
    let dir = project(&[
        (
            "math.lua",
            "export local pi: number = 3.14\n\
             export type Point = { x: number, y: number }\n\
             local private = 1",
        ),
        (
            "main.lua",
            "import { pi, Point } from \"./math\"\n\
             local p: Point = { x = pi, y = 2 }\n\
             local twice: number = pi",
        ),
    ]);

    let (compiler, result) = compile_main(dir.path());
    let module = result.unwrap_or_else(|err| panic!("{}: {:?}", err, compiler.reported()));

    let Statement::Import(import) = &module.statements()[0] else {
        panic!("expected an import");
    };
    assert_eq!(import.module.info.filename, "math.lua");
    assert_eq!(import.module.info.name, "math");

    // Imported variables alias the exporting module's variable
    let exported = import.module.body.scope.export_variables["pi"];
    let Expression::Variable(reference) = &import.names[0] else {
        panic!("expected a variable reference");
    };
    assert_eq!(reference.variable, exported);

    let Expression::TypeWrapper(wrapper) = &import.names[1] else {
        panic!("expected a type wrapper");
    };
    assert_eq!(wrapper.name, "Point");
    assert_eq!(compiler.types.display(wrapper.ty), "{ x: number, y: number }");
    assert!(compiler.reported().is_empty());
}

#[test]
fn test_import_from_subdirectory() {
    let dir = project(&[
        ("lib/strings.lua", "export local greeting: string = \"hi\""),
        (
            "main.lua",
            "import { greeting } from \"./lib/strings\"\nlocal g: string = greeting",
        ),
    ]);

    let (_, result) = compile_main(dir.path());
    assert!(result.is_ok());
}

#[test]
fn test_nested_imports() {
    let dir = project(&[
        ("base.lua", "export type Id = number"),
        (
            "middle.lua",
            "import { Id } from \"./base\"\nexport local first: Id = 1",
        ),
        (
            "main.lua",
            "import { first } from \"./middle\"\nlocal n: number = first",
        ),
    ]);

    let (_, result) = compile_main(dir.path());
    assert!(result.is_ok());
}

#[test]
fn test_same_module_imported_twice() {
    let dir = project(&[
        ("shared.lua", "export local value: number = 1"),
        (
            "main.lua",
            "import { value } from \"./shared\"\ndo\n  import { value } from \"./shared\"\nend",
        ),
    ]);

    // Only cycles are rejected, not repeated imports
    let (_, result) = compile_main(dir.path());
    assert!(result.is_ok());
}

#[test]
fn test_import_type_conflicts_with_local_type() {
    let dir = project(&[
        ("shapes.lua", "export type Shape = { sides: number }"),
        (
            "main.lua",
            "type Shape = string\nimport { Shape } from \"./shapes\"",
        ),
    ]);

    let (_, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(err.message, "the type 'Shape' is already defined in this scope");
}

#[test]
fn test_missing_module_file() {
    let dir = project(&[("main.lua", "import { x } from \"./nope\"")]);

    let (compiler, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(
        err.message,
        format!("unable to open file '{}'", absolute(dir.path().join("nope.lua")))
    );
    // Located at the module path string
    assert_eq!(err.location.start.column, 18);
    assert_eq!(compiler.reported().len(), 1);
}

#[test]
fn test_missing_export() {
    let dir = project(&[
        ("math.lua", "local hidden: number = 1\nexport local shown: number = 2"),
        ("main.lua", "import { shown, hidden } from \"./math\""),
    ]);

    let (_, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(err.message, "unable to find export of 'hidden' in math.lua");
    assert_eq!(err.location.start.column, 16);
}

#[test]
fn test_non_relative_module_path() {
    let dir = project(&[("main.lua", "import { x } from \"math\"")]);

    let (_, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(
        err.message,
        "There was an issue parsing the module name. Use './' for local files."
    );
}

#[test]
fn test_circular_import() {
    let dir = project(&[
        ("main.lua", "import { b } from \"./other\"\nexport local a: number = 1"),
        ("other.lua", "import { a } from \"./main\"\nexport local b: number = 2"),
    ]);

    let (compiler, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(
        err.message,
        format!("circular import of '{}'", absolute(dir.path().join("main.lua")))
    );

    // The importer then fails at its own import site
    let reported = compiler.reported();
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[1].message, "failed to load module './other'");
}

#[test]
fn test_self_import() {
    let dir = project(&[("main.lua", "import { a } from \"./main\"\nexport local a = 1")]);

    let (_, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert!(err.message.starts_with("circular import of '"), "{}", err.message);
}

#[test]
fn test_failing_nested_module() {
    let dir = project(&[
        ("broken.lua", "export local n: number = \"not a number\""),
        ("main.lua", "local ok = 1\nimport { n } from \"./broken\""),
    ]);

    let (compiler, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(
        err.message,
        "unable to assign variable of type 'number' a value of type 'string'"
    );

    let reported = compiler.reported();
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[1].message, "failed to load module './broken'");
    assert_eq!(reported[1].location.start.line, 2);

    // Each error names the file it was raised in
    let output = compiler.output().unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("broken.lua:1:"), "{}", lines[0]);
    assert!(lines[1].contains("main.lua:2:"), "{}", lines[1]);
}

#[test]
fn test_import_only_in_scope_where_it_appears() {
    let dir = project(&[
        ("shared.lua", "export local value: number = 1"),
        (
            "main.lua",
            "do\n  import { value } from \"./shared\"\nend\nlocal v = value",
        ),
    ]);

    let (_, result) = compile_main(dir.path());
    let err = syntax_error(result);
    assert_eq!(err.message, "unknown identifier 'value'");
}
