//! Type annotation parsing, rendering and compatibility.

use lorraine_engine::parser::ast::Statement;
use lorraine_engine::parser::types::{Property, Type};
use lorraine_engine::{Compiler, Config, TypeContext};

/// Parse `local x: <annotation>` and render the declared type
fn annotation(annotation: &str) -> String {
    annotation_with(annotation, Config::default())
}

fn annotation_with(annotation: &str, config: Config) -> String {
    let mut compiler = Compiler::buffered(config);
    let source = format!("local x: {}", annotation);
    let module = compiler
        .parse("types.lua", &source)
        .unwrap_or_else(|| panic!("{:?}: {:?}", annotation, compiler.reported()));

    match &module.statements()[0] {
        Statement::Local(local) => {
            let variable = compiler.variables.get(local.variables[0]).unwrap();
            compiler.types.display(variable.ty)
        }
        other => panic!("expected a local, got {:?}", other),
    }
}

fn annotation_error(source: &str) -> String {
    let mut compiler = Compiler::buffered(Config::default());
    assert!(compiler.parse("types.lua", source).is_none(), "{:?} parsed", source);
    compiler.reported()[0].message.clone()
}

// Annotations

#[test]
fn test_primitive_annotations() {
    for name in ["string", "number", "boolean", "any", "void", "nil"] {
        assert_eq!(annotation(name), name);
    }
}

#[test]
fn test_array_annotations() {
    assert_eq!(annotation("number[]"), "number[]");
    assert_eq!(annotation("string[][]"), "string[][]");
    assert_eq!(annotation("{ x: number }[]"), "{ x: number }[]");
}

#[test]
fn test_table_annotations() {
    assert_eq!(
        annotation("{ x: number, label?: string }"),
        "{ x: number, label?: string }"
    );
    assert_eq!(annotation("{ a: number; b: boolean; }"), "{ a: number, b: boolean }");
    assert_eq!(annotation("{}"), "{}");
    assert_eq!(
        annotation("{ inner: { deep: string[] } }"),
        "{ inner: { deep: string[] } }"
    );
}

#[test]
fn test_function_annotations() {
    assert_eq!(annotation("(number, string) => boolean"), "(number, string): boolean");
    assert_eq!(annotation("() => void"), "(): void");
    assert_eq!(annotation("() => (number, string)"), "(): number, string");
    assert_eq!(annotation("(...string) => number"), "(...string): number");
    assert_eq!(
        annotation("(number) => (string) => boolean"),
        "(number): (string): boolean"
    );
}

#[test]
fn test_vararg_annotations() {
    assert_eq!(annotation("(...) => void"), "(...any): void");
    assert_eq!(annotation("(number, ...number[]) => void"), "(number, ...number[]): void");
}

#[test]
fn test_typeless_function_annotation() {
    assert_eq!(
        annotation_error("local f: (number)"),
        "missing return type annotation for function"
    );
    assert_eq!(
        annotation_with("(number)", Config::default().with_typeless_functions(true)),
        "(number): any"
    );
}

#[test]
fn test_vararg_must_be_last() {
    assert_eq!(
        annotation_error("local f: (...number, string) => void"),
        "vararg must be the last type in a type list"
    );
}

#[test]
fn test_unknown_type() {
    assert_eq!(
        annotation_error("local x: Point"),
        "the type 'Point' does not exist in the current context"
    );
}

#[test]
fn test_type_alias_is_resolved() {
    let mut compiler = Compiler::buffered(Config::default());
    let module = compiler
        .parse(
            "types.lua",
            "type Point = { x: number, y: number }\nlocal p: Point[]",
        )
        .unwrap();

    let Statement::Local(local) = &module.statements()[1] else {
        panic!("expected a local");
    };
    let ty = compiler.variables.get(local.variables[0]).unwrap().ty;
    assert_eq!(compiler.types.display(ty), "{ x: number, y: number }[]");
}

// Interfaces

#[test]
fn test_interface_annotation() {
    let mut compiler = Compiler::buffered(Config::default());
    let module = compiler
        .parse(
            "types.lua",
            "interface Named { name: string; nick?: string }\nlocal n: Named",
        )
        .unwrap();

    let Statement::Local(local) = &module.statements()[1] else {
        panic!("expected a local");
    };
    let ty = compiler.variables.get(local.variables[0]).unwrap().ty;
    assert_eq!(compiler.types.display(ty), "Named");
    match compiler.types.get(ty) {
        Some(Type::Interface(interface)) => {
            assert_eq!(interface.properties.len(), 2);
            assert!(interface.properties[1].optional);
        }
        other => panic!("expected an interface, got {:?}", other),
    }
}

#[test]
fn test_generic_interface_instantiation() {
    let mut compiler = Compiler::buffered(Config::default());
    let module = compiler
        .parse(
            "types.lua",
            "interface Pair<K, V> { key: K, value: V[] }\nlocal p: Pair<string, number>",
        )
        .unwrap();

    let Statement::Local(local) = &module.statements()[1] else {
        panic!("expected a local");
    };
    let ty = compiler.variables.get(local.variables[0]).unwrap().ty;
    assert_eq!(compiler.types.display(ty), "Pair<string, number>");

    let Some(Type::Interface(interface)) = compiler.types.get(ty) else {
        panic!("expected an interface");
    };
    let rendered: Vec<String> = interface
        .properties
        .iter()
        .map(|p| format!("{}: {}", p.name, compiler.types.display(p.ty)))
        .collect();
    assert_eq!(rendered, ["key: string", "value: number[]"]);
}

#[test]
fn test_generic_parameters_are_scoped_to_the_interface() {
    assert_eq!(
        annotation_error("interface Box<T> { value: T }\nlocal t: T"),
        "the type 'T' does not exist in the current context"
    );
}

#[test]
fn test_generic_argument_count() {
    assert_eq!(
        annotation_error("interface Box<T> { value: T }\nlocal b: Box<number, string>"),
        "interface 'Box' expects 1 type arguments, got 2"
    );
}

#[test]
fn test_type_arguments_on_non_generic() {
    assert_eq!(
        annotation_error("local b: number<string>"),
        "the type 'number' does not take type arguments"
    );
}

// Compatibility through the public context

#[test]
fn test_compatibility_is_directional() {
    let mut ctx = TypeContext::new();
    let number = ctx.number_type();
    let string = ctx.string_type();

    let point = ctx.table_type(vec![
        Property::new("x", number, false),
        Property::new("y", number, false),
    ]);
    let point3 = ctx.table_type(vec![
        Property::new("x", number, false),
        Property::new("y", number, false),
        Property::new("z", number, false),
    ]);
    let labelled = ctx.table_type(vec![
        Property::new("x", number, false),
        Property::new("y", number, false),
        Property::new("label", string, true),
    ]);

    assert!(ctx.is(point, point3));
    assert!(!ctx.is(point3, point));
    assert!(ctx.is(labelled, point));
    assert!(ctx.is(point, labelled));

    let points = ctx.array_type(point);
    let points3 = ctx.array_type(point3);
    assert!(ctx.is(points, points3));
    assert!(!ctx.is(points3, points));
}

#[test]
fn test_interning_shares_ids() {
    let mut ctx = TypeContext::new();
    let number = ctx.number_type();
    let a = ctx.function_type(vec![number], vec![number]);
    let b = ctx.function_type(vec![number], vec![number]);
    let c = ctx.function_type(vec![number], vec![]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(ctx.display(c), "(number): void");
}
