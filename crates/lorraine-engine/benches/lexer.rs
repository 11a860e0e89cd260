use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lorraine_engine::parser::Lexer;
use lorraine_engine::{Compiler, Config};

fn lex(source: &str) -> usize {
    Lexer::new(source)
        .and_then(|lexer| lexer.tokenize())
        .map(|tokens| tokens.len())
        .unwrap()
}

fn bench_keywords(c: &mut Criterion) {
    let source = "local function extern import export from type interface do end nil true false";

    c.bench_function("lex_keywords", |b| {
        b.iter(|| lex(black_box(source)));
    });
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let short = r#""hello" 'world' "tab\there" "quote\"test""#;
    group.bench_with_input(BenchmarkId::new("short", "escapes"), &short, |b, source| {
        b.iter(|| lex(black_box(source)));
    });

    let long = "[==[\nfirst line\nsecond ]] line\n]==] --[[ a long\ncomment ]] [[x]]";
    group.bench_with_input(BenchmarkId::new("long", "brackets"), &long, |b, source| {
        b.iter(|| lex(black_box(source)));
    });

    group.finish();
}

fn module_source(declarations: usize) -> String {
    let mut source = String::from(
        "interface Point { x: number, y: number, label?: string }\n\
         extern function printf(format: string, ...): number\n",
    );
    for i in 0..declarations {
        source.push_str(&format!(
            "-- declaration {i}\n\
             local p{i}: Point = {{ x = {i}, y = 0x{i:x}, label = \"p{i}\" }}\n\
             local xs{i}: number[] = {{ 1, 2.5, 3e2 }}\n\
             printf(\"%d\", p{i}.x)\n"
        ));
    }
    source
}

fn bench_module(c: &mut Criterion) {
    let mut group = c.benchmark_group("module");

    for declarations in [10, 100, 1000] {
        let source = module_source(declarations);
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::new("lex", declarations), &source, |b, source| {
            b.iter(|| lex(black_box(source)));
        });

        group.bench_with_input(
            BenchmarkId::new("compile", declarations),
            &source,
            |b, source| {
                b.iter(|| {
                    let mut compiler = Compiler::buffered(Config::default());
                    compiler.compile("bench.lua", black_box(source)).unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_keywords, bench_strings, bench_module);
criterion_main!(benches);
