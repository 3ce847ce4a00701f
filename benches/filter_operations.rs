//! Benchmarks for token decoding, encoding and predicate compilation.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use attrfilter::query::{
    Combinator, Decoder, FilterClause, ParamStyle, PredicateCompiler, QueryValues, decode,
    encode,
};

const TOKENS: [&str; 5] = [
    "metadata",
    "metadata~rack",
    "metadata~owner.team~eq~infra",
    "metadata~name~like~web",
    "metadata~hardware.cpu.cores~gt~8",
];

/// Build a query string with `count` filter tokens.
fn query_string(count: usize) -> String {
    (0..count)
        .map(|i| format!("attr=ns~k{}.v~eq~value_{}", i, i))
        .collect::<Vec<_>>()
        .join("&")
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for token in TOKENS {
        group.bench_with_input(BenchmarkId::new("token", token), token, |b, token| {
            b.iter(|| decode(black_box(token)))
        });
    }

    let strict = Decoder::strict();
    group.bench_function("strict_comparison", |b| {
        b.iter(|| strict.decode(black_box("metadata~hardware.cpu.cores~lt~64")))
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let clauses: Vec<FilterClause> = TOKENS.iter().map(|t| decode(t).unwrap()).collect();

    c.bench_function("encode/all_shapes", |b| {
        b.iter(|| {
            for clause in &clauses {
                black_box(encode(black_box(clause)));
            }
        })
    });
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for style in [ParamStyle::Dollar, ParamStyle::Question] {
        let compiler = PredicateCompiler::new().param_style(style);
        let clause = decode("metadata~hardware.cpu.cores~gt~8").unwrap();
        group.bench_function(format!("{:?}", style), |b| {
            b.iter(|| compiler.compile(black_box(&clause), "servers"))
        });
    }

    group.finish();
}

fn bench_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("request");
    let compiler = PredicateCompiler::new();
    let decoder = Decoder::new();

    for count in [1, 5, 20] {
        let query = query_string(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("parse_and_compile", count), &query, |b, q| {
            b.iter(|| {
                let values = QueryValues::parse(black_box(q));
                let clauses = values.decode_filters(&decoder, "attr").unwrap();
                compiler.compile_all(&clauses, "servers", Combinator::All)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_compile, bench_request);
criterion_main!(benches);
