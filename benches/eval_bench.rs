use criterion::{Criterion, black_box, criterion_group, criterion_main};
use diylisp::{Environment, Interpreter, Symbol, Value, evaluate, parse};

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn bench_parse_deep_nesting(c: &mut Criterion) {
    // (+ (+ (+ ... (+ 1 1) ...) 1) 1)
    let mut expr = String::from("1");
    for _ in 0..100 {
        expr = format!("(+ {expr} 1)");
    }

    c.bench_function("parse deep nesting (100 levels)", |b| {
        b.iter(|| black_box(parse(&expr).unwrap()))
    });
}

// ============================================================================
// Evaluation Benchmarks
// ============================================================================

fn bench_arithmetic(c: &mut Criterion) {
    let env = Environment::new();
    let expr = parse("(+ (* 3 4) (- 10 (/ 8 2)))").unwrap();
    c.bench_function("eval arithmetic", |b| {
        b.iter(|| black_box(evaluate(&expr, &env).unwrap()))
    });
}

fn bench_fibonacci(c: &mut Criterion) {
    let env = Environment::new();
    let mut interp = Interpreter::default();
    interp
        .eval_source(
            "(define fib
               (lambda (n)
                 (if (> 2 n) n (+ (fib (- n 1)) (fib (- n 2))))))",
            &env,
        )
        .unwrap();
    let expr = parse("(fib 15)").unwrap();

    c.bench_function("eval fib 15", |b| {
        b.iter(|| black_box(interp.eval(&expr, &env).unwrap()))
    });
}

fn bench_lookup_through_frames(c: &mut Criterion) {
    let root = Environment::new();
    root.define(Symbol::new("target"), Value::Integer(1)).unwrap();
    let mut env = root.clone();
    for i in 0..50 {
        env = env.extend([(Symbol::new(&format!("v{i}")), Value::Integer(i))]);
    }
    let target = Symbol::new("target");

    c.bench_function("lookup through 50 frames", |b| {
        b.iter(|| black_box(env.lookup(target).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_parse_deep_nesting,
    bench_arithmetic,
    bench_fibonacci,
    bench_lookup_through_frames
);
criterion_main!(benches);
