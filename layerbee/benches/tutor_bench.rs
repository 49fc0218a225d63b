//! Benchmarks for the tutor flow and the answer formatter.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use layerbee::filter::validate_chat_message;
use layerbee::testing::{ScriptedEngine, StaticProgress};
use layerbee::tutor::{markdown, Tutor};
use std::sync::Arc;

const ANSWER: &str = "**Stringing?** Try these:\n\n\
- Lower the temperature by `5°C`\n\
- Increase retraction distance\n\
- Turn on **wipe** in the slicer\n\n\
```gcode\nG10 ; retract\n```\n\
Happy printing!";

fn markdown_benchmark(c: &mut Criterion) {
    c.bench_function("markdown_render", |b| {
        b.iter(|| markdown::render(black_box(ANSWER)));
    });
}

fn filter_benchmark(c: &mut Criterion) {
    c.bench_function("chat_filter", |b| {
        b.iter(|| validate_chat_message(black_box("Why does my first layer peel off the bed?")));
    });
}

fn tutor_benchmark(c: &mut Criterion) {
    let Ok(rt) = tokio::runtime::Runtime::new() else {
        return;
    };
    let tutor = Tutor::new(
        Arc::new(ScriptedEngine::always(ANSWER)),
        Arc::new(StaticProgress::default()),
    );

    c.bench_function("tutor_ask", |b| {
        b.iter(|| rt.block_on(tutor.ask(black_box("Why is my print stringing?"))));
    });
}

criterion_group!(benches, markdown_benchmark, filter_benchmark, tutor_benchmark);
criterion_main!(benches);
