//! Benchmarks for controller setup and scrolling.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use showcase::app::{App, Message, update};
use showcase::demo::build_sample_page;
use showcase::dom::Document;

fn sample_document(sections: usize) -> Document {
    let mut doc = Document::new();
    build_sample_page(&mut doc, sections);
    doc
}

fn bench_attach_small(c: &mut Criterion) {
    let app = App::new(800.0);
    c.bench_function("attach_10_sections", |b| {
        b.iter_batched(
            || sample_document(10),
            |doc| app.attach(black_box(doc)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_attach_large(c: &mut Criterion) {
    let app = App::new(800.0);
    c.bench_function("attach_200_sections", |b| {
        b.iter_batched(
            || sample_document(200),
            |doc| app.attach(black_box(doc)),
            BatchSize::LargeInput,
        )
    });
}

fn bench_scroll_through(c: &mut Criterion) {
    let app = App::new(800.0);
    c.bench_function("scroll_through_50_sections", |b| {
        b.iter_batched(
            || app.attach(sample_document(50)),
            |mut model| {
                let total = model.viewport.total_height();
                let mut offset = 0.0;
                while offset < total {
                    model = update(model, Message::ScrollTo(black_box(offset)));
                    offset += 400.0;
                }
                model
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_attach_small,
    bench_attach_large,
    bench_scroll_through
);
criterion_main!(benches);
