//! Benchmarks for examsplit segmentation performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks test the segmentation fold and the marker patterns
//! with synthetic label data, independent of PDF parsing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examsplit::model::{LabelMatch, LabelStore};
use examsplit::segment::{PageGeometry, PatternSet, Reducer};

/// Creates a synthetic label store for an exam with one question every
/// two pages, plus headers, footers, and a closing section marker.
fn create_label_store(question_count: usize) -> (LabelStore, usize) {
    let page_count = question_count * 2 + 1;
    let mut labels = LabelStore::default();

    for i in 0..question_count {
        let page = i * 2;
        labels.question.push(LabelMatch::new(
            72.0,
            200.0,
            700.0,
            688.0,
            page,
            (i + 1).to_string(),
        ));
        labels.question_continued.push(LabelMatch::new(
            72.0,
            300.0,
            780.0,
            768.0,
            page + 1,
            (i + 1).to_string(),
        ));
    }
    for page in 0..page_count {
        labels
            .header
            .push(LabelMatch::new(55.0, 250.0, 820.0, 808.0, page, "Specialist"));
        labels
            .next_page
            .push(LabelMatch::new(250.0, 350.0, 50.0, 38.0, page, "next"));
    }
    labels.end_of_section.push(LabelMatch::new(
        200.0,
        350.0,
        400.0,
        388.0,
        page_count - 1,
        "of",
    ));

    (labels, page_count)
}

/// Benchmark the segmentation fold at various exam sizes.
fn bench_reducer(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducer");

    for question_count in [5, 20, 100].iter() {
        let (labels, page_count) = create_label_store(*question_count);
        let geometry = PageGeometry::from_labels(&labels).unwrap();

        group.bench_function(format!("{}_questions", question_count), |b| {
            b.iter(|| {
                Reducer::new(black_box(&labels), &geometry, page_count)
                    .run()
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark viewport geometry derivation.
fn bench_geometry(c: &mut Criterion) {
    let (labels, _) = create_label_store(50);

    c.bench_function("geometry_from_labels", |b| {
        b.iter(|| PageGeometry::from_labels(black_box(&labels)).unwrap());
    });
}

/// Benchmark marker pattern matching over typical page lines.
fn bench_patterns(c: &mut Criterion) {
    let patterns = PatternSet::default();
    let lines = [
        "Specialist Mathematics Units 3 & 4",
        "Question 7 (12 marks)",
        "Question 7 continued",
        "f(x) = 3x^2 - 2x + 1 for x in [0, 4]",
        "See next page",
        "End of Section A",
    ];

    c.bench_function("pattern_match_lines", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(patterns.question.match_line(black_box(line)));
                black_box(patterns.question_continued.match_line(black_box(line)));
                black_box(patterns.next_page.match_line(black_box(line)));
                black_box(patterns.end_of_section.match_line(black_box(line)));
            }
        });
    });
}

/// Benchmark pattern set compilation (done once per segmentation run).
fn bench_pattern_compilation(c: &mut Criterion) {
    c.bench_function("pattern_set_new", |b| {
        b.iter(|| PatternSet::new(black_box("Specialist")));
    });
}

criterion_group!(
    benches,
    bench_reducer,
    bench_geometry,
    bench_patterns,
    bench_pattern_compilation,
);
criterion_main!(benches);
