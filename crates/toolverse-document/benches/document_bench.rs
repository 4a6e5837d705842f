// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for toolverse-document: page-range parsing and PDF
// reassembly on generated documents.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use toolverse_document::PdfReader;
use toolverse_document::pdf::fixtures::sample_pdf;
use toolverse_document::pdf::{ops, parse_page_ranges};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A messy range string over a long document, including an oversized range
/// that must be clamped rather than walked.
fn bench_range_parsing(c: &mut Criterion) {
    let range = "1-3, 5, 8-10, 12x, -4, 20-15, 40-999999999, 7";
    c.bench_function("parse_page_ranges (500 pages)", |b| {
        b.iter(|| black_box(parse_page_ranges(black_box(range), 500)));
    });
}

/// Merge two 20-page documents, then reverse a 40-page one.
fn bench_reassembly(c: &mut Criterion) {
    let a = PdfReader::from_bytes(&sample_pdf(20)).expect("fixture a");
    let b = PdfReader::from_bytes(&sample_pdf(20)).expect("fixture b");
    let docs = [a, b];

    c.bench_function("merge (20 + 20 pages)", |bench| {
        bench.iter(|| black_box(ops::merge(black_box(&docs)).expect("merge")));
    });

    let long = PdfReader::from_bytes(&sample_pdf(40)).expect("fixture");
    let reversed: Vec<usize> = (0..40).rev().collect();
    c.bench_function("reorder (40 pages, reversed)", |bench| {
        bench.iter(|| black_box(ops::reorder(&long, black_box(&reversed)).expect("reorder")));
    });
}

criterion_group!(benches, bench_range_parsing, bench_reassembly);
criterion_main!(benches);
