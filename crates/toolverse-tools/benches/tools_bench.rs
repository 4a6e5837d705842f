// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for toolverse-tools: text statistics, diffs and
// password generation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use toolverse_tools::security::password::generate;
use toolverse_tools::text::diff::{diff, side_by_side};
use toolverse_tools::{DiffGranularity, PasswordOptions, TextStats};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_text(paragraphs: usize) -> String {
    let paragraph = "The quick brown fox jumps over the lazy dog.\n\
                     Pack my box with five dozen liquor jugs.\n";
    (0..paragraphs)
        .map(|i| format!("Paragraph {i}\n{paragraph}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_text_stats(c: &mut Criterion) {
    let text = sample_text(200);
    c.bench_function("TextStats::of (200 paragraphs)", |b| {
        b.iter(|| black_box(TextStats::of(black_box(&text))));
    });
}

/// Every thirtieth line edited.
fn bench_diff(c: &mut Criterion) {
    let original = sample_text(100);
    let changed = original
        .lines()
        .enumerate()
        .map(|(i, line)| if i % 30 == 0 { line.replace("fox", "cat") } else { line.to_string() })
        .collect::<Vec<_>>()
        .join("\n");

    c.bench_function("diff words (100 paragraphs)", |b| {
        b.iter(|| black_box(diff(black_box(&original), black_box(&changed), DiffGranularity::Words)));
    });
    c.bench_function("side_by_side (100 paragraphs)", |b| {
        b.iter(|| black_box(side_by_side(black_box(&original), black_box(&changed))));
    });
}

fn bench_password(c: &mut Criterion) {
    let options = PasswordOptions {
        length: 64,
        symbols: true,
        ..Default::default()
    };
    c.bench_function("generate password (64 chars)", |b| {
        b.iter(|| black_box(generate(black_box(&options)).expect("generate")));
    });
}

criterion_group!(benches, bench_text_stats, bench_diff, bench_password);
criterion_main!(benches);
