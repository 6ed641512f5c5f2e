// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use smol_str::SmolStr;

use textarc::layout::slots::{assign_slots, traversal_order};

mod fixtures;
mod profiler;

use fixtures::{Case, DocParams};

// Benchmark identity (keep stable):
// - Group names in this file: `slots.assign`, `slots.order`
// - Case IDs (`sentence`, `paragraph`, `document`, `deep_nesting`) must remain stable.
fn benches_slots(c: &mut Criterion) {
    let hidden = BTreeSet::<SmolStr>::new();
    let cases = [
        (Case::Sentence.id(), Case::Sentence.params()),
        (Case::Paragraph.id(), Case::Paragraph.params()),
        (Case::Document.id(), Case::Document.params()),
        ("deep_nesting", DocParams::new(600, 1, 60, 1, 7)),
    ];

    {
        let mut group = c.benchmark_group("slots.assign");

        for (case_id, params) in cases {
            let graph = fixtures::graph(params);
            group.throughput(Throughput::Elements(graph.links().len() as u64));
            group.bench_function(case_id, |b| {
                b.iter(|| {
                    let slots = assign_slots(black_box(&graph), &hidden);
                    black_box(fixtures::checksum_slots(0, slots))
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("slots.order");

        for (case_id, params) in cases {
            let graph = fixtures::graph(params);
            group.throughput(Throughput::Elements(graph.links().len() as u64));
            group.bench_function(case_id, |b| {
                b.iter(|| black_box(traversal_order(black_box(&graph), &hidden).len()))
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_slots
}
criterion_main!(benches);
