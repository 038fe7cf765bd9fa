// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use flowdesk::model::{Diagram, Point};
use flowdesk::ops::{apply_ops, ApplyResult, Op};
use flowdesk::tabs::{decode_content, encode_content};

mod fixtures;
mod profiler;

use fixtures::{node_at, Case};

fn checksum(result: &ApplyResult) -> u64 {
    let mut acc = result.new_rev;
    acc = acc.wrapping_mul(131).wrapping_add(result.applied as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.added.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.updated.len() as u64);
    acc.wrapping_mul(131)
        .wrapping_add(result.delta.removed.len() as u64)
}

fn bench_apply(c: &mut Criterion, name: &str, template: &Diagram, ops: Vec<Op>) {
    let template = template.clone();
    c.bench_function(name, move |b| {
        b.iter_batched(
            || template.clone(),
            |mut diagram| {
                let result = apply_ops(&mut diagram, black_box(&ops)).expect("apply_ops");
                black_box(checksum(&result))
            },
            BatchSize::SmallInput,
        )
    });
}

// Names are `ops.apply/<case>`; keep them stable so results stay comparable.
fn benches_ops(c: &mut Criterion) {
    let template = Case::Medium.diagram();
    let (columns, rows) = Case::Medium.dimensions();

    bench_apply(
        c,
        "ops.apply/add_node",
        &template,
        vec![Op::add_node(Point::new(-400.0, -400.0))],
    );

    // One drag: every pointer-move commits its own batch, so this mirrors a long drag.
    let drag: Vec<Op> = (0..200)
        .map(|step| Op::move_node(node_at(columns, 4, 4), Point::new(step as f64, step as f64)))
        .collect();
    bench_apply(c, "ops.apply/drag_200", &template, drag);

    // Removing a centre node cascades into its four connections.
    bench_apply(
        c,
        "ops.apply/remove_cascade",
        &template,
        vec![Op::RemoveNode {
            node_id: node_at(columns, columns / 2, rows / 2),
        }],
    );

    let recolor: Vec<Op> = template
        .connections()
        .keys()
        .map(|connection_id| {
            Op::set_connection_direction(*connection_id, flowdesk::model::Direction::TwoWay)
        })
        .collect();
    bench_apply(c, "ops.apply/update_all_connections", &template, recolor);
}

fn benches_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabs.content");
    for case in [Case::Small, Case::Medium, Case::Large] {
        let diagram = case.diagram();
        let encoded = encode_content(&diagram).expect("encode");
        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_function(format!("encode/{}", case.id()), |b| {
            b.iter(|| encode_content(black_box(&diagram)).expect("encode").len())
        });
        group.bench_function(format!("decode/{}", case.id()), |b| {
            b.iter(|| {
                decode_content(black_box(&encoded))
                    .expect("decode")
                    .nodes()
                    .len()
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_ops, benches_codec
}
criterion_main!(benches);
