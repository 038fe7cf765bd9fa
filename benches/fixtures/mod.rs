// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic diagrams for benchmarks (no RNG).

use flowdesk::model::{Anchor, Diagram, Endpoint, NodeId, Point, NODE_HEIGHT, NODE_WIDTH};
use flowdesk::ops::{apply_ops, Op};

pub const GRID_GAP: f64 = 80.0;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Small => (4, 4),
            Self::Medium => (10, 10),
            Self::Large => (24, 24),
        }
    }

    pub fn diagram(self) -> Diagram {
        let (columns, rows) = self.dimensions();
        grid(columns, rows)
    }
}

pub fn cell_origin(column: usize, row: usize) -> Point {
    Point::new(
        column as f64 * (NODE_WIDTH + GRID_GAP),
        row as f64 * (NODE_HEIGHT + GRID_GAP),
    )
}

pub fn node_at(columns: usize, column: usize, row: usize) -> NodeId {
    NodeId::new((row * columns + column) as u64 + 1)
}

/// `columns` x `rows` nodes, each connected to its right and lower neighbour.
pub fn grid(columns: usize, rows: usize) -> Diagram {
    let mut diagram = Diagram::new();
    let nodes: Vec<Op> = (0..rows)
        .flat_map(|row| (0..columns).map(move |column| Op::add_node(cell_origin(column, row))))
        .collect();
    apply_ops(&mut diagram, &nodes).expect("add grid nodes");

    let mut connections = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let here = node_at(columns, column, row);
            if column + 1 < columns {
                connections.push(Op::connect(
                    Endpoint::new(here, Anchor::Right),
                    Endpoint::new(node_at(columns, column + 1, row), Anchor::Left),
                ));
            }
            if row + 1 < rows {
                connections.push(Op::connect(
                    Endpoint::new(here, Anchor::Bottom),
                    Endpoint::new(node_at(columns, column, row + 1), Anchor::Top),
                ));
            }
        }
    }
    apply_ops(&mut diagram, &connections).expect("connect grid nodes");
    diagram
}
