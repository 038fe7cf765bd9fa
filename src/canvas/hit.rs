// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Anchor, ConnectionId, Diagram, NodeColor, NodeId, Point};

use super::curve::{ConnectionGeometry, CURVE_HIT_TOLERANCE};
use super::layout::{NodeLayout, NodeRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPart {
    Curve,
    StartArrow,
    EndArrow,
}

/// What a diagram-local point lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Swatch { node_id: NodeId, color: NodeColor },
    Node { node_id: NodeId, region: NodeRegion },
    Connection {
        connection_id: ConnectionId,
        part: ConnectionPart,
    },
    Empty,
}

impl Hit {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Swatch { node_id, .. } | Self::Node { node_id, .. } => Some(*node_id),
            Self::Connection { .. } | Self::Empty => None,
        }
    }

    pub fn anchor(&self) -> Option<(NodeId, Anchor)> {
        match self {
            Self::Node {
                node_id,
                region: NodeRegion::Anchor(anchor),
            } => Some((*node_id, *anchor)),
            _ => None,
        }
    }
}

/// Hit-tests `point` against the diagram, topmost layer first.
///
/// Order: the open color picker, then nodes (last drawn first), then arrowheads and curves.
/// Connections are tested against their path and arrowhead hulls only.
pub fn hit_test(diagram: &Diagram, point: Point, open_picker: Option<NodeId>) -> Hit {
    if let Some(node_id) = open_picker {
        if let Some(node) = diagram.node(node_id) {
            if let Some(color) = NodeLayout::of(node).swatch_at(point) {
                return Hit::Swatch { node_id, color };
            }
        }
    }

    for (node_id, node) in diagram.nodes().iter().rev() {
        if let Some(region) = NodeLayout::of(node).region_at(point) {
            return Hit::Node {
                node_id: *node_id,
                region,
            };
        }
    }

    let geometries = diagram
        .connections()
        .iter()
        .rev()
        .filter_map(|(id, connection)| {
            ConnectionGeometry::of(diagram, connection).map(|geometry| (*id, geometry))
        })
        .collect::<Vec<_>>();

    for (connection_id, geometry) in &geometries {
        let part = if geometry.end_arrow.is_some_and(|arrow| arrow.contains(point)) {
            Some(ConnectionPart::EndArrow)
        } else if geometry.start_arrow.is_some_and(|arrow| arrow.contains(point)) {
            Some(ConnectionPart::StartArrow)
        } else {
            None
        };
        if let Some(part) = part {
            return Hit::Connection {
                connection_id: *connection_id,
                part,
            };
        }
    }

    for (connection_id, geometry) in &geometries {
        if geometry.curve.distance_to(point) <= CURVE_HIT_TOLERANCE {
            return Hit::Connection {
                connection_id: *connection_id,
                part: ConnectionPart::Curve,
            };
        }
    }

    Hit::Empty
}
