// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The `content` string stored on a canvas resource.
//!
//! Shape: `{"canvasItems": [Node], "connections": [Connection]}` where
//! `Node = {id, position: {x, y}, content, color}` and
//! `Connection = {startId, endId, startPoint, endPoint, direction, color}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{
    Anchor, Connection, ConnectionColor, Diagram, DiagramError, Direction, Endpoint, Node,
    NodeColor, NodeId, Point,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDoc {
    #[serde(default, alias = "nodes")]
    canvas_items: Vec<NodeDoc>,
    #[serde(default)]
    connections: Vec<ConnectionDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeDoc {
    id: NodeId,
    position: Point,
    #[serde(default)]
    content: String,
    #[serde(default)]
    color: NodeColor,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionDoc {
    start_id: NodeId,
    end_id: NodeId,
    start_point: Anchor,
    end_point: Anchor,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    color: ConnectionColor,
}

/// Serializes the diagram's nodes (by id) and connections (by creation order).
pub fn encode_content(diagram: &Diagram) -> Result<String, ContentError> {
    let doc = ContentDoc {
        canvas_items: diagram
            .nodes()
            .iter()
            .map(|(id, node)| NodeDoc {
                id: *id,
                position: node.position(),
                content: node.content().to_owned(),
                color: node.color(),
            })
            .collect(),
        connections: diagram
            .connections()
            .values()
            .map(|connection| ConnectionDoc {
                start_id: connection.start().node_id,
                end_id: connection.end().node_id,
                start_point: connection.start().anchor,
                end_point: connection.end().anchor,
                direction: connection.direction(),
                color: connection.color(),
            })
            .collect(),
    };
    serde_json::to_string(&doc).map_err(ContentError::Json)
}

/// Parses a `content` string. An empty string is an empty diagram.
pub fn decode_content(content: &str) -> Result<Diagram, ContentError> {
    if content.trim().is_empty() {
        return Ok(Diagram::new());
    }

    let doc: ContentDoc = serde_json::from_str(content).map_err(ContentError::Json)?;

    let mut nodes = BTreeMap::new();
    for item in doc.canvas_items {
        let node = Node::new(item.position)
            .with_content(item.content)
            .with_color(item.color);
        if nodes.insert(item.id, node).is_some() {
            return Err(ContentError::DuplicateNode { node_id: item.id });
        }
    }

    let connections = doc.connections.into_iter().map(|doc| {
        Connection::new_with(
            Endpoint::new(doc.start_id, doc.start_point),
            Endpoint::new(doc.end_id, doc.end_point),
            doc.direction,
            doc.color,
        )
    });

    Diagram::from_parts(nodes, connections).map_err(ContentError::Diagram)
}

#[derive(Debug)]
pub enum ContentError {
    Json(serde_json::Error),
    DuplicateNode { node_id: NodeId },
    Diagram(DiagramError),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid canvas content: {err}"),
            Self::DuplicateNode { node_id } => {
                write!(f, "invalid canvas content: duplicate node id {node_id}")
            }
            Self::Diagram(err) => write!(f, "invalid canvas content: {err}"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Diagram(err) => Some(err),
            Self::DuplicateNode { .. } => None,
        }
    }
}
