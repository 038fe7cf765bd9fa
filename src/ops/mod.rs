// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for diagrams.
//!
//! A batch of ops is applied all-or-nothing: it runs against a working copy and is only swapped
//! in once every op succeeded. A successful non-empty batch bumps the diagram revision and
//! produces a minimal delta that the UI can use to refresh derived state.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{
    Connection, ConnectionColor, ConnectionId, Diagram, Direction, Endpoint, Node, NodeColor,
    NodeId, Point,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode {
        position: Point,
        content: String,
        color: NodeColor,
    },
    UpdateNode {
        node_id: NodeId,
        patch: NodePatch,
    },
    /// Removing an absent node is a no-op.
    RemoveNode {
        node_id: NodeId,
    },
    AddConnection {
        start: Endpoint,
        end: Endpoint,
        direction: Direction,
        color: ConnectionColor,
    },
    UpdateConnection {
        connection_id: ConnectionId,
        patch: ConnectionPatch,
    },
    RemoveConnection {
        connection_id: ConnectionId,
    },
}

impl Op {
    pub fn add_node(position: Point) -> Self {
        Self::AddNode {
            position,
            content: String::new(),
            color: NodeColor::default(),
        }
    }

    pub fn move_node(node_id: NodeId, position: Point) -> Self {
        Self::UpdateNode {
            node_id,
            patch: NodePatch {
                position: Some(position),
                ..NodePatch::default()
            },
        }
    }

    pub fn set_node_content(node_id: NodeId, content: impl Into<String>) -> Self {
        Self::UpdateNode {
            node_id,
            patch: NodePatch {
                content: Some(content.into()),
                ..NodePatch::default()
            },
        }
    }

    pub fn set_node_color(node_id: NodeId, color: NodeColor) -> Self {
        Self::UpdateNode {
            node_id,
            patch: NodePatch {
                color: Some(color),
                ..NodePatch::default()
            },
        }
    }

    pub fn connect(start: Endpoint, end: Endpoint) -> Self {
        Self::AddConnection {
            start,
            end,
            direction: Direction::default(),
            color: ConnectionColor::default(),
        }
    }

    pub fn set_connection_direction(connection_id: ConnectionId, direction: Direction) -> Self {
        Self::UpdateConnection {
            connection_id,
            patch: ConnectionPatch {
                direction: Some(direction),
                ..ConnectionPatch::default()
            },
        }
    }

    pub fn set_connection_color(connection_id: ConnectionId, color: ConnectionColor) -> Self {
        Self::UpdateConnection {
            connection_id,
            patch: ConnectionPatch {
                color: Some(color),
                ..ConnectionPatch::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub position: Option<Point>,
    pub content: Option<String>,
    pub color: Option<NodeColor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionPatch {
    pub direction: Option<Direction>,
    pub color: Option<ConnectionColor>,
}

/// Something inside a diagram that an op can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagramObject {
    Node(NodeId),
    Connection(ConnectionId),
}

impl fmt::Display for DiagramObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node/{id}"),
            Self::Connection(id) => write!(f, "connection/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

impl ApplyResult {
    /// First node created by the batch, if any.
    pub fn added_node(&self) -> Option<NodeId> {
        self.delta.added.iter().find_map(|object| match object {
            DiagramObject::Node(id) => Some(*id),
            DiagramObject::Connection(_) => None,
        })
    }

    /// First connection created by the batch, if any.
    pub fn added_connection(&self) -> Option<ConnectionId> {
        self.delta.added.iter().find_map(|object| match object {
            DiagramObject::Connection(id) => Some(*id),
            DiagramObject::Node(_) => None,
        })
    }
}

/// Minimal delta describing which objects changed as the result of applying ops.
///
/// This is intentionally coarse: it reports only added/removed/updated objects, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<DiagramObject>,
    pub removed: Vec<DiagramObject>,
    pub updated: Vec<DiagramObject>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<DiagramObject>,
    removed: BTreeSet<DiagramObject>,
    updated: BTreeSet<DiagramObject>,
}

impl DeltaBuilder {
    fn record_added(&mut self, object: DiagramObject) {
        self.removed.remove(&object);
        self.updated.remove(&object);
        self.added.insert(object);
    }

    fn record_removed(&mut self, object: DiagramObject) {
        // Created and deleted within one batch: nothing observable happened.
        if self.added.remove(&object) {
            self.updated.remove(&object);
            return;
        }
        self.updated.remove(&object);
        self.removed.insert(object);
    }

    fn record_updated(&mut self, object: DiagramObject) {
        if self.added.contains(&object) || self.removed.contains(&object) {
            return;
        }
        self.updated.insert(object);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

pub fn apply_ops(diagram: &mut Diagram, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: diagram.rev(),
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut working = diagram.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut working, op, &mut delta)?;
    }

    // The working copy is kept even without a visible change: it carries the id counters.
    let delta = delta.finish();
    if !delta.is_empty() {
        working.bump_rev();
    }
    let new_rev = working.rev();
    *diagram = working;

    Ok(ApplyResult {
        new_rev,
        applied: ops.len(),
        delta,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Node,
    Connection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    NodeNotFound { node_id: NodeId },
    ConnectionNotFound { connection_id: ConnectionId },
    MissingEndpoint { node_id: NodeId },
    SelfLoop { node_id: NodeId },
    NodeIdsExhausted,
}

impl ApplyError {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::NodeNotFound { .. }
            | Self::MissingEndpoint { .. }
            | Self::SelfLoop { .. }
            | Self::NodeIdsExhausted => ObjectKind::Node,
            Self::ConnectionNotFound { .. } => ObjectKind::Connection,
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::ConnectionNotFound { connection_id } => {
                write!(f, "connection not found (id={connection_id})")
            }
            Self::MissingEndpoint { node_id } => {
                write!(f, "connection endpoint node not found (id={node_id})")
            }
            Self::SelfLoop { node_id } => {
                write!(f, "cannot connect node {node_id} to itself")
            }
            Self::NodeIdsExhausted => f.write_str("no node ids left in this diagram"),
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted per-op implementation.
include!("ops_impl.rs");
