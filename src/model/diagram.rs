// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::connection::Connection;
use super::ids::{ConnectionId, NodeId};
use super::node::Node;

/// The node/connection content of one canvas.
///
/// Invariant: every connection references two distinct nodes that exist in this diagram. The
/// node id counter only grows; deleting nodes never frees ids for reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    nodes: BTreeMap<NodeId, Node>,
    connections: BTreeMap<ConnectionId, Connection>,
    next_node_id: u64,
    next_connection_id: u64,
    rev: u64,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            next_node_id: 1,
            next_connection_id: 1,
            rev: 0,
        }
    }

    /// Builds a diagram from decoded parts, checking the endpoint invariant.
    ///
    /// Connection ids are assigned in input order. The node id counter is advanced past the
    /// largest node id present.
    pub fn from_parts(
        nodes: BTreeMap<NodeId, Node>,
        connections: impl IntoIterator<Item = Connection>,
    ) -> Result<Self, DiagramError> {
        let mut diagram = Self::new();
        if let Some(node_id) = nodes.keys().find(|id| id.get() == u64::MAX) {
            return Err(DiagramError::NodeIdOutOfRange { node_id: *node_id });
        }
        diagram.next_node_id = nodes
            .keys()
            .map(|id| id.get() + 1)
            .max()
            .unwrap_or(1)
            .max(1);
        diagram.nodes = nodes;

        for connection in connections {
            for endpoint in [connection.start(), connection.end()] {
                if !diagram.nodes.contains_key(&endpoint.node_id) {
                    return Err(DiagramError::MissingEndpoint {
                        node_id: endpoint.node_id,
                    });
                }
            }
            if connection.is_self_loop() {
                return Err(DiagramError::SelfLoop {
                    node_id: connection.start().node_id,
                });
            }
            let connection_id = diagram.allocate_connection_id();
            diagram.connections.insert(connection_id, connection);
        }

        Ok(diagram)
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, Node> {
        &mut self.nodes
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn connections(&self) -> &BTreeMap<ConnectionId, Connection> {
        &self.connections
    }

    pub(crate) fn connections_mut(&mut self) -> &mut BTreeMap<ConnectionId, Connection> {
        &mut self.connections
    }

    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    pub fn connections_referencing(
        &self,
        node_id: NodeId,
    ) -> impl Iterator<Item = (ConnectionId, &Connection)> + '_ {
        self.connections
            .iter()
            .filter(move |(_, connection)| connection.references(node_id))
            .map(|(id, connection)| (*id, connection))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    /// The id the next created node will receive.
    pub fn peek_next_node_id(&self) -> NodeId {
        NodeId::new(self.next_node_id)
    }

    /// `None` once the id space is used up; `u64::MAX` is never handed out.
    pub(crate) fn allocate_node_id(&mut self) -> Option<NodeId> {
        if self.next_node_id == u64::MAX {
            return None;
        }
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        Some(id)
    }

    pub(crate) fn allocate_connection_id(&mut self) -> ConnectionId {
        let id = ConnectionId::new(self.next_connection_id);
        self.next_connection_id = self.next_connection_id.saturating_add(1);
        id
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    MissingEndpoint { node_id: NodeId },
    SelfLoop { node_id: NodeId },
    NodeIdOutOfRange { node_id: NodeId },
}

impl fmt::Display for DiagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint { node_id } => {
                write!(f, "connection references missing node {node_id}")
            }
            Self::SelfLoop { node_id } => {
                write!(f, "connection loops back onto node {node_id}")
            }
            Self::NodeIdOutOfRange { node_id } => {
                write!(f, "node id {node_id} leaves no room for new nodes")
            }
        }
    }
}

impl std::error::Error for DiagramError {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{Diagram, DiagramError};
    use crate::model::{Anchor, Connection, Endpoint, Node, NodeId, Point};

    fn nodes(ids: &[u64]) -> BTreeMap<NodeId, Node> {
        ids.iter()
            .map(|id| (NodeId::new(*id), Node::new(Point::new(*id as f64 * 10.0, 0.0))))
            .collect()
    }

    #[test]
    fn new_diagram_starts_ids_at_one() {
        let mut diagram = Diagram::new();
        assert_eq!(diagram.peek_next_node_id(), NodeId::new(1));
        assert_eq!(diagram.allocate_node_id(), Some(NodeId::new(1)));
        assert_eq!(diagram.allocate_node_id(), Some(NodeId::new(2)));
    }

    #[test]
    fn from_parts_rejects_the_last_id() {
        let result = Diagram::from_parts(nodes(&[1, u64::MAX]), Vec::new());
        assert_eq!(
            result,
            Err(DiagramError::NodeIdOutOfRange {
                node_id: NodeId::new(u64::MAX)
            })
        );
    }

    #[test]
    fn allocation_stops_before_the_last_id() {
        let mut diagram = Diagram::from_parts(nodes(&[u64::MAX - 2]), Vec::new()).expect("diagram");
        assert_eq!(diagram.allocate_node_id(), Some(NodeId::new(u64::MAX - 1)));
        assert_eq!(diagram.allocate_node_id(), None);
        assert_eq!(diagram.allocate_node_id(), None);
    }

    #[test]
    fn from_parts_advances_counter_past_max_id() {
        let diagram = Diagram::from_parts(nodes(&[3, 17, 5]), Vec::new()).expect("diagram");
        assert_eq!(diagram.peek_next_node_id(), NodeId::new(18));
    }

    #[test]
    fn from_parts_rejects_dangling_endpoint() {
        let connection = Connection::new(
            Endpoint::new(NodeId::new(1), Anchor::Right),
            Endpoint::new(NodeId::new(9), Anchor::Left),
        );
        let result = Diagram::from_parts(nodes(&[1, 2]), vec![connection]);
        assert_eq!(
            result,
            Err(DiagramError::MissingEndpoint {
                node_id: NodeId::new(9)
            })
        );
    }

    #[test]
    fn from_parts_rejects_self_loop() {
        let connection = Connection::new(
            Endpoint::new(NodeId::new(1), Anchor::Right),
            Endpoint::new(NodeId::new(1), Anchor::Left),
        );
        let result = Diagram::from_parts(nodes(&[1]), vec![connection]);
        assert!(matches!(result, Err(DiagramError::SelfLoop { .. })));
    }

    #[test]
    fn from_parts_keeps_duplicate_connections() {
        let make = || {
            Connection::new(
                Endpoint::new(NodeId::new(1), Anchor::Right),
                Endpoint::new(NodeId::new(2), Anchor::Left),
            )
        };
        let diagram = Diagram::from_parts(nodes(&[1, 2]), vec![make(), make()]).expect("diagram");
        assert_eq!(diagram.connections().len(), 2);
        assert_eq!(diagram.connections_referencing(NodeId::new(2)).count(), 2);
    }
}
