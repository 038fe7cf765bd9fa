// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-op mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(diagram: &mut Diagram, op: &Op, delta: &mut DeltaBuilder) -> Result<(), ApplyError> {
    match op {
        Op::AddNode {
            position,
            content,
            color,
        } => {
            let node_id = diagram
                .allocate_node_id()
                .ok_or(ApplyError::NodeIdsExhausted)?;
            let node = Node::new(*position)
                .with_content(content.clone())
                .with_color(*color);
            diagram.nodes_mut().insert(node_id, node);
            delta.record_added(DiagramObject::Node(node_id));
            Ok(())
        }
        Op::UpdateNode { node_id, patch } => {
            let Some(existing) = diagram.nodes_mut().get_mut(node_id) else {
                return Err(ApplyError::NodeNotFound { node_id: *node_id });
            };

            if let Some(position) = patch.position {
                existing.set_position(position);
            }
            if let Some(content) = &patch.content {
                existing.set_content(content.clone());
            }
            if let Some(color) = patch.color {
                existing.set_color(color);
            }
            delta.record_updated(DiagramObject::Node(*node_id));
            Ok(())
        }
        Op::RemoveNode { node_id } => {
            if diagram.nodes_mut().remove(node_id).is_none() {
                return Ok(());
            }

            let removed_connection_ids = diagram
                .connections_referencing(*node_id)
                .map(|(connection_id, _)| connection_id)
                .collect::<Vec<_>>();
            for connection_id in removed_connection_ids {
                diagram.connections_mut().remove(&connection_id);
                delta.record_removed(DiagramObject::Connection(connection_id));
            }

            delta.record_removed(DiagramObject::Node(*node_id));
            Ok(())
        }
        Op::AddConnection {
            start,
            end,
            direction,
            color,
        } => {
            for endpoint in [start, end] {
                if diagram.node(endpoint.node_id).is_none() {
                    return Err(ApplyError::MissingEndpoint {
                        node_id: endpoint.node_id,
                    });
                }
            }
            if start.node_id == end.node_id {
                return Err(ApplyError::SelfLoop {
                    node_id: start.node_id,
                });
            }

            let connection_id = diagram.allocate_connection_id();
            diagram.connections_mut().insert(
                connection_id,
                Connection::new_with(*start, *end, *direction, *color),
            );
            delta.record_added(DiagramObject::Connection(connection_id));
            Ok(())
        }
        Op::UpdateConnection {
            connection_id,
            patch,
        } => {
            let Some(existing) = diagram.connections_mut().get_mut(connection_id) else {
                return Err(ApplyError::ConnectionNotFound {
                    connection_id: *connection_id,
                });
            };

            if let Some(direction) = patch.direction {
                existing.set_direction(direction);
            }
            if let Some(color) = patch.color {
                existing.set_color(color);
            }
            delta.record_updated(DiagramObject::Connection(*connection_id));
            Ok(())
        }
        Op::RemoveConnection { connection_id } => {
            if diagram.connections_mut().remove(connection_id).is_none() {
                return Err(ApplyError::ConnectionNotFound {
                    connection_id: *connection_id,
                });
            }
            delta.record_removed(DiagramObject::Connection(*connection_id));
            Ok(())
        }
    }
}
