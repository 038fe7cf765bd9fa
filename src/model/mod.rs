// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram holds nodes (boxes with four anchors) and connections (curves between anchors).
//! Backend resources are referenced by [`Id`]s; everything allocated on the client uses
//! [`LocalId`]s.

pub mod connection;
pub mod diagram;
pub mod geometry;
pub mod ids;
pub mod node;
pub mod palette;

pub use connection::{Connection, Direction, Endpoint, ParseDirectionError};
pub use diagram::{Diagram, DiagramError};
pub use geometry::{Anchor, ParseAnchorError, Point, Rect, Vector};
pub use ids::{
    CanvasId, ConnectionId, EventId, Id, IdError, LocalId, NodeId, ProjectId, TabId, TaskId,
};
pub use node::{Node, NODE_HEIGHT, NODE_WIDTH};
pub use palette::{ConnectionColor, NodeColor};
