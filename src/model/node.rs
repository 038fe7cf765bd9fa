// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::geometry::{Anchor, Point, Rect};
use super::palette::NodeColor;

/// Rendered width of every node box, in diagram-local units.
pub const NODE_WIDTH: f64 = 200.0;
/// Rendered height of every node box, in diagram-local units.
pub const NODE_HEIGHT: f64 = 60.0;

/// A draggable, editable box placed on a diagram.
///
/// The node id is the key it is stored under in its [`super::Diagram`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    position: Point,
    content: String,
    color: NodeColor,
}

impl Node {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            content: String::new(),
            color: NodeColor::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_color(mut self, color: NodeColor) -> Self {
        self.color = color;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn color(&self) -> NodeColor {
        self.color
    }

    pub fn set_color(&mut self, color: NodeColor) {
        self.color = color;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, NODE_WIDTH, NODE_HEIGHT)
    }

    /// Diagram-local point of `anchor` on this node's box.
    pub fn anchor_point(&self, anchor: Anchor) -> Point {
        let Point { x, y } = self.position;
        match anchor {
            Anchor::Top => Point::new(x + NODE_WIDTH / 2.0, y),
            Anchor::Right => Point::new(x + NODE_WIDTH, y + NODE_HEIGHT / 2.0),
            Anchor::Bottom => Point::new(x + NODE_WIDTH / 2.0, y + NODE_HEIGHT),
            Anchor::Left => Point::new(x, y + NODE_HEIGHT / 2.0),
        }
    }
}
