// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive regions of a node box, in diagram-local units.
//!
//! ```text
//!  x                         x+140  x+170  x+200
//!  +-----------------------------+------+------+  y
//!  |                             |color |delete|
//!  |   +---------------------------------+     |  y+20
//!  |   |            content              |     |
//!  |   +---------------------------------+     |  y+52
//!  +---------------------------------------------+  y+60
//!  [ swatch 0 ][ swatch 1 ] ... [ swatch 7 ]        y+60 .. y+80 (picker, while open)
//! ```

use crate::model::{Anchor, Node, NodeColor, Point, Rect, NODE_HEIGHT, NODE_WIDTH};

pub const TOOLBAR_HEIGHT: f64 = 16.0;
pub const TOOLBAR_BUTTON_WIDTH: f64 = 30.0;
pub const CONTENT_INSET_X: f64 = 8.0;
pub const CONTENT_TOP: f64 = 20.0;
pub const CONTENT_BOTTOM: f64 = 52.0;
pub const PICKER_HEIGHT: f64 = 20.0;
pub const PICKER_SWATCH_WIDTH: f64 = NODE_WIDTH / 8.0;
/// Anchors are round targets; a pointer within this radius of the anchor point hits it.
pub const ANCHOR_HIT_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRegion {
    Anchor(Anchor),
    ColorButton,
    DeleteButton,
    Content,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLayout {
    bounds: Rect,
}

impl NodeLayout {
    pub fn of(node: &Node) -> Self {
        Self::at(node.position())
    }

    pub fn at(position: Point) -> Self {
        Self {
            bounds: Rect::new(position.x, position.y, NODE_WIDTH, NODE_HEIGHT),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn toolbar(&self) -> Rect {
        Rect::new(
            self.bounds.right() - 2.0 * TOOLBAR_BUTTON_WIDTH,
            self.bounds.top(),
            2.0 * TOOLBAR_BUTTON_WIDTH,
            TOOLBAR_HEIGHT,
        )
    }

    pub fn color_button(&self) -> Rect {
        let toolbar = self.toolbar();
        Rect::new(
            toolbar.left(),
            toolbar.top(),
            TOOLBAR_BUTTON_WIDTH,
            TOOLBAR_HEIGHT,
        )
    }

    pub fn delete_button(&self) -> Rect {
        let toolbar = self.toolbar();
        Rect::new(
            toolbar.left() + TOOLBAR_BUTTON_WIDTH,
            toolbar.top(),
            TOOLBAR_BUTTON_WIDTH,
            TOOLBAR_HEIGHT,
        )
    }

    pub fn content(&self) -> Rect {
        Rect::new(
            self.bounds.left() + CONTENT_INSET_X,
            self.bounds.top() + CONTENT_TOP,
            NODE_WIDTH - 2.0 * CONTENT_INSET_X,
            CONTENT_BOTTOM - CONTENT_TOP,
        )
    }

    pub fn picker(&self) -> Rect {
        Rect::new(
            self.bounds.left(),
            self.bounds.bottom(),
            NODE_WIDTH,
            PICKER_HEIGHT,
        )
    }

    pub fn swatch(&self, index: usize) -> Rect {
        let picker = self.picker();
        Rect::new(
            picker.left() + index as f64 * PICKER_SWATCH_WIDTH,
            picker.top(),
            PICKER_SWATCH_WIDTH,
            PICKER_HEIGHT,
        )
    }

    pub fn swatch_at(&self, point: Point) -> Option<NodeColor> {
        if !self.picker().contains(point) {
            return None;
        }
        let index = ((point.x - self.bounds.left()) / PICKER_SWATCH_WIDTH).floor() as usize;
        NodeColor::ALL.get(index).copied()
    }

    pub fn anchor_at(&self, point: Point) -> Option<Anchor> {
        Anchor::ALL
            .into_iter()
            .map(|anchor| (anchor, self.anchor_point(anchor).distance(point)))
            .filter(|(_, distance)| *distance <= ANCHOR_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(anchor, _)| anchor)
    }

    pub fn anchor_point(&self, anchor: Anchor) -> Point {
        let Rect { origin, .. } = self.bounds;
        match anchor {
            Anchor::Top => Point::new(origin.x + NODE_WIDTH / 2.0, origin.y),
            Anchor::Right => Point::new(origin.x + NODE_WIDTH, origin.y + NODE_HEIGHT / 2.0),
            Anchor::Bottom => Point::new(origin.x + NODE_WIDTH / 2.0, origin.y + NODE_HEIGHT),
            Anchor::Left => Point::new(origin.x, origin.y + NODE_HEIGHT / 2.0),
        }
    }

    /// Region of this node under `point`, anchors first.
    pub fn region_at(&self, point: Point) -> Option<NodeRegion> {
        if let Some(anchor) = self.anchor_at(point) {
            return Some(NodeRegion::Anchor(anchor));
        }
        if !self.bounds.contains(point) {
            return None;
        }
        if self.color_button().contains(point) {
            return Some(NodeRegion::ColorButton);
        }
        if self.delete_button().contains(point) {
            return Some(NodeRegion::DeleteButton);
        }
        if self.content().contains(point) {
            return Some(NodeRegion::Content);
        }
        Some(NodeRegion::Body)
    }
}
