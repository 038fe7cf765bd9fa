// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ConnectionColor, ConnectionId, Direction, Point, Rect};

pub const POPUP_ROW_HEIGHT: f64 = 16.0;
pub const POPUP_WIDTH: f64 = 168.0;
pub const POPUP_HEIGHT: f64 = 3.0 * POPUP_ROW_HEIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupItem {
    Delete,
    Color(ConnectionColor),
    Direction(Direction),
}

/// Context menu for one connection, laid out in screen space from its anchor point.
///
/// Rows: delete, then the color swatches, then the three direction options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPopup {
    connection_id: ConnectionId,
    anchor: Point,
}

impl ConnectionPopup {
    pub fn new(connection_id: ConnectionId, anchor: Point) -> Self {
        Self {
            connection_id,
            anchor,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.anchor.x, self.anchor.y, POPUP_WIDTH, POPUP_HEIGHT)
    }

    /// Every item with its screen rectangle, in render order.
    pub fn items(&self) -> Vec<(PopupItem, Rect)> {
        let Point { x, y } = self.anchor;
        let mut items = vec![(
            PopupItem::Delete,
            Rect::new(x, y, POPUP_WIDTH, POPUP_ROW_HEIGHT),
        )];

        let swatch_width = POPUP_WIDTH / ConnectionColor::ALL.len() as f64;
        items.extend(ConnectionColor::ALL.iter().enumerate().map(|(index, color)| {
            (
                PopupItem::Color(*color),
                Rect::new(
                    x + index as f64 * swatch_width,
                    y + POPUP_ROW_HEIGHT,
                    swatch_width,
                    POPUP_ROW_HEIGHT,
                ),
            )
        }));

        let option_width = POPUP_WIDTH / Direction::ALL.len() as f64;
        items.extend(Direction::ALL.iter().enumerate().map(|(index, direction)| {
            (
                PopupItem::Direction(*direction),
                Rect::new(
                    x + index as f64 * option_width,
                    y + 2.0 * POPUP_ROW_HEIGHT,
                    option_width,
                    POPUP_ROW_HEIGHT,
                ),
            )
        }));

        items
    }

    pub fn item_at(&self, screen: Point) -> Option<PopupItem> {
        if !self.bounds().contains(screen) {
            return None;
        }
        self.items()
            .into_iter()
            .find(|(_, rect)| rect.contains(screen))
            .map(|(item, _)| item)
    }
}
