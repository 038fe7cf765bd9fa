// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal rendering of one diagram.
//!
//! The surface works in "screen pixels": every terminal cell is [`CELL_WIDTH`] by
//! [`CELL_HEIGHT`] of them, so the pixel geometry from [`crate::canvas`] maps onto cells without
//! a second coordinate system.

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use super::theme::TuiTheme;
use crate::canvas::curve::CURVE_SEGMENTS;
use crate::canvas::{ConnectionGeometry, NodeLayout};
use crate::interact::{CanvasController, PopupItem};
use crate::model::{
    Anchor, Diagram, Direction as ArrowDirection, Node, NodeColor, NodeId, Point, Rect as PxRect,
};

pub(crate) const CELL_WIDTH: f64 = 8.0;
pub(crate) const CELL_HEIGHT: f64 = 16.0;

/// Screen position of `area`'s top-left cell corner.
pub(crate) fn origin_of(area: Rect) -> Point {
    Point::new(
        f64::from(area.x) * CELL_WIDTH,
        f64::from(area.y) * CELL_HEIGHT,
    )
}

/// Centre of a terminal cell in screen pixels.
pub(crate) fn cell_center(column: u16, row: u16) -> Point {
    Point::new(
        f64::from(column) * CELL_WIDTH + CELL_WIDTH / 2.0,
        f64::from(row) * CELL_HEIGHT + CELL_HEIGHT / 2.0,
    )
}

fn cell_of(point: Point) -> (i64, i64) {
    (
        (point.x / CELL_WIDTH).floor() as i64,
        (point.y / CELL_HEIGHT).floor() as i64,
    )
}

/// Cells covered by the screen-space box `top_left..bottom_right`, clipped to `clip`.
fn cells_covering(top_left: Point, bottom_right: Point, clip: Rect) -> Option<Rect> {
    let left = (top_left.x / CELL_WIDTH).round() as i64;
    let top = (top_left.y / CELL_HEIGHT).round() as i64;
    let right = ((bottom_right.x / CELL_WIDTH).round() as i64).max(left + 1);
    let bottom = ((bottom_right.y / CELL_HEIGHT).round() as i64).max(top + 1);

    let left = left.max(i64::from(clip.left()));
    let top = top.max(i64::from(clip.top()));
    let right = right.min(i64::from(clip.right()));
    let bottom = bottom.min(i64::from(clip.bottom()));
    if left >= right || top >= bottom {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

fn cell_in(point: Point, clip: Rect) -> Option<Position> {
    let (column, row) = cell_of(point);
    let inside = column >= i64::from(clip.left())
        && column < i64::from(clip.right())
        && row >= i64::from(clip.top())
        && row < i64::from(clip.bottom());
    inside.then(|| Position::new(column as u16, row as u16))
}

pub(crate) struct CanvasView<'a> {
    diagram: &'a Diagram,
    controller: &'a CanvasController,
    theme: &'a TuiTheme,
}

impl<'a> CanvasView<'a> {
    pub(crate) fn new(
        diagram: &'a Diagram,
        controller: &'a CanvasController,
        theme: &'a TuiTheme,
    ) -> Self {
        Self {
            diagram,
            controller,
            theme,
        }
    }

    pub(crate) fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.is_empty() {
            return;
        }
        frame.render_widget(Clear, area);
        self.render_connections(frame, area);
        for (node_id, node) in self.diagram.nodes() {
            self.render_node(frame, area, *node_id, node);
        }
        if let Some(node_id) = self.controller.open_picker() {
            if let Some(node) = self.diagram.node(node_id) {
                self.render_picker(frame, area, NodeLayout::of(node));
            }
        }
        self.render_anchors(frame, area);
        self.render_popup(frame, area);

        if self.diagram.is_empty() {
            let hint = "click anywhere to add a node";
            let width = (hint.len() as u16).min(area.width);
            let x = area.x + (area.width - width) / 2;
            let y = area.y + area.height / 2;
            frame
                .buffer_mut()
                .set_stringn(x, y, hint, usize::from(width), self.theme.footer_label_style());
        }
    }

    fn render_connections(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut segments: Vec<(Point, Point, Color)> = Vec::new();
        for connection in self.diagram.connections().values() {
            let Some(geometry) = ConnectionGeometry::of(self.diagram, connection) else {
                continue;
            };
            let color = self.theme.connection(connection.color());
            let points: Vec<Point> = geometry
                .curve
                .sample(CURVE_SEGMENTS)
                .into_iter()
                .map(|point| self.controller.local_to_screen(point))
                .collect();
            segments.extend(points.windows(2).map(|pair| (pair[0], pair[1], color)));
            for arrow in geometry.arrows() {
                let tip = self.controller.local_to_screen(arrow.tip);
                let left = self.controller.local_to_screen(arrow.left);
                let right = self.controller.local_to_screen(arrow.right);
                segments.push((tip, left, color));
                segments.push((tip, right, color));
            }
        }

        // Rubber band from the pending anchor to the pointer.
        if let (Some(from), Some(pointer)) = (
            self.controller.connect_gesture().pending_from(),
            self.controller.pointer(),
        ) {
            if let Some(node) = self.diagram.node(from.node_id) {
                let start = self
                    .controller
                    .local_to_screen(NodeLayout::of(node).anchor_point(from.anchor));
                let color = self.theme.anchor_style(true).fg.unwrap_or(Color::Reset);
                segments.push((start, pointer, color));
            }
        }

        if segments.is_empty() {
            return;
        }

        let origin = origin_of(area);
        let width = f64::from(area.width) * CELL_WIDTH;
        let height = f64::from(area.height) * CELL_HEIGHT;
        // Canvas y grows upwards; screen y grows downwards.
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([origin.x, origin.x + width])
            .y_bounds([-(origin.y + height), -origin.y])
            .paint(move |ctx| {
                for (from, to, color) in &segments {
                    ctx.draw(&CanvasLine::new(from.x, -from.y, to.x, -to.y, *color));
                }
            });
        frame.render_widget(canvas, area);
    }

    fn to_screen(&self, rect: PxRect) -> (Point, Point) {
        (
            self.controller.local_to_screen(rect.origin),
            self.controller
                .local_to_screen(Point::new(rect.right(), rect.bottom())),
        )
    }

    fn render_node(&self, frame: &mut Frame<'_>, area: Rect, node_id: NodeId, node: &Node) {
        let Some((top_left, bottom_right)) = self.controller.node_screen_bounds(self.diagram, node_id)
        else {
            return;
        };
        let Some(cells) = cells_covering(top_left, bottom_right, area) else {
            return;
        };

        let editing = self.controller.editing() == Some(node_id);
        let style = self.theme.node_style(node.color(), editing);
        let mut text = node.content().to_owned();
        if editing {
            text.push('▏');
        }

        frame.render_widget(Clear, cells);
        frame.render_widget(
            Paragraph::new(text).style(style).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(if editing {
                        BorderType::Double
                    } else {
                        BorderType::Rounded
                    })
                    .style(style),
            ),
            cells,
        );

        let layout = NodeLayout::of(node);
        let buffer = frame.buffer_mut();
        for (rect, glyph) in [(layout.color_button(), "●"), (layout.delete_button(), "✕")] {
            let (a, b) = self.to_screen(rect);
            let center = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
            if let Some(cell) = cell_in(center, area) {
                buffer.set_string(cell.x, cell.y, glyph, style.add_modifier(Modifier::BOLD));
            }
        }
    }

    fn render_picker(&self, frame: &mut Frame<'_>, area: Rect, layout: NodeLayout) {
        for (index, color) in NodeColor::ALL.iter().enumerate() {
            let (a, b) = self.to_screen(layout.swatch(index));
            if let Some(cells) = cells_covering(a, b, area) {
                frame
                    .buffer_mut()
                    .set_style(cells, Style::default().bg(self.theme.node_fill(*color)));
                if self.picked_color() == Some(*color) {
                    frame
                        .buffer_mut()
                        .set_string(cells.x, cells.y, "✓", self.theme.selection_style());
                }
            }
        }
    }

    fn picked_color(&self) -> Option<NodeColor> {
        let node_id = self.controller.open_picker()?;
        self.diagram.node(node_id).map(Node::color)
    }

    fn render_anchors(&self, frame: &mut Frame<'_>, area: Rect) {
        let pending = self.controller.connect_gesture().pending_from();
        let buffer = frame.buffer_mut();
        for (node_id, node) in self.diagram.nodes() {
            let layout = NodeLayout::of(node);
            for anchor in Anchor::ALL {
                let point = self.controller.local_to_screen(layout.anchor_point(anchor));
                let Some(cell) = cell_in(point, area) else {
                    continue;
                };
                let is_pending =
                    pending.is_some_and(|from| from.node_id == *node_id && from.anchor == anchor);
                let glyph = if is_pending { "◆" } else { "◇" };
                buffer.set_string(cell.x, cell.y, glyph, self.theme.anchor_style(is_pending));
            }
        }
    }

    fn render_popup(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(popup) = self.controller.popup() else {
            return;
        };
        let current = self.diagram.connection(popup.connection_id());
        let bounds = popup.bounds();
        let Some(cells) = cells_covering(
            bounds.origin,
            Point::new(bounds.right(), bounds.bottom()),
            area,
        ) else {
            return;
        };
        frame.render_widget(Clear, cells);

        for (item, rect) in popup.items() {
            let Some(item_cells) =
                cells_covering(rect.origin, Point::new(rect.right(), rect.bottom()), area)
            else {
                continue;
            };
            let buffer = frame.buffer_mut();
            match item {
                PopupItem::Delete => {
                    buffer.set_style(item_cells, self.theme.toast_style(true));
                    buffer.set_stringn(
                        item_cells.x,
                        item_cells.y,
                        " ✕ delete connection",
                        usize::from(item_cells.width),
                        self.theme.toast_style(true),
                    );
                }
                PopupItem::Color(color) => {
                    buffer.set_style(item_cells, Style::default().bg(self.theme.connection(color)));
                    if current.is_some_and(|connection| connection.color() == color) {
                        buffer.set_string(
                            item_cells.x,
                            item_cells.y,
                            "✓",
                            self.theme.selection_style(),
                        );
                    }
                }
                PopupItem::Direction(direction) => {
                    let label = match direction {
                        ArrowDirection::None => " ── ",
                        ArrowDirection::OneWay => " ─▶ ",
                        ArrowDirection::TwoWay => " ◀▶ ",
                    };
                    let style = if current.is_some_and(|connection| connection.direction() == direction)
                    {
                        self.theme.selection_style()
                    } else {
                        self.theme.footer_label_style()
                    };
                    buffer.set_style(item_cells, style);
                    buffer.set_stringn(
                        item_cells.x,
                        item_cells.y,
                        label,
                        usize::from(item_cells.width),
                        style,
                    );
                }
            }
        }
    }
}
