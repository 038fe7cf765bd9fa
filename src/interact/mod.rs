// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer and keyboard interaction for the canvas surface.
//!
//! [`CanvasController`] owns only transient UI state (viewport, gestures, open menus). It reads
//! the active diagram and answers every event with a [`Response`] carrying the ops to apply.
//! Drags and pans commit as they go: every pointer-move yields its own op batch.

pub mod connect;
pub mod popup;

pub use connect::{ConnectGesture, ConnectStep};
pub use popup::{ConnectionPopup, PopupItem};

use crate::canvas::{hit_test, Hit, NodeLayout, NodeRegion, Viewport};
use crate::model::{Diagram, Endpoint, NodeId, Point};
use crate::ops::Op;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning {
        last: Point,
    },
    Dragging {
        node_id: NodeId,
        pointer_start: Point,
        node_start: Point,
        region: NodeRegion,
        moved: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SelfLoopRejected,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub ops: Vec<Op>,
    pub notice: Option<Notice>,
}

impl Response {
    fn none() -> Self {
        Self::default()
    }

    fn op(op: Op) -> Self {
        Self {
            ops: vec![op],
            notice: None,
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            ops: Vec::new(),
            notice: Some(notice),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CanvasController {
    viewport: Viewport,
    origin: Point,
    pan_modifier: bool,
    gesture: Gesture,
    connect: ConnectGesture,
    editing: Option<NodeId>,
    picker: Option<NodeId>,
    popup: Option<ConnectionPopup>,
    pointer: Option<Point>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::new(),
            origin: Point::ORIGIN,
            pan_modifier: false,
            gesture: Gesture::Idle,
            connect: ConnectGesture::Idle,
            editing: None,
            picker: None,
            popup: None,
            pointer: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Screen position of the surface's top-left corner.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn editing(&self) -> Option<NodeId> {
        self.editing
    }

    pub fn open_picker(&self) -> Option<NodeId> {
        self.picker
    }

    pub fn popup(&self) -> Option<&ConnectionPopup> {
        self.popup.as_ref()
    }

    pub fn connect_gesture(&self) -> &ConnectGesture {
        &self.connect
    }

    /// Last pointer position seen, in screen space.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn dragging(&self) -> Option<NodeId> {
        match self.gesture {
            Gesture::Dragging { node_id, .. } => Some(node_id),
            _ => None,
        }
    }

    pub fn screen_to_local(&self, screen: Point) -> Point {
        self.viewport.screen_to_local(screen, self.origin)
    }

    pub fn local_to_screen(&self, local: Point) -> Point {
        self.viewport.local_to_screen(local, self.origin)
    }

    /// Drops every piece of per-diagram state; used when the active tab changes.
    pub fn reset_for_activation(&mut self) {
        let origin = self.origin;
        let pan_modifier = self.pan_modifier;
        *self = Self::new();
        self.origin = origin;
        self.pan_modifier = pan_modifier;
    }

    pub fn pointer_down(&mut self, diagram: Option<&Diagram>, screen: Point) -> Response {
        self.pointer = Some(screen);
        let Some(diagram) = diagram else {
            return Response::none();
        };

        if let Some(popup) = self.popup {
            return self.popup_click(diagram, popup, screen);
        }

        if self.pan_modifier {
            self.gesture = Gesture::Panning { last: screen };
            return Response::none();
        }

        let local = self.screen_to_local(screen);
        let hit = hit_test(diagram, local, self.picker);

        let stays_in_editor = matches!(
            hit,
            Hit::Node { node_id, region: NodeRegion::Content } if self.editing == Some(node_id)
        );
        if !stays_in_editor {
            self.editing = None;
        }
        let keeps_picker = match hit {
            Hit::Swatch { .. } => true,
            Hit::Node {
                node_id,
                region: NodeRegion::ColorButton,
            } => self.picker == Some(node_id),
            _ => false,
        };
        if !keeps_picker {
            self.picker = None;
        }

        match hit {
            Hit::Swatch { node_id, color } => {
                self.picker = None;
                Response::op(Op::set_node_color(node_id, color))
            }
            Hit::Node { node_id, region } => self.node_down(diagram, node_id, region, screen),
            Hit::Connection { connection_id, .. } => {
                self.popup = Some(ConnectionPopup::new(connection_id, screen));
                Response::none()
            }
            Hit::Empty => {
                if self.connect.is_connecting() {
                    self.connect.cancel();
                    return Response::none();
                }
                Response::op(Op::add_node(local))
            }
        }
    }

    fn node_down(
        &mut self,
        diagram: &Diagram,
        node_id: NodeId,
        region: NodeRegion,
        screen: Point,
    ) -> Response {
        match region {
            NodeRegion::Anchor(anchor) => {
                match self.connect.click_anchor(Endpoint::new(node_id, anchor)) {
                    ConnectStep::Started => Response::none(),
                    ConnectStep::Completed(op) => Response::op(op),
                    ConnectStep::RejectedSelfLoop => Response::notice(Notice::SelfLoopRejected),
                }
            }
            NodeRegion::ColorButton => {
                self.picker = match self.picker {
                    Some(open) if open == node_id => None,
                    _ => Some(node_id),
                };
                Response::none()
            }
            NodeRegion::DeleteButton => {
                self.forget_node(node_id);
                Response::op(Op::RemoveNode { node_id })
            }
            NodeRegion::Content if self.editing == Some(node_id) => Response::none(),
            NodeRegion::Content | NodeRegion::Body => {
                let Some(node) = diagram.node(node_id) else {
                    return Response::none();
                };
                self.gesture = Gesture::Dragging {
                    node_id,
                    pointer_start: screen,
                    node_start: node.position(),
                    region,
                    moved: false,
                };
                Response::none()
            }
        }
    }

    /// Any click closes the popup. A click on another curve opens that curve's popup instead.
    fn popup_click(&mut self, diagram: &Diagram, popup: ConnectionPopup, screen: Point) -> Response {
        self.popup = None;
        let connection_id = popup.connection_id();
        match popup.item_at(screen) {
            None => {
                if let Hit::Connection { connection_id, .. } =
                    hit_test(diagram, self.screen_to_local(screen), self.picker)
                {
                    self.popup = Some(ConnectionPopup::new(connection_id, screen));
                }
                Response::none()
            }
            Some(PopupItem::Delete) => Response::op(Op::RemoveConnection { connection_id }),
            Some(PopupItem::Color(color)) => {
                Response::op(Op::set_connection_color(connection_id, color))
            }
            Some(PopupItem::Direction(direction)) => {
                Response::op(Op::set_connection_direction(connection_id, direction))
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) -> Response {
        self.pointer = Some(screen);
        match &mut self.gesture {
            Gesture::Idle => Response::none(),
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan_by(delta);
                Response::none()
            }
            Gesture::Dragging {
                node_id,
                pointer_start,
                node_start,
                moved,
                ..
            } => {
                let delta = screen - *pointer_start;
                if delta.length() > 0.0 {
                    *moved = true;
                }
                let position = *node_start + self.viewport.screen_delta_to_local(delta);
                Response::op(Op::move_node(*node_id, position))
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point) -> Response {
        self.pointer = Some(screen);
        if let Gesture::Dragging {
            node_id,
            region: NodeRegion::Content,
            moved: false,
            ..
        } = self.gesture
        {
            self.editing = Some(node_id);
        }
        self.gesture = Gesture::Idle;
        Response::none()
    }

    pub fn set_pan_modifier(&mut self, held: bool) {
        self.pan_modifier = held;
        if !held && self.is_panning() {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.gesture = Gesture::Idle;
        self.pointer = None;
    }

    /// Focus left the surface: every gesture ends and edit mode exits.
    pub fn blur(&mut self) {
        self.pointer_leave();
        self.pan_modifier = false;
        self.connect.cancel();
        self.editing = None;
    }

    /// Escape: leaves the innermost transient mode. Returns whether anything was open.
    pub fn escape(&mut self) -> bool {
        if self.editing.take().is_some() {
            return true;
        }
        if self.connect.is_connecting() {
            self.connect.cancel();
            return true;
        }
        if self.popup.take().is_some() {
            return true;
        }
        self.picker.take().is_some()
    }

    pub fn commit_edit(&mut self) {
        self.editing = None;
    }

    /// Typed text for the node in edit mode; every keystroke commits.
    pub fn type_char(&self, diagram: &Diagram, ch: char) -> Response {
        self.edit_content(diagram, |content| content.push(ch))
    }

    pub fn backspace(&self, diagram: &Diagram) -> Response {
        self.edit_content(diagram, |content| {
            content.pop();
        })
    }

    fn edit_content(&self, diagram: &Diagram, edit: impl FnOnce(&mut String)) -> Response {
        let Some(node_id) = self.editing else {
            return Response::none();
        };
        let Some(node) = diagram.node(node_id) else {
            return Response::none();
        };
        let mut content = node.content().to_owned();
        edit(&mut content);
        Response::op(Op::set_node_content(node_id, content))
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        self.viewport.zoom_about(screen, self.origin, factor);
    }

    /// Clears menus and modes bound to a node that no longer exists.
    fn forget_node(&mut self, node_id: NodeId) {
        if self.editing == Some(node_id) {
            self.editing = None;
        }
        if self.picker == Some(node_id) {
            self.picker = None;
        }
        if self
            .connect
            .pending_from()
            .is_some_and(|from| from.node_id == node_id)
        {
            self.connect.cancel();
        }
    }

    /// Drops state that points at objects removed from `diagram` by someone else.
    pub fn sync_with(&mut self, diagram: &Diagram) {
        for node_id in [self.editing, self.picker, self.dragging()]
            .into_iter()
            .flatten()
        {
            if diagram.node(node_id).is_none() {
                self.forget_node(node_id);
                if self.dragging() == Some(node_id) {
                    self.gesture = Gesture::Idle;
                }
            }
        }
        if let Some(from) = self.connect.pending_from() {
            if diagram.node(from.node_id).is_none() {
                self.connect.cancel();
            }
        }
        if let Some(popup) = self.popup {
            if diagram.connection(popup.connection_id()).is_none() {
                self.popup = None;
            }
        }
    }

    /// Screen rectangle of `node_id`'s box, for renderers.
    pub fn node_screen_bounds(&self, diagram: &Diagram, node_id: NodeId) -> Option<(Point, Point)> {
        let bounds = NodeLayout::of(diagram.node(node_id)?).bounds();
        Some((
            self.local_to_screen(bounds.origin),
            self.local_to_screen(Point::new(bounds.right(), bounds.bottom())),
        ))
    }
}

#[cfg(test)]
mod tests;
