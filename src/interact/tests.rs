// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::model::{
    Anchor, ConnectionColor, ConnectionId, Diagram, Direction, Endpoint, NodeColor, NodeId, Point,
    Vector,
};
use crate::ops::{apply_ops, Op};

use super::{CanvasController, Notice};

/// Node 1 at (0, 0), node 2 at (400, 0), connection 1 from 1.right to 2.left (a straight run at y=30).
#[fixture]
fn diagram() -> Diagram {
    let mut diagram = Diagram::new();
    apply_ops(
        &mut diagram,
        &[
            Op::add_node(Point::new(0.0, 0.0)),
            Op::add_node(Point::new(400.0, 0.0)),
            Op::connect(
                Endpoint::new(NodeId::new(1), Anchor::Right),
                Endpoint::new(NodeId::new(2), Anchor::Left),
            ),
        ],
    )
    .expect("seed");
    diagram
}

fn apply(diagram: &mut Diagram, ops: &[Op]) {
    apply_ops(diagram, ops).expect("apply");
}

#[rstest]
fn empty_click_creates_node_at_local_point(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.viewport_mut().set_zoom(2.0);
    controller.viewport_mut().pan_by(Vector::new(10.0, 20.0));

    let response = controller.pointer_down(Some(&diagram), Point::new(410.0, 620.0));
    assert_eq!(response.ops, vec![Op::add_node(Point::new(200.0, 300.0))]);
}

#[test]
fn click_without_active_diagram_is_a_no_op() {
    let mut controller = CanvasController::new();
    let response = controller.pointer_down(None, Point::new(10.0, 10.0));
    assert!(response.ops.is_empty());
}

#[rstest]
fn drag_moves_node_by_screen_delta_over_zoom(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.viewport_mut().set_zoom(2.0);

    let down = controller.pointer_down(Some(&diagram), Point::new(200.0, 70.0));
    assert!(down.ops.is_empty());
    assert_eq!(controller.dragging(), Some(NodeId::new(1)));

    let moved = controller.pointer_move(Point::new(240.0, 90.0));
    assert_eq!(
        moved.ops,
        vec![Op::move_node(NodeId::new(1), Point::new(20.0, 10.0))]
    );

    controller.pointer_up(Point::new(240.0, 90.0));
    assert_eq!(controller.dragging(), None);
    assert_eq!(controller.editing(), None);
}

#[rstest]
fn click_on_content_enters_edit_mode_and_keystrokes_commit(diagram: Diagram) {
    let mut diagram = diagram;
    let mut controller = CanvasController::new();
    let node_id = NodeId::new(1);

    controller.pointer_down(Some(&diagram), Point::new(100.0, 35.0));
    controller.pointer_up(Point::new(100.0, 35.0));
    assert_eq!(controller.editing(), Some(node_id));

    let typed = controller.type_char(&diagram, 'h');
    assert_eq!(typed.ops, vec![Op::set_node_content(node_id, "h")]);
    apply(&mut diagram, &typed.ops);
    let typed = controller.type_char(&diagram, 'i');
    apply(&mut diagram, &typed.ops);
    assert_eq!(diagram.node(node_id).expect("node").content(), "hi");

    let erased = controller.backspace(&diagram);
    assert_eq!(erased.ops, vec![Op::set_node_content(node_id, "h")]);

    assert!(controller.escape());
    assert_eq!(controller.editing(), None);
    assert!(controller.type_char(&diagram, 'x').ops.is_empty());
}

#[rstest]
fn clicking_elsewhere_leaves_edit_mode(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(100.0, 35.0));
    controller.pointer_up(Point::new(100.0, 35.0));
    assert!(controller.editing().is_some());

    controller.pointer_down(Some(&diagram), Point::new(100.0, 500.0));
    assert_eq!(controller.editing(), None);
}

#[rstest]
fn anchor_clicks_connect_two_nodes(diagram: Diagram) {
    let mut controller = CanvasController::new();

    let first = controller.pointer_down(Some(&diagram), Point::new(100.0, 1.0));
    assert!(first.ops.is_empty());
    assert!(controller.connect_gesture().is_connecting());
    assert_eq!(controller.dragging(), None);

    let second = controller.pointer_down(Some(&diagram), Point::new(500.0, 59.0));
    assert_eq!(
        second.ops,
        vec![Op::connect(
            Endpoint::new(NodeId::new(1), Anchor::Top),
            Endpoint::new(NodeId::new(2), Anchor::Bottom),
        )]
    );
    assert!(!controller.connect_gesture().is_connecting());
}

#[rstest]
fn anchor_on_same_node_is_rejected(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(100.0, 1.0));
    let response = controller.pointer_down(Some(&diagram), Point::new(1.0, 30.0));

    assert!(response.ops.is_empty());
    assert_eq!(response.notice, Some(Notice::SelfLoopRejected));
    assert!(!controller.connect_gesture().is_connecting());
}

#[rstest]
fn empty_click_cancels_pending_connection_without_creating_node(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(100.0, 1.0));
    let response = controller.pointer_down(Some(&diagram), Point::new(100.0, 500.0));
    assert!(response.ops.is_empty());
    assert!(!controller.connect_gesture().is_connecting());
}

#[rstest]
fn pan_requires_modifier_and_stops_on_release(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.set_pan_modifier(true);

    let down = controller.pointer_down(Some(&diagram), Point::new(100.0, 500.0));
    assert!(down.ops.is_empty());
    controller.pointer_move(Point::new(130.0, 540.0));
    assert_eq!(controller.viewport().pan(), Vector::new(30.0, 40.0));

    controller.set_pan_modifier(false);
    assert!(!controller.is_panning());
    controller.pointer_move(Point::new(200.0, 600.0));
    assert_eq!(controller.viewport().pan(), Vector::new(30.0, 40.0));
}

#[rstest]
fn curve_click_opens_popup_and_delete_removes_connection(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(300.0, 31.0));
    let popup = controller.popup().expect("popup");
    assert_eq!(popup.connection_id(), ConnectionId::new(1));
    assert_eq!(popup.anchor(), Point::new(300.0, 31.0));

    let response = controller.pointer_down(Some(&diagram), Point::new(310.0, 35.0));
    assert_eq!(
        response.ops,
        vec![Op::RemoveConnection {
            connection_id: ConnectionId::new(1)
        }]
    );
    assert!(controller.popup().is_none());
}

#[rstest]
fn outside_click_only_closes_popup(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(300.0, 31.0));
    let response = controller.pointer_down(Some(&diagram), Point::new(50.0, 300.0));
    assert!(response.ops.is_empty());
    assert!(controller.popup().is_none());
}

#[rstest]
fn reopening_popup_replaces_previous_one(diagram: Diagram) {
    let mut diagram = diagram;
    apply(
        &mut diagram,
        &[
            Op::add_node(Point::new(0.0, 300.0)),
            Op::connect(
                Endpoint::new(NodeId::new(3), Anchor::Right),
                Endpoint::new(NodeId::new(2), Anchor::Bottom),
            ),
        ],
    );
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(300.0, 31.0));
    assert_eq!(
        controller.popup().map(|p| p.connection_id()),
        Some(ConnectionId::new(1))
    );

    // One click on the other curve swaps the popup over.
    let response = controller.pointer_down(Some(&diagram), Point::new(387.5, 232.5));
    assert!(response.ops.is_empty());
    let popup = controller.popup().expect("popup for the second curve");
    assert_eq!(popup.connection_id(), ConnectionId::new(2));
    assert_eq!(popup.anchor(), Point::new(387.5, 232.5));
}

#[rstest]
fn picking_a_popup_item_applies_it_and_closes_popup(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(300.0, 31.0));

    // Color row: 24 px swatches starting at x=300, one row below the anchor.
    let response = controller.pointer_down(Some(&diagram), Point::new(360.0, 55.0));
    assert_eq!(
        response.ops,
        vec![Op::set_connection_color(
            ConnectionId::new(1),
            ConnectionColor::ALL[2]
        )]
    );
    assert!(controller.popup().is_none());

    // Direction row: 56 px options, two rows below the anchor.
    controller.pointer_down(Some(&diagram), Point::new(300.0, 31.0));
    let response = controller.pointer_down(Some(&diagram), Point::new(384.0, 71.0));
    assert_eq!(
        response.ops,
        vec![Op::set_connection_direction(
            ConnectionId::new(1),
            Direction::OneWay
        )]
    );
    assert!(controller.popup().is_none());
}

#[rstest]
fn color_button_opens_picker_and_swatch_commits(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(150.0, 8.0));
    assert_eq!(controller.open_picker(), Some(NodeId::new(1)));
    assert_eq!(controller.dragging(), None);

    let response = controller.pointer_down(Some(&diagram), Point::new(30.0, 70.0));
    assert_eq!(
        response.ops,
        vec![Op::set_node_color(NodeId::new(1), NodeColor::Red)]
    );
    assert_eq!(controller.open_picker(), None);
}

#[rstest]
fn color_button_toggles_picker(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(150.0, 8.0));
    controller.pointer_up(Point::new(150.0, 8.0));
    controller.pointer_down(Some(&diagram), Point::new(150.0, 8.0));
    assert_eq!(controller.open_picker(), None);
}

#[rstest]
fn delete_button_removes_node(diagram: Diagram) {
    let mut controller = CanvasController::new();
    let response = controller.pointer_down(Some(&diagram), Point::new(185.0, 8.0));
    assert_eq!(
        response.ops,
        vec![Op::RemoveNode {
            node_id: NodeId::new(1)
        }]
    );
}

#[rstest]
fn blur_ends_every_gesture(diagram: Diagram) {
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(100.0, 1.0));
    controller.set_pan_modifier(true);
    controller.pointer_down(Some(&diagram), Point::new(100.0, 500.0));
    assert!(controller.is_panning());

    controller.blur();
    assert!(!controller.is_panning());
    assert!(!controller.connect_gesture().is_connecting());
    let response = controller.pointer_move(Point::new(150.0, 550.0));
    assert!(response.ops.is_empty());
    assert_eq!(controller.viewport().pan(), Vector::ZERO);
}

#[rstest]
fn sync_drops_popup_for_removed_connection(diagram: Diagram) {
    let mut diagram = diagram;
    let mut controller = CanvasController::new();
    controller.pointer_down(Some(&diagram), Point::new(300.0, 31.0));
    assert!(controller.popup().is_some());

    apply(
        &mut diagram,
        &[Op::RemoveNode {
            node_id: NodeId::new(2),
        }],
    );
    controller.sync_with(&diagram);
    assert!(controller.popup().is_none());
}
