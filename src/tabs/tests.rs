// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::model::{CanvasId, NodeId, Point};
use crate::ops::Op;

use super::{LoadDecision, SaveTarget, TabError, TabManager};

const THREE_NODES: &str = r#"{"canvasItems": [
    {"id": 1, "position": {"x": 0, "y": 0}},
    {"id": 2, "position": {"x": 300, "y": 0}},
    {"id": 3, "position": {"x": 600, "y": 0}}
], "connections": [
    {"startId": 1, "endId": 2, "startPoint": "right", "endPoint": "left", "direction": "one-way"}
]}"#;

fn canvas_id(value: &str) -> CanvasId {
    CanvasId::new(value).expect("canvas id")
}

#[fixture]
fn two_tabs() -> TabManager {
    let mut tabs = TabManager::new();
    tabs.new_tab();
    tabs.apply_to_active(&[Op::add_node(Point::new(1.0, 1.0))])
        .expect("apply");
    tabs.new_tab();
    tabs.apply_to_active(&[Op::add_node(Point::new(2.0, 2.0))])
        .expect("apply");
    tabs
}

#[test]
fn new_tabs_are_numbered_and_activated() {
    let mut tabs = TabManager::new();
    let first = tabs.new_tab();
    let second = tabs.new_tab();

    assert_eq!(tabs.tab(first).expect("first").name(), "Canvas 1");
    assert_eq!(tabs.tab(second).expect("second").name(), "Canvas 2");
    assert_eq!(tabs.active_id(), Some(second));
    assert!(tabs.active_diagram().expect("diagram").is_empty());
}

#[rstest]
fn closing_inactive_tab_leaves_active_untouched(two_tabs: TabManager) {
    let mut tabs = two_tabs;
    let inactive = tabs.tabs()[0].tab_id();
    let active = tabs.active_id().expect("active");
    let before = tabs.active_diagram().cloned().expect("diagram");

    tabs.close(inactive).expect("close");

    assert_eq!(tabs.active_id(), Some(active));
    assert_eq!(tabs.active_diagram(), Some(&before));
    assert_eq!(tabs.pending_load_count(), 0);
}

#[rstest]
fn closing_active_tab_falls_back_to_previous(two_tabs: TabManager) {
    let mut tabs = two_tabs;
    let first = tabs.tabs()[0].tab_id();
    let second = tabs.tabs()[1].tab_id();

    tabs.close(second).expect("close");
    assert_eq!(tabs.active_id(), Some(first));

    tabs.close(first).expect("close");
    assert_eq!(tabs.active_id(), None);
    assert!(tabs.is_empty());
}

#[rstest]
fn closing_first_active_tab_activates_new_first(two_tabs: TabManager) {
    let mut tabs = two_tabs;
    let first = tabs.tabs()[0].tab_id();
    let second = tabs.tabs()[1].tab_id();
    tabs.activate(first).expect("activate");

    tabs.close(first).expect("close");
    assert_eq!(tabs.active_id(), Some(second));
}

#[test]
fn rename_accepts_empty_names() {
    let mut tabs = TabManager::new();
    let tab_id = tabs.new_tab();
    tabs.rename(tab_id, "").expect("rename");
    assert_eq!(tabs.tab(tab_id).expect("tab").name(), "");
}

#[test]
fn first_save_creates_and_later_saves_update() {
    let mut tabs = TabManager::new();
    let tab_id = tabs.new_tab();
    tabs.apply_to_active(&[Op::add_node(Point::ORIGIN)])
        .expect("apply");
    assert!(tabs.active().expect("tab").is_dirty());

    let request = tabs.prepare_save().expect("prepare");
    assert_eq!(request.target, SaveTarget::Create);
    assert!(request.content.contains("canvasItems"));
    tabs.complete_save(tab_id, canvas_id("41"), request.rev)
        .expect("complete");

    let tab = tabs.active().expect("tab");
    assert_eq!(tab.resource_id(), Some(&canvas_id("41")));
    assert!(!tab.is_dirty());

    let request = tabs.prepare_save().expect("prepare again");
    assert_eq!(request.target, SaveTarget::Update(canvas_id("41")));
}

#[test]
fn second_save_is_rejected_while_first_is_in_flight() {
    let mut tabs = TabManager::new();
    let tab_id = tabs.new_tab();
    tabs.prepare_save().expect("prepare");

    assert!(matches!(
        tabs.prepare_save(),
        Err(TabError::SaveInFlight { tab_id: busy }) if busy == tab_id
    ));

    tabs.fail_save(tab_id);
    let tab = tabs.active().expect("tab");
    assert!(!tab.save_in_flight());
    assert!(tab.resource_id().is_none());
    assert!(tabs.prepare_save().is_ok());
}

#[test]
fn save_without_active_tab_fails() {
    let mut tabs = TabManager::new();
    assert!(matches!(tabs.prepare_save(), Err(TabError::NoActiveTab)));
}

#[test]
fn edits_during_save_keep_tab_dirty() {
    let mut tabs = TabManager::new();
    let tab_id = tabs.new_tab();
    let request = tabs.prepare_save().expect("prepare");
    tabs.apply_to_active(&[Op::add_node(Point::ORIGIN)])
        .expect("apply");
    tabs.complete_save(tab_id, canvas_id("9"), request.rev)
        .expect("complete");
    assert!(tabs.active().expect("tab").is_dirty());
}

#[test]
fn load_opens_new_tab_and_advances_node_counter() {
    let mut tabs = TabManager::new();
    let LoadDecision::Fetch(ticket) = tabs.request_load(&canvas_id("x")) else {
        panic!("expected fetch");
    };

    let tab_id = tabs
        .complete_load(&ticket, "X", THREE_NODES)
        .expect("load");
    assert_eq!(tabs.active_id(), Some(tab_id));
    let tab = tabs.active().expect("tab");
    assert_eq!(tab.name(), "X");
    assert!(!tab.is_dirty());
    assert_eq!(tab.diagram().connections().len(), 1);

    tabs.apply_to_active(&[Op::RemoveNode {
        node_id: NodeId::new(2),
    }])
    .expect("remove");
    let created = tabs
        .apply_to_active(&[Op::add_node(Point::ORIGIN)])
        .expect("apply")
        .expect("active");
    assert_eq!(created.added_node(), Some(NodeId::new(4)));
    assert!(tabs.active_diagram().expect("diagram").connections().is_empty());
}

#[test]
fn loading_an_open_resource_activates_existing_tab() {
    let mut tabs = TabManager::new();
    let LoadDecision::Fetch(ticket) = tabs.request_load(&canvas_id("x")) else {
        panic!("expected fetch");
    };
    let loaded = tabs.complete_load(&ticket, "X", "").expect("load");
    tabs.new_tab();

    assert_eq!(
        tabs.request_load(&canvas_id("x")),
        LoadDecision::Activated(loaded)
    );
    assert_eq!(tabs.active_id(), Some(loaded));
    assert_eq!(tabs.len(), 2);
}

#[test]
fn duplicate_requests_share_one_ticket() {
    let mut tabs = TabManager::new();
    assert!(matches!(
        tabs.request_load(&canvas_id("x")),
        LoadDecision::Fetch(_)
    ));
    assert_eq!(
        tabs.request_load(&canvas_id("x")),
        LoadDecision::AlreadyPending
    );
    assert_eq!(tabs.pending_load_count(), 1);
}

#[test]
fn cancelled_ticket_completion_is_discarded() {
    let mut tabs = TabManager::new();
    let existing = tabs.new_tab();
    let LoadDecision::Fetch(ticket) = tabs.request_load(&canvas_id("x")) else {
        panic!("expected fetch");
    };
    tabs.cancel_pending_loads();

    let result = tabs.complete_load(&ticket, "X", THREE_NODES);
    assert!(matches!(result, Err(TabError::StaleTicket { .. })));
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs.active_id(), Some(existing));
}

#[test]
fn ticket_for_another_canvas_does_not_claim_a_pending_load() {
    let mut earlier = TabManager::new();
    let LoadDecision::Fetch(foreign) = earlier.request_load(&canvas_id("a")) else {
        panic!("expected fetch");
    };
    let mut tabs = TabManager::new();
    let LoadDecision::Fetch(ticket) = tabs.request_load(&canvas_id("b")) else {
        panic!("expected fetch");
    };
    assert_eq!(foreign.generation(), ticket.generation());

    let result = tabs.complete_load(&foreign, "A", THREE_NODES);
    assert!(matches!(result, Err(TabError::StaleTicket { .. })));
    assert!(tabs.is_empty());
    assert!(tabs.is_loading(&canvas_id("b")));

    tabs.complete_load(&ticket, "B", THREE_NODES)
        .expect("own ticket still completes");
    assert_eq!(tabs.active().expect("tab").name(), "B");
}

#[test]
fn reset_keeps_tab_ids_and_tickets_counting_up() {
    let mut tabs = TabManager::new();
    let before = tabs.new_tab();
    let LoadDecision::Fetch(old) = tabs.request_load(&canvas_id("a")) else {
        panic!("expected fetch");
    };

    tabs.reset();
    assert!(tabs.is_empty());
    assert_eq!(tabs.pending_load_count(), 0);

    let after = tabs.new_tab();
    assert_ne!(after, before);
    assert_eq!(tabs.tab(after).expect("tab").name(), "Canvas 1");
    let LoadDecision::Fetch(fresh) = tabs.request_load(&canvas_id("b")) else {
        panic!("expected fetch");
    };
    assert!(fresh.generation() > old.generation());

    let result = tabs.complete_load(&old, "A", THREE_NODES);
    assert!(matches!(result, Err(TabError::StaleTicket { .. })));
    assert_eq!(tabs.len(), 1);
    assert!(tabs.is_loading(&canvas_id("b")));
}

#[test]
fn malformed_content_leaves_tabs_unchanged() {
    let mut tabs = TabManager::new();
    let existing = tabs.new_tab();
    let LoadDecision::Fetch(ticket) = tabs.request_load(&canvas_id("x")) else {
        panic!("expected fetch");
    };

    let result = tabs.complete_load(&ticket, "X", "{\"canvasItems\": 3}");
    assert!(matches!(result, Err(TabError::Content(_))));
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs.active_id(), Some(existing));
    assert!(!tabs.is_loading(&canvas_id("x")));
}

#[test]
fn failed_load_can_be_retried() {
    let mut tabs = TabManager::new();
    let LoadDecision::Fetch(ticket) = tabs.request_load(&canvas_id("x")) else {
        panic!("expected fetch");
    };
    tabs.fail_load(&ticket);
    assert!(tabs.is_empty());
    assert!(matches!(
        tabs.request_load(&canvas_id("x")),
        LoadDecision::Fetch(_)
    ));
}

#[test]
fn no_op_batch_does_not_mark_the_tab_dirty() {
    let mut tabs = TabManager::new();
    tabs.new_tab();
    tabs.apply_to_active(&[Op::RemoveNode {
        node_id: NodeId::new(42),
    }])
    .expect("apply");
    assert!(!tabs.active().expect("tab").is_dirty());
}

#[test]
fn cycle_wraps_in_both_directions() {
    let mut tabs = TabManager::new();
    let first = tabs.new_tab();
    let _second = tabs.new_tab();
    let third = tabs.new_tab();

    tabs.cycle(1);
    assert_eq!(tabs.active_id(), Some(first));
    tabs.cycle(-1);
    assert_eq!(tabs.active_id(), Some(third));
}
