// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Open diagrams ("tabs") and their save/load bookkeeping.
//!
//! The manager never performs I/O. Saves and loads are split into a `prepare`/`request` half that
//! produces what the caller must send, and a `complete` half fed with the response. Loads carry a
//! [`LoadTicket`]; a completion whose ticket is no longer pending (tab closed, superseded) is
//! discarded without side effects.

pub mod codec;

pub use codec::{decode_content, encode_content, ContentError};

use std::collections::BTreeMap;
use std::fmt;

use log::{info, warn};

use crate::model::{CanvasId, Diagram, TabId};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op};

#[derive(Debug, Clone)]
pub struct Tab {
    tab_id: TabId,
    name: String,
    resource_id: Option<CanvasId>,
    diagram: Diagram,
    saved_rev: u64,
    save_in_flight: bool,
}

impl Tab {
    fn new(tab_id: TabId, name: String, resource_id: Option<CanvasId>, diagram: Diagram) -> Self {
        let saved_rev = diagram.rev();
        Self {
            tab_id,
            name,
            resource_id,
            diagram,
            saved_rev,
            save_in_flight: false,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_id(&self) -> Option<&CanvasId> {
        self.resource_id.as_ref()
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// True when the diagram changed since it was created, loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.diagram.rev() != self.saved_rev
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(CanvasId),
}

/// Everything needed to issue one save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub tab_id: TabId,
    pub name: String,
    pub content: String,
    pub target: SaveTarget,
    /// Diagram revision captured in `content`.
    pub rev: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    canvas_id: CanvasId,
}

impl LoadTicket {
    pub fn canvas_id(&self) -> &CanvasId {
        &self.canvas_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDecision {
    /// A tab bound to the resource is already open; it is now active.
    Activated(TabId),
    /// A load for the resource is already in flight.
    AlreadyPending,
    /// The caller must fetch the resource and report back with this ticket.
    Fetch(LoadTicket),
}

#[derive(Debug)]
pub struct TabManager {
    tabs: Vec<Tab>,
    active: Option<usize>,
    next_tab_id: u64,
    next_generation: u64,
    pending_loads: BTreeMap<u64, CanvasId>,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_tab_id: 1,
            next_generation: 1,
            pending_loads: BTreeMap::new(),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.tab_id == tab_id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active.and_then(|index| self.tabs.get(index))
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active().map(Tab::tab_id)
    }

    pub fn active_diagram(&self) -> Option<&Diagram> {
        self.active().map(Tab::diagram)
    }

    pub fn pending_load_count(&self) -> usize {
        self.pending_loads.len()
    }

    pub fn is_loading(&self, canvas_id: &CanvasId) -> bool {
        self.pending_loads.values().any(|pending| pending == canvas_id)
    }

    fn allocate_tab_id(&mut self) -> TabId {
        let id = TabId::new(self.next_tab_id);
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        id
    }

    fn index_of(&self, tab_id: TabId) -> Result<usize, TabError> {
        self.tabs
            .iter()
            .position(|tab| tab.tab_id == tab_id)
            .ok_or(TabError::UnknownTab { tab_id })
    }

    /// Appends an empty diagram named `Canvas N` and activates it.
    pub fn new_tab(&mut self) -> TabId {
        let name = format!("Canvas {}", self.tabs.len() + 1);
        self.push_tab(name, None, Diagram::new())
    }

    fn push_tab(&mut self, name: String, resource_id: Option<CanvasId>, diagram: Diagram) -> TabId {
        let tab_id = self.allocate_tab_id();
        info!(
            "event=tab_open module=tabs tab_id={} bound={}",
            tab_id,
            resource_id.is_some()
        );
        self.tabs.push(Tab::new(tab_id, name, resource_id, diagram));
        self.active = Some(self.tabs.len() - 1);
        tab_id
    }

    pub fn activate(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let index = self.index_of(tab_id)?;
        self.active = Some(index);
        Ok(())
    }

    /// Moves activation by `step` positions, wrapping around.
    pub fn cycle(&mut self, step: isize) {
        if self.tabs.is_empty() {
            return;
        }
        let len = self.tabs.len() as isize;
        let current = self.active.unwrap_or(0) as isize;
        self.active = Some((current + step).rem_euclid(len) as usize);
    }

    /// Removes the tab. Only the closed tab is affected; no load is ever issued.
    pub fn close(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let index = self.index_of(tab_id)?;
        self.tabs.remove(index);

        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active == index => Some(index.saturating_sub(1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };

        info!(
            "event=tab_close module=tabs tab_id={} remaining={}",
            tab_id,
            self.tabs.len()
        );
        Ok(())
    }

    /// Empty names are allowed.
    pub fn rename(&mut self, tab_id: TabId, name: impl Into<String>) -> Result<(), TabError> {
        let index = self.index_of(tab_id)?;
        self.tabs[index].name = name.into();
        Ok(())
    }

    /// Applies ops to the active diagram. `Ok(None)` when no tab is active.
    pub fn apply_to_active(&mut self, ops: &[Op]) -> Result<Option<ApplyResult>, ApplyError> {
        let Some(tab) = self.active.and_then(|index| self.tabs.get_mut(index)) else {
            return Ok(None);
        };
        apply_ops(&mut tab.diagram, ops).map(Some)
    }

    pub fn prepare_save(&mut self) -> Result<SaveRequest, TabError> {
        let index = self.active.ok_or(TabError::NoActiveTab)?;
        let tab = self.tabs.get_mut(index).ok_or(TabError::NoActiveTab)?;
        if tab.save_in_flight {
            return Err(TabError::SaveInFlight { tab_id: tab.tab_id });
        }

        let content = encode_content(&tab.diagram).map_err(TabError::Content)?;
        tab.save_in_flight = true;

        let target = match &tab.resource_id {
            Some(id) => SaveTarget::Update(id.clone()),
            None => SaveTarget::Create,
        };
        info!(
            "event=canvas_save module=tabs status=start tab_id={} create={}",
            tab.tab_id,
            target == SaveTarget::Create
        );

        Ok(SaveRequest {
            tab_id: tab.tab_id,
            name: tab.name.clone(),
            content,
            target,
            rev: tab.diagram.rev(),
        })
    }

    /// Records a successful save; binds the tab to `canvas_id` if it was unbound.
    pub fn complete_save(
        &mut self,
        tab_id: TabId,
        canvas_id: CanvasId,
        rev: u64,
    ) -> Result<(), TabError> {
        let index = self.index_of(tab_id)?;
        let tab = &mut self.tabs[index];
        tab.save_in_flight = false;
        tab.saved_rev = rev;
        if tab.resource_id.is_none() {
            info!(
                "event=canvas_bind module=tabs tab_id={} canvas_id={}",
                tab_id, canvas_id
            );
            tab.resource_id = Some(canvas_id);
        }
        info!(
            "event=canvas_save module=tabs status=ok tab_id={} rev={}",
            tab_id, rev
        );
        Ok(())
    }

    /// Re-enables saving after a failed request. Nothing else changes.
    pub fn fail_save(&mut self, tab_id: TabId) {
        if let Ok(index) = self.index_of(tab_id) {
            self.tabs[index].save_in_flight = false;
        }
        warn!(
            "event=canvas_save module=tabs status=error tab_id={}",
            tab_id
        );
    }

    pub fn request_load(&mut self, canvas_id: &CanvasId) -> LoadDecision {
        if let Some(index) = self.bound_index(canvas_id) {
            self.active = Some(index);
            return LoadDecision::Activated(self.tabs[index].tab_id);
        }
        if self.is_loading(canvas_id) {
            return LoadDecision::AlreadyPending;
        }

        let generation = self.next_generation;
        self.next_generation = self.next_generation.saturating_add(1);
        self.pending_loads.insert(generation, canvas_id.clone());
        info!(
            "event=canvas_load module=tabs status=start canvas_id={} ticket={}",
            canvas_id, generation
        );
        LoadDecision::Fetch(LoadTicket {
            generation,
            canvas_id: canvas_id.clone(),
        })
    }

    /// Opens the fetched canvas as a new active tab.
    ///
    /// A stale ticket is rejected. If a tab bound to the same canvas appeared in the meantime, it
    /// is activated instead of opening a duplicate.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        name: impl Into<String>,
        content: &str,
    ) -> Result<TabId, TabError> {
        if !self.take_pending(ticket) {
            return Err(TabError::StaleTicket {
                generation: ticket.generation,
            });
        }

        if let Some(index) = self.bound_index(&ticket.canvas_id) {
            self.active = Some(index);
            return Ok(self.tabs[index].tab_id);
        }

        let mut diagram = decode_content(content).map_err(|err| {
            warn!(
                "event=canvas_load module=tabs status=error canvas_id={} reason=content",
                ticket.canvas_id
            );
            TabError::Content(err)
        })?;
        diagram.set_rev(0);

        let tab_id = self.push_tab(name.into(), Some(ticket.canvas_id.clone()), diagram);
        info!(
            "event=canvas_load module=tabs status=ok canvas_id={} tab_id={}",
            ticket.canvas_id, tab_id
        );
        Ok(tab_id)
    }

    /// Forgets a pending load after a failed fetch.
    pub fn fail_load(&mut self, ticket: &LoadTicket) {
        self.take_pending(ticket);
        warn!(
            "event=canvas_load module=tabs status=error canvas_id={} ticket={}",
            ticket.canvas_id, ticket.generation
        );
    }

    /// Removes the pending entry for `ticket` if both its generation and canvas match.
    fn take_pending(&mut self, ticket: &LoadTicket) -> bool {
        if self.pending_loads.get(&ticket.generation) != Some(&ticket.canvas_id) {
            return false;
        }
        self.pending_loads.remove(&ticket.generation);
        true
    }

    /// Invalidates every outstanding ticket (for example on logout).
    pub fn cancel_pending_loads(&mut self) {
        self.pending_loads.clear();
    }

    /// Closes every tab and cancels pending loads. Tab ids and ticket generations keep counting
    /// up, so nothing issued before the reset can match anything issued after it.
    pub fn reset(&mut self) {
        self.tabs.clear();
        self.active = None;
        self.cancel_pending_loads();
        info!("event=tabs_reset module=tabs");
    }

    fn bound_index(&self, canvas_id: &CanvasId) -> Option<usize> {
        self.tabs
            .iter()
            .position(|tab| tab.resource_id.as_ref() == Some(canvas_id))
    }

    /// Unbinds tabs whose backend resource was deleted; their diagrams stay open.
    pub fn forget_resource(&mut self, canvas_id: &CanvasId) {
        for tab in &mut self.tabs {
            if tab.resource_id.as_ref() == Some(canvas_id) {
                tab.resource_id = None;
            }
        }
    }
}

#[derive(Debug)]
pub enum TabError {
    UnknownTab { tab_id: TabId },
    NoActiveTab,
    SaveInFlight { tab_id: TabId },
    StaleTicket { generation: u64 },
    Content(ContentError),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTab { tab_id } => write!(f, "tab not found (id={tab_id})"),
            Self::NoActiveTab => f.write_str("no active canvas"),
            Self::SaveInFlight { tab_id } => {
                write!(f, "a save is already in progress for tab {tab_id}")
            }
            Self::StaleTicket { generation } => {
                write!(f, "load result discarded (ticket {generation} no longer pending)")
            }
            Self::Content(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Content(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
