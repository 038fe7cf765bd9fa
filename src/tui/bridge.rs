// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Channel pair between the blocking UI thread and async API calls.
//!
//! The UI never awaits: it sends a [`Command`] and later drains [`Completion`]s between frames.

use log::debug;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::api::{ApiClient, ApiError, CanvasRecord, Credentials, Session};
use crate::model::{CanvasId, TabId};
use crate::tabs::{LoadTicket, SaveRequest};

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Login(Credentials),
    Register(Credentials),
    Logout,
    Load(LoadTicket),
    Save(SaveRequest),
    ListCanvases,
    DeleteCanvas(CanvasId),
}

#[derive(Debug)]
pub(crate) enum Completion {
    /// `Ok(None)` means the account was created but no session was issued.
    Authenticated(Result<Option<Session>, ApiError>),
    LoggedOut,
    Loaded {
        ticket: LoadTicket,
        result: Result<CanvasRecord, ApiError>,
    },
    Saved {
        tab_id: TabId,
        rev: u64,
        result: Result<CanvasId, ApiError>,
    },
    Listed(Result<Vec<CanvasRecord>, ApiError>),
    Deleted {
        canvas_id: CanvasId,
        result: Result<(), ApiError>,
    },
}

pub(crate) struct Bridge {
    commands: UnboundedSender<Command>,
    completions: UnboundedReceiver<Completion>,
}

/// The far side of a [`Bridge`]: receives commands and answers with completions.
pub(crate) struct BridgeRemote {
    pub(crate) commands: UnboundedReceiver<Command>,
    pub(crate) completions: UnboundedSender<Completion>,
}

impl Bridge {
    pub(crate) fn pair() -> (Self, BridgeRemote) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        (
            Self {
                commands: command_tx,
                completions: completion_rx,
            },
            BridgeRemote {
                commands: command_rx,
                completions: completion_tx,
            },
        )
    }

    /// Connects a bridge to `client`. Must be called inside a tokio runtime; each command runs as
    /// its own task so a slow save never blocks a load.
    pub(crate) fn spawn(client: ApiClient) -> Self {
        let (bridge, mut remote) = Self::pair();
        tokio::spawn(async move {
            while let Some(command) = remote.commands.recv().await {
                let client = client.clone();
                let completions = remote.completions.clone();
                tokio::spawn(async move {
                    let completion = execute(&client, command).await;
                    if completions.send(completion).is_err() {
                        debug!("event=bridge_drop module=tui reason=ui_gone");
                    }
                });
            }
        });
        bridge
    }

    /// Returns `false` when the worker is gone.
    pub(crate) fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub(crate) fn try_recv(&mut self) -> Option<Completion> {
        match self.completions.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

async fn execute(client: &ApiClient, command: Command) -> Completion {
    match command {
        Command::Login(credentials) => {
            Completion::Authenticated(client.login(&credentials).await.map(Some))
        }
        Command::Register(credentials) => {
            Completion::Authenticated(client.register(&credentials).await)
        }
        Command::Logout => {
            client.logout().await;
            Completion::LoggedOut
        }
        Command::Load(ticket) => {
            let result = client.get_canvas(ticket.canvas_id()).await;
            Completion::Loaded { ticket, result }
        }
        Command::Save(request) => Completion::Saved {
            tab_id: request.tab_id,
            rev: request.rev,
            result: client.save_canvas(&request).await,
        },
        Command::ListCanvases => Completion::Listed(client.list_canvases().await),
        Command::DeleteCanvas(canvas_id) => {
            let result = client.delete_canvas(&canvas_id).await;
            Completion::Deleted { canvas_id, result }
        }
    }
}
