// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowdesk: a terminal canvas editor and REST client for the Flowdesk productivity backend.
//!
//! The diagram engine (`model`, `ops`, `canvas`, `interact`, `tabs`) is synchronous and has no
//! I/O. `api` talks to the backend, `store` persists the auth session, and `tui` ties them
//! together behind a ratatui front end.

pub mod api;
pub mod canvas;
pub mod config;
pub mod interact;
pub mod logging;
pub mod model;
pub mod ops;
pub mod store;
pub mod tabs;
pub mod tui;
