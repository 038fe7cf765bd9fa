// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! REST client for the Flowdesk backend.
//!
//! All resource calls go through [`ApiClient`], which owns the bearer-token and refresh logic.
//! Resource modules only add typed request/response shapes and input validation.

pub mod auth;
pub mod canvas;
pub mod client;
pub mod error;
pub mod events;
pub mod projects;
pub mod session;
pub mod tasks;
pub mod validation;

pub use auth::Credentials;
pub use canvas::{CanvasRecord, CanvasWrite};
pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::{ApiError, ValidationError};
pub use events::{Event, NewEvent};
pub use projects::{Project, ProjectStats, ProjectStatus, ProjectWrite};
pub use session::{Session, SessionContext, User};
pub use tasks::{NewTask, PendingToggle, Task, TaskList, TaskPatch, TaskPriority, TaskStatus};
