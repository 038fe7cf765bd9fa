// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local persistence.
//!
//! Diagrams live on the backend; the only thing kept on disk is the auth session, so a restart
//! does not force a new login.

pub mod session_file;

pub use session_file::{SessionFile, StoreError, WriteDurability};
