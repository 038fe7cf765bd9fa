// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// A client-side validation failure, raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read).
    Transport(reqwest::Error),
    /// The refresh token was rejected or the retried request was still unauthorized. The session
    /// has been cleared.
    SessionExpired,
    /// A protected endpoint was hit without any session.
    Unauthenticated,
    Validation(ValidationError),
    NotFound { path: String },
    Status { status: u16, message: String },
    Decode { path: String, source: serde_json::Error },
    InvalidUrl { url: String },
}

impl ApiError {
    /// Errors that mean the user must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthenticated)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "network error: {err}"),
            Self::SessionExpired => f.write_str("Session expired. Please login again."),
            Self::Unauthenticated => f.write_str("not logged in"),
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::NotFound { path } => write!(f, "not found: {path}"),
            Self::Status { status, message } if message.is_empty() => {
                write!(f, "request failed with status {status}")
            }
            Self::Status { status, message } => {
                write!(f, "request failed with status {status}: {message}")
            }
            Self::Decode { path, source } => write!(f, "unexpected response from {path}: {source}"),
            Self::InvalidUrl { url } => write!(f, "invalid api url: {url}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
            Self::SessionExpired
            | Self::Unauthenticated
            | Self::NotFound { .. }
            | Self::Status { .. }
            | Self::InvalidUrl { .. } => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
