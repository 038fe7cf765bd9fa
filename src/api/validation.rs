// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client-side input checks. These run before any request is sent.

use std::sync::OnceLock;

use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    required("email", value)?;
    if !email_regex().is_match(value.trim()) {
        return Err(ValidationError::new("email", "is not a valid email address"));
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    required("password", value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (interpreted as midnight UTC).
pub fn timestamp(field: &'static str, value: &str) -> Result<OffsetDateTime, ValidationError> {
    required(field, value)?;
    let value = value.trim();
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| ValidationError::new(field, "must be an ISO 8601 date or timestamp"))
}

/// Validates `start <= end` for a date range.
pub fn date_range(start: &str, end: &str) -> Result<(), ValidationError> {
    let start = timestamp("start_date", start)?;
    let end = timestamp("end_date", end)?;
    if end < start {
        return Err(ValidationError::new("end_date", "must not be before start_date"));
    }
    Ok(())
}
