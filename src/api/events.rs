// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::client::{ApiClient, Call};
use super::error::ApiError;
use super::validation;
use crate::model::EventId;

/// Calendar event. Dates stay in their wire form (ISO 8601); use [`Event::start`] and
/// [`Event::end`] for parsed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
}

impl Event {
    pub fn start(&self) -> Option<OffsetDateTime> {
        validation::timestamp("start_date", &self.start_date).ok()
    }

    pub fn end(&self) -> Option<OffsetDateTime> {
        validation::timestamp("end_date", &self.end_date).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), ApiError> {
        validation::required("title", &self.title)?;
        validation::date_range(&self.start_date, &self.end_date)?;
        Ok(())
    }
}

impl ApiClient {
    /// Lists events, optionally restricted to `[start_date, end_date]`.
    pub async fn list_events(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<Event>, ApiError> {
        let mut call = Call::get(["events"]);
        if let Some(start) = start_date {
            validation::timestamp("start_date", start)?;
            call = call.query("start_date", start);
        }
        if let Some(end) = end_date {
            validation::timestamp("end_date", end)?;
            call = call.query("end_date", end);
        }
        self.fetch(call).await
    }

    pub async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError> {
        event.validate()?;
        let call = Call::new(Method::POST, ["events"]).json(event)?;
        self.fetch(call).await
    }

    pub async fn delete_event(&self, event_id: &EventId) -> Result<(), ApiError> {
        self.send(Call::new(Method::DELETE, ["events", event_id.as_str()]))
            .await
    }

    pub async fn delete_all_events(&self) -> Result<(), ApiError> {
        self.send(Call::new(Method::DELETE, ["events", "all"])).await
    }
}
