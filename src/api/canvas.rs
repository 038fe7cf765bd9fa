// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use log::info;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{ApiClient, Call};
use super::error::ApiError;
use crate::model::CanvasId;
use crate::tabs::{SaveRequest, SaveTarget};

/// A stored canvas. `content` is the serialized diagram (see [`crate::tabs::decode_content`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasRecord {
    pub id: CanvasId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasWrite {
    pub name: String,
    pub content: String,
    pub description: String,
}

impl From<&SaveRequest> for CanvasWrite {
    fn from(request: &SaveRequest) -> Self {
        Self {
            name: request.name.clone(),
            content: request.content.clone(),
            description: String::new(),
        }
    }
}

impl ApiClient {
    pub async fn list_canvases(&self) -> Result<Vec<CanvasRecord>, ApiError> {
        self.fetch(Call::get(["canvas"])).await
    }

    pub async fn get_canvas(&self, canvas_id: &CanvasId) -> Result<CanvasRecord, ApiError> {
        self.fetch(Call::get(["canvas", canvas_id.as_str()])).await
    }

    pub async fn create_canvas(&self, canvas: &CanvasWrite) -> Result<CanvasRecord, ApiError> {
        let call = Call::new(Method::POST, ["canvas"]).json(canvas)?;
        self.fetch(call).await
    }

    pub async fn update_canvas(
        &self,
        canvas_id: &CanvasId,
        canvas: &CanvasWrite,
    ) -> Result<CanvasRecord, ApiError> {
        let call = Call::new(Method::PUT, ["canvas", canvas_id.as_str()]).json(canvas)?;
        self.fetch(call).await
    }

    pub async fn delete_canvas(&self, canvas_id: &CanvasId) -> Result<(), ApiError> {
        self.send(Call::new(Method::DELETE, ["canvas", canvas_id.as_str()]))
            .await
    }

    /// Performs the create or update a tab asked for and returns the id the canvas is stored
    /// under.
    pub async fn save_canvas(&self, request: &SaveRequest) -> Result<CanvasId, ApiError> {
        let body = CanvasWrite::from(request);
        let record = match &request.target {
            SaveTarget::Create => self.create_canvas(&body).await?,
            SaveTarget::Update(canvas_id) => self.update_canvas(canvas_id, &body).await?,
        };
        info!(
            "event=canvas_save module=api canvas_id={} created={}",
            record.id,
            request.target == SaveTarget::Create
        );
        Ok(record.id)
    }
}
