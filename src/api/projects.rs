// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{ApiClient, Call};
use super::error::ApiError;
use super::validation;
use crate::model::ProjectId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWrite {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl ProjectWrite {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: ProjectStatus::default(),
            deadline: None,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validation::required("title", &self.title)?;
        if let Some(deadline) = &self.deadline {
            validation::timestamp("deadline", deadline)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    pub on_hold: usize,
    pub completed: usize,
}

impl ProjectStats {
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        projects
            .into_iter()
            .fold(Self::default(), |mut stats, project| {
                stats.total += 1;
                match project.status {
                    ProjectStatus::Active => stats.active += 1,
                    ProjectStatus::OnHold => stats.on_hold += 1,
                    ProjectStatus::Completed => stats.completed += 1,
                    ProjectStatus::Cancelled => {}
                }
                stats
            })
    }
}

impl ApiClient {
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.fetch(Call::get(["projects"])).await
    }

    pub async fn create_project(&self, project: &ProjectWrite) -> Result<Project, ApiError> {
        project.validate()?;
        let call = Call::new(Method::POST, ["projects"]).json(project)?;
        self.fetch(call).await
    }

    pub async fn update_project(
        &self,
        project_id: &ProjectId,
        project: &ProjectWrite,
    ) -> Result<Project, ApiError> {
        project.validate()?;
        let call = Call::new(Method::PUT, ["projects", project_id.as_str()]).json(project)?;
        self.fetch(call).await
    }

    pub async fn delete_project(&self, project_id: &ProjectId) -> Result<(), ApiError> {
        self.send(Call::new(Method::DELETE, ["projects", project_id.as_str()]))
            .await
    }

    pub async fn project_stats(&self) -> Result<ProjectStats, ApiError> {
        let projects = self.list_projects().await?;
        Ok(ProjectStats::from_projects(&projects))
    }
}
