// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use log::warn;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{ApiClient, Call};
use super::error::ApiError;
use super::validation;
use crate::model::TaskId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    /// The status a completion toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validation::required("title", &self.title)?;
        Ok(())
    }
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validation::required("title", title)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: TaskStatus,
}

impl ApiClient {
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch(Call::get(["tasks"])).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        task.validate()?;
        let call = Call::new(Method::POST, ["tasks"]).json(task)?;
        self.fetch(call).await
    }

    pub async fn update_task(&self, task_id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        patch.validate()?;
        let call = Call::new(Method::PUT, ["tasks", task_id.as_str()]).json(patch)?;
        self.fetch(call).await
    }

    pub async fn set_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<(), ApiError> {
        let call = Call::new(Method::PUT, ["tasks", task_id.as_str(), "status"])
            .json(&StatusBody { status })?;
        self.send(call).await
    }

    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), ApiError> {
        self.send(Call::new(Method::DELETE, ["tasks", task_id.as_str()]))
            .await
    }
}

/// A completion toggle that has been applied locally but not yet confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending toggle must be confirmed or rolled back"]
pub struct PendingToggle {
    task_id: TaskId,
    previous: TaskStatus,
    next: TaskStatus,
}

impl PendingToggle {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn previous(&self) -> TaskStatus {
        self.previous
    }

    pub fn next(&self) -> TaskStatus {
        self.next
    }
}

/// The task list as shown to the user.
///
/// The completion toggle is the one optimistic mutation in the client: the status flips
/// immediately and is reverted if the backend rejects the change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn remove(&mut self, task_id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == task_id)?;
        Some(self.tasks.remove(index))
    }

    pub fn begin_toggle(&mut self, task_id: &TaskId) -> Option<PendingToggle> {
        let task = self.tasks.iter_mut().find(|task| &task.id == task_id)?;
        let previous = task.status;
        let next = previous.toggled();
        task.status = next;
        Some(PendingToggle {
            task_id: task_id.clone(),
            previous,
            next,
        })
    }

    /// Restores the status from before the toggle, unless something else changed it since.
    pub fn rollback(&mut self, pending: PendingToggle) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == pending.task_id) {
            if task.status == pending.next {
                task.status = pending.previous;
            }
        }
    }

    /// Flips the status locally, sends it, and reverts on failure.
    pub async fn toggle_completed(
        &mut self,
        client: &ApiClient,
        task_id: &TaskId,
    ) -> Result<TaskStatus, ApiError> {
        let Some(pending) = self.begin_toggle(task_id) else {
            return Err(ApiError::NotFound {
                path: format!("/tasks/{task_id}"),
            });
        };
        let next = pending.next();
        match client.set_task_status(task_id, next).await {
            Ok(()) => Ok(next),
            Err(err) => {
                warn!("event=task_toggle module=api task_id={task_id} status=rollback err={err}");
                self.rollback(pending);
                Err(err)
            }
        }
    }
}
