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
use super::session::{Session, User};
use super::validation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validation::email(&self.email)?;
        validation::password(&self.password)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    session: Option<Session>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthResponse {
    fn into_session(self) -> Result<Option<Session>, ApiError> {
        if !self.success {
            return Err(ApiError::Status {
                status: 200,
                message: self.error.or(self.message).unwrap_or_default(),
            });
        }
        Ok(self.session)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserResponse {
    Wrapped { user: User },
    Bare(User),
}

impl ApiClient {
    /// Logs in and stores the returned session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        credentials.validate()?;
        let call = Call::new(Method::POST, ["auth", "login"]).json(credentials)?;
        let response: AuthResponse = self.fetch_public(call).await?;
        let Some(session) = response.into_session()? else {
            return Err(ApiError::Status {
                status: 200,
                message: "login response carried no session".to_owned(),
            });
        };
        self.session().set(session.clone()).await;
        info!("event=login module=api status=ok");
        Ok(session)
    }

    /// Registers an account. When the backend signs the user in right away the session is
    /// stored and returned; otherwise (e.g. email confirmation pending) `None` is returned.
    pub async fn register(&self, credentials: &Credentials) -> Result<Option<Session>, ApiError> {
        credentials.validate()?;
        let call = Call::new(Method::POST, ["auth", "register"]).json(credentials)?;
        let response: AuthResponse = self.fetch_public(call).await?;
        let session = response.into_session()?;
        if let Some(session) = &session {
            self.session().set(session.clone()).await;
        }
        info!(
            "event=register module=api status=ok signed_in={}",
            session.is_some()
        );
        Ok(session)
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let response: UserResponse = self.fetch(Call::get(["auth", "user"])).await?;
        Ok(match response {
            UserResponse::Wrapped { user } | UserResponse::Bare(user) => user,
        })
    }

    pub async fn logout(&self) {
        self.session().clear().await;
        info!("event=logout module=api status=ok");
    }
}
