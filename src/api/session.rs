// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The authenticated session shared by every request.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::store::{SessionFile, StoreError};

/// Tokens are treated as expired this long before their `exp` claim.
pub const EXPIRY_LEEWAY: Duration = Duration::seconds(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn access_expires_at(&self) -> Option<OffsetDateTime> {
        token_expiry(&self.access_token)
    }

    pub fn is_access_expired(&self, now: OffsetDateTime) -> bool {
        is_token_expired(&self.access_token, now)
    }
}

/// Reads the `exp` claim from a JWT without verifying it.
pub fn token_expiry(token: &str) -> Option<OffsetDateTime> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    let seconds = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|value| value as i64))?;
    OffsetDateTime::from_unix_timestamp(seconds).ok()
}

/// Opaque tokens (no readable `exp`) are never considered expired here; the server's 401 decides.
pub fn is_token_expired(token: &str, now: OffsetDateTime) -> bool {
    token_expiry(token).is_some_and(|exp| exp - EXPIRY_LEEWAY <= now)
}

struct SessionInner {
    state: Mutex<Option<Session>>,
    refresh: Mutex<()>,
    file: Option<SessionFile>,
}

/// Shared, optionally persisted auth session.
///
/// Cloning is cheap; all clones observe the same session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("file", &self.inner.file.as_ref().map(SessionFile::path))
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn in_memory() -> Self {
        Self::build(None)
    }

    pub fn persistent(file: SessionFile) -> Self {
        Self::build(Some(file))
    }

    fn build(file: Option<SessionFile>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(None),
                refresh: Mutex::new(()),
                file,
            }),
        }
    }

    /// Loads the persisted session, if any. Returns whether a session is now present.
    pub async fn hydrate(&self) -> Result<bool, StoreError> {
        let Some(file) = &self.inner.file else {
            return Ok(self.inner.state.lock().await.is_some());
        };
        let loaded: Option<Session> = file.load()?;
        let present = loaded.is_some();
        *self.inner.state.lock().await = loaded;
        info!("event=session_hydrate module=api present={present}");
        Ok(present)
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.state.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.lock().await.is_some()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .lock()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub async fn set(&self, session: Session) {
        self.persist(&session);
        *self.inner.state.lock().await = Some(session);
    }

    /// Replaces the tokens after a refresh. A missing refresh token keeps the previous one.
    /// Returns `false` when there is no session to update.
    pub async fn update_tokens(&self, access_token: String, refresh_token: Option<String>) -> bool {
        let mut state = self.inner.state.lock().await;
        let Some(session) = state.as_mut() else {
            return false;
        };
        session.access_token = access_token;
        if let Some(refresh_token) = refresh_token {
            session.refresh_token = refresh_token;
        }
        self.persist(session);
        true
    }

    pub async fn clear(&self) {
        *self.inner.state.lock().await = None;
        if let Some(file) = &self.inner.file {
            if let Err(err) = file.clear() {
                warn!("event=session_clear module=api status=error err={err}");
            }
        }
        info!("event=session_clear module=api status=ok");
    }

    /// Serializes refresh attempts so concurrent 401s trigger a single refresh.
    pub(crate) async fn refresh_guard(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.inner.refresh.lock().await
    }

    fn persist(&self, session: &Session) {
        if let Some(file) = &self.inner.file {
            if let Err(err) = file.save(session) {
                warn!("event=session_persist module=api status=error err={err}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{exp}}}"#));
    format!("{header}.{payload}.sig")
}
