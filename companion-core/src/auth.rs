//! Authentication collaborator and the session context the rest of the
//! app reads the signed-in user from.

use crate::models::UserId;
use crate::{AuthError, CoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
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

    pub fn validate(&self) -> Result<(), AuthError> {
        if !looks_like_email(&self.email) {
            return Err(AuthError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        Ok(())
    }

    fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<Credentials, AuthError> {
        let creds = Credentials::new(self.email.clone(), self.password.clone());
        creds.validate()?;
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(creds)
    }
}

fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

struct Account {
    user_id: UserId,
    password: String,
}

/// In-process provider. `offline()` accepts any well-formed credentials and
/// keys the user by email, which is what the local single-user app runs on.
#[derive(Default)]
pub struct MemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
    offline: bool,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn register(&self, registration: &Registration) -> Result<UserId, AuthError> {
        let creds = registration.validate()?;
        let email = creds.normalized_email();
        let mut m = self.accounts.write();
        if m.contains_key(&email) {
            return Err(AuthError::AlreadyRegistered);
        }
        let user_id = Uuid::new_v4().to_string();
        m.insert(
            email,
            Account {
                user_id: user_id.clone(),
                password: creds.password,
            },
        );
        Ok(user_id)
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let email = credentials.normalized_email();
        let user_id = if self.offline {
            email.clone()
        } else {
            let m = self.accounts.read();
            let account = m.get(&email).ok_or(AuthError::InvalidCredential)?;
            if account.password != credentials.password {
                return Err(AuthError::InvalidCredential);
            }
            account.user_id.clone()
        };
        Ok(Session {
            user_id,
            email,
            signed_in_at: Utc::now(),
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }
}

pub type SubscriptionId = u64;
type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Holds the current session and notifies subscribers when it changes.
pub struct SessionContext {
    provider: Arc<dyn AuthProvider>,
    current: RwLock<Option<Session>>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            current: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// The listener is called right away with the current value.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        self.listeners.write().push((id, listener.clone()));
        let current = self.current();
        listener(current.as_ref());
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut v = self.listeners.write();
        let before = v.len();
        v.retain(|(i, _)| *i != id);
        v.len() != before
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        credentials.validate()?;
        let session = self.provider.sign_in(credentials).await?;
        info!(user = %session.user_id, "signed in");
        *self.current.write() = Some(session.clone());
        self.publish();
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let Some(session) = self.current() else {
            return Ok(());
        };
        self.provider.sign_out(&session).await?;
        info!(user = %session.user_id, "signed out");
        *self.current.write() = None;
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        // listeners may read the context, so call them without holding locks
        let listeners: Vec<Listener> = self.listeners.read().iter().map(|(_, l)| l.clone()).collect();
        let current = self.current();
        for l in listeners {
            l(current.as_ref());
        }
    }
}
