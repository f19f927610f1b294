use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Credentials, Role, User};

/// Authentication state as the UI sees it. `Loading` covers the initial
/// session probe before the first resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.is_admin()).unwrap_or(false)
    }
}

/// Session provider the app delegates identity to. Implementations hold
/// whatever token or cookie the provider needs; callers only ever see
/// the resolved `User` with its role claim.
#[async_trait]
pub trait SessionService: Send + Sync + Debug {
    /// Resolve the current session, if any.
    async fn current_user(&self) -> Result<Option<User>>;

    async fn login(&self, credentials: Credentials) -> Result<User>;

    async fn logout(&self) -> Result<()>;
}

/// In-process session holder. Starts signed out; `login` accepts any
/// non-empty email and grants the role registered for it.
#[derive(Debug, Default)]
pub struct StaticSession {
    current: RwLock<Option<User>>,
    admins: Vec<String>,
}

impl StaticSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails in `admins` sign in with the Admin role claim.
    pub fn with_admins(admins: Vec<String>) -> Self {
        Self {
            current: RwLock::new(None),
            admins,
        }
    }

    pub fn signed_in(user: User) -> Arc<Self> {
        Arc::new(Self {
            current: RwLock::new(Some(user)),
            admins: Vec::new(),
        })
    }
}

#[async_trait]
impl SessionService for StaticSession {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.current.read().await.clone())
    }

    async fn login(&self, credentials: Credentials) -> Result<User> {
        let email = match credentials {
            Credentials::EmailPassword { email, .. } => email,
            Credentials::Token { .. } => {
                return Err(anyhow!("Token sign-in is not supported"));
            }
        };
        if email.is_empty() {
            return Err(anyhow!("Email is required"));
        }

        let role = if self.admins.contains(&email) {
            Role::Admin
        } else {
            Role::Viewer
        };
        let user = User {
            id: format!("user_{}", email.replace('@', "_")),
            email: email.clone(),
            display_name: None,
            role,
        };

        info!("Signed in as {} ({:?})", email, user.role);
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        *self.current.write().await = None;
        info!("Signed out");
        Ok(())
    }
}
