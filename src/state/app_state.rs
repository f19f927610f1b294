use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::core::viewmodels::Property;
use crate::events::EventBus;
use crate::models::Credentials;
use crate::services::{AuthState, ContentService, SessionService};
use crate::store::ContentStore;

/// Root object wiring the injected store and session provider to the
/// services and the shared event bus. View models hang off this.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub session: Arc<dyn SessionService>,
    pub content_service: Arc<ContentService>,
    pub event_bus: Arc<EventBus>,
    pub auth_state: Property<AuthState>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        session: Arc<dyn SessionService>,
        config: Config,
    ) -> Self {
        let content_service = Arc::new(ContentService::new(store.clone()));
        Self {
            store,
            session,
            content_service,
            event_bus: Arc::new(EventBus::default()),
            auth_state: Property::new(AuthState::Loading, "auth_state"),
            config,
        }
    }

    /// Resolve the existing session, if any. Called once at startup
    /// while the UI shows the loading state.
    pub async fn initialize(&self) -> Result<()> {
        match self.session.current_user().await {
            Ok(Some(user)) => {
                info!("Session restored for {}", user.email);
                let user_id = user.id.clone();
                self.auth_state.set(AuthState::SignedIn(user)).await;
                self.event_bus.emit_user_signed_in(user_id);
            }
            Ok(None) => {
                self.auth_state.set(AuthState::SignedOut).await;
            }
            Err(e) => {
                error!("Session probe failed: {}", e);
                self.auth_state.set(AuthState::SignedOut).await;
            }
        }
        Ok(())
    }

    pub async fn sign_in(&self, credentials: Credentials) -> Result<()> {
        let user = self.session.login(credentials).await?;
        let user_id = user.id.clone();
        self.auth_state.set(AuthState::SignedIn(user)).await;
        self.event_bus.emit_user_signed_in(user_id);
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<()> {
        let user_id = self
            .auth_state
            .get()
            .await
            .user()
            .map(|u| u.id.clone())
            .unwrap_or_default();

        self.session.logout().await?;
        self.auth_state.set(AuthState::SignedOut).await;
        if !user_id.is_empty() {
            self.event_bus.emit_user_signed_out(user_id);
        }
        Ok(())
    }

    /// Whether the signed-in user may open the admin dashboard.
    pub async fn is_admin(&self) -> bool {
        self.auth_state.get().await.is_admin()
    }
}
