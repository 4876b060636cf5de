//! Session/Credential Gate: registration and login against the persisted
//! credential list, plus the per-process session marker.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::store::KeyValueStore;
use crate::errors::AppError;
use crate::models::user::Credential;

/// Persistent key holding the JSON array of credentials.
pub const USERS_KEY: &str = "users";
/// Ephemeral key holding the logged-in email.
pub const SESSION_KEY: &str = "currentUser";

pub struct CredentialGate {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl CredentialGate {
    pub fn new(persistent: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        CredentialGate {
            persistent,
            session,
        }
    }

    /// Loads the credential list. A missing key is an empty list; so is an
    /// unreadable or corrupt value, which is logged and otherwise ignored.
    async fn load_users(&self) -> Vec<Credential> {
        let raw = match self.persistent.get(USERS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Credential store unreadable; treating as empty");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Credential store corrupt; treating as empty");
            Vec::new()
        })
    }

    /// Appends a new credential.
    ///
    /// The list is re-read right before the write so that accounts registered
    /// by another process since startup are kept.
    pub async fn register(&self, email: &str, password: &str, confirm: &str) -> Result<(), AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        if password != confirm {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let mut users = self.load_users().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict(
                "User already exists. Please login.".to_string(),
            ));
        }

        users.push(Credential {
            email: email.to_string(),
            password: password.to_string(),
        });
        let serialized = serde_json::to_string(&users)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize credentials: {e}")))?;
        self.persistent
            .set(USERS_KEY, &serialized)
            .await
            .map_err(|e| AppError::Registration(e.to_string()))?;

        info!(email, users = users.len(), "Registered user");
        Ok(())
    }

    /// Verifies the pair against the stored list and records the session marker.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        let users = self.load_users().await;
        let matched = users
            .iter()
            .any(|u| u.email == email && u.password == password);
        if !matched {
            info!(email, "Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        self.session.set(SESSION_KEY, email).await?;
        info!(email, "Logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.session.remove(SESSION_KEY).await?;
        info!("Logged out");
        Ok(())
    }

    /// Email recorded by the last successful login, if the session is still open.
    pub async fn current_user(&self) -> Result<Option<String>, AppError> {
        self.session.get(SESSION_KEY).await
    }
}
