use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::constants::*;
use crate::error::{SessionError, ValidationError};
use crate::models::{AuthResponse, LoginPayload, RegisterPayload};
use crate::utils::{validate_min_length, validate_string_length};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

/// What survives a restart: the token and the dashboard the user picked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub role: Role,
    pub email: String,
}

/// Where the session is kept between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<Option<StoredSession>, SessionError>> + Send;

    fn save(&self, session: &StoredSession)
    -> impl Future<Output = Result<(), SessionError>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// JSON file, usually `<DATA_PATH>/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(session)?).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<RwLock<Option<StoredSession>>>,
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.inner.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.inner.write().await = None;
        Ok(())
    }
}

/// The one place that knows whether someone is logged in.
///
/// Built once with [`SessionContext::init`], which restores a stored session
/// and installs its token on the API client; consumers get the context (or a
/// clone) instead of reading storage themselves.
#[derive(Clone)]
pub struct SessionContext<S: SessionStore> {
    api: ApiClient,
    store: S,
    current: Arc<RwLock<Option<StoredSession>>>,
}

impl<S: SessionStore> SessionContext<S> {
    /// A stored session that cannot be parsed is cleared and the context starts
    /// logged out. Storage I/O failures are still returned.
    pub async fn init(api: ApiClient, store: S) -> Result<Self, SessionError> {
        let restored = match store.load().await {
            Ok(restored) => restored,
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!(error = %e, "discarding unreadable stored session");
                store.clear().await?;
                None
            }
            Err(e) => return Err(e),
        };
        if let Some(session) = &restored {
            tracing::info!(email = %session.email, role = ?session.role, "session restored");
        }
        api.set_token(restored.as_ref().map(|s| s.token.clone()))
            .await;

        Ok(Self {
            api,
            store,
            current: Arc::new(RwLock::new(restored)),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn current(&self) -> Option<StoredSession> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn role(&self) -> Option<Role> {
        self.current.read().await.as_ref().map(|s| s.role)
    }

    pub async fn is_admin(&self) -> bool {
        self.role().await == Some(Role::Admin)
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<StoredSession, SessionError> {
        validate_string_length(email, "Email", MAX_EMAIL_LENGTH)?;
        if password.is_empty() {
            return Err(ValidationError::Empty("Password").into());
        }

        let payload = LoginPayload {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .api
            .post(LOGIN_PATH, &payload)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "login failed"))?;

        self.establish(auth, payload.email, role).await
    }

    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: Role,
    ) -> Result<StoredSession, SessionError> {
        validate_string_length(full_name, "Full name", MAX_FULL_NAME_LENGTH)?;
        validate_string_length(email, "Email", MAX_EMAIL_LENGTH)?;
        validate_min_length(password, "Password", MIN_PASSWORD_LENGTH)?;
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let payload = RegisterPayload {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .api
            .post(REGISTER_PATH, &payload)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "registration failed"))?;

        self.establish(auth, payload.email, role).await
    }

    /// Forgets the session everywhere: storage, memory and the API client.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        *self.current.write().await = None;
        self.api.set_token(None).await;
        tracing::info!("logged out");
        Ok(())
    }

    async fn establish(
        &self,
        auth: AuthResponse,
        email: String,
        role: Role,
    ) -> Result<StoredSession, SessionError> {
        let session = StoredSession {
            token: auth.token,
            role,
            email,
        };
        self.store.save(&session).await?;
        self.api.set_token(Some(session.token.clone())).await;
        *self.current.write().await = Some(session.clone());
        tracing::info!(email = %session.email, role = ?session.role, "logged in");
        Ok(session)
    }
}
