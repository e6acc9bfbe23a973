use crate::models::CurrentUser;
use crate::storage::KeyValueStore;
use serde::{Serialize, de::DeserializeOwned};
use std::io;
use std::sync::Arc;
use tracing::{error, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).await
    }

    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.read(USER_KEY).await
    }

    pub async fn set_token(&self, token: &str) -> io::Result<()> {
        if token.is_empty() {
            error!("refusing to store an empty auth token");
            return Ok(());
        }
        self.write(TOKEN_KEY, token).await
    }

    /// Users with id 0 or an empty username are ignored.
    pub async fn set_user(&self, user: &CurrentUser) -> io::Result<()> {
        if user.id == 0 || user.username.is_empty() {
            warn!(id = user.id, "refusing to store incomplete user record");
            return Ok(());
        }
        self.write(USER_KEY, user).await
    }

    pub async fn clear(&self) -> io::Result<()> {
        self.store.clear().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some() && self.current_user().await.is_some()
    }

    pub async fn can_access_profile(&self, profile_id: u64) -> bool {
        self.current_user()
            .await
            .is_some_and(|user| user.id == profile_id)
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key).await?;
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(key, "failed to parse session value: {err}");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> io::Result<()> {
        let serialized = serde_json::to_string(value).map_err(io::Error::other)?;
        self.store.set(key, serialized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> (SessionContext, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (SessionContext::new(store.clone()), store)
    }

    fn alice() -> CurrentUser {
        CurrentUser {
            id: 7,
            username: "alice".into(),
        }
    }

    #[tokio::test]
    async fn values_are_stored_as_json() {
        let (session, store) = session();
        session.set_token("abc").await.unwrap();
        session.set_user(&alice()).await.unwrap();

        assert_eq!(store.get(TOKEN_KEY).await.as_deref(), Some("\"abc\""));
        assert_eq!(
            store.get(USER_KEY).await.as_deref(),
            Some(r#"{"id":7,"username":"alice"}"#)
        );
        assert_eq!(session.token().await.as_deref(), Some("abc"));
        assert_eq!(session.current_user().await, Some(alice()));
    }

    #[tokio::test]
    async fn authenticated_needs_token_and_user() {
        let (session, _) = session();
        assert!(!session.is_authenticated().await);

        session.set_token("abc").await.unwrap();
        assert!(!session.is_authenticated().await);

        session.set_user(&alice()).await.unwrap();
        assert!(session.is_authenticated().await);

        session.clear().await.unwrap();
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn incomplete_values_are_not_stored() {
        let (session, _) = session();
        session.set_token("").await.unwrap();
        session
            .set_user(&CurrentUser {
                id: 0,
                username: "ghost".into(),
            })
            .await
            .unwrap();
        assert_eq!(session.token().await, None);
        assert_eq!(session.current_user().await, None);
    }

    #[tokio::test]
    async fn profile_access_is_own_id_only() {
        let (session, _) = session();
        assert!(!session.can_access_profile(7).await);
        session.set_user(&alice()).await.unwrap();
        assert!(session.can_access_profile(7).await);
        assert!(!session.can_access_profile(8).await);
    }

    #[tokio::test]
    async fn garbage_values_read_as_absent() {
        let (session, store) = session();
        store.set(USER_KEY, "{broken".into()).await.unwrap();
        assert_eq!(session.current_user().await, None);
    }
}
