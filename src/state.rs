use crate::api::ApiClient;
use crate::auth::AuthStore;
use crate::config::AppConfig;
use crate::feedback::Feedback;
use crate::session::SessionContext;
use crate::stats_view::StatsView;
use crate::storage::{FileStore, KeyValueStore};
use crate::url_store::UrlStore;
use crate::user_store::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub client: ApiClient,
    pub session: SessionContext,
    pub feedback: Arc<dyn Feedback>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        feedback: Arc<dyn Feedback>,
    ) -> Self {
        Self {
            client: ApiClient::new(config.api_url.clone()),
            session: SessionContext::new(store),
            config,
            feedback,
        }
    }

    pub fn with_file_session(config: AppConfig, feedback: Arc<dyn Feedback>) -> Self {
        let store = Arc::new(FileStore::new(config.session_path.clone()));
        Self::new(config, store, feedback)
    }

    pub fn auth(&self) -> AuthStore {
        AuthStore::new(self.client.clone(), self.session.clone(), self.feedback.clone())
    }

    pub fn urls(&self) -> UrlStore {
        UrlStore::new(self.client.clone(), self.session.clone(), self.feedback.clone())
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.client.clone(), self.session.clone(), self.feedback.clone())
    }

    pub fn stats_view(&self) -> StatsView {
        StatsView::new(self.client.clone(), self.session.clone(), self.feedback.clone())
    }
}
