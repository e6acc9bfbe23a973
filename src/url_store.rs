use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::feedback::{Feedback, handle_auth_error};
use crate::models::{CreateUrlRequest, ErrorBody, UpdateUrlRequest, Url};
use crate::session::SessionContext;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct UrlState {
    urls: Vec<Url>,
    loading: bool,
    error: Option<String>,
    validation_errors: BTreeMap<String, String>,
}

pub struct UrlStore {
    client: ApiClient,
    session: SessionContext,
    feedback: Arc<dyn Feedback>,
    state: Mutex<UrlState>,
}

impl UrlStore {
    pub fn new(client: ApiClient, session: SessionContext, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            client,
            session,
            feedback,
            state: Mutex::new(UrlState::default()),
        }
    }

    pub fn urls(&self) -> Vec<Url> {
        self.state.lock().urls.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn validation_error(&self, field: &str) -> String {
        self.state
            .lock()
            .validation_errors
            .get(field)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_validation_errors(&self) -> bool {
        !self.state.lock().validation_errors.is_empty()
    }

    pub fn clear_validation_errors(&self) {
        self.state.lock().validation_errors.clear();
    }

    pub async fn fetch_all_urls(&self) -> Option<Vec<Url>> {
        self.begin(false);
        let token = self.session.token().await;

        let result = self.client.get::<Vec<Url>>("url/all", token.as_deref()).await;
        let outcome = match result {
            Ok(response) => {
                let urls = response.body.data;
                if urls.is_empty() {
                    self.feedback.warning("Data url kosong");
                } else {
                    self.feedback.success("Data url berhasil dimuat");
                }
                self.state.lock().urls = urls.clone();
                Some(urls)
            }
            Err(err) => {
                warn!("failed to load urls: {err}");
                if let Some(status) = err.status() {
                    handle_auth_error(status, &self.session, self.feedback.as_ref()).await;
                }
                let message = err.message();
                self.feedback
                    .error(&format!("Error saat memuat url: {message}"));
                self.state.lock().error = Some(message);
                None
            }
        };

        self.finish();
        outcome
    }

    pub async fn current_user_urls(&self) -> Option<Vec<Url>> {
        self.begin(false);
        let token = self.session.token().await;

        let outcome = match self.client.get::<Vec<Url>>("my-urls", token.as_deref()).await {
            Ok(response) => Some(response.body.data),
            Err(err) => {
                warn!("failed to load own urls: {err}");
                match err.status() {
                    Some(status) => {
                        handle_auth_error(status, &self.session, self.feedback.as_ref()).await;
                        if status == 404 {
                            self.feedback.error("User not found.");
                        }
                    }
                    None => {
                        let message = err.message();
                        self.feedback.error(&format!("Error: {message}"));
                        self.state.lock().error = Some(message);
                    }
                }
                None
            }
        };

        self.finish();
        outcome
    }

    /// Anonymous shortening is allowed; the result is only added to the list
    /// when a session token is present.
    pub async fn shorten_url(&self, request: &CreateUrlRequest) -> Option<Url> {
        self.begin(true);
        let token = self.session.token().await;

        let result = self
            .client
            .post_json::<_, Url>("shorten", request, token.as_deref())
            .await;
        let outcome = match result {
            Ok(response) if response.status == 201 => {
                let url = response.body.data;
                info!(short_url = %url.short_url, "url shortened");
                if token.is_some() {
                    self.state.lock().urls.push(url.clone());
                }
                self.feedback.success("Url shortened successfully");
                Some(url)
            }
            Ok(response) => {
                warn!(status = response.status, "unexpected status from shorten");
                None
            }
            Err(err) => {
                self.handle_write_error(err).await;
                None
            }
        };

        self.finish();
        outcome
    }

    pub async fn update_url(&self, id: u64, request: &UpdateUrlRequest) -> Option<Url> {
        self.begin(true);
        let token = self.session.token().await;

        let result = self
            .client
            .put_json::<_, Url>(&id.to_string(), request, token.as_deref())
            .await;
        let outcome = match result {
            Ok(response) if response.status == 200 => {
                let url = response.body.data;
                if let Some(existing) = self.state.lock().urls.iter_mut().find(|u| u.id == url.id) {
                    *existing = url.clone();
                }
                self.feedback.success("Url updated successfully");
                Some(url)
            }
            Ok(response) => {
                warn!(status = response.status, "unexpected status from update");
                None
            }
            Err(err) => {
                self.handle_write_error(err).await;
                None
            }
        };

        self.finish();
        outcome
    }

    async fn handle_write_error(&self, err: ApiError) {
        warn!("url write failed: {err}");
        if let Some(status) = err.status() {
            handle_auth_error(status, &self.session, self.feedback.as_ref()).await;
        }

        match err {
            ApiError::Validation { fields, body, .. } => {
                let ErrorBody {
                    message,
                    errors,
                    error,
                    ..
                } = body;
                if errors.is_some() {
                    self.state.lock().validation_errors = fields;
                    match message {
                        Some(message) => self
                            .feedback
                            .error(&format!("Validation Error: {message}")),
                        None => self.feedback.error("Please check the form for errors"),
                    }
                } else if let Some(text) = message.or(error) {
                    self.feedback.error(&format!("Error: {text}"));
                    self.state.lock().error = Some(text);
                }
            }
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => {}
            ApiError::Transport(_) | ApiError::Decode(_) => {
                let message = err.message();
                self.feedback.error(&format!("Error: {message}"));
                self.state.lock().error = Some(message);
            }
            ApiError::NotFound { .. } | ApiError::Server { .. } => {
                let message = err
                    .body_message()
                    .unwrap_or("Unknown server error")
                    .to_string();
                self.feedback.error(&format!("Server Error: {message}"));
                self.state.lock().error = Some(message);
            }
        }
    }

    fn begin(&self, clear_validation: bool) {
        let mut state = self.state.lock();
        state.loading = true;
        state.error = None;
        if clear_validation {
            state.validation_errors.clear();
        }
    }

    fn finish(&self) {
        self.state.lock().loading = false;
    }
}
