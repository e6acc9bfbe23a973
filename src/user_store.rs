use crate::api::ApiClient;
use crate::feedback::{Feedback, handle_auth_error};
use crate::models::{CreateUserRequest, User};
use crate::session::SessionContext;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default)]
struct UserState {
    profiles: Vec<User>,
    current_user: Option<User>,
    loading: bool,
    error: Option<String>,
}

pub struct UserStore {
    client: ApiClient,
    session: SessionContext,
    feedback: Arc<dyn Feedback>,
    state: Mutex<UserState>,
}

impl UserStore {
    pub fn new(client: ApiClient, session: SessionContext, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            client,
            session,
            feedback,
            state: Mutex::new(UserState::default()),
        }
    }

    pub fn current(&self) -> Option<User> {
        self.state.lock().current_user.clone()
    }

    pub fn profiles(&self) -> Vec<User> {
        self.state.lock().profiles.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.begin();
        let token = self.session.token().await;

        let outcome = match self.client.get::<User>("user/current", token.as_deref()).await {
            Ok(response) => {
                let user = response.body.data;
                self.state.lock().current_user = Some(user.clone());
                Some(user)
            }
            Err(err) => {
                warn!("failed to load current user: {err}");
                if let Some(status) = err.status() {
                    handle_auth_error(status, &self.session, self.feedback.as_ref()).await;
                }
                let message = err.message();
                self.feedback
                    .error(&format!("Error saat memuat user: {message}"));
                self.state.lock().error = Some(message);
                None
            }
        };

        self.finish();
        outcome
    }

    pub async fn profile_by_id(&self, profile_id: u64) -> Option<User> {
        self.begin();
        let token = self.session.token().await;

        let outcome = match self
            .client
            .get::<User>(&format!("user/{profile_id}"), token.as_deref())
            .await
        {
            Ok(response) => Some(response.body.data),
            Err(err) => {
                warn!(profile_id, "failed to load profile: {err}");
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

    pub async fn create_user(&self, request: &CreateUserRequest) -> Option<User> {
        self.begin();

        let outcome = match self.client.post_json::<_, User>("user", request, None).await {
            Ok(response) if response.status == 201 => {
                let user = response.body.data;
                self.state.lock().profiles.push(user.clone());
                self.feedback.success("Successfully registered");
                Some(user)
            }
            Ok(response) => {
                warn!(status = response.status, "unexpected status from register");
                self.feedback.warning(
                    "Gagal register user: Data tidak valid atau ada kesalahan pada permintaan.",
                );
                None
            }
            Err(err) => {
                warn!("register failed: {err}");
                let message = err.message();
                self.feedback
                    .error(&format!("Error saat register user: {message}"));
                self.state.lock().error = Some(message);
                None
            }
        };

        self.finish();
        outcome
    }

    fn begin(&self) {
        let mut state = self.state.lock();
        state.loading = true;
        state.error = None;
    }

    fn finish(&self) {
        self.state.lock().loading = false;
    }
}
