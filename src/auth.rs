use crate::api::ApiClient;
use crate::feedback::{Feedback, Route};
use crate::models::{CurrentUser, LoginData, LoginRequest};
use crate::session::SessionContext;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Default)]
struct AuthState {
    user: Option<CurrentUser>,
    token: Option<String>,
    loading: bool,
    error: Option<String>,
    initialized: bool,
}

pub struct AuthStore {
    client: ApiClient,
    session: SessionContext,
    feedback: Arc<dyn Feedback>,
    state: Mutex<AuthState>,
}

impl AuthStore {
    pub fn new(client: ApiClient, session: SessionContext, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            client,
            session,
            feedback,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.lock();
        state.token.is_some() && state.user.is_some()
    }

    pub fn user(&self) -> Option<CurrentUser> {
        self.state.lock().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Adopts `token` and `user` from a handoff query string (`?token=..&user=..`)
    /// when both are present; otherwise loads the persisted session. Runs once.
    pub async fn initialize(&self, query: Option<&str>) {
        if self.initialized() {
            return;
        }

        let handoff = query.and_then(parse_handoff);
        let (token, user) = match handoff {
            Some((token, user)) => {
                self.persist(&token, &user).await;
                (Some(token), Some(user))
            }
            None => (self.session.token().await, self.session.current_user().await),
        };

        let mut state = self.state.lock();
        state.token = token;
        state.user = user;
        state.initialized = true;
    }

    pub async fn login(&self, username: &str, password: &str) -> bool {
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
        }

        let form = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let result = self
            .client
            .post_form::<_, LoginData>("auth/login", &form, None)
            .await;

        let ok = match result {
            Ok(response) => {
                let data = response.body.data;
                let user = data.user();
                self.persist(&data.token, &user).await;
                info!(user_id = user.id, "logged in");

                {
                    let mut state = self.state.lock();
                    state.token = Some(data.token);
                    state.user = Some(user);
                    state.initialized = true;
                }

                let message = if response.body.message.is_empty() {
                    "Login successful"
                } else {
                    response.body.message.as_str()
                };
                self.feedback.success(message);
                self.feedback.redirect(Route::Home);
                true
            }
            Err(err) => {
                warn!(username, "login failed: {err}");
                self.state.lock().error = Some(err.message());
                self.feedback.error("Invalid credentials or user not found.");
                false
            }
        };

        self.state.lock().loading = false;
        ok
    }

    pub async fn logout(&self) {
        self.state.lock().loading = true;

        match self.session.clear().await {
            Ok(()) => {
                {
                    let mut state = self.state.lock();
                    state.user = None;
                    state.token = None;
                    state.initialized = false;
                }
                self.feedback.success("Logout successful");
                self.feedback.redirect(Route::Login);
            }
            Err(err) => {
                let message = err.to_string();
                self.feedback
                    .error(&format!("Error during logout: {message}"));
                self.state.lock().error = Some(message);
            }
        }

        self.state.lock().loading = false;
    }

    async fn persist(&self, token: &str, user: &CurrentUser) {
        if let Err(err) = self.session.set_token(token).await {
            error!("failed to persist token: {err}");
        }
        if let Err(err) = self.session.set_user(user).await {
            error!("failed to persist user: {err}");
        }
    }
}

fn parse_handoff(query: &str) -> Option<(String, CurrentUser)> {
    let query = query.trim_start_matches('?');
    let mut token = None;
    let mut user = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "token" => token = Some(value.into_owned()),
            "user" => user = Some(value.into_owned()),
            _ => {}
        }
    }

    let (token, user) = (token?, user?);
    match serde_json::from_str::<CurrentUser>(&user) {
        Ok(user) if !token.is_empty() => Some((token, user)),
        Ok(_) => None,
        Err(err) => {
            error!("failed to parse auth handoff user: {err}");
            None
        }
    }
}
