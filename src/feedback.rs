use crate::session::SessionContext;
use parking_lot::Mutex;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Home => "/",
        }
    }
}

pub trait Feedback: Send + Sync {
    fn notify(&self, level: Level, message: &str);
    fn redirect(&self, route: Route);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => info!(target: "notice", "{message}"),
            Level::Warning => warn!(target: "notice", "{message}"),
            Level::Error => error!(target: "notice", "{message}"),
        }
    }

    fn redirect(&self, route: Route) {
        info!(target: "notice", path = route.path(), "redirect requested");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    Notice(Level, String),
    Redirect(Route),
}

#[derive(Debug, Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().clone()
    }

    pub fn notices(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                FeedbackEvent::Notice(level, message) => Some((*level, message.clone())),
                FeedbackEvent::Redirect(_) => None,
            })
            .collect()
    }

    pub fn redirects(&self) -> Vec<Route> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                FeedbackEvent::Redirect(route) => Some(*route),
                FeedbackEvent::Notice(..) => None,
            })
            .collect()
    }
}

impl Feedback for RecordingFeedback {
    fn notify(&self, level: Level, message: &str) {
        self.events
            .lock()
            .push(FeedbackEvent::Notice(level, message.to_string()));
    }

    fn redirect(&self, route: Route) {
        self.events.lock().push(FeedbackEvent::Redirect(route));
    }
}

pub async fn handle_auth_error(status: u16, session: &SessionContext, feedback: &dyn Feedback) {
    match status {
        401 => {
            if let Err(err) = session.clear().await {
                error!("failed to clear session: {err}");
            }
            feedback.error("Token expired, try logging in again");
            feedback.redirect(Route::Login);
        }
        403 => {
            feedback.error("Access forbidden");
            feedback.redirect(Route::Home);
        }
        _ => {}
    }
}
