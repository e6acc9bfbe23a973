use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::feedback::{Feedback, handle_auth_error};
use crate::models::{DailyClickEntry, Envelope, ErrorBody, UrlStats};
use crate::session::SessionContext;
use crate::stats::{ClickAggregator, WindowSummary};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct ViewState {
    aggregator: ClickAggregator,
    stats: Option<UrlStats>,
    loading: bool,
    error: Option<String>,
}

pub struct StatsView {
    client: ApiClient,
    session: SessionContext,
    feedback: Arc<dyn Feedback>,
    state: Mutex<ViewState>,
    // Only the most recently issued load commits or notifies.
    issued: AtomicU64,
}

impl StatsView {
    pub fn new(client: ApiClient, session: SessionContext, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            client,
            session,
            feedback,
            state: Mutex::new(ViewState::default()),
            issued: AtomicU64::new(0),
        }
    }

    pub async fn load_stats(&self, short_url: &str) -> Option<UrlStats> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
        }

        let outcome = fetch_url_stats(&self.client, &self.session, short_url).await;

        let failure = {
            let mut state = self.state.lock();
            if seq != self.issued.load(Ordering::SeqCst) {
                debug!(seq, short_url, "discarding superseded stats response");
                return None;
            }
            state.loading = false;

            match outcome {
                Ok(stats) => {
                    state.aggregator.set_raw_series(stats.daily_breakdown.clone());
                    state.stats = Some(stats.clone());
                    state.error = None;
                    return Some(stats);
                }
                Err(err) => {
                    state.error = Some(stats_error_message(&err, short_url));
                    err
                }
            }
        };

        report_stats_failure(&failure, short_url, &self.session, self.feedback.as_ref()).await;
        None
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn stats(&self) -> Option<UrlStats> {
        self.state.lock().stats.clone()
    }

    pub fn selected_window(&self) -> String {
        self.state.lock().aggregator.selected_window().to_string()
    }

    pub fn select_window(&self, key: impl Into<String>) {
        self.state.lock().aggregator.select_window(key);
    }

    pub fn raw_series(&self) -> Option<Vec<DailyClickEntry>> {
        self.state.lock().aggregator.raw_series().map(<[_]>::to_vec)
    }

    pub fn filtered_series(&self) -> Vec<DailyClickEntry> {
        self.state.lock().aggregator.filtered_series()
    }

    pub fn range_total(&self) -> u64 {
        self.state.lock().aggregator.range_total()
    }

    pub fn average_per_day(&self) -> u64 {
        self.state.lock().aggregator.average_per_day()
    }

    pub fn clicks_today(&self) -> u64 {
        self.state.lock().aggregator.clicks_today()
    }

    pub fn summary(&self) -> WindowSummary {
        self.state.lock().aggregator.summary()
    }

    pub fn summary_at(&self, today: NaiveDate) -> WindowSummary {
        self.state.lock().aggregator.summary_at(today)
    }
}

pub async fn fetch_url_stats(
    client: &ApiClient,
    session: &SessionContext,
    short_url: &str,
) -> Result<UrlStats, ApiError> {
    let token = session.token().await;
    info!(short_url, "fetching dashboard stats");

    let response = client
        .get::<Option<UrlStats>>(&format!("stats/{short_url}/dashboard"), token.as_deref())
        .await
        .inspect_err(|err| warn!(short_url, "failed to fetch stats: {err}"))?;

    let Envelope {
        status,
        message,
        data,
    } = response.body;
    match data {
        Some(stats) if status == 200 => {
            debug!(
                short_url,
                days = stats.daily_breakdown.len(),
                "dashboard stats loaded"
            );
            Ok(stats)
        }
        _ => {
            let message = if message.is_empty() {
                "Failed to fetch stats".to_string()
            } else {
                message
            };
            warn!(short_url, status, "stats envelope reported failure: {message}");
            Err(ApiError::Server {
                status,
                body: ErrorBody {
                    message: Some(message.clone()),
                    ..ErrorBody::default()
                },
                message,
            })
        }
    }
}

pub fn stats_error_message(err: &ApiError, short_url: &str) -> String {
    if let ApiError::NotFound { .. } = err {
        return format!("URL '{short_url}' tidak ditemukan");
    }
    err.detail_or_message()
        .map(str::to_string)
        .unwrap_or_else(|| err.message())
}

async fn report_stats_failure(
    err: &ApiError,
    short_url: &str,
    session: &SessionContext,
    feedback: &dyn Feedback,
) {
    if let Some(status) = err.status() {
        handle_auth_error(status, session, feedback).await;
    }

    let message = stats_error_message(err, short_url);
    if let ApiError::NotFound { .. } = err {
        feedback.error(&message);
    } else {
        feedback.error(&format!("Error: {message}"));
    }
}
