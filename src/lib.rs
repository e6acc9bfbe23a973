pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod format;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod stats_view;
pub mod storage;
pub mod url_store;
pub mod user_store;
pub mod window;

pub use api::ApiClient;
pub use config::AppConfig;
pub use errors::ApiError;
pub use state::AppState;
pub use stats::{ClickAggregator, WindowSummary};
pub use stats_view::StatsView;
pub use window::TimeWindow;
