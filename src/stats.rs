use crate::models::DailyClickEntry;
use crate::window::{ALL, Span, TimeWindow};
use chrono::{DateTime, Days, Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub window: String,
    pub filtered: Vec<DailyClickEntry>,
    pub range_total: u64,
    pub average_per_day: u64,
    pub clicks_today: u64,
}

#[derive(Debug, Clone)]
pub struct ClickAggregator {
    raw: Option<Vec<DailyClickEntry>>,
    selected: String,
}

impl Default for ClickAggregator {
    fn default() -> Self {
        Self {
            raw: None,
            selected: ALL.to_string(),
        }
    }
}

impl ClickAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw_series(&mut self, series: Vec<DailyClickEntry>) {
        self.raw = Some(series);
    }

    /// Unknown keys are stored as-is; filtering then falls back to the raw series.
    pub fn select_window(&mut self, key: impl Into<String>) {
        self.selected = key.into();
    }

    pub fn selected_window(&self) -> &str {
        &self.selected
    }

    pub fn raw_series(&self) -> Option<&[DailyClickEntry]> {
        self.raw.as_deref()
    }

    pub fn filtered_series(&self) -> Vec<DailyClickEntry> {
        self.filtered_series_at(local_today())
    }

    pub fn filtered_series_at(&self, today: NaiveDate) -> Vec<DailyClickEntry> {
        let Some(raw) = self.raw.as_ref() else {
            return Vec::new();
        };

        let window = match TimeWindow::lookup(&self.selected) {
            Some(window) if !window.is_unbounded() => window,
            _ => return raw.clone(),
        };

        if window.is_today() {
            return raw
                .iter()
                .filter(|entry| entry_date(entry) == Some(today))
                .cloned()
                .collect();
        }

        let cutoff = match window.span {
            Span::Days(days) => today
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
            Span::Unbounded => NaiveDate::MIN,
        };

        raw.iter()
            .filter(|entry| entry_date(entry).is_some_and(|date| date >= cutoff))
            .cloned()
            .collect()
    }

    pub fn range_total(&self) -> u64 {
        self.range_total_at(local_today())
    }

    pub fn range_total_at(&self, today: NaiveDate) -> u64 {
        sum_clicks(&self.filtered_series_at(today))
    }

    pub fn average_per_day(&self) -> u64 {
        self.average_per_day_at(local_today())
    }

    /// Divides by the number of entries present, not the window's calendar span,
    /// so series with missing zero-click days read higher. The `today` window
    /// reports its total unchanged.
    pub fn average_per_day_at(&self, today: NaiveDate) -> u64 {
        let filtered = self.filtered_series_at(today);
        average_of(&self.selected, &filtered)
    }

    pub fn clicks_today(&self) -> u64 {
        self.clicks_today_at(local_today())
    }

    /// Looks at the raw series, not the filtered one.
    pub fn clicks_today_at(&self, today: NaiveDate) -> u64 {
        let key = date_key(today);
        self.raw
            .as_ref()
            .and_then(|raw| raw.iter().find(|entry| entry.date == key))
            .map(|entry| entry.clicks)
            .unwrap_or(0)
    }

    pub fn summary(&self) -> WindowSummary {
        self.summary_at(local_today())
    }

    pub fn summary_at(&self, today: NaiveDate) -> WindowSummary {
        let filtered = self.filtered_series_at(today);
        WindowSummary {
            window: self.selected.clone(),
            range_total: sum_clicks(&filtered),
            average_per_day: average_of(&self.selected, &filtered),
            clicks_today: self.clicks_today_at(today),
            filtered,
        }
    }
}

fn sum_clicks(series: &[DailyClickEntry]) -> u64 {
    series
        .iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.clicks))
}

fn average_of(selected: &str, filtered: &[DailyClickEntry]) -> u64 {
    if filtered.is_empty() {
        return 0;
    }

    let total = sum_clicks(filtered);
    if TimeWindow::lookup(selected).is_some_and(TimeWindow::is_today) {
        return total;
    }

    (total as f64 / filtered.len() as f64).round() as u64
}

fn entry_date(entry: &DailyClickEntry) -> Option<NaiveDate> {
    let raw = entry.date.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
