use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    Days(u32),
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub label: &'static str,
    pub key: &'static str,
    pub span: Span,
}

pub const TODAY: &str = "today";
pub const ALL: &str = "all";

static WINDOWS: [TimeWindow; 5] = [
    TimeWindow {
        label: "Today",
        key: TODAY,
        span: Span::Days(1),
    },
    TimeWindow {
        label: "7 days",
        key: "7d",
        span: Span::Days(7),
    },
    TimeWindow {
        label: "30 days",
        key: "30d",
        span: Span::Days(30),
    },
    TimeWindow {
        label: "90 days",
        key: "90d",
        span: Span::Days(90),
    },
    TimeWindow {
        label: "All",
        key: ALL,
        span: Span::Unbounded,
    },
];

impl TimeWindow {
    pub fn all_windows() -> &'static [TimeWindow] {
        &WINDOWS
    }

    pub fn lookup(key: &str) -> Option<&'static TimeWindow> {
        let key = match key {
            "last_7d" => "7d",
            "last_30d" => "30d",
            "last_90d" => "90d",
            other => other,
        };
        WINDOWS.iter().find(|window| window.key == key)
    }

    pub fn is_today(&self) -> bool {
        self.key == TODAY
    }

    pub fn is_unbounded(&self) -> bool {
        self.span == Span::Unbounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_five_windows_in_display_order() {
        let keys: Vec<_> = TimeWindow::all_windows().iter().map(|w| w.key).collect();
        assert_eq!(keys, ["today", "7d", "30d", "90d", "all"]);
    }

    #[test]
    fn lookup_accepts_long_aliases() {
        assert_eq!(TimeWindow::lookup("last_30d").unwrap().span, Span::Days(30));
        assert_eq!(TimeWindow::lookup("7d").unwrap().label, "7 days");
        assert!(TimeWindow::lookup("all").unwrap().is_unbounded());
        assert!(TimeWindow::lookup("yesterday").is_none());
        assert!(TimeWindow::lookup("").is_none());
    }
}
