use once_cell::sync::Lazy;
use std::collections::HashMap;
use url::Url;

const GLOBE: &str = "\u{1F310}";

static COUNTRY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AE", "United Arab Emirates"),
        ("AR", "Argentina"),
        ("AU", "Australia"),
        ("BD", "Bangladesh"),
        ("BR", "Brazil"),
        ("CA", "Canada"),
        ("CH", "Switzerland"),
        ("CN", "China"),
        ("DE", "Germany"),
        ("EG", "Egypt"),
        ("ES", "Spain"),
        ("FR", "France"),
        ("GB", "United Kingdom"),
        ("HK", "Hong Kong"),
        ("ID", "Indonesia"),
        ("IN", "India"),
        ("IT", "Italy"),
        ("JP", "Japan"),
        ("KR", "South Korea"),
        ("MX", "Mexico"),
        ("MY", "Malaysia"),
        ("NG", "Nigeria"),
        ("NL", "Netherlands"),
        ("NZ", "New Zealand"),
        ("PH", "Philippines"),
        ("PK", "Pakistan"),
        ("RU", "Russia"),
        ("SA", "Saudi Arabia"),
        ("SE", "Sweden"),
        ("SG", "Singapore"),
        ("TH", "Thailand"),
        ("TR", "Turkey"),
        ("TW", "Taiwan"),
        ("US", "United States"),
        ("VN", "Vietnam"),
        ("ZA", "South Africa"),
    ])
});

pub fn country_flag(code: &str) -> String {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return GLOBE.to_string();
    }

    code.to_ascii_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

pub fn country_name(code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return "Unknown".to_string();
    }
    COUNTRY_NAMES
        .get(code.as_str())
        .map(|name| name.to_string())
        .unwrap_or(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Google,
    Facebook,
    Twitter,
    Instagram,
    LinkedIn,
    YouTube,
    TikTok,
    Reddit,
    GitHub,
    WhatsApp,
    Telegram,
    Direct,
    Other,
}

impl Platform {
    pub fn icon(self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::LinkedIn => "linkedin",
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Reddit => "reddit",
            Platform::GitHub => "github",
            Platform::WhatsApp => "whatsapp",
            Platform::Telegram => "telegram",
            Platform::Direct => "link",
            Platform::Other => "globe",
        }
    }
}

// Matched against the host with `www.` stripped; first hit wins.
const PLATFORM_HOSTS: &[(&str, Platform)] = &[
    ("google.", Platform::Google),
    ("facebook.com", Platform::Facebook),
    ("fb.com", Platform::Facebook),
    ("t.co", Platform::Twitter),
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
    ("instagram.com", Platform::Instagram),
    ("linkedin.com", Platform::LinkedIn),
    ("lnkd.in", Platform::LinkedIn),
    ("youtube.com", Platform::YouTube),
    ("youtu.be", Platform::YouTube),
    ("tiktok.com", Platform::TikTok),
    ("reddit.com", Platform::Reddit),
    ("github.com", Platform::GitHub),
    ("whatsapp.com", Platform::WhatsApp),
    ("wa.me", Platform::WhatsApp),
    ("t.me", Platform::Telegram),
    ("telegram.org", Platform::Telegram),
];

/// Short host label for a referrer, e.g. `https://www.google.com/search` -> `google.com`.
pub fn referrer_label(referrer: &str) -> String {
    let trimmed = referrer.trim();
    if is_direct(trimmed) {
        return "Direct".to_string();
    }
    match host_of(trimmed) {
        Some(host) => host,
        None => trimmed.to_string(),
    }
}

pub fn referrer_platform(referrer: &str) -> Platform {
    let trimmed = referrer.trim();
    if is_direct(trimmed) {
        return Platform::Direct;
    }
    let Some(host) = host_of(trimmed) else {
        return Platform::Other;
    };

    PLATFORM_HOSTS
        .iter()
        .find(|(pattern, _)| host_matches(&host, pattern))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Other)
}

fn is_direct(referrer: &str) -> bool {
    referrer.is_empty() || referrer.eq_ignore_ascii_case("direct")
}

fn host_of(referrer: &str) -> Option<String> {
    let parsed = Url::parse(referrer)
        .or_else(|_| Url::parse(&format!("https://{referrer}")))
        .ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

fn host_matches(host: &str, pattern: &str) -> bool {
    if pattern.ends_with('.') {
        return host.starts_with(pattern) || host.contains(&format!(".{pattern}"));
    }
    host == pattern || host.ends_with(&format!(".{pattern}"))
}
