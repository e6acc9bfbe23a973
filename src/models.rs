use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyClickEntry {
    pub date: String,
    pub clicks: u64,
}

impl DailyClickEntry {
    pub fn new(date: impl Into<String>, clicks: u64) -> Self {
        Self {
            date: date.into(),
            clicks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryStat {
    pub country: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefererStat {
    pub referer: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlStats {
    pub short_url: String,
    pub full_url: String,
    pub total_clicks: u64,
    #[serde(default)]
    pub daily_breakdown: Vec<DailyClickEntry>,
    #[serde(default)]
    pub top_countries: Vec<CountryStat>,
    #[serde(default)]
    pub top_referers: Vec<RefererStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

pub type CurrentUser = User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    pub id: u64,
    pub short_url: String,
    pub full_url: String,
    #[serde(default)]
    pub click: u64,
    pub created_at: String,
    pub creator: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUrlRequest {
    pub full_url: String,
    pub short_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUrlRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub full_url: String,
    pub short_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub id: u64,
    pub username: String,
}

impl LoginData {
    pub fn user(&self) -> CurrentUser {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
