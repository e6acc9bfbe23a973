use crate::models::ErrorBody;
use std::collections::BTreeMap;
use thiserror::Error;

// HTTP variants keep the decoded body so callers can pick the field they report.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{message}")]
    Unauthorized { message: String, body: ErrorBody },
    #[error("{message}")]
    Forbidden { message: String, body: ErrorBody },
    #[error("{message}")]
    NotFound { message: String, body: ErrorBody },
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
        body: ErrorBody,
    },
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        body: ErrorBody,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(err: impl std::error::Error) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::error::Error) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        let message = body
            .detail
            .clone()
            .or_else(|| body.message.clone())
            .or_else(|| body.error.clone())
            .unwrap_or_else(|| format!("Request failed with status code {status}"));

        match status {
            400 => {
                let fields = body
                    .errors
                    .iter()
                    .flatten()
                    .filter_map(|err| {
                        err.field
                            .clone()
                            .map(|field| (field, err.message.clone()))
                    })
                    .collect();
                Self::Validation {
                    message,
                    fields,
                    body,
                }
            }
            401 => Self::Unauthorized { message, body },
            403 => Self::Forbidden { message, body },
            404 => Self::NotFound { message, body },
            _ => Self::Server {
                status,
                message,
                body,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Validation { .. } => Some(400),
            Self::Server { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Unauthorized { body, .. }
            | Self::Forbidden { body, .. }
            | Self::NotFound { body, .. }
            | Self::Validation { body, .. }
            | Self::Server { body, .. } => Some(body),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn body_message(&self) -> Option<&str> {
        self.body().and_then(|body| body.message.as_deref())
    }

    pub fn detail_or_message(&self) -> Option<&str> {
        self.body()
            .and_then(|body| body.detail.as_deref().or(body.message.as_deref()))
    }
}
