use crate::errors::ApiError;
use crate::models::{Envelope, ErrorBody};
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: Envelope<T>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.client.get(self.url(path)), token).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.client.post(self.url(path)).json(body), token)
            .await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.client.put(self.url(path)).json(body), token)
            .await
    }

    pub async fn post_form<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        form: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.client.post(self.url(path)).form(form), token)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(ApiError::transport)?;
        debug!(status, len = bytes.len(), "api response");

        if !(200..300).contains(&status) {
            let body = serde_json::from_slice::<ErrorBody>(&bytes).unwrap_or_else(|err| {
                warn!(status, "error body not understood: {err}");
                ErrorBody::default()
            });
            return Err(ApiError::from_status(status, body));
        }

        let body: Envelope<T> = serde_json::from_slice(&bytes).map_err(ApiError::decode)?;
        Ok(ApiResponse { status, body })
    }
}
