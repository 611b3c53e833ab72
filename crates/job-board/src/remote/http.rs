use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{RemoteDataClient, RemoteError};
use crate::config::ClientConfig;
use crate::session::SessionContext;
use crate::workflows::application::domain::{
    ApplicationPayload, ApplicationReceipt, JobId, JobPosting, UserProfile,
};

pub const SESSION_COOKIE: &str = "session";
pub const CSRF_COOKIE: &str = "csrf";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// `reqwest` client for the job board API. Session state lives in a cookie
/// jar so cookies rotated by the backend are picked up on later requests.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl HttpRemoteClient {
    pub fn new(config: &ClientConfig, session: &SessionContext) -> Result<Self, RemoteError> {
        let base_url = config.api_base_url.clone();
        let cookies = Arc::new(Jar::default());
        if let Some(credentials) = session.credentials() {
            cookies.add_cookie_str(
                &format!("{SESSION_COOKIE}={}; Path=/", credentials.session_token),
                &base_url,
            );
            if let Some(csrf) = &credentials.csrf_token {
                cookies.add_cookie_str(&format!("{CSRF_COOKIE}={csrf}; Path=/"), &base_url);
            }
        }

        let client = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Current `csrf` cookie value for `url`, echoed on mutating requests.
    fn csrf_token(&self, url: &Url) -> Option<String> {
        let header = self.cookies.cookies(url)?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown Status").to_string();
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::from_response(status.as_u16(), &reason, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        let body = response
            .text()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| RemoteError::Decode(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
        debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl RemoteDataClient for HttpRemoteClient {
    async fn job(&self, job_id: &JobId) -> Result<JobPosting, RemoteError> {
        let url = self.endpoint(&["jobs", job_id.as_str()])?;
        self.get_json(url).await
    }

    async fn applied_jobs(&self) -> Result<Vec<JobId>, RemoteError> {
        let url = self.endpoint(&["jobs", "applied-jobs"])?;
        self.get_json(url).await
    }

    async fn apply(
        &self,
        job_id: &JobId,
        payload: &ApplicationPayload,
    ) -> Result<ApplicationReceipt, RemoteError> {
        let url = self.endpoint(&["jobs", job_id.as_str(), "apply"])?;
        let mut request = self.client.post(url.clone()).json(payload);
        if let Some(csrf) = self.csrf_token(&url) {
            request = request.header(CSRF_HEADER, csrf);
        }

        debug!(%url, "POST");
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn profile(&self) -> Result<Option<UserProfile>, RemoteError> {
        let url = self.endpoint(&["auth", "profile"])?;
        match self.get_json(url).await {
            Ok(profile) => Ok(Some(profile)),
            Err(RemoteError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
