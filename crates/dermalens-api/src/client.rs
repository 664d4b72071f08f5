//! HTTP client for the inference backend.

use std::sync::{Arc, RwLock};

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use dermalens_shared::constants::SESSION_COOKIE;
use dermalens_shared::types::PhotoId;

use crate::error::{ApiError, Result};
use crate::models::{
    AnalyzeRequest, AnalyzeResponse, HealthResponse, SaliencyRequest, SaliencyResponse,
    TimelineNode,
};

/// Typed client for the photo-analysis backend.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections and
/// the session cookie is shared across clones. Requests deliberately carry
/// no client-side timeout: inference can run for minutes and a stalled call
/// is expected to block its batch.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_id: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Attach (or clear) the session cookie sent with every request.
    pub fn set_session(&self, session_id: Option<String>) {
        if let Ok(mut guard) = self.session_id.write() {
            *guard = session_id;
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.request(Method::GET, "/api/health").send().await?;
        Self::decode(resp).await
    }

    /// `GET /api/photos`: full timeline snapshot. A cache-busting `t`
    /// parameter defeats intermediary caching.
    pub async fn timeline(&self) -> Result<Vec<TimelineNode>> {
        let resp = self
            .request(Method::GET, "/api/photos")
            .query(&[("t", chrono::Utc::now().timestamp_millis())])
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// `POST /api/photos/{id}/analyze`.
    pub async fn analyze(&self, photo_id: PhotoId, request: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        let path = format!("/api/photos/{photo_id}/analyze");
        let resp = self
            .request(Method::POST, &path)
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// `POST /api/photos/{id}/saliency`.
    pub async fn saliency(&self, photo_id: PhotoId, request: &SaliencyRequest) -> Result<SaliencyResponse> {
        let path = format!("/api/photos/{photo_id}/saliency");
        let resp = self
            .request(Method::POST, &path)
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// `DELETE /api/photos`: tell the backend to drop the session's photos.
    pub async fn clear_session(&self) -> Result<()> {
        let resp = self.request(Method::DELETE, "/api/photos").send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        debug!(%method, path, "Backend request");
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        let session = self.session_id.read().ok().and_then(|guard| guard.clone());
        if let Some(session) = session {
            builder = builder.header(
                reqwest::header::COOKIE,
                format!("{SESSION_COOKIE}={session}"),
            );
        }
        builder
    }

    /// Decode a JSON body after the status check.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let resp = Self::check(resp).await?;
        Ok(resp.json::<T>().await?)
    }

    /// Map non-success statuses to [`ApiError::Status`], preserving the body
    /// text verbatim.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
