use std::time::Duration;

use panel_core::{endpoint, ImageList, Job, JobId, JobPage, LaunchRequest, LaunchResponse};
use panel_logging::{panel_debug, panel_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::ApiError;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The job API as consumed by the panel. One method per endpoint.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn list_jobs(&self, page: u32, per_page: u32) -> Result<JobPage, ApiError>;
    async fn get_job(&self, job_id: &JobId) -> Result<Job, ApiError>;
    async fn list_images(&self, job_id: &JobId) -> Result<ImageList, ApiError>;
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchResponse, ApiError>;
    async fn cancel(&self, job_id: &JobId) -> Result<(), ApiError>;
    async fn delete(&self, job_id: &JobId) -> Result<(), ApiError>;
    async fn clear(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpJobApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl HttpJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    fn url(&self, segments: &[&str]) -> Url {
        endpoint(&self.settings.base_url, segments)
    }

    /// Performs one request and normalizes the outcome through [`decode_body`].
    async fn call(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Value, ApiError> {
        panel_debug!("{} {}", method, url);
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        decode_body(status, &text).inspect_err(|err| {
            panel_warn!("{} {} failed: {}", method, url, err);
        })
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let value = self.call(method, url, body).await?;
        serde_json::from_value(value).map_err(|err| ApiError::MalformedBody(err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobApi for HttpJobApi {
    async fn list_jobs(&self, page: u32, per_page: u32) -> Result<JobPage, ApiError> {
        let mut url = self.url(&["api", "jobs"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        self.call_typed(Method::GET, url, None).await
    }

    async fn get_job(&self, job_id: &JobId) -> Result<Job, ApiError> {
        let url = self.url(&["api", "jobs", job_id.as_str()]);
        self.call_typed(Method::GET, url, None).await
    }

    async fn list_images(&self, job_id: &JobId) -> Result<ImageList, ApiError> {
        let url = self.url(&["api", "jobs", job_id.as_str(), "images"]);
        self.call_typed(Method::GET, url, None).await
    }

    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchResponse, ApiError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::MalformedBody(err.to_string()))?;
        self.call_typed(Method::POST, self.url(&["api", "run"]), Some(body))
            .await
    }

    async fn cancel(&self, job_id: &JobId) -> Result<(), ApiError> {
        let url = self.url(&["api", "jobs", job_id.as_str(), "cancel"]);
        self.call(Method::POST, url, None).await.map(drop)
    }

    async fn delete(&self, job_id: &JobId) -> Result<(), ApiError> {
        let url = self.url(&["api", "jobs", job_id.as_str()]);
        self.call(Method::DELETE, url, None).await.map(drop)
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.call(Method::POST, self.url(&["api", "jobs", "clear"]), None)
            .await
            .map(drop)
    }
}

/// Turns a response status and its raw body text into a JSON value or an [`ApiError`].
///
/// The body is parsed leniently: empty text is `{}`. A failed response always
/// yields a readable message, preferring the `error` field, then `detail`, then
/// the raw text, then the status line. A success response that does not parse is
/// reported as [`ApiError::MalformedBody`].
pub fn decode_body(status: StatusCode, text: &str) -> Result<Value, ApiError> {
    let parsed = if text.trim().is_empty() {
        Ok(Value::Object(Default::default()))
    } else {
        serde_json::from_str::<Value>(text)
    };

    if status.is_success() {
        return parsed.map_err(|err| ApiError::MalformedBody(err.to_string()));
    }

    let field = |name: &str| match &parsed {
        Ok(Value::Object(map)) => map
            .get(name)
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_owned),
        _ => None,
    };
    let message = field("error")
        .or_else(|| field("detail"))
        .or_else(|| Some(text.trim().to_string()).filter(|raw| !raw.is_empty()))
        .unwrap_or_else(|| status_line(status));
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.as_str().to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Transport(format!("request timed out: {err}"));
    }
    ApiError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(status: u16, text: &str) -> String {
        decode_body(StatusCode::from_u16(status).unwrap(), text)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn error_field_wins_over_detail() {
        assert_eq!(message(500, r#"{"error":"boom","detail":"other"}"#), "boom");
        assert_eq!(message(404, r#"{"detail":"Job not found"}"#), "Job not found");
    }

    #[test]
    fn structured_body_without_fields_falls_back_to_text() {
        assert_eq!(message(400, r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn unparsable_failure_body_is_shown_raw() {
        assert_eq!(message(502, "<html>Bad gateway</html>"), "<html>Bad gateway</html>");
    }

    #[test]
    fn empty_failure_body_uses_the_status_line() {
        assert_eq!(message(503, ""), "Service Unavailable");
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        let err = decode_body(StatusCode::OK, "{not json").unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
    }

    #[test]
    fn empty_success_body_is_an_empty_object() {
        let value = decode_body(StatusCode::NO_CONTENT, "").unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
