//! HTTP client for the 4EVERLAND hosting API
//!
//! Every endpoint answers with the same envelope:
//! `{"code": 200, "message": "...", "content": ...}`. Only `content` is handed
//! back to callers; everything else is used to build error messages.

use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::HostingBackend;
use crate::archive::ArchiveBlob;
use crate::config::ApiConfig;
use crate::config::env::TOKEN_ENV;
use crate::error::{DeployError, Result};
use crate::types::{
    DeploymentDescriptor, Platform, ProjectDetail, ProjectId, ProjectName, ProjectSummary,
};

/// File name the archive is uploaded under.
const ARCHIVE_FILE_NAME: &str = "dist.zip";

const OP_CREATE: &str = "create project";
const OP_DEPLOY: &str = "deploy project";
const OP_SEARCH: &str = "search projects";
const OP_VIEW: &str = "view project";

/// Response envelope shared by all hosting API endpoints.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    content: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedProject {
    project_id: String,
}

/// [`HostingBackend`] backed by the hosting REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(api: &ApiConfig) -> anyhow::Result<Self> {
        if api.base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API base URL: {}", api.base_url);
        }

        let client = reqwest::Client::builder()
            .user_agent(api.user_agent.as_str())
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: api.base_url.clone(),
            token: api.token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn token(&self, operation: &'static str) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            DeployError::remote(
                operation,
                format!("no API token configured (set {} or api.token)", TOKEN_ENV),
            )
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let token = self.token(operation)?;
        let response = request
            .header("token", token)
            .send()
            .await
            .map_err(|err| DeployError::remote(operation, transport_message(&err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DeployError::remote(operation, transport_message(&err)))?;

        tracing::debug!(operation, status = %status, bytes = body.len(), "Hosting API response");
        parse_envelope(operation, status, &body)
    }
}

impl HostingBackend for HttpBackend {
    async fn create_project(&self, name: &ProjectName, platform: Platform) -> Result<ProjectId> {
        let url = self.endpoint(&["project"]);
        let body = serde_json::json!({
            "name": name.as_str(),
            "platform": platform.as_str(),
            "deployType": "CLI",
        });

        let created: CreatedProject = self
            .send(OP_CREATE, self.client.post(url).json(&body))
            .await?;

        ProjectId::new(created.project_id)
            .map_err(|_| DeployError::remote(OP_CREATE, "backend returned an empty project id"))
    }

    async fn deploy_project(
        &self,
        project_id: &ProjectId,
        archive: &ArchiveBlob,
    ) -> Result<DeploymentDescriptor> {
        let url = self.endpoint(&["deploy"]);
        let part = reqwest::multipart::Part::bytes(archive.as_bytes().to_vec())
            .file_name(ARCHIVE_FILE_NAME)
            .mime_str("application/zip")
            .map_err(|err| DeployError::Unknown(format!("invalid archive part: {err}")))?;
        let form = reqwest::multipart::Form::new()
            .text("projectId", project_id.to_string())
            .part("file", part);

        self.send(OP_DEPLOY, self.client.post(url).multipart(form))
            .await
    }

    async fn search_project(&self, keyword: &str) -> Result<Vec<ProjectSummary>> {
        let url = self.endpoint(&["project", "search"]);
        self.send(
            OP_SEARCH,
            self.client.get(url).query(&[("keyword", keyword)]),
        )
        .await
    }

    async fn view_detail(&self, project_id: &ProjectId) -> Result<ProjectDetail> {
        let url = self.endpoint(&["project", project_id.as_str()]);
        self.send(OP_VIEW, self.client.get(url)).await
    }
}

/// Turn a raw API response into its `content`, or a `Remote` error.
fn parse_envelope<T: DeserializeOwned>(
    operation: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<T> {
    let envelope = serde_json::from_str::<ApiEnvelope<T>>(body);

    if !status.is_success() {
        let message = envelope
            .ok()
            .and_then(|env| env.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(DeployError::remote(operation, message));
    }

    let envelope = envelope.map_err(|err| {
        DeployError::remote(operation, format!("unexpected response body: {err}"))
    })?;

    if let Some(code) = envelope.code
        && code != 200
        && code != 0
    {
        let message = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("request failed with code {}", code));
        return Err(DeployError::remote(operation, message));
    }

    envelope.content.ok_or_else(|| {
        DeployError::remote(
            operation,
            envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "request failed".to_string()),
        )
    })
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ApiConfig {
        ApiConfig {
            base_url: Url::parse(base).unwrap(),
            token: Some("secret".to_string()),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn endpoint_joins_segments() {
        let backend = HttpBackend::new(&api("https://hosting.example.org/api/")).unwrap();
        assert_eq!(
            backend.endpoint(&["project", "search"]).as_str(),
            "https://hosting.example.org/api/project/search"
        );
    }

    #[test]
    fn endpoint_encodes_ids() {
        let backend = HttpBackend::new(&api("https://hosting.example.org")).unwrap();
        assert_eq!(
            backend.endpoint(&["project", "a/b c"]).as_str(),
            "https://hosting.example.org/project/a%2Fb%20c"
        );
    }

    #[test]
    fn new_rejects_non_base_url() {
        let config = ApiConfig {
            base_url: Url::parse("mailto:ops@example.org").unwrap(),
            ..ApiConfig::default()
        };
        assert!(HttpBackend::new(&config).is_err());
    }

    #[test]
    fn missing_token_is_remote_error() {
        let config = ApiConfig {
            token: Some("   ".to_string()),
            ..ApiConfig::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        let err = backend.token(OP_CREATE).unwrap_err();
        assert_eq!(err.kind(), "remote");
        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn parse_envelope_returns_content() {
        let descriptor: DeploymentDescriptor = parse_envelope(
            OP_DEPLOY,
            StatusCode::OK,
            r#"{"code":200,"message":"ok","content":{"domainList":["https://x.4everland.app"],"fileHash":"bafyabc"}}"#,
        )
        .unwrap();

        assert_eq!(descriptor.domain_list, vec!["https://x.4everland.app"]);
        assert_eq!(descriptor.file_hash, "bafyabc");
    }

    #[test]
    fn parse_envelope_accepts_missing_code() {
        let created: CreatedProject =
            parse_envelope(OP_CREATE, StatusCode::OK, r#"{"content":{"projectId":"p-1"}}"#)
                .unwrap();
        assert_eq!(created.project_id, "p-1");
    }

    #[test]
    fn parse_envelope_rejects_error_code_with_message() {
        let err = parse_envelope::<CreatedProject>(
            OP_CREATE,
            StatusCode::OK,
            r#"{"code":40001,"message":"project name already exists"}"#,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "create project failed: project name already exists"
        );
    }

    #[test]
    fn parse_envelope_http_failure_prefers_backend_message() {
        let err = parse_envelope::<ProjectDetail>(
            OP_VIEW,
            StatusCode::UNAUTHORIZED,
            r#"{"code":401,"message":"invalid token"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "view project failed: invalid token");
    }

    #[test]
    fn parse_envelope_http_failure_without_body_uses_status() {
        let err = parse_envelope::<ProjectDetail>(
            OP_DEPLOY,
            StatusCode::PAYLOAD_TOO_LARGE,
            "<html>too large</html>",
        )
        .unwrap_err();
        assert!(err.to_string().contains("HTTP 413"));
    }

    #[test]
    fn parse_envelope_missing_content_is_generic_failure() {
        let err =
            parse_envelope::<Vec<ProjectSummary>>(OP_SEARCH, StatusCode::OK, r#"{"code":200}"#)
                .unwrap_err();
        assert_eq!(err.to_string(), "search projects failed: request failed");
    }

    #[test]
    fn parse_envelope_decodes_content_without_default() {
        let created: CreatedProject = parse_envelope(
            OP_CREATE,
            StatusCode::OK,
            r#"{"code":200,"content":{"projectId":"p-9"}}"#,
        )
        .unwrap();
        assert_eq!(created.project_id, "p-9");

        let err =
            parse_envelope::<CreatedProject>(OP_CREATE, StatusCode::OK, r#"{"message":"busy"}"#)
                .unwrap_err();
        assert_eq!(err.to_string(), "create project failed: busy");
    }

    #[test]
    fn parse_envelope_keeps_raw_search_results() {
        let results: Vec<ProjectSummary> = parse_envelope(
            OP_SEARCH,
            StatusCode::OK,
            r#"{"code":200,"content":[{"projectId":"p-1","name":"blog","extra":{"a":1}}]}"#,
        )
        .unwrap();
        assert_eq!(results[0]["extra"]["a"], 1);
    }
}
