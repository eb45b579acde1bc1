// HTTP/JSON data source for the CivEase backend API
use crate::application::issue_repository::{IssueDataSource, IssueFilter};
use crate::domain::analytics::Analytics;
use crate::domain::comment::Comment;
use crate::domain::issue::Issue;
use crate::error::DataSourceError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDataSource {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new(
        base_url: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DataSourceError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| DataSourceError::Request {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    fn build_url(&self, path: &str, pairs: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !pairs.is_empty() {
            let query: Vec<String> = pairs
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// GET `url` and decode the JSON body. `Ok(None)` means 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, DataSourceError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("GET {}", url);
        let response = request.send().await.map_err(|e| request_error(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} answered with {}", url, status);
            return Err(DataSourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| request_error(url, e))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| DataSourceError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

fn request_error(url: &str, source: reqwest::Error) -> DataSourceError {
    if source.is_timeout() {
        tracing::error!("Request to {} timed out", url);
        DataSourceError::Timeout {
            url: url.to_string(),
        }
    } else {
        DataSourceError::Request {
            url: url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl IssueDataSource for HttpDataSource {
    async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, DataSourceError> {
        let url = self.build_url("/api/issues", &filter.query_pairs());
        let issues: Vec<Issue> = self
            .get_json(&url)
            .await?
            .ok_or_else(|| DataSourceError::Status {
                url: url.clone(),
                status: StatusCode::NOT_FOUND.as_u16(),
                body: String::new(),
            })?;
        tracing::debug!("Fetched {} issues from {}", issues.len(), url);
        Ok(issues)
    }

    async fn get_analytics(&self) -> Result<Option<Analytics>, DataSourceError> {
        let url = self.build_url("/api/analytics", &[]);
        self.get_json(&url).await
    }

    async fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>, DataSourceError> {
        let path = format!("/api/issues/{}/comments", urlencoding::encode(issue_id));
        let url = self.build_url(&path, &[]);
        Ok(self.get_json(&url).await?.unwrap_or_default())
    }
}
