//! HTTP implementation of the issue-tracker API.
//!
//! Speaks the tracker's REST namespace: JQL search for lookups, issue
//! creation and update endpoints, and the transitions endpoint. Requests
//! authenticate with a basic-auth header built from username and token;
//! descriptions travel as rich-text documents whose paragraph text is
//! flattened on the way back in.

use crate::config::JiraConfig;
use crate::task::ports::{
    IssueTrackerApi, IssueTransition, RemoteApiError, RemoteApiResult, RemoteIssue,
};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// REST namespace appended to the configured server URL.
const API_PATH: &str = "/rest/api/3";

/// Timeout for the credential-check request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for every other request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of issues fetched per search.
const MAX_SEARCH_RESULTS: u32 = 50;

/// Issue fields requested from every search.
const SEARCH_FIELDS: [&str; 5] = ["summary", "description", "status", "issuetype", "parent"];

/// HTTP client for the issue-tracker API.
pub struct HttpIssueTrackerApi {
    client: reqwest::Client,
    base_url: String,
    auth_header: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<IssueResource>,
}

#[derive(Debug, Deserialize)]
struct IssueResource {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    status: Option<StatusResource>,
}

#[derive(Debug, Deserialize)]
struct StatusResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedIssueResource {
    key: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<TransitionResource>,
}

#[derive(Debug, Deserialize)]
struct TransitionResource {
    id: String,
    name: String,
    to: TransitionTarget,
}

#[derive(Debug, Deserialize)]
struct TransitionTarget {
    name: String,
}

impl From<IssueResource> for RemoteIssue {
    fn from(issue: IssueResource) -> Self {
        Self {
            key: issue.key,
            summary: issue.fields.summary,
            description: issue
                .fields
                .description
                .as_ref()
                .map(adf_plain_text)
                .unwrap_or_default(),
            state: issue
                .fields
                .status
                .map(|status| status.name)
                .unwrap_or_default(),
        }
    }
}

/// Escapes a value for embedding in a quoted JQL string.
fn escape_jql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// JQL listing a project's issues, optionally narrowed to one state.
fn issues_jql(project_key: &str, state: Option<&str>) -> String {
    let mut jql = format!("project = \"{}\"", escape_jql(project_key));
    if let Some(name) = state {
        jql.push_str(&format!(" AND status = \"{}\"", escape_jql(name)));
    }
    jql.push_str(" ORDER BY priority DESC, created ASC");
    jql
}

/// JQL narrowing a project's issues by summary.
///
/// The tracker only offers a contains-style summary operator; callers
/// filter the response down to exact matches.
fn summary_jql(project_key: &str, summary: &str) -> String {
    format!(
        "project = \"{}\" AND summary ~ \"{}\"",
        escape_jql(project_key),
        escape_jql(summary)
    )
}

/// JQL listing a parent issue's subtasks in creation order.
fn subtasks_jql(parent_key: &str) -> String {
    format!(
        "parent = \"{}\" ORDER BY created ASC",
        escape_jql(parent_key)
    )
}

/// Wraps plain text into the tracker's rich-text document format.
fn adf_document(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [
            {
                "type": "paragraph",
                "content": [{"type": "text", "text": text}]
            }
        ]
    })
}

/// Flattens the paragraph text of a rich-text document.
fn adf_plain_text(document: &Value) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let paragraphs = document
        .get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for paragraph in paragraphs {
        if paragraph.get("type").and_then(Value::as_str) != Some("paragraph") {
            continue;
        }
        let nodes = paragraph
            .get("content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for node in nodes {
            if node.get("type").and_then(Value::as_str) != Some("text") {
                continue;
            }
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}

impl HttpIssueTrackerApi {
    /// Builds a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteApiError::Transport`] when the client cannot be
    /// built.
    pub fn new(config: &JiraConfig) -> RemoteApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RemoteApiError::transport)?;
        let credentials = format!("{}:{}", config.username(), config.api_token());
        Ok(Self {
            client,
            base_url: format!("{}{API_PATH}", config.server_url()),
            auth_header: format!("Basic {}", BASE64.encode(credentials)),
        })
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        debug!(%method, path, "issue tracker request");
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
    }

    async fn check(response: reqwest::Response) -> RemoteApiResult<reqwest::Response> {
        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> RemoteApiResult<T> {
        let mut builder = self.builder(method, path);
        if let Some(payload) = body {
            builder = builder.json(payload);
        }
        let response = builder.send().await.map_err(RemoteApiError::transport)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| RemoteApiError::Decode(err.to_string()))
    }

    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> RemoteApiResult<()> {
        let mut builder = self.builder(method, path);
        if let Some(payload) = body {
            builder = builder.json(payload);
        }
        let response = builder.send().await.map_err(RemoteApiError::transport)?;
        Self::check(response).await.map(|_| ())
    }

    async fn search(&self, jql: &str) -> RemoteApiResult<Vec<RemoteIssue>> {
        let body = json!({
            "jql": jql,
            "maxResults": MAX_SEARCH_RESULTS,
            "fields": SEARCH_FIELDS,
        });
        let response: SearchResponse = self
            .request_json(Method::POST, "/search", Some(&body))
            .await?;
        Ok(response.issues.into_iter().map(RemoteIssue::from).collect())
    }
}

#[async_trait]
impl IssueTrackerApi for HttpIssueTrackerApi {
    async fn verify_credentials(&self) -> RemoteApiResult<()> {
        let response = self
            .builder(Method::GET, "/myself")
            .timeout(CONNECT_TIMEOUT)
            .send()
            .await
            .map_err(RemoteApiError::transport)?;
        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteApiError::backend(format!(
                "Authentication failed: {} - {body}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    async fn create_issue(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> RemoteApiResult<RemoteIssue> {
        let body = json!({
            "fields": {
                "project": {"key": project_key},
                "summary": summary,
                "description": adf_document(description),
                "issuetype": {"name": "Task"},
            }
        });
        let created: CreatedIssueResource = self
            .request_json(Method::POST, "/issue", Some(&body))
            .await?;
        Ok(RemoteIssue {
            key: created.key,
            summary: summary.to_owned(),
            description: description.to_owned(),
            state: "To Do".to_owned(),
        })
    }

    async fn find_issue(
        &self,
        project_key: &str,
        summary: &str,
    ) -> RemoteApiResult<Option<RemoteIssue>> {
        let issues = self.search(&summary_jql(project_key, summary)).await?;
        Ok(issues.into_iter().find(|issue| issue.summary == summary))
    }

    async fn list_issues(
        &self,
        project_key: &str,
        state: Option<&str>,
    ) -> RemoteApiResult<Vec<RemoteIssue>> {
        self.search(&issues_jql(project_key, state)).await
    }

    async fn set_description(&self, issue_key: &str, description: &str) -> RemoteApiResult<()> {
        let body = json!({"fields": {"description": adf_document(description)}});
        self.request_unit(Method::PUT, &format!("/issue/{issue_key}"), Some(&body))
            .await
    }

    async fn transitions(&self, issue_key: &str) -> RemoteApiResult<Vec<IssueTransition>> {
        let response: TransitionsResponse = self
            .request_json(
                Method::GET,
                &format!("/issue/{issue_key}/transitions"),
                None,
            )
            .await?;
        Ok(response
            .transitions
            .into_iter()
            .map(|transition| IssueTransition {
                id: transition.id,
                name: transition.name,
                to_state: transition.to.name,
            })
            .collect())
    }

    async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> RemoteApiResult<()> {
        let body = json!({"transition": {"id": transition_id}});
        self.request_unit(
            Method::POST,
            &format!("/issue/{issue_key}/transitions"),
            Some(&body),
        )
        .await
    }

    async fn create_subtask(
        &self,
        project_key: &str,
        parent_key: &str,
        summary: &str,
    ) -> RemoteApiResult<RemoteIssue> {
        let body = json!({
            "fields": {
                "project": {"key": project_key},
                "parent": {"key": parent_key},
                "summary": summary,
                "issuetype": {"name": "Sub-task"},
            }
        });
        let created: CreatedIssueResource = self
            .request_json(Method::POST, "/issue", Some(&body))
            .await?;
        Ok(RemoteIssue {
            key: created.key,
            summary: summary.to_owned(),
            description: String::new(),
            state: "To Do".to_owned(),
        })
    }

    async fn list_subtasks(&self, parent_key: &str) -> RemoteApiResult<Vec<RemoteIssue>> {
        self.search(&subtasks_jql(parent_key)).await
    }

    async fn delete_issue(&self, issue_key: &str) -> RemoteApiResult<()> {
        self.request_unit(
            Method::DELETE,
            &format!("/issue/{issue_key}?deleteSubtasks=true"),
            None,
        )
        .await
    }
}
