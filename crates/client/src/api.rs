//! REST API client for the site backend.
//!
//! One method per endpoint. Privileged endpoints take the bearer token
//! explicitly; deciding whether a token exists is the caller's job.

use std::path::Path;
use std::time::Duration;

use buildsite_core::about::AboutContent;
use buildsite_core::availability::AvailabilitySnapshot;
use buildsite_core::contact::{ContactSubmission, NewContact};
use buildsite_core::project::{NewProject, Project, UpdateProject};
use buildsite_core::session::{LoginRequest, Session};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// A file handed to the backend as a multipart `file` part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        };
        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// HTTP client for the backend REST API.
#[derive(Debug, Clone)]
pub struct BackendApi {
    client: reqwest::Client,
    api_url: String,
}

impl BackendApi {
    /// Build a client from configuration, applying the request timeout.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url()))
    }

    /// Reuse an existing [`reqwest::Client`].
    ///
    /// * `api_url` - API base, e.g. `http://host:8001/api`.
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- auth ----

    /// `POST /auth/login`. Rejected credentials map to [`ClientError::Auth`].
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<Session> {
        let response = self
            .client
            .post(self.url("auth/login"))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- projects ----

    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        self.get_json(self.client.get(self.url("projects"))).await
    }

    pub async fn create_project(&self, token: &str, project: &NewProject) -> ClientResult<Project> {
        self.send_json(self.client.post(self.url("projects")), token, project)
            .await
    }

    pub async fn update_project(
        &self,
        token: &str,
        project_id: &str,
        update: &UpdateProject,
    ) -> ClientResult<Project> {
        let url = self.url(&format!("projects/{project_id}"));
        self.send_json(self.client.put(url), token, update).await
    }

    pub async fn delete_project(&self, token: &str, project_id: &str) -> ClientResult<()> {
        let url = self.url(&format!("projects/{project_id}"));
        let response = self.client.delete(url).bearer_auth(token).send().await?;
        Self::check_status(response).await
    }

    /// `POST /projects/{id}/images` with a single multipart `file` part.
    pub async fn upload_image(
        &self,
        token: &str,
        project_id: &str,
        upload: ImageUpload,
    ) -> ClientResult<Project> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.url(&format!("projects/{project_id}/images"));
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn delete_image(&self, token: &str, project_id: &str, index: usize) -> ClientResult<()> {
        let url = self.url(&format!("projects/{project_id}/images/{index}"));
        let response = self.client.delete(url).bearer_auth(token).send().await?;
        Self::check_status(response).await
    }

    // ---- about ----

    pub async fn get_about(&self) -> ClientResult<AboutContent> {
        self.get_json(self.client.get(self.url("about"))).await
    }

    pub async fn update_about(&self, token: &str, about: &AboutContent) -> ClientResult<AboutContent> {
        self.send_json(self.client.put(self.url("about")), token, about)
            .await
    }

    // ---- contact ----

    pub async fn list_contacts(&self, token: &str) -> ClientResult<Vec<ContactSubmission>> {
        self.get_json(self.client.get(self.url("contact")).bearer_auth(token))
            .await
    }

    pub async fn submit_contact(&self, contact: &NewContact) -> ClientResult<ContactSubmission> {
        let response = self
            .client
            .post(self.url("contact"))
            .json(contact)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- availability ----

    pub async fn get_availability(&self) -> ClientResult<AvailabilitySnapshot> {
        self.get_json(self.client.get(self.url("calendar/availability")))
            .await
    }

    /// Full-replace `PUT`: the backend drops any busy day missing here.
    pub async fn put_availability(
        &self,
        token: &str,
        snapshot: &AvailabilitySnapshot,
    ) -> ClientResult<()> {
        let response = self
            .client
            .put(self.url("calendar/availability"))
            .bearer_auth(token)
            .json(snapshot)
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        Self::parse_response(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = request.bearer_auth(token).json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Map non-2xx statuses onto the client error taxonomy.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth(body),
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            _ => ClientError::Api {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<()> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
