//! In-process mock of the site backend for client integration tests.
//!
//! Serves the same `/api` surface as the real backend from an axum router
//! bound to an ephemeral port, and records every request it receives so
//! tests can assert that nothing was sent.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use buildsite_client::{BackendApi, ContentRepository, MemoryStore, SessionHolder};
use buildsite_core::about::AboutContent;
use buildsite_core::availability::{AvailabilityDate, AvailabilitySnapshot};
use buildsite_core::contact::{ContactSubmission, NewContact};
use buildsite_core::project::{NewProject, Project, UpdateProject};
use buildsite_core::session::{LoginRequest, Session};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

/// Backend-side state, inspectable from tests.
#[derive(Debug)]
pub struct MockData {
    pub valid_token: String,
    pub projects: Vec<Project>,
    pub about: AboutContent,
    pub contacts: Vec<ContactSubmission>,
    pub dates: Vec<AvailabilityDate>,
    /// `"METHOD /path"` for every request received, in order.
    pub requests: Vec<String>,
    /// `"METHOD /path"` entries answered with 500 instead of being handled.
    pub failing: Vec<String>,
}

impl Default for MockData {
    fn default() -> Self {
        Self {
            valid_token: "test-token".into(),
            projects: Vec::new(),
            about: AboutContent::new("About Us", "Quality construction since 1998."),
            contacts: Vec::new(),
            dates: Vec::new(),
            requests: Vec::new(),
            failing: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<MockData>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    pub data: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::start_with(MockData::default()).await
    }

    pub async fn start_with(data: MockData) -> Self {
        let data: Shared = Arc::new(Mutex::new(data));
        let app = router(data.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, data }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn api(&self) -> BackendApi {
        BackendApi::with_client(reqwest::Client::new(), self.api_url())
    }

    /// A repository with no session.
    pub fn repo(&self) -> ContentRepository<MemoryStore> {
        let session = SessionHolder::init(MemoryStore::new()).unwrap();
        ContentRepository::new(self.api(), session)
    }

    /// A repository already logged in as the admin.
    pub async fn admin_repo(&self) -> ContentRepository<MemoryStore> {
        let mut repo = self.repo();
        repo.login(ADMIN_USER, ADMIN_PASSWORD).await.unwrap();
        repo
    }

    pub fn requests(&self) -> Vec<String> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn sent(&self, request: &str) -> bool {
        self.requests().iter().any(|r| r == request)
    }

    /// Answer `request` (`"METHOD /path"`) with 500 from now on.
    pub fn fail(&self, request: &str) {
        self.data.lock().unwrap().failing.push(request.to_string());
    }

    pub fn clear_requests(&self) {
        self.data.lock().unwrap().requests.clear();
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut MockData) -> T) -> T {
        f(&mut self.data.lock().unwrap())
    }
}

pub fn project(id: &str, title: &str, images: &[&str]) -> Project {
    Project {
        id: id.into(),
        title: title.into(),
        description: format!("{title} description"),
        order: 0,
        images: images.iter().map(|s| s.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn router(data: Shared) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", put(update_project).delete(delete_project))
        .route("/projects/{id}/images", post(upload_image))
        .route("/projects/{id}/images/{index}", delete(delete_image))
        .route("/about", get(get_about).put(update_about))
        .route("/contact", get(list_contacts).post(submit_contact))
        .route(
            "/calendar/availability",
            get(get_availability).put(put_availability),
        );

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(data.clone(), record))
        .with_state(data)
}

async fn record(State(data): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    let failing = {
        let mut guard = data.lock().unwrap();
        let failing = guard.failing.contains(&line);
        guard.requests.push(line);
        failing
    };
    if failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    next.run(request).await
}

fn authorize(data: &Shared, headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", data.lock().unwrap().valid_token);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn login(
    State(data): State<Shared>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<Session>, StatusCode> {
    if input.username != ADMIN_USER || input.password != ADMIN_PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = data.lock().unwrap().valid_token.clone();
    Ok(Json(Session {
        token,
        username: input.username,
    }))
}

async fn list_projects(State(data): State<Shared>) -> Json<Vec<Project>> {
    Json(data.lock().unwrap().projects.clone())
}

async fn create_project(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<NewProject>,
) -> Result<Json<Project>, StatusCode> {
    authorize(&data, &headers)?;
    let project = Project {
        id: uuid::Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        order: input.order,
        images: Vec::new(),
    };
    data.lock().unwrap().projects.push(project.clone());
    Ok(Json(project))
}

async fn update_project(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> Result<Json<Project>, StatusCode> {
    authorize(&data, &headers)?;
    let mut guard = data.lock().unwrap();
    let project = guard
        .projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        project.title = title;
    }
    if let Some(description) = input.description {
        project.description = description;
    }
    if let Some(order) = input.order {
        project.order = order;
    }
    Ok(Json(project.clone()))
}

async fn delete_project(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&data, &headers)?;
    let mut guard = data.lock().unwrap();
    let before = guard.projects.len();
    guard.projects.retain(|p| p.id != id);
    if guard.projects.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({ "message": "Project deleted" })))
}

async fn upload_image(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Project>, StatusCode> {
    authorize(&data, &headers)?;
    let mut stored = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            if !content_type.starts_with("image/") || bytes.is_empty() {
                return Err(StatusCode::BAD_REQUEST);
            }
            stored = Some(format!("/uploads/{file_name}"));
        }
    }
    let image = stored.ok_or(StatusCode::BAD_REQUEST)?;

    let mut guard = data.lock().unwrap();
    let project = guard
        .projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    project.images.push(image);
    Ok(Json(project.clone()))
}

async fn delete_image(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&data, &headers)?;
    let mut guard = data.lock().unwrap();
    let project = guard
        .projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if index >= project.images.len() {
        return Err(StatusCode::BAD_REQUEST);
    }
    project.images.remove(index);
    Ok(Json(serde_json::json!({ "message": "Image deleted" })))
}

async fn get_about(State(data): State<Shared>) -> Json<AboutContent> {
    Json(data.lock().unwrap().about.clone())
}

async fn update_about(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<AboutContent>,
) -> Result<Json<AboutContent>, StatusCode> {
    authorize(&data, &headers)?;
    data.lock().unwrap().about = input.clone();
    Ok(Json(input))
}

async fn list_contacts(
    State(data): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContactSubmission>>, StatusCode> {
    authorize(&data, &headers)?;
    Ok(Json(data.lock().unwrap().contacts.clone()))
}

async fn submit_contact(
    State(data): State<Shared>,
    Json(input): Json<NewContact>,
) -> Json<ContactSubmission> {
    let submission = ContactSubmission {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name,
        email: input.email,
        phone: input.phone,
        message: input.message,
        submitted_at: chrono::Utc::now(),
    };
    data.lock().unwrap().contacts.push(submission.clone());
    Json(submission)
}

async fn get_availability(State(data): State<Shared>) -> Json<AvailabilitySnapshot> {
    Json(AvailabilitySnapshot {
        dates: data.lock().unwrap().dates.clone(),
    })
}

async fn put_availability(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<AvailabilitySnapshot>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&data, &headers)?;
    data.lock().unwrap().dates = input.dates;
    Ok(Json(serde_json::json!({ "message": "Availability updated" })))
}
