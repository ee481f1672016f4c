//! Content repository: validated, session-aware operations on projects,
//! the about section, contact submissions and availability.
//!
//! Each call is one request/response round trip. Nothing here patches local
//! state; callers re-fetch after a successful mutation (see
//! [`crate::state::ContentState`]).

use buildsite_core::about::AboutContent;
use buildsite_core::availability::BusyDates;
use buildsite_core::contact::{ContactSubmission, NewContact};
use buildsite_core::project::{NewProject, Project, UpdateProject};
use buildsite_core::session::Session;

use crate::api::{BackendApi, ImageUpload};
use crate::error::{ClientError, ClientResult};
use crate::session::SessionHolder;
use crate::storage::{KeyValueStore, StorageError};

/// Asks the user to confirm a destructive operation.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a delete that required confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; no request was sent.
    Declined,
}

pub struct ContentRepository<S: KeyValueStore> {
    api: BackendApi,
    session: SessionHolder<S>,
}

impl<S: KeyValueStore> ContentRepository<S> {
    pub fn new(api: BackendApi, session: SessionHolder<S>) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> &BackendApi {
        &self.api
    }

    pub fn session(&self) -> &SessionHolder<S> {
        &self.session
    }

    // ---- session ----

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<&Session> {
        self.session.login(&self.api, username, password).await
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.session.logout()
    }

    /// Drop a session the backend no longer accepts, as the caller must on
    /// an auth failure. Returns `true` if a session was cleared.
    ///
    /// The in-memory session is always cleared; a failure to clear the
    /// durable copy is logged rather than returned so `err` stays the error
    /// the caller reports.
    pub fn discard_rejected_session(&mut self, err: &ClientError) -> bool {
        if !err.is_auth() || !self.session.is_authenticated() {
            return false;
        }
        tracing::warn!(error = %err, "Admin call rejected, clearing session");
        if let Err(storage_err) = self.session.logout() {
            tracing::error!(error = %storage_err, "Failed to clear persisted session");
        }
        true
    }

    // ---- projects ----

    /// Projects in the order the backend returns them.
    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        self.api.list_projects().await
    }

    pub async fn create_project(&self, project: &NewProject) -> ClientResult<Project> {
        reject_invalid(project.validate_form())?;
        let token = self.token()?;
        let created = self.api.create_project(token, project).await?;
        tracing::info!(project_id = %created.id, title = %created.title, "Project created");
        Ok(created)
    }

    pub async fn update_project(&self, project_id: &str, update: &UpdateProject) -> ClientResult<Project> {
        reject_invalid(update.validate_form())?;
        let token = self.token()?;
        let updated = self.api.update_project(token, project_id, update).await?;
        tracing::info!(project_id, "Project updated");
        Ok(updated)
    }

    pub async fn delete_project(
        &self,
        project_id: &str,
        confirm: &impl Confirm,
    ) -> ClientResult<DeleteOutcome> {
        let token = self.token()?;
        if !confirm.confirm("Are you sure you want to delete this project?") {
            return Ok(DeleteOutcome::Declined);
        }
        self.api.delete_project(token, project_id).await?;
        tracing::info!(project_id, "Project deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Append one image. File type and size are the backend's concern.
    pub async fn upload_image(&self, project_id: &str, upload: ImageUpload) -> ClientResult<Project> {
        let token = self.token()?;
        let file_name = upload.file_name.clone();
        let project = self.api.upload_image(token, project_id, upload).await?;
        tracing::info!(project_id, file_name = %file_name, images = project.images.len(), "Image uploaded");
        Ok(project)
    }

    /// Remove the image at `index` of `project`. An out-of-range index is
    /// rejected before prompting or sending anything.
    pub async fn delete_image(
        &self,
        project: &Project,
        index: usize,
        confirm: &impl Confirm,
    ) -> ClientResult<DeleteOutcome> {
        reject_invalid(project.check_image_index(index))?;
        let token = self.token()?;
        if !confirm.confirm("Are you sure you want to delete this image?") {
            return Ok(DeleteOutcome::Declined);
        }
        self.api.delete_image(token, &project.id, index).await?;
        tracing::info!(project_id = %project.id, index, "Image deleted");
        Ok(DeleteOutcome::Deleted)
    }

    // ---- about ----

    pub async fn get_about(&self) -> ClientResult<AboutContent> {
        self.api.get_about().await
    }

    /// Full replace of the about section.
    pub async fn update_about(&self, about: &AboutContent) -> ClientResult<AboutContent> {
        reject_invalid(about.validate_form())?;
        let token = self.token()?;
        let updated = self.api.update_about(token, about).await?;
        tracing::info!("About section updated");
        Ok(updated)
    }

    // ---- contact ----

    pub async fn list_contacts(&self) -> ClientResult<Vec<ContactSubmission>> {
        let token = self.token()?;
        self.api.list_contacts(token).await
    }

    /// Public submission; no session needed.
    pub async fn submit_contact(&self, contact: &NewContact) -> ClientResult<ContactSubmission> {
        reject_invalid(contact.validate_form())?;
        let submission = self.api.submit_contact(contact).await?;
        tracing::info!(contact_id = %submission.id, "Contact form submitted");
        Ok(submission)
    }

    // ---- availability ----

    pub async fn fetch_busy_dates(&self) -> ClientResult<BusyDates> {
        let snapshot = self.api.get_availability().await?;
        Ok(BusyDates::from(&snapshot))
    }

    /// Replace the backend's busy days with exactly `busy`.
    pub async fn save_busy_dates(&self, busy: &BusyDates) -> ClientResult<()> {
        let token = self.token()?;
        self.api.put_availability(token, &busy.to_snapshot()).await?;
        tracing::info!(busy_days = busy.len(), "Availability saved");
        Ok(())
    }

    // ---- private helpers ----

    /// Bearer token for privileged calls; without a session the call is
    /// refused locally.
    fn token(&self) -> ClientResult<&str> {
        self.session
            .current_token()
            .ok_or_else(|| ClientError::Auth("Not logged in".into()))
    }
}

fn reject_invalid<T>(result: Result<T, buildsite_core::error::CoreError>) -> ClientResult<T> {
    result.map_err(|e| {
        tracing::debug!(error = %e, "Rejected before submission");
        ClientError::from(e)
    })
}
