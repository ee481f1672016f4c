//! Local content state for the public page and the admin dashboard.
//!
//! Every successful mutation is followed by a re-fetch of the resource it
//! touched; local collections are only ever replaced wholesale with what the
//! backend returned. A failed call leaves all local state as it was.

use buildsite_core::about::AboutContent;
use buildsite_core::availability::BusyDates;
use buildsite_core::contact::{ContactSubmission, NewContact};
use buildsite_core::error::CoreError;
use buildsite_core::gallery::GalleryCursor;
use buildsite_core::project::{NewProject, Project, UpdateProject};
use buildsite_core::types::CalendarDay;

use crate::api::ImageUpload;
use crate::error::ClientResult;
use crate::repository::{Confirm, ContentRepository, DeleteOutcome};
use crate::storage::KeyValueStore;

pub struct ContentState<S: KeyValueStore> {
    repo: ContentRepository<S>,
    projects: Vec<Project>,
    about: AboutContent,
    contacts: Vec<ContactSubmission>,
    busy: BusyDates,
}

impl<S: KeyValueStore> ContentState<S> {
    pub fn new(repo: ContentRepository<S>) -> Self {
        Self {
            repo,
            projects: Vec::new(),
            about: AboutContent::default(),
            contacts: Vec::new(),
            busy: BusyDates::new(),
        }
    }

    pub fn repository(&self) -> &ContentRepository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut ContentRepository<S> {
        &mut self.repo
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn about(&self) -> &AboutContent {
        &self.about
    }

    pub fn contacts(&self) -> &[ContactSubmission] {
        &self.contacts
    }

    pub fn busy_dates(&self) -> &BusyDates {
        &self.busy
    }

    /// One fresh carousel cursor per project, in display order.
    pub fn galleries(&self) -> Vec<(&Project, GalleryCursor)> {
        self.projects
            .iter()
            .map(|p| (p, GalleryCursor::for_project(p)))
            .collect()
    }

    // ---- loading ----

    /// Everything the public landing page shows. Each resource loads on its
    /// own, so one failed fetch does not keep the others empty; the first
    /// failure is returned once all have been tried.
    pub async fn load_public(&mut self) -> ClientResult<()> {
        let results = [
            self.refresh_projects().await,
            self.refresh_about().await,
            self.refresh_availability().await,
        ];
        first_error(results)
    }

    /// The public content plus the admin-only contact list.
    pub async fn load_admin(&mut self) -> ClientResult<()> {
        let public = self.load_public().await;
        let contacts = self.refresh_contacts().await;
        first_error([public, contacts])
    }

    pub async fn refresh_projects(&mut self) -> ClientResult<()> {
        self.projects = self.repo.list_projects().await?;
        Ok(())
    }

    pub async fn refresh_about(&mut self) -> ClientResult<()> {
        self.about = self.repo.get_about().await?;
        Ok(())
    }

    pub async fn refresh_contacts(&mut self) -> ClientResult<()> {
        let result = self.repo.list_contacts().await;
        self.contacts = self.admin_result(result)?;
        Ok(())
    }

    /// Discards unsaved local availability edits.
    pub async fn refresh_availability(&mut self) -> ClientResult<()> {
        self.busy = self.repo.fetch_busy_dates().await?;
        Ok(())
    }

    // ---- projects ----

    pub async fn create_project(&mut self, project: &NewProject) -> ClientResult<()> {
        let result = self.repo.create_project(project).await;
        self.admin_result(result)?;
        self.refresh_projects().await
    }

    pub async fn update_project(&mut self, project_id: &str, update: &UpdateProject) -> ClientResult<()> {
        let result = self.repo.update_project(project_id, update).await;
        self.admin_result(result)?;
        self.refresh_projects().await
    }

    pub async fn delete_project(
        &mut self,
        project_id: &str,
        confirm: &impl Confirm,
    ) -> ClientResult<DeleteOutcome> {
        let result = self.repo.delete_project(project_id, confirm).await;
        let outcome = self.admin_result(result)?;
        if outcome == DeleteOutcome::Deleted {
            self.refresh_projects().await?;
        }
        Ok(outcome)
    }

    pub async fn upload_image(&mut self, project_id: &str, upload: ImageUpload) -> ClientResult<()> {
        let result = self.repo.upload_image(project_id, upload).await;
        self.admin_result(result)?;
        self.refresh_projects().await
    }

    /// Delete an image of a project currently held in local state.
    pub async fn delete_image(
        &mut self,
        project_id: &str,
        index: usize,
        confirm: &impl Confirm,
    ) -> ClientResult<DeleteOutcome> {
        let project = self
            .project(project_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            })?;
        let result = self.repo.delete_image(&project, index, confirm).await;
        let outcome = self.admin_result(result)?;
        if outcome == DeleteOutcome::Deleted {
            self.refresh_projects().await?;
        }
        Ok(outcome)
    }

    // ---- about ----

    pub async fn update_about(&mut self, about: &AboutContent) -> ClientResult<()> {
        let result = self.repo.update_about(about).await;
        self.admin_result(result)?;
        self.refresh_about().await
    }

    // ---- contact ----

    /// Public form submission. Nothing local changes on success.
    pub async fn submit_contact(&mut self, contact: &NewContact) -> ClientResult<ContactSubmission> {
        self.repo.submit_contact(contact).await
    }

    // ---- availability ----

    /// Local edit; call [`save_availability`](Self::save_availability) to
    /// persist.
    pub fn toggle_busy(&mut self, day: CalendarDay) -> bool {
        self.busy.toggle(day)
    }

    pub fn select_busy<I>(&mut self, days: I)
    where
        I: IntoIterator<Item = CalendarDay>,
    {
        self.busy.select(days);
    }

    /// Persist the busy set, then re-fetch it.
    ///
    /// If the `PUT` succeeds but the re-fetch fails, the error returned is
    /// the re-fetch failure: the backend already holds the saved set and the
    /// local set is kept as saved.
    pub async fn save_availability(&mut self) -> ClientResult<()> {
        let result = self.repo.save_busy_dates(&self.busy).await;
        self.admin_result(result)?;
        self.refresh_availability().await.map_err(|e| {
            tracing::warn!(error = %e, "Availability saved but re-fetch failed");
            e
        })
    }

    // ---- private helpers ----

    /// An auth failure on an admin call means the held token is useless;
    /// drop it so the caller is sent back to login. The original error is
    /// always returned.
    fn admin_result<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result {
            self.repo.discard_rejected_session(err);
        }
        result
    }
}

fn first_error<const N: usize>(results: [ClientResult<()>; N]) -> ClientResult<()> {
    let mut first = None;
    for err in results.into_iter().filter_map(Result::err) {
        tracing::warn!(error = %err, "Content load failed");
        first.get_or_insert(err);
    }
    first.map_or(Ok(()), Err)
}
