//! In-memory project catalog with per-user access lists.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::error::{GroundError, Result};
use crate::models::{Project, User};
use crate::ports::ProjectRepository;

#[derive(Debug, Clone)]
struct ProjectEntry {
    project: Project,
    /// Emails of the users allowed to read the project
    members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProjectRepository {
    projects: Arc<RwLock<Vec<ProjectEntry>>>,
    active: Arc<RwLock<Option<Project>>>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project, replacing one with the same id
    pub fn add_project<I, S>(&self, project: Project, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = ProjectEntry { project, members: members.into_iter().map(Into::into).collect() };
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        match projects.iter_mut().find(|existing| existing.project.id == entry.project.id) {
            Some(existing) => *existing = entry,
            None => projects.push(entry),
        }
    }
}

impl ProjectRepository for MemoryProjectRepository {
    fn project_summaries(&self, user: &User) -> Result<Vec<Project>> {
        let projects = self.projects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(projects
            .iter()
            .filter(|entry| entry.members.iter().any(|email| *email == user.email))
            .map(|entry| entry.project.clone())
            .collect())
    }

    fn activate_project(&self, id: &str) -> Result<Project> {
        let project = self
            .projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|entry| entry.project.id == id)
            .map(|entry| entry.project.clone())
            .ok_or_else(|| GroundError::ProjectNotFound(id.to_string()))?;

        info!(project_id = %project.id, "Activated project");
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(project.clone());
        Ok(project)
    }

    fn active_project(&self) -> Option<Project> {
        self.active.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
