//! Project selection: the projects the signed-in user may open, and
//! activation of one of them by its position in that list.

use std::sync::Arc;
use tracing::debug;

use crate::error::{GroundError, Result};
use crate::models::Project;
use crate::ports::{AuthenticationManager, ProjectRepository};

pub struct ProjectSelector {
    repository: Arc<dyn ProjectRepository>,
    summaries: Vec<Project>,
}

impl ProjectSelector {
    /// Fetch the project summaries of the current user
    pub fn load(
        repository: Arc<dyn ProjectRepository>,
        auth: &dyn AuthenticationManager,
    ) -> Result<Self> {
        let user = auth.current_user();
        let summaries = repository.project_summaries(&user)?;
        debug!(user = %user.email, count = summaries.len(), "Loaded project summaries");
        Ok(Self { repository, summaries })
    }

    pub fn summaries(&self) -> &[Project] {
        &self.summaries
    }

    /// Activate the project at `index` in [`summaries`](Self::summaries)
    pub fn activate_project(&self, index: usize) -> Result<Project> {
        let summary = self.summaries.get(index).ok_or(GroundError::ProjectIndexOutOfRange {
            index,
            available: self.summaries.len(),
        })?;
        self.repository.activate_project(&summary.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProjectRepository;
    use crate::models::User;
    use crate::ports::StaticAuthenticationManager;

    fn auth(email: &str) -> StaticAuthenticationManager {
        StaticAuthenticationManager::new(User {
            id: email.to_string(),
            email: email.to_string(),
            display_name: "Surveyor".to_string(),
        })
    }

    fn repository() -> Arc<MemoryProjectRepository> {
        let repo = Arc::new(MemoryProjectRepository::new());
        for (id, title) in [("forest", "Forest survey"), ("river", "River banks")] {
            repo.add_project(Project { id: id.to_string(), title: title.to_string() }, ["ana@example.com"]);
        }
        repo.add_project(
            Project { id: "private".to_string(), title: "Private".to_string() },
            ["bo@example.com"],
        );
        repo
    }

    #[test]
    fn test_activate_by_index() {
        let repo = repository();
        let selector = ProjectSelector::load(repo.clone(), &auth("ana@example.com")).unwrap();
        assert_eq!(selector.summaries().len(), 2);

        let project = selector.activate_project(1).unwrap();
        assert_eq!(project.id, "river");
        assert_eq!(repo.active_project().map(|p| p.id), Some("river".to_string()));
    }

    #[test]
    fn test_index_out_of_range_is_an_error() {
        let repo = repository();
        let selector = ProjectSelector::load(repo.clone(), &auth("ana@example.com")).unwrap();

        assert!(matches!(
            selector.activate_project(2),
            Err(GroundError::ProjectIndexOutOfRange { index: 2, available: 2 })
        ));
        assert!(repo.active_project().is_none());
    }

    #[test]
    fn test_user_without_projects() {
        let selector = ProjectSelector::load(repository(), &auth("nobody@example.com")).unwrap();
        assert!(selector.summaries().is_empty());
        assert!(matches!(
            selector.activate_project(0),
            Err(GroundError::ProjectIndexOutOfRange { index: 0, available: 0 })
        ));
    }
}
