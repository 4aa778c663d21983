// Project store

use super::model::{Project, ProjectStatus};
use crate::error::{PortalError, Result};
use crate::repository::Repository;
use crate::types::{now, ProjectId};
use tracing::info;

pub struct ProjectStore {
    projects: Repository<Project>,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore {
    pub fn new() -> Self {
        Self {
            projects: Repository::new("project"),
        }
    }

    /// Registers a project. Names are unique.
    pub async fn create(&self, project: Project) -> Result<Project> {
        if project.name.trim().is_empty() {
            return Err(PortalError::InvalidInput("project name is required".into()));
        }
        let created = self
            .projects
            .insert_with(|existing, _| {
                if existing.iter().any(|p| p.name == project.name) {
                    return Err(PortalError::AlreadyExists(format!("project {}", project.name)));
                }
                Ok(project)
            })
            .await?;
        info!(project = %created.name, id = created.id, "Project registered");
        Ok(created)
    }

    pub async fn get(&self, id: ProjectId) -> Result<Project> {
        self.projects
            .get(id)
            .await
            .ok_or(PortalError::ProjectNotFound(id))
    }

    /// Looks a project up by its exact name
    pub async fn by_name(&self, name: &str) -> Option<Project> {
        self.projects
            .read(|p| p.iter().find(|p| p.name == name).cloned())
            .await
    }

    pub async fn list(&self) -> Vec<Project> {
        self.projects.list().await
    }

    /// Adds a schema to a project's scope
    pub async fn add_schema(&self, id: ProjectId, schema: &str) -> Result<Project> {
        self.projects
            .update(id, |p| {
                p.schemas.insert(schema.to_string());
                p.last_updated = now();
            })
            .await
            .map_err(|_| PortalError::ProjectNotFound(id))
    }

    pub async fn set_status(&self, id: ProjectId, status: ProjectStatus) -> Result<Project> {
        let project = self
            .projects
            .update(id, |p| {
                p.status = status;
                p.last_updated = now();
            })
            .await
            .map_err(|_| PortalError::ProjectNotFound(id))?;
        info!(id, status = %status, "Project status changed");
        Ok(project)
    }

    pub async fn len(&self) -> usize {
        self.projects.len().await
    }

    pub async fn reset(&self) {
        self.projects.clear().await;
    }
}
