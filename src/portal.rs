//! The portal facade.
//!
//! [`Portal`] owns every store, the backend and the persisted state. It is
//! the one object handed to a UI layer or the CLI. Mutations are submitted
//! to the backend first and applied to the stores only after it
//! acknowledges.

use crate::admin::{ConnectionRegistry, DatabaseConnection, UserRegistry};
use crate::backend::{MetadataBackend, Operation, SimulatedBackend, Submission};
use crate::catalog::{CatalogStore, Column, ColumnDraft, Schema, SchemaDraft, Table, TableDraft};
use crate::changelog::{ChangeEntry, ChangeFilter, ChangeLogStore, ChangeRecord};
use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::lineage::{LineageDraft, LineageFilter, LineageMapping, LineageStore, MappingSummary};
use crate::project::{Project, ProjectStats, ProjectStore};
use crate::reports::{self, ColumnImpact, TableCoverage};
use crate::settings::DisplaySettings;
use crate::setup::{ProjectConfigRecord, ProjectSetupRequest};
use crate::storage::{FileKvStore, PersistentState};
use crate::types::{now, ProjectId, RecordId, TableRef};
use std::sync::Arc;
use tracing::{info, warn};

/// Author recorded on lineage created without a logged-in user
pub const ANONYMOUS_USER: &str = "user";

pub struct Portal {
    config: PortalConfig,
    catalog: CatalogStore,
    lineage: LineageStore,
    changes: ChangeLogStore,
    projects: ProjectStore,
    connections: ConnectionRegistry,
    users: UserRegistry,
    backend: Arc<dyn MetadataBackend>,
    state: PersistentState,
}

impl Portal {
    /// Creates an empty portal
    pub fn new(config: PortalConfig, backend: Arc<dyn MetadataBackend>, state: PersistentState) -> Self {
        Self {
            lineage: LineageStore::new(&config.lineage.change_ref_prefix),
            config,
            catalog: CatalogStore::new(),
            changes: ChangeLogStore::new(),
            projects: ProjectStore::new(),
            connections: ConnectionRegistry::new(),
            users: UserRegistry::new(),
            backend,
            state,
        }
    }

    /// Opens a portal with file-backed state and the simulated backend.
    ///
    /// A project configuration persisted by an earlier session is registered
    /// as a project again.
    pub async fn open(config: PortalConfig) -> Result<Self> {
        config.validate()?;
        let store = FileKvStore::open(&config.storage.data_dir).await?;
        let backend = SimulatedBackend::new(config.backend.latency);
        backend.set_offline(config.backend.offline);

        let portal = Self::new(config, Arc::new(backend), PersistentState::new(Arc::new(store)));
        if let Some(record) = portal.state.project_config().await? {
            portal.restore_project(&record).await?;
        }
        info!(backend = portal.backend.name(), "Portal opened");
        Ok(portal)
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn MetadataBackend {
        self.backend.as_ref()
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn lineage_store(&self) -> &LineageStore {
        &self.lineage
    }

    pub fn change_log(&self) -> &ChangeLogStore {
        &self.changes
    }

    pub fn project_store(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    async fn submit(&self, entity: &str, operation: Operation, key: impl Into<String>) -> Result<()> {
        self.backend
            .submit(&Submission::new(entity, operation, key))
            .await
    }

    // Catalog

    pub async fn create_schema(&self, draft: SchemaDraft) -> Result<Schema> {
        self.submit("schema", Operation::Create, draft.name.clone()).await?;
        self.catalog.create_schema(draft).await
    }

    pub async fn create_table(&self, draft: TableDraft) -> Result<Table> {
        let key = format!("{}.{}", draft.schema_name, draft.name);
        self.submit("table", Operation::Create, key).await?;
        self.catalog.create_table(draft).await
    }

    pub async fn create_column(&self, draft: ColumnDraft) -> Result<Column> {
        let key = format!("{}.{}", draft.table_ref, draft.name);
        self.submit("column", Operation::Create, key).await?;
        self.catalog.create_column(draft).await
    }

    pub async fn update_schema(&self, id: RecordId, description: &str) -> Result<Schema> {
        self.submit("schema", Operation::Update, id.to_string()).await?;
        self.catalog.update_schema(id, description).await
    }

    pub async fn update_table(&self, id: RecordId, business_definition: &str) -> Result<Table> {
        self.submit("table", Operation::Update, id.to_string()).await?;
        self.catalog.update_table(id, business_definition).await
    }

    pub async fn update_column(&self, id: RecordId, draft: ColumnDraft) -> Result<Column> {
        self.submit("column", Operation::Update, id.to_string()).await?;
        self.catalog.update_column(id, draft).await
    }

    pub async fn delete_table(&self, id: RecordId) -> Result<bool> {
        self.submit("table", Operation::Delete, id.to_string()).await?;
        self.catalog.delete_table(id).await
    }

    pub async fn delete_column(&self, id: RecordId) -> Result<bool> {
        self.submit("column", Operation::Delete, id.to_string()).await?;
        Ok(self.catalog.delete_column(id).await)
    }

    pub async fn schemas(&self) -> Vec<Schema> {
        self.catalog.schemas().await
    }

    pub async fn tables(&self, schema: Option<&str>) -> Vec<Table> {
        self.catalog.tables(schema).await
    }

    pub async fn columns(&self, table: Option<&TableRef>) -> Vec<Column> {
        self.catalog.columns(table).await
    }

    /// Asks the live database for the tables of `schema`. Nothing is imported.
    pub async fn pull_schema(&self, schema: &str) -> Result<Vec<String>> {
        let tables = self.backend.pull_schema(schema).await?;
        info!(schema, tables = tables.len(), "Schema pulled");
        Ok(tables)
    }

    /// Hands an uploaded CSV to the backend. Nothing is imported.
    pub async fn import_csv(&self, file_name: &str) -> Result<usize> {
        let rows = self.backend.import_csv(file_name).await?;
        info!(file_name, rows, "CSV import finished");
        Ok(rows)
    }

    // Lineage

    /// Creates a mapping authored by the logged-in user
    pub async fn create_lineage(&self, draft: LineageDraft) -> Result<LineageMapping> {
        if !draft.can_submit() {
            return Err(PortalError::InvalidInput(
                "target column and every source column are required".into(),
            ));
        }
        let created_by = self.current_user().await?;
        let key = draft
            .target
            .column_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();
        self.submit("lineage", Operation::Create, key).await?;
        self.lineage.create(draft, &created_by).await
    }

    pub async fn update_lineage(&self, id: RecordId, draft: LineageDraft) -> Result<LineageMapping> {
        self.submit("lineage", Operation::Update, id.to_string()).await?;
        self.lineage.update(id, draft).await
    }

    pub async fn delete_lineage(&self, id: RecordId) -> Result<bool> {
        self.submit("lineage", Operation::Delete, id.to_string()).await?;
        Ok(self.lineage.delete(id).await)
    }

    pub async fn lineage(&self, filter: &LineageFilter) -> Vec<LineageMapping> {
        self.lineage.filter(filter).await
    }

    pub async fn lineage_summary(&self) -> MappingSummary {
        self.lineage.summary().await
    }

    // Projects and change log

    pub async fn create_project(&self, project: Project) -> Result<Project> {
        self.submit("project", Operation::Create, project.name.clone()).await?;
        self.projects.create(project).await
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.projects.list().await
    }

    /// Records a change against an existing project
    pub async fn record_change(&self, project_id: ProjectId, entry: ChangeEntry) -> Result<ChangeRecord> {
        self.projects.get(project_id).await?;
        Ok(self.changes.record_change(project_id, entry).await)
    }

    /// A project's changes matching `filter`, newest first
    pub async fn changes(&self, project_id: ProjectId, filter: &ChangeFilter) -> Result<Vec<ChangeRecord>> {
        self.projects.get(project_id).await?;
        Ok(self.changes.filter(project_id, filter).await)
    }

    /// Dashboard counters, derived from the stores on every call
    pub async fn stats_for_project(&self, project_id: ProjectId) -> Result<ProjectStats> {
        let project = self.projects.get(project_id).await?;
        let window = chrono::Duration::from_std(self.config.stats.recent_window)
            .map_err(|e| PortalError::Config(format!("recent window out of range: {}", e)))?;
        Ok(ProjectStats::collect(&project, &self.catalog, &self.lineage, &self.changes, now() - window).await)
    }

    // Reports

    pub async fn coverage_report(&self) -> Vec<TableCoverage> {
        let tables = self.catalog.tables(None).await;
        let columns = self.catalog.columns(None).await;
        let mappings = self.lineage.list().await;
        reports::lineage_coverage(&tables, &columns, &mappings)
    }

    pub async fn impact_report(&self) -> Vec<ColumnImpact> {
        let mappings = self.lineage.list().await;
        reports::impact_analysis(&mappings)
    }

    // Project setup

    /// Sets up the single configured project.
    ///
    /// A name already taken by a registered project is rejected before the
    /// backend is asked.
    ///
    /// Any failure after the request passes its submit gate surfaces as
    /// [`PortalError::SetupFailed`], whose message is the only one the user
    /// sees.
    pub async fn setup_project(&self, request: ProjectSetupRequest) -> Result<ProjectConfigRecord> {
        if self.state.project_config().await?.is_some() {
            return Err(PortalError::AlreadyExists("project configuration".into()));
        }
        request.check()?;
        if self.projects.by_name(&request.project_name).await.is_some() {
            return Err(PortalError::AlreadyExists(format!("project {}", request.project_name)));
        }

        let project_name = request.project_name.clone();
        match self.try_setup(request).await {
            Ok(record) => {
                info!(project = %record.project_name, database = %record.database_type, "Project set up");
                Ok(record)
            }
            Err(e) => {
                warn!(project = %project_name, error = %e, "Project setup failed");
                Err(PortalError::SetupFailed { cause: e.to_string() })
            }
        }
    }

    async fn try_setup(&self, request: ProjectSetupRequest) -> Result<ProjectConfigRecord> {
        self.backend.setup_project(&request).await?;
        let record = ProjectConfigRecord::from_request(request);
        self.state.save_project_config(&record).await?;

        let project = Project::new(&record.project_name, &record.project_description);
        if let Err(e) = self.projects.create(project).await {
            self.state.clear_project_config().await?;
            return Err(e);
        }
        Ok(record)
    }

    /// Registers the project of a configuration persisted by an earlier
    /// session. A project already registered under that name is kept.
    async fn restore_project(&self, record: &ProjectConfigRecord) -> Result<()> {
        let project = Project::new(&record.project_name, &record.project_description);
        match self.projects.create(project).await {
            Ok(_) | Err(PortalError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn project_config(&self) -> Result<Option<ProjectConfigRecord>> {
        self.state.project_config().await
    }

    /// Removes the project configuration and clears the catalog, lineage,
    /// change log and projects. Session, settings and admin registries stay.
    pub async fn reset_project(&self) -> Result<()> {
        self.state.clear_project_config().await?;
        self.catalog.reset().await;
        self.lineage.reset().await;
        self.changes.reset().await;
        self.projects.reset().await;
        info!("Project reset");
        Ok(())
    }

    // Session and settings

    /// Accepts any non-empty username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(PortalError::InvalidInput("username and password are required".into()));
        }
        self.state.save_session(username).await?;
        self.users.touch_login(username, now()).await;
        info!(username, "Logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.state.clear_session().await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        self.state.is_authenticated().await
    }

    /// Logged-in username, or [`ANONYMOUS_USER`]
    pub async fn current_user(&self) -> Result<String> {
        Ok(self
            .state
            .username()
            .await?
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string()))
    }

    pub async fn display_settings(&self) -> Result<DisplaySettings> {
        self.state.display_settings().await
    }

    pub async fn save_display_settings(&self, settings: &DisplaySettings) -> Result<()> {
        self.state.save_display_settings(settings).await
    }

    // Administration

    pub async fn add_connection(&self, connection: DatabaseConnection) -> Result<DatabaseConnection> {
        self.submit("connection", Operation::Create, connection.endpoint()).await?;
        Ok(self.connections.create(connection).await)
    }

    pub async fn test_connection(&self, id: RecordId) -> Result<DatabaseConnection> {
        self.connections.test(id, self.backend.as_ref()).await
    }
}
