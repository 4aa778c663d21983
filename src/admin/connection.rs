// Database connection registry

use crate::backend::MetadataBackend;
use crate::error::{PortalError, Result};
use crate::repository::{Record, Repository};
use crate::types::{now, DatabaseType, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Result of the last connection test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("connected"),
            ConnectionStatus::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// A registered database the portal can document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConnection {
    pub id: RecordId,
    pub name: String,
    pub database_type: DatabaseType,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub status: ConnectionStatus,
    /// `None` until the first test
    pub last_tested: Option<Timestamp>,
}

impl DatabaseConnection {
    pub fn new(name: &str, database_type: DatabaseType, host: &str, port: u16, database: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            database_type,
            host: host.to_string(),
            port,
            database: database.to_string(),
            username: String::new(),
            status: ConnectionStatus::Disconnected,
            last_tested: None,
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    /// `host:port/database`
    pub fn endpoint(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl Record for DatabaseConnection {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Registered connections in creation order
pub struct ConnectionRegistry {
    connections: Repository<DatabaseConnection>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Repository::new("connection"),
        }
    }

    /// Registers a connection as untested and disconnected
    pub async fn create(&self, mut connection: DatabaseConnection) -> DatabaseConnection {
        connection.status = ConnectionStatus::Disconnected;
        connection.last_tested = None;
        let created = self.connections.append(connection).await;
        info!(id = created.id, name = %created.name, "Connection registered");
        created
    }

    /// Inserts a connection exactly as given, keeping status and test time
    pub(crate) async fn restore(&self, connection: DatabaseConnection) -> DatabaseConnection {
        self.connections.append(connection).await
    }

    pub async fn list(&self) -> Vec<DatabaseConnection> {
        self.connections.list().await
    }

    pub async fn get(&self, id: RecordId) -> Result<DatabaseConnection> {
        self.connections
            .get(id)
            .await
            .ok_or_else(|| PortalError::NotFound(format!("connection {}", id)))
    }

    pub async fn delete(&self, id: RecordId) -> bool {
        self.connections.delete(id).await
    }

    /// Asks the backend to reach the database and records the outcome
    pub async fn test(&self, id: RecordId, backend: &dyn MetadataBackend) -> Result<DatabaseConnection> {
        let connection = self.get(id).await?;
        let status = match backend.test_connection(&connection).await {
            Ok(true) => ConnectionStatus::Connected,
            Ok(false) => ConnectionStatus::Disconnected,
            Err(e) => {
                warn!(id, endpoint = %connection.endpoint(), error = %e, "Connection test failed");
                ConnectionStatus::Disconnected
            }
        };
        let tested = self
            .connections
            .update(id, |c| {
                c.status = status;
                c.last_tested = Some(now());
            })
            .await?;
        info!(id, status = %tested.status, "Connection tested");
        Ok(tested)
    }

    /// Number of connections currently marked connected
    pub async fn connected(&self) -> usize {
        self.connections
            .read(|c| c.iter().filter(|c| c.status == ConnectionStatus::Connected).count())
            .await
    }

    pub async fn reset(&self) {
        self.connections.clear().await;
    }
}
