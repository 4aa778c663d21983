// Portal user registry

use crate::error::{PortalError, Result};
use crate::repository::{Record, Repository};
use crate::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Role assigned to a portal user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Administrator,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[serde(rename = "Data Engineer")]
    DataEngineer,
    #[default]
    Viewer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Administrator,
        UserRole::DataAnalyst,
        UserRole::DataEngineer,
        UserRole::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "Administrator",
            UserRole::DataAnalyst => "Data Analyst",
            UserRole::DataEngineer => "Data Engineer",
            UserRole::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        UserRole::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PortalError::InvalidInput(format!("unknown role: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => f.write_str("active"),
            UserStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// An account that can use the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// `None` until the first login
    pub last_login: Option<Timestamp>,
}

impl PortalUser {
    pub fn new(username: &str, email: &str, role: UserRole) -> Self {
        Self {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            role,
            status: UserStatus::Active,
            last_login: None,
        }
    }
}

impl Record for PortalUser {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Portal accounts in creation order
pub struct UserRegistry {
    users: Repository<PortalUser>,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: Repository::new("user"),
        }
    }

    /// Adds a user. Usernames are unique, case-insensitively.
    pub async fn create(&self, user: PortalUser) -> Result<PortalUser> {
        if user.username.trim().is_empty() {
            return Err(PortalError::InvalidInput("username is required".into()));
        }
        let taken = self
            .users
            .read(|u| u.iter().any(|u| u.username.eq_ignore_ascii_case(&user.username)))
            .await;
        if taken {
            return Err(PortalError::AlreadyExists(format!("user {}", user.username)));
        }
        let created = self.users.append(user).await;
        info!(id = created.id, username = %created.username, role = %created.role, "User created");
        Ok(created)
    }

    pub async fn list(&self) -> Vec<PortalUser> {
        self.users.list().await
    }

    pub async fn by_username(&self, username: &str) -> Option<PortalUser> {
        self.users
            .read(|u| u.iter().find(|u| u.username.eq_ignore_ascii_case(username)).cloned())
            .await
    }

    pub async fn set_status(&self, id: RecordId, status: UserStatus) -> Result<PortalUser> {
        self.users.update(id, |u| u.status = status).await
    }

    pub async fn set_role(&self, id: RecordId, role: UserRole) -> Result<PortalUser> {
        self.users.update(id, |u| u.role = role).await
    }

    /// Stamps the login time of a known user
    pub async fn touch_login(&self, username: &str, at: Timestamp) {
        if let Some(user) = self.by_username(username).await {
            let _ = self.users.update(user.id, |u| u.last_login = Some(at)).await;
        }
    }

    pub async fn delete(&self, id: RecordId) -> bool {
        self.users.delete(id).await
    }

    pub async fn active(&self) -> usize {
        self.users
            .read(|u| u.iter().filter(|u| u.status == UserStatus::Active).count())
            .await
    }

    pub async fn reset(&self) {
        self.users.clear().await;
    }
}
