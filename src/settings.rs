//! Display preferences persisted for the portal user.

use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};

/// User display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub notifications: bool,
    pub auto_save: bool,
    pub compact_view: bool,
    pub date_format: String,
    pub time_format: String,
    pub language: String,
    /// Rows per page in list views
    pub page_size: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            notifications: true,
            auto_save: true,
            compact_view: false,
            date_format: "YYYY-MM-DD".to_string(),
            time_format: "24h".to_string(),
            language: "en".to_string(),
            page_size: 25,
        }
    }
}

impl DisplaySettings {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PortalError::Validation("page size must be at least 1".into()));
        }
        if self.date_format.trim().is_empty() {
            return Err(PortalError::Validation("date format cannot be empty".into()));
        }
        if !matches!(self.time_format.as_str(), "12h" | "24h") {
            return Err(PortalError::Validation(format!(
                "time format must be 12h or 24h, got {}",
                self.time_format
            )));
        }
        Ok(())
    }
}
