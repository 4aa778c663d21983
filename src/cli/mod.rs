//! Command-line interface for the metadata portal.

pub mod output;

use crate::config::PortalConfig;
use crate::types::DatabaseType;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;

/// metaportal - catalog, lineage and change log for documented databases.
#[derive(Parser)]
#[command(name = "metaportal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "METAPORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, env = "METAPORTAL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List schemas
    Schemas,

    /// List tables
    Tables {
        /// Only tables of this schema
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// List columns
    Columns {
        /// Schema of the table
        #[arg(short, long, requires = "table")]
        schema: Option<String>,

        /// Only columns of this table
        #[arg(short, long, requires = "schema")]
        table: Option<String>,
    },

    /// Search lineage mappings
    Lineage {
        /// Target schema (whole name)
        #[arg(long)]
        schema: Option<String>,

        /// Target table (whole name)
        #[arg(long)]
        table: Option<String>,

        /// Target column (substring)
        #[arg(long)]
        column: Option<String>,

        /// Change reference (substring)
        #[arg(long)]
        change_ref: Option<String>,
    },

    /// List projects
    Projects,

    /// Search a project's change log
    Changes {
        /// Project ID
        project: u64,

        /// Free text over table, column, description, user and reference
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        table: Option<String>,

        #[arg(long)]
        column: Option<String>,

        /// CREATE, UPDATE, ALTER or DELETE
        #[arg(long)]
        change_type: Option<String>,

        #[arg(long)]
        change_ref: Option<String>,
    },

    /// Show project statistics
    Stats {
        /// Project ID
        project: u64,
    },

    /// Lineage coverage per table
    Coverage,

    /// Impact of changing each source column
    Impact,

    /// Set up the project
    Setup {
        /// Project name
        #[arg(long)]
        name: String,

        /// Project description
        #[arg(long, default_value = "")]
        description: String,

        /// Oracle, PostgreSQL, MySQL or SQL Server
        #[arg(long, default_value = "Oracle")]
        database_type: DatabaseType,

        /// Connection string
        #[arg(long, env = "METAPORTAL_CONNECTION_STRING")]
        connection_string: String,
    },

    /// Remove the project configuration
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Log in
    Login {
        username: String,

        #[arg(long, env = "METAPORTAL_PASSWORD")]
        password: String,
    },

    /// Log out
    Logout,

    /// Show or change display settings
    Settings {
        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        auto_save: Option<bool>,

        #[arg(long)]
        compact_view: Option<bool>,

        #[arg(long)]
        date_format: Option<String>,

        /// 12h or 24h
        #[arg(long)]
        time_format: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        page_size: Option<u32>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Applies command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut PortalConfig) {
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}
