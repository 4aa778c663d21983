//! Integration tests for project setup, session and persisted state.

#[allow(dead_code)]
mod common;

use common::*;
use metaportal::error::{PortalError, SETUP_FAILED_MESSAGE};
use metaportal::seed::seed_demo;
use metaportal::settings::DisplaySettings;
use metaportal::setup::ProjectSetupRequest;
use metaportal::types::DatabaseType;
use metaportal::Portal;

fn request() -> ProjectSetupRequest {
    ProjectSetupRequest::new("HR", DatabaseType::Oracle, "oracle://db.company.com:1521/HR")
        .description("People analytics")
}

#[tokio::test]
async fn test_setup_persists_and_registers() {
    let env = TestEnv::new();
    let portal = env.portal().await;

    let record = portal.setup_project(request()).await.unwrap();
    assert_eq!(record.tables.len(), 5);
    assert_eq!(record.tables[1], "HR_Table_metadata_version");
    assert!(env.data_dir.join("projectConfig.json").exists());

    let projects = portal.projects().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "HR");

    let again = portal.setup_project(request()).await.unwrap_err();
    assert!(matches!(again, PortalError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_setup_failure_shows_single_message() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    env.backend.set_fail_setup(true);

    let err = portal.setup_project(request()).await.unwrap_err();
    assert_eq!(err.to_string(), SETUP_FAILED_MESSAGE);
    assert!(!env.data_dir.join("projectConfig.json").exists());
}

#[tokio::test]
async fn test_setup_gate() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    let err = portal
        .setup_project(ProjectSetupRequest::new("HR", DatabaseType::MySQL, " "))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::InvalidInput(_)));
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    load_catalog(&portal).await;
    portal.setup_project(request()).await.unwrap();

    portal.reset_project().await.unwrap();
    assert!(portal.project_config().await.unwrap().is_none());
    assert!(portal.schemas().await.is_empty());
    assert!(portal.projects().await.is_empty());

    portal.setup_project(request()).await.unwrap();
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let env = TestEnv::new();
    {
        let portal = env.portal().await;
        portal.setup_project(request()).await.unwrap();
        portal.login("john.doe", "secret").await.unwrap();
        let settings = DisplaySettings {
            compact_view: true,
            page_size: 50,
            ..Default::default()
        };
        portal.save_display_settings(&settings).await.unwrap();
    }

    let portal = Portal::open(env.config()).await.unwrap();
    assert!(portal.is_authenticated().await.unwrap());
    assert_eq!(portal.current_user().await.unwrap(), "john.doe");
    assert_eq!(portal.display_settings().await.unwrap().page_size, 50);
    assert_eq!(portal.project_config().await.unwrap().unwrap().project_name, "HR");
    assert_eq!(portal.projects().await.len(), 1);

    portal.logout().await.unwrap();
    assert!(!env.data_dir.join("isAuthenticated.json").exists());
}

#[tokio::test]
async fn test_reopen_after_setup_with_demo_project_name() {
    let env = TestEnv::new();
    {
        let portal = env.portal().await;
        let request = ProjectSetupRequest::new("HR Analytics", DatabaseType::Oracle, "oracle://db/HR")
            .description("Set up by hand");
        portal.setup_project(request).await.unwrap();
    }

    let portal = Portal::open(env.config()).await.unwrap();
    seed_demo(&portal).await.unwrap();

    let projects = portal.projects().await;
    assert_eq!(projects.len(), 2);
    let hr = projects.iter().find(|p| p.name == "HR Analytics").unwrap();
    assert_eq!(hr.description, "Set up by hand");
    assert_eq!(portal.stats_for_project(hr.id).await.unwrap().recent_changes, 2);

    portal.reset_project().await.unwrap();
    assert!(portal.project_config().await.unwrap().is_none());
}
