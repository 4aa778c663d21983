//! Integration tests for derived project statistics and reports.

#[allow(dead_code)]
mod common;

use chrono::Duration;
use common::*;
use metaportal::changelog::{ChangeEntry, ChangeFilter, ChangeType};
use metaportal::error::PortalError;
use metaportal::lineage::RiskLevel;
use metaportal::project::Project;
use metaportal::reports::CoverageBand;
use metaportal::types::{now, ColumnRef};

#[tokio::test]
async fn test_stats_follow_the_stores() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    load_catalog(&portal).await;

    let project = portal
        .create_project(Project::new("Sales Insights", "").with_schema("SALES"))
        .await
        .unwrap();

    let stats = portal.stats_for_project(project.id).await.unwrap();
    assert_eq!(stats.total_tables, 3);
    assert_eq!(stats.total_columns, 6);
    assert_eq!(stats.lineage_mappings, 0);
    assert_eq!(stats.recent_changes, 0);

    portal
        .create_lineage(one_to_one(sales("customer_summary", "customer_id"), sales("customers", "id")))
        .await
        .unwrap();
    portal
        .create_lineage(system_field(ColumnRef::new("HR_SCHEMA", "employees", "salary")))
        .await
        .unwrap();
    portal
        .record_change(project.id, ChangeEntry::new("CHG-2024-001", "john.doe", ChangeType::Create))
        .await
        .unwrap();
    portal
        .record_change(
            project.id,
            ChangeEntry::new("CHG-2024-000", "john.doe", ChangeType::Delete).at(now() - Duration::days(8)),
        )
        .await
        .unwrap();

    let stats = portal.stats_for_project(project.id).await.unwrap();
    assert_eq!(stats.lineage_mappings, 1);
    assert_eq!(stats.recent_changes, 1);
}

#[tokio::test]
async fn test_unknown_project() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    assert!(matches!(
        portal.stats_for_project(42).await,
        Err(PortalError::ProjectNotFound(42))
    ));
    assert!(portal
        .record_change(42, ChangeEntry::new("CHG-2024-001", "a", ChangeType::Create))
        .await
        .is_err());
}

#[tokio::test]
async fn test_change_search() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    let project = portal.create_project(Project::new("HR", "")).await.unwrap();
    for (change_ref, user, change_type, column, description) in [
        ("CHG-2024-001", "john.doe", ChangeType::Create, "employee_id", "Added primary key column"),
        ("CHG-2024-002", "jane.smith", ChangeType::Alter, "first_name", "Increased length"),
    ] {
        portal
            .record_change(
                project.id,
                ChangeEntry::new(change_ref, user, change_type)
                    .on("employees", column)
                    .description(description),
            )
            .await
            .unwrap();
    }

    let all = portal.changes(project.id, &ChangeFilter::new()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].change_ref_number, "CHG-2024-002");

    let hits = portal
        .changes(project.id, &ChangeFilter::new().search("PRIMARY"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].user, "john.doe");

    let hits = portal
        .changes(project.id, &ChangeFilter::new().change_type(ChangeType::Alter).table("EMP"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn test_reports() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    load_catalog(&portal).await;
    portal
        .create_lineage(one_to_one(sales("customer_summary", "customer_id"), sales("customers", "id")))
        .await
        .unwrap();
    portal
        .create_lineage(one_to_one(sales("orders", "customer_id"), sales("customers", "id")))
        .await
        .unwrap();

    let coverage = portal.coverage_report().await;
    let summary = coverage
        .iter()
        .find(|c| c.table.table == "customer_summary")
        .unwrap();
    assert_eq!(summary.coverage, 100);
    assert_eq!(summary.band, CoverageBand::Good);
    let orders = coverage.iter().find(|c| c.table.table == "orders").unwrap();
    assert_eq!(orders.coverage, 33);
    assert_eq!(orders.band, CoverageBand::Poor);

    let impact = portal.impact_report().await;
    assert_eq!(impact.len(), 1);
    assert_eq!(impact[0].dependencies, 2);
    assert_eq!(impact[0].risk, RiskLevel::Low);
    assert_eq!(impact[0].impacted_tables.len(), 2);
}
