//! Integration tests for lineage creation and search.

#[allow(dead_code)]
mod common;

use common::*;
use metaportal::lineage::{LineageDraft, LineageFilter, MappingType, TransformationType};

#[tokio::test]
async fn test_create_prepends_with_sequential_refs() {
    let env = TestEnv::new();
    let portal = env.portal().await;

    for i in 0..3 {
        portal
            .create_lineage(one_to_one(sales("orders", &format!("c{}", i)), sales("customers", "id")))
            .await
            .unwrap();
    }

    let all = portal.lineage(&LineageFilter::new()).await;
    let refs: Vec<_> = all.iter().map(|m| m.change_ref_number.as_str()).collect();
    assert_eq!(refs, vec!["CHG-2024-003", "CHG-2024-002", "CHG-2024-001"]);
    let ids: Vec<_> = all.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_change_ref_search() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    portal
        .create_lineage(one_to_one(sales("customer_summary", "customer_id"), sales("customers", "id")))
        .await
        .unwrap();
    portal
        .create_lineage(system_field(sales("orders", "order_id")))
        .await
        .unwrap();

    let hits = portal.lineage(&LineageFilter::new().change_ref("002")).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].mapping_type(), MappingType::SystemField);

    let hits = portal.lineage(&LineageFilter::new().change_ref("chg-2024-001")).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target_table, "customer_summary");
}

#[tokio::test]
async fn test_form_switching_feeds_typed_sources() {
    let env = TestEnv::new();
    let portal = env.portal().await;

    let mut draft = LineageDraft::new()
        .with_target(sales("orders", "total"))
        .with_mapping_type(MappingType::ManyToOne)
        .with_source(sales("order_items", "price"), TransformationType::Direct)
        .with_source(sales("order_items", "quantity"), TransformationType::Conditional);
    draft.set_mapping_type(MappingType::OneToOne);

    let created = portal.create_lineage(draft).await.unwrap();
    assert_eq!(created.mapping_type(), MappingType::OneToOne);
    assert_eq!(created.source_columns().len(), 1);
    assert_eq!(created.source_columns()[0].column, "price");
}

#[tokio::test]
async fn test_offline_backend_rejects_without_numbering() {
    let env = TestEnv::new();
    let portal = env.portal().await;

    env.backend.set_offline(true);
    assert!(portal
        .create_lineage(one_to_one(sales("orders", "customer_id"), sales("customers", "id")))
        .await
        .is_err());

    env.backend.set_offline(false);
    let created = portal
        .create_lineage(one_to_one(sales("orders", "customer_id"), sales("customers", "id")))
        .await
        .unwrap();
    assert_eq!(created.change_ref_number, "CHG-2024-001");
}

#[tokio::test]
async fn test_update_and_delete() {
    let env = TestEnv::new();
    let portal = env.portal().await;
    let created = portal
        .create_lineage(one_to_one(sales("orders", "customer_id"), sales("customers", "id")))
        .await
        .unwrap();

    let updated = portal
        .update_lineage(created.id, system_field(sales("orders", "customer_id")))
        .await
        .unwrap();
    assert_eq!(updated.mapping_type(), MappingType::SystemField);
    assert!(updated.source_columns().is_empty());

    assert!(portal.delete_lineage(created.id).await.unwrap());
    assert!(portal.lineage(&LineageFilter::new()).await.is_empty());
}
