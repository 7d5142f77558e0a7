//! NSG create/update/get/list/delete against the in-memory provider.

mod common;

use azure_nsg_manager::models::NetworkSecurityGroup;
use azure_nsg_manager::{ErrorCode, Nsg, NsgManager, ProviderError};
use common::{cloud_error, concurrent_error, manager, FakeNetworkClient, Write, RESOURCE_GROUP};
use std::collections::HashSet;

#[tokio::test]
async fn test_get_missing_nsg_is_none() {
    let manager = manager(FakeNetworkClient::new());
    assert!(manager.get_nsg("eastus").await.is_none());
}

#[tokio::test]
async fn test_get_provider_failure_is_none() {
    let client = FakeNetworkClient::new().with_nsg("eastus", "eastus");
    client.fail_reads(cloud_error("InternalServerError"));
    let manager = manager(client);
    assert!(manager.get_nsg("eastus").await.is_none());
}

#[tokio::test]
async fn test_create_writes_owner_tag() {
    let manager = NsgManager::new(FakeNetworkClient::new(), RESOURCE_GROUP)
        .with_owner(Some("fuzz-team".to_string()));
    manager
        .create_nsg("eastus", "eastus")
        .await
        .expect("Error creating nsg");

    let writes = manager.client().writes();
    assert_eq!(writes.len(), 1);
    let Write::Nsg(nsg) = &writes[0] else {
        panic!("Expected an nsg write, got {:?}", writes[0]);
    };
    assert_eq!(nsg.location, "eastus");
    assert_eq!(
        nsg.tags.as_ref().and_then(|t| t.get("OWNER")).map(String::as_str),
        Some("fuzz-team")
    );
}

#[tokio::test]
async fn test_create_without_owner_has_no_tags() {
    let manager = manager(FakeNetworkClient::new());
    manager
        .create_nsg("westus2", "westus2")
        .await
        .expect("Error creating nsg");
    let stored = manager
        .client()
        .stored_nsg("westus2")
        .expect("Nsg should be stored");
    assert_eq!(stored.tags, None);
}

#[tokio::test]
async fn test_handle_create_is_idempotent() {
    let manager = manager(FakeNetworkClient::new());
    let nsg = Nsg::for_region("eastus").expect("Error creating handle");

    nsg.create(&manager).await.expect("Error creating nsg");
    nsg.create(&manager).await.expect("Error creating nsg");

    assert_eq!(manager.client().writes().len(), 1, "second create should not write");
    assert!(nsg.get(&manager).await.is_some());
}

#[tokio::test]
async fn test_create_concurrent_conflict_is_success() {
    let client = FakeNetworkClient::new();
    client.fail_next_write(concurrent_error());
    let manager = manager(client);
    assert_eq!(manager.create_nsg("eastus", "eastus").await, Ok(()));
}

#[tokio::test]
async fn test_create_failure_is_unable_to_create() {
    let client = FakeNetworkClient::new();
    client.fail_next_write(cloud_error("QuotaExceeded"));
    let manager = manager(client);
    let err = manager
        .create_nsg("eastus", "eastus")
        .await
        .expect_err("Expected create to fail");
    assert_eq!(err.code, ErrorCode::UnableToCreate);
    assert_eq!(
        err.errors,
        vec!["Unable to create nsg eastus due to QuotaExceeded"]
    );
}

#[tokio::test]
async fn test_update_concurrent_conflict_is_success() {
    let client = FakeNetworkClient::new().with_nsg("eastus", "eastus");
    client.fail_next_write(concurrent_error());
    let manager = manager(client);
    let nsg = manager.get_nsg("eastus").await.expect("Nsg should exist");
    assert_eq!(manager.update_nsg(&nsg).await, Ok(()));
}

#[tokio::test]
async fn test_update_failure_names_nsg() {
    let client = FakeNetworkClient::new();
    client.fail_next_write(cloud_error("AuthorizationFailed"));
    let manager = manager(client);
    let err = manager
        .update_nsg(&NetworkSecurityGroup::new("eastus", "eastus"))
        .await
        .expect_err("Expected update to fail");
    assert_eq!(err.code, ErrorCode::UnableToCreate);
    assert_eq!(
        err.errors,
        vec!["Unable to update nsg eastus due to AuthorizationFailed"]
    );
}

#[tokio::test]
async fn test_list_returns_everything() {
    let client = FakeNetworkClient::new()
        .with_nsg("eastus", "eastus")
        .with_nsg("debug", "westus2");
    let manager = manager(client);
    let names: Vec<String> = manager
        .list_nsgs()
        .await
        .expect("Error listing nsgs")
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["debug", "eastus"]);
}

#[tokio::test]
async fn test_list_failure_is_error() {
    let client = FakeNetworkClient::new();
    client.fail_reads(cloud_error("AuthorizationFailed"));
    let err = manager(client)
        .list_nsgs()
        .await
        .expect_err("Expected list to fail");
    assert_eq!(err.code, ErrorCode::UnableToFind);
}

#[tokio::test]
async fn test_start_delete() {
    let manager = manager(FakeNetworkClient::new().with_nsg("eastus", "eastus"));
    assert!(manager.start_delete_nsg("eastus").await);
    assert!(manager.client().stored_nsg("eastus").is_none());
}

#[tokio::test]
async fn test_start_delete_missing_is_true() {
    let manager = manager(FakeNetworkClient::new());
    assert!(manager.start_delete_nsg("eastus").await);
}

#[tokio::test]
async fn test_start_delete_in_use_is_false() {
    let client = FakeNetworkClient::new().with_nsg("eastus", "eastus");
    client.fail_next_write(cloud_error(
        "(InUseNetworkSecurityGroupCannotBeDeleted) Network security group eastus cannot be deleted because it is in use by the following resources: node-0001-nic",
    ));
    let manager = manager(client);
    assert!(!manager.start_delete_nsg("eastus").await);
    assert!(manager.client().stored_nsg("eastus").is_some());
}

#[tokio::test]
async fn test_start_delete_other_failure_is_false() {
    let client = FakeNetworkClient::new().with_nsg("eastus", "eastus");
    client.fail_next_write(cloud_error("AuthorizationFailed"));
    assert!(!manager(client).start_delete_nsg("eastus").await);
}

#[tokio::test]
async fn test_start_delete_not_found_error_is_true() {
    let client = FakeNetworkClient::new().with_nsg("eastus", "eastus");
    client.fail_next_write(ProviderError::NotFound("eastus".to_string()));
    assert!(manager(client).start_delete_nsg("eastus").await);
}

#[tokio::test]
async fn test_reap_deletes_only_inactive_platform_nsgs() {
    let client = FakeNetworkClient::new()
        .with_nsg("eastus", "eastus")
        .with_nsg("westus2", "westus2")
        .with_nsg("debug", "centralus");
    let manager = manager(client);
    let active: HashSet<String> = ["westus2".to_string()].into_iter().collect();

    let deleted = manager.reap(&active).await.expect("Error reaping");

    assert_eq!(deleted, vec!["eastus"]);
    assert!(manager.client().stored_nsg("eastus").is_none());
    assert!(manager.client().stored_nsg("westus2").is_some());
    assert!(manager.client().stored_nsg("debug").is_some());
}

#[tokio::test]
async fn test_reap_skips_nsgs_still_in_use() {
    let client = FakeNetworkClient::new().with_nsg("eastus", "eastus");
    client.fail_next_write(cloud_error(
        "cannot be deleted because it is in use by the following resources",
    ));
    let manager = manager(client);
    let deleted = manager.reap(&HashSet::new()).await.expect("Error reaping");
    assert!(deleted.is_empty());
}
