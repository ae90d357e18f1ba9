//! End-to-end acceptance tests for the grant registry.
//!
//! Walks the full lifecycle one caller would see: inserting, querying by
//! every supported pattern, and deleting with and without timelocks.

use anyhow::Result;

use grant_registry::{GrantQuery, Registry, RegistryConfig, RegistryError, WILDCARD_DATA_ID};
use grant_registry_core::{Grant, Identity, Keypair};
use grant_registry_store::SqliteStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn principals() -> (Identity, Identity, Identity, Identity, Identity) {
    (
        Keypair::from_seed(&[0x01; 32]).identity(), // caller
        Keypair::from_seed(&[0x02; 32]).identity(), // bob
        Keypair::from_seed(&[0x03; 32]).identity(), // charlie
        Keypair::from_seed(&[0x04; 32]).identity(), // dave
        Keypair::from_seed(&[0x05; 32]).identity(), // eve
    )
}

fn contains(grants: &[Grant], owner: Identity, grantee: Identity, data_id: &str, lock: u64) -> bool {
    grants
        .iter()
        .any(|g| g.owner == owner && g.grantee == grantee && g.data_id == data_id && g.locked_until == lock)
}

#[tokio::test]
async fn test_insert_query_delete_lifecycle() -> Result<()> {
    init_tracing();
    let registry = Registry::in_memory();
    let (caller, bob, charlie, _, _) = principals();

    // Nothing there yet.
    assert!(registry.grants_for(&bob, "A1").await?.is_empty());

    registry.insert_grant(&caller, &bob, "A1", None).await?;

    // Exact duplicate is rejected and changes nothing.
    let err = registry.insert_grant(&caller, &bob, "A1", None).await.unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateGrant(_)));
    assert_eq!(registry.grant_count().await?, 1);

    registry.insert_grant(&caller, &bob, "A2", None).await?;
    registry.insert_grant(&caller, &charlie, "A2", None).await?;

    // Owner only: everything the caller created.
    let grants = registry.find_grants(&GrantQuery::new().owner(caller)).await?;
    assert_eq!(grants.len(), 3);
    assert!(contains(&grants, caller, bob, "A1", 0));
    assert!(contains(&grants, caller, bob, "A2", 0));
    assert!(contains(&grants, caller, charlie, "A2", 0));

    // Grantee only.
    let grants = registry.find_grants(&GrantQuery::new().grantee(bob)).await?;
    assert_eq!(grants.len(), 2);

    // Owner + grantee.
    let grants = registry
        .find_grants(&GrantQuery::new().owner(caller).grantee(bob))
        .await?;
    assert_eq!(grants.len(), 2);

    // Owner + data id.
    let grants = registry
        .find_grants(&GrantQuery::new().owner(caller).data_id("A2"))
        .await?;
    assert_eq!(grants.len(), 2);
    assert!(contains(&grants, caller, bob, "A2", 0));
    assert!(contains(&grants, caller, charlie, "A2", 0));

    // Grantee + data id, fully constrained triple, and the convenience form.
    let grants = registry
        .find_grants(&GrantQuery::new().grantee(bob).data_id("A1"))
        .await?;
    assert_eq!(grants.len(), 1);
    let grants = registry
        .find_grants(&GrantQuery::new().owner(caller).grantee(bob).data_id("A1"))
        .await?;
    assert_eq!(grants.len(), 1);
    assert_eq!(registry.grants_for(&bob, "A1").await?, grants);

    // No match is an empty result, not an error.
    assert!(registry.grants_for(&charlie, "A1").await?.is_empty());

    // Wildcard data id matches any.
    let grants = registry
        .find_grants(&GrantQuery::new().grantee(bob).data_id(WILDCARD_DATA_ID))
        .await?;
    assert_eq!(grants.len(), 2);

    // Data-id-only is an unsupported pattern.
    let err = registry
        .find_grants(&GrantQuery::new().data_id("A2"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidQuery));

    // Delete bob's A1 grant and verify it is gone from every view.
    let removed = registry.delete_grant(&caller, &bob, "A1", None, 1).await?;
    assert_eq!(removed, 1);
    assert!(registry.grants_for(&bob, "A1").await?.is_empty());
    let grants = registry.find_grants(&GrantQuery::new().owner(caller)).await?;
    assert_eq!(grants.len(), 2);
    registry.verify_invariants().await?;

    Ok(())
}

#[tokio::test]
async fn test_timelock_gates_deletion_not_visibility() -> Result<()> {
    init_tracing();
    let registry = Registry::in_memory();
    let (caller, _, _, dave, _) = principals();

    let now = 1_000_000;
    let in_the_future = now + 3_600;

    registry
        .insert_grant(&caller, &dave, "A2", Some(in_the_future))
        .await?;

    // Deletion is blocked while locked.
    let err = registry
        .delete_grant(&caller, &dave, "A2", None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::TimelockActive { .. }));

    // But the locked grant is fully visible.
    let grants = registry.grants_for(&dave, "A2").await?;
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].locked_until, in_the_future);

    // Once the lock is strictly in the past, deletion succeeds.
    let removed = registry
        .delete_grant(&caller, &dave, "A2", None, in_the_future + 1)
        .await?;
    assert_eq!(removed, 1);
    assert!(registry.grants_for(&dave, "A2").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_lock_value_filtered_delete() -> Result<()> {
    init_tracing();
    let registry = Registry::in_memory();
    let (caller, _, _, _, eve) = principals();

    let now = 1_000_000;
    let past = now - 3_600;
    let paster = now - 2 * 3_600;
    let pastest = now - 3 * 3_600;

    for lock in [past, paster, pastest] {
        registry.insert_grant(&caller, &eve, "A3", Some(lock)).await?;
    }

    // Filtering on one lock value removes exactly that grant.
    let removed = registry
        .delete_grant(&caller, &eve, "A3", Some(past), now)
        .await?;
    assert_eq!(removed, 1);

    let grants = registry.grants_for(&eve, "A3").await?;
    assert_eq!(grants.len(), 2);
    assert!(grants.iter().all(|g| g.locked_until != past));

    // A filter of 0 means "no filter" and removes the rest.
    let removed = registry
        .delete_grant(&caller, &eve, "A3", Some(0), now)
        .await?;
    assert_eq!(removed, 2);
    assert!(registry.grants_for(&eve, "A3").await?.is_empty());

    registry.verify_invariants().await?;
    Ok(())
}

#[tokio::test]
async fn test_bulk_delete_aborts_on_one_locked_grant() -> Result<()> {
    init_tracing();
    let registry = Registry::in_memory();
    let (caller, bob, _, _, _) = principals();

    let now = 1_000_000;
    registry.insert_grant(&caller, &bob, "A1", None).await?;
    registry
        .insert_grant(&caller, &bob, "A1", Some(now - 10))
        .await?;
    registry
        .insert_grant(&caller, &bob, "A1", Some(now + 10))
        .await?;

    let err = registry
        .delete_grant(&caller, &bob, "A1", None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::TimelockActive { .. }));

    // Nothing was removed, including the unlocked candidates.
    assert_eq!(registry.grants_for(&bob, "A1").await?.len(), 3);
    registry.verify_invariants().await?;

    Ok(())
}

#[tokio::test]
async fn test_registry_survives_reopen_on_sqlite() -> Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("registry.db");
    let (caller, bob, charlie, _, _) = principals();

    {
        let store = SqliteStore::open(&path)?;
        let registry = Registry::open(store, RegistryConfig::default()).await?;
        registry.insert_grant(&caller, &bob, "A1", None).await?;
        registry.insert_grant(&caller, &bob, "A2", Some(42)).await?;
        registry.insert_grant(&caller, &charlie, "A1", None).await?;
    }

    // Reopen: indexes are rebuilt from the scan and queries see everything.
    let store = SqliteStore::open(&path)?;
    let registry = Registry::open(store, RegistryConfig::default()).await?;
    registry.verify_invariants().await?;

    let grants = registry.find_grants(&GrantQuery::new().owner(caller)).await?;
    assert_eq!(grants.len(), 3);
    assert!(contains(&grants, caller, bob, "A2", 42));

    // Duplicate detection still holds across the restart.
    let err = registry
        .insert_grant(&caller, &bob, "A2", Some(42))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateGrant(_)));

    let removed = registry.delete_grant(&caller, &bob, "A1", None, 1).await?;
    assert_eq!(removed, 1);
    registry.verify_invariants().await?;

    Ok(())
}
