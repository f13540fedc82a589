//! Remote command resynchronization: orphan removal, idempotence and
//! per-guild failure isolation.

mod common;

use common::database::setup_test_database;
use common::fixtures::create_test_tag;
use common::registry::MockRegistry;
use std::sync::Arc;
use tagbot::coordinator::TagCoordinator;
use tagbot::store::TagStore;

const GUILD_A: i64 = 100;
const GUILD_B: i64 = 200;

async fn setup() -> (TagCoordinator, Arc<MockRegistry>) {
    let db = setup_test_database().await.expect("test db");
    let registry = Arc::new(MockRegistry::new());
    let store = TagStore::new(db);
    (TagCoordinator::new(store, registry.clone()), registry)
}

#[tokio::test]
async fn test_resync_registers_live_and_removes_orphans() {
    let (coordinator, registry) = setup().await;

    create_test_tag(coordinator.store(), GUILD_A, "alpha").await.expect("create");
    create_test_tag(coordinator.store(), GUILD_A, "bravo").await.expect("create");
    create_test_tag(coordinator.store(), GUILD_B, "charlie").await.expect("create");
    // A stale command whose tag no longer exists.
    registry.seed_command(GUILD_A, "stale");

    let report = coordinator.sync_guild_commands().await.expect("resync");

    assert_eq!(report.guilds_synced, 2);
    assert_eq!(report.guilds_failed, 0);
    assert_eq!(report.commands_registered, 3);
    assert_eq!(report.commands_removed, 1);
    assert_eq!(registry.registered(GUILD_A), vec!["alpha", "bravo"]);
    assert_eq!(registry.registered(GUILD_B), vec!["charlie"]);
}

#[tokio::test]
async fn test_resync_is_idempotent() {
    let (coordinator, registry) = setup().await;

    create_test_tag(coordinator.store(), GUILD_A, "alpha").await.expect("create");
    create_test_tag(coordinator.store(), GUILD_B, "bravo").await.expect("create");
    registry.seed_command(GUILD_A, "stale");

    coordinator.sync_guild_commands().await.expect("first pass");
    let after_first_a = registry.registered(GUILD_A);
    let after_first_b = registry.registered(GUILD_B);

    let second = coordinator.sync_guild_commands().await.expect("second pass");

    assert_eq!(second.commands_removed, 0, "nothing left to remove");
    assert_eq!(registry.registered(GUILD_A), after_first_a);
    assert_eq!(registry.registered(GUILD_B), after_first_b);
}

#[tokio::test]
async fn test_resync_isolates_guild_failure() {
    let (coordinator, registry) = setup().await;

    create_test_tag(coordinator.store(), GUILD_A, "alpha").await.expect("create");
    create_test_tag(coordinator.store(), GUILD_B, "bravo").await.expect("create");
    registry.fail_guild(GUILD_A);

    let report = coordinator.sync_guild_commands().await.expect("resync");

    assert_eq!(report.guilds_failed, 1);
    assert_eq!(report.guilds_synced, 1);
    // The healthy guild still converged.
    assert_eq!(registry.registered(GUILD_B), vec!["bravo"]);
    assert!(registry.registered(GUILD_A).is_empty());
}

#[tokio::test]
async fn test_resync_skips_guildless_state() {
    let (coordinator, _registry) = setup().await;

    let report = coordinator.sync_guild_commands().await.expect("resync");
    assert_eq!(report.guilds_synced, 0);
    assert_eq!(report.commands_registered, 0);
}

#[tokio::test]
async fn test_resync_registers_stored_description() {
    let (coordinator, registry) = setup().await;

    coordinator
        .store()
        .create(GUILD_A, "greeting", None, None, "Hello!".to_string())
        .await
        .expect("create");
    // Knock the registry out of sync by hand, then converge.
    assert!(registry.registered(GUILD_A).is_empty());

    let report = coordinator.sync_guild_commands().await.expect("resync");
    assert_eq!(report.commands_registered, 1);
    assert_eq!(registry.registered(GUILD_A), vec!["greeting"]);
}
