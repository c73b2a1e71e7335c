//! Tests for the cluster service: bootstrap, toggles, records and reports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use corelib::audit::Operation;
use corelib::config::DEFAULT_LOG_KEY;
use corelib::node::{default_nodes, NodeDescriptor, NodeId};
use corelib::store::{FileStore, KvStore, MemoryStore};
use corelib::{Cluster, ClusterConfig, Error, Result};
use serde_json::{json, Value};
use tempfile::TempDir;

async fn open(store: Arc<dyn KvStore>) -> Cluster {
    Cluster::open(store, ClusterConfig::default()).await.unwrap()
}

/// Memory store with switchable failures. Reads yield to the scheduler
/// first, so concurrent callers interleave at every read.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_log_writes: AtomicBool,
    fail_scans: AtomicBool,
}

#[async_trait::async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst)
            || (key == DEFAULT_LOG_KEY && self.fail_log_writes.load(Ordering::SeqCst))
        {
            return Err(Error::Store("write refused".into()));
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>> {
        tokio::task::yield_now().await;
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(Error::Store("scan refused".into()));
        }
        self.inner.get_by_prefix(prefix).await
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

#[tokio::test]
async fn test_bootstrap_installs_default_nodes() {
    let store = Arc::new(MemoryStore::new());
    let cluster = open(store.clone()).await;

    assert_eq!(cluster.nodes(), default_nodes());
    let stored = store.get("system:chord_nodes").await.unwrap().unwrap();
    let stored: Vec<NodeDescriptor> = serde_json::from_value(stored).unwrap();
    assert_eq!(stored, default_nodes());
}

#[tokio::test]
async fn test_bootstrap_loads_persisted_registry() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            "system:chord_nodes",
            json!([
                {"id": 2, "name": "Node-Beta", "active": false, "users": [], "message_count": 0},
                {"id": 1, "name": "Node-Alpha", "active": true, "users": ["alice"], "message_count": 3},
            ]),
        )
        .await
        .unwrap();

    let cluster = open(store).await;
    let nodes = cluster.nodes();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0], NodeDescriptor::with_state(NodeId(1), "Node-Alpha", true));
    assert_eq!(nodes[1], NodeDescriptor::with_state(NodeId(2), "Node-Beta", false));
}

#[tokio::test]
async fn test_bootstrap_replaces_unreadable_or_empty_registry() {
    for stored in [json!("garbage"), json!([])] {
        let store = Arc::new(MemoryStore::new());
        store.set("system:chord_nodes", stored).await.unwrap();
        let cluster = open(store).await;
        assert_eq!(cluster.nodes(), default_nodes());
    }
}

#[tokio::test]
async fn test_bootstrap_rejects_duplicate_ids() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            "system:chord_nodes",
            json!([
                {"id": 1, "name": "a", "active": true},
                {"id": 1, "name": "b", "active": true},
            ]),
        )
        .await
        .unwrap();

    let result = Cluster::open(store, ClusterConfig::default()).await;
    assert!(matches!(result, Err(Error::DuplicateNode(NodeId(1)))));
}

// ============================================================================
// Toggle
// ============================================================================

#[tokio::test]
async fn test_toggle_unknown_node() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    let result = cluster.toggle_node(NodeId(42)).await;
    assert!(matches!(result, Err(Error::NodeNotFound(NodeId(42)))));
    assert!(cluster.operation_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deactivation_persists_and_logs_failover() {
    let store = Arc::new(MemoryStore::new());
    let cluster = open(store.clone()).await;
    // u270 sits on node 3 (position 69); alice on node 5.
    cluster.register_user("u270", "User 270").await.unwrap();
    cluster.register_user("alice", "Alice").await.unwrap();

    let outcome = cluster.toggle_node(NodeId(3)).await.unwrap();
    assert!(outcome.previous);
    assert!(!outcome.node.active);

    // Next node clockwise from 69 is node 2 at 70.
    assert_eq!(cluster.find_owner("user:u270").map(|n| n.id), Some(NodeId(2)));

    let stored: Vec<NodeDescriptor> =
        serde_json::from_value(store.get("system:chord_nodes").await.unwrap().unwrap()).unwrap();
    assert!(!stored.iter().find(|n| n.id == NodeId(3)).unwrap().active);

    let log = cluster.operation_log().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].operation, Operation::NodeFailover);
    assert_eq!(log[0].details["deactivatedNode"], "Node-Gamma");
    assert_eq!(log[0].details["affectedUsers"], json!(["u270"]));
    assert_eq!(log[1].operation, Operation::NodeDeactivated);
    assert_eq!(log[1].details["nodeId"], 3);
    assert_eq!(log[1].details["nodeName"], "Node-Gamma");
    assert_eq!(log[1].details["previousStatus"], true);
    assert_eq!(log[1].details["newStatus"], false);
}

#[tokio::test]
async fn test_deactivating_idle_node_has_no_failover() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    cluster.register_user("alice", "Alice").await.unwrap();

    cluster.toggle_node(NodeId(1)).await.unwrap();
    let log = cluster.operation_log().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].operation, Operation::NodeDeactivated);
}

#[tokio::test]
async fn test_double_toggle_restores_ownership() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    let keys = ["user:u270", "user:u151", "user:alice", "user:u152"];
    let before: Vec<_> = keys.iter().map(|k| cluster.replicas_for(k, 3)).collect();

    cluster.toggle_node(NodeId(5)).await.unwrap();
    assert_ne!(cluster.find_owner("user:alice").map(|n| n.id), Some(NodeId(5)));
    cluster.toggle_node(NodeId(5)).await.unwrap();

    let after: Vec<_> = keys.iter().map(|k| cluster.replicas_for(k, 3)).collect();
    assert_eq!(before, after);
    assert_eq!(cluster.operation_log().await.unwrap()[0].operation, Operation::NodeActivated);
}

#[tokio::test]
async fn test_failed_persist_rolls_back_toggle() {
    let store = Arc::new(FlakyStore::default());
    let cluster = open(store.clone()).await;

    store.fail_writes.store(true, Ordering::SeqCst);
    assert!(matches!(cluster.toggle_node(NodeId(1)).await, Err(Error::Store(_))));
    assert_eq!(cluster.nodes(), default_nodes());
}

#[tokio::test]
async fn test_failed_flush_does_not_resurface_rolled_back_toggle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    {
        let cluster = open(Arc::new(FileStore::open(&path).await.unwrap())).await;

        let blocker = path.with_extension("tmp");
        std::fs::create_dir(&blocker).unwrap();
        assert!(cluster.toggle_node(NodeId(1)).await.is_err());
        assert_eq!(cluster.nodes(), default_nodes());

        // The next successful write rewrites the whole file.
        std::fs::remove_dir(&blocker).unwrap();
        cluster.register_user("alice", "Alice").await.unwrap();
    }

    let cluster = open(Arc::new(FileStore::open(&path).await.unwrap())).await;
    assert_eq!(cluster.nodes(), default_nodes());
    assert!(cluster.operation_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_user_scan_leaves_node_untouched() {
    let store = Arc::new(FlakyStore::default());
    let cluster = open(store.clone()).await;

    store.fail_scans.store(true, Ordering::SeqCst);
    assert!(matches!(cluster.toggle_node(NodeId(3)).await, Err(Error::Store(_))));
    assert_eq!(cluster.registry().get(NodeId(3)).map(|n| n.active), Some(true));

    let stored: Vec<NodeDescriptor> =
        serde_json::from_value(store.get("system:chord_nodes").await.unwrap().unwrap()).unwrap();
    assert_eq!(stored, default_nodes());
    assert!(cluster.operation_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_succeeds_when_log_write_fails() {
    let store = Arc::new(FlakyStore::default());
    let cluster = open(store.clone()).await;
    cluster.register_user("u270", "User 270").await.unwrap();

    store.fail_log_writes.store(true, Ordering::SeqCst);
    let outcome = cluster.toggle_node(NodeId(3)).await.unwrap();
    assert!(!outcome.node.active);

    let stored: Vec<NodeDescriptor> =
        serde_json::from_value(store.get("system:chord_nodes").await.unwrap().unwrap()).unwrap();
    assert_eq!(stored.iter().find(|n| n.id == NodeId(3)).map(|n| n.active), Some(false));
    assert_eq!(cluster.find_owner("user:u270").map(|n| n.id), Some(NodeId(2)));
    assert!(cluster.operation_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_waits_for_inflight_toggle() {
    let store = Arc::new(FlakyStore::default());
    let cluster = open(store).await;
    for _ in 0..3 {
        cluster.toggle_node(NodeId(1)).await.unwrap();
    }
    assert_eq!(cluster.operation_log().await.unwrap().len(), 3);

    // The toggle yields while reading the log; the clear must not land there.
    let (toggled, cleared) = tokio::join!(cluster.toggle_node(NodeId(1)), cluster.clear_operation_log());
    toggled.unwrap();
    cleared.unwrap();
    assert!(cluster.operation_log().await.unwrap().len() <= 1);
}

#[tokio::test]
async fn test_concurrent_signups_for_same_name() {
    let cluster = open(Arc::new(FlakyStore::default())).await;

    let (a, b) = tokio::join!(
        cluster.register_user("alice", "Alice"),
        cluster.register_user("alice", "Other Alice")
    );
    assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
    assert!(matches!(a.and(b), Err(Error::UserExists(_))));
    assert_eq!(cluster.users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_toggles_are_serialized() {
    let cluster = Arc::new(open(Arc::new(MemoryStore::new())).await);

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let cluster = Arc::clone(&cluster);
            tokio::spawn(async move { cluster.toggle_node(NodeId(1)).await.unwrap() })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(cluster.nodes(), default_nodes());
    let log = cluster.operation_log().await.unwrap();
    assert_eq!(log.len(), 10);
    // Entries alternate because each toggle sees the previous one's result.
    for pair in log.windows(2) {
        assert_ne!(pair[0].operation, pair[1].operation);
    }
}

// ============================================================================
// Records and reports
// ============================================================================

#[tokio::test]
async fn test_register_user_is_unique() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    cluster.register_user("alice", "Alice").await.unwrap();
    let again = cluster.register_user("alice", "Other Alice").await;
    assert!(matches!(again, Err(Error::UserExists(name)) if name == "alice"));
    assert_eq!(cluster.users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_message_routes_to_recipient_owner() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    let routed = cluster.send_message("alice", "u270", "hello").await.unwrap();

    assert_eq!(routed.route.map(|n| n.id), Some(NodeId(3)));
    assert_eq!(cluster.messages().await.unwrap(), vec![routed.message]);
}

#[tokio::test]
async fn test_node_report() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    for name in ["u270", "u151", "alice"] {
        cluster.register_user(name, name).await.unwrap();
    }
    cluster.send_message("u270", "alice", "one").await.unwrap();
    cluster.send_message("u270", "u151", "two").await.unwrap();

    let report = cluster.node_report().await.unwrap();
    let node3 = report.load(NodeId(3)).unwrap();
    assert_eq!(node3.assigned_users, vec!["u270"]);
    assert_eq!(node3.message_count, 2);
    assert_eq!(report.assigned_count(), 3);

    cluster.toggle_node(NodeId(3)).await.unwrap();
    let report = cluster.node_report().await.unwrap();
    assert!(report.load(NodeId(3)).unwrap().assigned_users.is_empty());
    assert_eq!(report.load(NodeId(2)).unwrap().assigned_users, vec!["u270"]);
    assert_eq!(report.load(NodeId(2)).unwrap().message_count, 2);
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = Arc::new(FileStore::open(&path).await.unwrap());
        let cluster = open(store).await;
        cluster.toggle_node(NodeId(4)).await.unwrap();
        cluster.register_user("alice", "Alice").await.unwrap();
    }

    let store = Arc::new(FileStore::open(&path).await.unwrap());
    let cluster = open(store).await;
    assert_eq!(cluster.registry().get(NodeId(4)).map(|n| n.active), Some(false));
    assert_eq!(cluster.registry().active_count(), 4);
    assert_eq!(cluster.users().await.unwrap()[0].username, "alice");
    assert_eq!(cluster.operation_log().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_operation_log() {
    let cluster = open(Arc::new(MemoryStore::new())).await;
    cluster.toggle_node(NodeId(1)).await.unwrap();
    cluster.clear_operation_log().await.unwrap();
    assert!(cluster.operation_log().await.unwrap().is_empty());
}
