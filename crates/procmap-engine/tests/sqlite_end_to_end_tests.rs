// End-to-end repository tests against the SQLite collaborator
// Covers insert/query/update/delete, returned ids, batch inserts and typed
// columns (uuid, timestamps, JSON)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use procmap_core::descriptor::RecordDescriptor;
use procmap_core::errors::MapError;
use procmap_core::shape::NoOutput;
use procmap_engine::{BatchFailurePolicy, Repository, RepositoryConfig};
use procmap_store::{ProcedureCatalog, SqliteConnection};
use tempfile::TempDir;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reference TEXT NOT NULL UNIQUE,
    customer TEXT NOT NULL,
    total REAL NOT NULL,
    placed_at TEXT NOT NULL,
    metadata TEXT
);";

fn catalog() -> ProcedureCatalog {
    ProcedureCatalog::new()
        .define(
            "place_order",
            "INSERT INTO orders (reference, customer, total, placed_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
        )
        .define(
            "orders_for_customer",
            "SELECT id, reference, total, placed_at, metadata FROM orders
             WHERE customer = ?1 ORDER BY id",
        )
        .define("retotal_order", "UPDATE orders SET total = ?2 WHERE id = ?1")
        .define("cancel_order", "DELETE FROM orders WHERE id = ?1")
}

procmap_core::record_shape! {
    #[derive(Debug, Clone)]
    pub struct PlaceOrder {
        #[order = "1"]
        pub reference: Uuid,
        #[order = "2"]
        pub customer: String,
        #[order = "3"]
        pub total: f64,
        #[order = "4"]
        pub placed_at: DateTime<Utc>,
        #[order = "5"]
        pub metadata: Option<serde_json::Value>,
    }
}

impl RecordDescriptor for PlaceOrder {
    type Output = NoOutput;

    fn input_shape_name(&self) -> &str {
        "PlaceOrder"
    }

    fn procedure_name(&self) -> &str {
        "place_order"
    }

    fn output_shape_name(&self) -> &str {
        "NoOutput"
    }

    fn new_empty_output(&self) -> NoOutput {
        NoOutput
    }
}

procmap_core::record_shape! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct OrderRow {
        #[order = "1"]
        pub id: i64,
        #[order = "2"]
        pub reference: String,
        #[order = "3"]
        pub total: f64,
        #[order = "4"]
        pub placed_at: String,
        #[order = "5"]
        pub metadata: Option<serde_json::Value>,
    }
}

procmap_core::record_shape! {
    #[derive(Debug, Clone)]
    pub struct OrdersForCustomer {
        #[order = "1"]
        pub customer: String,
    }
}

impl RecordDescriptor for OrdersForCustomer {
    type Output = OrderRow;

    fn input_shape_name(&self) -> &str {
        "OrdersForCustomer"
    }

    fn procedure_name(&self) -> &str {
        "orders_for_customer"
    }

    fn output_shape_name(&self) -> &str {
        "OrderRow"
    }

    fn new_empty_output(&self) -> OrderRow {
        OrderRow::default()
    }
}

procmap_core::record_shape! {
    #[derive(Debug, Clone)]
    pub struct RetotalOrder {
        #[order = "2"]
        pub total: f64,
        #[order = "1"]
        pub id: i64,
    }
}

impl RecordDescriptor for RetotalOrder {
    type Output = NoOutput;

    fn input_shape_name(&self) -> &str {
        "RetotalOrder"
    }

    fn procedure_name(&self) -> &str {
        "retotal_order"
    }

    fn output_shape_name(&self) -> &str {
        "NoOutput"
    }

    fn new_empty_output(&self) -> NoOutput {
        NoOutput
    }
}

procmap_core::record_shape! {
    #[derive(Debug, Clone)]
    pub struct CancelOrder {
        #[order = "1"]
        pub id: i64,
    }
}

impl RecordDescriptor for CancelOrder {
    type Output = NoOutput;

    fn input_shape_name(&self) -> &str {
        "CancelOrder"
    }

    fn procedure_name(&self) -> &str {
        "cancel_order"
    }

    fn output_shape_name(&self) -> &str {
        "NoOutput"
    }

    fn new_empty_output(&self) -> NoOutput {
        NoOutput
    }
}

// Helper to create a repository over an in-memory database
fn setup() -> Repository<SqliteConnection> {
    let conn = SqliteConnection::open_in_memory()
        .expect("Failed to open in-memory database")
        .with_catalog(catalog());
    conn.execute_batch(SCHEMA).expect("Failed to create schema");
    Repository::new(conn)
}

fn order(customer: &str, total: f64) -> PlaceOrder {
    PlaceOrder {
        reference: Uuid::new_v4(),
        customer: customer.to_string(),
        total,
        placed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        metadata: None,
    }
}

fn orders_of(repo: &Repository<SqliteConnection>, customer: &str) -> Vec<OrderRow> {
    repo.query(&OrdersForCustomer {
        customer: customer.to_string(),
    })
    .unwrap()
}

#[test]
fn test_insert_and_return_id_then_query() {
    // Given: A repository over an empty orders table
    let repo = setup();
    let mut placed = order("acme", 12.5);
    placed.metadata = Some(serde_json::json!({"channel": "web"}));

    // When: We place an order and read back its id
    let id = repo.insert_and_return_id(&placed).unwrap();

    // Then: The id is the new row's and the row reads back through the query
    assert_eq!(id, 1);
    let rows = orders_of(&repo, "acme");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].reference, placed.reference.to_string());
    assert_eq!(rows[0].total, 12.5);
    assert_eq!(rows[0].placed_at, "2024-03-01T12:00:00+00:00");
    assert_eq!(rows[0].metadata, Some(serde_json::json!({"channel": "web"})));
}

#[test]
fn test_query_for_unknown_customer_is_empty() {
    let repo = setup();
    repo.insert(&order("acme", 1.0)).unwrap();
    assert!(orders_of(&repo, "nobody").is_empty());
}

#[test]
fn test_update_binds_by_marker_not_declaration() {
    // Given: An existing order
    let repo = setup();
    let id = repo.insert_and_return_id(&order("acme", 10.0)).unwrap();

    // When: We update with a record declaring total before id
    repo.update(&RetotalOrder { total: 99.0, id }).unwrap();

    // Then: The total changed on the right row
    assert_eq!(orders_of(&repo, "acme")[0].total, 99.0);
}

#[test]
fn test_delete_removes_row() {
    let repo = setup();
    let id = repo.insert_and_return_id(&order("acme", 10.0)).unwrap();
    repo.delete(&CancelOrder { id }).unwrap();
    assert!(orders_of(&repo, "acme").is_empty());
}

#[test]
fn test_driver_error_is_execution_error() {
    // Given: An order already placed
    let repo = setup();
    let placed = order("acme", 10.0);
    repo.insert(&placed).unwrap();

    // When: The same reference is placed again
    let err = repo.insert(&placed).unwrap_err();

    // Then: The unique constraint failure surfaces as an execution error
    assert!(matches!(err, MapError::Execution { .. }));
}

#[test]
fn test_batch_insert_commits_rows_around_a_failure() {
    // Given: A batch whose middle order duplicates an existing reference
    let repo = setup();
    let existing = order("acme", 1.0);
    repo.insert(&existing).unwrap();

    let mut duplicate = order("acme", 2.0);
    duplicate.reference = existing.reference;
    let batch = vec![order("acme", 3.0), duplicate, order("acme", 4.0)];

    // When: We batch insert
    let outcome = repo.batch_insert_with_outcome(&batch).unwrap();

    // Then: The good rows were committed and the failure recorded
    assert!(outcome.committed);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failures[0].index, 1);
    let totals: Vec<f64> = orders_of(&repo, "acme").iter().map(|r| r.total).collect();
    assert_eq!(totals, vec![1.0, 3.0, 4.0]);
}

#[test]
fn test_batch_insert_rollback_policy_leaves_table_untouched() {
    let conn = SqliteConnection::open_in_memory()
        .unwrap()
        .with_catalog(catalog());
    conn.execute_batch(SCHEMA).unwrap();
    let repo = Repository::with_config(
        conn,
        RepositoryConfig::from_toml_str("batch_failure_policy = \"rollback_on_failure\"").unwrap(),
    );
    assert_eq!(
        repo.config().batch_failure_policy,
        BatchFailurePolicy::RollbackOnFailure
    );

    let first = order("acme", 1.0);
    let mut second = order("acme", 2.0);
    second.reference = first.reference;

    assert!(repo.batch_insert(&[first, second]).is_err());
    assert!(orders_of(&repo, "acme").is_empty());
}

#[test]
fn test_repository_over_on_disk_database() {
    // Given: A database file in a scratch directory
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("orders.db");

    {
        let conn = SqliteConnection::open(&path).unwrap().with_catalog(catalog());
        conn.execute_batch(SCHEMA).unwrap();
        let repo = Repository::new(conn);
        repo.batch_insert(&[order("acme", 1.0), order("acme", 2.0)])
            .unwrap();
    }

    // When: A fresh repository opens the same file
    let repo = Repository::new(SqliteConnection::open(&path).unwrap().with_catalog(catalog()));

    // Then: The batch is there
    assert_eq!(orders_of(&repo, "acme").len(), 2);
}

#[test]
fn test_truncate_between_cases() {
    let repo = setup();
    repo.insert(&order("acme", 1.0)).unwrap();
    repo.connection().truncate("orders").unwrap();
    assert!(orders_of(&repo, "acme").is_empty());
    assert_eq!(repo.insert_and_return_id(&order("acme", 1.0)).unwrap(), 1);
}
