use super::{TableRepository, WriteBatch, WriteOp};
use crate::{
    db::{
        query::{QueryStrategy, TableQuery},
        store::{MemoryStore, Segment, StoreCursor, StoreError, TableStore},
    },
    error::{Error, ErrorClass},
    key::EntityKey,
    obs::sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all},
    test_support::{Person, seeded_store},
};
use std::{
    cell::Cell,
    sync::atomic::{AtomicU64, Ordering},
};

const TABLE: &str = "people";

type Repo<'a> = TableRepository<Person, &'a MemoryStore<Person>>;

fn repo(store: &MemoryStore<Person>) -> Repo<'_> {
    TableRepository::new(store, TABLE)
}

///
/// ProbeStore
/// Counts round-trips and can be told to fail.
///

struct ProbeStore {
    inner: MemoryStore<Person>,
    calls: Cell<u32>,
    fault: Option<StoreError>,
}

impl ProbeStore {
    fn new(inner: MemoryStore<Person>) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            fault: None,
        }
    }

    fn failing(fault: StoreError) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new(seeded_store(TABLE, &[]))
        }
    }
}

impl TableStore<Person> for ProbeStore {
    fn max_segment_size(&self) -> u32 {
        self.inner.max_segment_size()
    }

    fn execute_segment(
        &self,
        table: &str,
        query: &TableQuery<Person>,
        cursor: Option<&StoreCursor>,
    ) -> Result<Segment<Person>, StoreError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        self.inner.execute_segment(table, query, cursor)
    }
}

#[test]
fn preconditions_fail_before_contacting_store() {
    let repo = TableRepository::new(ProbeStore::new(seeded_store(TABLE, &[("p", 3)])), TABLE);

    let cases: Vec<(&str, Error)> = vec![
        (
            "partition_key",
            repo.exact_lookup_first_or_default(" ", "r")
                .expect_err("blank partition key should fail"),
        ),
        (
            "row_key",
            repo.exact_lookup_first_or_default("p", "")
                .expect_err("blank row key should fail"),
        ),
        (
            "partition_key",
            repo.list_by_partition_key("", None, None)
                .expect_err("blank partition key should fail"),
        ),
        (
            "page_size",
            repo.list_by_partition_key("p", Some(0), None)
                .expect_err("zero page size should fail"),
        ),
        (
            "page_size",
            repo.list_all(Some(0), None)
                .expect_err("zero page size should fail"),
        ),
        (
            "page_size",
            repo.find(&QueryStrategy::full_scan(), Some(0))
                .err()
                .expect("zero page size should fail"),
        ),
        (
            "partition_key",
            repo.list_all_by_partition_key("\t")
                .expect_err("blank partition key should fail"),
        ),
    ];

    for (argument, err) in cases {
        assert_eq!(err.class(), ErrorClass::InvalidArgument, "{err}");
        assert_eq!(err.argument(), Some(argument), "{err}");
    }
    assert_eq!(repo.store().calls.get(), 0, "no precondition failure may reach the store");
}

#[test]
fn store_faults_propagate_unchanged() {
    let fault = StoreError::backend("throttled");
    let repo = TableRepository::new(ProbeStore::failing(fault.clone()), TABLE);

    let err = repo
        .list_all(Some(5), None)
        .expect_err("store fault should propagate");
    assert!(matches!(&err, Error::Storage(inner) if *inner == fault), "{err}");

    let err = repo
        .first(&QueryStrategy::full_scan())
        .expect_err("store fault should propagate");
    assert_eq!(err.class(), ErrorClass::Storage);
    assert_eq!(repo.store().calls.get(), 2, "faults are not retried");
}

#[test]
fn find_yields_store_fault_once_then_ends() {
    let repo = TableRepository::new(ProbeStore::failing(StoreError::backend("down")), TABLE);
    let mut found = repo
        .find(&QueryStrategy::full_scan(), None)
        .expect("find should build");

    assert!(matches!(found.next(), Some(Err(Error::Storage(_)))));
    assert!(found.next().is_none());
}

#[test]
fn exact_lookup_returns_unique_entity_or_none() {
    let store = seeded_store(TABLE, &[("a", 5), ("b", 5)]);
    let repo = repo(&store);

    let hit = repo
        .exact_lookup_first_or_default("b", "row-00003")
        .expect("lookup should succeed")
        .expect("entity should exist");
    assert_eq!(hit, Person::new("b", "row-00003", 3));

    let miss = repo
        .exact_lookup_first_or_default("b", "row-99999")
        .expect("lookup should succeed");
    assert_eq!(miss, None);
}

#[test]
fn first_distinguishes_empty_from_first_or_default() {
    let store = seeded_store(TABLE, &[("a", 3)]);
    let repo = repo(&store);
    let nobody = QueryStrategy::predicate(|p: &Person| p.age > 100);

    assert_eq!(
        repo.first_or_default(&nobody)
            .expect("first_or_default should succeed"),
        None
    );
    let err = repo.first(&nobody).expect_err("first should fail on no match");
    assert!(matches!(&err, Error::EmptyResult { table } if table == TABLE), "{err}");

    let oldest = QueryStrategy::predicate(|p: &Person| p.age == 2);
    assert_eq!(
        repo.first(&oldest).expect("first should find a match"),
        Person::new("a", "row-00002", 2)
    );
}

#[test]
fn first_finds_match_deep_in_a_large_partition() {
    let store = seeded_store(TABLE, &[("a", 1500)]);
    let repo = repo(&store);
    let late = QueryStrategy::predicate(|p: &Person| p.age == 1400);

    let found = repo
        .first(&late)
        .expect("match in a later segment should be found");
    assert_eq!(found.age, 1400);
}

#[test]
fn find_bounded_stops_at_page_size_across_segments() {
    let store = seeded_store(TABLE, &[("a", 1200), ("b", 600)]);
    let repo = repo(&store);

    let bounded: Vec<Person> = repo
        .find(&QueryStrategy::full_scan(), Some(1500))
        .expect("find should build")
        .collect::<Result<_, _>>()
        .expect("find should succeed");
    assert_eq!(bounded.len(), 1500);

    let everything = repo
        .find(&QueryStrategy::full_scan(), None)
        .expect("find should build")
        .collect::<Result<Vec<_>, _>>()
        .expect("find should succeed");
    assert_eq!(everything.len(), 1800);
}

#[test]
fn find_composes_with_iterator_adapters() {
    let store = seeded_store(TABLE, &[("a", 10), ("b", 10)]);
    let repo = repo(&store);

    let ages: Vec<u32> = repo
        .find(&QueryStrategy::partition_scan("b"), None)
        .expect("find should build")
        .filter_map(Result::ok)
        .filter(|p| p.age % 2 == 0)
        .map(|p| p.age)
        .collect();
    assert_eq!(ages, vec![0, 2, 4, 6, 8]);
}

#[test]
fn save_changes_applies_in_order_and_counts() {
    let store = seeded_store(TABLE, &[]);
    let repo = repo(&store);
    let mut batch = WriteBatch::new();
    batch
        .insert(Person::new("p", "alice", 30))
        .insert(Person::new("p", "bob", 40))
        .update(Person::new("p", "alice", 31))
        .delete(EntityKey::new("p", "bob"))
        .insert_or_replace(Person::new("p", "carol", 22));
    assert_eq!(batch.len(), 5);
    assert!(!batch.is_empty());
    assert!(matches!(&batch.ops()[3], WriteOp::Delete(key) if key.row_key() == "bob"));

    let response = repo.save_changes(batch).expect("batch should apply");
    assert_eq!(response.applied(), 5);

    let everyone = repo.list_all_entities().expect("listing should succeed");
    assert_eq!(
        everyone,
        vec![Person::new("p", "alice", 31), Person::new("p", "carol", 22)]
    );
}

#[test]
fn empty_batch_applies_nothing() {
    let store = seeded_store(TABLE, &[]);
    let batch = WriteBatch::<Person>::new();
    assert!(batch.is_empty());

    let response = repo(&store).save_changes(batch).expect("empty batch should apply");
    assert_eq!(response.applied(), 0);
    assert!(store.is_empty(TABLE).expect("table should exist"));
}

#[test]
fn save_changes_stops_at_first_failure() {
    let store = seeded_store(TABLE, &[]);
    let repo = repo(&store);
    let mut batch = WriteBatch::new();
    batch
        .insert(Person::new("p", "alice", 30))
        .update(Person::new("p", "ghost", 1))
        .insert(Person::new("p", "bob", 40));

    let err = repo
        .save_changes(batch)
        .expect_err("update of missing entity should fail");
    assert!(matches!(err, Error::Storage(StoreError::EntityNotFound { .. })));

    let everyone = repo.list_all_entities().expect("listing should succeed");
    assert_eq!(everyone, vec![Person::new("p", "alice", 30)]);
}

#[test]
fn save_changes_rejects_blank_keys_before_writing() {
    let store = seeded_store(TABLE, &[]);
    let repo = repo(&store);
    let mut batch = WriteBatch::new();
    batch
        .insert(Person::new("p", "alice", 30))
        .insert(Person::new("p", " ", 1));

    let err = repo.save_changes(batch).expect_err("blank row key should fail");
    assert_eq!(err.argument(), Some("row_key"));
    assert_eq!(store.len(TABLE).expect("table should exist"), 0);
}

#[test]
fn table_lifecycle_passes_through() {
    let store = MemoryStore::<Person>::new();
    let repo = repo(&store);

    assert!(repo.create_table_if_not_exists().expect("create"));
    assert!(!repo.create_table_if_not_exists().expect("create again"));
    assert!(repo.delete_table().expect("delete"));
    assert_eq!(
        repo.list_all(None, None).expect_err("table is gone").class(),
        ErrorClass::Storage
    );
}

struct SegmentCounter(AtomicU64);

impl MetricsSink for SegmentCounter {
    fn record(&self, event: MetricsEvent<'_>) {
        if matches!(event, MetricsEvent::SegmentFetched { .. }) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}

static SEGMENTS: SegmentCounter = SegmentCounter(AtomicU64::new(0));

#[test]
fn repository_metrics_sink_sees_every_segment() {
    let store = seeded_store(TABLE, &[("p", 2500)]);
    let repo = repo(&store).metrics_sink(&SEGMENTS);
    let before = SEGMENTS.0.load(Ordering::Relaxed);

    let all = repo
        .list_all_by_partition_key("p")
        .expect("listing should succeed");
    assert_eq!(all.len(), 2500);
    assert_eq!(SEGMENTS.0.load(Ordering::Relaxed) - before, 3);
}

static FIND_SEGMENTS: SegmentCounter = SegmentCounter(AtomicU64::new(0));

#[test]
fn find_routes_segment_events_to_repository_sink() {
    metrics_reset_all();
    let store = seeded_store(TABLE, &[("p", 2500)]);
    let repo = repo(&store).metrics_sink(&FIND_SEGMENTS);
    let before = FIND_SEGMENTS.0.load(Ordering::Relaxed);

    // Segments are fetched while the caller iterates, after `find` returned.
    let found = repo
        .find(&QueryStrategy::full_scan(), None)
        .expect("find should build")
        .collect::<Result<Vec<_>, _>>()
        .expect("find should succeed");
    assert_eq!(found.len(), 2500);
    assert_eq!(FIND_SEGMENTS.0.load(Ordering::Relaxed) - before, 3);
    assert_eq!(
        metrics_report().ops.segments_fetched,
        0,
        "global counters must not see repository-routed segments"
    );
}
