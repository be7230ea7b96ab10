//! Integration tests for the migration orchestrator.
//!
//! These tests use the real Orchestrator but mock every collaborator
//! (LegacySource, TargetSink, ContextStore and ErrorLog) so runs are
//! deterministic and inspectable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use cms_migrator::orchestrator::{Orchestrator, OrchestratorConfig};
use cms_migrator::{MigrationError, OrderingMode};
use cms_migrator_repository::{
    ContextStore, ErrorLog, LegacySource, RepositoryError, TargetSink,
};
use cms_migrator_shared::{
    IdMaps, LegacyCollection, LegacyField, LegacyRelation, MigrationContext, MigrationPhase,
    TranslatedCollection,
};

// Mock legacy source serving in-memory collections
#[derive(Default)]
struct MockSource {
    collections: Vec<LegacyCollection>,
    relations: Vec<LegacyRelation>,
    records: HashMap<String, Vec<Value>>,
    /// Remaining failures per (collection, offset).
    failures: Mutex<HashMap<(String, u64), u32>>,
    schema_calls: Mutex<u32>,
    fetch_calls: Mutex<Vec<(String, u64, u64)>>,
}

impl MockSource {
    fn new(collections: Vec<LegacyCollection>) -> Self {
        Self {
            collections,
            ..Default::default()
        }
    }

    fn with_records(mut self, collection: &str, count: usize) -> Self {
        let records = (0..count).map(|i| json!({ "id": i + 1 })).collect();
        self.records.insert(collection.to_string(), records);
        self
    }

    fn with_raw_records(mut self, collection: &str, records: Vec<Value>) -> Self {
        self.records.insert(collection.to_string(), records);
        self
    }

    fn with_relations(mut self, relations: Vec<LegacyRelation>) -> Self {
        self.relations = relations;
        self
    }

    fn failing(self, collection: &str, offset: u64, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((collection.to_string(), offset), times);
        self
    }

    fn fetch_calls(&self) -> Vec<(String, u64, u64)> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LegacySource for MockSource {
    async fn fetch_collections(&self) -> Result<Vec<LegacyCollection>, RepositoryError> {
        *self.schema_calls.lock().unwrap() += 1;
        Ok(self.collections.clone())
    }

    async fn fetch_relations(&self) -> Result<Vec<LegacyRelation>, RepositoryError> {
        Ok(self.relations.clone())
    }

    async fn fetch_total_count(&self, collection: &str) -> Result<u64, RepositoryError> {
        Ok(self.records.get(collection).map_or(0, |r| r.len() as u64))
    }

    async fn fetch_items(
        &self,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Value>, RepositoryError> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((collection.to_string(), offset, limit));

        if let Some(remaining) = self
            .failures
            .lock()
            .unwrap()
            .get_mut(&(collection.to_string(), offset))
        {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(RepositoryError::transport("connection reset"));
            }
        }

        let records = self.records.get(collection).cloned().unwrap_or_default();
        Ok(records
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

// Mock target recording every write
#[derive(Default)]
struct MockTarget {
    created_collections: Mutex<Vec<String>>,
    item_batches: Mutex<Vec<(String, Vec<Value>)>>,
    singleton_updates: Mutex<Vec<(String, Value)>>,
    reject_items_for: Option<String>,
}

impl MockTarget {
    fn rejecting_items_for(collection: &str) -> Self {
        Self {
            reject_items_for: Some(collection.to_string()),
            ..Default::default()
        }
    }

    fn batch_sizes(&self, collection: &str) -> Vec<usize> {
        self.item_batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, items)| items.len())
            .collect()
    }
}

#[async_trait]
impl TargetSink for MockTarget {
    async fn create_collection(
        &self,
        collection: &TranslatedCollection,
    ) -> Result<(), RepositoryError> {
        self.created_collections
            .lock()
            .unwrap()
            .push(collection.collection.clone());
        Ok(())
    }

    async fn create_items(&self, collection: &str, items: &[Value]) -> Result<(), RepositoryError> {
        if self.reject_items_for.as_deref() == Some(collection) {
            return Err(RepositoryError::Response {
                method: "POST".to_string(),
                url: format!("http://target/items/{}", collection),
                status: 400,
                body: json!({ "errors": [{ "message": "Invalid payload" }] }),
            });
        }
        self.item_batches
            .lock()
            .unwrap()
            .push((collection.to_string(), items.to_vec()));
        Ok(())
    }

    async fn update_singleton(&self, collection: &str, item: &Value) -> Result<(), RepositoryError> {
        self.singleton_updates
            .lock()
            .unwrap()
            .push((collection.to_string(), item.clone()));
        Ok(())
    }
}

// Mock context store keeping every checkpoint
#[derive(Default)]
struct MockContextStore {
    writes: Mutex<Vec<(MigrationPhase, MigrationContext)>>,
}

impl MockContextStore {
    fn phases(&self) -> Vec<MigrationPhase> {
        self.writes.lock().unwrap().iter().map(|(p, _)| *p).collect()
    }
}

#[async_trait]
impl ContextStore for MockContextStore {
    async fn read(&self) -> Result<Option<MigrationContext>, RepositoryError> {
        Ok(self.writes.lock().unwrap().last().map(|(_, c)| c.clone()))
    }

    async fn write(
        &self,
        context: &MigrationContext,
        phase: MigrationPhase,
    ) -> Result<(), RepositoryError> {
        self.writes.lock().unwrap().push((phase, context.clone()));
        Ok(())
    }
}

// Mock error log
#[derive(Default)]
struct MockErrorLog {
    entries: Mutex<Vec<(String, Value)>>,
}

impl MockErrorLog {
    fn entries_for(&self, operation: &str) -> Vec<Value> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl ErrorLog for MockErrorLog {
    async fn append(&self, operation: &str, payload: &Value) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .unwrap()
            .push((operation.to_string(), payload.clone()));
        Ok(())
    }
}

struct Harness {
    source: Arc<MockSource>,
    target: Arc<MockTarget>,
    store: Arc<MockContextStore>,
    log: Arc<MockErrorLog>,
    orchestrator: Orchestrator,
}

fn harness(source: MockSource, target: MockTarget, config: OrchestratorConfig) -> Harness {
    let source = Arc::new(source);
    let target = Arc::new(target);
    let store = Arc::new(MockContextStore::default());
    let log = Arc::new(MockErrorLog::default());
    let orchestrator = Orchestrator::new(
        source.clone(),
        target.clone(),
        store.clone(),
        log.clone(),
        config,
    );

    Harness {
        source,
        target,
        store,
        log,
        orchestrator,
    }
}

fn fast_retry() -> OrchestratorConfig {
    OrchestratorConfig {
        fetch_retry_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

fn collection(name: &str) -> LegacyCollection {
    LegacyCollection {
        collection: name.to_string(),
        fields: vec![LegacyField::new("id", "integer")],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_run_pages_records() {
    let source = MockSource::new(vec![collection("articles"), collection("directus_users")])
        .with_records("articles", 150);
    let h = harness(source, MockTarget::default(), fast_retry());

    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    assert_eq!(
        h.source.fetch_calls(),
        vec![
            ("articles".to_string(), 0, 100),
            ("articles".to_string(), 100, 100)
        ]
    );
    assert_eq!(h.target.batch_sizes("articles"), vec![100, 50]);
    assert_eq!(
        *h.target.created_collections.lock().unwrap(),
        vec!["articles".to_string()]
    );
    assert_eq!(
        h.store.phases(),
        vec![MigrationPhase::Schema, MigrationPhase::Collections]
    );

    let report = &summary.collections[0];
    assert_eq!(report.total, 150);
    assert_eq!(report.pages, 2);
    assert_eq!(report.records_written, 150);
    assert!(summary.is_clean());
    assert_eq!(summary.context.translated_collections.len(), 1);
    assert_eq!(summary.context.count_for("articles"), 150);
}

#[tokio::test]
async fn test_skip_list_and_empty_collection() {
    let source = MockSource::new(vec![
        collection("articles"),
        collection("audit_log"),
        collection("drafts"),
    ])
    .with_records("articles", 3)
    .with_records("audit_log", 10);
    let config = OrchestratorConfig {
        skip_collections: vec!["audit_log".to_string()],
        ..fast_retry()
    };
    let h = harness(source, MockTarget::default(), config);

    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    assert_eq!(
        *h.target.created_collections.lock().unwrap(),
        vec!["articles".to_string(), "drafts".to_string()]
    );
    let drafts = &summary.collections[1];
    assert_eq!(drafts.collection, "drafts");
    assert_eq!(drafts.pages, 0);
    assert!(h
        .source
        .fetch_calls()
        .iter()
        .all(|(c, _, _)| c == "articles"));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_retry_succeeds() {
    let source = MockSource::new(vec![collection("articles")])
        .with_records("articles", 150)
        .failing("articles", 0, 1);
    let h = harness(source, MockTarget::default(), OrchestratorConfig::default());

    let started = tokio::time::Instant::now();
    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(h.source.fetch_calls().len(), 3);
    assert_eq!(h.target.batch_sizes("articles"), vec![100, 50]);
    assert!(summary.is_clean());
    assert!(h.log.entries_for("fetch").is_empty());
}

#[tokio::test]
async fn test_double_fetch_failure_aborts_only_that_collection() {
    let source = MockSource::new(vec![collection("broken"), collection("healthy")])
        .with_records("broken", 250)
        .with_records("healthy", 20)
        .failing("broken", 100, 2);
    let h = harness(source, MockTarget::default(), fast_retry());

    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    let broken = &summary.collections[0];
    assert_eq!(broken.pages, 3);
    assert_eq!(broken.pages_fetched, 1);
    assert_eq!(broken.records_written, 100);
    assert!(broken.aborted.is_some());

    let healthy = &summary.collections[1];
    assert!(healthy.is_clean());
    assert_eq!(healthy.records_written, 20);

    // Page 1 tried twice, page 2 never requested.
    let broken_offsets: Vec<u64> = h
        .source
        .fetch_calls()
        .into_iter()
        .filter(|(c, _, _)| c == "broken")
        .map(|(_, offset, _)| offset)
        .collect();
    assert_eq!(broken_offsets, vec![0, 100, 100]);

    let fetch_errors = h.log.entries_for("fetch");
    assert_eq!(fetch_errors.len(), 1);
    assert_eq!(fetch_errors[0]["collection"], "broken");
    assert_eq!(fetch_errors[0]["page"], 1);
}

#[tokio::test]
async fn test_push_failure_is_logged_and_run_continues() {
    let source = MockSource::new(vec![collection("articles"), collection("tags")])
        .with_records("articles", 120)
        .with_records("tags", 5);
    let h = harness(source, MockTarget::rejecting_items_for("articles"), fast_retry());

    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    let articles = &summary.collections[0];
    assert_eq!(articles.failed_batches, 2);
    assert_eq!(articles.records_written, 0);
    assert_eq!(summary.collections[1].records_written, 5);

    let item_errors = h.log.entries_for("items");
    assert_eq!(item_errors.len(), 2);
    assert_eq!(item_errors[0]["collection"], "articles");
    assert_eq!(item_errors[0]["status"], 400);
    assert_eq!(item_errors[0]["detail"]["status"], 400);
    assert_eq!(
        item_errors[0]["detail"]["body"]["errors"][0]["message"],
        "Invalid payload"
    );
    assert_eq!(item_errors[1]["records"], 20);
}

#[tokio::test]
async fn test_completed_checkpoints_skip_schema_phases() {
    let source = MockSource::new(vec![collection("ignored")]).with_records("articles", 10);
    let h = harness(source, MockTarget::default(), fast_retry());

    let mut context = MigrationContext::default();
    context.collections = vec![collection("articles")];
    context.mark_completed(MigrationPhase::Schema);
    context.mark_completed(MigrationPhase::Collections);

    let summary = h.orchestrator.run(context).await.unwrap();

    assert_eq!(*h.source.schema_calls.lock().unwrap(), 0);
    assert!(h.target.created_collections.lock().unwrap().is_empty());
    assert!(h.store.phases().is_empty());
    assert_eq!(h.target.batch_sizes("articles"), vec![10]);
    assert_eq!(summary.collections.len(), 1);
}

#[tokio::test]
async fn test_resume_after_schema_checkpoint() {
    let source = MockSource::new(vec![collection("ignored")]).with_records("articles", 1);
    let h = harness(source, MockTarget::default(), fast_retry());

    let mut context = MigrationContext::default();
    context.collections = vec![collection("articles")];
    context.mark_completed(MigrationPhase::Schema);

    h.orchestrator.run(context).await.unwrap();

    assert_eq!(*h.source.schema_calls.lock().unwrap(), 0);
    assert_eq!(
        *h.target.created_collections.lock().unwrap(),
        vec!["articles".to_string()]
    );
    assert_eq!(h.store.phases(), vec![MigrationPhase::Collections]);

    let saved = h.store.read().await.unwrap().unwrap();
    assert!(saved.completed_steps.schema && saved.completed_steps.collections);
    assert!(saved.saved_at.is_some());
}

#[tokio::test]
async fn test_singleton_uses_patch() {
    let mut settings = collection("settings");
    settings.single = true;
    let source = MockSource::new(vec![settings])
        .with_raw_records("settings", vec![json!({ "id": 1, "site_name": "Docs" })]);
    let h = harness(source, MockTarget::default(), fast_retry());

    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    assert_eq!(
        *h.target.singleton_updates.lock().unwrap(),
        vec![(
            "settings".to_string(),
            json!({ "id": 1, "site_name": "Docs" })
        )]
    );
    assert!(h.target.item_batches.lock().unwrap().is_empty());
    assert_eq!(summary.collections[0].records_written, 1);
}

#[tokio::test]
async fn test_unmapped_type_aborts_before_any_write() {
    let mut shapes = collection("shapes");
    shapes.fields.push(LegacyField::new("outline", "geometry"));
    let source = MockSource::new(vec![collection("articles"), shapes])
        .with_records("articles", 5)
        .with_records("shapes", 5);
    let h = harness(source, MockTarget::default(), fast_retry());

    let result = h.orchestrator.run(MigrationContext::default()).await;

    assert!(matches!(result, Err(MigrationError::Translation(_))));
    assert!(h.target.item_batches.lock().unwrap().is_empty());
    assert_eq!(h.store.phases(), vec![MigrationPhase::Schema]);
    assert_eq!(h.log.entries_for("collections").len(), 1);
}

#[tokio::test]
async fn test_invalid_json_default_is_logged() {
    let mut settings = collection("settings");
    let mut layout = LegacyField::new("layout", "json");
    layout.default_value = json!("{\"columns\": 2");
    settings.fields.push(layout);
    let h = harness(MockSource::new(vec![settings]), MockTarget::default(), fast_retry());

    let summary = h.orchestrator.run(MigrationContext::default()).await.unwrap();

    let entries = h.log.entries_for("default_value");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["collection"], "settings");
    assert_eq!(entries[0]["field"], "layout");
    assert_eq!(entries[0]["default_value"], "{\"columns\": 2");

    let created = &summary.context.translated_collections[0].fields[1];
    let schema = created.schema.as_ref().unwrap();
    assert!(schema.default_value.as_str().unwrap().contains("\"layout\""));
}

#[tokio::test]
async fn test_records_are_transformed_before_push() {
    let mut articles = collection("articles");
    articles.fields.push(LegacyField::new("owner", "owner"));
    articles.fields.push(LegacyField::new("published_on", "datetime"));
    let source = MockSource::new(vec![articles])
        .with_relations(vec![LegacyRelation::new(
            "articles",
            "owner",
            "directus_users",
        )])
        .with_raw_records(
            "articles",
            vec![
                json!({ "id": 1, "owner": 4, "published_on": "2020-01-01 10:00:00" }),
                json!({ "id": 2, "owner": 5, "published_on": "someday" }),
                json!({ "id": 3, "owner": 99, "published_on": null }),
            ],
        );
    let h = harness(source, MockTarget::default(), fast_retry());

    let mut id_maps = IdMaps::default();
    id_maps.users.insert("4".to_string(), json!("user-uuid-4"));
    id_maps.users.insert("5".to_string(), json!("user-uuid-5"));

    let summary = h
        .orchestrator
        .run(MigrationContext::new(id_maps))
        .await
        .unwrap();

    let batches = h.target.item_batches.lock().unwrap().clone();
    assert_eq!(
        batches,
        vec![(
            "articles".to_string(),
            vec![
                json!({ "id": 1, "owner": "user-uuid-4", "published_on": "2020-01-01T10:00:00.000Z" }),
                json!({ "id": 3, "owner": null, "published_on": null }),
            ]
        )]
    );

    let report = &summary.collections[0];
    assert_eq!(report.rejected_records, 1);
    assert_eq!(report.unmapped_references, 1);
    assert_eq!(h.log.entries_for("transform")[0]["record"]["id"], 2);
}

#[tokio::test]
async fn test_explicit_and_dependency_ordering() {
    let mut comments = collection("comments");
    let mut article_ref = LegacyField::new("article", "m2o");
    article_ref.interface = Some("many-to-one".to_string());
    comments.fields.push(article_ref);
    let mut articles = collection("articles");
    let mut author_ref = LegacyField::new("author", "m2o");
    author_ref.interface = Some("many-to-one".to_string());
    articles.fields.push(author_ref);
    let relations = vec![
        LegacyRelation::new("comments", "article", "articles"),
        LegacyRelation::new("articles", "author", "authors"),
    ];

    // Heuristic keeps the two many-to-one holders in source order.
    let dependency = harness(
        MockSource::new(vec![comments.clone(), articles.clone(), collection("authors")])
            .with_relations(relations.clone()),
        MockTarget::default(),
        OrchestratorConfig {
            ordering: OrderingMode::Dependency,
            ..fast_retry()
        },
    );
    dependency
        .orchestrator
        .run(MigrationContext::default())
        .await
        .unwrap();
    assert_eq!(
        *dependency.target.created_collections.lock().unwrap(),
        vec!["authors", "articles", "comments"]
    );

    let explicit = harness(
        MockSource::new(vec![comments, articles, collection("authors")])
            .with_relations(relations),
        MockTarget::default(),
        OrchestratorConfig {
            collection_order: Some(vec!["articles".to_string(), "authors".to_string()]),
            ordering: OrderingMode::Dependency,
            ..fast_retry()
        },
    );
    explicit
        .orchestrator
        .run(MigrationContext::default())
        .await
        .unwrap();
    assert_eq!(
        *explicit.target.created_collections.lock().unwrap(),
        vec!["comments", "articles", "authors"]
    );
}
