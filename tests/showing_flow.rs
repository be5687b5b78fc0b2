use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use realty_desk::remote::{RemoteDataSource, RemoteError};
use realty_desk::{PropertyRepository, ShowingRequest};

/// Writable backend double: named collections of records with equality
/// filtering, appending inserts, and patch-merging updates.
struct MemoryBackend {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryBackend {
    fn with_properties(properties: Vec<Value>) -> Self {
        let mut collections = HashMap::new();
        collections.insert("properties".to_string(), properties);
        Self {
            collections: Mutex::new(collections),
        }
    }

    fn records(&self, collection: &str) -> Vec<Value> {
        self.collections
            .lock()
            .expect("collection mutex poisoned")
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn field_matches(row: &Value, column: &str, value: &str) -> bool {
    match &row[column] {
        Value::String(s) => s == value,
        Value::Number(n) => n.to_string() == value,
        _ => false,
    }
}

#[async_trait]
impl RemoteDataSource for MemoryBackend {
    async fn select_all(&self, collection: &str) -> Result<Vec<Value>, RemoteError> {
        Ok(self.records(collection))
    }

    async fn select_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        Ok(self
            .records(collection)
            .into_iter()
            .filter(|row| field_matches(row, column, value))
            .collect())
    }

    async fn select_range(
        &self,
        collection: &str,
        column: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<Value>, RemoteError> {
        Ok(self
            .records(collection)
            .into_iter()
            .filter(|row| {
                row[column]
                    .as_f64()
                    .map(|v| v >= min && v <= max)
                    .unwrap_or(false)
            })
            .collect())
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<(), RemoteError> {
        self.collections
            .lock()
            .expect("collection mutex poisoned")
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn update_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
        patch: Value,
    ) -> Result<(), RemoteError> {
        let mut collections = self.collections.lock().expect("collection mutex poisoned");
        let rows = collections.entry(collection.to_string()).or_default();
        for row in rows.iter_mut().filter(|row| field_matches(row, column, value)) {
            if let (Value::Object(target), Value::Object(fields)) = (row, &patch) {
                for (key, new_value) in fields {
                    target.insert(key.clone(), new_value.clone());
                }
            }
        }
        Ok(())
    }
}

fn seeded_backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::with_properties(vec![json!({
        "id": 4,
        "title": "Corner flat",
        "description": "Two balconies",
        "price": 140_000.0,
        "area": 58.0,
        "rooms": 2,
        "type": "apartment",
        "address": "Station Road 4",
        "city": "Porthaven",
        "image_url": "https://cdn.example.test/4.jpg",
        "agent_id": 9,
        "views_count": 5
    })]))
}

#[tokio::test]
async fn submitted_request_carries_the_listing_agent_and_is_queryable() {
    let backend = seeded_backend();
    let repository = PropertyRepository::new(backend.clone());

    let listing = repository.fetch_by_id(4).await.expect("listing exists");
    let request = ShowingRequest::for_property(
        &listing,
        "Ben Ode",
        "+1 555 0102",
        "ben@example.test",
        "2026-08-22",
        "After 17:00 works best",
    );
    assert_eq!(request.agent_id, 9, "agent is copied from the listing");

    assert!(repository.submit_showing_request(&request).await);

    let by_property = repository.fetch_showing_requests_by_property(4).await;
    assert_eq!(by_property.len(), 1);
    assert_eq!(by_property[0].client_name, "Ben Ode");
    assert_eq!(by_property[0].message, "After 17:00 works best");

    let by_agent = repository.fetch_showing_requests_by_agent(9).await;
    assert_eq!(by_agent.len(), 1);
    assert!(repository.fetch_showing_requests_by_agent(8).await.is_empty());
}

#[tokio::test]
async fn blank_required_fields_keep_the_request_off_the_wire() {
    let backend = seeded_backend();
    let repository = PropertyRepository::new(backend.clone());

    let listing = repository.fetch_by_id(4).await.expect("listing exists");
    let request =
        ShowingRequest::for_property(&listing, "", "+1 555 0102", "ben@example.test", "2026-08-22", "");

    assert!(!repository.submit_showing_request(&request).await);
    assert!(backend.records("showing_requests").is_empty());
}

#[tokio::test]
async fn view_counts_accumulate_across_increments() {
    let backend = seeded_backend();
    let repository = PropertyRepository::new(backend.clone());

    assert!(repository.increment_view_count(4).await);
    assert!(repository.increment_view_count(4).await);

    let listing = repository.fetch_by_id(4).await.expect("listing exists");
    assert_eq!(listing.views_count, 7);

    assert!(
        !repository.increment_view_count(99).await,
        "missing listing fails the increment"
    );
}
