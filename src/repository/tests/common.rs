use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::remote::{RemoteDataSource, RemoteError};
use crate::repository::PropertyRepository;

pub(super) fn listing_row(id: i32, title: &str, city: &str, price: f64, views: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "price": price,
        "area": 60.0,
        "rooms": 2,
        "type": "apartment",
        "address": format!("Main Street {id}"),
        "city": city,
        "image_url": format!("https://cdn.example.test/{id}.jpg"),
        "agent_id": 1,
        "views_count": views
    })
}

/// Serves the same fixed rows for every select and records every write.
#[derive(Default)]
pub(super) struct StaticSource {
    pub(super) rows: Vec<Value>,
    pub(super) inserts: Mutex<Vec<(String, Value)>>,
    pub(super) updates: Mutex<Vec<(String, String, String, Value)>>,
}

impl StaticSource {
    pub(super) fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RemoteDataSource for StaticSource {
    async fn select_all(&self, _collection: &str) -> Result<Vec<Value>, RemoteError> {
        Ok(self.rows.clone())
    }

    async fn select_eq(
        &self,
        _collection: &str,
        _column: &str,
        _value: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        Ok(self.rows.clone())
    }

    async fn select_range(
        &self,
        _collection: &str,
        _column: &str,
        _min: f64,
        _max: f64,
    ) -> Result<Vec<Value>, RemoteError> {
        Ok(self.rows.clone())
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<(), RemoteError> {
        self.inserts
            .lock()
            .expect("insert mutex poisoned")
            .push((collection.to_string(), record));
        Ok(())
    }

    async fn update_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
        patch: Value,
    ) -> Result<(), RemoteError> {
        self.updates.lock().expect("update mutex poisoned").push((
            collection.to_string(),
            column.to_string(),
            value.to_string(),
            patch,
        ));
        Ok(())
    }
}

/// Fails every call, standing in for an unreachable backend.
pub(super) struct FailingSource;

#[async_trait]
impl RemoteDataSource for FailingSource {
    async fn select_all(&self, _collection: &str) -> Result<Vec<Value>, RemoteError> {
        Err(RemoteError::Unavailable("backend offline".to_string()))
    }

    async fn select_eq(
        &self,
        _collection: &str,
        _column: &str,
        _value: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        Err(RemoteError::Unavailable("backend offline".to_string()))
    }

    async fn select_range(
        &self,
        _collection: &str,
        _column: &str,
        _min: f64,
        _max: f64,
    ) -> Result<Vec<Value>, RemoteError> {
        Err(RemoteError::Unavailable("backend offline".to_string()))
    }

    async fn insert(&self, _collection: &str, _record: Value) -> Result<(), RemoteError> {
        Err(RemoteError::Unavailable("backend offline".to_string()))
    }

    async fn update_eq(
        &self,
        _collection: &str,
        _column: &str,
        _value: &str,
        _patch: Value,
    ) -> Result<(), RemoteError> {
        Err(RemoteError::Unavailable("backend offline".to_string()))
    }
}

pub(super) fn repository_over(source: Arc<dyn RemoteDataSource>) -> PropertyRepository {
    PropertyRepository::new(source)
}
