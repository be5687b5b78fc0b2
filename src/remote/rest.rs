use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::BackendConfig;

use super::{RemoteDataSource, RemoteError};

/// PostgREST-style client for the hosted record store.
///
/// Collections live under `{base_url}/rest/v1/{collection}`; filters ride in
/// the query string (`column=eq.value`, `column=gte.min&column=lte.max`).
pub struct RestDataSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestDataSource {
    pub fn new(config: &BackendConfig) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn run_select(&self, request: RequestBuilder) -> Result<Vec<Value>, RemoteError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn run_write(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        let response = self
            .authorized(request)
            .header("Prefer", "return=minimal")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteDataSource for RestDataSource {
    async fn select_all(&self, collection: &str) -> Result<Vec<Value>, RemoteError> {
        let request = self
            .client
            .get(self.collection_url(collection))
            .query(&[("select", "*")]);
        self.run_select(request).await
    }

    async fn select_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        let filter = format!("eq.{value}");
        let request = self
            .client
            .get(self.collection_url(collection))
            .query(&[("select", "*"), (column, filter.as_str())]);
        self.run_select(request).await
    }

    async fn select_range(
        &self,
        collection: &str,
        column: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<Value>, RemoteError> {
        let lower = format!("gte.{min}");
        let upper = format!("lte.{max}");
        let request = self
            .client
            .get(self.collection_url(collection))
            .query(&[
                ("select", "*"),
                (column, lower.as_str()),
                (column, upper.as_str()),
            ]);
        self.run_select(request).await
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<(), RemoteError> {
        let request = self.client.post(self.collection_url(collection)).json(&record);
        self.run_write(request).await
    }

    async fn update_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
        patch: Value,
    ) -> Result<(), RemoteError> {
        let filter = format!("eq.{value}");
        let request = self
            .client
            .patch(self.collection_url(collection))
            .query(&[(column, filter.as_str())])
            .json(&patch);
        self.run_write(request).await
    }
}
