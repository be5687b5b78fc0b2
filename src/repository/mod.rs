//! Stateless gateway between the application and the hosted record store.

use std::future::Future;
use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::codec;
use crate::models::{Agent, PropertyKind, PropertyListing, ShowingRequest};
use crate::remote::{RemoteDataSource, RemoteError};

#[cfg(test)]
mod tests;

pub(crate) const PROPERTIES: &str = "properties";
pub(crate) const AGENTS: &str = "agents";
pub(crate) const SHOWING_REQUESTS: &str = "showing_requests";

/// Default cutoff for [`PropertyRepository::fetch_popular`].
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

/// Issues one remote call chain per operation and resolves each to exactly
/// one terminal value.
///
/// Failures never cross this boundary: every operation absorbs them into its
/// documented empty, absent, or `false` result, leaving a warn-level log
/// entry as the only trace. Callers therefore cannot distinguish "no data"
/// from "fetch failed" here.
pub struct PropertyRepository {
    source: Arc<dyn RemoteDataSource>,
}

/// Runs a fallible remote call and flattens its failure into `fallback`.
async fn absorb<T, F>(operation: &'static str, fallback: T, call: F) -> T
where
    F: Future<Output = Result<T, RemoteError>>,
{
    match call.await {
        Ok(value) => value,
        Err(error) => {
            warn!(operation, %error, "remote call failed, returning fallback");
            fallback
        }
    }
}

impl PropertyRepository {
    /// The data source is injected so tests can substitute it; the repository
    /// itself holds no other state.
    pub fn new(source: Arc<dyn RemoteDataSource>) -> Self {
        Self { source }
    }

    async fn all_properties(&self) -> Result<Vec<PropertyListing>, RemoteError> {
        let rows = self.source.select_all(PROPERTIES).await?;
        codec::decode_rows(rows)
    }

    /// All advertised listings. Empty on any failure.
    pub async fn fetch_all(&self) -> Vec<PropertyListing> {
        absorb("fetch_all", Vec::new(), self.all_properties()).await
    }

    /// A single listing by id. Absent when missing, duplicated server-side,
    /// or unreachable.
    pub async fn fetch_by_id(&self, id: i32) -> Option<PropertyListing> {
        absorb("fetch_by_id", None, async {
            let rows = self
                .source
                .select_eq(PROPERTIES, "id", &id.to_string())
                .await?;
            codec::decode_single(rows).map(Some)
        })
        .await
    }

    /// Listings in `city`, filtered server-side.
    pub async fn fetch_by_city(&self, city: &str) -> Vec<PropertyListing> {
        absorb("fetch_by_city", Vec::new(), async {
            let rows = self.source.select_eq(PROPERTIES, "city", city).await?;
            codec::decode_rows(rows)
        })
        .await
    }

    /// Listings of one kind, filtered server-side.
    pub async fn fetch_by_kind(&self, kind: PropertyKind) -> Vec<PropertyListing> {
        absorb("fetch_by_kind", Vec::new(), async {
            let rows = self
                .source
                .select_eq(PROPERTIES, "type", kind.label())
                .await?;
            codec::decode_rows(rows)
        })
        .await
    }

    /// Listings priced within `[min, max]`, both bounds inclusive, filtered
    /// server-side.
    pub async fn fetch_by_price_range(&self, min: f64, max: f64) -> Vec<PropertyListing> {
        absorb("fetch_by_price_range", Vec::new(), async {
            let rows = self
                .source
                .select_range(PROPERTIES, "price", min, max)
                .await?;
            codec::decode_rows(rows)
        })
        .await
    }

    /// Substring search over title, address, and city. The backend exposes no
    /// text-search operator, so this fetches the collection and filters
    /// locally.
    pub async fn search(&self, query: &str) -> Vec<PropertyListing> {
        absorb("search", Vec::new(), async {
            let listings = self.all_properties().await?;
            Ok(listings
                .into_iter()
                .filter(|listing| listing.matches_query(query))
                .collect())
        })
        .await
    }

    /// The most viewed listings, at most `limit` of them. The sort is stable,
    /// so listings tied on views keep their fetch order.
    pub async fn fetch_popular(&self, limit: usize) -> Vec<PropertyListing> {
        absorb("fetch_popular", Vec::new(), async {
            let mut listings = self.all_properties().await?;
            listings.sort_by(|a, b| b.views_count.cmp(&a.views_count));
            listings.truncate(limit);
            Ok(listings)
        })
        .await
    }

    /// A single agent by id. Absent on failure or no match.
    pub async fn fetch_agent_by_id(&self, id: i32) -> Option<Agent> {
        absorb("fetch_agent_by_id", None, async {
            let rows = self.source.select_eq(AGENTS, "id", &id.to_string()).await?;
            codec::decode_single(rows).map(Some)
        })
        .await
    }

    /// Every listing agent. Empty on failure.
    pub async fn fetch_all_agents(&self) -> Vec<Agent> {
        absorb("fetch_all_agents", Vec::new(), async {
            let rows = self.source.select_all(AGENTS).await?;
            codec::decode_rows(rows)
        })
        .await
    }

    /// Submits a showing request, best effort. `false` means the request was
    /// dropped, whether its required fields were empty or the backend
    /// rejected it; there is no retry or queued resubmission.
    pub async fn submit_showing_request(&self, request: &ShowingRequest) -> bool {
        if !request.has_required_fields() {
            warn!(
                property_id = request.property_id,
                "showing request dropped, required fields empty"
            );
            return false;
        }
        absorb("submit_showing_request", false, async {
            let record = codec::encode(request)?;
            self.source.insert(SHOWING_REQUESTS, record).await?;
            Ok(true)
        })
        .await
    }

    /// Showing requests assigned to an agent. Empty on failure.
    pub async fn fetch_showing_requests_by_agent(&self, agent_id: i32) -> Vec<ShowingRequest> {
        absorb("fetch_showing_requests_by_agent", Vec::new(), async {
            let rows = self
                .source
                .select_eq(SHOWING_REQUESTS, "agent_id", &agent_id.to_string())
                .await?;
            codec::decode_rows(rows)
        })
        .await
    }

    /// Showing requests filed against a property. Empty on failure.
    pub async fn fetch_showing_requests_by_property(
        &self,
        property_id: i32,
    ) -> Vec<ShowingRequest> {
        absorb("fetch_showing_requests_by_property", Vec::new(), async {
            let rows = self
                .source
                .select_eq(SHOWING_REQUESTS, "property_id", &property_id.to_string())
                .await?;
            codec::decode_rows(rows)
        })
        .await
    }

    /// Reads the current view counter and writes it back incremented.
    ///
    /// The two steps are not atomic: a concurrent viewer can read the same
    /// counter between our read and write, and one of the increments is then
    /// lost. The backend offers select and update-with-filter but no
    /// compare-and-swap, so the undercount is accepted.
    pub async fn increment_view_count(&self, property_id: i32) -> bool {
        absorb("increment_view_count", false, async {
            let rows = self
                .source
                .select_eq(PROPERTIES, "id", &property_id.to_string())
                .await?;
            let listing: PropertyListing = codec::decode_single(rows)?;
            let patch = json!({ "views_count": listing.views_count + 1 });
            self.source
                .update_eq(PROPERTIES, "id", &property_id.to_string(), patch)
                .await?;
            Ok(true)
        })
        .await
    }
}
