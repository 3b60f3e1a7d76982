//! Cache Warmer Module
//!
//! Read-through helpers that fill the caches ahead of demand.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::Result;
use crate::keys;
use crate::registry::CacheRegistry;
use crate::source::DataSource;

// == Cache Warmer ==
#[derive(Clone)]
pub struct CacheWarmer {
    registry: CacheRegistry,
    source: Arc<dyn DataSource>,
}

impl CacheWarmer {
    pub fn new(registry: CacheRegistry, source: Arc<dyn DataSource>) -> Self {
        Self { registry, source }
    }

    /// Loads the reference data every page needs: system attributes and the
    /// unfiltered offer listing.
    pub async fn preload(&self) -> Result<()> {
        self.system_attributes().await?;
        self.warm_offers().await?;
        info!("Cache preload complete");
        Ok(())
    }

    /// Returns the system attributes, fetching them on a miss.
    pub async fn system_attributes(&self) -> Result<Value> {
        let source = &self.source;
        let value = self
            .registry
            .static_data()
            .get_or_set(keys::SYSTEM_ATTRIBUTES, || source.fetch_system_attributes(), None)
            .await?;
        Ok(value)
    }

    /// Caches a user's profile and group memberships.
    pub async fn warm_user(&self, user_id: &str) -> Result<()> {
        let source = &self.source;
        let user = self.registry.user();

        user.get_or_set(&keys::user(user_id), || source.fetch_user(user_id), None)
            .await?;
        user.get_or_set(
            &keys::user_groups(user_id),
            || source.fetch_user_groups(user_id),
            None,
        )
        .await?;

        debug!(user_id, "Warmed user cache");
        Ok(())
    }

    /// Caches the unfiltered offer listing.
    pub async fn warm_offers(&self) -> Result<()> {
        self.offers(&json!({})).await?;
        Ok(())
    }

    /// Returns the offer listing for `filters`, fetching it on a miss.
    pub async fn offers(&self, filters: &Value) -> Result<Value> {
        let source = &self.source;
        let value = self
            .registry
            .api()
            .get_or_set(&keys::offers(filters), || source.fetch_offers(filters), None)
            .await?;
        Ok(value)
    }
}
