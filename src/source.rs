//! Data Source Module
//!
//! The upstream the caches sit in front of. Production callers plug in their
//! own database client; `FixtureSource` serves a static JSON document.

use std::path::Path;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::{CacheError, Result};

// == Data Source ==
/// Upstream fetches the warmer knows how to cache.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_user(&self, user_id: &str) -> anyhow::Result<Value>;

    async fn fetch_user_groups(&self, user_id: &str) -> anyhow::Result<Value>;

    /// Offers whose fields equal every field of `filters`.
    async fn fetch_offers(&self, filters: &Value) -> anyhow::Result<Value>;

    async fn fetch_system_attributes(&self) -> anyhow::Result<Value>;
}

// == Fixture Source ==
/// Serves a JSON document shaped like:
///
/// ```json
/// {
///   "users": { "<id>": { ... } },
///   "user_groups": { "<id>": [ ... ] },
///   "offers": [ { ... } ],
///   "system_attributes": { ... }
/// }
/// ```
///
/// Missing sections read as empty.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    document: Value,
}

impl FixtureSource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Loads the document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CacheError::Fixture(format!("{}: {e}", path.display())))?;
        let document = serde_json::from_str(&raw)
            .map_err(|e| CacheError::Fixture(format!("{}: {e}", path.display())))?;
        Ok(Self::new(document))
    }

    fn section(&self, name: &str) -> &Value {
        &self.document[name]
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    async fn fetch_user(&self, user_id: &str) -> anyhow::Result<Value> {
        self.section("users")
            .get(user_id)
            .cloned()
            .ok_or_else(|| anyhow!("user {user_id} not found"))
    }

    async fn fetch_user_groups(&self, user_id: &str) -> anyhow::Result<Value> {
        Ok(self
            .section("user_groups")
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    async fn fetch_offers(&self, filters: &Value) -> anyhow::Result<Value> {
        let empty = Map::new();
        let filters = filters.as_object().unwrap_or(&empty);
        let offers = self
            .section("offers")
            .as_array()
            .map(|offers| {
                offers
                    .iter()
                    .filter(|offer| filters.iter().all(|(field, want)| &offer[field] == want))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(Value::Array(offers))
    }

    async fn fetch_system_attributes(&self) -> anyhow::Result<Value> {
        match self.section("system_attributes") {
            Value::Null => Ok(json!({})),
            attributes => Ok(attributes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture() -> FixtureSource {
        FixtureSource::new(json!({
            "users": { "u1": { "name": "Ada", "role": "investor" } },
            "user_groups": { "u1": ["g1"] },
            "offers": [
                { "id": "p1", "status": "open", "sector": "tech" },
                { "id": "p2", "status": "closed", "sector": "tech" },
                { "id": "p3", "status": "open", "sector": "food" }
            ],
            "system_attributes": { "currency": "EUR" }
        }))
    }

    #[tokio::test]
    async fn test_fetch_user() {
        let source = fixture();
        assert_eq!(source.fetch_user("u1").await.unwrap()["name"], "Ada");
        assert!(source.fetch_user("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_user_groups_defaults_to_empty() {
        let source = fixture();
        assert_eq!(source.fetch_user_groups("u1").await.unwrap(), json!(["g1"]));
        assert_eq!(source.fetch_user_groups("u2").await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_fetch_offers_applies_filters() {
        let source = fixture();
        let all = source.fetch_offers(&json!({})).await.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 3);

        let open_tech = source
            .fetch_offers(&json!({"status": "open", "sector": "tech"}))
            .await
            .unwrap();
        assert_eq!(open_tech, json!([{ "id": "p1", "status": "open", "sector": "tech" }]));
    }

    #[tokio::test]
    async fn test_empty_fixture() {
        let source = FixtureSource::default();
        assert_eq!(source.fetch_offers(&json!({})).await.unwrap(), json!([]));
        assert_eq!(source.fetch_system_attributes().await.unwrap(), json!({}));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"system_attributes": {{"currency": "USD"}}}}"#).unwrap();

        let source = FixtureSource::from_path(file.path()).unwrap();
        assert_eq!(source.section("system_attributes")["currency"], "USD");
    }

    #[test]
    fn test_from_path_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = FixtureSource::from_path(file.path());
        assert!(matches!(result, Err(CacheError::Fixture(_))));
    }
}
