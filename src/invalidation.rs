//! Cache Invalidation Module
//!
//! Translates domain events into key and pattern deletions across the named
//! cache domains, so callers never handle key formats themselves.
//!
//! Cross-domain sequences are not transactional. A partially applied
//! invalidation heals itself when the remaining entries expire.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::keys;
use crate::registry::CacheRegistry;

// == Invalidation Event ==
/// Domain events that affect cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationEvent {
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    /// A pledge changes its project's funding totals; the id is the project id
    PledgeCreated,
    UserUpdated,
    UserJoinedGroup,
    UserLeftGroup,
    GroupCreated,
    GroupUpdated,
    GroupDeleted,
    SystemAttributesUpdated,
    BulkOffersUpdated,
}

impl InvalidationEvent {
    const TABLE: [(&'static str, InvalidationEvent); 12] = [
        ("project_created", InvalidationEvent::ProjectCreated),
        ("project_updated", InvalidationEvent::ProjectUpdated),
        ("project_deleted", InvalidationEvent::ProjectDeleted),
        ("pledge_created", InvalidationEvent::PledgeCreated),
        ("user_updated", InvalidationEvent::UserUpdated),
        ("user_joined_group", InvalidationEvent::UserJoinedGroup),
        ("user_left_group", InvalidationEvent::UserLeftGroup),
        ("group_created", InvalidationEvent::GroupCreated),
        ("group_updated", InvalidationEvent::GroupUpdated),
        ("group_deleted", InvalidationEvent::GroupDeleted),
        ("system_attributes_updated", InvalidationEvent::SystemAttributesUpdated),
        ("bulk_offers_updated", InvalidationEvent::BulkOffersUpdated),
    ];

    /// Looks up an event by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, event)| *event)
    }

    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, event)| *event == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// True when the event cannot be applied without an entity id.
    pub fn requires_id(self) -> bool {
        !matches!(
            self,
            InvalidationEvent::SystemAttributesUpdated | InvalidationEvent::BulkOffersUpdated
        )
    }
}

/// Extra data some events carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationContext {
    /// Group affected by a membership change
    #[serde(default)]
    pub group_id: Option<String>,
}

impl InvalidationContext {
    pub fn group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
        }
    }
}

/// What `smart_invalidate` did. Used for logging and diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvalidationOutcome {
    /// False for unknown event types and events missing their id
    pub applied: bool,
    pub keys_removed: usize,
}

impl InvalidationOutcome {
    fn applied(keys_removed: usize) -> Self {
        Self {
            applied: true,
            keys_removed,
        }
    }
}

// == Invalidation Manager ==
/// Holds no state of its own beyond the registry it invalidates.
#[derive(Clone)]
pub struct InvalidationManager {
    registry: CacheRegistry,
    offers_pattern: Regex,
}

impl InvalidationManager {
    pub fn new(registry: CacheRegistry) -> Self {
        Self {
            registry,
            offers_pattern: keys::offers_pattern(),
        }
    }

    pub fn registry(&self) -> &CacheRegistry {
        &self.registry
    }

    /// Drops a user's profile and group-membership list.
    pub async fn invalidate_user_cache(&self, user_id: &str) -> usize {
        let user = self.registry.user();
        let removed = user.delete(&keys::user(user_id)).await as usize
            + user.delete(&keys::user_groups(user_id)).await as usize;
        debug!(user_id, removed, "Invalidated user cache");
        removed
    }

    /// Drops every offer listing. `reason` is only logged.
    pub async fn invalidate_offers_cache(&self, reason: Option<&str>) -> usize {
        let removed = self.registry.api().invalidate_pattern(&self.offers_pattern).await;
        info!(
            reason = reason.unwrap_or("unspecified"),
            removed, "Invalidated offers cache"
        );
        removed
    }

    /// Drops a project and every offer listing that may include it.
    pub async fn invalidate_project_cache(&self, project_id: &str) -> usize {
        let removed = self.registry.api().delete(&keys::project(project_id)).await as usize;
        debug!(project_id, removed, "Invalidated project cache");
        removed + self.invalidate_offers_cache(Some("project changed")).await
    }

    /// Drops a group and every offer listing that may be scoped to it.
    pub async fn invalidate_group_cache(&self, group_id: &str) -> usize {
        let removed = self
            .registry
            .static_data()
            .delete(&keys::group(group_id))
            .await as usize;
        debug!(group_id, removed, "Invalidated group cache");
        removed + self.invalidate_offers_cache(Some("group changed")).await
    }

    // == Smart Invalidate ==
    /// Applies the invalidation rules for a named event.
    ///
    /// Unknown event names, and known events missing the id they need, are
    /// logged and ignored.
    pub async fn smart_invalidate(
        &self,
        event_type: &str,
        id: Option<&str>,
        context: Option<&InvalidationContext>,
    ) -> InvalidationOutcome {
        let Some(event) = InvalidationEvent::parse(event_type) else {
            warn!(event_type, "Unknown cache invalidation event");
            return InvalidationOutcome::default();
        };

        let id = id.filter(|id| !id.is_empty());
        if event.requires_id() && id.is_none() {
            warn!(event_type, "Cache invalidation event is missing its id");
            return InvalidationOutcome::default();
        }
        let id = id.unwrap_or_default();

        let removed = match event {
            InvalidationEvent::ProjectCreated
            | InvalidationEvent::ProjectUpdated
            | InvalidationEvent::ProjectDeleted
            | InvalidationEvent::PledgeCreated => self.invalidate_project_cache(id).await,
            InvalidationEvent::UserUpdated => self.invalidate_user_cache(id).await,
            InvalidationEvent::UserJoinedGroup | InvalidationEvent::UserLeftGroup => {
                let mut removed = self.invalidate_user_cache(id).await;
                if let Some(group_id) = context.and_then(|c| c.group_id.as_deref()) {
                    removed += self.invalidate_group_cache(group_id).await;
                }
                removed
            }
            InvalidationEvent::GroupCreated
            | InvalidationEvent::GroupUpdated
            | InvalidationEvent::GroupDeleted => self.invalidate_group_cache(id).await,
            InvalidationEvent::SystemAttributesUpdated => {
                self.registry.static_data().delete(keys::SYSTEM_ATTRIBUTES).await as usize
            }
            InvalidationEvent::BulkOffersUpdated => {
                self.invalidate_offers_cache(Some(event.as_str())).await
            }
        };

        info!(event = event.as_str(), removed, "Applied cache invalidation");
        InvalidationOutcome::applied(removed)
    }

    /// Empties every domain unconditionally.
    pub async fn clear_all_caches(&self) {
        warn!("Clearing all caches");
        self.registry.clear_all().await;
    }
}
