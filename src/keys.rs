//! Cache key registry.
//!
//! Keys follow a `namespace:identifier` layout; prefix invalidation relies on
//! the namespace and the colon.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

/// Namespace shared by every offer listing key.
pub const OFFERS_PREFIX: &str = "offers:";

/// Key of the system attributes document in the static domain.
pub const SYSTEM_ATTRIBUTES: &str = "system:attributes";

/// Key of a user profile.
pub fn user(user_id: &str) -> String {
    format!("user:{user_id}")
}

/// Key of a user's group memberships.
pub fn user_groups(user_id: &str) -> String {
    format!("user:{user_id}:groups")
}

/// Key of a project document.
pub fn project(project_id: &str) -> String {
    format!("project:{project_id}")
}

/// Key of a group document.
pub fn group(group_id: &str) -> String {
    format!("group:{group_id}")
}

/// Key of an offer listing for the given filter set.
///
/// Filters are JSON-encoded; structs and `BTreeMap`s encode deterministically.
/// Filters JSON cannot represent fall back to their `Debug` form.
pub fn offers<F: Serialize + fmt::Debug + ?Sized>(filters: &F) -> String {
    match serde_json::to_string(filters) {
        Ok(encoded) => format!("{OFFERS_PREFIX}{encoded}"),
        Err(e) => {
            warn!(error = %e, "Offer filters are not JSON-encodable; keying by Debug form");
            format!("{OFFERS_PREFIX}{filters:?}")
        }
    }
}

/// Pattern matching every offer listing key.
pub fn offers_pattern() -> Regex {
    Regex::new(&format!("^{}", regex::escape(OFFERS_PREFIX))).expect("offers prefix is a valid pattern")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_entity_keys() {
        assert_eq!(user("u1"), "user:u1");
        assert_eq!(user_groups("u1"), "user:u1:groups");
        assert_eq!(project("42"), "project:42");
        assert_eq!(group("g7"), "group:g7");
    }

    #[test]
    fn test_offers_key_encodes_filters() {
        assert_eq!(offers(&json!({})), "offers:{}");

        let mut filters = BTreeMap::new();
        filters.insert("status", "open");
        filters.insert("sector", "tech");
        assert_eq!(offers(&filters), r#"offers:{"sector":"tech","status":"open"}"#);
    }

    #[test]
    fn test_offers_key_falls_back_for_non_json_filters() {
        // Tuple map keys cannot be encoded as JSON object keys
        let open: BTreeMap<(u8, u8), &str> = BTreeMap::from([((1, 2), "open")]);
        let closed: BTreeMap<(u8, u8), &str> = BTreeMap::from([((1, 2), "closed")]);

        let open_key = offers(&open);
        let closed_key = offers(&closed);

        assert!(open_key.starts_with(OFFERS_PREFIX));
        assert_ne!(open_key, OFFERS_PREFIX);
        assert_ne!(open_key, closed_key);
        assert!(offers_pattern().is_match(&open_key));
    }

    #[test]
    fn test_offers_pattern_matches_only_the_namespace() {
        let pattern = offers_pattern();
        assert!(pattern.is_match(&offers(&json!({"status": "open"}))));
        assert!(!pattern.is_match("project:offers:1"));
        assert!(!pattern.is_match(SYSTEM_ATTRIBUTES));
        assert!(!pattern.is_match(&user("offers")));
    }
}
