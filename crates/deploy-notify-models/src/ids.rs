//! Site identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a site, `site-<uuid>` when generated here.
///
/// Hosts may hand in their own ids; any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Generates a fresh id.
    pub fn new() -> Self {
        Self(format!("site-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SiteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SiteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids() {
        let id = SiteId::new();
        assert!(id.as_str().starts_with("site-"));
        assert_ne!(id, SiteId::new());
    }

    #[test]
    fn test_host_ids_kept_verbatim() {
        let id = SiteId::from(String::from("42"));
        assert_eq!(id.to_string(), "42");
        assert_eq!(SiteId::from("42"), id);
    }

    #[test]
    fn test_site_id_serializes_transparently() {
        let id = SiteId::from("site-abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"site-abc\"");

        let back: SiteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
