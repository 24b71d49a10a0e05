//! Source vocabulary shared by the router, the adapters and the gateway.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a backing store.
///
/// Adding a store means adding a variant here, a keyword entry in the routing
/// configuration and an adapter binding in `datagate-sources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKey {
    RelationalUser,
    RelationalOrder,
    DocumentProject,
    ExternalCountry,
    Cache,
}

impl SourceKey {
    /// Every key, in declaration order.
    pub const ALL: [SourceKey; 5] = [
        SourceKey::RelationalUser,
        SourceKey::RelationalOrder,
        SourceKey::DocumentProject,
        SourceKey::ExternalCountry,
        SourceKey::Cache,
    ];

    /// Parse a source key from its canonical or legacy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "relational-user" | "postgresql_user" | "user" => Some(Self::RelationalUser),
            "relational-order" | "postgresql_order" | "order" => Some(Self::RelationalOrder),
            "document-project" | "mongodb_project" | "project" => Some(Self::DocumentProject),
            "external-country" | "rest_api_country" | "country" => Some(Self::ExternalCountry),
            "cache" | "redis_data" => Some(Self::Cache),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelationalUser => "relational-user",
            Self::RelationalOrder => "relational-order",
            Self::DocumentProject => "document-project",
            Self::ExternalCountry => "external-country",
            Self::Cache => "cache",
        }
    }

    /// Tags used when rendering this source's output.
    pub fn tag(&self) -> SourceTag {
        match self {
            Self::RelationalUser => SourceTag::new("PG_USER", "PG_ERROR", "user"),
            Self::RelationalOrder => SourceTag::new("PG_ORDER", "PG_ERROR", "order"),
            Self::DocumentProject => SourceTag::new("MONGO_PROJECT", "MONGO_ERROR", "project"),
            Self::ExternalCountry => SourceTag::new("API_COUNTRY", "API_ERROR", "country"),
            Self::Cache => SourceTag::new("CACHE_DATA", "CACHE_ERROR", "cached"),
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line prefixes and entity noun for a source's formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTag {
    /// Prefix of record and empty-result lines (e.g. `PG_USER`)
    pub record: &'static str,

    /// Prefix of failure lines (e.g. `PG_ERROR`)
    pub error: &'static str,

    /// Entity noun used in sentinels (e.g. `user`)
    pub entity: &'static str,
}

impl SourceTag {
    pub const fn new(record: &'static str, error: &'static str, entity: &'static str) -> Self {
        Self {
            record,
            error,
            entity,
        }
    }

    /// `<TAG>: No relevant <entity> data found.`
    pub fn empty_line(&self) -> String {
        format!("{}: No relevant {} data found.", self.record, self.entity)
    }

    /// `<ERROR_TAG>: Could not retrieve <entity> data. Error: <cause>`
    pub fn error_line(&self, cause: &str) -> String {
        format!(
            "{}: Could not retrieve {} data. Error: {}",
            self.error, self.entity, cause
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_legacy_names() {
        for key in SourceKey::ALL {
            assert_eq!(SourceKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(
            SourceKey::parse("PostgreSQL_User"),
            Some(SourceKey::RelationalUser)
        );
        assert_eq!(
            SourceKey::parse("MongoDB_Project"),
            Some(SourceKey::DocumentProject)
        );
        assert_eq!(SourceKey::parse("Redis_Data"), Some(SourceKey::Cache));
        assert_eq!(SourceKey::parse("warehouse"), None);
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&SourceKey::ExternalCountry).unwrap();
        assert_eq!(json, "\"external-country\"");

        let key: SourceKey = serde_yaml::from_str("document-project").unwrap();
        assert_eq!(key, SourceKey::DocumentProject);
    }

    #[test]
    fn test_sentinel_lines() {
        let tag = SourceKey::RelationalUser.tag();
        assert_eq!(tag.empty_line(), "PG_USER: No relevant user data found.");
        assert_eq!(
            tag.error_line("connection refused"),
            "PG_ERROR: Could not retrieve user data. Error: connection refused"
        );
        assert_eq!(
            SourceKey::DocumentProject.tag().empty_line(),
            "MONGO_PROJECT: No relevant project data found."
        );
    }
}
