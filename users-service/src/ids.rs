//! User identifiers
//!
//! Users are identified by random (v4) UUIDs. The repository is the only
//! component that mints new identifiers; everything else parses or compares them.
//!
//! ```rust
//! use users_service::ids::UserId;
//! use std::str::FromStr;
//!
//! let id = UserId::new();
//! assert!(!id.is_nil());
//!
//! let parsed = UserId::from_str(&id.to_string()).unwrap();
//! assert_eq!(parsed, id);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a stored user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero identifier, used by callers that have no id yet
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the all-zero identifier
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_ids_are_unique() {
        let ids: HashSet<UserId> = (0..1000).map(|_| UserId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_nil() {
        assert!(UserId::nil().is_nil());
        assert!(!UserId::new().is_nil());
    }

    #[test]
    fn test_parse_roundtrip_through_display() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id: UserId = "6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f\"");
    }
}
