//! Cache tag vocabulary.
//!
//! Cached query results are labeled with tags; mutations declare which tags
//! they invalidate. A tag is either a single entity (`kind/id`) or a kind's
//! list sentinel (`kind/LIST`), which stands for "any collection of this
//! kind". List queries provide the sentinel plus one id tag per returned
//! entity, so a mutation touching entity 7 also invalidates every cached
//! list that contained it.

use std::fmt;

/// The resource families the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Account records.
    User,
    /// Role definitions.
    Role,
    /// Permission definitions.
    Permission,
    /// User-to-role assignments.
    UserRole,
    /// Role-to-permission assignments.
    RolePermission,
    /// Active token sessions.
    Token,
}

impl ResourceKind {
    /// All resource kinds, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::User,
        Self::Role,
        Self::Permission,
        Self::UserRole,
        Self::RolePermission,
        Self::Token,
    ];

    /// Returns the canonical name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Role => "Role",
            Self::Permission => "Permission",
            Self::UserRole => "UserRole",
            Self::RolePermission => "RolePermission",
            Self::Token => "Token",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which slice of a resource kind a tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// Any collection of the kind.
    List,
    /// One entity, by id.
    Id(i64),
}

/// A cache label: one resource kind plus a key within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Resource family the tag belongs to.
    pub kind: ResourceKind,
    /// Entity id or the list sentinel.
    pub key: TagKey,
}

impl Tag {
    /// Creates the list-sentinel tag for a kind.
    #[must_use]
    pub fn list(kind: ResourceKind) -> Self {
        Self {
            kind,
            key: TagKey::List,
        }
    }

    /// Creates the tag for one entity of a kind.
    #[must_use]
    pub fn id(kind: ResourceKind, id: i64) -> Self {
        Self {
            kind,
            key: TagKey::Id(id),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            TagKey::List => write!(f, "{}/LIST", self.kind),
            TagKey::Id(id) => write!(f, "{}/{id}", self.kind),
        }
    }
}

/// Returns `true` when a query's provided tags overlap a mutation's
/// invalidated tags.
#[must_use]
pub fn tags_intersect(provided: &[Tag], invalidated: &[Tag]) -> bool {
    provided.iter().any(|tag| invalidated.contains(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::list(ResourceKind::User).to_string(), "User/LIST");
        assert_eq!(Tag::id(ResourceKind::Role, 42).to_string(), "Role/42");
    }

    #[test]
    fn test_kind_names_are_unique() {
        let mut names: Vec<&str> = ResourceKind::ALL.iter().map(|kind| kind.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_tag_equality() {
        assert_eq!(Tag::list(ResourceKind::User), Tag::list(ResourceKind::User));
        assert_ne!(Tag::list(ResourceKind::User), Tag::list(ResourceKind::Role));
        assert_ne!(
            Tag::id(ResourceKind::User, 1),
            Tag::id(ResourceKind::User, 2)
        );
        assert_ne!(Tag::id(ResourceKind::User, 1), Tag::list(ResourceKind::User));
    }

    #[test]
    fn test_tags_intersect() {
        let provided = [
            Tag::id(ResourceKind::User, 1),
            Tag::id(ResourceKind::User, 2),
            Tag::list(ResourceKind::User),
        ];

        assert!(tags_intersect(&provided, &[Tag::list(ResourceKind::User)]));
        assert!(tags_intersect(&provided, &[Tag::id(ResourceKind::User, 2)]));
        assert!(!tags_intersect(&provided, &[Tag::id(ResourceKind::User, 3)]));
        assert!(!tags_intersect(&provided, &[Tag::list(ResourceKind::Role)]));
        assert!(!tags_intersect(&provided, &[]));
    }
}
