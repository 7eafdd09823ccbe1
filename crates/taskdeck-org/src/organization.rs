//! Organization domain model
//!
//! This module provides the core Organization entity. Organizations are the
//! top-level tenant entities; everything below them (teams, projects, tasks,
//! memberships, invitations, audit rows) is transitively owned by exactly one
//! organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization represents a tenant in the multi-tenant system.
///
/// Users can belong to multiple organizations with different roles.
/// The creating user becomes the organization's first Owner member; ownership
/// itself lives in the membership rows, not here.
///
/// # Architecture
///
/// ```text
/// Organization
///   ├─ Members (via OrganizationMember)
///   ├─ Teams
///   │    └─ Projects
///   │         └─ Tasks
///   ├─ Invitations
///   └─ Audit trail
/// ```
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use taskdeck_org::Organization;
///
/// let creator = Uuid::now_v7();
/// let org = Organization::new("Acme Corp", "acme-corp", creator);
/// assert_eq!(org.name, "Acme Corp");
/// assert!(!org.is_deleted());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug (unique across the platform)
    pub slug: String,

    /// Optional description
    pub description: Option<String>,

    /// User who created the organization
    pub created_by: Uuid,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; `None` means active
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Organization {
    /// Creates a new active organization.
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `slug` - URL-friendly slug (must be unique)
    /// * `created_by` - The user creating the organization
    pub fn new(name: impl Into<String>, slug: impl Into<String>, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check whether the organization is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
