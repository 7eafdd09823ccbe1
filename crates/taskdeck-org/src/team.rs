//! Team domain model
//!
//! Teams group people and projects inside an organization. A team's lifecycle
//! is strictly nested inside its organization's lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team within an organization.
///
/// Team names are unique within their organization. The owning organization
/// is immutable for the life of the team.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use taskdeck_org::Team;
///
/// let org_id = Uuid::now_v7();
/// let creator = Uuid::now_v7();
/// let team = Team::new(org_id, "Engineering", creator);
/// assert_eq!(team.organization_id, org_id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier for the team
    pub id: Uuid,

    /// Owning organization (immutable)
    pub organization_id: Uuid,

    /// Human-readable name (unique within the organization)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// User who created the team
    pub created_by: Uuid,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; `None` means active
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Team {
    /// Creates a new active team.
    pub fn new(organization_id: Uuid, name: impl Into<String>, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            name: name.into(),
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

    /// Check whether the team is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
