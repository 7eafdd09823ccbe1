//! Project domain model
//!
//! Projects group related tasks inside a team. Each project carries a
//! denormalized copy of its organization id so any query can filter by tenant
//! with a single predicate, without traversing the team join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project within a team.
///
/// Project names are unique within their team.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use taskdeck_org::Project;
///
/// let org_id = Uuid::now_v7();
/// let team_id = Uuid::now_v7();
/// let creator = Uuid::now_v7();
/// let project = Project::new(team_id, org_id, "Launch", creator);
/// assert_eq!(project.organization_id, org_id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for the project
    pub id: Uuid,

    /// Owning team
    pub team_id: Uuid,

    /// Owning organization (denormalized from the team, for single-hop
    /// tenant filtering)
    pub organization_id: Uuid,

    /// Human-readable name (unique within the team)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// User who created the project
    pub created_by: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; `None` means active
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Creates a new active project.
    pub fn new(
        team_id: Uuid,
        organization_id: Uuid,
        name: impl Into<String>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            team_id,
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

    /// Check whether the project is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
