//! Membership domain models
//!
//! This module provides the membership entities linking users to each level
//! of the tenancy tree. Each row carries exactly one role from that level's
//! closed role set, and at most one row may exist per (scope, user) pair —
//! the storage layer enforces that as a uniqueness constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskdeck_rbac::{OrgRole, ProjectRole, TeamRole};

/// Organization membership linking a user to an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use taskdeck_org::OrganizationMember;
/// use taskdeck_rbac::OrgRole;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let member = OrganizationMember::new(org_id, user_id, OrgRole::Admin);
/// assert_eq!(member.role, OrgRole::Admin);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: OrgRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl OrganizationMember {
    /// Creates a new organization membership.
    pub fn new(organization_id: Uuid, user_id: Uuid, role: OrgRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Team membership linking a user to a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique membership ID
    pub id: Uuid,

    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the team
    pub role: TeamRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Creates a new team membership.
    pub fn new(team_id: Uuid, user_id: Uuid, role: TeamRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            team_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Project membership linking a user to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    /// Unique membership ID
    pub id: Uuid,

    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: ProjectRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Creates a new project membership.
    pub fn new(project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_member_creation() {
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let member = OrganizationMember::new(org_id, user_id, OrgRole::Owner);

        assert_eq!(member.organization_id, org_id);
        assert_eq!(member.user_id, user_id);
        assert_eq!(member.role, OrgRole::Owner);
    }

    #[test]
    fn test_team_member_creation() {
        let team_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let member = TeamMember::new(team_id, user_id, TeamRole::Lead);

        assert_eq!(member.team_id, team_id);
        assert_eq!(member.role, TeamRole::Lead);
    }

    #[test]
    fn test_project_member_creation() {
        let project_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let member = ProjectMember::new(project_id, user_id, ProjectRole::Contributor);

        assert_eq!(member.project_id, project_id);
        assert_eq!(member.role, ProjectRole::Contributor);
    }
}
