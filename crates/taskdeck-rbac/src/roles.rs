//! Role hierarchies
//!
//! This module defines the three closed role vocabularies of the platform,
//! one per level of the tenancy tree, along with their numeric ranks.

use serde::{Deserialize, Serialize};

/// User role within an organization.
///
/// Roles are hierarchical, with each role inheriting the permissions of lower
/// roles. The hierarchy is: Member < Admin < Owner
///
/// # Permission Model
///
/// - **Member**: Read access to the organization and its teams/projects
/// - **Admin**: Can manage teams, projects, members, and invitations
/// - **Owner**: Full organization control, including deleting the organization
///
/// # Examples
///
/// ```
/// use taskdeck_rbac::OrgRole;
///
/// let role = OrgRole::Admin;
/// assert!(role.meets(OrgRole::Member));
/// assert!(!role.meets(OrgRole::Owner));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    /// Read access to organization resources
    Member = 1,

    /// Can manage teams, projects, members, and invitations
    Admin = 2,

    /// Full organization control
    Owner = 3,
}

impl OrgRole {
    /// Numeric rank of the role. Pure; higher outranks lower.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Check whether this role satisfies a minimum required role.
    ///
    /// # Returns
    ///
    /// `true` iff `rank(self) >= rank(required)`
    pub fn meets(&self, required: OrgRole) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(OrgRole)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdeck_rbac::OrgRole;
    ///
    /// assert_eq!(OrgRole::parse("admin"), Some(OrgRole::Admin));
    /// assert_eq!(OrgRole::parse("OWNER"), Some(OrgRole::Owner));
    /// assert_eq!(OrgRole::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }

    /// Get all roles at this level, lowest rank first.
    pub fn all() -> Vec<Self> {
        vec![Self::Member, Self::Admin, Self::Owner]
    }
}

impl Default for OrgRole {
    fn default() -> Self {
        Self::Member
    }
}

/// User role within a team.
///
/// The hierarchy is: Member < Lead
///
/// # Permission Model
///
/// - **Member**: Participates in the team and its projects
/// - **Lead**: Manages the team, its projects, and its member list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Participates in the team
    Member = 1,

    /// Manages the team and its projects
    Lead = 2,
}

impl TeamRole {
    /// Numeric rank of the role. Pure; higher outranks lower.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Check whether this role satisfies a minimum required role.
    pub fn meets(&self, required: TeamRole) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse role from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Lead => "lead",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Lead => "Lead",
        }
    }

    /// Get all roles at this level, lowest rank first.
    pub fn all() -> Vec<Self> {
        vec![Self::Member, Self::Lead]
    }
}

impl Default for TeamRole {
    fn default() -> Self {
        Self::Member
    }
}

/// User role within a project.
///
/// The hierarchy is: Viewer < Contributor < Manager
///
/// # Permission Model
///
/// - **Viewer**: Read-only access to the project and its tasks
/// - **Contributor**: Can create and edit tasks
/// - **Manager**: Manages project settings, members, and lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// Read-only access
    Viewer = 1,

    /// Can create and edit tasks
    Contributor = 2,

    /// Manages the project
    Manager = 3,
}

impl ProjectRole {
    /// Numeric rank of the role. Pure; higher outranks lower.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Check whether this role satisfies a minimum required role.
    pub fn meets(&self, required: ProjectRole) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse role from string representation (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdeck_rbac::ProjectRole;
    ///
    /// assert_eq!(ProjectRole::parse("manager"), Some(ProjectRole::Manager));
    /// assert_eq!(ProjectRole::parse("VIEWER"), Some(ProjectRole::Viewer));
    /// assert_eq!(ProjectRole::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "contributor" => Some(Self::Contributor),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Contributor => "contributor",
            Self::Manager => "manager",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Contributor => "Contributor",
            Self::Manager => "Manager",
        }
    }

    /// Get all roles at this level, lowest rank first.
    pub fn all() -> Vec<Self> {
        vec![Self::Viewer, Self::Contributor, Self::Manager]
    }
}

impl Default for ProjectRole {
    fn default() -> Self {
        Self::Viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_role_hierarchy() {
        assert!(OrgRole::Owner > OrgRole::Admin);
        assert!(OrgRole::Admin > OrgRole::Member);

        assert_eq!(OrgRole::Owner.rank(), 3);
        assert_eq!(OrgRole::Admin.rank(), 2);
        assert_eq!(OrgRole::Member.rank(), 1);
    }

    #[test]
    fn test_team_role_hierarchy() {
        assert!(TeamRole::Lead > TeamRole::Member);
        assert_eq!(TeamRole::Lead.rank(), 2);
        assert_eq!(TeamRole::Member.rank(), 1);
    }

    #[test]
    fn test_project_role_hierarchy() {
        assert!(ProjectRole::Manager > ProjectRole::Contributor);
        assert!(ProjectRole::Contributor > ProjectRole::Viewer);
    }

    #[test]
    fn test_meets_is_monotone() {
        // Every operation permitted for a lower role is permitted for a
        // higher one, across each closed set.
        for required in OrgRole::all() {
            for actual in OrgRole::all() {
                if actual.meets(required) {
                    for higher in OrgRole::all().into_iter().filter(|r| *r >= actual) {
                        assert!(higher.meets(required));
                    }
                }
            }
        }
        for required in TeamRole::all() {
            for actual in TeamRole::all().into_iter().filter(|r| r.meets(required)) {
                for higher in TeamRole::all().into_iter().filter(|r| *r >= actual) {
                    assert!(higher.meets(required));
                }
            }
        }
        for required in ProjectRole::all() {
            for actual in ProjectRole::all().into_iter().filter(|r| r.meets(required)) {
                for higher in ProjectRole::all().into_iter().filter(|r| *r >= actual) {
                    assert!(higher.meets(required));
                }
            }
        }
    }

    #[test]
    fn test_meets_reflexive() {
        assert!(OrgRole::Member.meets(OrgRole::Member));
        assert!(TeamRole::Lead.meets(TeamRole::Lead));
        assert!(ProjectRole::Viewer.meets(ProjectRole::Viewer));
    }

    #[test]
    fn test_org_role_parse() {
        assert_eq!(OrgRole::parse("owner"), Some(OrgRole::Owner));
        assert_eq!(OrgRole::parse("ADMIN"), Some(OrgRole::Admin));
        assert_eq!(OrgRole::parse("invalid"), None);
        assert_eq!(OrgRole::parse(""), None);
    }

    #[test]
    fn test_team_role_parse() {
        assert_eq!(TeamRole::parse("lead"), Some(TeamRole::Lead));
        assert_eq!(TeamRole::parse("Member"), Some(TeamRole::Member));
        assert_eq!(TeamRole::parse("manager"), None);
    }

    #[test]
    fn test_project_role_parse_round_trip() {
        for role in ProjectRole::all() {
            assert_eq!(ProjectRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(OrgRole::Owner.display_name(), "Owner");
        assert_eq!(TeamRole::Lead.display_name(), "Lead");
        assert_eq!(ProjectRole::Contributor.display_name(), "Contributor");
    }
}
