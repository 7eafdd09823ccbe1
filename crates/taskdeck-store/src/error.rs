//! Error types for storage operations

use thiserror::Error;

/// Uniqueness constraints enforced by every backend.
///
/// Races between concurrent requests (two invites for the same email, two
/// adds of the same user to the same team) are resolved by these constraints:
/// the losing transaction gets a [`StoreError::UniqueViolation`] naming the
/// constraint, and the service layer maps it to its domain duplicate error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Organization slug, unique across the platform
    OrganizationSlug,
    /// Team name, unique within its organization
    TeamName,
    /// Project name, unique within its team
    ProjectName,
    /// One organization membership per (organization, user)
    OrganizationMember,
    /// One team membership per (team, user)
    TeamMember,
    /// One project membership per (project, user)
    ProjectMember,
    /// Invitation token, unique across the platform
    InvitationToken,
}

impl Constraint {
    /// Constraint name as a backend would report it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::OrganizationSlug => "organizations_slug_key",
            Constraint::TeamName => "teams_organization_id_name_key",
            Constraint::ProjectName => "projects_team_id_name_key",
            Constraint::OrganizationMember => "organization_members_org_user_key",
            Constraint::TeamMember => "team_members_team_user_key",
            Constraint::ProjectMember => "project_members_project_user_key",
            Constraint::InvitationToken => "invitations_token_key",
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected a write. Recoverable: the service
    /// layer translates it into the matching domain duplicate error.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(Constraint),

    /// The backend is unreachable or failed mid-operation. Unrecoverable at
    /// this layer; surfaces unchanged to the application boundary.
    #[error("storage connection error: {0}")]
    Connection(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
