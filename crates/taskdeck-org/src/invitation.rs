//! Invitation domain model
//!
//! Invitations are time-boxed, single-use credentials that grant membership
//! on acceptance. The token is the credential: looking an invitation up by
//! token requires no authentication. One-time use is enforced by the
//! `accepted_at` stamp, not by deleting the row — an accepted invitation
//! remains as an audit artifact.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskdeck_rbac::{OrgRole, ProjectRole, TeamRole};

/// Fixed invitation lifetime: `expires_at = created_at + 7 days`.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// A team-scope grant carried by an invitation.
///
/// Id and role travel together so a half-formed grant cannot be expressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TeamGrant {
    /// Team the invitee joins on acceptance
    pub team_id: Uuid,
    /// Role granted within that team
    pub role: TeamRole,
}

/// A project-scope grant carried by an invitation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectGrant {
    /// Project the invitee joins on acceptance
    pub project_id: Uuid,
    /// Role granted within that project
    pub role: ProjectRole,
}

/// Derived lifecycle status of an invitation, used for list filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Not yet accepted and not expired
    Pending,
    /// Accepted (terminal; wins over expiry)
    Accepted,
    /// Past `expires_at` without acceptance
    Expired,
}

/// An invitation into an organization, optionally carrying team and project
/// grants.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use taskdeck_org::Invitation;
/// use taskdeck_rbac::OrgRole;
///
/// let org_id = Uuid::now_v7();
/// let inviter = Uuid::now_v7();
/// let invitation = Invitation::new(org_id, "carol@example.com", OrgRole::Member, "tok", inviter);
/// assert!(!invitation.is_expired());
/// assert!(!invitation.is_accepted());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique identifier for the invitation
    pub id: Uuid,

    /// Target organization
    pub organization_id: Uuid,

    /// Optional team grant applied on acceptance
    pub team: Option<TeamGrant>,

    /// Optional project grant applied on acceptance
    pub project: Option<ProjectGrant>,

    /// Invitee email (the invitee need not exist yet)
    pub email: String,

    /// Organization role granted on acceptance
    pub role: OrgRole,

    /// URL-safe token; possession is the credential. Globally unique.
    pub token: String,

    /// User who issued the invitation
    pub invited_by: Uuid,

    /// When the invitation was accepted; `None` while pending
    pub accepted_at: Option<DateTime<Utc>>,

    /// User who accepted the invitation
    pub accepted_by: Option<Uuid>,

    /// Hard expiry; acceptance after this instant fails
    pub expires_at: DateTime<Utc>,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a new pending invitation with the fixed 7-day expiry.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The target organization
    /// * `email` - The invitee email
    /// * `role` - Organization role granted on acceptance
    /// * `token` - Pre-generated URL-safe token
    /// * `invited_by` - The issuing user
    pub fn new(
        organization_id: Uuid,
        email: impl Into<String>,
        role: OrgRole,
        token: impl Into<String>,
        invited_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            team: None,
            project: None,
            email: email.into(),
            role,
            token: token.into(),
            invited_by,
            accepted_at: None,
            accepted_by: None,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            created_at: now,
        }
    }

    /// Attach a team grant.
    pub fn with_team(mut self, team_id: Uuid, role: TeamRole) -> Self {
        self.team = Some(TeamGrant { team_id, role });
        self
    }

    /// Attach a project grant.
    pub fn with_project(mut self, project_id: Uuid, role: ProjectRole) -> Self {
        self.project = Some(ProjectGrant { project_id, role });
        self
    }

    /// Check whether the invitation is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check whether the invitation has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// Derived lifecycle status. Acceptance wins over expiry: an accepted
    /// invitation stays `Accepted` even after `expires_at`.
    pub fn status(&self) -> InvitationStatus {
        if self.is_accepted() {
            InvitationStatus::Accepted
        } else if self.is_expired() {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> Invitation {
        Invitation::new(
            Uuid::now_v7(),
            "carol@example.com",
            OrgRole::Member,
            "token-value",
            Uuid::now_v7(),
        )
    }

    #[test]
    fn test_invitation_defaults() {
        let inv = invitation();

        assert_eq!(inv.email, "carol@example.com");
        assert_eq!(inv.role, OrgRole::Member);
        assert!(inv.team.is_none());
        assert!(inv.project.is_none());
        assert!(inv.accepted_at.is_none());
        assert_eq!(inv.status(), InvitationStatus::Pending);
        assert_eq!(
            inv.expires_at,
            inv.created_at + Duration::days(INVITATION_TTL_DAYS)
        );
    }

    #[test]
    fn test_invitation_with_grants() {
        let team_id = Uuid::now_v7();
        let project_id = Uuid::now_v7();
        let inv = invitation()
            .with_team(team_id, TeamRole::Member)
            .with_project(project_id, ProjectRole::Viewer);

        assert_eq!(inv.team.unwrap().team_id, team_id);
        assert_eq!(inv.project.unwrap().project_id, project_id);
    }

    #[test]
    fn test_expired_status() {
        let mut inv = invitation();
        inv.expires_at = Utc::now() - Duration::hours(1);

        assert!(inv.is_expired());
        assert_eq!(inv.status(), InvitationStatus::Expired);
    }

    #[test]
    fn test_accepted_wins_over_expired() {
        let mut inv = invitation();
        inv.expires_at = Utc::now() - Duration::hours(1);
        inv.accepted_at = Some(Utc::now() - Duration::days(2));
        inv.accepted_by = Some(Uuid::now_v7());

        assert!(inv.is_expired());
        assert_eq!(inv.status(), InvitationStatus::Accepted);
    }
}
