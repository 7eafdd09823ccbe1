//! Invitation service
//!
//! Issues, looks up, accepts, and revokes the time-boxed single-use tokens
//! that onboard new members. Token lookup is unauthenticated — possession of
//! the token is the credential. One-time use is enforced by the acceptance
//! stamp inside the same transaction that creates the memberships, so two
//! racing accepts cannot both win.

use std::sync::Arc;

use base64::Engine;
use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use taskdeck_auth::{require_org_role, TenantContext};
use taskdeck_org::{
    AuditRecord, Invitation, InvitationStatus, OrganizationMember, ProjectGrant, ProjectMember,
    TeamGrant, TeamMember,
};
use taskdeck_rbac::{AuditAction, OrgRole, ResourceKind};
use taskdeck_store::{Store, StoreTx};

use crate::error::{ServiceError, ServiceResult};

/// Input for creating an invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitation {
    /// Invitee email; the invitee need not exist yet
    pub email: String,
    /// Organization role granted on acceptance
    pub role: OrgRole,
    /// Optional team grant applied on acceptance
    pub team: Option<TeamGrant>,
    /// Optional project grant applied on acceptance
    pub project: Option<ProjectGrant>,
}

/// Generate a 256-bit invitation token, URL-safe encoded without padding.
///
/// Uniqueness is guaranteed by the store constraint, not by entropy — the
/// entropy only makes collisions (and guessing) vanishingly unlikely.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Invitation lifecycle operations.
pub struct InvitationService {
    store: Arc<dyn Store>,
}

impl InvitationService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Issue an invitation. Requires organization Admin or above; referenced
    /// team/project grants must resolve to active entities in the org.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateInvitation,
    ) -> ServiceResult<Invitation> {
        require_org_role(ctx, OrgRole::Admin)?;
        let mut tx = self.store.begin().await?;

        tx.organization(ctx.organization_id)
            .await?
            .filter(|o| !o.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;
        if let Some(grant) = &input.team {
            tx.team(ctx.organization_id, grant.team_id)
                .await?
                .filter(|t| !t.is_deleted())
                .ok_or(ServiceError::NotFound(ResourceKind::Team))?;
        }
        if let Some(grant) = &input.project {
            tx.project(ctx.organization_id, grant.project_id)
                .await?
                .filter(|p| !p.is_deleted())
                .ok_or(ServiceError::NotFound(ResourceKind::Project))?;
        }

        let mut invitation = Invitation::new(
            ctx.organization_id,
            input.email,
            input.role,
            generate_token(),
            ctx.user_id,
        );
        invitation.team = input.team;
        invitation.project = input.project;

        tx.insert_invitation(&invitation).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Create,
            ResourceKind::Invitation,
            invitation.id,
            json!({ "email": &invitation.email, "role": invitation.role.as_str() }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(
            org_id = %ctx.organization_id,
            invitation_id = %invitation.id,
            "invitation created"
        );
        Ok(invitation)
    }

    /// Look up an invitation by token. Unauthenticated.
    pub async fn get_by_token(&self, token: &str) -> ServiceResult<Invitation> {
        let tx = self.store.begin().await?;
        tx.invitation_by_token(token)
            .await?
            .ok_or(ServiceError::InvitationNotFound)
    }

    /// Accept an invitation, creating the granted memberships and stamping
    /// the row.
    ///
    /// One-time use is independent of expiry: an already-accepted invitation
    /// fails `InvitationAlreadyAccepted` even when it has also expired.
    pub async fn accept(&self, token: &str, user_id: Uuid) -> ServiceResult<Invitation> {
        let mut tx = self.store.begin().await?;

        let mut invitation = tx
            .invitation_by_token(token)
            .await?
            .ok_or(ServiceError::InvitationNotFound)?;
        if invitation.is_accepted() {
            return Err(ServiceError::InvitationAlreadyAccepted);
        }
        if invitation.is_expired() {
            return Err(ServiceError::InvitationExpired);
        }

        let org_id = invitation.organization_id;
        tx.organization(org_id)
            .await?
            .filter(|o| !o.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;

        tx.insert_org_member(&OrganizationMember::new(org_id, user_id, invitation.role))
            .await?;
        if let Some(grant) = invitation.team {
            tx.team(org_id, grant.team_id)
                .await?
                .filter(|t| !t.is_deleted())
                .ok_or(ServiceError::NotFound(ResourceKind::Team))?;
            tx.insert_team_member(&TeamMember::new(grant.team_id, user_id, grant.role))
                .await?;
        }
        if let Some(grant) = invitation.project {
            let project = tx
                .project(org_id, grant.project_id)
                .await?
                .filter(|p| !p.is_deleted())
                .ok_or(ServiceError::NotFound(ResourceKind::Project))?;
            // A project grant without a matching team membership (own grant
            // or pre-existing) violates the prerequisite rule.
            if tx
                .team_member(org_id, project.team_id, user_id)
                .await?
                .is_none()
            {
                return Err(ServiceError::PrerequisiteMembershipMissing {
                    parent: ResourceKind::Team,
                    child: ResourceKind::Project,
                });
            }
            tx.insert_project_member(&ProjectMember::new(grant.project_id, user_id, grant.role))
                .await?;
        }

        invitation.accepted_at = Some(Utc::now());
        invitation.accepted_by = Some(user_id);
        tx.update_invitation(&invitation).await?;
        tx.append_audit(&AuditRecord::new(
            org_id,
            Some(user_id),
            AuditAction::AcceptInvitation,
            ResourceKind::Invitation,
            invitation.id,
            json!({ "email": &invitation.email, "role": invitation.role.as_str() }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(
            org_id = %org_id,
            invitation_id = %invitation.id,
            "invitation accepted"
        );
        Ok(invitation)
    }

    /// Revoke a pending invitation, deleting the row. Requires organization
    /// Admin or above; an accepted invitation cannot be revoked.
    pub async fn revoke(&self, ctx: &TenantContext, invitation_id: Uuid) -> ServiceResult<()> {
        require_org_role(ctx, OrgRole::Admin)?;
        let mut tx = self.store.begin().await?;

        let invitation = tx
            .invitation(ctx.organization_id, invitation_id)
            .await?
            .ok_or(ServiceError::InvitationNotFound)?;
        if invitation.is_accepted() {
            return Err(ServiceError::InvitationAlreadyAccepted);
        }

        tx.delete_invitation(ctx.organization_id, invitation_id)
            .await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::RevokeInvitation,
            ResourceKind::Invitation,
            invitation.id,
            json!({ "email": &invitation.email }),
        ))
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// List the organization's invitations, newest first, optionally
    /// filtered by derived status.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        status: Option<InvitationStatus>,
    ) -> ServiceResult<Vec<Invitation>> {
        let tx = self.store.begin().await?;
        let mut rows = tx.invitations(ctx.organization_id).await?;
        if let Some(status) = status {
            rows.retain(|i| i.status() == status);
        }
        Ok(rows)
    }
}
