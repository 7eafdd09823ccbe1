//! Tenant context resolution
//!
//! A tenant context is the per-request bundle {user, organization, team?,
//! project?, roles} derived from a verified token plus current membership
//! state. The token's scope claims are hints only: membership is re-validated
//! against the store on every request, and nothing here is cached across
//! requests — a restart or crash loses no authorization state.

use std::sync::Arc;

use uuid::Uuid;

use taskdeck_rbac::{OrgRole, ProjectRole, TeamRole};
use taskdeck_store::{Store, StoreTx};

use crate::claims::AccessClaims;
use crate::error::{AuthError, AuthResult};
use crate::jwt::JwtService;

/// The caller's resolved scope for one request.
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// Authenticated user
    pub user_id: Uuid,

    /// Active organization
    pub organization_id: Uuid,

    /// The user's role in the active organization
    pub org_role: OrgRole,

    /// Active team, when the token carries one
    pub team_id: Option<Uuid>,

    /// The user's role in the active team, when they hold a membership
    pub team_role: Option<TeamRole>,

    /// Active project, when the token carries one
    pub project_id: Option<Uuid>,

    /// The user's role in the active project, when they hold a membership
    pub project_role: Option<ProjectRole>,
}

/// Resolves bearer tokens into tenant contexts.
///
/// Stateless: holds only its configuration (the JWT verifier) and a handle to
/// the store. Every call re-derives the context from the token and current
/// membership rows.
pub struct TenantResolver {
    jwt: JwtService,
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolver")
            .field("jwt", &self.jwt)
            .finish()
    }
}

impl TenantResolver {
    /// Create a resolver from an explicit verifier configuration and a store
    /// handle.
    pub fn new(jwt: JwtService, store: Arc<dyn Store>) -> Self {
        Self { jwt, store }
    }

    /// Resolve a bearer token into a tenant context.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenExpired`] / [`AuthError::InvalidToken`] from
    ///   signature validation
    /// - [`AuthError::MissingTenantContext`] if the token carries no
    ///   organization claim
    /// - [`AuthError::InvalidTenantContext`] if the organization does not
    ///   exist, the caller is not currently a member of it, or a team/project
    ///   claim does not resolve inside it
    #[cfg(feature = "jwt")]
    pub async fn resolve(&self, token: &str) -> AuthResult<TenantContext> {
        let claims = self.jwt.validate_token(token)?;
        let tx = self.store.begin().await?;
        // Read-only: the transaction is dropped, not committed.
        Self::resolve_claims(&claims, tx.as_ref()).await
    }

    /// Resolve verified claims inside an existing transaction.
    ///
    /// Services use this to re-validate membership inside the same
    /// transaction that performs their mutation.
    pub async fn resolve_claims(
        claims: &AccessClaims,
        tx: &dyn StoreTx,
    ) -> AuthResult<TenantContext> {
        let user_id = claims
            .user_id()
            .ok_or_else(|| AuthError::InvalidToken("Malformed subject claim".to_string()))?;
        let org_id = claims.org_id.ok_or(AuthError::MissingTenantContext)?;

        // A soft-deleted organization still resolves: administrators need a
        // context to recover it within the retention window.
        if tx.organization(org_id).await?.is_none() {
            return Err(AuthError::InvalidTenantContext);
        }
        let membership = tx
            .org_member(org_id, user_id)
            .await?
            .ok_or(AuthError::InvalidTenantContext)?;

        let mut team_role = None;
        if let Some(team_id) = claims.team_id {
            if tx.team(org_id, team_id).await?.is_none() {
                return Err(AuthError::InvalidTenantContext);
            }
            team_role = tx
                .team_member(org_id, team_id, user_id)
                .await?
                .map(|m| m.role);
        }

        let mut project_role = None;
        if let Some(project_id) = claims.project_id {
            if tx.project(org_id, project_id).await?.is_none() {
                return Err(AuthError::InvalidTenantContext);
            }
            project_role = tx
                .project_member(org_id, project_id, user_id)
                .await?
                .map(|m| m.role);
        }

        Ok(TenantContext {
            user_id,
            organization_id: org_id,
            org_role: membership.role,
            team_id: claims.team_id,
            team_role,
            project_id: claims.project_id,
            project_role,
        })
    }
}
