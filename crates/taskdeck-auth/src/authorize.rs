//! Authorization guards
//!
//! One checking function per level of the tenancy tree, each parameterized by
//! a minimum required role. This is the central authorization algorithm of
//! the system: evaluate from the top of the hierarchy down, short-circuiting
//! as soon as a sufficient higher-level role is found.
//!
//! ```text
//! org check:     org_role >= min
//! team check:    org Admin+            → grant
//!                team membership >= min
//! project check: org Admin+            → grant
//!                Lead of owning team   → grant
//!                project membership >= min
//! ```
//!
//! Denials carry the resource and the minimum required role, never the
//! caller's actual role.

use uuid::Uuid;

use taskdeck_org::Project;
use taskdeck_rbac::{OrgRole, ProjectRole, ResourceKind, TeamRole};
use taskdeck_store::StoreTx;

use crate::context::TenantContext;
use crate::error::{AuthError, AuthResult};

/// Require a minimum role in the active organization.
pub fn require_org_role(ctx: &TenantContext, min: OrgRole) -> AuthResult<()> {
    if ctx.org_role.meets(min) {
        return Ok(());
    }
    Err(AuthError::PermissionDenied {
        resource: ResourceKind::Organization,
        required: min.as_str(),
    })
}

/// Require a minimum role in a team, applying organization-level inheritance.
///
/// Organization Owners and Admins pass any team check without holding a team
/// membership. Passing `None` for the team fails with
/// [`AuthError::MissingTeamContext`] unless an inheriting role applies.
pub async fn require_team_role(
    tx: &dyn StoreTx,
    ctx: &TenantContext,
    team_id: Option<Uuid>,
    min: TeamRole,
) -> AuthResult<()> {
    if ctx.org_role.meets(OrgRole::Admin) {
        return Ok(());
    }
    let team_id = team_id.ok_or(AuthError::MissingTeamContext)?;
    match tx.team_member(ctx.organization_id, team_id, ctx.user_id).await? {
        Some(member) if member.role.meets(min) => Ok(()),
        _ => Err(AuthError::PermissionDenied {
            resource: ResourceKind::Team,
            required: min.as_str(),
        }),
    }
}

/// Require a minimum role in a project, applying two levels of inheritance.
///
/// Organization Owners and Admins pass any project check; so does the Lead of
/// the project's owning team. Passing `None` for the project fails with
/// [`AuthError::MissingProjectContext`] unless an inheriting role applies.
pub async fn require_project_role(
    tx: &dyn StoreTx,
    ctx: &TenantContext,
    project: Option<&Project>,
    min: ProjectRole,
) -> AuthResult<()> {
    if ctx.org_role.meets(OrgRole::Admin) {
        return Ok(());
    }
    let project = project.ok_or(AuthError::MissingProjectContext)?;
    if let Some(member) = tx
        .team_member(ctx.organization_id, project.team_id, ctx.user_id)
        .await?
    {
        if member.role.meets(TeamRole::Lead) {
            return Ok(());
        }
    }
    match tx
        .project_member(ctx.organization_id, project.id, ctx.user_id)
        .await?
    {
        Some(member) if member.role.meets(min) => Ok(()),
        _ => Err(AuthError::PermissionDenied {
            resource: ResourceKind::Project,
            required: min.as_str(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_org::{Project, ProjectMember, Team, TeamMember};
    use taskdeck_store::{MemoryStore, Store};

    fn ctx(org_id: Uuid, user_id: Uuid, org_role: OrgRole) -> TenantContext {
        TenantContext {
            user_id,
            organization_id: org_id,
            org_role,
            team_id: None,
            team_role: None,
            project_id: None,
            project_role: None,
        }
    }

    #[test]
    fn test_org_role_check() {
        let c = ctx(Uuid::now_v7(), Uuid::now_v7(), OrgRole::Admin);

        assert!(require_org_role(&c, OrgRole::Member).is_ok());
        assert!(require_org_role(&c, OrgRole::Admin).is_ok());
        assert!(matches!(
            require_org_role(&c, OrgRole::Owner),
            Err(AuthError::PermissionDenied {
                resource: ResourceKind::Organization,
                required: "owner",
            })
        ));
    }

    #[tokio::test]
    async fn test_org_admin_inherits_team_access() {
        let store = MemoryStore::new();
        let tx = store.begin().await.unwrap();
        let c = ctx(Uuid::now_v7(), Uuid::now_v7(), OrgRole::Admin);

        // No team membership row, not even a team id: inheritance wins.
        assert!(require_team_role(tx.as_ref(), &c, None, TeamRole::Lead)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_missing_team_context() {
        let store = MemoryStore::new();
        let tx = store.begin().await.unwrap();
        let c = ctx(Uuid::now_v7(), Uuid::now_v7(), OrgRole::Member);

        assert!(matches!(
            require_team_role(tx.as_ref(), &c, None, TeamRole::Member).await,
            Err(AuthError::MissingTeamContext)
        ));
    }

    #[tokio::test]
    async fn test_team_membership_checked_against_min() {
        let store = MemoryStore::new();
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let team = Team::new(org_id, "Eng", user_id);

        let mut tx = store.begin().await.unwrap();
        tx.insert_team(&team).await.unwrap();
        tx.insert_team_member(&TeamMember::new(team.id, user_id, TeamRole::Member))
            .await
            .unwrap();

        let c = ctx(org_id, user_id, OrgRole::Member);
        assert!(
            require_team_role(tx.as_ref(), &c, Some(team.id), TeamRole::Member)
                .await
                .is_ok()
        );
        assert!(matches!(
            require_team_role(tx.as_ref(), &c, Some(team.id), TeamRole::Lead).await,
            Err(AuthError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_owner_inherits_project_access_without_rows() {
        let store = MemoryStore::new();
        let tx = store.begin().await.unwrap();
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let project = Project::new(Uuid::now_v7(), org_id, "Launch", user_id);

        // Owner holds no TeamMember or ProjectMember row.
        let c = ctx(org_id, user_id, OrgRole::Owner);
        assert!(
            require_project_role(tx.as_ref(), &c, Some(&project), ProjectRole::Manager)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_team_lead_inherits_project_access() {
        let store = MemoryStore::new();
        let org_id = Uuid::now_v7();
        let lead = Uuid::now_v7();
        let team = Team::new(org_id, "Eng", lead);
        let project = Project::new(team.id, org_id, "Launch", lead);

        let mut tx = store.begin().await.unwrap();
        tx.insert_team(&team).await.unwrap();
        tx.insert_project(&project).await.unwrap();
        tx.insert_team_member(&TeamMember::new(team.id, lead, TeamRole::Lead))
            .await
            .unwrap();

        let c = ctx(org_id, lead, OrgRole::Member);
        assert!(
            require_project_role(tx.as_ref(), &c, Some(&project), ProjectRole::Manager)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_team_member_does_not_inherit_project_manager() {
        let store = MemoryStore::new();
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let team = Team::new(org_id, "Eng", user_id);
        let project = Project::new(team.id, org_id, "Launch", user_id);

        let mut tx = store.begin().await.unwrap();
        tx.insert_team(&team).await.unwrap();
        tx.insert_project(&project).await.unwrap();
        tx.insert_team_member(&TeamMember::new(team.id, user_id, TeamRole::Member))
            .await
            .unwrap();

        let c = ctx(org_id, user_id, OrgRole::Member);
        assert!(matches!(
            require_project_role(tx.as_ref(), &c, Some(&project), ProjectRole::Viewer).await,
            Err(AuthError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_project_membership_checked_against_min() {
        let store = MemoryStore::new();
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let team = Team::new(org_id, "Eng", user_id);
        let project = Project::new(team.id, org_id, "Launch", user_id);

        let mut tx = store.begin().await.unwrap();
        tx.insert_team(&team).await.unwrap();
        tx.insert_project(&project).await.unwrap();
        tx.insert_project_member(&ProjectMember::new(
            project.id,
            user_id,
            ProjectRole::Contributor,
        ))
        .await
        .unwrap();

        let c = ctx(org_id, user_id, OrgRole::Member);
        assert!(
            require_project_role(tx.as_ref(), &c, Some(&project), ProjectRole::Viewer)
                .await
                .is_ok()
        );
        assert!(matches!(
            require_project_role(tx.as_ref(), &c, Some(&project), ProjectRole::Manager).await,
            Err(AuthError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_role_monotonicity_at_every_level() {
        // If a role passes a check, every outranking role passes it too.
        let store = MemoryStore::new();
        let tx = store.begin().await.unwrap();
        let org_id = Uuid::now_v7();

        for min in OrgRole::all() {
            let mut passed = false;
            for actual in OrgRole::all() {
                let c = ctx(org_id, Uuid::now_v7(), actual);
                let ok = require_org_role(&c, min).is_ok();
                assert!(ok || !passed, "permissions must not shrink as rank grows");
                passed = passed || ok;
            }
        }

        // Team and project checks via org inheritance follow the same shape.
        for actual in OrgRole::all() {
            let c = ctx(org_id, Uuid::now_v7(), actual);
            let team_ok = require_team_role(tx.as_ref(), &c, None, TeamRole::Lead)
                .await
                .is_ok();
            assert_eq!(team_ok, actual.meets(OrgRole::Admin));
        }
    }
}
