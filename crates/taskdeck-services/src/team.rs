//! Team service
//!
//! CRUD, membership management, and the soft-delete lifecycle for teams.
//! Creating a team takes organization Admin; managing one takes team Lead or
//! an inheriting organization role. The creator is not auto-added as a team
//! member.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use taskdeck_auth::{require_org_role, require_team_role, TenantContext};
use taskdeck_org::{AuditRecord, Team, TeamMember};
use taskdeck_rbac::{AuditAction, OrgRole, ResourceKind, TeamRole};
use taskdeck_store::{Store, StoreTx};

use crate::error::{ServiceError, ServiceResult};

/// Input for creating a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name (unique within the organization)
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Input for updating a team. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeam {
    /// New name (must stay unique within the organization)
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Team lifecycle and membership operations.
pub struct TeamService {
    store: Arc<dyn Store>,
}

impl TeamService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch a team row for a mutating operation, regardless of deletion
    /// state. The parent organization must still exist.
    async fn fetch(
        tx: &dyn StoreTx,
        ctx: &TenantContext,
        team_id: Uuid,
    ) -> ServiceResult<Team> {
        tx.team(ctx.organization_id, team_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Team))
    }

    /// Create a team. Requires organization Admin or above.
    ///
    /// The creator is NOT granted a team membership; organization-level
    /// inheritance already covers everything they need.
    pub async fn create(&self, ctx: &TenantContext, input: CreateTeam) -> ServiceResult<Team> {
        require_org_role(ctx, OrgRole::Admin)?;
        let mut tx = self.store.begin().await?;

        tx.organization(ctx.organization_id)
            .await?
            .filter(|o| !o.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;

        let mut team = Team::new(ctx.organization_id, input.name, ctx.user_id);
        team.description = input.description;
        tx.insert_team(&team).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Create,
            ResourceKind::Team,
            team.id,
            json!({ "name": &team.name }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(org_id = %ctx.organization_id, team_id = %team.id, "team created");
        Ok(team)
    }

    /// Fetch a team. Any organization member may read.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        include_deleted: bool,
    ) -> ServiceResult<Team> {
        let tx = self.store.begin().await?;
        let team = Self::fetch(tx.as_ref(), ctx, team_id).await?;
        if team.is_deleted() && !include_deleted {
            return Err(ServiceError::NotFound(ResourceKind::Team));
        }
        Ok(team)
    }

    /// List the organization's teams, newest first.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        include_deleted: bool,
    ) -> ServiceResult<Vec<Team>> {
        let tx = self.store.begin().await?;
        Ok(tx.teams(ctx.organization_id, include_deleted).await?)
    }

    /// Update team fields. Requires team Lead or an inheriting role.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        input: UpdateTeam,
    ) -> ServiceResult<Team> {
        let mut tx = self.store.begin().await?;
        let mut team = Self::fetch(tx.as_ref(), ctx, team_id).await?;
        if team.is_deleted() {
            return Err(ServiceError::NotFound(ResourceKind::Team));
        }
        require_team_role(tx.as_ref(), ctx, Some(team_id), TeamRole::Lead).await?;

        let mut changes = serde_json::Map::new();
        if let Some(name) = input.name {
            changes.insert("name".into(), json!({ "from": &team.name, "to": &name }));
            team.name = name;
        }
        if let Some(description) = input.description {
            changes.insert(
                "description".into(),
                json!({ "from": &team.description, "to": &description }),
            );
            team.description = Some(description);
        }
        team.updated_at = Utc::now();

        tx.update_team(&team).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Update,
            ResourceKind::Team,
            team.id,
            serde_json::Value::Object(changes),
        ))
        .await?;
        tx.commit().await?;
        Ok(team)
    }

    /// Soft-delete the team, cascading to its active projects and their
    /// tasks. Requires team Lead or an inheriting role.
    pub async fn soft_delete(&self, ctx: &TenantContext, team_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.store.begin().await?;
        let mut team = Self::fetch(tx.as_ref(), ctx, team_id).await?;
        require_team_role(tx.as_ref(), ctx, Some(team_id), TeamRole::Lead).await?;
        if team.is_deleted() {
            return Err(ServiceError::AlreadyDeleted(ResourceKind::Team));
        }

        let now = Utc::now();
        team.deleted_at = Some(now);
        tx.update_team(&team).await?;

        let projects = tx
            .projects(ctx.organization_id, Some(team_id), false)
            .await?;
        let mut tasks = Vec::new();
        for project in &projects {
            tasks.extend(tx.tasks(ctx.organization_id, project.id, false).await?);
        }
        for mut project in projects.clone() {
            project.deleted_at = Some(now);
            tx.update_project(&project).await?;
        }
        for mut task in tasks.clone() {
            task.deleted_at = Some(now);
            tx.update_task(&task).await?;
        }

        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::SoftDelete,
            ResourceKind::Team,
            team.id,
            json!({
                "cascaded_projects": projects.len(),
                "cascaded_tasks": tasks.len(),
            }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(org_id = %ctx.organization_id, team_id = %team.id, "team soft-deleted");
        Ok(())
    }

    /// Recover a soft-deleted team and exactly the children its deletion
    /// cascaded to. Requires team Lead or an inheriting role.
    pub async fn recover(&self, ctx: &TenantContext, team_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.store.begin().await?;

        tx.organization(ctx.organization_id)
            .await?
            .filter(|o| !o.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;

        let mut team = Self::fetch(tx.as_ref(), ctx, team_id).await?;
        require_team_role(tx.as_ref(), ctx, Some(team_id), TeamRole::Lead).await?;
        let Some(stamp) = team.deleted_at else {
            return Err(ServiceError::NotDeleted(ResourceKind::Team));
        };

        team.deleted_at = None;
        team.updated_at = Utc::now();
        tx.update_team(&team).await?;

        let projects = tx
            .projects(ctx.organization_id, Some(team_id), true)
            .await?;
        for project in &projects {
            for mut task in tx.tasks(ctx.organization_id, project.id, true).await? {
                if task.deleted_at == Some(stamp) {
                    task.deleted_at = None;
                    tx.update_task(&task).await?;
                }
            }
        }
        for mut project in projects {
            if project.deleted_at == Some(stamp) {
                project.deleted_at = None;
                tx.update_project(&project).await?;
            }
        }

        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Recover,
            ResourceKind::Team,
            team.id,
            serde_json::Value::Null,
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(org_id = %ctx.organization_id, team_id = %team.id, "team recovered");
        Ok(())
    }

    /// List the team's members, newest first. Any organization member may
    /// read.
    pub async fn list_members(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
    ) -> ServiceResult<Vec<TeamMember>> {
        let tx = self.store.begin().await?;
        Self::fetch(tx.as_ref(), ctx, team_id).await?;
        Ok(tx.team_members(ctx.organization_id, team_id).await?)
    }

    /// Add a member with the given role. Requires team Lead or an inheriting
    /// role; the user must already belong to the organization.
    pub async fn add_member(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> ServiceResult<TeamMember> {
        let mut tx = self.store.begin().await?;
        let team = Self::fetch(tx.as_ref(), ctx, team_id).await?;
        if team.is_deleted() {
            return Err(ServiceError::NotFound(ResourceKind::Team));
        }
        require_team_role(tx.as_ref(), ctx, Some(team_id), TeamRole::Lead).await?;

        if tx
            .org_member(ctx.organization_id, user_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::PrerequisiteMembershipMissing {
                parent: ResourceKind::Organization,
                child: ResourceKind::Team,
            });
        }

        let member = TeamMember::new(team_id, user_id, role);
        tx.insert_team_member(&member).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::AddMember,
            ResourceKind::Membership,
            member.id,
            json!({ "team_id": team_id, "user_id": user_id, "role": role.as_str() }),
        ))
        .await?;
        tx.commit().await?;
        Ok(member)
    }

    /// Remove a member. Requires team Lead or an inheriting role.
    pub async fn remove_member(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<()> {
        let mut tx = self.store.begin().await?;
        Self::fetch(tx.as_ref(), ctx, team_id).await?;
        require_team_role(tx.as_ref(), ctx, Some(team_id), TeamRole::Lead).await?;

        let member = tx
            .team_member(ctx.organization_id, team_id, user_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Membership))?;
        tx.remove_team_member(ctx.organization_id, team_id, user_id)
            .await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::RemoveMember,
            ResourceKind::Membership,
            member.id,
            json!({ "team_id": team_id, "user_id": user_id }),
        ))
        .await?;
        tx.commit().await?;
        Ok(())
    }
}
