//! Project service
//!
//! CRUD, membership management, and the soft-delete lifecycle for projects.
//! Creating a project takes the owning team's Lead or organization Admin;
//! managing one takes project Manager or an inheriting role (team Lead,
//! organization Admin/Owner).

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use taskdeck_auth::{require_project_role, require_team_role, TenantContext};
use taskdeck_org::{AuditRecord, Project, ProjectMember};
use taskdeck_rbac::{AuditAction, ProjectRole, ResourceKind, TeamRole};
use taskdeck_store::{Store, StoreTx};

use crate::error::{ServiceError, ServiceResult};

/// Input for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name (unique within the team)
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Input for updating a project. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name (must stay unique within the team)
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Project lifecycle and membership operations.
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch a project row for a mutating operation, regardless of deletion
    /// state.
    async fn fetch(
        tx: &dyn StoreTx,
        ctx: &TenantContext,
        project_id: Uuid,
    ) -> ServiceResult<Project> {
        tx.project(ctx.organization_id, project_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Project))
    }

    /// Create a project under a team. Requires the team's Lead or
    /// organization Admin/Owner; the parent team must be active.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        team_id: Uuid,
        input: CreateProject,
    ) -> ServiceResult<Project> {
        let mut tx = self.store.begin().await?;

        tx.team(ctx.organization_id, team_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Team))?;
        require_team_role(tx.as_ref(), ctx, Some(team_id), TeamRole::Lead).await?;

        let mut project = Project::new(team_id, ctx.organization_id, input.name, ctx.user_id);
        project.description = input.description;
        tx.insert_project(&project).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Create,
            ResourceKind::Project,
            project.id,
            json!({ "name": &project.name, "team_id": team_id }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(
            org_id = %ctx.organization_id,
            project_id = %project.id,
            "project created"
        );
        Ok(project)
    }

    /// Fetch a project. Any organization member may read.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        project_id: Uuid,
        include_deleted: bool,
    ) -> ServiceResult<Project> {
        let tx = self.store.begin().await?;
        let project = Self::fetch(tx.as_ref(), ctx, project_id).await?;
        if project.is_deleted() && !include_deleted {
            return Err(ServiceError::NotFound(ResourceKind::Project));
        }
        Ok(project)
    }

    /// List projects, optionally restricted to one team, newest first.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        team_id: Option<Uuid>,
        include_deleted: bool,
    ) -> ServiceResult<Vec<Project>> {
        let tx = self.store.begin().await?;
        Ok(tx
            .projects(ctx.organization_id, team_id, include_deleted)
            .await?)
    }

    /// Update project fields. Requires project Manager or an inheriting role.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        project_id: Uuid,
        input: UpdateProject,
    ) -> ServiceResult<Project> {
        let mut tx = self.store.begin().await?;
        let mut project = Self::fetch(tx.as_ref(), ctx, project_id).await?;
        if project.is_deleted() {
            return Err(ServiceError::NotFound(ResourceKind::Project));
        }
        require_project_role(tx.as_ref(), ctx, Some(&project), ProjectRole::Manager).await?;

        let mut changes = serde_json::Map::new();
        if let Some(name) = input.name {
            changes.insert("name".into(), json!({ "from": &project.name, "to": &name }));
            project.name = name;
        }
        if let Some(description) = input.description {
            changes.insert(
                "description".into(),
                json!({ "from": &project.description, "to": &description }),
            );
            project.description = Some(description);
        }
        project.updated_at = Utc::now();

        tx.update_project(&project).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Update,
            ResourceKind::Project,
            project.id,
            serde_json::Value::Object(changes),
        ))
        .await?;
        tx.commit().await?;
        Ok(project)
    }

    /// Soft-delete the project, cascading to its active tasks. Requires
    /// project Manager or an inheriting role.
    pub async fn soft_delete(&self, ctx: &TenantContext, project_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.store.begin().await?;
        let mut project = Self::fetch(tx.as_ref(), ctx, project_id).await?;
        require_project_role(tx.as_ref(), ctx, Some(&project), ProjectRole::Manager).await?;
        if project.is_deleted() {
            return Err(ServiceError::AlreadyDeleted(ResourceKind::Project));
        }

        let now = Utc::now();
        project.deleted_at = Some(now);
        tx.update_project(&project).await?;

        let tasks = tx.tasks(ctx.organization_id, project.id, false).await?;
        for mut task in tasks.clone() {
            task.deleted_at = Some(now);
            tx.update_task(&task).await?;
        }

        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::SoftDelete,
            ResourceKind::Project,
            project.id,
            json!({ "cascaded_tasks": tasks.len() }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(
            org_id = %ctx.organization_id,
            project_id = %project.id,
            "project soft-deleted"
        );
        Ok(())
    }

    /// Recover a soft-deleted project and exactly the tasks its deletion
    /// cascaded to. Requires project Manager or an inheriting role; the
    /// owning team must be active.
    pub async fn recover(&self, ctx: &TenantContext, project_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.store.begin().await?;
        let mut project = Self::fetch(tx.as_ref(), ctx, project_id).await?;

        tx.team(ctx.organization_id, project.team_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Team))?;
        require_project_role(tx.as_ref(), ctx, Some(&project), ProjectRole::Manager).await?;
        let Some(stamp) = project.deleted_at else {
            return Err(ServiceError::NotDeleted(ResourceKind::Project));
        };

        project.deleted_at = None;
        project.updated_at = Utc::now();
        tx.update_project(&project).await?;

        for mut task in tx.tasks(ctx.organization_id, project.id, true).await? {
            if task.deleted_at == Some(stamp) {
                task.deleted_at = None;
                tx.update_task(&task).await?;
            }
        }

        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::Recover,
            ResourceKind::Project,
            project.id,
            serde_json::Value::Null,
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(
            org_id = %ctx.organization_id,
            project_id = %project.id,
            "project recovered"
        );
        Ok(())
    }

    /// List the project's members, newest first. Any organization member may
    /// read.
    pub async fn list_members(
        &self,
        ctx: &TenantContext,
        project_id: Uuid,
    ) -> ServiceResult<Vec<ProjectMember>> {
        let tx = self.store.begin().await?;
        Self::fetch(tx.as_ref(), ctx, project_id).await?;
        Ok(tx.project_members(ctx.organization_id, project_id).await?)
    }

    /// Add a member with the given role. Requires project Manager or an
    /// inheriting role; the user must already belong to the owning team.
    pub async fn add_member(
        &self,
        ctx: &TenantContext,
        project_id: Uuid,
        user_id: Uuid,
        role: ProjectRole,
    ) -> ServiceResult<ProjectMember> {
        let mut tx = self.store.begin().await?;
        let project = Self::fetch(tx.as_ref(), ctx, project_id).await?;
        if project.is_deleted() {
            return Err(ServiceError::NotFound(ResourceKind::Project));
        }
        require_project_role(tx.as_ref(), ctx, Some(&project), ProjectRole::Manager).await?;

        if tx
            .team_member(ctx.organization_id, project.team_id, user_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::PrerequisiteMembershipMissing {
                parent: ResourceKind::Team,
                child: ResourceKind::Project,
            });
        }

        let member = ProjectMember::new(project_id, user_id, role);
        tx.insert_project_member(&member).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::AddMember,
            ResourceKind::Membership,
            member.id,
            json!({ "project_id": project_id, "user_id": user_id, "role": role.as_str() }),
        ))
        .await?;
        tx.commit().await?;
        Ok(member)
    }

    /// Remove a member. Requires project Manager or an inheriting role.
    pub async fn remove_member(
        &self,
        ctx: &TenantContext,
        project_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<()> {
        let mut tx = self.store.begin().await?;
        let project = Self::fetch(tx.as_ref(), ctx, project_id).await?;
        require_project_role(tx.as_ref(), ctx, Some(&project), ProjectRole::Manager).await?;

        let member = tx
            .project_member(ctx.organization_id, project_id, user_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Membership))?;
        tx.remove_project_member(ctx.organization_id, project_id, user_id)
            .await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::RemoveMember,
            ResourceKind::Membership,
            member.id,
            json!({ "project_id": project_id, "user_id": user_id }),
        ))
        .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_org::{Organization, OrganizationMember, Task, Team, TeamMember};
    use taskdeck_rbac::OrgRole;
    use taskdeck_store::MemoryStore;

    struct Fixture {
        svc: ProjectService,
        store: Arc<MemoryStore>,
        org: Organization,
        team: Team,
        owner: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let owner = Uuid::now_v7();
        let org = Organization::new("Acme", "acme", owner);
        let team = Team::new(org.id, "Eng", owner);
        let mut tx = store.begin().await.unwrap();
        tx.insert_organization(&org).await.unwrap();
        tx.insert_org_member(&OrganizationMember::new(org.id, owner, OrgRole::Owner))
            .await
            .unwrap();
        tx.insert_team(&team).await.unwrap();
        tx.commit().await.unwrap();

        Fixture {
            svc: ProjectService::new(store.clone()),
            store,
            org,
            team,
            owner,
        }
    }

    fn ctx(org_id: Uuid, user_id: Uuid, role: OrgRole) -> TenantContext {
        TenantContext {
            user_id,
            organization_id: org_id,
            org_role: role,
            team_id: None,
            team_role: None,
            project_id: None,
            project_role: None,
        }
    }

    fn input(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_owner_creates_without_team_membership() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);

        // Inheritance: no TeamMember row exists for the owner.
        let project = f.svc.create(&owner_ctx, f.team.id, input("Launch")).await.unwrap();
        assert_eq!(project.team_id, f.team.id);
        assert_eq!(project.organization_id, f.org.id);
    }

    #[tokio::test]
    async fn test_plain_member_cannot_create() {
        let f = fixture().await;
        let member = Uuid::now_v7();
        let member_ctx = ctx(f.org.id, member, OrgRole::Member);

        assert!(matches!(
            f.svc.create(&member_ctx, f.team.id, input("Launch")).await,
            Err(ServiceError::Access(_))
        ));
    }

    #[tokio::test]
    async fn test_team_lead_can_create() {
        let f = fixture().await;
        let lead = Uuid::now_v7();
        let mut tx = f.store.begin().await.unwrap();
        tx.insert_org_member(&OrganizationMember::new(f.org.id, lead, OrgRole::Member))
            .await
            .unwrap();
        tx.insert_team_member(&TeamMember::new(f.team.id, lead, TeamRole::Lead))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let lead_ctx = ctx(f.org.id, lead, OrgRole::Member);
        assert!(f.svc.create(&lead_ctx, f.team.id, input("Launch")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_under_deleted_team_fails() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);

        let mut team = f.team.clone();
        team.deleted_at = Some(Utc::now());
        let mut tx = f.store.begin().await.unwrap();
        tx.update_team(&team).await.unwrap();
        tx.commit().await.unwrap();

        assert!(matches!(
            f.svc.create(&owner_ctx, f.team.id, input("Launch")).await,
            Err(ServiceError::NotFound(ResourceKind::Team))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_within_team() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);

        f.svc.create(&owner_ctx, f.team.id, input("Launch")).await.unwrap();
        assert!(matches!(
            f.svc.create(&owner_ctx, f.team.id, input("Launch")).await,
            Err(ServiceError::DuplicateName)
        ));
    }

    #[tokio::test]
    async fn test_task_cascade_and_recovery() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);
        let project = f.svc.create(&owner_ctx, f.team.id, input("Launch")).await.unwrap();

        // One live task, one deleted earlier on its own.
        let live = Task::new(project.id, f.org.id, "Live", f.owner);
        let mut gone = Task::new(project.id, f.org.id, "Gone", f.owner);
        gone.deleted_at = Some(Utc::now() - chrono::Duration::days(2));
        let mut tx = f.store.begin().await.unwrap();
        tx.insert_task(&live).await.unwrap();
        tx.insert_task(&gone).await.unwrap();
        tx.commit().await.unwrap();

        f.svc.soft_delete(&owner_ctx, project.id).await.unwrap();
        let tx = f.store.begin().await.unwrap();
        assert!(tx.tasks(f.org.id, project.id, false).await.unwrap().is_empty());
        drop(tx);

        f.svc.recover(&owner_ctx, project.id).await.unwrap();
        let tx = f.store.begin().await.unwrap();
        let active = tx.tasks(f.org.id, project.id, false).await.unwrap();
        // Only the cascaded task comes back.
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Live");
    }

    #[tokio::test]
    async fn test_recover_never_deleted_fails() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);
        let project = f.svc.create(&owner_ctx, f.team.id, input("Launch")).await.unwrap();

        assert!(matches!(
            f.svc.recover(&owner_ctx, project.id).await,
            Err(ServiceError::NotDeleted(ResourceKind::Project))
        ));
    }

    #[tokio::test]
    async fn test_add_member_requires_team_membership_first() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);
        let project = f.svc.create(&owner_ctx, f.team.id, input("Launch")).await.unwrap();

        // Org member but not a team member.
        let user = Uuid::now_v7();
        let mut tx = f.store.begin().await.unwrap();
        tx.insert_org_member(&OrganizationMember::new(f.org.id, user, OrgRole::Member))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(matches!(
            f.svc
                .add_member(&owner_ctx, project.id, user, ProjectRole::Viewer)
                .await,
            Err(ServiceError::PrerequisiteMembershipMissing {
                parent: ResourceKind::Team,
                child: ResourceKind::Project,
            })
        ));

        let mut tx = f.store.begin().await.unwrap();
        tx.insert_team_member(&TeamMember::new(f.team.id, user, TeamRole::Member))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert!(f
            .svc
            .add_member(&owner_ctx, project.id, user, ProjectRole::Viewer)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_projects_invisible_across_tenants() {
        let f = fixture().await;
        let owner_ctx = ctx(f.org.id, f.owner, OrgRole::Owner);
        let project = f.svc.create(&owner_ctx, f.team.id, input("Launch")).await.unwrap();

        let foreign_ctx = ctx(Uuid::now_v7(), Uuid::now_v7(), OrgRole::Owner);
        assert!(matches!(
            f.svc.get(&foreign_ctx, project.id, true).await,
            Err(ServiceError::NotFound(ResourceKind::Project))
        ));
        assert!(f
            .svc
            .list(&foreign_ctx, None, true)
            .await
            .unwrap()
            .is_empty());
    }
}
