//! Organization service
//!
//! CRUD, membership management, and the soft-delete lifecycle for the
//! top-level tenant entity. Every mutating call runs in a single store
//! transaction and writes exactly one audit record inside it.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use taskdeck_auth::{require_org_role, TenantContext};
use taskdeck_org::{AuditRecord, Organization, OrganizationMember};
use taskdeck_rbac::{AuditAction, OrgRole, ResourceKind};
use taskdeck_store::{Store, StoreTx};

use crate::error::{ServiceError, ServiceResult};

/// Input for creating an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Organization name
    pub name: String,
    /// Globally unique, URL-friendly slug
    pub slug: String,
    /// Optional description
    pub description: Option<String>,
}

/// Input for updating an organization. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// New name
    pub name: Option<String>,
    /// New slug (must stay globally unique)
    pub slug: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Organization lifecycle and membership operations.
pub struct OrganizationService {
    store: Arc<dyn Store>,
}

impl OrganizationService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an organization. The creating user becomes its first Owner.
    ///
    /// Any authenticated user may bootstrap an organization; there is no
    /// tenant context yet at this point.
    pub async fn create(
        &self,
        actor: Uuid,
        input: CreateOrganization,
    ) -> ServiceResult<Organization> {
        let mut tx = self.store.begin().await?;

        let mut org = Organization::new(input.name, input.slug, actor);
        org.description = input.description;
        tx.insert_organization(&org).await?;
        tx.insert_org_member(&OrganizationMember::new(org.id, actor, OrgRole::Owner))
            .await?;
        tx.append_audit(&AuditRecord::new(
            org.id,
            Some(actor),
            AuditAction::Create,
            ResourceKind::Organization,
            org.id,
            json!({ "name": &org.name, "slug": &org.slug }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(org_id = %org.id, slug = %org.slug, "organization created");
        Ok(org)
    }

    /// Fetch the active organization of the context.
    ///
    /// Soft-deleted organizations are hidden unless `include_deleted` is set
    /// (the recovery-window view for administrators).
    pub async fn get(
        &self,
        ctx: &TenantContext,
        include_deleted: bool,
    ) -> ServiceResult<Organization> {
        let tx = self.store.begin().await?;
        let org = tx
            .organization(ctx.organization_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;
        if org.is_deleted() && !include_deleted {
            return Err(ServiceError::NotFound(ResourceKind::Organization));
        }
        Ok(org)
    }

    /// Fetch an organization by slug.
    ///
    /// Non-members get `NotFound`, never a distinguishable denial: slugs of
    /// other tenants must not be probeable.
    pub async fn get_by_slug(&self, actor: Uuid, slug: &str) -> ServiceResult<Organization> {
        let tx = self.store.begin().await?;
        let org = tx
            .organization_by_slug(slug)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;
        if tx.org_member(org.id, actor).await?.is_none() || org.is_deleted() {
            return Err(ServiceError::NotFound(ResourceKind::Organization));
        }
        Ok(org)
    }

    /// List the organizations the user belongs to, newest first.
    pub async fn list(
        &self,
        actor: Uuid,
        include_deleted: bool,
    ) -> ServiceResult<Vec<Organization>> {
        let tx = self.store.begin().await?;
        Ok(tx.organizations_for_user(actor, include_deleted).await?)
    }

    /// Update organization fields. Requires Admin or above.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        input: UpdateOrganization,
    ) -> ServiceResult<Organization> {
        require_org_role(ctx, OrgRole::Admin)?;
        let mut tx = self.store.begin().await?;

        let mut org = tx
            .organization(ctx.organization_id)
            .await?
            .filter(|o| !o.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;

        let mut changes = serde_json::Map::new();
        if let Some(name) = input.name {
            changes.insert("name".into(), json!({ "from": &org.name, "to": &name }));
            org.name = name;
        }
        if let Some(slug) = input.slug {
            changes.insert("slug".into(), json!({ "from": &org.slug, "to": &slug }));
            org.slug = slug;
        }
        if let Some(description) = input.description {
            changes.insert(
                "description".into(),
                json!({ "from": &org.description, "to": &description }),
            );
            org.description = Some(description);
        }
        org.updated_at = Utc::now();

        tx.update_organization(&org).await?;
        tx.append_audit(&AuditRecord::new(
            org.id,
            Some(ctx.user_id),
            AuditAction::Update,
            ResourceKind::Organization,
            org.id,
            serde_json::Value::Object(changes),
        ))
        .await?;
        tx.commit().await?;
        Ok(org)
    }

    /// Soft-delete the organization and cascade to every active team,
    /// project, and task under it. Requires Owner.
    pub async fn soft_delete(&self, ctx: &TenantContext) -> ServiceResult<()> {
        require_org_role(ctx, OrgRole::Owner)?;
        let mut tx = self.store.begin().await?;

        let mut org = tx
            .organization(ctx.organization_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;
        if org.is_deleted() {
            return Err(ServiceError::AlreadyDeleted(ResourceKind::Organization));
        }

        let now = Utc::now();
        org.deleted_at = Some(now);
        tx.update_organization(&org).await?;

        // Children are stamped with the parent's exact timestamp so recovery
        // can tell this cascade apart from earlier, independent deletions.
        let teams = tx.teams(org.id, false).await?;
        let projects = tx.projects(org.id, None, false).await?;
        let mut tasks = Vec::new();
        for project in &projects {
            tasks.extend(tx.tasks(org.id, project.id, false).await?);
        }
        for mut team in teams.clone() {
            team.deleted_at = Some(now);
            tx.update_team(&team).await?;
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
            org.id,
            Some(ctx.user_id),
            AuditAction::SoftDelete,
            ResourceKind::Organization,
            org.id,
            json!({
                "cascaded_teams": teams.len(),
                "cascaded_projects": projects.len(),
                "cascaded_tasks": tasks.len(),
            }),
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(org_id = %org.id, "organization soft-deleted");
        Ok(())
    }

    /// Recover a soft-deleted organization and the children its deletion
    /// cascaded to. Requires Owner.
    ///
    /// Children deleted independently before the organization keep their own
    /// stamp and stay deleted.
    pub async fn recover(&self, ctx: &TenantContext) -> ServiceResult<()> {
        require_org_role(ctx, OrgRole::Owner)?;
        let mut tx = self.store.begin().await?;

        let mut org = tx
            .organization(ctx.organization_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;
        let Some(stamp) = org.deleted_at else {
            return Err(ServiceError::NotDeleted(ResourceKind::Organization));
        };

        org.deleted_at = None;
        org.updated_at = Utc::now();
        tx.update_organization(&org).await?;

        for mut team in tx.teams(org.id, true).await? {
            if team.deleted_at == Some(stamp) {
                team.deleted_at = None;
                tx.update_team(&team).await?;
            }
        }
        let projects = tx.projects(org.id, None, true).await?;
        for project in &projects {
            for mut task in tx.tasks(org.id, project.id, true).await? {
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
            org.id,
            Some(ctx.user_id),
            AuditAction::Recover,
            ResourceKind::Organization,
            org.id,
            serde_json::Value::Null,
        ))
        .await?;
        tx.commit().await?;

        tracing::info!(org_id = %org.id, "organization recovered");
        Ok(())
    }

    /// List the organization's members, newest first.
    pub async fn list_members(
        &self,
        ctx: &TenantContext,
    ) -> ServiceResult<Vec<OrganizationMember>> {
        let tx = self.store.begin().await?;
        Ok(tx.org_members(ctx.organization_id).await?)
    }

    /// Add a member with the given role. Requires Admin or above.
    pub async fn add_member(
        &self,
        ctx: &TenantContext,
        user_id: Uuid,
        role: OrgRole,
    ) -> ServiceResult<OrganizationMember> {
        require_org_role(ctx, OrgRole::Admin)?;
        let mut tx = self.store.begin().await?;

        let org = tx
            .organization(ctx.organization_id)
            .await?
            .filter(|o| !o.is_deleted())
            .ok_or(ServiceError::NotFound(ResourceKind::Organization))?;

        let member = OrganizationMember::new(org.id, user_id, role);
        tx.insert_org_member(&member).await?;
        tx.append_audit(&AuditRecord::new(
            org.id,
            Some(ctx.user_id),
            AuditAction::AddMember,
            ResourceKind::Membership,
            member.id,
            json!({ "user_id": user_id, "role": role.as_str() }),
        ))
        .await?;
        tx.commit().await?;
        Ok(member)
    }

    /// Remove a member. Requires Admin or above; the last Owner of an
    /// organization cannot be removed.
    pub async fn remove_member(&self, ctx: &TenantContext, user_id: Uuid) -> ServiceResult<()> {
        require_org_role(ctx, OrgRole::Admin)?;
        let mut tx = self.store.begin().await?;

        let member = tx
            .org_member(ctx.organization_id, user_id)
            .await?
            .ok_or(ServiceError::NotFound(ResourceKind::Membership))?;
        if member.role == OrgRole::Owner {
            let owners = tx
                .org_members(ctx.organization_id)
                .await?
                .iter()
                .filter(|m| m.role == OrgRole::Owner)
                .count();
            if owners <= 1 {
                return Err(ServiceError::CannotRemoveLastOwner);
            }
        }

        tx.remove_org_member(ctx.organization_id, user_id).await?;
        tx.append_audit(&AuditRecord::new(
            ctx.organization_id,
            Some(ctx.user_id),
            AuditAction::RemoveMember,
            ResourceKind::Membership,
            member.id,
            json!({ "user_id": user_id, "role": member.role.as_str() }),
        ))
        .await?;
        tx.commit().await?;
        Ok(())
    }
}
