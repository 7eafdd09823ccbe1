//! In-memory storage backend
//!
//! This backend is suitable for single-process deployments and testing. It
//! provides the full transaction contract: `begin` snapshots the tables,
//! reads and writes operate on the snapshot, and `commit` swaps the snapshot
//! in atomically. A dropped transaction leaves the shared tables untouched.
//!
//! Writers are serialized by an async mutex, so a transaction observes a
//! stable world and the loser of a uniqueness race sees the winner's rows.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use taskdeck_org::{
    AuditRecord, Invitation, Organization, OrganizationMember, Project, ProjectMember, Task, Team,
    TeamMember,
};

use crate::error::{Constraint, StoreError, StoreResult};
use crate::store::{Store, StoreTx};

/// All tables of one tenant-shared store.
#[derive(Debug, Clone, Default)]
struct Tables {
    organizations: HashMap<Uuid, Organization>,
    teams: HashMap<Uuid, Team>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    /// Keyed by (organization_id, user_id): the duplicate-membership
    /// constraint is structural.
    org_members: HashMap<(Uuid, Uuid), OrganizationMember>,
    /// Keyed by (team_id, user_id).
    team_members: HashMap<(Uuid, Uuid), TeamMember>,
    /// Keyed by (project_id, user_id).
    project_members: HashMap<(Uuid, Uuid), ProjectMember>,
    invitations: HashMap<Uuid, Invitation>,
    audit: Vec<AuditRecord>,
}

/// In-memory store implementation.
///
/// # Examples
///
/// ```
/// use taskdeck_store::{MemoryStore, Store};
///
/// async fn demo() {
///     let store = MemoryStore::new();
///     let tx = store.begin().await.unwrap();
///     drop(tx); // rollback
/// }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }
}

/// One transaction over the in-memory tables.
struct MemoryTx {
    /// Held for the life of the transaction; commit writes through it.
    guard: OwnedMutexGuard<Tables>,
    /// Working snapshot all reads and writes operate on.
    work: Tables,
}

fn newest_first<T>(mut rows: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

impl MemoryTx {
    fn check_slug(&self, slug: &str, exclude: Uuid) -> StoreResult<()> {
        let taken = self
            .work
            .organizations
            .values()
            .any(|o| o.id != exclude && o.slug == slug);
        if taken {
            return Err(StoreError::UniqueViolation(Constraint::OrganizationSlug));
        }
        Ok(())
    }

    fn check_team_name(&self, org_id: Uuid, name: &str, exclude: Uuid) -> StoreResult<()> {
        let taken = self
            .work
            .teams
            .values()
            .any(|t| t.id != exclude && t.organization_id == org_id && t.name == name);
        if taken {
            return Err(StoreError::UniqueViolation(Constraint::TeamName));
        }
        Ok(())
    }

    fn check_project_name(&self, team_id: Uuid, name: &str, exclude: Uuid) -> StoreResult<()> {
        let taken = self
            .work
            .projects
            .values()
            .any(|p| p.id != exclude && p.team_id == team_id && p.name == name);
        if taken {
            return Err(StoreError::UniqueViolation(Constraint::ProjectName));
        }
        Ok(())
    }

    /// Resolve a team id under the tenant predicate.
    fn team_in_org(&self, org_id: Uuid, team_id: Uuid) -> Option<&Team> {
        self.work
            .teams
            .get(&team_id)
            .filter(|t| t.organization_id == org_id)
    }

    /// Resolve a project id under the tenant predicate.
    fn project_in_org(&self, org_id: Uuid, project_id: Uuid) -> Option<&Project> {
        self.work
            .projects
            .get(&project_id)
            .filter(|p| p.organization_id == org_id)
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn insert_organization(&mut self, org: &Organization) -> StoreResult<()> {
        self.check_slug(&org.slug, org.id)?;
        self.work.organizations.insert(org.id, org.clone());
        Ok(())
    }

    async fn organization(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        Ok(self.work.organizations.get(&id).cloned())
    }

    async fn organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        Ok(self
            .work
            .organizations
            .values()
            .find(|o| o.slug == slug)
            .cloned())
    }

    async fn update_organization(&mut self, org: &Organization) -> StoreResult<()> {
        self.check_slug(&org.slug, org.id)?;
        self.work.organizations.insert(org.id, org.clone());
        Ok(())
    }

    async fn organizations_for_user(
        &self,
        user_id: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Organization>> {
        let rows = self
            .work
            .org_members
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| self.work.organizations.get(&m.organization_id))
            .filter(|o| include_deleted || !o.is_deleted())
            .cloned()
            .collect();
        Ok(newest_first(rows, |o| o.created_at))
    }

    async fn insert_team(&mut self, team: &Team) -> StoreResult<()> {
        self.check_team_name(team.organization_id, &team.name, team.id)?;
        self.work.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn team(&self, org_id: Uuid, team_id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.team_in_org(org_id, team_id).cloned())
    }

    async fn teams(&self, org_id: Uuid, include_deleted: bool) -> StoreResult<Vec<Team>> {
        let rows = self
            .work
            .teams
            .values()
            .filter(|t| t.organization_id == org_id)
            .filter(|t| include_deleted || !t.is_deleted())
            .cloned()
            .collect();
        Ok(newest_first(rows, |t| t.created_at))
    }

    async fn update_team(&mut self, team: &Team) -> StoreResult<()> {
        self.check_team_name(team.organization_id, &team.name, team.id)?;
        self.work.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn insert_project(&mut self, project: &Project) -> StoreResult<()> {
        self.check_project_name(project.team_id, &project.name, project.id)?;
        self.work.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn project(&self, org_id: Uuid, project_id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.project_in_org(org_id, project_id).cloned())
    }

    async fn projects(
        &self,
        org_id: Uuid,
        team_id: Option<Uuid>,
        include_deleted: bool,
    ) -> StoreResult<Vec<Project>> {
        let rows = self
            .work
            .projects
            .values()
            .filter(|p| p.organization_id == org_id)
            .filter(|p| team_id.map_or(true, |t| p.team_id == t))
            .filter(|p| include_deleted || !p.is_deleted())
            .cloned()
            .collect();
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn update_project(&mut self, project: &Project) -> StoreResult<()> {
        self.check_project_name(project.team_id, &project.name, project.id)?;
        self.work.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        self.work.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn tasks(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Task>> {
        let rows = self
            .work
            .tasks
            .values()
            .filter(|t| t.organization_id == org_id && t.project_id == project_id)
            .filter(|t| include_deleted || !t.is_deleted())
            .cloned()
            .collect();
        Ok(newest_first(rows, |t| t.created_at))
    }

    async fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        self.work.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn insert_org_member(&mut self, member: &OrganizationMember) -> StoreResult<()> {
        let key = (member.organization_id, member.user_id);
        if self.work.org_members.contains_key(&key) {
            return Err(StoreError::UniqueViolation(Constraint::OrganizationMember));
        }
        self.work.org_members.insert(key, member.clone());
        Ok(())
    }

    async fn org_member(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<OrganizationMember>> {
        Ok(self.work.org_members.get(&(org_id, user_id)).cloned())
    }

    async fn org_members(&self, org_id: Uuid) -> StoreResult<Vec<OrganizationMember>> {
        let rows = self
            .work
            .org_members
            .values()
            .filter(|m| m.organization_id == org_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |m| m.created_at))
    }

    async fn remove_org_member(&mut self, org_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        Ok(self.work.org_members.remove(&(org_id, user_id)).is_some())
    }

    async fn insert_team_member(&mut self, member: &TeamMember) -> StoreResult<()> {
        let key = (member.team_id, member.user_id);
        if self.work.team_members.contains_key(&key) {
            return Err(StoreError::UniqueViolation(Constraint::TeamMember));
        }
        self.work.team_members.insert(key, member.clone());
        Ok(())
    }

    async fn team_member(
        &self,
        org_id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<TeamMember>> {
        if self.team_in_org(org_id, team_id).is_none() {
            return Ok(None);
        }
        Ok(self.work.team_members.get(&(team_id, user_id)).cloned())
    }

    async fn team_members(&self, org_id: Uuid, team_id: Uuid) -> StoreResult<Vec<TeamMember>> {
        if self.team_in_org(org_id, team_id).is_none() {
            return Ok(Vec::new());
        }
        let rows = self
            .work
            .team_members
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |m| m.created_at))
    }

    async fn remove_team_member(
        &mut self,
        org_id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool> {
        if self.team_in_org(org_id, team_id).is_none() {
            return Ok(false);
        }
        Ok(self.work.team_members.remove(&(team_id, user_id)).is_some())
    }

    async fn insert_project_member(&mut self, member: &ProjectMember) -> StoreResult<()> {
        let key = (member.project_id, member.user_id);
        if self.work.project_members.contains_key(&key) {
            return Err(StoreError::UniqueViolation(Constraint::ProjectMember));
        }
        self.work.project_members.insert(key, member.clone());
        Ok(())
    }

    async fn project_member(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ProjectMember>> {
        if self.project_in_org(org_id, project_id).is_none() {
            return Ok(None);
        }
        Ok(self.work.project_members.get(&(project_id, user_id)).cloned())
    }

    async fn project_members(
        &self,
        org_id: Uuid,
        project_id: Uuid,
    ) -> StoreResult<Vec<ProjectMember>> {
        if self.project_in_org(org_id, project_id).is_none() {
            return Ok(Vec::new());
        }
        let rows = self
            .work
            .project_members
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |m| m.created_at))
    }

    async fn remove_project_member(
        &mut self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool> {
        if self.project_in_org(org_id, project_id).is_none() {
            return Ok(false);
        }
        Ok(self
            .work
            .project_members
            .remove(&(project_id, user_id))
            .is_some())
    }

    async fn insert_invitation(&mut self, invitation: &Invitation) -> StoreResult<()> {
        let taken = self
            .work
            .invitations
            .values()
            .any(|i| i.id != invitation.id && i.token == invitation.token);
        if taken {
            return Err(StoreError::UniqueViolation(Constraint::InvitationToken));
        }
        self.work.invitations.insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn invitation(&self, org_id: Uuid, id: Uuid) -> StoreResult<Option<Invitation>> {
        Ok(self
            .work
            .invitations
            .get(&id)
            .filter(|i| i.organization_id == org_id)
            .cloned())
    }

    async fn invitation_by_token(&self, token: &str) -> StoreResult<Option<Invitation>> {
        Ok(self
            .work
            .invitations
            .values()
            .find(|i| i.token == token)
            .cloned())
    }

    async fn invitations(&self, org_id: Uuid) -> StoreResult<Vec<Invitation>> {
        let rows = self
            .work
            .invitations
            .values()
            .filter(|i| i.organization_id == org_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |i| i.created_at))
    }

    async fn update_invitation(&mut self, invitation: &Invitation) -> StoreResult<()> {
        self.work.invitations.insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn delete_invitation(&mut self, org_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let owned = self
            .work
            .invitations
            .get(&id)
            .map_or(false, |i| i.organization_id == org_id);
        if !owned {
            return Ok(false);
        }
        Ok(self.work.invitations.remove(&id).is_some())
    }

    async fn append_audit(&mut self, record: &AuditRecord) -> StoreResult<()> {
        self.work.audit.push(record.clone());
        Ok(())
    }

    async fn audit_log(
        &self,
        org_id: Uuid,
        limit: Option<usize>,
    ) -> StoreResult<Vec<AuditRecord>> {
        let rows = self
            .work
            .audit
            .iter()
            .filter(|r| r.organization_id == org_id)
            .cloned()
            .collect();
        let mut rows = newest_first(rows, |r: &AuditRecord| r.created_at);
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn commit(mut self: Box<Self>) -> StoreResult<()> {
        *self.guard = self.work;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_rbac::{OrgRole, TeamRole};

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let store = MemoryStore::new();
        let org = Organization::new("Acme", "acme", Uuid::now_v7());

        let mut tx = store.begin().await.unwrap();
        tx.insert_organization(&org).await.unwrap();
        tx.commit().await.unwrap();

        let tx = store.begin().await.unwrap();
        assert!(tx.organization(org.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let store = MemoryStore::new();
        let org = Organization::new("Acme", "acme", Uuid::now_v7());

        let mut tx = store.begin().await.unwrap();
        tx.insert_organization(&org).await.unwrap();
        drop(tx);

        let tx = store.begin().await.unwrap();
        assert!(tx.organization(org.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slug_uniqueness() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.insert_organization(&Organization::new("Acme", "acme", Uuid::now_v7()))
            .await
            .unwrap();
        let err = tx
            .insert_organization(&Organization::new("Other", "acme", Uuid::now_v7()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::UniqueViolation(Constraint::OrganizationSlug)
        ));
    }

    #[tokio::test]
    async fn test_team_name_unique_per_org() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let creator = Uuid::now_v7();
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();

        tx.insert_team(&Team::new(org_a, "Eng", creator)).await.unwrap();
        // Same name in another org is fine.
        tx.insert_team(&Team::new(org_b, "Eng", creator)).await.unwrap();

        let err = tx
            .insert_team(&Team::new(org_a, "Eng", creator))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(Constraint::TeamName)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_membership_rejected() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        tx.insert_org_member(&OrganizationMember::new(org_id, user_id, OrgRole::Member))
            .await
            .unwrap();
        let err = tx
            .insert_org_member(&OrganizationMember::new(org_id, user_id, OrgRole::Admin))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::UniqueViolation(Constraint::OrganizationMember)
        ));
    }

    #[tokio::test]
    async fn test_team_queries_carry_tenant_predicate() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let creator = Uuid::now_v7();
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();

        let team = Team::new(org_a, "Eng", creator);
        tx.insert_team(&team).await.unwrap();
        tx.insert_team_member(&TeamMember::new(team.id, creator, TeamRole::Lead))
            .await
            .unwrap();

        // The row exists, but not under the wrong organization.
        assert!(tx.team(org_b, team.id).await.unwrap().is_none());
        assert!(tx
            .team_member(org_b, team.id, creator)
            .await
            .unwrap()
            .is_none());
        assert!(tx.team_members(org_b, team.id).await.unwrap().is_empty());

        assert!(tx.team(org_a, team.id).await.unwrap().is_some());
        assert!(tx
            .team_member(org_a, team.id, creator)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_lists_exclude_deleted_by_default() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let org_id = Uuid::now_v7();

        let mut team = Team::new(org_id, "Eng", Uuid::now_v7());
        tx.insert_team(&team).await.unwrap();
        team.deleted_at = Some(Utc::now());
        tx.update_team(&team).await.unwrap();

        assert!(tx.teams(org_id, false).await.unwrap().is_empty());
        assert_eq!(tx.teams(org_id, true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let org_id = Uuid::now_v7();
        let creator = Uuid::now_v7();

        let mut older = Team::new(org_id, "Older", creator);
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = Team::new(org_id, "Newer", creator);
        tx.insert_team(&older).await.unwrap();
        tx.insert_team(&newer).await.unwrap();

        let teams = tx.teams(org_id, false).await.unwrap();
        assert_eq!(teams[0].name, "Newer");
        assert_eq!(teams[1].name, "Older");
    }

    #[tokio::test]
    async fn test_invitation_token_unique() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let inviter = Uuid::now_v7();

        tx.insert_invitation(&Invitation::new(
            Uuid::now_v7(),
            "a@example.com",
            OrgRole::Member,
            "same-token",
            inviter,
        ))
        .await
        .unwrap();
        let err = tx
            .insert_invitation(&Invitation::new(
                Uuid::now_v7(),
                "b@example.com",
                OrgRole::Member,
                "same-token",
                inviter,
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::UniqueViolation(Constraint::InvitationToken)
        ));
    }

    #[tokio::test]
    async fn test_audit_log_scoped_and_limited() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();

        for i in 0..3 {
            tx.append_audit(&AuditRecord::new(
                org_a,
                None,
                taskdeck_rbac::AuditAction::Create,
                taskdeck_rbac::ResourceKind::Team,
                Uuid::now_v7(),
                serde_json::json!({ "n": i }),
            ))
            .await
            .unwrap();
        }

        assert_eq!(tx.audit_log(org_a, None).await.unwrap().len(), 3);
        assert_eq!(tx.audit_log(org_a, Some(2)).await.unwrap().len(), 2);
        assert!(tx.audit_log(org_b, None).await.unwrap().is_empty());
    }
}
