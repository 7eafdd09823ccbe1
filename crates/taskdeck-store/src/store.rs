//! Storage contract
//!
//! The engine is agnostic to the concrete storage backend as long as it
//! provides transactions and uniqueness constraints. This module defines that
//! contract: a [`Store`] hands out transactions, and a [`StoreTx`] carries
//! every typed read and write the services need.
//!
//! Tenant isolation is part of the contract, not a convention: every team-,
//! project-, task-, membership-, invitation-, and audit-scoped read takes an
//! explicit `org_id` predicate, and a backend must return nothing for rows
//! that do not resolve to that organization. The two deliberate exceptions
//! are organization lookup itself and invitation-by-token, where the token is
//! the credential.

use async_trait::async_trait;
use uuid::Uuid;

use taskdeck_org::{
    AuditRecord, Invitation, Organization, OrganizationMember, Project, ProjectMember, Task, Team,
    TeamMember,
};

use crate::error::StoreResult;

/// Hands out transactions over the shared backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Begin a transaction.
    ///
    /// All reads inside the transaction observe a consistent snapshot; all
    /// writes become visible together at [`StoreTx::commit`] or not at all.
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;
}

/// One transaction against the backend.
///
/// Dropping a transaction without calling [`StoreTx::commit`] rolls it back.
#[async_trait]
pub trait StoreTx: Send {
    // ------------------------------------------------------------------
    // Organizations
    // ------------------------------------------------------------------

    /// Insert a new organization. Fails on a slug collision.
    async fn insert_organization(&mut self, org: &Organization) -> StoreResult<()>;

    /// Fetch an organization by id.
    async fn organization(&self, id: Uuid) -> StoreResult<Option<Organization>>;

    /// Fetch an organization by its globally unique slug.
    async fn organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>>;

    /// Persist changed fields of an organization. Fails on a slug collision.
    async fn update_organization(&mut self, org: &Organization) -> StoreResult<()>;

    /// Organizations the user is a member of, newest first.
    async fn organizations_for_user(
        &self,
        user_id: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Organization>>;

    // ------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------

    /// Insert a new team. Fails on a name collision within the organization.
    async fn insert_team(&mut self, team: &Team) -> StoreResult<()>;

    /// Fetch a team by id within an organization.
    async fn team(&self, org_id: Uuid, team_id: Uuid) -> StoreResult<Option<Team>>;

    /// Teams of an organization, newest first.
    async fn teams(&self, org_id: Uuid, include_deleted: bool) -> StoreResult<Vec<Team>>;

    /// Persist changed fields of a team. Fails on a name collision.
    async fn update_team(&mut self, team: &Team) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Insert a new project. Fails on a name collision within the team.
    async fn insert_project(&mut self, project: &Project) -> StoreResult<()>;

    /// Fetch a project by id within an organization.
    async fn project(&self, org_id: Uuid, project_id: Uuid) -> StoreResult<Option<Project>>;

    /// Projects of an organization, optionally restricted to one team,
    /// newest first.
    async fn projects(
        &self,
        org_id: Uuid,
        team_id: Option<Uuid>,
        include_deleted: bool,
    ) -> StoreResult<Vec<Project>>;

    /// Persist changed fields of a project. Fails on a name collision.
    async fn update_project(&mut self, project: &Project) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Insert a new task.
    async fn insert_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Tasks of a project, newest first.
    async fn tasks(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Task>>;

    /// Persist changed fields of a task.
    async fn update_task(&mut self, task: &Task) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------

    /// Insert an organization membership. Fails if the user already holds one.
    async fn insert_org_member(&mut self, member: &OrganizationMember) -> StoreResult<()>;

    /// Fetch a user's organization membership.
    async fn org_member(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<OrganizationMember>>;

    /// All memberships of an organization, newest first.
    async fn org_members(&self, org_id: Uuid) -> StoreResult<Vec<OrganizationMember>>;

    /// Delete a user's organization membership. Returns whether a row existed.
    async fn remove_org_member(&mut self, org_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Insert a team membership. Fails if the user already holds one.
    async fn insert_team_member(&mut self, member: &TeamMember) -> StoreResult<()>;

    /// Fetch a user's team membership.
    async fn team_member(
        &self,
        org_id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<TeamMember>>;

    /// All memberships of a team, newest first.
    async fn team_members(&self, org_id: Uuid, team_id: Uuid) -> StoreResult<Vec<TeamMember>>;

    /// Delete a user's team membership. Returns whether a row existed.
    async fn remove_team_member(
        &mut self,
        org_id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool>;

    /// Insert a project membership. Fails if the user already holds one.
    async fn insert_project_member(&mut self, member: &ProjectMember) -> StoreResult<()>;

    /// Fetch a user's project membership.
    async fn project_member(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ProjectMember>>;

    /// All memberships of a project, newest first.
    async fn project_members(
        &self,
        org_id: Uuid,
        project_id: Uuid,
    ) -> StoreResult<Vec<ProjectMember>>;

    /// Delete a user's project membership. Returns whether a row existed.
    async fn remove_project_member(
        &mut self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool>;

    // ------------------------------------------------------------------
    // Invitations
    // ------------------------------------------------------------------

    /// Insert a new invitation. Fails on a token collision.
    async fn insert_invitation(&mut self, invitation: &Invitation) -> StoreResult<()>;

    /// Fetch an invitation by id within an organization.
    async fn invitation(&self, org_id: Uuid, id: Uuid) -> StoreResult<Option<Invitation>>;

    /// Fetch an invitation by token. Unscoped: possession of the token is
    /// the credential.
    async fn invitation_by_token(&self, token: &str) -> StoreResult<Option<Invitation>>;

    /// All invitations of an organization, newest first.
    async fn invitations(&self, org_id: Uuid) -> StoreResult<Vec<Invitation>>;

    /// Persist changed fields of an invitation (acceptance stamps).
    async fn update_invitation(&mut self, invitation: &Invitation) -> StoreResult<()>;

    /// Physically delete an invitation (revocation only). Returns whether a
    /// row existed.
    async fn delete_invitation(&mut self, org_id: Uuid, id: Uuid) -> StoreResult<bool>;

    // ------------------------------------------------------------------
    // Audit trail
    // ------------------------------------------------------------------

    /// Append a record to the audit trail. There is no update or delete.
    async fn append_audit(&mut self, record: &AuditRecord) -> StoreResult<()>;

    /// Audit records of an organization, newest first, up to `limit` when
    /// given.
    async fn audit_log(
        &self,
        org_id: Uuid,
        limit: Option<usize>,
    ) -> StoreResult<Vec<AuditRecord>>;

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Make every write of this transaction visible atomically.
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
