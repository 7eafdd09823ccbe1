//! # Taskdeck Organization Hierarchy
//!
//! This crate provides the multi-tenant domain entities for the Taskdeck
//! platform: the tenancy tree, the membership rows that attach users to each
//! level of it, the invitation records that onboard new members, and the
//! append-only audit trail.
//!
//! ## Overview
//!
//! The taskdeck-org crate handles:
//! - **Organizations**: top-level tenant entities
//! - **Teams**: groups of people and projects inside an organization
//! - **Projects**: groups of tasks inside a team
//! - **Tasks**: leaf entities (lifecycle fields only at this layer)
//! - **Memberships**: user-organization, user-team, and user-project
//!   relationships, one role each
//! - **Invitations**: expiring, single-use onboarding tokens
//! - **Audit records**: the immutable trail of administrative actions
//!
//! ## Architecture
//!
//! ```text
//! User
//!   ├─ OrganizationMember ─→ Organization
//!   │                           ├─ Teams ─→ TeamMember
//!   │                           │     └─ Projects ─→ ProjectMember
//!   │                           │           └─ Tasks
//!   │                           ├─ Invitations
//!   │                           └─ AuditRecords
//! ```
//!
//! Relationships are foreign-key ids only; a "children of X" view is always a
//! query against the store, never a stored back-reference. Every entity below
//! the organization carries (or denormalizes) its `organization_id` so any
//! query can filter by tenant with a single predicate.
//!
//! Deletion at this layer is always soft: `deleted_at` is stamped, children
//! are cascaded by the services, and recovery clears the stamp within the
//! retention window. No entity is physically removed by application code
//! (revoked invitations are the one exception — they carry no history).
//!
//! ## Usage
//!
//! ```rust
//! use taskdeck_org::{Organization, Team, OrganizationMember};
//! use taskdeck_rbac::OrgRole;
//! use uuid::Uuid;
//!
//! let alice = Uuid::now_v7();
//! let org = Organization::new("Acme Corp", "acme-corp", alice);
//! let membership = OrganizationMember::new(org.id, alice, OrgRole::Owner);
//! let team = Team::new(org.id, "Engineering", alice);
//! ```

pub mod audit;
pub mod invitation;
pub mod membership;
pub mod organization;
pub mod project;
pub mod task;
pub mod team;

// Re-export main types for convenience
pub use audit::AuditRecord;
pub use invitation::{
    Invitation, InvitationStatus, ProjectGrant, TeamGrant, INVITATION_TTL_DAYS,
};
pub use membership::{OrganizationMember, ProjectMember, TeamMember};
pub use organization::Organization;
pub use project::Project;
pub use task::Task;
pub use team::Team;
