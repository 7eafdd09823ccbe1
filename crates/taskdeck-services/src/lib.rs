//! # Taskdeck Tenancy Services
//!
//! This crate is the engine behind every hierarchy operation of the Taskdeck
//! platform: organization, team, and project lifecycle, membership
//! management, the soft-delete/recovery state machine, invitations, and the
//! audit trail.
//!
//! ## Overview
//!
//! - [`OrganizationService`]: tenant lifecycle and org-level membership
//! - [`TeamService`]: teams inside an organization
//! - [`ProjectService`]: projects inside a team
//! - [`InvitationService`]: expiring, single-use onboarding tokens
//! - [`AuditService`]: administrator read access to the audit trail
//!
//! ## Transactional shape
//!
//! Every service call opens exactly one store transaction; authorization
//! checks, membership lookups, the mutation, any cascade, and the audit
//! record all happen inside it. Either everything becomes visible together
//! or nothing does — a failed call leaves no partial state, and an upstream
//! timeout cancels cleanly because nothing commits until the end.
//!
//! Races between concurrent requests are settled by the store's uniqueness
//! constraints: the losing request gets the matching domain error
//! ([`ServiceError::DuplicateSlug`], [`ServiceError::DuplicateName`],
//! [`ServiceError::DuplicateMember`]) instead of silently overwriting state.
//! Soft-delete transition checks run inside the same transaction as the
//! write, so two racing deletes cannot both succeed.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use taskdeck_services::{CreateOrganization, OrganizationService};
//! use taskdeck_store::MemoryStore;
//! use uuid::Uuid;
//!
//! async fn bootstrap() {
//!     let store = Arc::new(MemoryStore::new());
//!     let orgs = OrganizationService::new(store);
//!
//!     let alice = Uuid::now_v7();
//!     let org = orgs
//!         .create(alice, CreateOrganization {
//!             name: "Acme".into(),
//!             slug: "acme".into(),
//!             description: None,
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(org.slug, "acme");
//! }
//! ```

pub mod audit;
pub mod error;
pub mod invitation;
pub mod organization;
pub mod project;
pub mod team;

// Re-export main types for convenience
pub use audit::AuditService;
pub use error::{ServiceError, ServiceResult};
pub use invitation::{CreateInvitation, InvitationService};
pub use organization::{CreateOrganization, OrganizationService, UpdateOrganization};
pub use project::{CreateProject, ProjectService, UpdateProject};
pub use team::{CreateTeam, TeamService, UpdateTeam};
