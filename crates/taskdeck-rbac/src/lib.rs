//! # Taskdeck RBAC (Role-Based Access Control)
//!
//! This crate provides the role-based access control primitives shared
//! across the Taskdeck platform crates.
//!
//! ## Overview
//!
//! The taskdeck-rbac crate handles:
//! - **Roles**: the three closed role vocabularies, one per level of the
//!   tenancy tree (organization, team, project), each with a total order
//!   expressed as an integer rank
//! - **Resource kinds**: the closed set of resource tags carried by audit
//!   records and denial payloads
//! - **Audit actions**: the closed set of actions the audit trail records
//!
//! ## Role Hierarchy
//!
//! ```text
//! Organization: Owner(3) > Admin(2) > Member(1)
//! Team:         Lead(2)  > Member(1)
//! Project:      Manager(3) > Contributor(2) > Viewer(1)
//! ```
//!
//! `meets(actual, required)` is the single comparison primitive: a role
//! satisfies a check iff its rank is at least the required rank. Cross-level
//! inheritance (an org Owner acting at team or project scope) is evaluated by
//! the authorization guards in `taskdeck-auth`, not here — this crate only
//! knows about ranks within one level.
//!
//! ## Usage
//!
//! ```rust
//! use taskdeck_rbac::{OrgRole, ProjectRole};
//!
//! assert!(OrgRole::Owner.meets(OrgRole::Admin));
//! assert!(!ProjectRole::Viewer.meets(ProjectRole::Contributor));
//!
//! // Unknown role strings are rejected at the membership-creation boundary.
//! assert_eq!(OrgRole::parse("superuser"), None);
//! ```

pub mod actions;
pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use actions::AuditAction;
pub use resources::ResourceKind;
pub use roles::{OrgRole, ProjectRole, TeamRole};
