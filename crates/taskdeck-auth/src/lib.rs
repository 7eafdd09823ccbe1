//! # Taskdeck Authentication & Authorization
//!
//! This crate turns a verified bearer token into a per-request tenant
//! context, and decides allow/deny for every operation against that context.
//!
//! ## Overview
//!
//! The taskdeck-auth crate handles:
//! - **Claims**: the JWT claims shape the engine consumes ([`AccessClaims`])
//! - **Tokens**: HS256 signing and validation with an explicit per-instance
//!   configuration ([`JwtConfig`], [`JwtService`])
//! - **Tenant context**: per-request resolution of {user, organization,
//!   team?, project?, roles} with membership re-validated against the store
//!   ([`TenantResolver`], [`TenantContext`])
//! - **Guards**: the three role checks with cross-level inheritance
//!   ([`authorize::require_org_role`], [`authorize::require_team_role`],
//!   [`authorize::require_project_role`])
//!
//! ## Inheritance
//!
//! Checks evaluate from the top of the hierarchy down and short-circuit on
//! the first sufficient role: an organization Owner or Admin passes every
//! team and project check, and a team Lead passes every check on the team's
//! projects, without holding lower-level membership rows.
//!
//! ## Statelessness
//!
//! The resolver holds no cross-request state. Scope claims in the token are
//! hints; the membership rows in the store are the trust anchor, re-read on
//! every request.
//!
//! ## Feature Flags
//!
//! - `jwt`: token signing/validation via `jsonwebtoken` (enabled by default)

pub mod authorize;
pub mod claims;
pub mod context;
pub mod error;
pub mod jwt;

// Re-export main types for convenience
pub use authorize::{require_org_role, require_project_role, require_team_role};
pub use claims::AccessClaims;
pub use context::{TenantContext, TenantResolver};
pub use error::{AuthError, AuthResult};
pub use jwt::{JwtConfig, JwtService};
