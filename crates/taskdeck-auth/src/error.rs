//! Error types for authentication and authorization
//!
//! This module defines the failures of token validation, tenant context
//! resolution, and the role checks. All of them are recoverable values
//! returned to the caller; only storage connectivity failures pass through
//! unchanged.

use taskdeck_rbac::ResourceKind;
use taskdeck_store::StoreError;
use thiserror::Error;

/// Authentication and authorization error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bearer token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Bearer token is invalid (malformed, bad signature, etc.)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is missing a required claim
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// Token carries no organization claim; every protected operation
    /// requires an active organization
    #[error("No organization in scope")]
    MissingTenantContext,

    /// The referenced organization does not exist, or the caller is not
    /// currently a member of it. The two are deliberately indistinguishable.
    #[error("Organization context could not be resolved")]
    InvalidTenantContext,

    /// A team-scoped check was evaluated with no team in scope and no
    /// inheriting organization role
    #[error("No team in scope")]
    MissingTeamContext,

    /// A project-scoped check was evaluated with no project in scope and no
    /// inheriting role
    #[error("No project in scope")]
    MissingProjectContext,

    /// The caller's resolved role, after inheritance, is insufficient.
    /// Carries the resource and the minimum required role — never the
    /// caller's actual role.
    #[error("Permission denied: {resource} requires {required} or higher")]
    PermissionDenied {
        /// Resource the check guarded
        resource: ResourceKind,
        /// Minimum role that would have passed
        required: &'static str,
    },

    /// Storage connectivity failure, surfaced unchanged
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Result type for authentication and authorization operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Denials and context failures are expected traffic; only storage
    /// failures indicate something is wrong with the process.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Storage(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::MissingClaim(_) => "MISSING_CLAIM",
            AuthError::MissingTenantContext => "MISSING_TENANT_CONTEXT",
            AuthError::InvalidTenantContext => "INVALID_TENANT_CONTEXT",
            AuthError::MissingTeamContext => "MISSING_TEAM_CONTEXT",
            AuthError::MissingProjectContext => "MISSING_PROJECT_CONTEXT",
            AuthError::PermissionDenied { .. } => "PERMISSION_DENIED",
            AuthError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
