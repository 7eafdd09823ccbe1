//! Error types for the tenancy services
//!
//! Every error here is a typed, recoverable value returned to the caller.
//! The only unrecoverable kind is a storage connectivity failure, which
//! passes through unchanged. Cross-tenant probes resolve to `NotFound` —
//! "does not exist" and "not yours to see" are deliberately the same answer.

use taskdeck_auth::AuthError;
use taskdeck_rbac::ResourceKind;
use taskdeck_store::{Constraint, StoreError};
use thiserror::Error;

/// Service error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced id does not resolve, or resolves to something the
    /// caller lacks even read visibility on
    #[error("{0} not found")]
    NotFound(ResourceKind),

    /// Token, context, or role check failure from the authorization layer
    #[error(transparent)]
    Access(AuthError),

    /// Attempt to grant a child-scope membership to a user lacking the
    /// required parent-scope membership
    #[error("{child} membership requires an existing {parent} membership")]
    PrerequisiteMembershipMissing {
        /// Scope the user must already belong to
        parent: ResourceKind,
        /// Scope the grant was attempted at
        child: ResourceKind,
    },

    /// Organization slug is already taken
    #[error("slug is already taken")]
    DuplicateSlug,

    /// Name is already taken within the parent scope
    #[error("name is already taken within its scope")]
    DuplicateName,

    /// The user already holds a membership at this scope
    #[error("user is already a member at this scope")]
    DuplicateMember,

    /// `soft_delete` on an entity that is already deleted
    #[error("{0} is already deleted")]
    AlreadyDeleted(ResourceKind),

    /// `recover` on an entity that is not deleted
    #[error("{0} is not deleted")]
    NotDeleted(ResourceKind),

    /// Removing this member would leave the organization without an owner
    #[error("cannot remove the last owner of an organization")]
    CannotRemoveLastOwner,

    /// The invitation is past its expiry
    #[error("invitation has expired")]
    InvitationExpired,

    /// The invitation was already accepted; tokens are single-use
    #[error("invitation has already been accepted")]
    InvitationAlreadyAccepted,

    /// No invitation matches the given token or id
    #[error("invitation not found")]
    InvitationNotFound,

    /// Storage connectivity failure, surfaced unchanged
    #[error(transparent)]
    Storage(StoreError),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(Constraint::OrganizationSlug) => {
                ServiceError::DuplicateSlug
            }
            StoreError::UniqueViolation(Constraint::TeamName)
            | StoreError::UniqueViolation(Constraint::ProjectName) => ServiceError::DuplicateName,
            StoreError::UniqueViolation(Constraint::OrganizationMember)
            | StoreError::UniqueViolation(Constraint::TeamMember)
            | StoreError::UniqueViolation(Constraint::ProjectMember) => {
                ServiceError::DuplicateMember
            }
            // A token collision is not addressable by the caller; treat it
            // like any other backend failure.
            StoreError::UniqueViolation(Constraint::InvitationToken) => {
                ServiceError::Storage(err)
            }
            StoreError::Connection(_) => ServiceError::Storage(err),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Storage(e) => ServiceError::from(e),
            other => ServiceError::Access(other),
        }
    }
}

impl ServiceError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Access(err) => err.error_code(),
            ServiceError::PrerequisiteMembershipMissing { .. } => {
                "PREREQUISITE_MEMBERSHIP_MISSING"
            }
            ServiceError::DuplicateSlug => "DUPLICATE_SLUG",
            ServiceError::DuplicateName => "DUPLICATE_NAME",
            ServiceError::DuplicateMember => "DUPLICATE_MEMBER",
            ServiceError::AlreadyDeleted(_) => "ALREADY_DELETED",
            ServiceError::NotDeleted(_) => "NOT_DELETED",
            ServiceError::CannotRemoveLastOwner => "CANNOT_REMOVE_LAST_OWNER",
            ServiceError::InvitationExpired => "INVITATION_EXPIRED",
            ServiceError::InvitationAlreadyAccepted => "INVITATION_ALREADY_ACCEPTED",
            ServiceError::InvitationNotFound => "INVITATION_NOT_FOUND",
            ServiceError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_mapping() {
        let err: ServiceError = StoreError::UniqueViolation(Constraint::OrganizationSlug).into();
        assert!(matches!(err, ServiceError::DuplicateSlug));

        let err: ServiceError = StoreError::UniqueViolation(Constraint::ProjectName).into();
        assert!(matches!(err, ServiceError::DuplicateName));

        let err: ServiceError = StoreError::UniqueViolation(Constraint::TeamMember).into();
        assert!(matches!(err, ServiceError::DuplicateMember));
    }

    #[test]
    fn test_connectivity_passes_through() {
        let err: ServiceError = StoreError::Connection("down".into()).into();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_auth_storage_flattens() {
        let err: ServiceError =
            AuthError::Storage(StoreError::Connection("down".into())).into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ServiceError::NotFound(ResourceKind::Team).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ServiceError::CannotRemoveLastOwner.error_code(),
            "CANNOT_REMOVE_LAST_OWNER"
        );
        assert_eq!(
            ServiceError::Access(AuthError::MissingTeamContext).error_code(),
            "MISSING_TEAM_CONTEXT"
        );
    }
}
