//! Bearer-token claims
//!
//! This module defines the claims structure the engine consumes. The token
//! is issued by the authentication collaborator after login; the engine never
//! sees credentials, only verified claims. Scope claims (organization, team,
//! project) are hints — membership is re-validated against current storage
//! state on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard JWT claims with tenant-scope extensions.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use uuid::Uuid;
/// use taskdeck_auth::AccessClaims;
///
/// let user_id = Uuid::now_v7();
/// let org_id = Uuid::now_v7();
/// let claims = AccessClaims::new(user_id, Duration::hours(1)).with_org(org_id);
/// assert_eq!(claims.user_id(), Some(user_id));
/// assert_eq!(claims.org_id, Some(org_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    // Standard JWT claims (RFC 7519)
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    // Tenant-scope claims
    /// Active organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<Uuid>,

    /// Active team within the organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,

    /// Active project within the organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

impl AccessClaims {
    /// Create new claims for a user with no tenant scope.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's unique identifier
    /// * `duration` - Token validity duration
    pub fn new(user_id: Uuid, duration: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iss: "taskdeck".to_string(),
            exp: (now + duration).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            org_id: None,
            team_id: None,
            project_id: None,
        }
    }

    /// Get the subject as a user id, if well-formed.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get expiration as DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Set the active organization.
    pub fn with_org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    /// Set the active team.
    pub fn with_team(mut self, team_id: Uuid) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Set the active project.
    pub fn with_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::now_v7();
        let claims = AccessClaims::new(user_id, Duration::hours(1));

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.iss, "taskdeck");
        assert!(!claims.is_expired());
        assert!(claims.org_id.is_none());
    }

    #[test]
    fn test_claims_with_scope() {
        let org_id = Uuid::now_v7();
        let team_id = Uuid::now_v7();
        let claims = AccessClaims::new(Uuid::now_v7(), Duration::hours(1))
            .with_org(org_id)
            .with_team(team_id);

        assert_eq!(claims.org_id, Some(org_id));
        assert_eq!(claims.team_id, Some(team_id));
        assert!(claims.project_id.is_none());
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = AccessClaims::new(Uuid::now_v7(), Duration::hours(1));
        claims.exp = Utc::now().timestamp() - 3600;

        assert!(claims.is_expired());
    }

    #[test]
    fn test_malformed_subject() {
        let mut claims = AccessClaims::new(Uuid::now_v7(), Duration::hours(1));
        claims.sub = "not-a-uuid".to_string();

        assert_eq!(claims.user_id(), None);
    }
}
