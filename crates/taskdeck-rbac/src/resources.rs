//! # Resource Kinds
//!
//! Defines the closed set of resource types the engine manages. The tag is
//! carried by audit records and by permission-denied payloads.

use serde::{Deserialize, Serialize};

/// Resource types managed by the tenancy engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Top-level tenant entity.
    Organization,
    /// Team within an organization.
    Team,
    /// Project within a team.
    Project,
    /// Task within a project.
    Task,
    /// A user's membership row at any level.
    Membership,
    /// Pending or accepted invitation.
    Invitation,
    /// Append-only audit trail.
    AuditLog,
}

impl ResourceKind {
    /// Get the string representation of the resource kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "organization",
            ResourceKind::Team => "team",
            ResourceKind::Project => "project",
            ResourceKind::Task => "task",
            ResourceKind::Membership => "membership",
            ResourceKind::Invitation => "invitation",
            ResourceKind::AuditLog => "audit_log",
        }
    }

    /// Parse a resource kind from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "organization" | "org" => Some(ResourceKind::Organization),
            "team" => Some(ResourceKind::Team),
            "project" => Some(ResourceKind::Project),
            "task" => Some(ResourceKind::Task),
            "membership" | "member" => Some(ResourceKind::Membership),
            "invitation" | "invite" => Some(ResourceKind::Invitation),
            "audit_log" | "audit" => Some(ResourceKind::AuditLog),
            _ => None,
        }
    }

    /// Get all resource kinds.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceKind::Organization,
            ResourceKind::Team,
            ResourceKind::Project,
            ResourceKind::Task,
            ResourceKind::Membership,
            ResourceKind::Invitation,
            ResourceKind::AuditLog,
        ]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
