//! # Audit Actions
//!
//! Defines the closed set of actions recorded in the audit trail. Every
//! mutating operation of the engine maps to exactly one of these tags.

use serde::{Deserialize, Serialize};

/// Actions recorded against resources in the audit trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Resource was created.
    Create,

    /// Resource fields were updated.
    Update,

    /// Resource was marked deleted (recoverable).
    SoftDelete,

    /// Soft-deleted resource was restored.
    Recover,

    /// A member was added to a scope.
    AddMember,

    /// A member was removed from a scope.
    RemoveMember,

    /// An invitation was accepted, granting memberships.
    AcceptInvitation,

    /// A pending invitation was revoked.
    RevokeInvitation,
}

impl AuditAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::SoftDelete => "soft_delete",
            AuditAction::Recover => "recover",
            AuditAction::AddMember => "add_member",
            AuditAction::RemoveMember => "remove_member",
            AuditAction::AcceptInvitation => "accept_invitation",
            AuditAction::RevokeInvitation => "revoke_invitation",
        }
    }

    /// Parse an action from its string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" => Some(AuditAction::Create),
            "update" => Some(AuditAction::Update),
            "soft_delete" | "delete" => Some(AuditAction::SoftDelete),
            "recover" | "restore" => Some(AuditAction::Recover),
            "add_member" => Some(AuditAction::AddMember),
            "remove_member" => Some(AuditAction::RemoveMember),
            "accept_invitation" => Some(AuditAction::AcceptInvitation),
            "revoke_invitation" => Some(AuditAction::RevokeInvitation),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::SoftDelete,
            AuditAction::Recover,
            AuditAction::AddMember,
            AuditAction::RemoveMember,
            AuditAction::AcceptInvitation,
            AuditAction::RevokeInvitation,
        ]
    }

    /// Check if this action removes access or data.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            AuditAction::SoftDelete | AuditAction::RemoveMember | AuditAction::RevokeInvitation
        )
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
