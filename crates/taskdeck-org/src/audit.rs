//! Audit trail domain model
//!
//! Every mutating operation of the engine writes exactly one audit record in
//! the same transaction as the mutation it describes. The trail is
//! append-only: the application never updates or deletes these rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskdeck_rbac::{AuditAction, ResourceKind};

/// One entry of the append-only audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Organization the action was scoped to
    pub organization_id: Uuid,

    /// Acting user; `None` denotes a system-initiated action
    pub user_id: Option<Uuid>,

    /// Kind of resource the action targeted
    pub resource: ResourceKind,

    /// Id of the targeted resource
    pub resource_id: Uuid,

    /// What happened
    pub action: AuditAction,

    /// Structured payload capturing the before/after values relevant to the
    /// action
    pub context: serde_json::Value,

    /// When the record was written
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Creates a new audit record.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - Tenant scope of the action
    /// * `user_id` - Acting user, or `None` for system actions
    /// * `action` - The action tag
    /// * `resource` - Kind of the targeted resource
    /// * `resource_id` - Id of the targeted resource
    /// * `context` - Structured before/after payload
    pub fn new(
        organization_id: Uuid,
        user_id: Option<Uuid>,
        action: AuditAction,
        resource: ResourceKind,
        resource_id: Uuid,
        context: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            resource,
            resource_id,
            action,
            context,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_record_creation() {
        let org_id = Uuid::now_v7();
        let actor = Uuid::now_v7();
        let target = Uuid::now_v7();

        let record = AuditRecord::new(
            org_id,
            Some(actor),
            AuditAction::Create,
            ResourceKind::Team,
            target,
            serde_json::json!({"name": "Engineering"}),
        );

        assert_eq!(record.organization_id, org_id);
        assert_eq!(record.user_id, Some(actor));
        assert_eq!(record.action, AuditAction::Create);
        assert_eq!(record.resource, ResourceKind::Team);
        assert_eq!(record.resource_id, target);
        assert_eq!(record.context["name"], "Engineering");
    }

    #[test]
    fn test_system_action_has_no_user() {
        let record = AuditRecord::new(
            Uuid::now_v7(),
            None,
            AuditAction::SoftDelete,
            ResourceKind::Task,
            Uuid::now_v7(),
            serde_json::Value::Null,
        );

        assert!(record.user_id.is_none());
    }
}
