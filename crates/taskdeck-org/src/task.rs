//! Task domain model
//!
//! Only the identity and lifecycle fields live here: the soft-delete cascade
//! and the audit vocabulary reach tasks, while task business fields (due
//! dates, recurrence, assignment) belong to the task-management layer above
//! this engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Owning organization (denormalized, for single-hop tenant filtering)
    pub organization_id: Uuid,

    /// Short title
    pub title: String,

    /// User who created the task
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; `None` means active
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new active task.
    pub fn new(
        project_id: Uuid,
        organization_id: Uuid,
        title: impl Into<String>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            project_id,
            organization_id,
            title: title.into(),
            created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check whether the task is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let project_id = Uuid::now_v7();
        let org_id = Uuid::now_v7();
        let task = Task::new(project_id, org_id, "Ship it", Uuid::now_v7());

        assert_eq!(task.project_id, project_id);
        assert_eq!(task.organization_id, org_id);
        assert!(!task.is_deleted());
    }
}
