//! Audit trail read path
//!
//! Audit records are written by the other services, inside their own
//! transactions. This service is the administrator-facing read path over the
//! trail; nothing anywhere exposes an update or delete.

use std::sync::Arc;

use taskdeck_auth::{require_org_role, TenantContext};
use taskdeck_org::AuditRecord;
use taskdeck_rbac::OrgRole;
use taskdeck_store::{Store, StoreTx};

use crate::error::ServiceResult;

/// Read access to the append-only audit trail.
pub struct AuditService {
    store: Arc<dyn Store>,
}

impl AuditService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List the organization's audit records, newest first, up to `limit`
    /// when given. Requires organization Admin or above.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<AuditRecord>> {
        require_org_role(ctx, OrgRole::Admin)?;
        let tx = self.store.begin().await?;
        Ok(tx.audit_log(ctx.organization_id, limit).await?)
    }
}
