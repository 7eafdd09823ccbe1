//! # Taskdeck Storage Contract
//!
//! This crate defines the storage abstraction the tenancy engine runs on,
//! plus the in-memory reference backend.
//!
//! ## Overview
//!
//! The taskdeck-store crate handles:
//! - **Transactions**: [`Store::begin`] hands out a [`StoreTx`]; every read
//!   observes a consistent snapshot and every write becomes visible at
//!   [`StoreTx::commit`] or not at all. Dropping a transaction rolls back.
//! - **Uniqueness constraints**: slugs, per-scope names, one membership per
//!   (scope, user), and invitation tokens. Violations surface as
//!   [`StoreError::UniqueViolation`] naming the [`Constraint`] — correctness
//!   under concurrent requests is delegated to these constraints, not locks.
//! - **Tenant isolation**: scoped reads take an explicit `org_id` predicate
//!   and never return rows of another organization.
//!
//! ## Backends
//!
//! [`MemoryStore`] is the in-process backend, suitable for single-process
//! deployments and testing. A SQL backend satisfies the same contract with
//! database transactions and unique indexes.

pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use error::{Constraint, StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use store::{Store, StoreTx};
