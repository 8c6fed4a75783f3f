// Copyright (c) 2025 - Cowboy AI, Inc.
//! Unit of Work Contract
//!
//! The bus depends on two things from persistence: a scoped transaction it
//! can hand to handlers, and a way to drain events raised on every entity
//! touched through it.
//!
//! ```text
//! UnitOfWork (shared, one per bus)
//!    │ begin()
//!    ▼
//! Transaction (owned, one per handler invocation)
//!    │ commit() / rollback() / drop = rollback
//!    ▼
//! Entities ──raise──► pending events ──collect_new_events()──► bus queue
//! ```
//!
//! Each concurrent handler owns its own transaction value, so there is no
//! bus-level mutable session shared between tasks.

pub mod in_memory;
mod seen;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::Event;
use crate::errors::PersistenceResult;

pub use in_memory::{InMemoryTransaction, InMemoryUnitOfWork};
pub use seen::SeenSet;

/// Entity handle shared between a repository's seen-set and its callers
pub type Shared<T> = Arc<Mutex<T>>;

/// Transaction factory and event harvester
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    type Transaction: Transaction;

    /// Open a new transactional scope
    ///
    /// # Errors
    /// - `PersistenceError::Unavailable` if the store cannot be reached
    async fn begin(&self) -> PersistenceResult<Self::Transaction>;

    /// Drain pending events from every entity seen through this unit of work
    ///
    /// One-shot and destructive: an event is returned at most once. Order is
    /// repository registration order, then first-seen order per repository,
    /// then raise order per entity. Returns an empty list when nothing is
    /// pending.
    fn collect_new_events(&self) -> Vec<Arc<dyn Event>>;
}

/// A transactional scope
///
/// Dropping a transaction without calling [`commit`](Transaction::commit)
/// discards its staged changes.
#[async_trait]
pub trait Transaction: Send + Sized {
    async fn commit(self) -> PersistenceResult<()>;

    async fn rollback(self) -> PersistenceResult<()>;
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
