// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory unit of work
//!
//! Committed flashcards live in a map shared by every transaction. A
//! transaction stages its changes privately and applies them all at once on
//! commit, so concurrent handlers never observe each other's uncommitted
//! work. The store can be switched off to simulate a lost connection.
//!
//! Every transaction tracks the flashcards it touched in its own seen-set.
//! Committing hands them to the unit of work for the next harvest; rolling
//! back or dropping the transaction discards their pending events.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

use super::{lock, SeenSet, Shared, Transaction, UnitOfWork};
use crate::adapters::{
    FlashcardQuery, FlashcardTransaction, FlashcardUnitOfWork, LocalFlashcardRepository,
    RemoteFlashcardRepository,
};
use crate::domain::{Event, Flashcard};
use crate::errors::{DomainError, PersistenceError, PersistenceResult, RepositoryResult};

#[derive(Default)]
struct StoreState {
    flashcards: Mutex<BTreeMap<String, Shared<Flashcard>>>,
    unavailable: AtomicBool,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    harvest: SeenSet<Flashcard>,
}

impl StoreState {
    fn ensure_available(&self) -> PersistenceResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "in-memory store is switched off".to_string(),
            ));
        }
        Ok(())
    }
}

/// Unit of work over an in-memory flashcard store and a remote dictionary
///
/// Clones share the same store.
#[derive(Clone)]
pub struct InMemoryUnitOfWork {
    state: Arc<StoreState>,
    remote: Arc<dyn RemoteFlashcardRepository>,
}

impl InMemoryUnitOfWork {
    pub fn new(remote: Arc<dyn RemoteFlashcardRepository>) -> Self {
        Self {
            state: Arc::default(),
            remote,
        }
    }

    /// Switch the store on or off; while off, begin, commit, rollback and
    /// queries fail with `PersistenceError::Unavailable`
    pub fn set_available(&self, available: bool) {
        self.state.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of successful commits
    pub fn commits(&self) -> usize {
        self.state.commits.load(Ordering::SeqCst)
    }

    /// Number of transactions that ended without committing
    pub fn rollbacks(&self) -> usize {
        self.state.rollbacks.load(Ordering::SeqCst)
    }

    /// Words currently committed, in order
    pub fn committed_words(&self) -> Vec<String> {
        lock(&self.state.flashcards).keys().cloned().collect()
    }

    /// Flashcards handed over by committed transactions, awaiting harvest
    pub fn pending_harvest(&self) -> &SeenSet<Flashcard> {
        &self.state.harvest
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> PersistenceResult<InMemoryTransaction> {
        self.state.ensure_available()?;
        Ok(InMemoryTransaction {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
            loaded: BTreeMap::new(),
            seen: SeenSet::new(),
            finished: false,
        })
    }

    fn collect_new_events(&self) -> Vec<Arc<dyn Event>> {
        let mut events = self.state.harvest.drain_events();
        events.extend(self.remote.seen().drain_events());
        events
    }
}

impl FlashcardUnitOfWork for InMemoryUnitOfWork {
    fn remote_flashcards(&self) -> Arc<dyn RemoteFlashcardRepository> {
        Arc::clone(&self.remote)
    }
}

#[derive(Debug)]
enum Change {
    Create(Shared<Flashcard>),
    Delete(String),
}

/// One transactional scope over the in-memory store
///
/// Also serves as its own [`LocalFlashcardRepository`]: reads see committed
/// state overlaid with this transaction's staged changes. A committed
/// flashcard is loaded as a copy private to the transaction, so events
/// raised on it stay with this transaction until it commits.
pub struct InMemoryTransaction {
    state: Arc<StoreState>,
    staged: Vec<Change>,
    loaded: BTreeMap<String, Shared<Flashcard>>,
    seen: SeenSet<Flashcard>,
    finished: bool,
}

impl InMemoryTransaction {
    /// Flashcards touched through this transaction since it began
    pub fn seen(&self) -> &SeenSet<Flashcard> {
        &self.seen
    }

    fn lookup(&mut self, word: &str) -> Option<Shared<Flashcard>> {
        for change in self.staged.iter().rev() {
            match change {
                Change::Create(handle) if lock(handle).word == word => {
                    return Some(Arc::clone(handle))
                }
                Change::Delete(deleted) if deleted == word => return None,
                _ => {}
            }
        }
        if let Some(handle) = self.loaded.get(word) {
            return Some(Arc::clone(handle));
        }

        let committed = lock(&self.state.flashcards)
            .get(word)
            .map(|handle| lock(handle).detached())?;
        let handle: Shared<Flashcard> = Arc::new(Mutex::new(committed));
        self.loaded.insert(word.to_string(), Arc::clone(&handle));
        Some(handle)
    }

    fn discard_touched(&self) {
        let discarded = self.seen.discard();
        if discarded > 0 {
            trace!(discarded, "Discarded events of uncommitted transaction");
        }
    }

    /// Committed state with this transaction's changes applied
    fn overlay(&self) -> PersistenceResult<BTreeMap<String, Shared<Flashcard>>> {
        let committed = lock(&self.state.flashcards).clone();
        self.apply(committed)
    }

    fn apply(
        &self,
        mut flashcards: BTreeMap<String, Shared<Flashcard>>,
    ) -> PersistenceResult<BTreeMap<String, Shared<Flashcard>>> {
        for change in &self.staged {
            match change {
                Change::Create(handle) => {
                    let word = lock(handle).word.clone();
                    if flashcards.contains_key(&word) {
                        return Err(PersistenceError::Conflict(format!(
                            "flashcard for word={word:?} already exists"
                        )));
                    }
                    flashcards.insert(word, Arc::clone(handle));
                }
                Change::Delete(word) => {
                    flashcards.remove(word);
                }
            }
        }
        Ok(flashcards)
    }

    /// Apply staged changes to the committed store, all or nothing
    fn publish(&self) -> PersistenceResult<()> {
        let mut store = lock(&self.state.flashcards);
        let updated = self.apply(store.clone())?;
        *store = updated;
        Ok(())
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(mut self) -> PersistenceResult<()> {
        self.state.ensure_available()?;

        self.publish()?;
        self.finished = true;
        self.seen.hand_over(&self.state.harvest);
        self.state.commits.fetch_add(1, Ordering::SeqCst);
        debug!(changes = self.staged.len(), "Committed transaction");
        Ok(())
    }

    async fn rollback(mut self) -> PersistenceResult<()> {
        self.staged.clear();
        self.discard_touched();
        self.finished = true;
        self.state.ensure_available()?;

        self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
        trace!("Rolled back transaction");
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.discard_touched();
            self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
            trace!(discarded = self.staged.len(), "Transaction dropped without commit");
        }
    }
}

impl FlashcardTransaction for InMemoryTransaction {
    type Repository = Self;

    fn flashcards(&mut self) -> &mut Self {
        self
    }
}

#[async_trait]
impl LocalFlashcardRepository for InMemoryTransaction {
    async fn create_flashcard(&mut self, flashcard: Flashcard) -> PersistenceResult<Shared<Flashcard>> {
        self.state.ensure_available()?;

        let handle: Shared<Flashcard> = Arc::new(Mutex::new(flashcard));
        self.staged.push(Change::Create(Arc::clone(&handle)));
        self.seen.add(&handle);
        Ok(handle)
    }

    async fn retrieve_flashcard_by_word(
        &mut self,
        word: &str,
    ) -> PersistenceResult<Option<Shared<Flashcard>>> {
        self.state.ensure_available()?;

        let found = self.lookup(word);
        if let Some(handle) = &found {
            self.seen.add(handle);
        }
        Ok(found)
    }

    async fn retrieve_all_flashcards(
        &mut self,
        query: &FlashcardQuery,
    ) -> PersistenceResult<Vec<Flashcard>> {
        self.state.ensure_available()?;

        // Pages are detached projections; nothing can raise events on them
        let matcher = query.matcher()?;
        Ok(self
            .overlay()?
            .into_iter()
            .filter(|(word, _)| query.admits(&matcher, word))
            .take(query.limit)
            .map(|(_, handle)| query.project(&lock(&handle)))
            .collect())
    }

    async fn delete_flashcard(&mut self, word: &str) -> RepositoryResult<()> {
        self.state.ensure_available()?;

        let Some(handle) = self.lookup(word) else {
            return Err(DomainError::FlashcardDeletion(format!("No such flashcard for word={word:?}.")).into());
        };
        self.staged.push(Change::Delete(word.to_string()));
        self.loaded.remove(word);
        self.seen.remove(&handle);
        Ok(())
    }
}
