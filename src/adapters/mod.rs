// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcard Repositories
//!
//! Repository ports used by the flashcard handlers and views:
//!
//! - [`LocalFlashcardRepository`] - transactional local storage, reached
//!   through a [`FlashcardTransaction`]
//! - [`RemoteFlashcardRepository`] - blocking lookup in the online
//!   dictionary ([`google::GoogleFlashcardRepository`])
//!
//! Both track every entity they hand out in a [`SeenSet`] so the unit of
//! work can harvest events raised on them.

pub mod google;

use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

use crate::domain::Flashcard;
use crate::errors::{PersistenceResult, RepositoryResult, ScraperResult};
use crate::unit_of_work::{SeenSet, Shared, Transaction, UnitOfWork};

pub use google::{GoogleFlashcardRepository, ScraperSession, WebScraper};

/// Local flashcard storage bound to one transaction
#[async_trait]
pub trait LocalFlashcardRepository: Send {
    /// Stage a new flashcard; it becomes visible to others on commit
    async fn create_flashcard(&mut self, flashcard: Flashcard) -> PersistenceResult<Shared<Flashcard>>;

    async fn retrieve_flashcard_by_word(
        &mut self,
        word: &str,
    ) -> PersistenceResult<Option<Shared<Flashcard>>>;

    /// Flashcards matching `query`, ordered by word
    async fn retrieve_all_flashcards(
        &mut self,
        query: &FlashcardQuery,
    ) -> PersistenceResult<Vec<Flashcard>>;

    /// Stage removal of the flashcard for `word`
    ///
    /// # Errors
    /// - `DomainError::FlashcardDeletion` if there is no such flashcard
    async fn delete_flashcard(&mut self, word: &str) -> RepositoryResult<()>;
}

/// Online dictionary lookup
///
/// Blocking: callers on an async runtime should run it through
/// `tokio::task::spawn_blocking`.
pub trait RemoteFlashcardRepository: Send + Sync {
    fn retrieve_flashcard_by_word(&self, word: &str) -> ScraperResult<Option<Shared<Flashcard>>>;

    fn seen(&self) -> &SeenSet<Flashcard>;
}

/// Transaction exposing local flashcard storage
pub trait FlashcardTransaction: Transaction {
    type Repository: LocalFlashcardRepository;

    fn flashcards(&mut self) -> &mut Self::Repository;
}

/// Unit of work with both flashcard repositories
pub trait FlashcardUnitOfWork: UnitOfWork {
    fn remote_flashcards(&self) -> Arc<dyn RemoteFlashcardRepository>;
}

/// Search parameters for [`LocalFlashcardRepository::retrieve_all_flashcards`]
///
/// Pagination is keyset based: only words strictly greater than
/// `last_retrieved_word` are returned. Detail lists whose flag is off come
/// back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardQuery {
    pub regular_expression: String,
    pub with_definitions: bool,
    pub with_synonyms: bool,
    pub with_translations: bool,
    pub with_examples: bool,
    pub last_retrieved_word: String,
    pub limit: usize,
}

impl Default for FlashcardQuery {
    fn default() -> Self {
        Self {
            regular_expression: ".".to_string(),
            with_definitions: false,
            with_synonyms: false,
            with_translations: false,
            with_examples: false,
            last_retrieved_word: String::new(),
            limit: 4,
        }
    }
}

impl FlashcardQuery {
    /// Query returning every detail list
    pub fn with_all_details(mut self) -> Self {
        self.with_definitions = true;
        self.with_synonyms = true;
        self.with_translations = true;
        self.with_examples = true;
        self
    }

    pub fn matcher(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.regular_expression)
    }

    /// Whether `word` belongs on the requested page, ignoring `limit`
    pub fn admits(&self, matcher: &Regex, word: &str) -> bool {
        matcher.is_match(word) && word > self.last_retrieved_word.as_str()
    }

    /// Detached copy of `flashcard` with unrequested details cleared
    pub fn project(&self, flashcard: &Flashcard) -> Flashcard {
        let mut projected = flashcard.detached();
        if !self.with_definitions {
            projected.definitions.clear();
        }
        if !self.with_synonyms {
            projected.synonyms.clear();
        }
        if !self.with_translations {
            projected.translations.clear();
        }
        if !self.with_examples {
            projected.examples.clear();
        }
        projected
    }
}
