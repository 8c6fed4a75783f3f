// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcard Entity
//!
//! A flashcard is identified by its word. Business logic raises events on
//! the entity; they stay pending until the unit of work harvests them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::Arc;

use super::message::Event;

/// An entity that can raise domain events
///
/// Pending events form a FIFO: `raise` appends, `pop_event` removes from the
/// front. Harvesting pops until empty, so after a harvest the entity holds no
/// pending events until new ones are raised.
pub trait Entity: Send + 'static {
    fn pending_events(&mut self) -> &mut VecDeque<Arc<dyn Event>>;

    fn raise<E: Event>(&mut self, event: E)
    where
        Self: Sized,
    {
        self.pending_events().push_back(Arc::new(event));
    }

    fn pop_event(&mut self) -> Option<Arc<dyn Event>> {
        self.pending_events().pop_front()
    }
}

/// Word with its dictionary details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flashcard {
    pub word: String,
    pub definitions: Vec<String>,
    pub synonyms: Vec<String>,
    pub translations: Vec<String>,
    pub examples: Vec<String>,

    #[serde(skip)]
    events: VecDeque<Arc<dyn Event>>,
}

impl Flashcard {
    pub fn new(
        word: impl Into<String>,
        definitions: Vec<String>,
        synonyms: Vec<String>,
        translations: Vec<String>,
        examples: Vec<String>,
    ) -> Self {
        Self {
            word: word.into(),
            definitions,
            synonyms,
            translations,
            examples,
            events: VecDeque::new(),
        }
    }

    /// Flashcard with only a word set
    pub fn bare(word: impl Into<String>) -> Self {
        Self::new(word, Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// Copy of the flashcard data without pending events
    pub fn detached(&self) -> Self {
        Self {
            word: self.word.clone(),
            definitions: self.definitions.clone(),
            synonyms: self.synonyms.clone(),
            translations: self.translations.clone(),
            examples: self.examples.clone(),
            events: VecDeque::new(),
        }
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Entity for Flashcard {
    fn pending_events(&mut self) -> &mut VecDeque<Arc<dyn Event>> {
        &mut self.events
    }
}

impl PartialEq for Flashcard {
    fn eq(&self, other: &Self) -> bool {
        self.word == other.word
    }
}

impl Eq for Flashcard {}

impl PartialOrd for Flashcard {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Flashcard {
    fn cmp(&self, other: &Self) -> Ordering {
        self.word.cmp(&other.word)
    }
}
