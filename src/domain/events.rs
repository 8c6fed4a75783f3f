// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcard events

use super::flashcard::Flashcard;
use super::message::Event;
use crate::errors::DomainError;

/// A flashcard was fetched from the online dictionary
///
/// # Invariants
/// - The flashcard word is trimmed
/// - The trimmed word is non-empty
#[derive(Debug, Clone)]
pub struct FlashcardFetchedFromGoogleApi {
    flashcard: Flashcard,
}

impl FlashcardFetchedFromGoogleApi {
    pub fn new(mut flashcard: Flashcard) -> Result<Self, DomainError> {
        flashcard.word = flashcard.word.trim().to_string();
        if flashcard.word.is_empty() {
            return Err(DomainError::FlashcardCreation(
                "Cannot create an flashcard for an empty word.".to_string(),
            ));
        }

        Ok(Self {
            flashcard: flashcard.detached(),
        })
    }

    pub fn flashcard(&self) -> &Flashcard {
        &self.flashcard
    }
}

impl Event for FlashcardFetchedFromGoogleApi {}
