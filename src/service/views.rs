// Copyright (c) 2025 - Cowboy AI, Inc.
//! Read-side flashcard views
//!
//! Views read inside a transaction they never commit. A word missing
//! locally is looked up online; a hit is published as
//! [`FlashcardFetchedFromGoogleApi`] so the event handlers store it.

use tracing::debug;

use crate::adapters::{FlashcardQuery, FlashcardTransaction, FlashcardUnitOfWork, LocalFlashcardRepository};
use crate::bus::MessageBus;
use crate::domain::{Flashcard, FlashcardFetchedFromGoogleApi, Message};
use crate::errors::ViewResult;
use crate::unit_of_work::{lock, Transaction, UnitOfWork};

/// Flashcard for `word`, from local storage or the online dictionary
///
/// # Errors
/// - `ViewError::Persistence` if local storage is unavailable
/// - `ViewError::Scraper` if the online lookup fails
/// - `ViewError::Domain` if the fetched flashcard has a blank word
pub async fn fetch_flashcard_by_word<U>(
    word: &str,
    bus: &MessageBus<U>,
) -> ViewResult<Option<Flashcard>>
where
    U: FlashcardUnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    let uow = bus.unit_of_work();

    let mut tx = uow.begin().await?;
    let local = tx
        .flashcards()
        .retrieve_flashcard_by_word(word)
        .await?
        .map(|found| lock(&found).detached());
    tx.rollback().await?;

    if local.is_some() {
        debug!(word, "Found flashcard locally");
        return Ok(local);
    }

    let remote = uow.remote_flashcards();
    let lookup_word = word.to_string();
    let fetched =
        tokio::task::spawn_blocking(move || remote.retrieve_flashcard_by_word(&lookup_word))
            .await??;

    let Some(found) = fetched else {
        debug!(word, "Word not in online dictionary");
        return Ok(None);
    };

    let flashcard = lock(&found).detached();
    let event = FlashcardFetchedFromGoogleApi::new(flashcard.clone())?;
    bus.handle(Message::event(event)).await?;
    Ok(Some(flashcard))
}

/// One page of locally stored flashcards
///
/// # Errors
/// - `ViewError::Persistence` if local storage is unavailable or the
///   query's pattern is invalid
pub async fn fetch_all_flashcards<U>(query: &FlashcardQuery, uow: &U) -> ViewResult<Vec<Flashcard>>
where
    U: UnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    let mut tx = uow.begin().await?;
    let flashcards = tx.flashcards().retrieve_all_flashcards(query).await?;
    tx.rollback().await?;
    Ok(flashcards)
}
