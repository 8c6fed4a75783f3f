// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcard command and event handlers
//!
//! Each handler opens its own transaction, commits on success, and lets
//! the transaction roll back on drop when any step fails.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::adapters::{FlashcardTransaction, LocalFlashcardRepository};
use crate::bus::{CommandHandlers, EventHandlers};
use crate::domain::{DeleteFlashcard, FlashcardFetchedFromGoogleApi};
use crate::errors::HandlerResult;
use crate::unit_of_work::{Transaction, UnitOfWork};

/// Delete the flashcard for the command's word
///
/// # Errors
/// - `DomainError::FlashcardDeletion` if no flashcard exists for the word
pub async fn delete_flashcard<U>(command: DeleteFlashcard, uow: Arc<U>) -> HandlerResult<Value>
where
    U: UnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    let mut tx = uow.begin().await?;
    tx.flashcards().delete_flashcard(&command.word).await?;
    tx.commit().await?;

    info!(word = %command.word, "Deleted flashcard");
    Ok(Value::Null)
}

/// Store a flashcard fetched from the online dictionary
pub async fn create_flashcard<U>(
    event: Arc<FlashcardFetchedFromGoogleApi>,
    uow: Arc<U>,
) -> HandlerResult<()>
where
    U: UnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    let mut tx = uow.begin().await?;
    tx.flashcards()
        .create_flashcard(event.flashcard().detached())
        .await?;
    tx.commit().await?;

    info!(word = %event.flashcard().word, "Stored fetched flashcard");
    Ok(())
}

/// Production command handler table
pub fn command_handlers<U>() -> CommandHandlers<U>
where
    U: UnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    CommandHandlers::new().register(delete_flashcard::<U>)
}

/// Production event handler table
pub fn event_handlers<U>() -> EventHandlers<U>
where
    U: UnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    EventHandlers::new().register(create_flashcard::<U>)
}
