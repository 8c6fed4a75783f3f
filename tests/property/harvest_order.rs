// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Event Harvesting
//!
//! Harvesting is one-shot and deterministic: entities in first-seen order,
//! events per entity in raise order, nothing returned twice.

use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;

use crate::fixtures::uow;
use flashcards_core::adapters::{FlashcardTransaction, LocalFlashcardRepository};
use flashcards_core::bus::{CommandHandlers, EventHandlers, MessageBus};
use flashcards_core::domain::{Command, Entity, Event, Flashcard};
use flashcards_core::errors::HandlerResult;
use flashcards_core::{InMemoryUnitOfWork, Message, Transaction, UnitOfWork};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tagged {
    entity: usize,
    seq: usize,
}
impl Event for Tagged {}

/// Creates one flashcard per entry, raising that many events on it
#[derive(Debug, Clone)]
struct RaiseTagged {
    counts: Vec<usize>,
}
impl Command for RaiseTagged {}

async fn raise_tagged(command: RaiseTagged, uow: Arc<InMemoryUnitOfWork>) -> HandlerResult<Value> {
    let mut tx = uow.begin().await?;
    for (entity, count) in command.counts.iter().enumerate() {
        let flashcard = tx
            .flashcards()
            .create_flashcard(Flashcard::bare(format!("word-{entity:03}")))
            .await?;
        let mut flashcard = flashcard.lock().unwrap();
        for seq in 0..*count {
            flashcard.raise(Tagged { entity, seq });
        }
    }
    tx.commit().await?;
    Ok(Value::Null)
}

fn expected_tags(counts: &[usize]) -> Vec<Tagged> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(entity, count)| (0..*count).map(move |seq| Tagged { entity, seq }))
        .collect()
}

fn tags(events: &[Arc<dyn Event>]) -> Vec<Tagged> {
    events
        .iter()
        .filter_map(|event| event.downcast_ref::<Tagged>().copied())
        .collect()
}

fn counts_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..5, 0..8)
}

proptest! {
    #[test]
    fn prop_command_enqueues_every_raised_event_once_in_order(counts in counts_strategy()) {
        let bus = MessageBus::new(
            uow(),
            CommandHandlers::new().register(raise_tagged),
            EventHandlers::new(),
        );

        tokio_test::block_on(bus.handle(Message::command(RaiseTagged { counts: counts.clone() })))
            .unwrap();

        prop_assert_eq!(tags(&bus.queued_events()), expected_tags(&counts));
        prop_assert!(bus.unit_of_work().collect_new_events().is_empty());
    }

    #[test]
    fn prop_harvest_without_pending_events_is_empty(words in prop::collection::btree_set("[a-z]{1,8}", 0..6)) {
        let uow = uow();
        tokio_test::block_on(async {
            let mut tx = uow.begin().await.unwrap();
            for word in &words {
                tx.flashcards().create_flashcard(Flashcard::bare(word.clone())).await.unwrap();
            }
            tx.commit().await.unwrap();
        });

        prop_assert!(uow.collect_new_events().is_empty());
        prop_assert!(uow.collect_new_events().is_empty());
        prop_assert_eq!(uow.committed_words(), words.into_iter().collect::<Vec<_>>());
    }
}
