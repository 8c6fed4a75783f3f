// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcards Domain
//!
//! Messages, the flashcard entity and the event-raising contract the unit
//! of work harvests from.

pub mod commands;
pub mod events;
pub mod flashcard;
pub mod message;

pub use commands::DeleteFlashcard;
pub use events::FlashcardFetchedFromGoogleApi;
pub use flashcard::{Entity, Flashcard};
pub use message::{AsAny, Command, Event, Message};
