// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcards Service Layer
//!
//! Handlers that mutate flashcards through the bus, views that read them,
//! and the hooks a host uses to run the bus.
//!
//! ```text
//! Host request
//!     ↓
//! views ──miss──► online dictionary ──hit──► FlashcardFetchedFromGoogleApi
//!     │                                               ↓
//!     │                                          MessageBus
//!     ↓                                               ↓
//! local storage ◄──────── create_flashcard / delete_flashcard
//! ```

pub mod handlers;
pub mod lifecycle;
pub mod views;

pub use handlers::{command_handlers, create_flashcard, delete_flashcard, event_handlers};
pub use views::{fetch_all_flashcards, fetch_flashcard_by_word};
