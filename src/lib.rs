//! Flashcards core
//!
//! An in-process message bus for a flashcards service, together with the
//! flashcard domain, its repositories and a unit of work that harvests the
//! events raised on touched entities.

pub mod adapters;
pub mod bus;
pub mod config;
pub mod domain;
pub mod errors;
pub mod service;
pub mod telemetry;
pub mod unit_of_work;

// Re-export commonly used types
pub use bus::{CommandHandlers, DrainState, ErrorSink, EventFailure, EventHandlers, MessageBus};
pub use config::Settings;
pub use domain::{Command, DeleteFlashcard, Event, Flashcard, FlashcardFetchedFromGoogleApi, Message};
pub use errors::{BusError, BusResult, HandlerError, HandlerResult, PersistenceError};
pub use unit_of_work::{InMemoryUnitOfWork, Transaction, UnitOfWork};
