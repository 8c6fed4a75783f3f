//! Error types for the message bus and its collaborators

use thiserror::Error;

use crate::bus::DrainState;

/// Errors surfaced by [`MessageBus`](crate::bus::MessageBus) operations
#[derive(Debug, Error)]
pub enum BusError {
    /// No handler is registered for the dispatched command type
    #[error("Cannot find a command handler for {command}")]
    CommandHandling { command: &'static str },

    /// The command handler itself failed
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    /// Unit of work failure outside of a handler
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Drain task lifecycle call made in the wrong state
    #[error("Invalid drain transition from {from:?} to {to:?}")]
    InvalidDrainTransition { from: DrainState, to: DrainState },
}

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Errors a command or event handler may fail with
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Registry keyed a handler under the wrong message type
    #[error("Handler for {expected} received a different message type")]
    MessageTypeMismatch { expected: &'static str },

    #[error("{0}")]
    Other(String),
}

/// Result type for handler invocations
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Unit of work transport failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Backing store could not be reached during commit, rollback or query
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    /// A staged change clashes with committed state
    #[error("Conflicting change: {0}")]
    Conflict(String),

    /// Query parameters the store cannot evaluate
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type for unit of work operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Flashcard business rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Flashcard creation failed: {0}")]
    FlashcardCreation(String),

    #[error("Flashcard deletion failed: {0}")]
    FlashcardDeletion(String),
}

/// Failures of a local repository operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for HandlerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Persistence(err) => HandlerError::Persistence(err),
            RepositoryError::Domain(err) => HandlerError::Domain(err),
        }
    }
}

/// Errors surfaced by read-side views
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Bus(#[from] BusError),

    /// Blocking remote lookup panicked or was cancelled
    #[error("Remote lookup task failed: {0}")]
    RemoteLookup(#[from] tokio::task::JoinError),
}

/// Result type for views
pub type ViewResult<T> = Result<T, ViewError>;

/// Web scraping adapter failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScraperError {
    #[error("Failed to start browser session: {0}")]
    Session(String),

    #[error("Failed to load {url}: {reason}")]
    PageLoad { url: String, reason: String },

    #[error("No visible elements for selector {0}")]
    ElementsNotFound(String),

    #[error("Failed to press button: {0}")]
    Interaction(String),
}

/// Result type for scraping operations
pub type ScraperResult<T> = Result<T, ScraperError>;

impl From<regex::Error> for PersistenceError {
    fn from(err: regex::Error) -> Self {
        PersistenceError::InvalidQuery(err.to_string())
    }
}
