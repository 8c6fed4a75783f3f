// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host start-up and shutdown hooks

use std::sync::Arc;
use tracing::info;

use super::handlers::{command_handlers, event_handlers};
use crate::adapters::FlashcardTransaction;
use crate::bus::MessageBus;
use crate::errors::BusResult;
use crate::unit_of_work::UnitOfWork;

/// Bus wired with the production flashcard handlers
pub fn bootstrap<U>(uow: Arc<U>) -> MessageBus<U>
where
    U: UnitOfWork,
    U::Transaction: FlashcardTransaction,
{
    MessageBus::new(uow, command_handlers(), event_handlers())
}

/// Start draining events; call once when the host starts
pub fn start<U: UnitOfWork>(bus: &MessageBus<U>) -> BusResult<()> {
    info!("Starting message bus");
    bus.start_process_events()
}

/// Finish outstanding events and stop; call once when the host shuts down
pub async fn stop<U: UnitOfWork>(bus: &MessageBus<U>) -> BusResult<()> {
    info!("Stopping message bus");
    bus.stop_process_events().await
}
