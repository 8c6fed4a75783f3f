// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Process Message Bus
//!
//! Routes commands and events to the handlers registered for their concrete
//! type, harvesting the events those handlers raise back into a queue.
//!
//! # Flow
//!
//! ```text
//! handle(Command) ──► command handler ──► collect_new_events ──┐
//!                                                              ▼
//! handle(Event) ───────────────► spawn ◄──── drain task ◄── EventQueue
//!                                  │                           ▲
//!                                  ▼                           │
//!                    event handlers (sequential) ── collect ───┘
//! ```
//!
//! # Shutdown
//!
//! [`MessageBus::stop_process_events`] keeps waiting while the queue holds
//! unfinished events or event tasks are still running, so events raised
//! transitively during shutdown are processed before it returns.
//!
//! # Example
//!
//! ```rust,ignore
//! let bus = MessageBus::new(uow, command_handlers(), event_handlers());
//! bus.start_process_events()?;
//! bus.handle(Message::command(DeleteFlashcard::new("challenge"))).await?;
//! bus.stop_process_events().await?;
//! ```

mod drain;
mod failure;
mod handlers;
mod message_bus;
mod queue;

pub use drain::DrainState;
pub use failure::{ErrorSink, EventFailure, LoggingErrorSink};
pub use handlers::{CommandHandlerFn, CommandHandlers, EventHandlerFn, EventHandlers};
pub use message_bus::MessageBus;
pub use queue::EventQueue;
