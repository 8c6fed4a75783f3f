// Copyright (c) 2025 - Cowboy AI, Inc.
//! Message taxonomy consumed by the bus
//!
//! Two kinds of messages travel through the [`MessageBus`](crate::bus::MessageBus):
//!
//! ```text
//! Command  ──► exactly one handler ──► result returned to the caller
//! Event    ──► zero or more handlers ──► no result, processed in background
//! ```
//!
//! Both are plain immutable values. Dispatch is by concrete type, so each
//! trait object carries enough runtime type information to be routed and
//! downcast back to its concrete type inside a handler.

use std::any::{type_name, Any, TypeId};
use std::fmt::Debug;
use std::sync::Arc;

/// Runtime type access for message trait objects
///
/// Implemented for every `'static` type; not meant to be called on `Box` or
/// `Arc` handles directly. Use the inherent methods on `dyn Command` and
/// `dyn Event` instead.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    fn concrete_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn concrete_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// An imperative request handled by exactly one handler
pub trait Command: AsAny + Debug {}

/// A notification that something happened, broadcast to every handler
pub trait Event: AsAny + Debug {}

impl dyn Command {
    /// Fully qualified name of the concrete command type
    pub fn name(&self) -> &'static str {
        self.concrete_type_name()
    }

    /// Dispatch key of the concrete command type
    pub fn message_type(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn downcast_ref<C: Command>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }
}

impl dyn Event {
    /// Fully qualified name of the concrete event type
    pub fn name(&self) -> &'static str {
        self.concrete_type_name()
    }

    /// Dispatch key of the concrete event type
    pub fn message_type(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

/// A message handed to [`MessageBus::handle`](crate::bus::MessageBus::handle)
///
/// The set of kinds is closed: anything that is neither a command nor an
/// event cannot be constructed, so the bus never sees an unsupported kind.
#[derive(Debug)]
pub enum Message {
    Command(Box<dyn Command>),
    Event(Arc<dyn Event>),
}

impl Message {
    pub fn command<C: Command>(command: C) -> Self {
        Message::Command(Box::new(command))
    }

    pub fn event<E: Event>(event: E) -> Self {
        Message::Event(Arc::new(event))
    }

    /// Name of the concrete message type
    pub fn name(&self) -> &'static str {
        match self {
            Message::Command(command) => command.name(),
            Message::Event(event) => event.name(),
        }
    }
}
