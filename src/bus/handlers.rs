// Copyright (c) 2025 - Cowboy AI, Inc.
//! Handler tables keyed by message type
//!
//! Handlers are registered with their concrete message type and stored
//! type-erased. The erased wrapper downcasts the message back before calling
//! the handler, so the handler itself only ever sees its own type.

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::domain::{Command, Event};
use crate::errors::{HandlerError, HandlerResult};
use crate::unit_of_work::UnitOfWork;

/// Type-erased command handler
pub type CommandHandlerFn<U> =
    Arc<dyn Fn(Box<dyn Command>, Arc<U>) -> BoxFuture<'static, HandlerResult<Value>> + Send + Sync>;

/// Type-erased event handler
pub type EventHandlerFn<U> =
    Arc<dyn Fn(Arc<dyn Event>, Arc<U>) -> BoxFuture<'static, HandlerResult<()>> + Send + Sync>;

/// Exactly one handler per command type
pub struct CommandHandlers<U> {
    handlers: HashMap<TypeId, CommandHandlerFn<U>>,
}

impl<U> Default for CommandHandlers<U> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<U: UnitOfWork> CommandHandlers<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `C`, replacing any earlier one
    pub fn register<C, F, Fut>(mut self, handler: F) -> Self
    where
        C: Command,
        F: Fn(C, Arc<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        let erased: CommandHandlerFn<U> = Arc::new(move |command: Box<dyn Command>, uow: Arc<U>| {
            match command.into_any().downcast::<C>() {
                Ok(command) => handler(*command, uow).boxed(),
                Err(_) => future::ready(Err(HandlerError::MessageTypeMismatch {
                    expected: type_name::<C>(),
                }))
                .boxed(),
            }
        });
        self.handlers.insert(TypeId::of::<C>(), erased);
        self
    }

    pub fn get(&self, message_type: TypeId) -> Option<CommandHandlerFn<U>> {
        self.handlers.get(&message_type).cloned()
    }

    pub fn contains<C: Command>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<C>())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Ordered handler lists per event type
pub struct EventHandlers<U> {
    handlers: HashMap<TypeId, Vec<EventHandlerFn<U>>>,
}

impl<U> Default for EventHandlers<U> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<U: UnitOfWork> EventHandlers<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `E`; handlers run in registration order
    pub fn register<E, F, Fut>(mut self, handler: F) -> Self
    where
        E: Event,
        F: Fn(Arc<E>, Arc<U>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<()>> + Send + 'static,
    {
        let erased: EventHandlerFn<U> = Arc::new(move |event: Arc<dyn Event>, uow: Arc<U>| {
            match event.into_any_arc().downcast::<E>() {
                Ok(event) => handler(event, uow).boxed(),
                Err(_) => future::ready(Err(HandlerError::MessageTypeMismatch {
                    expected: type_name::<E>(),
                }))
                .boxed(),
            }
        });
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
        self
    }

    /// Handlers for `message_type` in registration order; empty if none
    pub fn handlers_for(&self, message_type: TypeId) -> Vec<EventHandlerFn<U>> {
        self.handlers
            .get(&message_type)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count_for<E: Event>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}
