// Copyright (c) 2025 - Cowboy AI, Inc.
//! The message bus
//!
//! Commands run inline on the caller's task. Events go through a queue that
//! a background drain task consumes, spawning one task per event so that
//! independent events are handled concurrently.

use futures::future::join_all;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::drain::DrainState;
use super::failure::{ErrorSink, EventFailure, LoggingErrorSink};
use super::handlers::{CommandHandlers, EventHandlers};
use super::queue::EventQueue;
use crate::domain::{Command, Event, Message};
use crate::errors::{BusError, BusResult};
use crate::unit_of_work::{lock, UnitOfWork};

/// Dispatches commands and events to their handlers
///
/// Cheap to clone; clones share the queue, the handler tables and the
/// background drain task.
pub struct MessageBus<U: UnitOfWork> {
    inner: Arc<BusInner<U>>,
}

impl<U: UnitOfWork> Clone for MessageBus<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct BusInner<U: UnitOfWork> {
    uow: Arc<U>,
    queue: EventQueue,
    command_handlers: CommandHandlers<U>,
    event_handlers: EventHandlers<U>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
    drain: Mutex<DrainTask>,
    error_sink: Arc<dyn ErrorSink>,
}

#[derive(Default)]
struct DrainTask {
    state: DrainState,
    handle: Option<JoinHandle<()>>,
}

impl<U: UnitOfWork> MessageBus<U> {
    /// Create a bus that logs event handler failures
    pub fn new(
        uow: Arc<U>,
        command_handlers: CommandHandlers<U>,
        event_handlers: EventHandlers<U>,
    ) -> Self {
        Self::with_error_sink(uow, command_handlers, event_handlers, LoggingErrorSink)
    }

    /// Create a bus that reports event handler failures to `error_sink`
    pub fn with_error_sink(
        uow: Arc<U>,
        command_handlers: CommandHandlers<U>,
        event_handlers: EventHandlers<U>,
        error_sink: impl ErrorSink + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(BusInner {
                uow,
                queue: EventQueue::new(),
                command_handlers,
                event_handlers,
                in_flight: Mutex::new(Vec::new()),
                drain: Mutex::new(DrainTask::default()),
                error_sink: Arc::new(error_sink),
            }),
        }
    }

    /// Unit of work shared by every handler
    pub fn unit_of_work(&self) -> &Arc<U> {
        &self.inner.uow
    }

    /// Dispatch a message
    ///
    /// A command runs to completion and its handler's result is returned.
    /// An event is handed to a background task and `None` is returned
    /// immediately.
    ///
    /// # Errors
    /// - `BusError::CommandHandling` if no handler is registered for the command
    /// - `BusError::Handler` if the command handler fails
    pub async fn handle(&self, message: Message) -> BusResult<Option<Value>> {
        match message {
            Message::Command(command) => self.handle_command(command).await.map(Some),
            Message::Event(event) => {
                Arc::clone(&self.inner).spawn_event(event);
                Ok(None)
            }
        }
    }

    async fn handle_command(&self, command: Box<dyn Command>) -> BusResult<Value> {
        let name = command.name();
        let handler = self
            .inner
            .command_handlers
            .get(command.message_type())
            .ok_or(BusError::CommandHandling { command: name })?;

        debug!(command = name, "Dispatching command");
        let result = handler(command, Arc::clone(&self.inner.uow)).await?;
        self.inner.enqueue_new_events();
        Ok(result)
    }

    /// Put an event straight onto the queue for the drain task
    pub fn enqueue<E: Event>(&self, event: E) {
        self.inner.queue.put(Arc::new(event));
    }

    /// Number of events waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.inner.queue.len()
    }

    /// Events waiting in the queue, in dispatch order
    pub fn queued_events(&self) -> Vec<Arc<dyn Event>> {
        self.inner.queue.snapshot()
    }

    /// Number of event tasks still running
    pub fn in_flight(&self) -> usize {
        let mut in_flight = lock(&self.inner.in_flight);
        in_flight.retain(|handle| !handle.is_finished());
        in_flight.len()
    }

    /// Current state of the background drain task
    pub fn drain_state(&self) -> DrainState {
        lock(&self.inner.drain).state
    }

    /// Spawn the background task that drains the event queue
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - `BusError::InvalidDrainTransition` unless the bus was never started
    pub fn start_process_events(&self) -> BusResult<()> {
        let mut drain = lock(&self.inner.drain);
        drain.state = drain.state.transition(DrainState::Running)?;
        drain.handle = Some(tokio::spawn(Arc::clone(&self.inner).process_events()));
        info!("Event processing started");
        Ok(())
    }

    /// Wait for every queued and in-flight event, then stop the drain task
    ///
    /// Events enqueued by handlers while stopping are waited for as well.
    /// On return the queue is empty and no event task is running.
    ///
    /// Dropping the returned future before it completes leaves unfinished
    /// event tasks tracked and the bus in `StopRequested`; calling this
    /// again resumes the stop.
    ///
    /// # Errors
    /// - `BusError::InvalidDrainTransition` unless the bus is running or
    ///   already stopping
    pub async fn stop_process_events(&self) -> BusResult<()> {
        self.inner.request_stop()?;

        let mut rounds = 0usize;
        while self.inner.has_outstanding_work() {
            rounds += 1;
            let mut pending = TakenHandles::take(&self.inner.in_flight);
            debug!(
                round = rounds,
                in_flight = pending.handles.len(),
                unfinished = self.inner.queue.unfinished(),
                "Waiting for event processing"
            );

            let ((), results) = futures::join!(
                self.inner.queue.join(),
                join_all(pending.handles.iter_mut())
            );
            for result in results {
                if let Err(err) = result {
                    error!(error = %err, "Event task did not complete");
                }
            }
        }

        let handle = lock(&self.inner.drain).handle.take();
        if let Some(handle) = handle {
            handle.abort();
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    error!(error = %err, "Drain task failed");
                }
            }
        }

        self.inner.transition_drain(DrainState::Cancelled)?;
        info!(rounds, "Event processing stopped");
        Ok(())
    }
}

/// Event task handles taken out of the in-flight set for one stop round
///
/// Handles still running when the round is abandoned go back into the set.
struct TakenHandles<'a> {
    in_flight: &'a Mutex<Vec<JoinHandle<()>>>,
    handles: Vec<JoinHandle<()>>,
}

impl<'a> TakenHandles<'a> {
    fn take(in_flight: &'a Mutex<Vec<JoinHandle<()>>>) -> Self {
        let handles = std::mem::take(&mut *lock(in_flight));
        Self { in_flight, handles }
    }
}

impl Drop for TakenHandles<'_> {
    fn drop(&mut self) {
        let unfinished: Vec<_> = self
            .handles
            .drain(..)
            .filter(|handle| !handle.is_finished())
            .collect();
        if !unfinished.is_empty() {
            debug!(count = unfinished.len(), "Returning unfinished event tasks");
            lock(self.in_flight).extend(unfinished);
        }
    }
}

impl<U: UnitOfWork> BusInner<U> {
    fn transition_drain(&self, next: DrainState) -> BusResult<()> {
        let mut drain = lock(&self.drain);
        drain.state = drain.state.transition(next)?;
        Ok(())
    }

    fn request_stop(&self) -> BusResult<()> {
        let mut drain = lock(&self.drain);
        if drain.state == DrainState::StopRequested {
            debug!("Resuming interrupted stop");
            return Ok(());
        }
        drain.state = drain.state.transition(DrainState::StopRequested)?;
        Ok(())
    }

    /// Harvest pending events from the unit of work onto the queue
    fn enqueue_new_events(&self) {
        let events = self.uow.collect_new_events();
        if events.is_empty() {
            return;
        }

        debug!(count = events.len(), "Enqueueing new events");
        for event in events {
            self.queue.put(event);
        }
    }

    fn has_outstanding_work(&self) -> bool {
        // The drain task tracks an event's task before marking it done, so
        // reading the counter first cannot miss an event between the two.
        self.queue.unfinished() > 0 || !lock(&self.in_flight).is_empty()
    }

    fn spawn_event(self: Arc<Self>, event: Arc<dyn Event>) {
        let delivery_id = Uuid::now_v7();
        let handle = tokio::spawn(Arc::clone(&self).handle_event(event, delivery_id));

        let mut in_flight = lock(&self.in_flight);
        in_flight.retain(|handle| !handle.is_finished());
        in_flight.push(handle);
    }

    async fn process_events(self: Arc<Self>) {
        loop {
            let event = self.queue.get().await;
            Arc::clone(&self).spawn_event(event);
            self.queue.task_done();
        }
    }

    /// Run every handler for `event` in registration order
    ///
    /// Events raised by a handler are enqueued before the next handler
    /// starts. The first failure is reported and ends the delivery.
    async fn handle_event(self: Arc<Self>, event: Arc<dyn Event>, delivery_id: Uuid) {
        let handlers = self.event_handlers.handlers_for(event.message_type());
        let span = info_span!("event", event = event.name(), %delivery_id);

        async move {
            debug!(handlers = handlers.len(), "Delivering event");
            for (index, handler) in handlers.iter().enumerate() {
                if let Err(error) = handler(Arc::clone(&event), Arc::clone(&self.uow)).await {
                    self.error_sink
                        .report(EventFailure::new(delivery_id, event, index, error));
                    return;
                }
                self.enqueue_new_events();
            }
        }
        .instrument(span)
        .await
    }
}
