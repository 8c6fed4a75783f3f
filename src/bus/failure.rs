// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reporting of event handler failures
//!
//! Event handlers run in background tasks with no caller to return an error
//! to. A failing handler is reported to the bus's [`ErrorSink`] and the
//! remaining handlers for that delivery are skipped.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::domain::Event;
use crate::errors::HandlerError;

/// One failed event delivery
#[derive(Debug)]
pub struct EventFailure {
    /// Identifies the delivery across log lines
    pub delivery_id: Uuid,
    pub event: Arc<dyn Event>,
    /// Position of the failing handler in registration order
    pub handler_index: usize,
    pub error: HandlerError,
    pub failed_at: DateTime<Utc>,
}

impl EventFailure {
    pub fn new(
        delivery_id: Uuid,
        event: Arc<dyn Event>,
        handler_index: usize,
        error: HandlerError,
    ) -> Self {
        Self {
            delivery_id,
            event,
            handler_index,
            error,
            failed_at: Utc::now(),
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event.name()
    }
}

/// Receives event handler failures
pub trait ErrorSink: Send + Sync {
    fn report(&self, failure: EventFailure);
}

impl<F> ErrorSink for F
where
    F: Fn(EventFailure) + Send + Sync,
{
    fn report(&self, failure: EventFailure) {
        self(failure)
    }
}

/// Default sink: logs each failure at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingErrorSink;

impl ErrorSink for LoggingErrorSink {
    fn report(&self, failure: EventFailure) {
        error!(
            delivery_id = %failure.delivery_id,
            event = failure.event_name(),
            handler_index = failure.handler_index,
            failed_at = %failure.failed_at,
            error = %failure.error,
            "Event handler failed"
        );
    }
}
