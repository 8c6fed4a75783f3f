// Copyright (c) 2025 - Cowboy AI, Inc.
//! Unbounded FIFO of events awaiting dispatch

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::warn;

use crate::domain::Event;
use crate::unit_of_work::lock;

/// Event queue with join semantics
///
/// Every [`put`](Self::put) increments an unfinished counter that only
/// [`task_done`](Self::task_done) decrements, so [`join`](Self::join) waits
/// until each queued event has been taken *and* accounted for, not merely
/// until the queue is empty.
#[derive(Debug, Default)]
pub struct EventQueue {
    items: Mutex<VecDeque<Arc<dyn Event>>>,
    available: Notify,
    unfinished: AtomicUsize,
    drained: Notify,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, event: Arc<dyn Event>) {
        self.unfinished.fetch_add(1, Ordering::SeqCst);
        lock(&self.items).push_back(event);
        self.available.notify_one();
    }

    /// Wait for the next event
    pub async fn get(&self) -> Arc<dyn Event> {
        loop {
            let notified = self.available.notified();
            if let Some(event) = lock(&self.items).pop_front() {
                return event;
            }
            notified.await;
        }
    }

    /// Mark one previously taken event as handed off
    pub fn task_done(&self) {
        let previous = self
            .unfinished
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match previous {
            Ok(1) => self.drained.notify_waiters(),
            Ok(_) => {}
            Err(_) => warn!("task_done called more times than events were queued"),
        }
    }

    /// Wait until every queued event has been marked done
    pub async fn join(&self) {
        loop {
            let drained = self.drained.notified();
            if self.unfinished() == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Events currently waiting to be taken
    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }

    /// Events put but not yet marked done
    pub fn unfinished(&self) -> usize {
        self.unfinished.load(Ordering::SeqCst)
    }

    /// Copy of the waiting events in dispatch order
    pub fn snapshot(&self) -> Vec<Arc<dyn Event>> {
        lock(&self.items).iter().cloned().collect()
    }
}
