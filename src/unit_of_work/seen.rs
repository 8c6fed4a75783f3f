// Copyright (c) 2025 - Cowboy AI, Inc.
//! Seen-set of entities touched through a repository

use std::sync::{Arc, Mutex};

use super::{lock, Shared};
use crate::domain::{Entity, Event};

/// Ordered, de-duplicated set of entity handles
///
/// Membership is by handle identity. Iteration order is first-seen order,
/// which makes harvesting deterministic for a given run.
#[derive(Debug)]
pub struct SeenSet<T> {
    entities: Mutex<Vec<Shared<T>>>,
}

impl<T> Default for SeenSet<T> {
    fn default() -> Self {
        Self {
            entities: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Entity> SeenSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, entity: &Shared<T>) {
        let mut entities = lock(&self.entities);
        if !entities.iter().any(|seen| Arc::ptr_eq(seen, entity)) {
            entities.push(Arc::clone(entity));
        }
    }

    pub fn remove(&self, entity: &Shared<T>) {
        lock(&self.entities).retain(|seen| !Arc::ptr_eq(seen, entity));
    }

    pub fn contains(&self, entity: &Shared<T>) -> bool {
        lock(&self.entities)
            .iter()
            .any(|seen| Arc::ptr_eq(seen, entity))
    }

    pub fn len(&self) -> usize {
        lock(&self.entities).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entities).is_empty()
    }

    /// Pop every pending event of every seen entity, FIFO per entity
    ///
    /// The drained entities leave the set, so it only ever holds entities
    /// touched since the last harvest.
    pub fn drain_events(&self) -> Vec<Arc<dyn Event>> {
        let entities = std::mem::take(&mut *lock(&self.entities));
        let mut events = Vec::new();
        for handle in entities {
            let mut entity = lock(&handle);
            while let Some(event) = entity.pop_event() {
                events.push(event);
            }
        }
        events
    }

    /// Move every entity into `target`, keeping first-seen order
    pub fn hand_over(&self, target: &SeenSet<T>) {
        let entities = std::mem::take(&mut *lock(&self.entities));
        for handle in &entities {
            target.add(handle);
        }
    }

    /// Empty the set and drop the pending events of its entities
    pub fn discard(&self) -> usize {
        self.drain_events().len()
    }
}
