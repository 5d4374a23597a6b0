//! Keyed, generation-tagged slot implementing the last-request-wins rule.
//!
//! Every request is issued through [`KeyedSlot::issue`], which bumps the slot's
//! generation and returns a [`Ticket`]. A response is only applied when its ticket
//! carries the current generation; anything older was superseded and is dropped.

use log::debug;

use crate::cell::{AsyncCell, Failure};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Receipt for one issued request.
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    /// Key the request was issued for.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Generation the request was issued in.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
/// Holds the latest request's key and the cell for its result.
pub struct KeyedSlot<K, V> {
    generation: u64,
    active: Option<(K, AsyncCell<V>)>,
}

impl<K, V> Default for KeyedSlot<K, V> {
    fn default() -> Self {
        Self {
            generation: 0,
            active: None,
        }
    }
}

impl<K: Clone + PartialEq, V> KeyedSlot<K, V> {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `key`, superseding any request still in flight.
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.active = Some((key.clone(), AsyncCell::Pending));
        Ticket {
            generation: self.generation,
            key,
        }
    }

    /// Drop the active key and its value without issuing a request.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.active = None;
    }

    /// Apply a response. Returns `false` when the ticket was superseded.
    pub fn resolve(&mut self, ticket: &Ticket<K>, result: Result<V, Failure>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "discarding stale response (generation {} < {})",
                ticket.generation, self.generation
            );
            return false;
        }
        match self.active.as_mut() {
            Some((key, cell)) if *key == ticket.key => {
                *cell = AsyncCell::settle(result);
                true
            }
            _ => false,
        }
    }

    /// Key of the latest request.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.active.as_ref().map(|(key, _)| key)
    }

    /// Result cell of the latest request, `None` when nothing was requested.
    #[must_use]
    pub fn cell(&self) -> Option<&AsyncCell<V>> {
        self.active.as_ref().map(|(_, cell)| cell)
    }

    /// Whether the latest request is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.cell().is_some_and(AsyncCell::is_pending)
    }
}

impl<K: Clone + PartialEq, T> KeyedSlot<K, Vec<T>> {
    /// Items of the latest ready response, empty otherwise.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.cell().map(AsyncCell::items).unwrap_or_default()
    }
}
