//! One-shot actions that run later and can be superseded.
//!
//! A [`DeferredSlot`] holds at most one pending action. Every call to
//! [`DeferredSlot::schedule`] or [`DeferredSlot::invalidate`] bumps the
//! slot's generation; a pending action only fires while its handle still
//! matches the current generation. There is no background thread: the
//! owner advances the slot with the same elapsed time it feeds its own
//! countdown.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity of a scheduled action, returned by [`DeferredSlot::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeferredHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deferred<T> {
    handle: DeferredHandle,
    remaining_ms: u64,
    action: T,
}

impl<T> Deferred<T> {
    pub fn handle(&self) -> DeferredHandle {
        self.handle
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn action(&self) -> &T {
        &self.action
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredSlot<T> {
    generation: u64,
    pending: Option<Deferred<T>>,
}

impl<T> Default for DeferredSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }
}

impl<T> DeferredSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `delay`, replacing anything pending.
    pub fn schedule(&mut self, delay: Duration, action: T) -> DeferredHandle {
        self.generation = self.generation.wrapping_add(1);
        let handle = DeferredHandle(self.generation);
        self.pending = Some(Deferred {
            handle,
            remaining_ms: delay.as_millis().min(u128::from(u64::MAX)) as u64,
            action,
        });
        handle
    }

    /// Drop whatever is pending and retire every handle issued so far.
    ///
    /// Returns the dropped action, if there was one.
    pub fn invalidate(&mut self) -> Option<T> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take().map(|d| d.action)
    }

    /// Cancel the pending action if `handle` still identifies it.
    pub fn cancel(&mut self, handle: DeferredHandle) -> bool {
        match &self.pending {
            Some(d) if d.handle == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> Option<&Deferred<T>> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_current(&self, handle: DeferredHandle) -> bool {
        handle.0 == self.generation
    }

    /// Let `elapsed_ms` pass. When the pending action comes due it is
    /// returned together with the milliseconds left over past its deadline.
    pub fn advance(&mut self, elapsed_ms: u64) -> Option<(T, u64)> {
        let deferred = self.pending.as_mut()?;
        if deferred.handle.0 != self.generation {
            self.pending = None;
            return None;
        }
        if elapsed_ms < deferred.remaining_ms {
            deferred.remaining_ms -= elapsed_ms;
            return None;
        }
        let overshoot = elapsed_ms - deferred.remaining_ms;
        self.pending.take().map(|d| (d.action, overshoot))
    }
}
