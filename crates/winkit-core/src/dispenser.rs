//! Thread-safe single-pass (or looping) cursor over a fixed sequence.
//!
//! Hands every item to exactly one caller, across any number of threads.
//! The lock only covers the cursor arithmetic; item lookup happens after the
//! guard is released.

use crate::{CoreError, CoreResult};
use std::sync::{Mutex, PoisonError};

/// Dispenser over an immutable, ordered sequence.
#[derive(Debug)]
pub struct SequenceDispenser<T> {
    items: Vec<T>,
    looping: bool,
    /// Index handed out by the next call.
    cursor: Mutex<usize>,
}

impl<T> SequenceDispenser<T> {
    /// Single-pass dispenser: each item once, then exhausted forever.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self::build(items, false)
    }

    /// Looping dispenser: cycles through the items modulo their count.
    pub fn looping(items: impl IntoIterator<Item = T>) -> Self {
        Self::build(items, true)
    }

    fn build(items: impl IntoIterator<Item = T>, looping: bool) -> Self {
        Self {
            items: items.into_iter().collect(),
            looping,
            cursor: Mutex::new(0),
        }
    }

    /// Take the next item, or `None` once a single-pass dispenser is exhausted.
    pub fn next(&self) -> Option<&T> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }

        let index = {
            // The cursor is a plain integer that is never left half-updated.
            let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
            let index = *cursor;
            if self.looping {
                *cursor = (index + 1) % len;
            } else if index < len {
                *cursor = index + 1;
            }
            index
        };

        self.items.get(index)
    }

    /// Like [`next`](Self::next) but reports exhaustion as an error.
    pub fn try_next(&self) -> CoreResult<&T> {
        self.next().ok_or(CoreError::ExhaustedSequence)
    }

    /// Number of items in the backing sequence.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Items not yet handed out. `None` for looping dispensers, which never run out.
    pub fn remaining(&self) -> Option<usize> {
        if self.looping {
            return None;
        }
        let cursor = *self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        Some(self.items.len().saturating_sub(cursor))
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Iterator that keeps calling [`next`](Self::next).
    ///
    /// Endless for a non-empty looping dispenser.
    pub fn drain(&self) -> Drain<'_, T> {
        Drain { dispenser: self }
    }
}

/// Iterator returned by [`SequenceDispenser::drain`].
pub struct Drain<'a, T> {
    dispenser: &'a SequenceDispenser<T>,
}

impl<'a, T> Iterator for Drain<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.dispenser.next()
    }
}
