// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Re-entrant per-document locking for synchronized projectors.
//!
//! A projection method can call other projection methods on the same document (a
//! mixin calling back into its receiver, a read wrapping sub-projections). The
//! document monitor is a plain mutex, so the thread keeps a list of the documents it
//! already holds and only locks on first entry.

use std::cell::RefCell;
use std::sync::{MutexGuard, PoisonError};

use crate::dom::Document;

thread_local! {
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Holds a document's monitor for the current thread until dropped.
pub(crate) struct DocumentLock<'a> {
    key: usize,
    _guard: Option<MutexGuard<'a, ()>>,
}

impl<'a> DocumentLock<'a> {
    pub(crate) fn acquire(document: &'a Document) -> Self {
        let key = document.key();
        let reentrant = HELD.with(|held| held.borrow().contains(&key));
        let guard = if reentrant {
            None
        } else {
            Some(
                document
                    .monitor()
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            )
        };
        HELD.with(|held| held.borrow_mut().push(key));
        Self { key, _guard: guard }
    }
}

impl Drop for DocumentLock<'_> {
    fn drop(&mut self) {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if let Some(position) = held.iter().rposition(|k| *k == self.key) {
                held.remove(position);
            }
        });
    }
}

/// True when the current thread holds the document's monitor
#[cfg(test)]
pub(crate) fn is_held(document: &Document) -> bool {
    HELD.with(|held| held.borrow().contains(&document.key()))
}
