//! Input-iterator protocol over lazy results.
//!
//! An [`Iter`] is either the canonical end sentinel or an active cursor:
//! shared ownership of one [`LazyResult`] plus a current logical index.
//! The protocol is forward-only — there is no decrement, because the
//! underlying cursor cannot rewind.
//!
//! Equality is deliberately narrow: all end sentinels compare equal, and
//! two active iterators compare equal only when they reference the
//! identical cache instance at the identical index. Iterators obtained
//! from two separate traversal starts over the same data therefore never
//! compare equal to each other (except as end sentinels) even at
//! semantically the same position — the cursor has no stable row identity
//! beyond object identity. Callers needing positional comparison across
//! independent traversals must materialize into an ordinary collection
//! first.

use std::cell::RefCell;
use std::rc::Rc;

use tablemap_core::{Result, TableMapError};

use crate::lazy::LazyResult;

/// Forward-only iterator over a lazy result, in one of three projections
/// (pairs, keys, values) fixed at construction.
pub struct Iter<'conn, T> {
    result: Option<Rc<RefCell<LazyResult<'conn, T>>>>,
    index: Option<usize>,
    at_end: bool,
}

/// Iterator over decoded `(key, value)` pairs.
pub type RowIter<'conn, K, V> = Iter<'conn, (K, V)>;
/// Iterator over decoded keys only.
pub type KeyIter<'conn, K> = Iter<'conn, K>;
/// Iterator over decoded values only.
pub type ValueIter<'conn, V> = Iter<'conn, V>;

impl<'conn, T: Clone> Iter<'conn, T> {
    /// Wraps a lazy result and performs the mandatory initial advance.
    pub(crate) fn new(result: LazyResult<'conn, T>) -> Result<Self> {
        let mut iter = Self {
            result: Some(Rc::new(RefCell::new(result))),
            index: None,
            at_end: false,
        };
        iter.step()?;
        Ok(iter)
    }

    /// The canonical end sentinel.
    pub fn end() -> Self {
        Self {
            result: None,
            index: None,
            at_end: true,
        }
    }

    pub fn is_end(&self) -> bool {
        self.at_end
    }

    /// Row at the current position, or `None` at end.
    pub fn get(&self) -> Option<T> {
        if self.at_end {
            return None;
        }
        let result = self.result.as_ref()?;
        let index = self.index?;
        // An active iterator always points at an already-cached row.
        result.borrow_mut().get(index).ok()
    }

    /// Moves to the next logical index, transitioning to end past the
    /// last row. Advancing an iterator already at end is out of range.
    pub fn advance(&mut self) -> Result<()> {
        if self.at_end {
            return Err(TableMapError::OutOfRange(
                "cannot advance an iterator past the end".to_string(),
            ));
        }
        self.step()
    }

    /// Equivalent of advancing `n` times. There is no reverse counterpart.
    pub fn forward(mut self, n: usize) -> Result<Self> {
        for _ in 0..n {
            self.advance()?;
        }
        Ok(self)
    }

    /// Streaming pull: the current row, then advance; `None` once exhausted.
    pub fn try_next(&mut self) -> Result<Option<T>> {
        if self.at_end {
            return Ok(None);
        }
        let item = self.get();
        self.step()?;
        Ok(item)
    }

    fn step(&mut self) -> Result<()> {
        if self.check_end() {
            return Ok(());
        }
        if let Some(result) = &self.result {
            let mut result = result.borrow_mut();
            if !result.completed() {
                result.advance()?;
            }
        }
        if self.check_end() {
            self.index = None;
        } else {
            self.index = Some(self.index.map_or(0, |i| i + 1));
        }
        Ok(())
    }

    fn check_end(&mut self) -> bool {
        match &self.result {
            None => self.at_end = true,
            Some(result) => {
                let result = result.borrow();
                if result.completed() {
                    let rows = result.evaluated();
                    let reached_last = match self.index {
                        Some(i) => rows == 0 || i + 1 >= rows,
                        None => rows == 0,
                    };
                    if reached_last {
                        self.at_end = true;
                    }
                }
            }
        }
        self.at_end
    }
}

impl<'conn, T> Clone for Iter<'conn, T> {
    fn clone(&self) -> Self {
        Self {
            result: self.result.clone(),
            index: self.index,
            at_end: self.at_end,
        }
    }
}

impl<'conn, T> std::fmt::Debug for Iter<'conn, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("index", &self.index)
            .field("at_end", &self.at_end)
            .field("active", &self.result.is_some())
            .finish()
    }
}

impl<'conn, T> PartialEq for Iter<'conn, T> {
    fn eq(&self, other: &Self) -> bool {
        if self.at_end && other.at_end {
            return true;
        }
        if self.at_end != other.at_end || self.index != other.index {
            return false;
        }
        match (&self.result, &other.result) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<'conn, T> Eq for Iter<'conn, T> {}

impl<'conn, T: Clone> Iterator for Iter<'conn, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}
