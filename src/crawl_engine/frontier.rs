//! Per-source frontier queue
//!
//! FIFO work queue over an index-addressed slot table. Indices are `i64`
//! and wrap from the top of the range back to `i64::MIN`, so the cursor
//! never grows without bound and enqueue/dequeue stay O(1).
//!
//! The slot sequence is `..., INDEX_END - 2, INDEX_END - 1, INDEX_START,
//! INDEX_START + 1, ...`; `INDEX_END` itself is never used as a slot.

use ahash::AHashMap;

/// First index of the slot space
pub const INDEX_START: i64 = i64::MIN;

/// Exclusive upper bound of the slot space
pub const INDEX_END: i64 = i64::MAX;

/// Errors raised by frontier operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrontierError {
    /// The slot at the tail cursor is still occupied
    #[error("Frontier queue is full (slot {index} occupied)")]
    Full { index: i64 },

    /// Nothing left to dequeue
    #[error("Frontier queue is empty")]
    Empty,
}

/// Next slot index after `index`, wrapping at the end of the space
#[inline]
#[must_use]
pub const fn next_index(index: i64) -> i64 {
    let next = index + 1;
    if next == INDEX_END { INDEX_START } else { next }
}

/// FIFO queue of frontier items (URLs) for one source
#[derive(Debug, Clone)]
pub struct FrontierQueue<T = String> {
    slots: AHashMap<i64, T>,
    /// Index of the first item; index of nothing when empty
    head: i64,
    /// One past the last item; next free slot
    tail: i64,
}

impl<T> Default for FrontierQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrontierQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Empty queue whose cursors sit at `index`
    ///
    /// `INDEX_END` is not a slot and maps to `INDEX_START`.
    #[must_use]
    pub fn starting_at(index: i64) -> Self {
        let index = if index == INDEX_END { INDEX_START } else { index };
        Self {
            slots: AHashMap::new(),
            head: index,
            tail: index,
        }
    }

    /// Insert at the tail and advance it.
    ///
    /// # Errors
    ///
    /// `FrontierError::Full` if the tail slot is still occupied. Sequential
    /// single-writer use never reaches this.
    pub fn enqueue(&mut self, item: T) -> Result<(), FrontierError> {
        if self.slots.contains_key(&self.tail) {
            return Err(FrontierError::Full { index: self.tail });
        }
        self.slots.insert(self.tail, item);
        self.tail = next_index(self.tail);
        Ok(())
    }

    /// Remove and return the item at the head.
    ///
    /// # Errors
    ///
    /// `FrontierError::Empty` when no item occupies the head slot.
    pub fn dequeue(&mut self) -> Result<T, FrontierError> {
        if self.head == self.tail && !self.slots.contains_key(&self.head) {
            return Err(FrontierError::Empty);
        }
        // Removing before advancing releases the slot on both sides of the wrap.
        let item = self.slots.remove(&self.head).ok_or(FrontierError::Empty)?;
        self.head = next_index(self.head);
        Ok(item)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn head(&self) -> i64 {
        self.head
    }

    #[must_use]
    pub fn tail(&self) -> i64 {
        self.tail
    }

    /// Whether the slot at `index` currently holds an item
    #[must_use]
    pub fn is_occupied(&self, index: i64) -> bool {
        self.slots.contains_key(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_index_wraps_at_end() {
        assert_eq!(next_index(0), 1);
        assert_eq!(next_index(INDEX_END - 2), INDEX_END - 1);
        assert_eq!(next_index(INDEX_END - 1), INDEX_START);
        assert_eq!(next_index(INDEX_START), INDEX_START + 1);
    }

    #[test]
    fn starting_at_end_maps_to_start() {
        let q: FrontierQueue<&str> = FrontierQueue::starting_at(INDEX_END);
        assert_eq!(q.head(), INDEX_START);
        assert_eq!(q.tail(), INDEX_START);
    }

    #[test]
    fn released_slots_do_not_linger() {
        let mut q = FrontierQueue::starting_at(INDEX_END - 1);
        q.enqueue("a").unwrap();
        q.enqueue("b").unwrap();
        assert!(q.is_occupied(INDEX_END - 1));
        assert!(q.is_occupied(INDEX_START));

        assert_eq!(q.dequeue().unwrap(), "a");
        assert!(!q.is_occupied(INDEX_END - 1));
        assert_eq!(q.head(), INDEX_START);
    }
}
