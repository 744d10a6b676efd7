//! Work queues: single-threaded FIFO, concurrent FIFO, concurrent
//! max-priority — a uniform contract over a task type.
//!
//! Ported from `cpp/src/pipeline/queue.hpp`. The inner 2-box subdivision
//! uses [`SerialFifo`]; the outer 3-box work pool uses
//! [`ConcurrentPriority`] (boxes implement `Ord` shallower-first, see
//! `subdiv::Box3`); the certificate drain uses [`ConcurrentFifo`].

use std::collections::{BinaryHeap, VecDeque};
use std::sync::Mutex;

/// Uniform queue contract shared by all three variants.
pub trait WorkQueue<T> {
    fn push(&self, task: T);
    fn pop(&self) -> Option<T>;
    fn push_all(&self, tasks: impl IntoIterator<Item = T>) {
        for t in tasks {
            self.push(t);
        }
    }
    fn pop_all(&self) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(t) = self.pop() {
            out.push(t);
        }
        out
    }
    fn size(&self) -> usize;
}

/// Single-threaded FIFO; no interior mutability needed beyond a `RefCell`
/// would be, but the contract is shared with the concurrent variants via
/// `&self` methods, so a `Mutex` is used uniformly (uncontended, therefore
/// cheap) rather than splitting the trait into `&self`/`&mut self` forms.
pub struct SerialFifo<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for SerialFifo<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> SerialFifo<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> WorkQueue<T> for SerialFifo<T> {
    fn push(&self, task: T) {
        self.items.lock().unwrap().push_back(task);
    }
    fn pop(&self) -> Option<T> {
        self.items.lock().unwrap().pop_front()
    }
    fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

/// Concurrent FIFO: the same structure as `SerialFifo`, shared across
/// threads via the mutex that was already there — named separately to keep
/// the pipeline's module boundaries legible (certificate drain vs inner
/// subdivision use different queues even though the implementation
/// coincides).
pub struct ConcurrentFifo<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for ConcurrentFifo<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> ConcurrentFifo<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> WorkQueue<T> for ConcurrentFifo<T> {
    fn push(&self, task: T) {
        self.items.lock().unwrap().push_back(task);
    }
    fn pop(&self) -> Option<T> {
        self.items.lock().unwrap().pop_front()
    }
    fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

/// Max-priority queue over any `Ord` task: "shallower boxes first" falls out
/// of `Box3`'s `Ord` impl (breadth dominates depth, spec §3).
pub struct ConcurrentPriority<T: Ord> {
    items: Mutex<BinaryHeap<T>>,
}

impl<T: Ord> Default for ConcurrentPriority<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(BinaryHeap::new()),
        }
    }
}

impl<T: Ord> ConcurrentPriority<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Ord> WorkQueue<T> for ConcurrentPriority<T> {
    fn push(&self, task: T) {
        self.items.lock().unwrap().push(task);
    }
    fn pop(&self) -> Option<T> {
        self.items.lock().unwrap().pop()
    }
    fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_fifo_orders_first_in_first_out() {
        let q = SerialFifo::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.size(), 1);
    }

    #[test]
    fn push_all_pop_all_roundtrip() {
        let q: ConcurrentFifo<i32> = ConcurrentFifo::new();
        q.push_all([1, 2, 3]);
        assert_eq!(q.pop_all(), vec![1, 2, 3]);
    }

    #[test]
    fn priority_queue_pops_max_first() {
        let q: ConcurrentPriority<i32> = ConcurrentPriority::new();
        q.push_all([3, 1, 4, 1, 5]);
        assert_eq!(q.pop(), Some(5));
        assert_eq!(q.pop(), Some(4));
    }

    #[test]
    fn box3_priority_prefers_shallower() {
        use crate::subdiv::Box3;
        let q: ConcurrentPriority<std::cmp::Reverse<Box3>> = ConcurrentPriority::new();
        let root = Box3::root();
        let child = root.parts()[0];
        q.push(std::cmp::Reverse(child));
        q.push(std::cmp::Reverse(root));
        // Reverse inverts Ord so the shallower box (root) pops first from a
        // max-heap, matching "shallower boxes have higher priority".
        assert_eq!(q.pop(), Some(std::cmp::Reverse(root)));
    }
}
