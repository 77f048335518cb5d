//! Blocking, capacity-bounded FIFO queue.
//!
//! [`BoundedQueue`] is the only synchronization point between pipeline stages. `push` blocks
//! while the queue is full and `pop` blocks while it is empty, which keeps the number of
//! in-flight items per stage bounded without any polling.
//!
//! The queue has no notion of closing: stages signal end-of-stream by pushing sentinel values
//! (see [`crate::pipeline`]).

use crossbeam_channel::{Receiver, Sender, bounded};

/// A blocking FIFO queue holding at most `capacity` items.
///
/// Cloning a `BoundedQueue` yields another handle to the same queue, so handles can be moved
/// into producer and consumer threads. Every handle owns both channel ends, so the channel is
/// never disconnected while a handle is alive.
///
/// # Example
/// ```
/// use dagcorrect_lib::queue::BoundedQueue;
///
/// let queue = BoundedQueue::new(2);
/// let producer = queue.clone();
/// let handle = std::thread::spawn(move || {
///     for i in 0..5 {
///         producer.push(i); // blocks while two items are queued
///     }
/// });
/// let received: Vec<i32> = (0..5).map(|_| queue.pop()).collect();
/// handle.join().unwrap();
/// assert_eq!(received, vec![0, 1, 2, 3, 4]);
/// ```
pub struct BoundedQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero, since such a queue could never hold an item.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Appends an item, blocking while the queue is full.
    pub fn push(&self, item: T) {
        if self.tx.send(item).is_err() {
            unreachable!("queue handle holds a receiver");
        }
    }

    /// Removes and returns the oldest item, blocking while the queue is empty.
    pub fn pop(&self) -> T {
        match self.rx.recv() {
            Ok(item) => item,
            Err(_) => unreachable!("queue handle holds a sender"),
        }
    }

    /// Number of items currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or_default()
    }
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone(), rx: self.rx.clone() }
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
