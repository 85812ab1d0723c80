//! Chunked iteration over record ids.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

/// Split `items` into consecutive chunks of at most `size` elements.
///
/// Chunks keep input order; only the last one may be short.
pub fn partition<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    items.chunks(size.get()).map(<[T]>::to_vec).collect()
}

/// Hands out chunks of a fixed-size work list and tracks progress.
#[derive(Debug, Clone)]
pub struct ChunkScheduler<T> {
    chunks: VecDeque<Vec<T>>,
    total: usize,
    done: usize,
}

/// How far a batch has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Records attempted so far.
    pub done: usize,
    /// Records in the batch.
    pub total: usize,
}

impl<T: Clone> ChunkScheduler<T> {
    /// Create a scheduler over `items`.
    pub fn new(items: Vec<T>, size: NonZeroUsize) -> Self {
        Self {
            chunks: partition(&items, size).into(),
            total: items.len(),
            done: 0,
        }
    }

    /// Total number of items.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns true once every chunk has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Take the next chunk, or `None` when the list is exhausted.
    pub fn next_chunk(&mut self) -> Option<Vec<T>> {
        self.chunks.pop_front()
    }

    /// Record that `count` more items were attempted.
    pub fn complete(&mut self, count: usize) -> Progress {
        self.done = (self.done + count).min(self.total);
        self.progress()
    }

    /// Current progress.
    pub fn progress(&self) -> Progress {
        Progress {
            done: self.done,
            total: self.total,
        }
    }
}

impl Progress {
    /// Completion as a percentage in `0..=100`. An empty batch is complete.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u32
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({} %)", self.done, self.total, self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn partition_keeps_order() {
        let chunks = partition(&[1, 2, 3, 4, 5, 6, 7], size(3));
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert!(partition::<u8>(&[], size(3)).is_empty());
    }

    #[test]
    fn scheduler_hands_out_chunks() {
        let mut scheduler = ChunkScheduler::new(vec!['a', 'b', 'c', 'd', 'e'], size(2));
        assert_eq!(scheduler.next_chunk(), Some(vec!['a', 'b']));
        assert_eq!(scheduler.complete(2).done, 2);
        assert_eq!(scheduler.next_chunk(), Some(vec!['c', 'd']));
        assert_eq!(scheduler.next_chunk(), Some(vec!['e']));
        assert!(scheduler.is_exhausted());
        assert_eq!(scheduler.next_chunk(), None);
    }

    #[test]
    fn empty_scheduler_is_exhausted() {
        let mut scheduler = ChunkScheduler::<u8>::new(Vec::new(), size(3));
        assert!(scheduler.is_exhausted());
        assert_eq!(scheduler.next_chunk(), None);
        assert_eq!(scheduler.progress().percent(), 100);
    }

    #[test]
    fn progress_display() {
        let progress = Progress { done: 3, total: 7 };
        assert_eq!(progress.percent(), 43);
        assert_eq!(progress.to_string(), "3/7 (43 %)");
        assert_eq!(Progress { done: 0, total: 0 }.percent(), 100);
    }
}
