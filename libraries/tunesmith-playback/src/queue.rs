//! Play queue
//!
//! A user-ordered FIFO of upcoming tracks, independent of the active
//! playlist. Once a queued track is playing, the queue drives "what plays
//! next" until it runs dry:
//!
//! ```text
//! enqueue A, B        [A, B]      (A starts if nothing was playing)
//! A ends              [B]         B plays, played-through prefix drained
//! B ends              []          exhausted -> playlist cursor takes over
//! ```

use crate::types::QueueEntry;
use tunesmith_core::TrackId;

/// Outcome of [`Queue::advance_from`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueAdvance {
    /// The entry after the finished one; it is now the head of the queue
    Next(QueueEntry),

    /// The finished track was the last entry; the queue has been emptied
    Exhausted,

    /// The finished track is not in the queue
    NotFound,
}

/// Ordered queue of pending tracks
#[derive(Debug, Clone, Default)]
pub struct Queue {
    entries: Vec<QueueEntry>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the tail
    ///
    /// Returns the new length.
    pub fn enqueue(&mut self, entry: QueueEntry) -> usize {
        self.entries.push(entry);
        self.entries.len()
    }

    /// Remove the entry at `index`
    ///
    /// Out-of-range indices are ignored.
    pub fn dequeue(&mut self, index: usize) -> Option<QueueEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Pick the entry following the finished track
    ///
    /// Everything up to and including the finished track is drained.
    pub fn advance_from(&mut self, finished: &TrackId) -> QueueAdvance {
        let Some(position) = self.position(finished) else {
            return QueueAdvance::NotFound;
        };

        if position + 1 >= self.entries.len() {
            self.entries.clear();
            return QueueAdvance::Exhausted;
        }

        self.entries.drain(..=position);
        QueueAdvance::Next(self.entries[0].clone())
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record a resolved file on every entry sharing `source_url`
    ///
    /// Returns how many entries were updated.
    pub fn backfill(&mut self, source_url: &str, local_file: &str) -> usize {
        let mut updated = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| !e.source_url.is_empty() && e.source_url == source_url && !e.is_resolved())
        {
            entry.set_local_file(local_file);
            updated += 1;
        }
        updated
    }

    /// Whether a track with this id is queued
    pub fn contains(&self, id: &TrackId) -> bool {
        self.position(id).is_some()
    }

    /// Index of a track in the queue
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Get entry at index
    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    /// All entries in playback order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
