//! Time-synced lyric highlighting for reference playback.
//!
//! Pages that play a reference cue show its lyric line and light it up
//! while the playback clock sits inside the chunk's window. A chunk is
//! active from its start time until the next chunk starts (or its own
//! hold elapses, for the last chunk). The tracker is pure: the caller
//! feeds it the playback position, typically
//! [`TonePlayer::current_time`](crate::playback::TonePlayer::current_time).

use std::time::Duration;

/// The sung cue every reference recording carries.
pub const REFERENCE_LYRIC: &str = "Yaaaaaaaaaaaaaaaaaaaaa";

/// One timed line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricChunk {
    pub text: String,
    /// Playback position at which this chunk becomes active.
    pub starts_at: Duration,
    /// How long the chunk stays lit when no later chunk cuts it off.
    pub hold: Duration,
}

impl LyricChunk {
    pub fn new(text: impl Into<String>, starts_at: Duration, hold: Duration) -> Self {
        Self {
            text: text.into(),
            starts_at,
            hold,
        }
    }
}

/// Follows a chunk list against an externally supplied playback clock.
#[derive(Debug, Clone)]
pub struct LyricTracker {
    chunks: Vec<LyricChunk>,
    position: Duration,
}

impl LyricTracker {
    /// A tracker over the given chunks; unsorted input is sorted by start
    /// time.
    pub fn new(mut chunks: Vec<LyricChunk>) -> Self {
        chunks.sort_by_key(|chunk| chunk.starts_at);
        Self {
            chunks,
            position: Duration::ZERO,
        }
    }

    /// The single-chunk cue a reference round sings from position zero.
    pub fn reference_cue(hold: Duration) -> Self {
        Self::new(vec![LyricChunk::new(REFERENCE_LYRIC, Duration::ZERO, hold)])
    }

    pub fn chunks(&self) -> &[LyricChunk] {
        self.chunks.as_slice()
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Move the playback clock. Returns true when the active chunk
    /// changed, so a caller can react to line transitions.
    pub fn seek(&mut self, position: Duration) -> bool {
        let before = self.active_index();
        self.position = position;
        self.active_index() != before
    }

    pub fn reset(&mut self) {
        self.position = Duration::ZERO;
    }

    /// Index of the chunk the clock has reached, scanning from the end.
    pub fn active_index(&self) -> Option<usize> {
        self.chunks
            .iter()
            .rposition(|chunk| self.position >= chunk.starts_at)
    }

    pub fn active(&self) -> Option<&LyricChunk> {
        self.active_index().map(|index| &self.chunks[index])
    }

    /// When a chunk stops being lit: the next chunk's start, or its own
    /// hold for the last one.
    fn end_of(&self, index: usize) -> Duration {
        match self.chunks.get(index + 1) {
            Some(next) => next.starts_at,
            None => self.chunks[index].starts_at + self.chunks[index].hold,
        }
    }

    /// True while the clock sits inside the active chunk's window.
    pub fn is_highlighted(&self) -> bool {
        match self.active_index() {
            Some(index) => self.position < self.end_of(index),
            None => false,
        }
    }

    /// True once the clock has passed the given chunk's window.
    pub fn is_complete(&self, index: usize) -> bool {
        index < self.chunks.len() && self.position >= self.end_of(index)
    }

    /// Fraction of the whole lyric consumed, clamped to 0..=1.
    pub fn progress(&self) -> f32 {
        let Some(last) = self.chunks.len().checked_sub(1) else {
            return 0.0;
        };
        let total = self.end_of(last).as_secs_f32();
        if total <= 0.0 {
            return 0.0;
        }
        (self.position.as_secs_f32() / total).min(1.0)
    }
}
