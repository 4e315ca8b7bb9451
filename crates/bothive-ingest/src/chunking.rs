//! Sliding-window text chunking.
//!
//! Fixed-size character windows with overlap so context spanning a boundary
//! survives in at least one chunk. Window arithmetic runs over `char`
//! indices, never raw byte offsets.

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 800;
/// Default overlap between consecutive windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Pure sliding-window chunker; each window starts `size - overlap`
/// characters after the previous one, and the final window may be short.
#[derive(Debug, Clone)]
pub struct WindowChunker {
    pub size: usize,
    pub overlap: usize,
}

impl WindowChunker {
    /// `overlap` is clamped below `size` so the window always advances.
    pub fn new(size: usize, overlap: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            overlap: overlap.min(size - 1),
        }
    }

    /// Split `text` into overlapping windows. Empty input yields no chunks;
    /// any non-empty input is fully covered, and the walk stops once a
    /// window reaches the end of the text.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

impl Default for WindowChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}
