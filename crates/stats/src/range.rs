use serde::Serialize;
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: u64 = 100;

/// Inclusive span of block heights, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
    start: i64,
    end: i64,
}

impl BlockRange {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn chunks(&self, chunk_size: u64) -> Chunks {
        Chunks {
            next: Some(self.start),
            end: self.end,
            chunk_size: chunk_size.clamp(1, i64::MAX as u64) as i64,
        }
    }
}

/// Sub-span of at most `chunk_size` consecutive heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub start: i64,
    pub end: i64,
}

impl Chunk {
    pub fn block_count(&self) -> u64 {
        self.end.abs_diff(self.start) + 1
    }

    pub fn heights(self) -> RangeInclusive<i64> {
        self.start..=self.end
    }
}

/// Lazily strides a [`BlockRange`].
#[derive(Debug, Clone)]
pub struct Chunks {
    next: Option<i64>,
    end: i64,
    chunk_size: i64,
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next?;
        let end = start.saturating_add(self.chunk_size - 1).min(self.end);
        self.next = end.checked_add(1).filter(|next| *next <= self.end);
        Some(Chunk { start, end })
    }
}
