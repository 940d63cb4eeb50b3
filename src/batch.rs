//! Batch planning.
//!
//! The input list is split into contiguous spans up front. Every span holds
//! exactly `batch_size` identifiers except possibly the last, and no span is
//! ever empty.

use crate::errors::{Result, RunError};
use std::ops::Range;

/// One contiguous slice of the input, identified by its 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpan {
    /// 1-based batch index
    pub index: usize,
    /// Total number of batches in the plan
    pub total: usize,
    /// First identifier position (inclusive)
    pub start: usize,
    /// Last identifier position (exclusive)
    pub end: usize,
}

impl BatchSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partition of `len` identifiers into batches of `batch_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    len: usize,
    batch_size: usize,
}

impl BatchPlan {
    /// Build a plan, rejecting an empty input or a zero batch size.
    pub fn new(len: usize, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(RunError::config("batch_size must be greater than zero"));
        }
        if len == 0 {
            return Err(RunError::EmptyInput);
        }
        Ok(Self { len, batch_size })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// `ceil(len / batch_size)`
    pub fn total_batches(&self) -> usize {
        self.len.div_ceil(self.batch_size)
    }

    /// Spans in input order.
    pub fn spans(&self) -> impl Iterator<Item = BatchSpan> + '_ {
        let total = self.total_batches();
        (0..total).map(move |i| {
            let start = i * self.batch_size;
            BatchSpan {
                index: i + 1,
                total,
                start,
                end: (start + self.batch_size).min(self.len),
            }
        })
    }
}
