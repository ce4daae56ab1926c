//! Chunk planning.
//!
//! Splits a column list into contiguous, non-overlapping slices so that each
//! model invocation stays small.

use crate::{Result, error::EnrichmentError, models::ColumnRecord};

/// Default number of columns per model invocation.
pub const DEFAULT_CHUNK_SIZE: usize = 6;

/// A contiguous slice of the input schema.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// 1-based position of this chunk in the plan
    pub index: usize,
    /// Total number of chunks in the plan
    pub total: usize,
    /// Offset of the first column in the full schema
    pub offset: usize,
    pub columns: &'a [ColumnRecord],
}

impl Chunk<'_> {
    /// Number of columns in this chunk.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the chunk holds no columns (never produced by the planner).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Number of chunks needed for `total` columns: `ceil(total / chunk_size)`.
pub fn chunk_count(total: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    total.div_ceil(chunk_size)
}

/// Splits `columns` into chunks of at most `chunk_size` columns.
///
/// Order is preserved and every column lands in exactly one chunk. An empty
/// input yields an empty plan.
///
/// # Errors
/// Returns a configuration error if `chunk_size` is zero.
///
/// # Example
/// ```rust
/// use schemalift_core::{chunking::plan_chunks, models::ColumnRecord};
///
/// let columns: Vec<ColumnRecord> = (0..14)
///     .map(|i| ColumnRecord::new(format!("col_{i}"), "string"))
///     .collect();
/// let plan = plan_chunks(&columns, 6)?;
/// let sizes: Vec<usize> = plan.iter().map(|c| c.len()).collect();
/// assert_eq!(sizes, vec![6, 6, 2]);
/// # Ok::<(), schemalift_core::EnrichmentError>(())
/// ```
pub fn plan_chunks(columns: &[ColumnRecord], chunk_size: usize) -> Result<Vec<Chunk<'_>>> {
    if chunk_size == 0 {
        return Err(EnrichmentError::configuration(
            "chunk_size must be at least 1",
        ));
    }

    let total = chunk_count(columns.len(), chunk_size);
    let plan = columns
        .chunks(chunk_size)
        .enumerate()
        .map(|(position, slice)| Chunk {
            index: position.saturating_add(1),
            total,
            offset: position.saturating_mul(chunk_size),
            columns: slice,
        })
        .collect();

    Ok(plan)
}
