// packages/engine/src/runtime/partition.rs
//! Row partitioning for the fork-join step
//!
//! `N` rows are split into `W` contiguous ranges of `N / W` rows; the final
//! range absorbs the remainder.
//!
//! ```text
//! N = 10, W = 3
//! worker 0: rows 0..3
//! worker 1: rows 3..6
//! worker 2: rows 6..10
//! ```

use std::ops::Range;

/// A contiguous range of rows owned by one worker for one chronon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPartition {
    /// Worker index
    pub index: usize,
    
    /// Rows scanned by this worker
    pub rows: Range<usize>,
}

impl RowPartition {
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split `rows` into `workers` contiguous, non-overlapping partitions
pub fn partition_rows(rows: usize, workers: usize) -> Vec<RowPartition> {
    assert!(workers >= 1, "at least one worker is required");
    assert!(
        workers <= rows,
        "{} workers cannot partition {} rows",
        workers,
        rows
    );
    
    let per_worker = rows / workers;
    (0..workers)
        .map(|index| {
            let start = index * per_worker;
            let end = if index == workers - 1 {
                rows
            } else {
                start + per_worker
            };
            RowPartition {
                index,
                rows: start..end,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_single_worker() {
        let parts = partition_rows(7, 1);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].rows, 0..7);
    }
    
    #[test]
    fn test_remainder_goes_last() {
        let parts = partition_rows(10, 3);
        let ranges: Vec<_> = parts.iter().map(|p| p.rows.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }
    
    #[test]
    fn test_one_row_each() {
        let parts = partition_rows(5, 5);
        assert!(parts.iter().all(|p| p.len() == 1));
        assert_eq!(parts[4].rows, 4..5);
    }
    
    #[test]
    #[should_panic]
    fn test_more_workers_than_rows() {
        partition_rows(3, 4);
    }
}
