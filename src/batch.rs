//! Per-item batch outcome demultiplexing.
//!
//! A batch exchange returns one update count per input item, in input
//! order; that ordering is load-bearing — callers correlate outcomes to
//! inputs by position, not content. Counts at the top of the range encode
//! the JDBC sentinels for "failed" and "succeeded, row count unknown",
//! so a mid-batch failure still yields a full, positionally aligned
//! outcome list rather than one aggregate error.

/// JDBC `Statement.EXECUTE_FAILED` (-3) on the unsigned wire field.
const EXECUTE_FAILED: u64 = u64::MAX - 2;

/// JDBC `Statement.SUCCESS_NO_INFO` (-2) on the unsigned wire field.
const SUCCESS_NO_INFO: u64 = u64::MAX - 1;

/// Outcome of one item in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The item ran and affected this many rows.
    Updated(u64),
    /// The item ran but the server did not report a row count.
    SucceededNoInfo,
    /// The item failed; items before and after it are reported
    /// independently. Whether earlier successes are already durable
    /// depends on the connection's auto-commit mode.
    Failed,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, BatchOutcome::Failed)
    }
}

pub(crate) fn demux_update_counts(update_counts: &[u64]) -> Vec<BatchOutcome> {
    update_counts
        .iter()
        .map(|&count| match count {
            EXECUTE_FAILED => BatchOutcome::Failed,
            SUCCESS_NO_INFO => BatchOutcome::SucceededNoInfo,
            updated => BatchOutcome::Updated(updated),
        })
        .collect()
}
