use std::fmt::Debug;
use thiserror::Error;

/// Errors raised by [`crate::interval_tree::IntervalSearchTree`].
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum IntervalError<K: Debug> {
    /// The interval is empty or reversed: `start >= end`.
    #[error("the end {end:?} should be greater than start {start:?}")]
    InvalidInterval { start: K, end: K },
}

/// Rejects `[start, end)` unless `start < end`.
pub(crate) fn check_interval<K>(start: &K, end: &K) -> Result<(), IntervalError<K>>
where
    K: Ord + Clone + Debug,
{
    if start >= end {
        return Err(IntervalError::InvalidInterval {
            start: start.clone(),
            end: end.clone(),
        });
    }

    Ok(())
}
