//! Implementation of an interval search tree ([`interval_tree::IntervalSearchTree`]):
//! a binary search tree of intervals `[start, end)` ordered by `start`, where
//! each node is augmented with the maximum `end` found in its subtree. This is
//! the augmentation described in Cormen et al. (2009, Section 14.3: Interval
//! trees, pp. 348–354), on top of a plain unbalanced tree.
//!
//! The augmentation lets [`interval_tree::IntervalSearchTree::overlap_search`]
//! answer "does anything stored overlap this interval?" by walking a single
//! path. Overlap is strict: intervals that only share an endpoint, such as
//! `[10, 20)` and `[20, 40)`, do not overlap.
//!
//! Note that any type satisfying the [`Ord`] trait can be used as an endpoint.

mod error;
/// An interval search tree implemented with an unbalanced binary search tree.
pub mod interval_tree;
mod node;

pub use error::IntervalError;
