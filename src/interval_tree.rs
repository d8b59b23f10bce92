use crate::error::{check_interval, IntervalError};
use crate::node::{self, Node};
use log::{debug, trace};
use std::fmt;
use std::fmt::Debug;

/// An `IntervalSearchTree` stores intervals `[start, end)` in a binary search
/// tree ordered by `start`. Every node caches the maximum `end` of its subtree,
/// which lets [`IntervalSearchTree::overlap_search`] find an overlapping
/// interval by following a single root-to-leaf path.
///
/// Intervals sharing only an endpoint do not overlap: `[10, 20)` and `[20, 40)`
/// are disjoint.
///
/// The tree is never rebalanced, so every operation is `O(h)` where `h` is the
/// current height, which degrades to `O(n)` for sorted insertions.
///
/// ```
/// use interval_search_tree::interval_tree::IntervalSearchTree;
///
/// let mut tree = IntervalSearchTree::new();
/// tree.add(15, 20).unwrap();
/// tree.add(10, 30).unwrap();
///
/// let hit = tree.overlap_search(21, 23).unwrap().unwrap();
/// assert_eq!((hit.start(), hit.end()), (&10, &30));
/// assert!(tree.overlap_search(30, 31).unwrap().is_none());
/// ```
pub struct IntervalSearchTree<K> {
    root: Option<Box<Node<K>>>,
    size: usize,
}

impl<K> Drop for IntervalSearchTree<K> {
    fn drop(&mut self) {
        node::dismantle(self.root.take());
    }
}

impl<K> Clone for IntervalSearchTree<K>
where
    K: Clone,
{
    fn clone(&self) -> IntervalSearchTree<K> {
        IntervalSearchTree {
            root: node::clone_subtree(self.root.as_deref()),
            size: self.size,
        }
    }
}

/// Two trees are equal when they have the same shape and hold the same
/// intervals and cached maxima at every position.
impl<K> PartialEq for IntervalSearchTree<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &IntervalSearchTree<K>) -> bool {
        self.size == other.size
            && self.preorder().zip(other.preorder()).all(|(a, b)| {
                let (a, b) = (a.node, b.node);
                a.start == b.start
                    && a.end == b.end
                    && a.max_end == b.max_end
                    && a.left.is_some() == b.left.is_some()
                    && a.right.is_some() == b.right.is_some()
            })
    }
}

impl<K> fmt::Debug for IntervalSearchTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.preorder()).finish()
    }
}

impl<K> Default for IntervalSearchTree<K> {
    fn default() -> IntervalSearchTree<K> {
        IntervalSearchTree {
            root: None,
            size: 0,
        }
    }
}

impl<K> fmt::Display for IntervalSearchTree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => write!(f, "{{}}"),
        }
    }
}

/// Read-only view of a stored interval and its subtree's cached maximum end.
pub struct IntervalRef<'a, K> {
    node: &'a Node<K>,
}

impl<'a, K> fmt::Debug for IntervalRef<'a, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IntervalRef")
            .field("start", &self.node.start)
            .field("end", &self.node.end)
            .field("max_end", &self.node.max_end)
            .finish()
    }
}

impl<'a, K> Clone for IntervalRef<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for IntervalRef<'a, K> {}

impl<'a, K> IntervalRef<'a, K> {
    /// Inclusive start of the interval.
    pub fn start(&self) -> &'a K {
        &self.node.start
    }

    /// Exclusive end of the interval.
    pub fn end(&self) -> &'a K {
        &self.node.end
    }

    /// Maximum end among all intervals in this node's subtree, itself included.
    pub fn max_end(&self) -> &'a K {
        &self.node.max_end
    }

    pub fn overlaps(&self, start: &K, end: &K) -> bool
    where
        K: Ord,
    {
        self.node.overlaps(start, end)
    }
}

impl<'a, K> fmt::Display for IntervalRef<'a, K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}) {}", self.node.start, self.node.end, self.node.max_end)
    }
}

/// Root-left-right iterator over the tree, see [`IntervalSearchTree::preorder`].
pub struct Preorder<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Iterator for Preorder<'a, K> {
    type Item = IntervalRef<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right first, so that the left subtree is popped next.
        if let Some(right) = &node.right {
            self.stack.push(right);
        }
        if let Some(left) = &node.left {
            self.stack.push(left);
        }

        Some(IntervalRef { node })
    }
}

impl<'a, K> IntoIterator for &'a IntervalSearchTree<K> {
    type Item = IntervalRef<'a, K>;
    type IntoIter = Preorder<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.preorder()
    }
}

impl<K> IntervalSearchTree<K> {
    /// Creates an empty tree.
    pub fn new() -> IntervalSearchTree<K> {
        IntervalSearchTree::default()
    }

    /// Number of intervals stored.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no interval.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every interval.
    pub fn clear(&mut self) {
        node::dismantle(self.root.take());
        self.size = 0;
    }

    /// Number of nodes on the longest root-to-leaf path. An empty tree has
    /// height 0.
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    /// Visits every stored interval once, in root-left-right order.
    ///
    /// ```
    /// use interval_search_tree::interval_tree::IntervalSearchTree;
    ///
    /// let mut tree = IntervalSearchTree::new();
    /// tree.add(15, 20).unwrap();
    /// tree.add(10, 30).unwrap();
    /// tree.add(17, 19).unwrap();
    ///
    /// let dump: Vec<_> = tree.preorder().map(|i| i.to_string()).collect();
    /// assert_eq!(dump, vec!["[15, 20) 30", "[10, 30) 30", "[17, 19) 19"]);
    /// ```
    pub fn preorder(&self) -> Preorder<'_, K> {
        let mut stack = Vec::new();
        if let Some(root) = &self.root {
            stack.push(&**root);
        }

        Preorder { stack }
    }
}

impl<K> IntervalSearchTree<K>
where
    K: Ord + Clone + Debug,
{
    /// Inserts `[start, end)`. Intervals are ordered by `start` only; an
    /// interval whose start equals an existing one goes to its right.
    ///
    /// Every node on the insertion path has its `max_end` raised to `end` on
    /// the way down.
    ///
    /// Fails with [`IntervalError::InvalidInterval`] unless `start < end`, in
    /// which case the tree is left untouched.
    pub fn add(&mut self, start: K, end: K) -> Result<(), IntervalError<K>> {
        check_interval(&start, &end)?;
        trace!("adding [{:?}, {:?})", start, end);

        let mut curr = match self.root.as_mut() {
            Some(root) => root,
            None => {
                self.root = Some(Box::new(Node::new(start, end)));
                self.size += 1;
                return Ok(());
            }
        };

        loop {
            curr.maybe_update_max_end(&end);
            let next = if start < curr.start {
                &mut curr.left
            } else {
                &mut curr.right
            };

            match next {
                Some(child) => curr = child,
                None => {
                    *next = Some(Box::new(Node::new(start, end)));
                    self.size += 1;
                    return Ok(());
                }
            }
        }
    }

    /// Returns some stored interval overlapping `[start, end)`, or `None` if
    /// there is none.
    ///
    /// Only one path is followed: at each node without a match, the search
    /// goes left if the left subtree's `max_end` exceeds `start`, and right
    /// otherwise. Which overlapping interval is returned depends on the shape
    /// of the tree; it is not necessarily the one with the smallest start.
    ///
    /// ```
    /// use interval_search_tree::interval_tree::IntervalSearchTree;
    ///
    /// let mut tree = IntervalSearchTree::new();
    /// tree.add(10, 20).unwrap();
    ///
    /// assert!(tree.overlap_search(20, 40).unwrap().is_none());
    /// assert!(tree.overlap_search(15, 25).unwrap().is_some());
    /// assert!(tree.overlap_search(5, 5).is_err());
    /// ```
    pub fn overlap_search(
        &self,
        start: K,
        end: K,
    ) -> Result<Option<IntervalRef<'_, K>>, IntervalError<K>> {
        check_interval(&start, &end)?;

        let mut curr = self.root.as_deref();
        while let Some(node) = curr {
            if node.overlaps(&start, &end) {
                trace!(
                    "[{:?}, {:?}) overlaps [{:?}, {:?})",
                    start,
                    end,
                    node.start,
                    node.end
                );
                return Ok(Some(IntervalRef { node }));
            }

            curr = match node.left.as_deref() {
                Some(left) if left.max_end > start => Some(left),
                _ => node.right.as_deref(),
            };
        }

        trace!("no interval overlaps [{:?}, {:?})", start, end);
        Ok(None)
    }

    /// Removes the first node found whose start equals `start`, following the
    /// same ordering as [`IntervalSearchTree::add`]. `end` is not compared:
    /// `delete(10, 999)` removes the interval starting at 10 whatever its end.
    /// Use [`IntervalSearchTree::delete_exact`] to also require `end` to match.
    ///
    /// A node with two children takes the values of its in-order successor,
    /// which is then removed from the right subtree instead.
    ///
    /// Deleting an absent interval is a no-op. Returns whether a node was
    /// removed.
    pub fn delete(&mut self, start: K, end: K) -> bool {
        let deleted = node::delete(&mut self.root, &start, None);
        self.finish_delete(&start, &end, deleted)
    }

    /// Like [`IntervalSearchTree::delete`], but the node found by `start` is
    /// only removed if its end equals `end` as well.
    ///
    /// ```
    /// use interval_search_tree::interval_tree::IntervalSearchTree;
    ///
    /// let mut tree = IntervalSearchTree::new();
    /// tree.add(10, 30).unwrap();
    ///
    /// assert!(!tree.delete_exact(10, 999));
    /// assert!(tree.delete_exact(10, 30));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete_exact(&mut self, start: K, end: K) -> bool {
        let deleted = node::delete(&mut self.root, &start, Some(&end));
        self.finish_delete(&start, &end, deleted)
    }

    /// Updates the size after a deletion attempt and reports its outcome.
    fn finish_delete(&mut self, start: &K, end: &K, deleted: bool) -> bool {
        if deleted {
            self.size -= 1;
            debug!(
                "deleted interval starting at {:?} (requested end {:?})",
                start, end
            );
        } else {
            debug!("nothing to delete for [{:?}, {:?})", start, end);
        }
        deleted
    }
}
