use std::cmp::Ordering;
use std::fmt;

// Walks over nodes use explicit stacks: an unbalanced tree can be one long path.
pub(crate) struct Node<K> {
    pub start: K,
    pub end: K,
    pub max_end: K, // Max end-point of the subtree.
    pub left: Option<Box<Node<K>>>,
    pub right: Option<Box<Node<K>>>,
}

enum Render<'a, K> {
    Node(&'a Node<K>),
    Text(&'static str),
}

impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack = vec![Render::Node(self)];
        while let Some(item) = stack.pop() {
            let node = match item {
                Render::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Render::Node(node) => node,
            };

            write!(f, " {{ [{},{}[ ({})", node.start, node.end, node.max_end)?;
            stack.push(Render::Text(" } "));
            if let Some(right) = &node.right {
                stack.push(Render::Node(&**right));
                stack.push(Render::Text(" right:"));
            }
            if let Some(left) = &node.left {
                stack.push(Render::Node(&**left));
                stack.push(Render::Text(" left:"));
            }
        }
        Ok(())
    }
}

impl<K> Node<K> {
    pub fn new(start: K, end: K) -> Node<K>
    where
        K: Clone,
    {
        let max_end = end.clone();

        Node {
            start,
            end,
            max_end,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Strict overlap: intervals sharing only an endpoint do not overlap.
    pub fn overlaps(&self, start: &K, end: &K) -> bool
    where
        K: Ord,
    {
        *start < self.end && *end > self.start
    }

    pub fn maybe_update_max_end(&mut self, inserted_end: &K)
    where
        K: Ord + Clone,
    {
        if *inserted_end > self.max_end {
            self.max_end = inserted_end.clone();
        }
    }

    /// Recomputes `max_end` from `end` and the children's cached values.
    pub fn recompute_max_end(&mut self)
    where
        K: Ord + Clone,
    {
        if self.is_leaf() {
            self.max_end = self.end.clone();
            return;
        }

        let mut max_end = &self.end;
        for child in [&self.left, &self.right].into_iter().flatten() {
            if child.max_end > *max_end {
                max_end = &child.max_end;
            }
        }
        self.max_end = max_end.clone();
    }

    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [&node.left, &node.right].into_iter().flatten() {
                stack.push((&**child, depth + 1));
            }
        }
        height
    }
}

enum CloneStep<'a, K> {
    Visit(Option<&'a Node<K>>),
    Build(&'a Node<K>),
}

/// Deep copy of a subtree, built children first.
pub(crate) fn clone_subtree<K: Clone>(root: Option<&Node<K>>) -> Option<Box<Node<K>>> {
    let mut work = vec![CloneStep::Visit(root)];
    let mut built: Vec<Option<Box<Node<K>>>> = Vec::new();

    while let Some(step) = work.pop() {
        match step {
            CloneStep::Visit(None) => built.push(None),
            CloneStep::Visit(Some(node)) => {
                work.push(CloneStep::Build(node));
                work.push(CloneStep::Visit(node.right.as_deref()));
                work.push(CloneStep::Visit(node.left.as_deref()));
            }
            CloneStep::Build(node) => {
                let right = built.pop().flatten();
                let left = built.pop().flatten();
                built.push(Some(Box::new(Node {
                    start: node.start.clone(),
                    end: node.end.clone(),
                    max_end: node.max_end.clone(),
                    left,
                    right,
                })));
            }
        }
    }

    built.pop().flatten()
}

/// Frees a subtree one node at a time. Every node is a leaf by the time it is
/// dropped.
pub(crate) fn dismantle<K>(root: Option<Box<Node<K>>>) {
    let mut stack: Vec<Box<Node<K>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// Deletes the first node whose start equals `start` on the ordering path
/// under `root`. With `end` set, a node whose end differs is left in place.
/// Returns whether a node was removed.
///
/// The path is detached into a stack on the way down and reattached on the
/// way up, refreshing `max_end` once a node is gone.
pub(crate) fn delete<K>(root: &mut Option<Box<Node<K>>>, start: &K, end: Option<&K>) -> bool
where
    K: Ord + Clone,
{
    let mut path: Vec<(Box<Node<K>>, Ordering)> = Vec::new();
    let mut curr = root.take();

    let deleted = loop {
        let Some(mut node) = curr.take() else {
            break false;
        };

        match start.cmp(&node.start) {
            Ordering::Less => {
                curr = node.left.take();
                path.push((node, Ordering::Less));
            }
            Ordering::Greater => {
                curr = node.right.take();
                path.push((node, Ordering::Greater));
            }
            Ordering::Equal => {
                if end.is_some_and(|end| *end != node.end) {
                    curr = Some(node);
                    break false;
                }
                curr = splice_out(node);
                break true;
            }
        }
    };

    while let Some((mut parent, side)) = path.pop() {
        match side {
            Ordering::Less => parent.left = curr,
            _ => parent.right = curr,
        }
        if deleted {
            parent.recompute_max_end();
        }
        curr = Some(parent);
    }

    *root = curr;
    deleted
}

/// Removes `node` from its subtree and returns what takes its place. A node
/// with two children keeps its position and takes the values of its in-order
/// successor, which is unlinked from the right subtree instead.
fn splice_out<K>(mut node: Box<Node<K>>) -> Option<Box<Node<K>>>
where
    K: Ord + Clone,
{
    match (node.left.take(), node.right.take()) {
        (Some(left), Some(right)) => {
            let (successor, rest) = take_min(right);
            let Node { start, end, .. } = *successor;
            node.start = start;
            node.end = end;
            node.left = Some(left);
            node.right = rest;
            node.recompute_max_end();
            Some(node)
        }
        // The child's subtree is untouched, so its cached max_end still holds.
        (Some(child), None) | (None, Some(child)) => Some(child),
        (None, None) => None,
    }
}

/// Unlinks the leftmost node of `subtree`, returning it and the rest.
fn take_min<K>(subtree: Box<Node<K>>) -> (Box<Node<K>>, Option<Box<Node<K>>>)
where
    K: Ord + Clone,
{
    let mut spine = Vec::new();
    let mut node = subtree;
    while let Some(left) = node.left.take() {
        spine.push(node);
        node = left;
    }

    let mut rest = node.right.take();
    while let Some(mut parent) = spine.pop() {
        parent.left = rest;
        parent.recompute_max_end();
        rest = Some(parent);
    }

    (node, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(start: i32, end: i32) -> Option<Box<Node<i32>>> {
        Some(Box::new(Node::new(start, end)))
    }

    fn path(len: i32) -> Option<Box<Node<i32>>> {
        let mut root = None;
        for start in (0..len).rev() {
            let mut node = Node::new(start, start + 1);
            node.max_end = len;
            node.right = root;
            root = Some(Box::new(node));
        }
        root
    }

    #[test]
    fn new_node_is_a_leaf_with_its_own_end() {
        let node = Node::new(3, 9);

        assert!(node.is_leaf());
        assert_eq!(node.max_end, 9);
        assert_eq!(node.height(), 1);
    }

    #[test]
    fn overlap_excludes_touching_endpoints() {
        let node = Node::new(10, 20);

        assert!(node.overlaps(&15, &25));
        assert!(node.overlaps(&0, &11));
        assert!(node.overlaps(&12, &13));
        assert!(!node.overlaps(&20, &40));
        assert!(!node.overlaps(&0, &10));
    }

    #[test]
    fn recompute_considers_both_children() {
        let mut node = Node::new(10, 12);
        node.left = leaf(5, 50);
        node.right = leaf(11, 20);
        node.recompute_max_end();
        assert_eq!(node.max_end, 50);

        node.left = None;
        node.recompute_max_end();
        assert_eq!(node.max_end, 20);

        node.right = None;
        node.recompute_max_end();
        assert_eq!(node.max_end, 12);
    }

    #[test]
    fn take_min_refreshes_the_left_spine() {
        let mut node = Node::new(10, 12);
        let mut left = Node::new(5, 6);
        left.left = leaf(1, 40);
        left.right = leaf(7, 8);
        left.max_end = 40;
        node.left = Some(Box::new(left));
        node.max_end = 40;

        let (min, rest) = take_min(Box::new(node));
        assert_eq!((min.start, min.end), (1, 40));

        let rest = rest.unwrap();
        assert_eq!((rest.start, rest.max_end), (10, 12));
        assert_eq!(rest.left.as_ref().unwrap().max_end, 8);
        assert_eq!(rest.height(), 3);
    }

    #[test]
    fn display_nests_children() {
        let mut node = Node::new(10, 12);
        node.max_end = 30;
        node.left = leaf(5, 6);
        node.right = leaf(15, 30);

        assert_eq!(
            node.to_string(),
            " { [10,12[ (30) left: { [5,6[ (6) }  right: { [15,30[ (30) }  } "
        );
    }

    #[test]
    fn long_paths_without_recursion() {
        let root = path(100_000);
        let node = root.as_deref().unwrap();

        assert_eq!(node.height(), 100_000);
        let copy = clone_subtree(Some(node));
        assert_eq!(copy.as_deref().map(Node::height), Some(100_000));

        dismantle(copy);
        dismantle(root);
    }

    #[test]
    fn delete_at_the_bottom_of_a_long_path() {
        let mut root = path(100_000);

        assert!(delete(&mut root, &99_999, Some(&100_000)));
        let node = root.as_deref().unwrap();
        assert_eq!(node.max_end, 99_999);
        assert_eq!(node.height(), 99_999);

        assert!(!delete(&mut root, &99_999, None));
        dismantle(root);
    }
}
