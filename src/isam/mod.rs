//! Static in-memory ISAM tree.
//!
//! The tree owns one sorted record array (the leaf data) and a contiguous
//! buffer of internal nodes built once over it:
//!
//! ```text
//!                 [root]                    nodes[k]
//!           /       |       \
//!     [node 0]  [node 1]  [node 2]          nodes[0..3]
//!      / | \     / | \     / |
//!    run run ... run ...  run run           data[0..n] in runs of FANOUT
//! ```
//!
//! Levels are laid out bottom-up in the node buffer, so the root is always
//! the last node. Nothing is mutated after construction; the only way out is
//! [`IsamTree::unbuild`], which consumes the tree and returns the records.

mod node;

use crate::error::{Error, Result};
use crate::merge;
use crate::record::{MergeMode, RangeQuery, Record, StaticStructure};
use crate::sizing::{leaf_node_count, required_internal_nodes};

use self::node::{ChildRef, InternalNode};

/// Static ISAM tree over records of type `R` with `FANOUT` slots per node.
///
/// `FANOUT` must be a power of two and at least 2; other values fail to
/// compile once the tree is built.
///
/// ```compile_fail
/// use bsm_rs::IsamTree;
///
/// let _ = IsamTree::<(i64, i64), 3>::build(vec![(1, 0)]);
/// ```
///
/// ```compile_fail
/// use bsm_rs::IsamTree;
///
/// let _ = IsamTree::<(i64, i64), 1>::build(vec![(1, 0)]);
/// ```
pub struct IsamTree<R: Record, const FANOUT: usize = 64> {
    data: Vec<R>,
    nodes: Vec<InternalNode<R::Key, FANOUT>>,
    root: Option<usize>,
    height: usize,
}

impl<R: Record, const FANOUT: usize> IsamTree<R, FANOUT> {
    const FANOUT_IS_VALID: () = assert!(
        FANOUT >= 2 && FANOUT.is_power_of_two(),
        "FANOUT must be a power of two and at least 2"
    );

    /// Sort `records` and build a tree over them.
    pub fn build(mut records: Vec<R>) -> Self {
        records.sort_unstable();
        Self::from_sorted(records)
    }

    /// Build a tree over records already sorted by key.
    ///
    /// Unsorted input is a caller bug: it panics in debug builds and yields a
    /// tree that answers queries incorrectly in release builds. Use
    /// [`IsamTree::try_build_presorted`] for untrusted input.
    pub fn build_presorted(records: Vec<R>) -> Self {
        debug_assert!(
            first_unsorted(&records).is_none(),
            "build_presorted called with unsorted records"
        );
        Self::from_sorted(records)
    }

    /// Checked variant of [`IsamTree::build_presorted`].
    pub fn try_build_presorted(records: Vec<R>) -> Result<Self> {
        if let Some(position) = first_unsorted(&records) {
            return Err(Error::Unsorted { position });
        }
        Ok(Self::from_sorted(records))
    }

    fn from_sorted(data: Vec<R>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FANOUT_IS_VALID;

        let mut tree = Self {
            data,
            nodes: Vec::new(),
            root: None,
            height: 0,
        };
        if !tree.data.is_empty() {
            tree.build_internal_levels();
        }

        tracing::debug!(
            target: "bsm::isam",
            records = tree.data.len(),
            leaf_nodes = leaf_node_count(tree.data.len(), FANOUT),
            internal_nodes = tree.nodes.len(),
            height = tree.height,
            "built ISAM tree"
        );
        tree
    }

    fn build_internal_levels(&mut self) {
        let leaf_nodes = leaf_node_count(self.data.len(), FANOUT);
        let expected = required_internal_nodes(leaf_nodes, FANOUT);
        let mut nodes: Vec<InternalNode<R::Key, FANOUT>> = Vec::with_capacity(expected);

        // First level: one slot per run of FANOUT records.
        let mut slot = 0usize;
        for run_start in (0..self.data.len()).step_by(FANOUT) {
            if slot == 0 {
                nodes.push(InternalNode::new());
            }
            let key = self.data[run_start].key().clone();
            if let Some(node) = nodes.last_mut() {
                node.push(key, ChildRef::leaf(run_start));
            }
            slot = (slot + 1) & (FANOUT - 1);
        }
        let mut height = 1;

        // Remaining levels: one slot per node of the level below.
        let mut level_start = 0;
        let mut level_end = nodes.len();
        while level_end - level_start > 1 {
            slot = 0;
            for child in level_start..level_end {
                if slot == 0 {
                    nodes.push(InternalNode::new());
                }
                let key = nodes[child].first_key().clone();
                if let Some(node) = nodes.last_mut() {
                    node.push(key, ChildRef::node(child));
                }
                slot = (slot + 1) & (FANOUT - 1);
            }
            level_start = level_end;
            level_end = nodes.len();
            height += 1;
        }

        debug_assert_eq!(nodes.len(), expected, "internal node count mismatch");
        self.root = Some(level_start);
        self.nodes = nodes;
        self.height = height;
    }

    /// Position of the first record with key `>= key`, or `record_count()`.
    pub(crate) fn lower_bound(&self, key: &R::Key) -> usize {
        let Some(root) = self.root else {
            return 0;
        };

        let mut current = ChildRef::node(root);
        while !current.is_leaf() {
            current = self.nodes[current.index()].descend(key);
        }

        let start = current.index();
        start
            + self.data[start..]
                .iter()
                .position(|r| r.key() >= key)
                .unwrap_or(self.data.len() - start)
    }

    /// Records with key in `[lower_bound, upper_bound)`, in key order.
    pub fn range<'a>(&'a self, query: &'a RangeQuery<R::Key>) -> impl Iterator<Item = &'a R> + 'a {
        let start = self.lower_bound(&query.lower_bound);
        self.data[start..]
            .iter()
            .take_while(move |r| *r.key() < query.upper_bound)
    }

    /// Owned copy of the records matching `query`. `None` matches nothing.
    pub fn query(&self, query: Option<&RangeQuery<R::Key>>) -> Vec<R> {
        match query {
            Some(q) if !self.data.is_empty() => self.range(q).cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Destroy the index and return its records in sorted order.
    pub fn unbuild(self) -> Vec<R> {
        tracing::trace!(
            target: "bsm::isam",
            records = self.data.len(),
            internal_nodes = self.nodes.len(),
            "unbuilt ISAM tree"
        );
        self.data
    }

    /// Sorted leaf data.
    #[inline]
    pub fn records(&self) -> &[R] {
        &self.data
    }

    /// Number of records.
    #[inline]
    pub fn record_count(&self) -> usize {
        self.data.len()
    }

    /// True when the tree holds no records (and has no root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of internal nodes; matches [`required_internal_nodes`] for the
    /// tree's leaf run count.
    #[inline]
    pub fn internal_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of internal levels, 0 for an empty tree.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

/// First position whose key is smaller than its predecessor's.
fn first_unsorted<R: Record>(records: &[R]) -> Option<usize> {
    records
        .windows(2)
        .position(|w| w[1].key() < w[0].key())
        .map(|i| i + 1)
}

impl<R: Record, const FANOUT: usize> StaticStructure for IsamTree<R, FANOUT> {
    type Record = R;
    type Query = RangeQuery<R::Key>;

    fn build(records: Vec<R>) -> Self {
        IsamTree::build(records)
    }

    fn build_presorted(records: Vec<R>) -> Self {
        IsamTree::build_presorted(records)
    }

    fn query(&self, query: Option<&Self::Query>) -> Vec<R> {
        IsamTree::query(self, query)
    }

    fn query_merge(acc: Vec<R>, partial: Vec<R>, _query: &Self::Query, mode: MergeMode) -> Vec<R> {
        match mode {
            MergeMode::Standard => {
                let mut acc = acc;
                acc.extend(partial);
                acc
            }
            MergeMode::Mdsp => merge::merge_two(acc, partial),
        }
    }

    fn unbuild(self) -> Vec<R> {
        IsamTree::unbuild(self)
    }

    fn record_count(&self) -> usize {
        self.data.len()
    }
}

impl<R: Record + std::fmt::Debug, const FANOUT: usize> std::fmt::Debug for IsamTree<R, FANOUT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsamTree")
            .field("fanout", &FANOUT)
            .field("records", &self.data.len())
            .field("internal_nodes", &self.nodes.len())
            .field("height", &self.height)
            .finish()
    }
}
