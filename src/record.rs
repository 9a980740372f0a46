//! Record projection, range predicates and the static structure contract.

use crate::error::{Error, Result};

/// How records are combined when levels are merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MergeMode {
    /// Concatenate level contents and let `build` sort them. Query results
    /// come back grouped by level, not globally sorted.
    #[default]
    Standard,
    /// Multi-way decomposable search problem mode: levels are k-way merged so
    /// the batch stays sorted and is rebuilt with `build_presorted`. Query
    /// results come back globally sorted.
    Mdsp,
}

/// A record stored in a static index.
///
/// The record's own `Ord` must sort by [`Record::key`] first and break ties by
/// [`Record::value`]; `(K, V)` tuples do this already.
pub trait Record: Ord + Clone {
    /// Ordered search key.
    type Key: Ord + Clone;
    /// Payload carried next to the key.
    type Value;

    /// Key projection used for ordering and range predicates.
    fn key(&self) -> &Self::Key;

    /// Value projection.
    fn value(&self) -> &Self::Value;
}

impl<K, V> Record for (K, V)
where
    K: Ord + Clone,
    V: Ord + Clone,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn key(&self) -> &K {
        &self.0
    }

    #[inline]
    fn value(&self) -> &V {
        &self.1
    }
}

/// Half-open key range `[lower_bound, upper_bound)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeQuery<K> {
    /// Inclusive lower bound.
    pub lower_bound: K,
    /// Exclusive upper bound.
    pub upper_bound: K,
}

impl<K: Ord> RangeQuery<K> {
    /// Unchecked constructor. An inverted range matches nothing.
    pub fn new(lower_bound: K, upper_bound: K) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Like [`RangeQuery::new`] but rejects `lower_bound > upper_bound`.
    pub fn try_new(lower_bound: K, upper_bound: K) -> Result<Self> {
        if lower_bound > upper_bound {
            return Err(Error::InvalidRange);
        }
        Ok(Self::new(lower_bound, upper_bound))
    }

    /// Whether `key` falls inside the range.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        *key >= self.lower_bound && *key < self.upper_bound
    }
}

/// A batch-built structure answering a decomposable search problem.
///
/// Implementors can be plugged into [`crate::BentleySaxe`], which only ever
/// rebuilds them from scratch and never mutates one in place.
pub trait StaticStructure: Sized {
    /// Record type held by the structure.
    type Record: Record;
    /// Query parameters.
    type Query;

    /// Build from records in arbitrary order.
    fn build(records: Vec<Self::Record>) -> Self;

    /// Build from records already sorted by the record order.
    ///
    /// Unsorted input is a caller bug; implementations may assert in debug
    /// builds and produce a wrong index in release builds.
    fn build_presorted(records: Vec<Self::Record>) -> Self;

    /// Answer `query` over this structure. `None` yields no records.
    fn query(&self, query: Option<&Self::Query>) -> Vec<Self::Record>;

    /// Fold `partial` into the accumulated result `acc`.
    ///
    /// With [`MergeMode::Mdsp`] both inputs are sorted and so must be the output.
    fn query_merge(
        acc: Vec<Self::Record>,
        partial: Vec<Self::Record>,
        query: &Self::Query,
        mode: MergeMode,
    ) -> Vec<Self::Record>;

    /// Tear the structure down and hand back its records.
    fn unbuild(self) -> Vec<Self::Record>;

    /// Number of records held.
    fn record_count(&self) -> usize;
}
