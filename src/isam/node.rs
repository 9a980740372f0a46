//! Internal nodes and tagged child references.

use smallvec::SmallVec;

/// Child reference: 64-bit tagged index.
///
/// Layout:
/// - Bit 63 = 1: leaf (position in the sorted record array)
/// - Bit 63 = 0: internal node (index into the node buffer)
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChildRef(u64);

impl ChildRef {
    const LEAF_BIT: u64 = 1u64 << 63;
    const INDEX_MASK: u64 = Self::LEAF_BIT - 1;

    #[inline]
    pub(crate) fn leaf(pos: usize) -> Self {
        debug_assert!(pos as u64 <= Self::INDEX_MASK);
        Self(pos as u64 | Self::LEAF_BIT)
    }

    #[inline]
    pub(crate) fn node(idx: usize) -> Self {
        debug_assert!(idx as u64 <= Self::INDEX_MASK);
        Self(idx as u64)
    }

    #[inline]
    pub(crate) fn is_leaf(self) -> bool {
        (self.0 & Self::LEAF_BIT) != 0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.0 & Self::INDEX_MASK) as usize
    }
}

impl std::fmt::Debug for ChildRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            write!(f, "Leaf({})", self.index())
        } else {
            write!(f, "Node({})", self.index())
        }
    }
}

/// One `(separator, child)` pair.
#[derive(Clone, Debug)]
pub(crate) struct Slot<K> {
    pub(crate) key: K,
    pub(crate) child: ChildRef,
}

/// Internal node with up to `FANOUT` slots stored inline.
///
/// Slots fill from the front; a missing slot `i` means every slot after it is
/// missing too.
#[derive(Clone, Debug)]
pub(crate) struct InternalNode<K, const FANOUT: usize> {
    slots: SmallVec<[Slot<K>; FANOUT]>,
}

impl<K, const FANOUT: usize> InternalNode<K, FANOUT> {
    pub(crate) fn new() -> Self {
        Self {
            slots: SmallVec::new(),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, key: K, child: ChildRef) {
        debug_assert!(self.len() < FANOUT, "internal node overflow");
        self.slots.push(Slot { key, child });
    }

    #[inline]
    pub(crate) fn slot(&self, i: usize) -> Option<&Slot<K>> {
        self.slots.get(i)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Separator of the first slot; the key this node is known by one level up.
    #[inline]
    pub(crate) fn first_key(&self) -> &K {
        &self.slots[0].key
    }
}

impl<K: Ord, const FANOUT: usize> InternalNode<K, FANOUT> {
    /// Child to follow when searching for the first record with key `>= key`.
    ///
    /// Picks the first slot whose successor is absent or has a separator
    /// `>= key`, falling back to the last slot. Never lands to the right of
    /// the lower bound, so a forward scan from the returned run finds it.
    pub(crate) fn descend(&self, key: &K) -> ChildRef {
        // The last slot has no successor to compare against; it is the fallback.
        for i in 0..FANOUT - 1 {
            match self.slot(i + 1) {
                None => return self.slots[i].child,
                Some(next) if *key <= next.key => return self.slots[i].child,
                Some(_) => {}
            }
        }
        self.slots[FANOUT - 1].child
    }
}
