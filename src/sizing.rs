//! Internal node sizing for static ISAM trees.

/// Number of internal nodes needed to index `leaf_nodes` leaf runs with the
/// given fanout.
///
/// Each internal level holds `ceil(previous / fanout)` nodes, starting from
/// the leaf run count, until a level of exactly one node (the root) is
/// reached. A single leaf run still gets a root node that points at it
/// directly; zero leaf runs need no nodes at all.
///
/// `fanout` must be at least 2, otherwise the level count never shrinks.
pub fn required_internal_nodes(leaf_nodes: usize, fanout: usize) -> usize {
    debug_assert!(fanout >= 2, "fanout must be at least 2");

    match leaf_nodes {
        0 => 0,
        1 => 1,
        _ => {
            let mut level = leaf_nodes.div_ceil(fanout);
            let mut total = level;
            while level > 1 {
                level = level.div_ceil(fanout);
                total += level;
            }
            total
        }
    }
}

/// Number of leaf runs of `fanout` records covering `records` records.
#[inline]
pub fn leaf_node_count(records: usize, fanout: usize) -> usize {
    records.div_ceil(fanout)
}
