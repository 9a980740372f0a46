use crate::dynamize::{BentleySaxe, Config, MergeMode};
use crate::isam::IsamTree;
use crate::record::RangeQuery;
use crate::sizing::{leaf_node_count, required_internal_nodes};

use proptest::prelude::*;
use proptest_derive::Arbitrary;

type Rec = (i16, u8);

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(i16, u8),
    Query(i16, i16),
}

fn model_query(model: &[Rec], lower: i16, upper: i16) -> Vec<Rec> {
    let mut hits: Vec<Rec> = model
        .iter()
        .filter(|r| r.0 >= lower && r.0 < upper)
        .copied()
        .collect();
    hits.sort_unstable();
    hits
}

/// Records drawn from a tiny key space so that runs of equal keys straddle
/// leaf runs and internal node boundaries.
fn dense_records() -> impl Strategy<Value = Vec<Rec>> {
    prop::collection::vec((0i16..8, any::<u8>()), 0..=400)
}

fn check_ops(mode: MergeMode, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut index: BentleySaxe<IsamTree<Rec, 4>> =
        BentleySaxe::with_config(Config { mode, ..Config::default() });
    let mut model: Vec<Rec> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                index.insert((key, value));
                model.push((key, value));
            }
            Op::Query(a, b) => {
                let q = RangeQuery::new(a, b);
                let mut got = index.query(&q);
                if mode == MergeMode::Standard {
                    got.sort_unstable();
                }
                prop_assert_eq!(got, model_query(&model, a, b));
            }
        }
        prop_assert_eq!(index.record_count(), model.len());
    }

    model.sort_unstable();
    let mut all = index.into_records();
    if mode == MergeMode::Standard {
        all.sort_unstable();
    }
    prop_assert_eq!(all, model);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_dynamized_equivalence_standard(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        check_ops(MergeMode::Standard, ops)?;
    }

    #[test]
    fn prop_dynamized_equivalence_mdsp(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        check_ops(MergeMode::Mdsp, ops)?;
    }

    #[test]
    fn prop_isam_range_query(records in prop::collection::vec(any::<Rec>(), 0..=2000), a in any::<i16>(), b in any::<i16>()) {
        let t: IsamTree<Rec, 8> = IsamTree::build(records.clone());
        prop_assert_eq!(t.record_count(), records.len());

        let leaves = leaf_node_count(records.len(), 8);
        prop_assert_eq!(t.internal_node_count(), required_internal_nodes(leaves, 8));

        let q = RangeQuery::new(a.min(b), a.max(b));
        prop_assert_eq!(t.query(Some(&q)), model_query(&records, q.lower_bound, q.upper_bound));

        let mut sorted = records;
        sorted.sort_unstable();
        prop_assert_eq!(t.unbuild(), sorted);
    }

    #[test]
    fn prop_lower_bound_with_duplicate_keys(records in dense_records(), key in -1i16..10) {
        let t: IsamTree<Rec, 2> = IsamTree::build(records);
        let expected = t.records().partition_point(|r| r.0 < key);
        prop_assert_eq!(t.lower_bound(&key), expected);

        let hits = t.query(Some(&RangeQuery::new(key, key + 1)));
        let count = t.records().iter().filter(|r| r.0 == key).count();
        prop_assert_eq!(hits.len(), count);
    }

    #[test]
    fn prop_level_sizes_are_powers_of_two(n in 0usize..=1500) {
        let mut index: BentleySaxe<IsamTree<Rec, 4>> = BentleySaxe::mdsp();
        for i in 0..n {
            index.insert(((i % 13) as i16, 0));
        }
        let mut total = 0;
        for (level, count) in index.occupied_levels() {
            prop_assert_eq!(count, 1usize << level);
            prop_assert!(n & (1 << level) != 0);
            total += count;
        }
        prop_assert_eq!(total, n);
    }
}

#[test]
fn exhaustive_small_builds_fanout_two() {
    // Every size up to 70 records, each searched at every key position.
    for n in 0..70i16 {
        let records: Vec<Rec> = (0..n).map(|i| (i * 2, 0)).collect();
        let t: IsamTree<Rec, 2> = IsamTree::build_presorted(records);
        for key in -1..=(n * 2) {
            let expected = t.records().partition_point(|r| r.0 < key);
            assert_eq!(t.lower_bound(&key), expected, "n={n} key={key}");
        }
    }
}
