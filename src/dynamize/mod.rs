//! Bentley-Saxe static-to-dynamic transformation.
//!
//! A [`BentleySaxe`] keeps a vector of levels, each either empty or holding
//! one static structure. Level `i` holds exactly `2^i` records, so after `n`
//! inserts the occupied levels are the 1-bits of `n`. An insert behaves like
//! incrementing a binary counter: every occupied level below the first empty
//! one is torn down with `unbuild`, and its records are rebuilt, together
//! with the new record, into that empty level.
//!
//! Queries must be decomposable: each level is queried on its own and the
//! partial answers are folded with [`StaticStructure::query_merge`].
//!
//! For more information see:
//!
//! - J. L. Bentley and J. B. Saxe. Decomposable searching problems I:
//!   Static-to-dynamic transformation. J. Algorithms 1(4):301-358, 1980.

use crate::merge;
use crate::record::StaticStructure;

pub use crate::record::MergeMode;

/// Configuration for a [`BentleySaxe`] index.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Level merge strategy.
    pub mode: MergeMode,
    /// Number of level slots to reserve up front. Level `i` holds `2^i`
    /// records, so 32 slots cover about four billion records.
    pub initial_levels: usize,
}

impl Config {
    /// Default configuration in MDSP mode.
    pub fn mdsp() -> Self {
        Self {
            mode: MergeMode::Mdsp,
            ..Self::default()
        }
    }
}

/// Dynamized index over the static structure `S`.
pub struct BentleySaxe<S: StaticStructure> {
    levels: Vec<Option<S>>,
    config: Config,
}

impl<S: StaticStructure> BentleySaxe<S> {
    /// Create an empty index in standard mode.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty index in MDSP mode.
    pub fn mdsp() -> Self {
        Self::with_config(Config::mdsp())
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            levels: Vec::with_capacity(config.initial_levels),
            config,
        }
    }

    /// Merge strategy this index was created with.
    #[inline]
    pub fn mode(&self) -> MergeMode {
        self.config.mode
    }

    /// Insert one record.
    ///
    /// Amortized `O(log n)` rebuilds per insert; each record is moved
    /// `O(log n)` times over its lifetime.
    pub fn insert(&mut self, record: S::Record) {
        let mode = self.config.mode;
        let mut batch = vec![record];
        let mut runs: Vec<Vec<S::Record>> = Vec::new();

        // Tear down occupied levels up to the first empty one.
        let mut target = None;
        for (level, slot) in self.levels.iter_mut().enumerate() {
            let Some(structure) = slot.take() else {
                target = Some(level);
                break;
            };
            let records = structure.unbuild();
            tracing::trace!(
                target: "bsm::dynamize",
                level,
                records = records.len(),
                "merging level into insert batch"
            );
            match mode {
                MergeMode::Standard => batch.extend(records),
                MergeMode::Mdsp => runs.push(records),
            }
        }

        let structure = match mode {
            MergeMode::Standard => S::build(batch),
            MergeMode::Mdsp => {
                runs.insert(0, batch);
                S::build_presorted(merge::merge_sorted_runs(runs))
            }
        };

        match target {
            Some(level) => self.levels[level] = Some(structure),
            None => {
                tracing::debug!(
                    target: "bsm::dynamize",
                    level = self.levels.len(),
                    records = structure.record_count(),
                    "appending level"
                );
                self.levels.push(Some(structure));
            }
        }
    }

    /// Answer `query` over every occupied level.
    ///
    /// In [`MergeMode::Mdsp`] the result is sorted if the structure's
    /// per-level answers are.
    pub fn query(&self, query: &S::Query) -> Vec<S::Record> {
        let mode = self.config.mode;
        self.levels
            .iter()
            .flatten()
            .fold(Vec::new(), |acc, structure| {
                let partial = structure.query(Some(query));
                S::query_merge(acc, partial, query, mode)
            })
    }

    /// Total records across all levels. `O(log n)`.
    pub fn record_count(&self) -> usize {
        self.levels.iter().flatten().map(S::record_count).sum()
    }

    /// True when no level is occupied.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Option::is_none)
    }

    /// Number of level slots, occupied or not.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// `(level, record_count)` for every occupied level, lowest first.
    pub fn occupied_levels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .filter_map(|(level, slot)| slot.as_ref().map(|s| (level, s.record_count())))
    }

    /// Tear down every level and return all records.
    ///
    /// Sorted in MDSP mode; grouped by level otherwise.
    pub fn into_records(self) -> Vec<S::Record> {
        let runs: Vec<Vec<S::Record>> = self.levels.into_iter().flatten().map(S::unbuild).collect();
        match self.config.mode {
            MergeMode::Standard => runs.into_iter().flatten().collect(),
            MergeMode::Mdsp => merge::merge_sorted_runs(runs),
        }
    }
}

impl<S: StaticStructure> Default for BentleySaxe<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StaticStructure> Extend<S::Record> for BentleySaxe<S> {
    fn extend<I: IntoIterator<Item = S::Record>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<S: StaticStructure> FromIterator<S::Record> for BentleySaxe<S> {
    fn from_iter<I: IntoIterator<Item = S::Record>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<S: StaticStructure> std::fmt::Debug for BentleySaxe<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BentleySaxe")
            .field("mode", &self.config.mode)
            .field("levels", &self.occupied_levels().collect::<Vec<_>>())
            .finish()
    }
}
