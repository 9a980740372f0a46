//! # bsm-rs
//!
//! Incremental inserts over immutable, batch-built indexes using the
//! Bentley-Saxe static-to-dynamic transformation, plus a static in-memory
//! ISAM tree to run it over.
//!
//! Based on "Decomposable searching problems I: Static-to-dynamic
//! transformation" (J. Algorithms 1(4), 1980, Bentley & Saxe).
//!
//! ## Example
//!
//! ```rust
//! use bsm_rs::{BentleySaxe, IsamTree, RangeQuery};
//!
//! let mut index: BentleySaxe<IsamTree<(i64, u32)>> = BentleySaxe::mdsp();
//! for (i, key) in [40i64, 10, 30, 20].into_iter().enumerate() {
//!     index.insert((key, i as u32));
//! }
//!
//! let hits = index.query(&RangeQuery::new(15, 35));
//! assert_eq!(hits, vec![(20, 3), (30, 2)]);
//! assert_eq!(index.record_count(), 4);
//! ```
//!
//! ## Layout
//!
//! - [`IsamTree`]: static, array-backed index answering half-open range queries.
//! - [`BentleySaxe`]: binary-counter array of static levels, generic over any
//!   [`StaticStructure`].
//! - [`merge`] and [`sizing`]: the tagged k-way merge used for sorted rebuilds
//!   and the internal node sizing formula.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dynamize;
mod error;
pub mod isam;
pub mod merge;
mod record;
pub mod sizing;

pub use dynamize::{BentleySaxe, Config, MergeMode};
pub use error::{Error, Result};
pub use isam::IsamTree;
pub use record::{RangeQuery, Record, StaticStructure};

#[cfg(test)]
mod proptests;
