//! # lsRust - Load-Test Run Statistics
//!
//! A Rust implementation of the run-statistics engine for a blockchain
//! load-test harness. The harness observes a chain under synthetic load and
//! feeds this crate per-block and per-work-cycle performance samples; the
//! engine indexes them incrementally and computes weighted summaries sliced
//! by liveness mode, task identity, and the trailing window before shutdown.
//!
//! ## Core Components
//!
//! - **StageStats**: per-stage facade recording lifecycle timestamps,
//!   ingesting block/cycle samples, and materializing summaries at stage end
//! - **BlockStats / CycleStats**: the per-entity records and their
//!   summarizer transforms
//! - **StatsCollection**: insertion-ordered keyed storage with get-or-create
//!   semantics
//! - **Summarizer**: per-field weighted means with range tracking
//!
//! ## Usage with a Harness
//!
//! This library performs no I/O and drives nothing. You need to:
//! 1. Create a `StageStats` per stage of your run
//! 2. Call the `record_*` lifecycle setters as milestones are reached
//! 3. Feed `new_block` / `get_or_make_cycle` as observer events arrive
//! 4. Call `record_end` once at stage conclusion, then read the summaries
//!
//! ```
//! use ls_rust::{BlockData, StageInitData, StageStats};
//!
//! let mut stage = StageStats::new(StageInitData::default());
//! stage.record_start(1000.0);
//! stage.new_block(BlockData {
//!     block_height: Some(42),
//!     ..BlockData::default()
//! })?;
//! stage.record_end(2000.0);
//! assert_eq!(stage.first_block_height(), Some(42));
//! # Ok::<(), ls_rust::StatsError>(())
//! ```
//!
//! Lifecycle signals may be delivered more than once; every write-once
//! field silently ignores replays. Nothing here is fatal to the owning
//! process: a malformed event fails its one call and corrupts no state.
//!
//! ## Testing and Simulation
//!
//! For exercising the engine without a real chain, see the separate
//! simulator in `simulator/`. It drives synthetic runs from seeded
//! scenario configurations and reports the resulting stage snapshots.

// Core stats modules
pub mod ls_block;
pub mod ls_collection;
pub mod ls_cycle;
pub mod ls_interface;
pub mod ls_record;
pub mod ls_stage;
pub mod ls_summary;

// Re-export commonly used types
pub use ls_block::{summarize_blocks, BlockStats, BlockStatsSummary};
pub use ls_collection::{group_by, trailing, StatsCollection};
pub use ls_cycle::{summarize_cycles, CycleKey, CycleSnapshot, CycleStats, CycleStatsSummary};
pub use ls_interface::{
    BlockData, BlockHeight, CycleData, LiveMode, StageInitData, StatsError, Timestamp,
    STAT_PRECISION, TRAILING_BLOCKS_WINDOW,
};
pub use ls_record::{WriteMulti, WriteOnce};
pub use ls_stage::{
    BlockSummaryScope, BlocksSummaries, CycleSummaryScope, CyclesSummaries, StageSnapshot,
    StageStats,
};
pub use ls_summary::{round_stat, summarize_field, FieldAccumulator, FieldSummary, WeightedSample};
