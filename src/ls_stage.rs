//! Per-stage aggregation facade
//!
//! One [`StageStats`] instance tracks a single phase of a load-test run:
//! lifecycle timestamps, the per-block and per-cycle collections, and the
//! summaries materialized once when the stage ends. All mutation goes
//! through the enumerated recording methods; everything else is read-only.

use log::debug;

use crate::ls_block::{summarize_blocks, BlockStats, BlockStatsSummary};
use crate::ls_collection::{group_by, trailing, StatsCollection};
use crate::ls_cycle::{summarize_cycles, CycleKey, CycleSnapshot, CycleStats, CycleStatsSummary};
use crate::ls_interface::{
    BlockData, BlockHeight, CycleData, LiveMode, StageInitData, StatsError, Timestamp,
    TRAILING_BLOCKS_WINDOW,
};
use crate::ls_record::{WriteMulti, WriteOnce};
use crate::ls_summary::round_stat;

/// Grouping key for per-stage block summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSummaryScope {
    /// Every block of the stage
    All,

    /// Trailing window before shutdown (or overall, without shutdown info)
    Last100,

    /// Blocks processed as new chain activity
    OnlyLive,

    /// Blocks replayed during catch-up
    OnlyCatchup,
}

impl std::fmt::Display for BlockSummaryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BlockSummaryScope::All => "all",
            BlockSummaryScope::Last100 => "last100",
            BlockSummaryScope::OnlyLive => "only_live",
            BlockSummaryScope::OnlyCatchup => "only_catchup",
        };
        f.write_str(label)
    }
}

/// Grouping key for per-stage cycle summaries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CycleSummaryScope {
    /// Every cycle of the stage
    All,

    /// Cycles attributed to one task
    Task(String),
}

impl std::fmt::Display for CycleSummaryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleSummaryScope::All => f.write_str("all"),
            CycleSummaryScope::Task(task) => f.write_str(task),
        }
    }
}

impl serde::Serialize for CycleSummaryScope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CycleSummaryScope::All => serializer.serialize_str("all"),
            CycleSummaryScope::Task(task) => serializer.serialize_str(task),
        }
    }
}

pub type BlocksSummaries = StatsCollection<BlockSummaryScope, Option<BlockStatsSummary>>;
pub type CyclesSummaries = StatsCollection<CycleSummaryScope, Option<CycleStatsSummary>>;

/// Aggregated statistics for one stage of a run
#[derive(Debug, Clone, Default)]
pub struct StageStats {
    init: StageInitData,

    started_at: WriteOnce<Timestamp>,
    ready_at: WriteOnce<Timestamp>,
    shutdown_at: WriteOnce<Timestamp>,
    ended_at: WriteOnce<Timestamp>,
    chain_started_at: WriteOnce<Timestamp>,
    chain_ready_at: WriteOnce<Timestamp>,
    client_started_at: WriteOnce<Timestamp>,
    client_ready_at: WriteOnce<Timestamp>,
    loadgen_started_at: WriteOnce<Timestamp>,
    loadgen_ready_at: WriteOnce<Timestamp>,

    first_block_height: WriteOnce<BlockHeight>,
    last_block_height: WriteMulti<BlockHeight>,

    blocks: StatsCollection<BlockHeight, BlockStats>,
    cycles: StatsCollection<CycleKey, CycleStats>,

    blocks_summaries: WriteOnce<BlocksSummaries>,
    cycles_summaries: WriteOnce<CyclesSummaries>,
}

impl StageStats {
    pub fn new(init: StageInitData) -> Self {
        Self {
            init,
            ..Self::default()
        }
    }

    // ================================================================
    // Lifecycle timestamps, all write-once and replay-tolerant
    // ================================================================

    pub fn record_start(&mut self, time: Timestamp) {
        self.started_at.set(time);
    }

    pub fn record_ready(&mut self, time: Timestamp) {
        self.ready_at.set(time);
    }

    pub fn record_shutdown(&mut self, time: Timestamp) {
        self.shutdown_at.set(time);
    }

    pub fn record_chain_start(&mut self, time: Timestamp) {
        self.chain_started_at.set(time);
    }

    pub fn record_chain_ready(&mut self, time: Timestamp) {
        self.chain_ready_at.set(time);
    }

    pub fn record_client_start(&mut self, time: Timestamp) {
        self.client_started_at.set(time);
    }

    pub fn record_client_ready(&mut self, time: Timestamp) {
        self.client_ready_at.set(time);
    }

    pub fn record_loadgen_start(&mut self, time: Timestamp) {
        self.loadgen_started_at.set(time);
    }

    pub fn record_loadgen_ready(&mut self, time: Timestamp) {
        self.loadgen_ready_at.set(time);
    }

    /// End the stage and materialize the block/cycle summaries from the
    /// collections as they stand. Only the first call is productive; later
    /// calls change nothing and never recompute.
    pub fn record_end(&mut self, time: Timestamp) {
        if !self.ended_at.set(time) {
            return;
        }

        if self.cycles.count() > 0 {
            let summaries = self.build_cycles_summaries();
            self.cycles_summaries.set(summaries);
        }
        if self.blocks.count() > 0 {
            let summaries = self.build_blocks_summaries();
            self.blocks_summaries.set(summaries);
        }

        debug!(
            "stage {} ended: {} blocks, {} cycles",
            self.init.stage_index,
            self.blocks.count(),
            self.cycles.count()
        );
    }

    // ================================================================
    // Ingestion
    // ================================================================

    /// Ingest a block-completion payload. The first block pins
    /// `first_block_height`; every block updates `last_block_height`.
    pub fn new_block(&mut self, data: BlockData) -> Result<&BlockStats, StatsError> {
        let block = BlockStats::from_data(data)?;
        let height = block.block_height;

        if self.blocks.is_empty() {
            self.first_block_height.set(height);
        }
        self.last_block_height.set(height);

        Ok(self.blocks.insert(height, block))
    }

    /// Resolve the cycle record for a payload, constructing it on first
    /// sight. Repeated calls with the same identity return the same record;
    /// the payload's progress fields are only applied on construction, as
    /// callers advance an existing record through its own methods.
    pub fn get_or_make_cycle(&mut self, data: CycleData) -> Result<&mut CycleStats, StatsError> {
        let CycleData {
            task,
            seq,
            success,
            block_count,
            duration,
        } = data;
        let task = task.ok_or(StatsError::MissingCycleTask)?;
        let seq = seq.unwrap_or(0);
        let key = CycleKey::derive(&task, seq);

        Ok(self.cycles.get_or_make(key, || {
            CycleStats::from_fields(task, seq, success, block_count, duration)
        }))
    }

    // ================================================================
    // Summary materialization
    // ================================================================

    fn build_cycles_summaries(&self) -> CyclesSummaries {
        let all: Vec<&CycleStats> = self.cycles.values().collect();

        let mut summaries = CyclesSummaries::new();
        summaries.insert(
            CycleSummaryScope::All,
            summarize_cycles(all.iter().copied()),
        );
        for (task, task_cycles) in group_by(all.iter().copied(), |cycle| cycle.task().to_string())
        {
            summaries.insert(
                CycleSummaryScope::Task(task),
                summarize_cycles(task_cycles),
            );
        }
        summaries
    }

    fn build_blocks_summaries(&self) -> BlocksSummaries {
        let all: Vec<&BlockStats> = self.blocks.values().collect();

        let mut summaries = BlocksSummaries::new();
        summaries.insert(BlockSummaryScope::All, summarize_blocks(all.iter().copied()));

        // trailing window: blocks flagged as pre-shutdown when any block
        // carries the flag, the plain tail otherwise
        let has_shutdown_info = all.iter().any(|block| block.before_shutdown.is_some());
        let pre_shutdown: Vec<&BlockStats> = all
            .iter()
            .copied()
            .filter(|block| !has_shutdown_info || block.before_shutdown == Some(true))
            .collect();
        let window = trailing(&pre_shutdown, TRAILING_BLOCKS_WINDOW);
        summaries.insert(
            BlockSummaryScope::Last100,
            summarize_blocks(window.iter().copied()),
        );

        let by_live_mode = group_by(all.iter().copied(), |block| block.live_mode);
        summaries.insert(
            BlockSummaryScope::OnlyLive,
            summarize_blocks(
                by_live_mode
                    .get(&Some(LiveMode::Live))
                    .into_iter()
                    .flatten()
                    .copied(),
            ),
        );
        summaries.insert(
            BlockSummaryScope::OnlyCatchup,
            summarize_blocks(
                by_live_mode
                    .get(&Some(LiveMode::Catchup))
                    .into_iter()
                    .flatten()
                    .copied(),
            ),
        );
        summaries
    }

    // ================================================================
    // Read access
    // ================================================================

    pub fn init(&self) -> &StageInitData {
        &self.init
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at.value()
    }

    pub fn ready_at(&self) -> Option<Timestamp> {
        self.ready_at.value()
    }

    pub fn shutdown_at(&self) -> Option<Timestamp> {
        self.shutdown_at.value()
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at.value()
    }

    pub fn chain_started_at(&self) -> Option<Timestamp> {
        self.chain_started_at.value()
    }

    pub fn chain_ready_at(&self) -> Option<Timestamp> {
        self.chain_ready_at.value()
    }

    pub fn client_started_at(&self) -> Option<Timestamp> {
        self.client_started_at.value()
    }

    pub fn client_ready_at(&self) -> Option<Timestamp> {
        self.client_ready_at.value()
    }

    pub fn loadgen_started_at(&self) -> Option<Timestamp> {
        self.loadgen_started_at.value()
    }

    pub fn loadgen_ready_at(&self) -> Option<Timestamp> {
        self.loadgen_ready_at.value()
    }

    pub fn first_block_height(&self) -> Option<BlockHeight> {
        self.first_block_height.value()
    }

    pub fn last_block_height(&self) -> Option<BlockHeight> {
        self.last_block_height.value()
    }

    pub fn blocks(&self) -> &StatsCollection<BlockHeight, BlockStats> {
        &self.blocks
    }

    pub fn cycles(&self) -> &StatsCollection<CycleKey, CycleStats> {
        &self.cycles
    }

    pub fn block_count(&self) -> usize {
        self.blocks.count()
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.count()
    }

    /// Unset until `record_end` ran with at least one block recorded
    pub fn blocks_summaries(&self) -> Option<&BlocksSummaries> {
        self.blocks_summaries.get()
    }

    /// Unset until `record_end` ran with at least one cycle recorded
    pub fn cycles_summaries(&self) -> Option<&CyclesSummaries> {
        self.cycles_summaries.get()
    }

    // Derived durations, lazy and guarded: `None` unless both endpoints
    // are recorded, never NaN

    pub fn ready_duration(&self) -> Option<f64> {
        guarded_duration(self.started_at(), self.ready_at())
    }

    pub fn duration(&self) -> Option<f64> {
        guarded_duration(self.started_at(), self.ended_at())
    }

    pub fn chain_init_duration(&self) -> Option<f64> {
        guarded_duration(self.chain_started_at(), self.chain_ready_at())
    }

    pub fn client_init_duration(&self) -> Option<f64> {
        guarded_duration(self.client_started_at(), self.client_ready_at())
    }

    pub fn loadgen_init_duration(&self) -> Option<f64> {
        guarded_duration(self.loadgen_started_at(), self.loadgen_ready_at())
    }

    /// Plain-data copy of the whole facade for the reporting layer
    pub fn snapshot(&self) -> StageSnapshot {
        let mut cycles = StatsCollection::new();
        for (key, cycle) in self.cycles.iter() {
            cycles.insert(key.clone(), cycle.snapshot());
        }
        StageSnapshot {
            stage_index: self.init.stage_index,
            chain_only: self.init.chain_only,
            planned_duration: self.init.planned_duration,
            started_at: self.started_at(),
            ready_at: self.ready_at(),
            shutdown_at: self.shutdown_at(),
            ended_at: self.ended_at(),
            chain_started_at: self.chain_started_at(),
            chain_ready_at: self.chain_ready_at(),
            client_started_at: self.client_started_at(),
            client_ready_at: self.client_ready_at(),
            loadgen_started_at: self.loadgen_started_at(),
            loadgen_ready_at: self.loadgen_ready_at(),
            first_block_height: self.first_block_height(),
            last_block_height: self.last_block_height(),
            block_count: self.block_count(),
            cycle_count: self.cycle_count(),
            ready_duration: self.ready_duration(),
            duration: self.duration(),
            chain_init_duration: self.chain_init_duration(),
            client_init_duration: self.client_init_duration(),
            loadgen_init_duration: self.loadgen_init_duration(),
            blocks: self.blocks.clone(),
            cycles,
            blocks_summaries: self.blocks_summaries.get().cloned(),
            cycles_summaries: self.cycles_summaries.get().cloned(),
        }
    }
}

/// Difference between two optional instants, rounded. Never subtracts
/// through a missing endpoint.
fn guarded_duration(start: Option<Timestamp>, end: Option<Timestamp>) -> Option<f64> {
    match (start, end) {
        (Some(start), Some(end)) => Some(round_stat(end - start)),
        _ => None,
    }
}

/// Deeply-owned, serializable projection of a [`StageStats`]
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageSnapshot {
    pub stage_index: usize,
    pub chain_only: bool,
    pub planned_duration: Option<f64>,

    pub started_at: Option<Timestamp>,
    pub ready_at: Option<Timestamp>,
    pub shutdown_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub chain_started_at: Option<Timestamp>,
    pub chain_ready_at: Option<Timestamp>,
    pub client_started_at: Option<Timestamp>,
    pub client_ready_at: Option<Timestamp>,
    pub loadgen_started_at: Option<Timestamp>,
    pub loadgen_ready_at: Option<Timestamp>,

    pub first_block_height: Option<BlockHeight>,
    pub last_block_height: Option<BlockHeight>,
    pub block_count: usize,
    pub cycle_count: usize,

    pub ready_duration: Option<f64>,
    pub duration: Option<f64>,
    pub chain_init_duration: Option<f64>,
    pub client_init_duration: Option<f64>,
    pub loadgen_init_duration: Option<f64>,

    pub blocks: StatsCollection<BlockHeight, BlockStats>,
    pub cycles: StatsCollection<CycleKey, CycleSnapshot>,
    pub blocks_summaries: Option<BlocksSummaries>,
    pub cycles_summaries: Option<CyclesSummaries>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> StageStats {
        StageStats::new(StageInitData {
            stage_index: 2,
            chain_only: false,
            planned_duration: Some(360.0),
        })
    }

    fn block_data(height: BlockHeight, live: bool) -> BlockData {
        BlockData {
            block_height: Some(height),
            live_mode: Some(if live { LiveMode::Live } else { LiveMode::Catchup }),
            lag: Some(1.5),
            deliveries: Some(4),
            ..BlockData::default()
        }
    }

    fn cycle_data(task: &str, seq: u64) -> CycleData {
        CycleData {
            task: Some(task.to_string()),
            seq: Some(seq),
            ..CycleData::default()
        }
    }

    #[test]
    fn test_first_and_last_block_height() {
        let mut stage = stage();
        assert_eq!(stage.first_block_height(), None);
        assert_eq!(stage.last_block_height(), None);

        stage.new_block(block_data(100, true)).unwrap();
        stage.new_block(block_data(101, true)).unwrap();
        // lower height still overwrites the last height
        stage.new_block(block_data(90, true)).unwrap();

        assert_eq!(stage.first_block_height(), Some(100));
        assert_eq!(stage.last_block_height(), Some(90));
        assert_eq!(stage.block_count(), 3);
    }

    #[test]
    fn test_new_block_requires_height() {
        let mut stage = stage();
        stage.new_block(block_data(7, true)).unwrap();

        let result = stage.new_block(BlockData::default());
        assert_eq!(result.unwrap_err(), StatsError::MissingBlockHeight);
        // the failed call corrupts nothing
        assert_eq!(stage.block_count(), 1);
        assert_eq!(stage.first_block_height(), Some(7));
        assert_eq!(stage.last_block_height(), Some(7));
    }

    #[test]
    fn test_get_or_make_cycle_is_idempotent() {
        let mut stage = stage();

        stage
            .get_or_make_cycle(cycle_data("vault", 1))
            .unwrap()
            .record_block_count(3);
        // same identity resolves to the same record
        let cycle = stage.get_or_make_cycle(cycle_data("vault", 1)).unwrap();
        assert_eq!(cycle.block_count(), Some(3));
        assert_eq!(stage.cycle_count(), 1);

        stage.get_or_make_cycle(cycle_data("vault", 2)).unwrap();
        stage.get_or_make_cycle(cycle_data("amm", 1)).unwrap();
        assert_eq!(stage.cycle_count(), 3);
    }

    #[test]
    fn test_get_or_make_cycle_requires_task() {
        let mut stage = stage();
        let result = stage.get_or_make_cycle(CycleData::default());
        assert_eq!(result.unwrap_err(), StatsError::MissingCycleTask);
        assert_eq!(stage.cycle_count(), 0);
    }

    #[test]
    fn test_timestamps_are_write_once() {
        let mut stage = stage();
        stage.record_start(1000.0);
        stage.record_start(2000.0);
        assert_eq!(stage.started_at(), Some(1000.0));

        stage.record_chain_start(1100.0);
        stage.record_chain_start(1300.0);
        assert_eq!(stage.chain_started_at(), Some(1100.0));
    }

    #[test]
    fn test_durations_are_guarded() {
        let mut stage = stage();
        assert_eq!(stage.ready_duration(), None);
        assert_eq!(stage.duration(), None);
        assert_eq!(stage.chain_init_duration(), None);
        assert_eq!(stage.client_init_duration(), None);
        assert_eq!(stage.loadgen_init_duration(), None);

        stage.record_start(1000.0);
        assert_eq!(stage.ready_duration(), None);
        stage.record_ready(1500.125);
        assert_eq!(stage.ready_duration(), Some(500.13));

        stage.record_chain_start(1000.0);
        stage.record_chain_ready(1250.0);
        assert_eq!(stage.chain_init_duration(), Some(250.0));

        stage.record_end(3000.0);
        assert_eq!(stage.duration(), Some(2000.0));
    }

    #[test]
    fn test_record_end_without_samples_leaves_summaries_unset() {
        let mut stage = stage();
        stage.record_end(500.0);
        assert!(stage.blocks_summaries().is_none());
        assert!(stage.cycles_summaries().is_none());
    }

    #[test]
    fn test_record_end_is_not_recomputed() {
        let mut stage = stage();
        stage.new_block(block_data(1, true)).unwrap();
        stage.record_end(100.0);

        let first = stage
            .blocks_summaries()
            .unwrap()
            .get(&BlockSummaryScope::All)
            .unwrap()
            .clone()
            .unwrap();
        assert_eq!(first.start_block_height.unwrap().items, 1);

        // later inserts plus a replayed end must not change the summaries
        stage.new_block(block_data(2, true)).unwrap();
        stage.record_end(200.0);
        assert_eq!(stage.ended_at(), Some(100.0));
        let replayed = stage
            .blocks_summaries()
            .unwrap()
            .get(&BlockSummaryScope::All)
            .unwrap()
            .clone()
            .unwrap();
        assert_eq!(replayed.start_block_height.unwrap().items, 1);
    }

    #[test]
    fn test_cycles_summaries_grouped_by_task() {
        let mut stage = stage();
        for (task, seq, success, duration) in [
            ("a", 0, Some(true), Some(10.0)),
            ("a", 1, Some(false), Some(20.0)),
            ("b", 0, Some(true), Some(5.0)),
        ] {
            let cycle = stage.get_or_make_cycle(cycle_data(task, seq)).unwrap();
            if let Some(success) = success {
                cycle.record_success(success);
            }
            if let Some(duration) = duration {
                cycle.record_duration(duration);
            }
        }
        // a fourth cycle still in flight is excluded from every summary
        stage.get_or_make_cycle(cycle_data("b", 1)).unwrap();

        stage.record_end(1000.0);
        let summaries = stage.cycles_summaries().unwrap();

        let all = summaries
            .get(&CycleSummaryScope::All)
            .unwrap()
            .as_ref()
            .unwrap();
        assert_eq!(all.success.unwrap().items, 3);
        assert_eq!(all.duration.unwrap().average, 11.67);

        let task_a = summaries
            .get(&CycleSummaryScope::Task("a".to_string()))
            .unwrap()
            .as_ref()
            .unwrap();
        assert_eq!(task_a.success.unwrap().average, 0.5);
        assert_eq!(task_a.duration.unwrap().average, 15.0);

        let task_b = summaries
            .get(&CycleSummaryScope::Task("b".to_string()))
            .unwrap()
            .as_ref()
            .unwrap();
        assert_eq!(task_b.success.unwrap().items, 1);
        assert_eq!(task_b.success.unwrap().average, 1.0);
    }

    #[test]
    fn test_blocks_summaries_live_and_catchup() {
        let mut stage = stage();
        for height in 1..=4u64 {
            stage.new_block(block_data(height, height > 2)).unwrap();
        }
        stage.record_end(1000.0);
        let summaries = stage.blocks_summaries().unwrap();

        let live = summaries
            .get(&BlockSummaryScope::OnlyLive)
            .unwrap()
            .as_ref()
            .unwrap();
        assert_eq!(live.start_block_height.unwrap().items, 2);
        assert_eq!(live.start_block_height.unwrap().min, 3.0);

        let catchup = summaries
            .get(&BlockSummaryScope::OnlyCatchup)
            .unwrap()
            .as_ref()
            .unwrap();
        assert_eq!(catchup.end_block_height.unwrap().max, 2.0);
    }

    #[test]
    fn test_all_live_blocks_leave_catchup_group_empty() {
        let mut stage = stage();
        stage.new_block(block_data(1, true)).unwrap();
        stage.record_end(1000.0);
        let summaries = stage.blocks_summaries().unwrap();
        // the group key is present with no summary behind it
        assert!(summaries
            .get(&BlockSummaryScope::OnlyCatchup)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_last100_uses_shutdown_flags() {
        let mut stage = stage();
        for height in 1..=150u64 {
            let mut data = block_data(height, true);
            data.before_shutdown = Some(height > 50);
            stage.new_block(data).unwrap();
        }
        stage.record_end(1000.0);

        let summaries = stage.blocks_summaries().unwrap();
        let window = summaries
            .get(&BlockSummaryScope::Last100)
            .unwrap()
            .as_ref()
            .unwrap();
        let heights = window.start_block_height.unwrap();
        assert_eq!(heights.items, 100);
        assert_eq!(heights.min, 51.0);
        assert_eq!(window.end_block_height.unwrap().max, 150.0);
    }

    #[test]
    fn test_last100_without_shutdown_info() {
        let mut stage = stage();
        for height in 1..=150u64 {
            stage.new_block(block_data(height, true)).unwrap();
        }
        stage.record_end(1000.0);

        let summaries = stage.blocks_summaries().unwrap();
        let window = summaries
            .get(&BlockSummaryScope::Last100)
            .unwrap()
            .as_ref()
            .unwrap();
        let heights = window.start_block_height.unwrap();
        assert_eq!(heights.items, 100);
        // plain tail of the insertion order
        assert_eq!(heights.min, 51.0);
        assert_eq!(heights.max, 150.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut stage = stage();
        stage.record_start(1.0);
        stage.new_block(block_data(5, true)).unwrap();
        stage.record_end(2.0);

        let yaml = serde_yaml::to_string(&stage.snapshot()).unwrap();
        assert!(yaml.contains("block_count: 1"));
        // summary scopes serialize as plain string keys
        assert!(yaml.contains("all:"));
        assert!(yaml.contains("only_live:"));
    }

    #[test]
    fn test_snapshot_reflects_facade() {
        let mut stage = stage();
        stage.record_start(100.0);
        stage.record_ready(150.0);
        stage.new_block(block_data(5, true)).unwrap();
        let cycle = stage.get_or_make_cycle(cycle_data("vault", 0)).unwrap();
        cycle.record_success(true);
        stage.record_end(400.0);

        let snapshot = stage.snapshot();
        assert_eq!(snapshot.stage_index, 2);
        assert_eq!(snapshot.block_count, 1);
        assert_eq!(snapshot.cycle_count, 1);
        assert_eq!(snapshot.ready_duration, Some(50.0));
        assert_eq!(snapshot.duration, Some(300.0));
        assert_eq!(snapshot.first_block_height, Some(5));
        assert!(snapshot.blocks_summaries.is_some());
        assert_eq!(
            snapshot.cycles.get(&CycleKey::derive("vault", 0)).unwrap().success,
            Some(true)
        );
    }
}
