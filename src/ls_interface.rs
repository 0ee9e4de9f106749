// raw instants come from the harness clock - milliseconds scale, never
// produced by this crate
pub type Timestamp = f64;

// chain block heights as reported by the observer
pub type BlockHeight = u64;

/// Decimal digits kept by the shared stat rounding, so summaries stay
/// comparable across runs
pub const STAT_PRECISION: i32 = 2;

/// Number of trailing blocks summarized in the per-stage shutdown window
pub const TRAILING_BLOCKS_WINDOW: usize = 100;

/// How the observer processed a block
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveMode {
    /// Block processed as new chain activity
    Live,

    /// Block replayed while the observer re-synced
    Catchup,
}

impl LiveMode {
    /// 0/1 encoding used by the summarizer, so the mean of a group is the
    /// fraction of blocks processed live
    pub fn as_sample(self) -> f64 {
        match self {
            LiveMode::Live => 1.0,
            LiveMode::Catchup => 0.0,
        }
    }
}

/// Errors surfaced by stats ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Block-completion payload without a block height
    MissingBlockHeight,

    /// Cycle payload without a task identity
    MissingCycleTask,
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::MissingBlockHeight => write!(f, "block data is missing a block height"),
            StatsError::MissingCycleTask => write!(f, "cycle data is missing a task identity"),
        }
    }
}

impl std::error::Error for StatsError {}

/// Raw block-completion payload as delivered by the chain observer.
///
/// Only the height is required at ingestion; every performance field is
/// optional and aggregated without interpretation.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlockData {
    pub block_height: Option<BlockHeight>,
    pub live_mode: Option<LiveMode>,

    /// Seconds between block timestamp and observation
    pub lag: Option<f64>,
    pub block_duration: Option<f64>,
    pub chain_block_duration: Option<f64>,
    pub idle_time: Option<f64>,
    pub cosmos_time: Option<f64>,
    pub swingset_time: Option<f64>,
    pub processing_time: Option<f64>,
    pub swingset_percentage: Option<f64>,
    pub processing_percentage: Option<f64>,
    pub deliveries: Option<u64>,
    pub computrons: Option<u64>,

    /// Whether the block landed before the stage's shutdown signal; absent
    /// when the observer does not track shutdown
    pub before_shutdown: Option<bool>,
}

/// Raw work-cycle payload as delivered by the load generator.
///
/// The same logical cycle may be reported several times as it progresses;
/// `task` plus `seq` identify it across reports.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CycleData {
    pub task: Option<String>,

    /// Attempt sequence within the task, 0 when the task runs one attempt
    /// at a time
    pub seq: Option<u64>,

    /// Unset while the cycle is still in flight
    pub success: Option<bool>,
    pub block_count: Option<u64>,
    pub duration: Option<f64>,
}

/// Caller-supplied data merged into a stage at construction
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageInitData {
    /// Position of the stage in the run
    pub stage_index: usize,

    /// Stage brings up the chain without client or load generator
    pub chain_only: bool,

    /// Configured stage duration in seconds, if bounded
    pub planned_duration: Option<f64>,
}
