//! Per-block statistics records and their summaries

use crate::ls_interface::{BlockData, BlockHeight, LiveMode, StatsError};
use crate::ls_summary::{summarize_field, FieldSummary, WeightedSample};

/// Statistics observed for a single block.
///
/// Immutable once constructed; owned by the stage's block collection.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockStats {
    pub block_height: BlockHeight,
    pub live_mode: Option<LiveMode>,
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
    pub before_shutdown: Option<bool>,
}

impl BlockStats {
    /// Build a record from a raw payload. A payload without a height is
    /// rejected, never silently defaulted.
    pub fn from_data(data: BlockData) -> Result<Self, StatsError> {
        let block_height = data.block_height.ok_or(StatsError::MissingBlockHeight)?;
        Ok(Self {
            block_height,
            live_mode: data.live_mode,
            lag: data.lag,
            block_duration: data.block_duration,
            chain_block_duration: data.chain_block_duration,
            idle_time: data.idle_time,
            cosmos_time: data.cosmos_time,
            swingset_time: data.swingset_time,
            processing_time: data.processing_time,
            swingset_percentage: data.swingset_percentage,
            processing_percentage: data.processing_percentage,
            deliveries: data.deliveries,
            computrons: data.computrons,
            before_shutdown: data.before_shutdown,
        })
    }

    /// Values fed to the summarizer for this block. The height feeds both
    /// range endpoints so a group's min/max describe the covered span, and
    /// live mode becomes 0/1 so its mean is the live fraction.
    pub fn summary_input(&self) -> BlockSummaryInput {
        BlockSummaryInput {
            live_mode: self.live_mode.map(LiveMode::as_sample),
            start_block_height: Some(self.block_height as f64),
            end_block_height: Some(self.block_height as f64),
            lag: self.lag,
            block_duration: self.block_duration,
            chain_block_duration: self.chain_block_duration,
            idle_time: self.idle_time,
            cosmos_time: self.cosmos_time,
            swingset_time: self.swingset_time,
            processing_time: self.processing_time,
            swingset_percentage: self.swingset_percentage,
            processing_percentage: self.processing_percentage,
            deliveries: self.deliveries.map(|count| count as f64),
            computrons: self.computrons.map(|count| count as f64),
        }
    }
}

/// Summarizer view of one block
#[derive(Debug, Clone, Default)]
pub struct BlockSummaryInput {
    pub live_mode: Option<f64>,
    pub start_block_height: Option<f64>,
    pub end_block_height: Option<f64>,
    pub lag: Option<f64>,
    pub block_duration: Option<f64>,
    pub chain_block_duration: Option<f64>,
    pub idle_time: Option<f64>,
    pub cosmos_time: Option<f64>,
    pub swingset_time: Option<f64>,
    pub processing_time: Option<f64>,
    pub swingset_percentage: Option<f64>,
    pub processing_percentage: Option<f64>,
    pub deliveries: Option<f64>,
    pub computrons: Option<f64>,
}

/// Weighted summary over a group of blocks, one entry per field that was
/// defined on at least one block
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockStatsSummary {
    /// Fraction of blocks processed live
    pub live_mode: Option<FieldSummary>,
    pub start_block_height: Option<FieldSummary>,
    pub end_block_height: Option<FieldSummary>,
    pub lag: Option<FieldSummary>,
    pub block_duration: Option<FieldSummary>,
    pub chain_block_duration: Option<FieldSummary>,
    pub idle_time: Option<FieldSummary>,
    pub cosmos_time: Option<FieldSummary>,
    pub swingset_time: Option<FieldSummary>,
    pub processing_time: Option<FieldSummary>,
    pub swingset_percentage: Option<FieldSummary>,
    pub processing_percentage: Option<FieldSummary>,
    pub deliveries: Option<FieldSummary>,
    pub computrons: Option<FieldSummary>,
}

/// Summarize a group of blocks with uniform weight. `None` for an empty
/// group, so absent groups stay distinguishable from all-zero ones.
pub fn summarize_blocks<'a>(
    blocks: impl IntoIterator<Item = &'a BlockStats>,
) -> Option<BlockStatsSummary> {
    let samples: Vec<WeightedSample<BlockSummaryInput>> = blocks
        .into_iter()
        .map(|block| WeightedSample {
            values: block.summary_input(),
            weight: 1.0,
        })
        .collect();
    if samples.is_empty() {
        return None;
    }
    Some(BlockStatsSummary {
        live_mode: summarize_field(&samples, |values| values.live_mode),
        start_block_height: summarize_field(&samples, |values| values.start_block_height),
        end_block_height: summarize_field(&samples, |values| values.end_block_height),
        lag: summarize_field(&samples, |values| values.lag),
        block_duration: summarize_field(&samples, |values| values.block_duration),
        chain_block_duration: summarize_field(&samples, |values| values.chain_block_duration),
        idle_time: summarize_field(&samples, |values| values.idle_time),
        cosmos_time: summarize_field(&samples, |values| values.cosmos_time),
        swingset_time: summarize_field(&samples, |values| values.swingset_time),
        processing_time: summarize_field(&samples, |values| values.processing_time),
        swingset_percentage: summarize_field(&samples, |values| values.swingset_percentage),
        processing_percentage: summarize_field(&samples, |values| values.processing_percentage),
        deliveries: summarize_field(&samples, |values| values.deliveries),
        computrons: summarize_field(&samples, |values| values.computrons),
    })
}
