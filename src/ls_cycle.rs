//! Per-cycle statistics records, keys, and summaries

use crate::ls_interface::{CycleData, StatsError};
use crate::ls_record::{WriteMulti, WriteOnce};
use crate::ls_summary::{summarize_field, FieldSummary, WeightedSample};

/// Collection key for a cycle, derived from its identifying fields.
///
/// Deterministic: repeated events describing the same logical cycle always
/// resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct CycleKey(String);

impl CycleKey {
    pub fn derive(task: &str, seq: u64) -> Self {
        CycleKey(format!("{task}#{seq}"))
    }

    /// Key for a raw payload, failing when the task identity is absent
    pub fn from_data(data: &CycleData) -> Result<Self, StatsError> {
        let task = data.task.as_deref().ok_or(StatsError::MissingCycleTask)?;
        Ok(Self::derive(task, data.seq.unwrap_or(0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CycleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statistics for one work cycle of a named task.
///
/// The identity is fixed at construction; progress fields are guarded so
/// replayed completion reports cannot rewrite a concluded cycle, while the
/// running block count tracks the latest report.
#[derive(Debug, Clone)]
pub struct CycleStats {
    task: String,
    seq: u64,
    success: WriteOnce<bool>,
    block_count: WriteMulti<u64>,
    duration: WriteOnce<f64>,
}

impl CycleStats {
    /// Build a record from a raw payload. A payload without a task identity
    /// is rejected.
    pub fn from_data(data: CycleData) -> Result<Self, StatsError> {
        let CycleData {
            task,
            seq,
            success,
            block_count,
            duration,
        } = data;
        let task = task.ok_or(StatsError::MissingCycleTask)?;
        Ok(Self::from_fields(
            task,
            seq.unwrap_or(0),
            success,
            block_count,
            duration,
        ))
    }

    pub(crate) fn from_fields(
        task: String,
        seq: u64,
        success: Option<bool>,
        block_count: Option<u64>,
        duration: Option<f64>,
    ) -> Self {
        let mut stats = Self {
            task,
            seq,
            success: WriteOnce::new(),
            block_count: WriteMulti::new(),
            duration: WriteOnce::new(),
        };
        if let Some(success) = success {
            stats.success.set(success);
        }
        if let Some(count) = block_count {
            stats.block_count.set(count);
        }
        if let Some(duration) = duration {
            stats.duration.set(duration);
        }
        stats
    }

    pub fn key(&self) -> CycleKey {
        CycleKey::derive(&self.task, self.seq)
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Unset while the cycle is still in flight
    pub fn success(&self) -> Option<bool> {
        self.success.value()
    }

    pub fn block_count(&self) -> Option<u64> {
        self.block_count.value()
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration.value()
    }

    /// Record the cycle outcome. Write-once: a replayed outcome is ignored
    /// and the return value reports whether this call concluded the cycle.
    pub fn record_success(&mut self, success: bool) -> bool {
        self.success.set(success)
    }

    /// Latest number of blocks the cycle has spanned
    pub fn record_block_count(&mut self, count: u64) {
        self.block_count.set(count);
    }

    /// Record the concluded cycle's duration, write-once
    pub fn record_duration(&mut self, duration: f64) -> bool {
        self.duration.set(duration)
    }

    /// Whether the cycle has concluded, successfully or not
    pub fn is_concluded(&self) -> bool {
        self.success.is_set()
    }

    /// Values fed to the summarizer, or `None` for a cycle still in
    /// flight. Concluded cycles default missing counts to zero.
    pub fn summary_input(&self) -> Option<CycleSummaryInput> {
        let success = self.success()?;
        Some(CycleSummaryInput {
            success: if success { 1.0 } else { 0.0 },
            block_count: self.block_count().unwrap_or(0) as f64,
            duration: self.duration().unwrap_or(0.0),
        })
    }

    /// Plain-data copy for reporting
    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            task: self.task.clone(),
            seq: self.seq,
            success: self.success(),
            block_count: self.block_count(),
            duration: self.duration(),
        }
    }
}

/// Summarizer view of one concluded cycle
#[derive(Debug, Clone, Copy)]
pub struct CycleSummaryInput {
    pub success: f64,
    pub block_count: f64,
    pub duration: f64,
}

/// Serializable copy of a cycle record
#[derive(Debug, Clone, serde::Serialize)]
pub struct CycleSnapshot {
    pub task: String,
    pub seq: u64,
    pub success: Option<bool>,
    pub block_count: Option<u64>,
    pub duration: Option<f64>,
}

/// Weighted summary over the concluded cycles of a group
#[derive(Debug, Clone, serde::Serialize)]
pub struct CycleStatsSummary {
    /// Fraction of concluded cycles that succeeded
    pub success: Option<FieldSummary>,
    pub block_count: Option<FieldSummary>,
    pub duration: Option<FieldSummary>,
}

/// Summarize a group of cycles with uniform weight. In-flight cycles are
/// excluded; `None` when no cycle in the group has concluded.
pub fn summarize_cycles<'a>(
    cycles: impl IntoIterator<Item = &'a CycleStats>,
) -> Option<CycleStatsSummary> {
    let samples: Vec<WeightedSample<CycleSummaryInput>> = cycles
        .into_iter()
        .filter_map(CycleStats::summary_input)
        .map(|values| WeightedSample {
            values,
            weight: 1.0,
        })
        .collect();
    if samples.is_empty() {
        return None;
    }
    Some(CycleStatsSummary {
        success: summarize_field(&samples, |values| Some(values.success)),
        block_count: summarize_field(&samples, |values| Some(values.block_count)),
        duration: summarize_field(&samples, |values| Some(values.duration)),
    })
}
