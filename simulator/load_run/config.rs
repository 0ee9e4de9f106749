//! Configuration for the synthetic load-run simulator

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration for one synthetic run
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct LoadRunConfig {
    /// Stage profiles executed in order
    pub stages: Vec<StageProfile>,

    /// Random seed (None = generate random)
    pub seed: Option<[u8; 32]>,

    /// Mean milliseconds between observed blocks
    pub block_interval_ms: f64,
}

impl Default for LoadRunConfig {
    fn default() -> Self {
        Self {
            stages: vec![
                // chain bring-up, observer re-syncing part of the way
                StageProfile {
                    blocks: 40,
                    catchup_blocks: 25,
                    chain_only: true,
                    track_shutdown: false,
                    planned_duration: None,
                    tasks: Vec::new(),
                },
                // full load stage
                StageProfile::default(),
                // wind-down without load
                StageProfile {
                    blocks: 30,
                    catchup_blocks: 0,
                    chain_only: true,
                    track_shutdown: true,
                    planned_duration: None,
                    tasks: Vec::new(),
                },
            ],
            seed: None,
            block_interval_ms: 6000.0,
        }
    }
}

impl LoadRunConfig {
    /// Get or generate seed
    pub fn resolve_seed(&self) -> [u8; 32] {
        self.seed.unwrap_or_else(|| {
            let mut temp_rng = StdRng::from_entropy();
            let mut seed = [0u8; 32];
            use rand::RngCore;
            temp_rng.fill_bytes(&mut seed);
            seed
        })
    }
}

/// Profile of one stage of the run
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct StageProfile {
    /// Blocks observed during the stage
    pub blocks: usize,

    /// Leading blocks replayed in catch-up mode
    pub catchup_blocks: usize,

    /// Chain-only stage: no client, no load generator, no cycles
    pub chain_only: bool,

    /// Stamp blocks with shutdown tracking and signal a shutdown near the
    /// end of the stage
    pub track_shutdown: bool,

    /// Configured stage duration in seconds, if bounded
    pub planned_duration: Option<f64>,

    /// Load-generation task mix
    pub tasks: Vec<TaskProfile>,
}

impl Default for StageProfile {
    fn default() -> Self {
        Self {
            blocks: 150,
            catchup_blocks: 0,
            chain_only: false,
            track_shutdown: true,
            planned_duration: Some(900.0),
            tasks: vec![
                TaskProfile {
                    name: "vault".to_string(),
                    start_every_blocks: 4,
                    cycle_block_span: 3,
                    failure_rate: 0.05,
                },
                TaskProfile {
                    name: "amm".to_string(),
                    start_every_blocks: 6,
                    cycle_block_span: 2,
                    failure_rate: 0.1,
                },
            ],
        }
    }
}

/// One load-generation task driven during a stage
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TaskProfile {
    pub name: String,

    /// Start a new cycle every N live blocks (when none is in flight)
    pub start_every_blocks: usize,

    /// Live blocks a cycle spans before concluding
    pub cycle_block_span: usize,

    /// Probability that a concluded cycle failed
    pub failure_rate: f64,
}
