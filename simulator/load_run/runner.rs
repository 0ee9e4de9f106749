//! Synthetic load-run simulation runner
//!
//! Drives one `StageStats` per configured stage through a plausible
//! lifecycle: component bring-up, a catch-up prefix, live blocks, cycles
//! spanning blocks, shutdown flagging, and end-of-stage summarization.

use super::config::{LoadRunConfig, StageProfile};
use super::report::RunReport;
use hashbrown::HashMap;
use log::info;
use ls_rust::{BlockData, BlockHeight, CycleData, LiveMode, StageInitData, StageStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// In-flight cycle bookkeeping for one task
struct ActiveCycle {
    seq: u64,
    started_at: f64,
    blocks_seen: usize,
}

/// Synthetic run driver
pub struct LoadRunRunner {
    config: LoadRunConfig,
    rng: StdRng,
    seed: [u8; 32],

    /// Simulated wall clock in milliseconds
    clock_ms: f64,

    /// Chain height carried across stages
    height: BlockHeight,
}

impl LoadRunRunner {
    pub fn new(config: LoadRunConfig) -> Self {
        let seed = config.resolve_seed();
        let rng = StdRng::from_seed(seed);

        Self {
            config,
            rng,
            seed,
            clock_ms: 0.0,
            height: 1000,
        }
    }

    /// Run every configured stage and collect the resulting snapshots
    pub fn run(mut self) -> RunReport {
        info!("starting load run: {} stages", self.config.stages.len());

        let profiles = self.config.stages.clone();
        let mut stages = Vec::new();
        for (index, profile) in profiles.iter().enumerate() {
            let stage = self.run_stage(index, profile);
            info!(
                "stage {} done: {} blocks, {} cycles, duration {:?}",
                index,
                stage.block_count(),
                stage.cycle_count(),
                stage.duration()
            );
            stages.push(stage.snapshot());
        }

        RunReport {
            seed_used: self.seed,
            stages,
        }
    }

    fn run_stage(&mut self, index: usize, profile: &StageProfile) -> StageStats {
        let mut stage = StageStats::new(StageInitData {
            stage_index: index,
            chain_only: profile.chain_only,
            planned_duration: profile.planned_duration,
        });

        stage.record_start(self.clock_ms);
        stage.record_chain_start(self.clock_ms);
        self.advance(2000.0);
        stage.record_chain_ready(self.clock_ms);

        if !profile.chain_only {
            stage.record_client_start(self.clock_ms);
            self.advance(3000.0);
            stage.record_client_ready(self.clock_ms);

            stage.record_loadgen_start(self.clock_ms);
            self.advance(1500.0);
            stage.record_loadgen_ready(self.clock_ms);
        }
        stage.record_ready(self.clock_ms);

        // shutdown signal lands with ~10% of the stage's blocks remaining
        let shutdown_after = profile.blocks.saturating_sub(profile.blocks / 10).max(1);
        let mut shutdown_seen = false;

        let mut next_seq: HashMap<String, u64> = HashMap::new();
        let mut active: HashMap<String, ActiveCycle> = HashMap::new();
        let mut live_blocks = 0usize;

        for i in 0..profile.blocks {
            let live = i >= profile.catchup_blocks;
            // catch-up replay runs much faster than live block production
            let interval = if live {
                self.config.block_interval_ms
            } else {
                self.config.block_interval_ms / 20.0
            };
            self.advance(interval);

            if profile.track_shutdown && i == shutdown_after {
                stage.record_shutdown(self.clock_ms);
                shutdown_seen = true;
            }

            let before_shutdown = profile.track_shutdown.then_some(!shutdown_seen);
            let data = self.block_data(live, before_shutdown);
            stage.new_block(data).unwrap();

            if live {
                live_blocks += 1;
                if !profile.chain_only {
                    self.drive_cycles(&mut stage, profile, &mut next_seq, &mut active, live_blocks);
                }
            }
        }

        // cycles still in flight here stay unconcluded and are excluded
        // from the summaries
        stage.record_end(self.clock_ms);
        stage
    }

    /// Advance the simulated clock by a jittered interval
    fn advance(&mut self, mean_ms: f64) {
        self.clock_ms += mean_ms * self.rng.gen_range(0.5..1.5);
    }

    /// Generate one observed block at the next height
    fn block_data(&mut self, live: bool, before_shutdown: Option<bool>) -> BlockData {
        self.height += 1;

        let chain_block_duration =
            self.config.block_interval_ms / 1000.0 * self.rng.gen_range(0.8..1.2);
        let idle_time = chain_block_duration * self.rng.gen_range(0.1..0.4);
        let cosmos_time = chain_block_duration * self.rng.gen_range(0.05..0.15);
        let swingset_time = (chain_block_duration - idle_time - cosmos_time).max(0.05);
        let processing_time = cosmos_time + swingset_time;
        let block_duration = idle_time + processing_time;
        let deliveries = if live {
            self.rng.gen_range(2..20)
        } else {
            self.rng.gen_range(0..4)
        };

        BlockData {
            block_height: Some(self.height),
            live_mode: Some(if live { LiveMode::Live } else { LiveMode::Catchup }),
            lag: Some(if live {
                self.rng.gen_range(0.2..2.5)
            } else {
                self.rng.gen_range(5.0..60.0)
            }),
            block_duration: Some(block_duration),
            chain_block_duration: Some(chain_block_duration),
            idle_time: Some(idle_time),
            cosmos_time: Some(cosmos_time),
            swingset_time: Some(swingset_time),
            processing_time: Some(processing_time),
            swingset_percentage: Some(swingset_time / block_duration * 100.0),
            processing_percentage: Some(processing_time / block_duration * 100.0),
            deliveries: Some(deliveries),
            computrons: Some(deliveries * self.rng.gen_range(40_000..120_000)),
            before_shutdown,
        }
    }

    /// Advance every task's in-flight cycle and start new ones on cadence
    fn drive_cycles(
        &mut self,
        stage: &mut StageStats,
        profile: &StageProfile,
        next_seq: &mut HashMap<String, u64>,
        active: &mut HashMap<String, ActiveCycle>,
        live_blocks: usize,
    ) {
        for task in &profile.tasks {
            let progress = active.get_mut(&task.name).map(|cycle| {
                cycle.blocks_seen += 1;
                (cycle.seq, cycle.blocks_seen, cycle.started_at)
            });

            if let Some((seq, blocks_seen, started_at)) = progress {
                let record = stage
                    .get_or_make_cycle(CycleData {
                        task: Some(task.name.clone()),
                        seq: Some(seq),
                        ..CycleData::default()
                    })
                    .unwrap();
                record.record_block_count(blocks_seen as u64);

                if blocks_seen >= task.cycle_block_span {
                    let success = !self.rng.gen_bool(task.failure_rate);
                    record.record_success(success);
                    record.record_duration((self.clock_ms - started_at) / 1000.0);
                    active.remove(&task.name);
                }
            } else if live_blocks % task.start_every_blocks == 0 {
                let seq = next_seq.entry(task.name.clone()).or_insert(0);
                let cycle_seq = *seq;
                *seq += 1;

                stage
                    .get_or_make_cycle(CycleData {
                        task: Some(task.name.clone()),
                        seq: Some(cycle_seq),
                        ..CycleData::default()
                    })
                    .unwrap()
                    .record_block_count(0);
                active.insert(
                    task.name.clone(),
                    ActiveCycle {
                        seq: cycle_seq,
                        started_at: self.clock_ms,
                        blocks_seen: 0,
                    },
                );
            }
        }
    }
}
