//! Run report assembly and printing

use ls_rust::{FieldSummary, StageSnapshot};

/// Complete result of a synthetic run
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunReport {
    /// Seed used for the run
    pub seed_used: [u8; 32],

    /// Final snapshot of every stage, in run order
    pub stages: Vec<StageSnapshot>,
}

impl RunReport {
    /// Print a summary of the run to console
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        LOAD RUN STATISTICS                             ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Seed: {:?}", self.seed_used);
        println!("Stages: {}\n", self.stages.len());

        for stage in &self.stages {
            println!(
                "═══ Stage {}{} ═══",
                stage.stage_index,
                if stage.chain_only { " (chain only)" } else { "" }
            );
            println!(
                "  Durations: ready={}, total={}",
                format_ms(stage.ready_duration),
                format_ms(stage.duration)
            );
            println!(
                "  Init: chain={}, client={}, loadgen={}",
                format_ms(stage.chain_init_duration),
                format_ms(stage.client_init_duration),
                format_ms(stage.loadgen_init_duration)
            );
            match (stage.first_block_height, stage.last_block_height) {
                (Some(first), Some(last)) => {
                    println!("  Blocks: {} (heights {} to {})", stage.block_count, first, last);
                }
                _ => println!("  Blocks: {}", stage.block_count),
            }

            if let Some(summaries) = &stage.blocks_summaries {
                for (scope, summary) in summaries.iter() {
                    match summary {
                        Some(summary) => println!(
                            "    {:12} n={:<4} lag avg={}, block avg={}, live={}",
                            scope.to_string(),
                            summary
                                .start_block_height
                                .map(|heights| heights.items)
                                .unwrap_or(0),
                            format_avg(&summary.lag),
                            format_avg(&summary.block_duration),
                            format_ratio(&summary.live_mode),
                        ),
                        None => println!("    {:12} (no samples)", scope.to_string()),
                    }
                }
            }

            println!("  Cycles: {}", stage.cycle_count);
            if let Some(summaries) = &stage.cycles_summaries {
                for (scope, summary) in summaries.iter() {
                    match summary {
                        Some(summary) => println!(
                            "    {:12} n={:<4} success={}, duration avg={}s, blocks avg={}",
                            scope.to_string(),
                            summary.success.map(|success| success.items).unwrap_or(0),
                            format_ratio(&summary.success),
                            format_avg(&summary.duration),
                            format_avg(&summary.block_count),
                        ),
                        None => println!("    {:12} (none concluded)", scope.to_string()),
                    }
                }
            }
            println!();
        }
    }

    /// Serialize the full report for machine consumption
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn format_ms(duration: Option<f64>) -> String {
    match duration {
        Some(duration) => format!("{:.2}s", duration / 1000.0),
        None => "-".to_string(),
    }
}

fn format_avg(field: &Option<FieldSummary>) -> String {
    match field {
        Some(summary) => format!("{:.2}", summary.average),
        None => "-".to_string(),
    }
}

fn format_ratio(field: &Option<FieldSummary>) -> String {
    match field {
        Some(summary) => format!("{:.1}%", summary.average * 100.0),
        None => "-".to_string(),
    }
}
