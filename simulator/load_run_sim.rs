// Load Run Simulation - synthetic stats-engine exercise
//
// Usage:
//   cargo run --bin load_run_sim
//   cargo run --bin load_run_sim scenarios/nightly.yaml
//   cargo run --bin load_run_sim --seed 0x1234...
//   cargo run --bin load_run_sim --dump-yaml   (print the full report)

mod load_run;

use load_run::{LoadRunConfig, LoadRunRunner};
use log::info;
use simple_logger::SimpleLogger;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<String> = None;
    let mut seed: Option<[u8; 32]> = None;
    let mut dump_yaml = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                if i + 1 >= args.len() {
                    eprintln!("--seed requires a hex value");
                    std::process::exit(1);
                }
                seed = Some(parse_seed_hex(&args[i + 1]));
                i += 2;
            }
            "--dump-yaml" => {
                dump_yaml = true;
                i += 1;
            }
            other => {
                config_path = Some(other.to_string());
                i += 1;
            }
        }
    }

    let mut config = match config_path {
        Some(path) => load_config(Path::new(&path)),
        None => LoadRunConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }

    info!("Configuration:");
    info!("  Stages: {}", config.stages.len());
    info!("  Block interval: {}ms", config.block_interval_ms);
    for (index, stage) in config.stages.iter().enumerate() {
        info!(
            "  Stage {}: {} blocks ({} catchup), {} tasks{}",
            index,
            stage.blocks,
            stage.catchup_blocks,
            stage.tasks.len(),
            if stage.chain_only { ", chain only" } else { "" }
        );
    }

    let runner = LoadRunRunner::new(config);
    let report = runner.run();

    report.print_summary();

    if dump_yaml {
        match report.to_yaml() {
            Ok(yaml) => println!("{}", yaml),
            Err(error) => {
                eprintln!("Failed to serialize report: {}", error);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(path: &Path) -> LoadRunConfig {
    let yaml_content = fs::read_to_string(path).unwrap_or_else(|error| {
        eprintln!("Failed to read {}: {}", path.display(), error);
        std::process::exit(1);
    });

    serde_yaml::from_str(&yaml_content).unwrap_or_else(|error| {
        eprintln!("Failed to parse {}: {}", path.display(), error);
        std::process::exit(1);
    })
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let byte_str = std::str::from_utf8(chunk).unwrap_or_else(|error| {
            eprintln!("Invalid hex seed: {}", error);
            std::process::exit(1);
        });
        seed[i] = u8::from_str_radix(byte_str, 16).unwrap_or_else(|error| {
            eprintln!("Invalid hex seed: {}", error);
            std::process::exit(1);
        });
    }

    seed
}
