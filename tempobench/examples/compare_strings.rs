//! Tempobench example: comparing string-building strategies
//!
//! Run with:
//!   cargo run --example compare_strings
//!
//! Benchmarks three ways of building the same string, prints the ranked
//! report, and saves a JSON export under target/tempobench/.

use std::hint::black_box;

use tempobench::{Harness, HarnessConfig, HarnessEvent, HostInfo, RunOptions};

const PIECES: usize = 10_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("tempobench=debug")
        .init();

    // Pinning reduces scheduling jitter; harmless to skip if it fails.
    let _ = tempobench::pin_to_cpu(0);

    let mut harness = Harness::with_config(HarnessConfig {
        warmup_runs: 3,
        measurement_runs: 10,
    });
    harness.set_host_info(HostInfo {
        platform: std::env::consts::OS.to_string(),
        architecture: std::env::consts::ARCH.to_string(),
        runtime: format!("rustc (host {})", std::env::consts::FAMILY),
    });

    // Live progress on stderr while trials run
    let events = harness.subscribe();
    std::thread::spawn(move || {
        for event in events {
            if let HarnessEvent::Progress(update) = event {
                eprintln!(
                    "  {} [{}/{}] {:.3} ms",
                    update.name, update.trial, update.total_trials, update.trial_time_ms
                );
            }
        }
    });

    harness.run_sync("push_str in a loop", || {
        let mut s = String::new();
        for i in 0..PIECES {
            s.push_str(&i.to_string());
        }
        black_box(s)
    })?;

    harness.run_sync("format! in a loop", || {
        let mut s = String::new();
        for i in 0..PIECES {
            s = format!("{s}{i}");
        }
        black_box(s)
    })?;

    harness.run_sync_with(
        "collect from iterator",
        || {
            let s: String = (0..PIECES).map(|i| i.to_string()).collect();
            black_box(s)
        },
        RunOptions::new().iterations_per_trial(2),
    )?;

    println!("{}", harness.format_report());

    // Where bytes go is the caller's business; this caller picks a file.
    let json = harness.export("json")?;
    std::fs::create_dir_all("target/tempobench")?;
    let path = "target/tempobench/results.json";
    std::fs::write(path, json)?;
    println!("Results exported to: {path}");

    Ok(())
}
