use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use room_core::{MemoryHold, journal_file::load_journal_from_file, replay::replay_journal};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the hold JSON the journal was recorded against
    #[arg(long)]
    hold: PathBuf,
    /// Path to the JSONL command journal to replay
    #[arg(short, long)]
    journal: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let hold_text = fs::read_to_string(&args.hold)
        .with_context(|| format!("Failed to read hold file: {}", args.hold.display()))?;
    let hold = MemoryHold::from_json(&hold_text).context("Failed to deserialize hold JSON")?;
    let loaded = load_journal_from_file(&args.journal)
        .with_context(|| format!("Failed to load journal: {}", args.journal.display()))?;
    info!(records = loaded.journal.records.len(), "journal loaded");

    let result = replay_journal(hold, &loaded.journal).context("Replay failed")?;

    println!("Replay complete.");
    println!("Final status: {:?}", result.final_status);
    println!(
        "Final level: {:?}, room: {:?}, turn: {}",
        result.final_level, result.final_room, result.final_turn
    );
    println!("Checksum: {:#018x}", result.checksum);
    println!("State hash: {:#018x}", result.state_hash);

    Ok(())
}
