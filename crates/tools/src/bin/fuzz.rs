use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use room_core::{Command, CurrentGame, EngineConfig, GameStatus, MemoryHold, NullPersistence};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hold JSON to play through
    #[arg(long)]
    hold: PathBuf,
    /// Optional TOML file with engine switches
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
}

const PLAYABLE: [Command; 13] = [
    Command::NorthWest,
    Command::North,
    Command::NorthEast,
    Command::West,
    Command::Wait,
    Command::East,
    Command::SouthWest,
    Command::South,
    Command::SouthEast,
    Command::Clockwise,
    Command::CounterClockwise,
    Command::Yes,
    Command::No,
];

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn check_invariants(game: &CurrentGame) -> Result<()> {
    let room = game.room();
    let mut seen = BTreeSet::new();
    for (id, monster) in room.live_monsters() {
        if !room.is_valid(monster.pos) || !seen.insert(monster.pos) {
            bail!("monster {id:?} misplaced at {:?} on turn {}", monster.pos, game.turn_no());
        }
    }
    if game.status() == GameStatus::Active && room.monster_at(game.player().pos).is_some() {
        bail!("player shares {:?} with a monster", game.player().pos);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let hold_text = fs::read_to_string(&args.hold)
        .with_context(|| format!("Failed to read hold file: {}", args.hold.display()))?;
    let hold = MemoryHold::from_json(&hold_text).context("Failed to deserialize hold JSON")?;
    let level = hold.first_level().context("Hold has no levels")?;

    println!("Starting fuzz harness on seed {} for max {} commands...", args.seed, args.turns);
    let mut game = CurrentGame::new(Box::new(hold), Box::new(NullPersistence), config, level)
        .context("Failed to start the hold")?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut deaths = 0;
    for _ in 0..args.turns {
        let command = match game.status() {
            GameStatus::Active => choose(&mut rng, &PLAYABLE),
            GameStatus::Dying => {
                deaths += 1;
                Command::Restart
            }
            GameStatus::AwaitingTransition => {
                if !game.has_pending_exit() {
                    println!("Hold completed on level {:?}", game.level());
                    break;
                }
                game.complete_pending_exit().context("Failed to follow the stairs")?;
                continue;
            }
        };
        game.process_command(command);
        check_invariants(&game)?;
    }

    info!(deaths, room = ?game.room().id, turn = game.turn_no(), "fuzz run finished");
    println!("Fuzzing completed successfully.");
    Ok(())
}
