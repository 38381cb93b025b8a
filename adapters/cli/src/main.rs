#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Hunt the Wumpus experience.

mod board_file;
mod interactive;
mod render;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wumpus_core::{Outcome, MAX_BOARD_SIZE, MIN_BOARD_SIZE, WELCOME_BANNER};
use wumpus_system_adversary::{AdversarialPlanner, EnvironmentModel, SearchConfig};
use wumpus_system_pathfinder::Pathfinder;
use wumpus_system_session::{Planner, Session, SessionConfig};
use wumpus_world::{query, ArrowFlight, HazardPolicy, World, WorldConfig};

const MIN_SIZE: i64 = MIN_BOARD_SIZE as i64;
const MAX_SIZE: i64 = MAX_BOARD_SIZE as i64;

/// Who controls the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Follow the cheapest path to the gold.
    Astar,
    /// Look ahead with alpha-beta search.
    Minimax,
    /// Play by typing commands.
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Chase,
    Flee,
    Stationary,
}

impl From<PolicyArg> for HazardPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Chase => Self::Chase,
            PolicyArg::Flee => Self::Flee,
            PolicyArg::Stationary => Self::Stationary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ArrowArg {
    Adjacent,
    Line,
}

impl From<ArrowArg> for ArrowFlight {
    fn from(arrow: ArrowArg) -> Self {
        match arrow {
            ArrowArg::Adjacent => Self::Adjacent,
            ArrowArg::Line => Self::Line,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hunt-the-wumpus")]
#[command(about = "Hunt the Wumpus, played by you or by a search agent", long_about = None)]
struct Args {
    /// Who controls the agent
    #[arg(short, long, value_enum, default_value_t = Mode::Text)]
    mode: Mode,

    /// Cells per edge of a random board
    #[arg(
        long,
        default_value_t = 6,
        value_parser = clap::value_parser!(u32).range(MIN_SIZE..=MAX_SIZE)
    )]
    size: u32,

    /// Load the board from a text file instead of generating one
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Seed for random boards (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Plies explored by the minimax agent
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    /// Advance the moving pit after every agent move
    #[arg(long)]
    moving_pit: bool,

    /// How the moving pit reacts to the agent
    #[arg(long, value_enum, default_value_t = PolicyArg::Chase)]
    hazard_policy: PolicyArg,

    /// How far the arrow flies
    #[arg(long, value_enum, default_value_t = ArrowArg::Adjacent)]
    arrow: ArrowArg,

    /// Turn cap for the autonomous agents
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Games the autonomous agents play, resetting the board between them
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    rounds: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Hunt the Wumpus command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    println!("{WELCOME_BANNER}");

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = WorldConfig::new(args.size, seed)
        .with_arrow_flight(args.arrow.into())
        .with_hazard_policy(args.hazard_policy.into());
    let mut world = match &args.board {
        Some(path) => {
            let layout = board_file::load(path)
                .with_context(|| format!("failed to load board {}", path.display()))?;
            World::with_layout(config, layout)
                .with_context(|| format!("board {} cannot be played", path.display()))?
        }
        None => World::new(config),
    };
    info!(seed, size = query::size(&world), mode = ?args.mode, "world ready");

    let session_config = SessionConfig::new(args.moving_pit, args.max_turns);
    let outcome = match args.mode {
        Mode::Text => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            interactive::run(&mut world, stdin.lock(), &mut stdout, args.moving_pit)?
        }
        Mode::Astar => autonomous(world, Pathfinder::new(), session_config, args.rounds)?,
        Mode::Minimax => {
            let environment = if args.moving_pit {
                EnvironmentModel::HazardStep
            } else {
                EnvironmentModel::Passive
            };
            let planner = AdversarialPlanner::new(SearchConfig::new(args.depth, environment));
            autonomous(world, planner, session_config, args.rounds)?
        }
    };

    info!(%outcome, "game over");
    Ok(())
}

fn autonomous<P: Planner>(
    world: World,
    planner: P,
    config: SessionConfig,
    rounds: u32,
) -> Result<Outcome> {
    let mut stdout = io::stdout().lock();
    let custom = query::layout(&world).is_some();
    let mut session = Session::new(world, planner, config);

    for round in 1..=rounds {
        if round > 1 {
            let notice = if custom {
                "Restarting the custom board..."
            } else {
                "Generating a new random board..."
            };
            writeln!(stdout, "{notice}")?;
            session.restart().context("failed to reset the board")?;
        }
        play_round(&mut session, &mut stdout)?;
        info!(round, outcome = %session.outcome(), turns = session.turns(), "round finished");
    }

    Ok(session.outcome())
}

fn play_round<P: Planner>(session: &mut Session<P>, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", render::board(query::board(session.world())))?;

    while !session.is_finished() {
        let Some(report) = session.step() else {
            break;
        };
        let source = if report.fallback { " (fallback)" } else { "" };
        writeln!(out, "Turn {}: {}{source}", report.turn, report.direction)?;
        for line in report.events.iter().filter_map(render::event) {
            writeln!(out, "{line}")?;
        }
        write!(out, "{}", render::board(query::board(session.world())))?;
    }

    // Terminal outcomes were already announced through `GameOver` events.
    if !session.outcome().is_terminal() {
        writeln!(out, "Turn limit of {} reached.", session.config().max_turns())?;
    }
    Ok(())
}
