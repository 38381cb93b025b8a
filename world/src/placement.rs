//! Entity placement for random and custom boards.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use wumpus_core::{Layout, LayoutDefect, Position, Token, WorldError};

/// Minimum Manhattan distance (exclusive) between the agent's start and any
/// randomly placed entity.
const SAFE_START_RADIUS: u32 = 2;

/// Entity positions from which the world derives its grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) agent: Position,
    pub(crate) wumpus: Option<Position>,
    /// Goal cell. Extra gold tokens live in `extra_gold`.
    pub(crate) gold: Position,
    pub(crate) extra_gold: Vec<Position>,
    pub(crate) pits: Vec<Position>,
}

/// Places the agent in the bottom-left corner and scatters the Wumpus, the
/// gold, and `size² / 10` pits around it.
pub(crate) fn random(size: u32, rng: &mut ChaCha8Rng) -> Placement {
    let agent = Position::new(size - 1, 0);
    let far_corner = Position::new(0, size - 1);
    let mut placed = vec![agent];

    let wumpus = pick(size, agent, &placed, rng).unwrap_or(far_corner);
    placed.push(wumpus);

    let gold = pick(size, agent, &placed, rng)
        .unwrap_or_else(|| fallback(size, agent, &placed));
    placed.push(gold);

    let pit_count = size * size / 10;
    let mut pits = Vec::with_capacity(pit_count as usize);
    for attempt in 0..pit_count {
        let Some(pit) = pick(size, agent, &placed, rng) else {
            debug!(
                placed = attempt,
                requested = pit_count,
                "no room left for another pit"
            );
            break;
        };
        placed.push(pit);
        pits.push(pit);
    }

    Placement {
        agent,
        wumpus: Some(wumpus),
        gold,
        extra_gold: Vec::new(),
        pits,
    }
}

/// Extracts entity positions from a custom layout.
///
/// The last agent and Wumpus token in row-major order win; every gold token is
/// kept and the last one becomes the goal. Perception tokens are ignored since
/// the world derives them from the hazards.
pub(crate) fn from_layout(layout: &Layout) -> Result<Placement, WorldError> {
    let mut agent = None;
    let mut wumpus = None;
    let mut golds = Vec::new();
    let mut pits = Vec::new();

    for (position, cell) in layout.iter() {
        if cell.contains(Token::Agent) {
            agent = Some(position);
        }
        if cell.contains(Token::Wumpus) {
            wumpus = Some(position);
        }
        if cell.contains(Token::Pit) {
            pits.push(position);
        }
        if cell.contains(Token::Gold) {
            golds.push(position);
        }
    }

    let agent = agent.ok_or(WorldError::MalformedLayout(LayoutDefect::MissingAgent))?;
    let gold = golds
        .pop()
        .ok_or(WorldError::MalformedLayout(LayoutDefect::MissingGold))?;

    Ok(Placement {
        agent,
        wumpus,
        gold,
        extra_gold: golds,
        pits,
    })
}

fn pick(
    size: u32,
    agent: Position,
    placed: &[Position],
    rng: &mut ChaCha8Rng,
) -> Option<Position> {
    let candidates: Vec<Position> = cells(size)
        .filter(|cell| cell.manhattan_distance(agent) > SAFE_START_RADIUS)
        .filter(|cell| {
            placed
                .iter()
                .all(|other| other != cell && !other.is_adjacent(*cell))
        })
        .collect();
    candidates.choose(rng).copied()
}

/// First free cell outside the safe start radius, ignoring adjacency.
fn fallback(size: u32, agent: Position, placed: &[Position]) -> Position {
    cells(size)
        .rev()
        .find(|cell| cell.manhattan_distance(agent) > SAFE_START_RADIUS && !placed.contains(cell))
        .unwrap_or(agent)
}

fn cells(size: u32) -> impl DoubleEndedIterator<Item = Position> {
    (0..size).flat_map(move |row| (0..size).map(move |column| Position::new(row, column)))
}
