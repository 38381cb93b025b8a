#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard-aware best-first pathfinder that walks the agent toward the gold.
//!
//! Cells are weighted by the perceptions they carry and excluded outright when
//! they hold a live hazard. The weights also shrink near the goal, which makes
//! the cost model non-monotonic with respect to naive closing, so closed cells
//! are reopened whenever a strictly cheaper route to them turns up.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet, VecDeque},
};

use thiserror::Error;
use tracing::debug;
use wumpus_core::{Direction, Position, Token};
use wumpus_world::{
    query::{self, BoardView},
    World,
};

const BREEZE_PENALTY: f64 = 50.0;
const STENCH_PENALTY: f64 = 100.0;
const BREEZE_AND_STENCH_PENALTY: f64 = 150.0;

/// Failures reported by the pathfinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// Every route to the goal crosses a live hazard or leaves the board.
    #[error("no finite-cost path from {start} to {goal}")]
    Unreachable {
        /// Cell the search started from.
        start: Position,
        /// Cell the search tried to reach.
        goal: Position,
    },
}

/// Cost of entering `cell` on the way to `goal`.
///
/// Returns infinity for cells holding a live pit or Wumpus and for cells off
/// the board.
#[must_use]
pub fn cell_cost(board: BoardView<'_>, cell: Position, goal: Position) -> f64 {
    let Some(tokens) = board.cell(cell) else {
        return f64::INFINITY;
    };
    if tokens.live_hazard().is_some() {
        return f64::INFINITY;
    }

    let base = match (tokens.contains(Token::Breeze), tokens.contains(Token::Stench)) {
        (true, true) => BREEZE_AND_STENCH_PENALTY,
        (true, false) => BREEZE_PENALTY,
        (false, true) => STENCH_PENALTY,
        (false, false) => 1.0,
    };
    let proximity = board
        .size()
        .saturating_sub(cell.manhattan_distance(goal))
        .max(1);

    base / f64::from(proximity)
}

/// Finds the cheapest path from `start` to `goal`, both ends included.
pub fn find_path(
    board: BoardView<'_>,
    start: Position,
    goal: Position,
) -> Result<Vec<Position>, PathError> {
    let unreachable = PathError::Unreachable { start, goal };
    if board.cell(start).is_none() || board.cell(goal).is_none() {
        return Err(unreachable);
    }

    let mut frontier = BinaryHeap::new();
    let mut closed: HashSet<Position> = HashSet::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, f64> = HashMap::new();
    let mut insertions: u64 = 0;

    let _ = g_score.insert(start, 0.0);
    frontier.push(FrontierEntry {
        f: f64::from(start.manhattan_distance(goal)),
        g: 0.0,
        order: insertions,
        position: start,
    });

    while let Some(entry) = frontier.pop() {
        let current = entry.position;
        let best_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
        if closed.contains(&current) || entry.g > best_g {
            continue;
        }

        if current == goal {
            return Ok(reconstruct(&came_from, current));
        }

        let _ = closed.insert(current);

        for direction in Direction::ALL {
            let Some(neighbor) = current.step(direction, board.size()) else {
                continue;
            };
            let cost = cell_cost(board, neighbor, goal);
            if !cost.is_finite() {
                continue;
            }

            let tentative = best_g + cost;
            let known = g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY);
            if tentative >= known {
                continue;
            }

            let _ = came_from.insert(neighbor, current);
            let _ = g_score.insert(neighbor, tentative);
            let _ = closed.remove(&neighbor);
            insertions += 1;
            frontier.push(FrontierEntry {
                f: tentative + f64::from(neighbor.manhattan_distance(goal)),
                g: tentative,
                order: insertions,
                position: neighbor,
            });
        }
    }

    Err(unreachable)
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(previous) = came_from.get(&current) {
        path.push(*previous);
        current = *previous;
    }
    path.reverse();
    path
}

/// Frontier node ordered so that [`BinaryHeap`] pops the lowest `f` first and
/// the earliest insertion among equal `f`.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    f: f64,
    g: f64,
    order: u64,
    position: Position,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Planner that follows a cached path to the gold, one move per turn.
///
/// The cached path is advanced while it still starts at the agent and every
/// remaining cell still has a finite cost; otherwise it is recomputed from the
/// live board, which lets the planner react to a relocated pit.
#[derive(Debug, Default)]
pub struct Pathfinder {
    path: VecDeque<Position>,
}

impl Pathfinder {
    /// Creates a pathfinder with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses the next move, or `None` once the agent stands on the gold.
    pub fn next_move(&mut self, world: &World) -> Result<Option<Direction>, PathError> {
        let board = query::board(world);
        let agent = query::agent_position(world);
        let goal = query::gold_position(world);

        if !self.cache_is_usable(board, agent, goal) {
            self.path = find_path(board, agent, goal)?.into();
            debug!(
                %agent,
                %goal,
                length = self.path.len(),
                "path recomputed"
            );
        }

        if self.path.len() < 2 {
            return Ok(None);
        }

        let _ = self.path.pop_front();
        Ok(self.path.front().and_then(|next| agent.direction_to(*next)))
    }

    /// Computes a fresh path for the current world without touching the cache.
    pub fn plan(&self, world: &World) -> Result<Vec<Position>, PathError> {
        find_path(
            query::board(world),
            query::agent_position(world),
            query::gold_position(world),
        )
    }

    /// Remaining cached path, starting at the cell the agent should occupy.
    pub fn cached_path(&self) -> impl Iterator<Item = Position> + '_ {
        self.path.iter().copied()
    }

    /// Drops the cached path so that the next call replans from scratch.
    pub fn invalidate(&mut self) {
        self.path.clear();
    }

    fn cache_is_usable(&self, board: BoardView<'_>, agent: Position, goal: Position) -> bool {
        self.path.front() == Some(&agent)
            && self.path.back() == Some(&goal)
            && self
                .path
                .iter()
                .skip(1)
                .all(|cell| cell_cost(board, *cell, goal).is_finite())
    }
}
