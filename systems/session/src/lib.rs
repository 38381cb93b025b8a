#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based driving loop that connects a planner to the live world.
//!
//! Each turn the session asks the planner for a move, substitutes a fallback
//! when the planner has none, applies the move, optionally advances the moving
//! pit, and watches the recent moves for a repeating two-move pattern. The
//! live world is mutated only here, once per command.

use std::collections::VecDeque;

use tracing::{debug, info, warn};
use wumpus_core::{Command, Direction, Event, Outcome, WorldError};
use wumpus_system_adversary::AdversarialPlanner;
use wumpus_system_pathfinder::Pathfinder;
use wumpus_world::{self as world, query, World};

const DEFAULT_MAX_TURNS: u32 = 200;
const LOOP_WINDOW: usize = 6;

/// Chooses the agent's next move from a read-only view of the world.
pub trait Planner {
    /// Returns the move to play, or `None` when the planner has nothing to offer.
    fn next_move(&mut self, world: &World) -> Option<Direction>;

    /// Drops any state carried over from previous turns.
    fn reset(&mut self) {}
}

impl Planner for Pathfinder {
    fn next_move(&mut self, world: &World) -> Option<Direction> {
        match Pathfinder::next_move(self, world) {
            Ok(direction) => direction,
            Err(error) => {
                debug!(%error, "pathfinder has no route");
                None
            }
        }
    }

    fn reset(&mut self) {
        self.invalidate();
    }
}

impl Planner for AdversarialPlanner {
    fn next_move(&mut self, world: &World) -> Option<Direction> {
        self.decide(world).best_move
    }
}

impl<P: Planner + ?Sized> Planner for Box<P> {
    fn next_move(&mut self, world: &World) -> Option<Direction> {
        (**self).next_move(world)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Configuration parameters required to construct a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    hazard_steps: bool,
    max_turns: u32,
}

impl SessionConfig {
    /// Creates a configuration; `hazard_steps` advances the moving pit after
    /// every agent move.
    #[must_use]
    pub const fn new(hazard_steps: bool, max_turns: u32) -> Self {
        Self {
            hazard_steps,
            max_turns,
        }
    }

    /// Whether the moving pit advances after every agent move.
    #[must_use]
    pub const fn hazard_steps(&self) -> bool {
        self.hazard_steps
    }

    /// Turn cap for [`Session::run`].
    #[must_use]
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(false, DEFAULT_MAX_TURNS)
    }
}

/// Sliding window over the most recent agent moves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: VecDeque<Direction>,
}

impl MoveHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move and reports whether the window now holds a loop.
    pub fn record(&mut self, direction: Direction) -> bool {
        if self.moves.len() == LOOP_WINDOW {
            let _ = self.moves.pop_front();
        }
        self.moves.push_back(direction);
        self.is_looping()
    }

    /// Whether the last six moves are one two-move pattern played three times.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.moves.len() == LOOP_WINDOW
            && self
                .moves
                .iter()
                .enumerate()
                .all(|(index, direction)| *direction == self.moves[index % 2])
    }

    /// Forgets every recorded move.
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Recorded moves, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.moves.iter().copied()
    }
}

/// Everything that happened during one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// One-based turn number.
    pub turn: u32,
    /// Move that was played.
    pub direction: Direction,
    /// Whether the move came from the fallback rather than the planner.
    pub fallback: bool,
    /// Events emitted by the world, plus a stalemate notice if one was declared.
    pub events: Vec<Event>,
    /// Session outcome after the turn.
    pub outcome: Outcome,
}

/// Drives a planner against the live world until the game ends.
#[derive(Debug)]
pub struct Session<P> {
    world: World,
    planner: P,
    config: SessionConfig,
    history: MoveHistory,
    turns: u32,
    outcome: Outcome,
}

impl<P: Planner> Session<P> {
    /// Creates a session over `world`.
    pub fn new(world: World, planner: P, config: SessionConfig) -> Self {
        let outcome = world.check_game_over();
        Self {
            world,
            planner,
            config,
            history: MoveHistory::new(),
            turns: 0,
            outcome,
        }
    }

    /// Live world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Planner choosing the moves.
    #[must_use]
    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Configuration driving the session.
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Current outcome; [`Outcome::InProgress`] until the game ends.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Turns played since the last (re)start.
    #[must_use]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Whether [`Session::run`] would stop before the next turn.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal() || self.turns >= self.config.max_turns
    }

    /// Plays one turn, or returns `None` once the game is over.
    ///
    /// The turn cap only bounds [`Session::run`]; stepping past it is allowed.
    pub fn step(&mut self) -> Option<TurnReport> {
        if self.outcome.is_terminal() {
            return None;
        }

        let (direction, fallback) = match self.planner.next_move(&self.world) {
            Some(direction) => (direction, false),
            None => {
                let Some(direction) = fallback_move(&self.world) else {
                    warn!("agent has no legal move");
                    self.outcome = Outcome::Stalemate;
                    return None;
                };
                warn!(%direction, "planner offered no move, falling back");
                (direction, true)
            }
        };

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::MoveAgent { direction }, &mut events);
        let mut outcome = self.world.check_game_over();

        if !outcome.is_terminal() && self.config.hazard_steps {
            world::apply(&mut self.world, Command::AdvanceHazard, &mut events);
            outcome = self.world.check_game_over();
        }

        let looping = self.history.record(direction);
        if !outcome.is_terminal() && looping {
            outcome = Outcome::Stalemate;
            events.push(Event::GameOver { outcome });
        }

        self.turns += 1;
        self.outcome = outcome;
        debug!(turn = self.turns, %direction, fallback, "turn played");
        if outcome.is_terminal() {
            info!(turns = self.turns, %outcome, "session finished");
        }

        Some(TurnReport {
            turn: self.turns,
            direction,
            fallback,
            events,
            outcome,
        })
    }

    /// Plays turns until the game ends or the turn cap is reached.
    pub fn run(&mut self) -> Outcome {
        self.run_with(|_| {})
    }

    /// Like [`Session::run`], handing every report to `observer` as it happens.
    pub fn run_with(&mut self, mut observer: impl FnMut(&TurnReport)) -> Outcome {
        while !self.is_finished() {
            let Some(report) = self.step() else {
                break;
            };
            observer(&report);
        }
        self.outcome
    }

    /// Resets the world and forgets the history and any planner state.
    pub fn restart(&mut self) -> Result<(), WorldError> {
        self.world.reset()?;
        self.history.clear();
        self.planner.reset();
        self.turns = 0;
        self.outcome = self.world.check_game_over();
        info!(size = query::size(&self.world), "session restarted");
        Ok(())
    }

    /// Gives the world and planner back.
    pub fn into_parts(self) -> (World, P) {
        (self.world, self.planner)
    }
}

/// First legal move whose target holds no live hazard, else the first legal
/// move, else `None`.
#[must_use]
pub fn fallback_move(world: &World) -> Option<Direction> {
    let board = query::board(world);
    let agent = query::agent_position(world);
    let legal: Vec<(Direction, bool)> = Direction::ALL
        .into_iter()
        .filter_map(|direction| {
            let target = agent.step(direction, board.size())?;
            let safe = board
                .cell(target)
                .is_some_and(|cell| cell.live_hazard().is_none());
            Some((direction, safe))
        })
        .collect();

    legal
        .iter()
        .find(|(_, safe)| *safe)
        .or_else(|| legal.first())
        .map(|(direction, _)| *direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_all(history: &mut MoveHistory, moves: &[Direction]) -> Vec<bool> {
        moves.iter().map(|direction| history.record(*direction)).collect()
    }

    #[test]
    fn oscillation_is_detected_on_sixth_move() {
        use Direction::{Down, Up};
        let mut history = MoveHistory::new();

        let flags = record_all(&mut history, &[Up, Down, Up, Down, Up, Down]);

        assert_eq!(flags, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn staircase_is_a_loop() {
        use Direction::{Right, Up};
        let mut history = MoveHistory::new();

        let flags = record_all(&mut history, &[Up, Right, Up, Right, Up, Right]);

        assert_eq!(flags, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn repeating_one_move_is_a_loop() {
        use Direction::Left;
        let mut history = MoveHistory::new();

        let flags = record_all(&mut history, &[Left; 6]);

        assert_eq!(flags.last(), Some(&true));
    }

    #[test]
    fn broken_pattern_is_not_a_loop() {
        use Direction::{Down, Left, Right, Up};
        let mut history = MoveHistory::new();

        let flags = record_all(&mut history, &[Up, Right, Up, Right, Up, Left, Down]);

        assert!(flags.iter().all(|looping| !looping));
    }

    #[test]
    fn window_slides_past_older_moves() {
        use Direction::{Left, Right, Up};
        let mut history = MoveHistory::new();

        let flags = record_all(
            &mut history,
            &[Up, Up, Left, Right, Left, Right, Left, Right],
        );

        assert_eq!(flags.last(), Some(&true));
        assert_eq!(history.iter().count(), LOOP_WINDOW);
        history.clear();
        assert!(!history.is_looping());
    }
}
