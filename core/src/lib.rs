#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hunt the Wumpus engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and the planning systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point and broadcasts [`Event`] values describing what
//! happened. Planners never submit commands themselves: they inspect a world
//! snapshot, simulate on private copies, and hand a [`Direction`] back to the
//! driving loop.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hunt the Wumpus!";

/// Smallest board edge accepted by the world.
pub const MIN_BOARD_SIZE: u32 = 3;

/// Largest board edge accepted by the world.
pub const MAX_BOARD_SIZE: u32 = 20;

/// Cardinal directions available to the agent, the arrow, and moving hazards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the canonical enumeration order used for tie-breaking.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Lowercase name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = WorldError;

    /// Accepts direction names as well as the `w`/`a`/`s`/`d` keys.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Self::Up),
            "down" | "s" => Ok(Self::Down),
            "left" | "a" => Ok(Self::Left),
            "right" | "d" => Ok(Self::Right),
            _ => Err(WorldError::InvalidDirection {
                direction: value.trim().to_owned(),
                fault: DirectionFault::Unrecognized,
            }),
        }
    }
}

/// Location of a single board cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell, growing downward.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell, growing rightward.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Neighbor one step away in `direction`, or `None` when it leaves a
    /// board of `size` cells per edge.
    #[must_use]
    pub fn step(self, direction: Direction, size: u32) -> Option<Position> {
        let (row, column) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.column),
            Direction::Down => (self.row.checked_add(1)?, self.column),
            Direction::Left => (self.row, self.column.checked_sub(1)?),
            Direction::Right => (self.row, self.column.checked_add(1)?),
        };

        if row < size && column < size {
            Some(Position::new(row, column))
        } else {
            None
        }
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        if self.manhattan_distance(other) != 1 {
            return None;
        }

        if other.row < self.row {
            Some(Direction::Up)
        } else if other.row > self.row {
            Some(Direction::Down)
        } else if other.column < self.column {
            Some(Direction::Left)
        } else {
            Some(Direction::Right)
        }
    }

    /// Reports whether the two positions share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Entities and perception markers that can occupy a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    /// The controlled explorer.
    Agent,
    /// The live Wumpus.
    Wumpus,
    /// A bottomless pit.
    Pit,
    /// The treasure the agent is looking for.
    Gold,
    /// Perception marker next to a pit.
    Breeze,
    /// Perception marker next to the live Wumpus.
    Stench,
    /// Remains of the Wumpus after a successful shot.
    DeadWumpus,
}

impl Token {
    /// Every token in rendering order.
    pub const ALL: [Token; 7] = [
        Token::Agent,
        Token::Wumpus,
        Token::Pit,
        Token::Gold,
        Token::Breeze,
        Token::Stench,
        Token::DeadWumpus,
    ];

    /// Single-character glyph used by text adapters.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Agent => 'A',
            Self::Wumpus => 'W',
            Self::Pit => 'P',
            Self::Gold => 'G',
            Self::Breeze => 'b',
            Self::Stench => 's',
            Self::DeadWumpus => 'X',
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Unordered set of tokens stored in a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    bits: u8,
}

impl Cell {
    /// Cell without any token.
    pub const EMPTY: Cell = Cell { bits: 0 };

    /// Reports whether the token is present.
    #[must_use]
    pub const fn contains(&self, token: Token) -> bool {
        self.bits & token.bit() != 0
    }

    /// Adds the token to the cell. Adding a present token is a no-op.
    pub fn insert(&mut self, token: Token) {
        self.bits |= token.bit();
    }

    /// Removes the token from the cell. Removing an absent token is a no-op.
    pub fn remove(&mut self, token: Token) {
        self.bits &= !token.bit();
    }

    /// Returns a copy of the cell with the token added.
    #[must_use]
    pub const fn with(self, token: Token) -> Self {
        Self {
            bits: self.bits | token.bit(),
        }
    }

    /// Reports whether the cell holds no tokens.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Live hazard stored in the cell, the Wumpus taking precedence over a pit.
    #[must_use]
    pub const fn live_hazard(&self) -> Option<Hazard> {
        if self.contains(Token::Wumpus) {
            Some(Hazard::Wumpus)
        } else if self.contains(Token::Pit) {
            Some(Hazard::Pit)
        } else {
            None
        }
    }

    /// Iterator over the contained tokens in [`Token::ALL`] order.
    pub fn tokens(self) -> impl Iterator<Item = Token> {
        Token::ALL
            .into_iter()
            .filter(move |token| self.contains(*token))
    }
}

impl FromIterator<Token> for Cell {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut cell = Cell::EMPTY;
        for token in iter {
            cell.insert(token);
        }
        cell
    }
}

/// Square grid of pre-tokenized cells supplied by a board loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    size: u32,
    cells: Vec<Cell>,
}

impl Layout {
    /// Builds a layout from rows of cells, validating shape and size.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, WorldError> {
        let size = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(WorldError::MalformedLayout(LayoutDefect::SizeOutOfRange(
                size,
            )));
        }

        let mut cells = Vec::with_capacity(rows.len() * rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size as usize {
                return Err(WorldError::MalformedLayout(LayoutDefect::NotSquare {
                    row: index,
                    columns: row.len(),
                    expected: size,
                }));
            }
            cells.extend(row);
        }

        Ok(Self { size, cells })
    }

    /// Number of cells along each board edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell stored at the provided position, if it lies on the board.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        if position.row() >= self.size || position.column() >= self.size {
            return None;
        }
        let index = position.row() as usize * self.size as usize + position.column() as usize;
        self.cells.get(index).copied()
    }

    /// Iterates over every position paired with its cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let size = self.size.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u32;
            (Position::new(index / size, index % size), *cell)
        })
    }
}

/// Hazards that end the game when the agent shares their cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// The live Wumpus.
    Wumpus,
    /// A pit.
    Pit,
}

/// Result of a terminal-state check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The game continues.
    InProgress,
    /// The agent reached the gold.
    Victory,
    /// The agent entered a hazard cell.
    Defeat(Hazard),
    /// The driving loop detected the agent repeating the same two moves.
    Stalemate,
}

impl Outcome {
    /// Reports whether the session should stop.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("The hunt continues."),
            Self::Victory => f.write_str("You found the gold! You win!"),
            Self::Defeat(Hazard::Wumpus) => f.write_str("The Wumpus got you!"),
            Self::Defeat(Hazard::Pit) => f.write_str("You fell into a pit!"),
            Self::Stalemate => f.write_str("Stalemate: the agent keeps repeating the same moves."),
        }
    }
}

/// Perception the agent can sense in its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Perception {
    /// A pit is orthogonally adjacent.
    Breeze,
    /// The live Wumpus is orthogonally adjacent.
    Stench,
}

impl fmt::Display for Perception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Breeze => f.write_str("You feel a breeze. There must be a pit nearby."),
            Self::Stench => f.write_str("You smell a stench. The Wumpus must be nearby."),
        }
    }
}

/// What the agent senses after entering a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    /// Cell the agent now occupies.
    pub cell: Position,
    /// Whether a breeze is present.
    pub breeze: bool,
    /// Whether a stench is present.
    pub stench: bool,
}

impl Observation {
    /// Derives the observation for an agent standing in `cell`.
    #[must_use]
    pub const fn of(position: Position, cell: Cell) -> Self {
        Self {
            cell: position,
            breeze: cell.contains(Token::Breeze),
            stench: cell.contains(Token::Stench),
        }
    }

    /// Perceptions present in the cell, breeze first.
    pub fn perceptions(&self) -> impl Iterator<Item = Perception> {
        [
            self.breeze.then_some(Perception::Breeze),
            self.stench.then_some(Perception::Stench),
        ]
        .into_iter()
        .flatten()
    }
}

/// Result of firing the arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The arrow killed the Wumpus standing at the provided cell.
    Killed {
        /// Cell where the Wumpus died.
        at: Position,
    },
    /// The arrow hit nothing.
    Missed,
}

/// Relocation performed by the moving pit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardStep {
    /// Cell the pit left.
    pub from: Position,
    /// Cell the pit now occupies.
    pub to: Position,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the agent one cell.
    MoveAgent {
        /// Direction of travel.
        direction: Direction,
    },
    /// Fires the single-use arrow.
    ShootArrow {
        /// Direction of flight.
        direction: Direction,
    },
    /// Advances the moving pit by one step.
    AdvanceHazard,
    /// Rebuilds the board from scratch.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The board was rebuilt.
    WorldReset {
        /// Cells per board edge.
        size: u32,
    },
    /// The agent moved between two cells.
    AgentMoved {
        /// Cell the agent left.
        from: Position,
        /// Cell the agent entered.
        to: Position,
    },
    /// The agent sensed a perception in its new cell.
    Perceived {
        /// Cell where the perception was sensed.
        cell: Position,
        /// Perception that was sensed.
        perception: Perception,
    },
    /// A move request was refused without changing state.
    MoveRejected {
        /// Requested direction.
        direction: Direction,
        /// Reason for the refusal.
        error: WorldError,
    },
    /// The arrow killed the Wumpus.
    WumpusKilled {
        /// Cell where the Wumpus died.
        at: Position,
    },
    /// The arrow was spent without hitting anything.
    ArrowMissed {
        /// Direction of flight.
        direction: Direction,
    },
    /// A shot request was refused without changing state.
    ShotRejected {
        /// Requested direction.
        direction: Direction,
        /// Reason for the refusal.
        error: WorldError,
    },
    /// The moving pit relocated.
    HazardMoved {
        /// Cell the pit left.
        from: Position,
        /// Cell the pit entered.
        to: Position,
    },
    /// The command left the world in a terminal state.
    GameOver {
        /// Terminal outcome.
        outcome: Outcome,
    },
}

/// Reasons a custom layout cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutDefect {
    /// No cell holds the agent.
    #[error("the board must contain an agent (A)")]
    MissingAgent,
    /// No cell holds gold.
    #[error("the board must contain gold (G)")]
    MissingGold,
    /// A row does not have as many cells as the board has rows.
    #[error("row {row} has {columns} cells but the board has {expected} rows")]
    NotSquare {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells found in the row.
        columns: usize,
        /// Number of cells every row must have.
        expected: u32,
    },
    /// The board edge lies outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    #[error("board size {0} is outside {min}..={max}", min = MIN_BOARD_SIZE, max = MAX_BOARD_SIZE)]
    SizeOutOfRange(u32),
}

/// Reasons a direction cannot be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DirectionFault {
    /// The text does not name a direction.
    #[error("not a recognized direction")]
    Unrecognized,
    /// The neighboring cell lies beyond the board edge.
    #[error("the edge of the board is in the way")]
    OffGrid,
}

/// Recoverable errors reported by world operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A custom layout is unusable.
    #[error("malformed layout: {0}")]
    MalformedLayout(LayoutDefect),
    /// A direction is unknown or leads off the board.
    #[error("invalid direction `{direction}`: {fault}")]
    InvalidDirection {
        /// Direction as requested.
        direction: String,
        /// Why the direction was refused.
        fault: DirectionFault,
    },
    /// The single arrow has already been fired.
    #[error("no arrow available")]
    NoArrowAvailable,
}

impl WorldError {
    /// Creates the error reported when `direction` leads off the board.
    #[must_use]
    pub fn off_grid(direction: Direction) -> Self {
        Self::InvalidDirection {
            direction: direction.to_string(),
            fault: DirectionFault::OffGrid,
        }
    }
}
