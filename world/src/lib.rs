#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hunt the Wumpus.
//!
//! The [`World`] owns the grid, the hazard index, and the single-use arrow.
//! Breeze and stench markers are derived from the hazard index after every
//! hazard mutation, so no query ever observes a stale perception. The world
//! is a plain value: planners clone it freely to simulate moves without
//! touching the live copy that the driving loop mutates through [`apply`].

mod perception;
mod placement;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use wumpus_core::{
    Cell, Command, Direction, Event, Hazard, HazardStep, Layout, Observation, Outcome, Position,
    ShotOutcome, Token, WorldError, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};

use crate::placement::Placement;

const DEFAULT_SIZE: u32 = 4;
const DEFAULT_SEED: u64 = 0x5eed;

/// How far the arrow travels once fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrowFlight {
    /// The arrow only reaches the adjacent cell.
    #[default]
    Adjacent,
    /// The arrow flies in a straight line until it leaves the board.
    Line,
}

/// Strategy followed by the moving pit on every hazard step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HazardPolicy {
    /// Swallow the agent when adjacent, otherwise close the distance.
    #[default]
    Chase,
    /// Move away from the agent.
    Flee,
    /// Never move.
    Stationary,
}

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    size: u32,
    seed: u64,
    arrow_flight: ArrowFlight,
    hazard_policy: HazardPolicy,
}

impl WorldConfig {
    /// Creates a configuration for a random board of `size` cells per edge.
    ///
    /// The size is clamped to the supported board range.
    #[must_use]
    pub fn new(size: u32, seed: u64) -> Self {
        Self {
            size: size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE),
            seed,
            arrow_flight: ArrowFlight::default(),
            hazard_policy: HazardPolicy::default(),
        }
    }

    /// Overrides how far the arrow flies.
    #[must_use]
    pub const fn with_arrow_flight(mut self, arrow_flight: ArrowFlight) -> Self {
        self.arrow_flight = arrow_flight;
        self
    }

    /// Overrides the moving pit's strategy.
    #[must_use]
    pub const fn with_hazard_policy(mut self, hazard_policy: HazardPolicy) -> Self {
        self.hazard_policy = hazard_policy;
        self
    }

    /// Cells per board edge used for random boards.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Seed feeding the placement generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SEED)
    }
}

/// Represents the authoritative Hunt the Wumpus world state.
#[derive(Clone, Debug)]
pub struct World {
    config: WorldConfig,
    layout: Option<Layout>,
    rng: ChaCha8Rng,
    size: u32,
    cells: Vec<Cell>,
    agent: Position,
    wumpus: Option<Position>,
    gold: Position,
    pits: Vec<Position>,
    moving_pit: Option<usize>,
    arrow_available: bool,
}

impl World {
    /// Creates a world with a randomly generated board.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = Self::blank(config, None, rng);
        let placement = placement::random(world.size, &mut world.rng);
        world.install(placement);
        info!(size = world.size, pits = world.pits.len(), "random board generated");
        world
    }

    /// Creates a world that reloads the provided custom layout on every reset.
    pub fn with_layout(config: WorldConfig, layout: Layout) -> Result<Self, WorldError> {
        let placement = placement::from_layout(&layout)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = Self::blank(config, Some(layout), rng);
        world.install(placement);
        info!(size = world.size, pits = world.pits.len(), "custom board loaded");
        Ok(world)
    }

    fn blank(config: WorldConfig, layout: Option<Layout>, rng: ChaCha8Rng) -> Self {
        let size = layout.as_ref().map_or(config.size, Layout::size);
        Self {
            config,
            layout,
            rng,
            size,
            cells: Vec::new(),
            agent: Position::new(size.saturating_sub(1), 0),
            wumpus: None,
            gold: Position::new(0, 0),
            pits: Vec::new(),
            moving_pit: None,
            arrow_available: true,
        }
    }

    /// Rebuilds the board.
    ///
    /// Random boards draw a fresh layout from the world's generator, so two
    /// worlds built from the same seed walk through the same boards. Custom
    /// boards reload the stored layout verbatim. On failure the current board
    /// is left untouched.
    pub fn reset(&mut self) -> Result<(), WorldError> {
        let placement = match &self.layout {
            Some(layout) => placement::from_layout(layout)?,
            None => placement::random(self.size, &mut self.rng),
        };
        self.install(placement);
        info!(size = self.size, pits = self.pits.len(), "board reset");
        Ok(())
    }

    /// Restarts the placement generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn install(&mut self, placement: Placement) {
        let cell_count = (self.size as usize) * (self.size as usize);
        self.cells = vec![Cell::EMPTY; cell_count];

        self.put(placement.agent, Token::Agent);
        if let Some(wumpus) = placement.wumpus {
            self.put(wumpus, Token::Wumpus);
        }
        self.put(placement.gold, Token::Gold);
        for &gold in &placement.extra_gold {
            self.put(gold, Token::Gold);
        }
        for &pit in &placement.pits {
            self.put(pit, Token::Pit);
        }

        self.agent = placement.agent;
        self.wumpus = placement.wumpus;
        self.gold = placement.gold;
        self.moving_pit = if placement.pits.is_empty() {
            None
        } else {
            Some(0)
        };
        self.pits = placement.pits;
        self.arrow_available = true;
        self.refresh_perceptions();
    }

    /// Moves the agent one cell and reports what it senses there.
    ///
    /// Walking into the board edge leaves the agent in place and fails with
    /// [`WorldError::InvalidDirection`].
    pub fn move_agent(&mut self, direction: Direction) -> Result<Observation, WorldError> {
        let target = self
            .agent
            .step(direction, self.size)
            .ok_or_else(|| WorldError::off_grid(direction))?;

        self.take(self.agent, Token::Agent);
        self.put(target, Token::Agent);
        self.agent = target;

        Ok(Observation::of(target, self.cell(target)))
    }

    /// Fires the single-use arrow.
    ///
    /// Refused shots (spent arrow, board edge) leave the world untouched.
    pub fn shoot_arrow(&mut self, direction: Direction) -> Result<ShotOutcome, WorldError> {
        if !self.arrow_available {
            return Err(WorldError::NoArrowAvailable);
        }
        let first = self
            .agent
            .step(direction, self.size)
            .ok_or_else(|| WorldError::off_grid(direction))?;
        self.arrow_available = false;

        let mut flight = Some(first);
        while let Some(cell) = flight {
            if self.wumpus == Some(cell) {
                self.take(cell, Token::Wumpus);
                self.put(cell, Token::DeadWumpus);
                self.wumpus = None;
                self.refresh_perceptions();
                return Ok(ShotOutcome::Killed { at: cell });
            }

            flight = match self.config.arrow_flight {
                ArrowFlight::Adjacent => None,
                ArrowFlight::Line => cell.step(direction, self.size),
            };
        }

        Ok(ShotOutcome::Missed)
    }

    /// Reports whether the agent's cell ends the game.
    #[must_use]
    pub fn check_game_over(&self) -> Outcome {
        let cell = self.cell(self.agent);
        if cell.contains(Token::Wumpus) {
            Outcome::Defeat(Hazard::Wumpus)
        } else if cell.contains(Token::Pit) {
            Outcome::Defeat(Hazard::Pit)
        } else if cell.contains(Token::Gold) {
            Outcome::Victory
        } else {
            Outcome::InProgress
        }
    }

    /// Advances the moving pit by one step according to the hazard policy.
    ///
    /// A chasing pit drops onto an adjacent agent unless the agent already
    /// stands in a hazard cell. Otherwise it picks among vacant neighbors,
    /// the earliest in [`Direction::ALL`] order winning ties.
    ///
    /// Returns `None` when the board has no moving pit, the policy keeps it
    /// still, or every neighboring cell is taken.
    pub fn move_dangerous_object(&mut self) -> Option<HazardStep> {
        let index = self.moving_pit?;
        let from = *self.pits.get(index)?;

        let to = match self.config.hazard_policy {
            HazardPolicy::Stationary => None,
            HazardPolicy::Chase
                if from.is_adjacent(self.agent) && self.cell(self.agent).live_hazard().is_none() =>
            {
                Some(self.agent)
            }
            HazardPolicy::Chase => self.pit_destination(from, Preference::Closer),
            HazardPolicy::Flee => self.pit_destination(from, Preference::Farther),
        }?;

        self.take(from, Token::Pit);
        self.put(to, Token::Pit);
        self.pits[index] = to;
        self.refresh_perceptions();
        debug!(%from, %to, "moving pit advanced");

        Some(HazardStep { from, to })
    }

    fn pit_destination(&self, from: Position, preference: Preference) -> Option<Position> {
        let mut best: Option<Candidate> = None;
        for cell in self.get_moves(from) {
            if !self.is_vacant(cell) {
                continue;
            }
            let candidate = Candidate {
                cell,
                distance: cell.manhattan_distance(self.agent),
            };
            best = Some(match best {
                Some(existing) if !candidate.is_better_than(existing, preference) => existing,
                _ => candidate,
            });
        }
        best.map(|candidate| candidate.cell)
    }

    fn is_vacant(&self, position: Position) -> bool {
        let cell = self.cell(position);
        ![
            Token::Agent,
            Token::Gold,
            Token::Wumpus,
            Token::Pit,
            Token::DeadWumpus,
        ]
        .into_iter()
        .any(|token| cell.contains(token))
    }

    /// Orthogonal in-bounds neighbors of `position` in [`Direction::ALL`] order.
    #[must_use]
    pub fn get_moves(&self, position: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| position.step(direction, self.size))
            .collect()
    }

    /// Cells per board edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    fn cell(&self, position: Position) -> Cell {
        perception::index(self.size, position)
            .and_then(|offset| self.cells.get(offset).copied())
            .unwrap_or(Cell::EMPTY)
    }

    fn put(&mut self, position: Position, token: Token) {
        if let Some(cell) = perception::index(self.size, position)
            .and_then(|offset| self.cells.get_mut(offset))
        {
            cell.insert(token);
        }
    }

    fn take(&mut self, position: Position, token: Token) {
        if let Some(cell) = perception::index(self.size, position)
            .and_then(|offset| self.cells.get_mut(offset))
        {
            cell.remove(token);
        }
    }

    fn refresh_perceptions(&mut self) {
        perception::rebuild(&mut self.cells, self.size, &self.pits, self.wumpus);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Preference {
    Closer,
    Farther,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    cell: Position,
    distance: u32,
}

impl Candidate {
    /// Strict comparison so that earlier neighbors win ties.
    fn is_better_than(self, other: Candidate, preference: Preference) -> bool {
        match preference {
            Preference::Closer => self.distance < other.distance,
            Preference::Farther => self.distance > other.distance,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Refused commands never change state; they surface as rejection events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MoveAgent { direction } => {
            let from = world.agent;
            match world.move_agent(direction) {
                Ok(observation) => {
                    out_events.push(Event::AgentMoved {
                        from,
                        to: observation.cell,
                    });
                    out_events.extend(observation.perceptions().map(|perception| {
                        Event::Perceived {
                            cell: observation.cell,
                            perception,
                        }
                    }));
                    push_game_over(world, out_events);
                }
                Err(error) => out_events.push(Event::MoveRejected { direction, error }),
            }
        }
        Command::ShootArrow { direction } => match world.shoot_arrow(direction) {
            Ok(ShotOutcome::Killed { at }) => out_events.push(Event::WumpusKilled { at }),
            Ok(ShotOutcome::Missed) => out_events.push(Event::ArrowMissed { direction }),
            Err(error) => out_events.push(Event::ShotRejected { direction, error }),
        },
        Command::AdvanceHazard => {
            if let Some(step) = world.move_dangerous_object() {
                out_events.push(Event::HazardMoved {
                    from: step.from,
                    to: step.to,
                });
                push_game_over(world, out_events);
            }
        }
        Command::Reset => match world.reset() {
            Ok(()) => out_events.push(Event::WorldReset { size: world.size }),
            Err(error) => warn!(%error, "reset refused"),
        },
    }
}

fn push_game_over(world: &World, out_events: &mut Vec<Event>) {
    let outcome = world.check_game_over();
    if outcome.is_terminal() {
        out_events.push(Event::GameOver { outcome });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use wumpus_core::{Cell, Layout, Position};

    /// Captures a read-only view of the grid.
    #[must_use]
    pub fn board(world: &World) -> BoardView<'_> {
        BoardView {
            cells: &world.cells,
            size: world.size,
        }
    }

    /// Cells per board edge.
    #[must_use]
    pub fn size(world: &World) -> u32 {
        world.size
    }

    /// Cell currently occupied by the agent.
    #[must_use]
    pub fn agent_position(world: &World) -> Position {
        world.agent
    }

    /// Goal cell holding the gold.
    #[must_use]
    pub fn gold_position(world: &World) -> Position {
        world.gold
    }

    /// Cell of the live Wumpus, if it has not been shot.
    #[must_use]
    pub fn wumpus_position(world: &World) -> Option<Position> {
        world.wumpus
    }

    /// Pits in placement order.
    #[must_use]
    pub fn pit_positions(world: &World) -> &[Position] {
        &world.pits
    }

    /// Current cell of the pit that relocates on hazard steps.
    #[must_use]
    pub fn moving_pit(world: &World) -> Option<Position> {
        world
            .moving_pit
            .and_then(|index| world.pits.get(index).copied())
    }

    /// Whether the arrow can still be fired.
    #[must_use]
    pub fn arrow_available(world: &World) -> bool {
        world.arrow_available
    }

    /// Custom layout reloaded on reset, if the world was built from one.
    #[must_use]
    pub fn layout(world: &World) -> Option<&Layout> {
        world.layout.as_ref()
    }

    /// Read-only view into the dense grid.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BoardView<'a> {
        cells: &'a [Cell],
        size: u32,
    }

    impl<'a> BoardView<'a> {
        /// Cells per board edge.
        #[must_use]
        pub const fn size(&self) -> u32 {
            self.size
        }

        /// Cell stored at `position`, if it lies on the board.
        #[must_use]
        pub fn cell(&self, position: Position) -> Option<Cell> {
            super::perception::index(self.size, position)
                .and_then(|offset| self.cells.get(offset).copied())
        }

        /// Dense cells in row-major order.
        #[must_use]
        pub fn cells(&self) -> &'a [Cell] {
            self.cells
        }

        /// Iterator over the rows of the grid, top to bottom.
        pub fn rows(&self) -> impl Iterator<Item = &'a [Cell]> + 'a {
            self.cells.chunks(self.size.max(1) as usize)
        }

        /// Iterator over every position paired with its cell in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + 'a {
            let size = self.size.max(1);
            self.cells.iter().enumerate().map(move |(offset, cell)| {
                let offset = offset as u32;
                (Position::new(offset / size, offset % size), *cell)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wumpus_core::{DirectionFault, Perception};

    /// Builds a world from ASCII rows using the renderer glyphs.
    fn world_from(rows: &[&str]) -> World {
        world_with(rows, WorldConfig::default())
    }

    fn world_with(rows: &[&str], config: WorldConfig) -> World {
        let rows = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|glyph| match glyph {
                        'A' => Cell::EMPTY.with(Token::Agent),
                        'W' => Cell::EMPTY.with(Token::Wumpus),
                        'P' => Cell::EMPTY.with(Token::Pit),
                        'G' => Cell::EMPTY.with(Token::Gold),
                        _ => Cell::EMPTY,
                    })
                    .collect()
            })
            .collect();
        let layout = Layout::from_rows(rows).expect("valid test layout");
        World::with_layout(config, layout).expect("loadable test layout")
    }

    fn tokens_at(world: &World, row: u32, column: u32) -> Cell {
        query::board(world)
            .cell(Position::new(row, column))
            .expect("cell on board")
    }

    #[test]
    fn random_world_starts_agent_bottom_left() {
        let world = World::new(WorldConfig::new(5, 11));
        assert_eq!(query::agent_position(&world), Position::new(4, 0));
        assert!(tokens_at(&world, 4, 0).contains(Token::Agent));
        assert_eq!(query::pit_positions(&world).len(), 2);
        assert!(query::arrow_available(&world));
    }

    #[test]
    fn same_seed_produces_same_boards() {
        let mut first = World::new(WorldConfig::new(9, 99));
        let mut second = World::new(WorldConfig::new(9, 99));
        assert_eq!(query::board(&first), query::board(&second));

        first.reset().expect("random reset");
        second.reset().expect("random reset");
        assert_eq!(query::board(&first), query::board(&second));
    }

    #[test]
    fn reseed_replays_the_first_board() {
        let mut world = World::new(WorldConfig::new(8, 5));
        let initial = query::board(&world).cells().to_vec();

        world.reset().expect("random reset");
        world.reseed(5);
        world.reset().expect("random reset");

        assert_eq!(query::board(&world).cells(), initial.as_slice());
    }

    #[test]
    fn custom_reset_is_idempotent() {
        let mut world = world_from(&["..G", ".W.", "A.P"]);
        let initial = query::board(&world).cells().to_vec();

        let _ = world.move_agent(Direction::Right).expect("legal move");
        world.reset().expect("custom reset");
        let once = query::board(&world).cells().to_vec();
        world.reset().expect("custom reset");

        assert_eq!(once, initial);
        assert_eq!(query::board(&world).cells(), initial.as_slice());
    }

    #[test]
    fn custom_layout_derives_perceptions() {
        let world = world_from(&["..G", ".W.", "A.P"]);

        assert!(tokens_at(&world, 0, 1).contains(Token::Stench));
        assert!(tokens_at(&world, 2, 1).contains(Token::Stench));
        assert!(tokens_at(&world, 2, 1).contains(Token::Breeze));
        assert!(tokens_at(&world, 1, 2).contains(Token::Breeze));
        assert!(!tokens_at(&world, 1, 1).contains(Token::Stench));
        assert!(!tokens_at(&world, 2, 0).contains(Token::Stench));
    }

    #[test]
    fn move_agent_reports_perceptions() {
        let mut world = world_from(&["..G", ".W.", "A.P"]);

        let observation = world.move_agent(Direction::Right).expect("legal move");

        assert_eq!(observation.cell, Position::new(2, 1));
        assert_eq!(
            observation.perceptions().collect::<Vec<_>>(),
            vec![Perception::Breeze, Perception::Stench]
        );
        assert!(!tokens_at(&world, 2, 0).contains(Token::Agent));
        assert!(tokens_at(&world, 2, 1).contains(Token::Agent));
    }

    #[test]
    fn move_into_wall_is_a_no_op() {
        let mut world = world_from(&["..G", "...", "A.."]);

        assert_eq!(
            world.move_agent(Direction::Left),
            Err(WorldError::InvalidDirection {
                direction: "left".to_owned(),
                fault: DirectionFault::OffGrid,
            })
        );
        assert_eq!(query::agent_position(&world), Position::new(2, 0));
    }

    #[test]
    fn shooting_adjacent_wumpus_clears_every_stench() {
        let mut world = world_from(&["..G", "...", "AW."]);

        assert_eq!(
            world.shoot_arrow(Direction::Right),
            Ok(ShotOutcome::Killed {
                at: Position::new(2, 1)
            })
        );
        assert_eq!(query::wumpus_position(&world), None);
        assert!(tokens_at(&world, 2, 1).contains(Token::DeadWumpus));
        assert!(query::board(&world)
            .cells()
            .iter()
            .all(|cell| !cell.contains(Token::Stench)));
        assert_eq!(
            world.shoot_arrow(Direction::Right),
            Err(WorldError::NoArrowAvailable)
        );
    }

    #[test]
    fn adjacent_arrow_misses_distant_wumpus() {
        let mut world = world_from(&["..G", "...", "A.W"]);

        assert_eq!(world.shoot_arrow(Direction::Right), Ok(ShotOutcome::Missed));
        assert_eq!(query::wumpus_position(&world), Some(Position::new(2, 2)));
        assert!(!query::arrow_available(&world));
    }

    #[test]
    fn line_arrow_reaches_distant_wumpus() {
        let config = WorldConfig::default().with_arrow_flight(ArrowFlight::Line);
        let mut world = world_with(&["..G", "...", "A.W"], config);

        assert_eq!(
            world.shoot_arrow(Direction::Right),
            Ok(ShotOutcome::Killed {
                at: Position::new(2, 2)
            })
        );
    }

    #[test]
    fn shooting_into_wall_keeps_the_arrow() {
        let mut world = world_from(&["..G", "...", "A.W"]);

        assert!(matches!(
            world.shoot_arrow(Direction::Down),
            Err(WorldError::InvalidDirection { .. })
        ));
        assert!(query::arrow_available(&world));
    }

    #[test]
    fn game_over_reports_hazards_and_gold() {
        let mut world = world_from(&["...", "GAP", "..W"]);
        assert_eq!(world.check_game_over(), Outcome::InProgress);

        let _ = world.move_agent(Direction::Right).expect("legal move");
        assert_eq!(world.check_game_over(), Outcome::Defeat(Hazard::Pit));

        let mut world = world_from(&["...", "GAP", "..W"]);
        let _ = world.move_agent(Direction::Left).expect("legal move");
        assert_eq!(world.check_game_over(), Outcome::Victory);
    }

    #[test]
    fn chasing_pit_closes_distance() {
        let mut world = world_from(&["P...", "....", "....", "A..G"]);

        let step = world.move_dangerous_object().expect("pit moves");

        assert_eq!(step.from, Position::new(0, 0));
        assert_eq!(step.to, Position::new(1, 0));
        assert_eq!(query::moving_pit(&world), Some(Position::new(1, 0)));
        assert!(tokens_at(&world, 2, 0).contains(Token::Breeze));
        assert!(!tokens_at(&world, 0, 1).contains(Token::Breeze));
    }

    #[test]
    fn chasing_pit_swallows_adjacent_agent() {
        let mut world = world_from(&["...G", "....", "P...", "A..."]);

        let step = world.move_dangerous_object().expect("pit moves");

        assert_eq!(step.to, Position::new(3, 0));
        assert_eq!(world.check_game_over(), Outcome::Defeat(Hazard::Pit));
    }

    #[test]
    fn fleeing_pit_moves_away() {
        let config = WorldConfig::default().with_hazard_policy(HazardPolicy::Flee);
        let mut world = world_with(&["....", "....", ".P..", "A..G"], config);

        let step = world.move_dangerous_object().expect("pit moves");

        assert_eq!(step.to, Position::new(1, 1));
    }

    #[test]
    fn boxed_in_pit_stays_put() {
        let mut world = world_from(&["PW..", "G...", "....", "A..."]);

        assert_eq!(world.move_dangerous_object(), None);
        assert_eq!(query::moving_pit(&world), Some(Position::new(0, 0)));
    }

    #[test]
    fn stationary_policy_never_moves() {
        let config = WorldConfig::default().with_hazard_policy(HazardPolicy::Stationary);
        let mut world = world_with(&["P..", "...", "A.G"], config);

        assert_eq!(world.move_dangerous_object(), None);
    }

    #[test]
    fn apply_reports_rejections_and_game_over() {
        let mut world = world_from(&["...", "...", "AG."]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAgent {
                direction: Direction::Down,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MoveAgent {
                direction: Direction::Right,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::MoveRejected {
                    direction: Direction::Down,
                    error: WorldError::off_grid(Direction::Down),
                },
                Event::AgentMoved {
                    from: Position::new(2, 0),
                    to: Position::new(2, 1),
                },
                Event::GameOver {
                    outcome: Outcome::Victory,
                },
            ]
        );
    }

    #[test]
    fn get_moves_lists_in_bounds_neighbors() {
        let world = world_from(&["..G", "...", "A.."]);
        assert_eq!(
            world.get_moves(Position::new(2, 0)),
            vec![Position::new(1, 0), Position::new(2, 1)]
        );
        assert_eq!(world.get_moves(Position::new(1, 1)).len(), 4);
    }
}
