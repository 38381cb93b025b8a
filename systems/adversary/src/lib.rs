#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Depth-limited alpha-beta planner that pits the agent against the moving pit.

use tracing::debug;
use wumpus_core::{Cell, Direction, Outcome, Token};
use wumpus_world::{query, World};

const DEFAULT_DEPTH_LIMIT: u32 = 3;
const GOLD_BONUS: f64 = 1000.0;
const ADJACENT_HAZARD_PENALTY: f64 = 100.0;
const ADJACENT_PERCEPTION_PENALTY: f64 = 10.0;

/// How the opponent ply is modelled during the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvironmentModel {
    /// Agent and environment alternate; the environment advances the moving pit.
    #[default]
    HazardStep,
    /// The environment never acts, reducing the search to single-player lookahead.
    Passive,
}

/// Configuration parameters required to construct the planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    depth_limit: u32,
    environment: EnvironmentModel,
}

impl SearchConfig {
    /// Creates a configuration exploring `depth_limit` plies.
    #[must_use]
    pub const fn new(depth_limit: u32, environment: EnvironmentModel) -> Self {
        Self {
            depth_limit,
            environment,
        }
    }

    /// Maximum number of plies, agent and environment alike.
    #[must_use]
    pub const fn depth_limit(&self) -> u32 {
        self.depth_limit
    }

    /// Opponent model used between agent plies.
    #[must_use]
    pub const fn environment(&self) -> EnvironmentModel {
        self.environment
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_LIMIT, EnvironmentModel::default())
    }
}

/// Counters gathered while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, the root included.
    pub nodes: u64,
    /// Sibling lists abandoned because `beta <= alpha`.
    pub cutoffs: u64,
}

/// Result of a single search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    /// Move to play, or `None` at depth zero or when the root is already decided.
    pub best_move: Option<Direction>,
    /// Minimax value of the root position.
    pub value: f64,
    /// Search counters.
    pub stats: SearchStats,
}

/// Planner that searches cloned worlds with alpha-beta pruning.
///
/// The live world is only read to seed the search.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdversarialPlanner {
    config: SearchConfig,
}

impl AdversarialPlanner {
    /// Creates a planner using the supplied configuration.
    #[must_use]
    pub const fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Configuration driving the search.
    #[must_use]
    pub const fn config(&self) -> SearchConfig {
        self.config
    }

    /// Searches from `world` and reports the best agent move.
    ///
    /// Ties go to the first move in [`Direction::ALL`] order. When every move
    /// loses, the first legal move is still returned so the caller always has
    /// something to play.
    #[must_use]
    pub fn decide(&self, world: &World) -> Decision {
        let mut search = Search {
            environment: self.config.environment,
            stats: SearchStats::default(),
        };
        search.stats.nodes = 1;

        let root_outcome = world.check_game_over();
        let (best_move, value) = if self.config.depth_limit == 0 {
            (None, evaluate(world))
        } else if root_outcome.is_terminal() {
            (None, terminal_value(root_outcome))
        } else {
            search.root(world, self.config.depth_limit)
        };

        debug!(
            best_move = ?best_move,
            value,
            nodes = search.stats.nodes,
            cutoffs = search.stats.cutoffs,
            "adversarial search finished"
        );

        Decision {
            best_move,
            value,
            stats: search.stats,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ply {
    Agent,
    Environment,
}

struct Search {
    environment: EnvironmentModel,
    stats: SearchStats,
}

impl Search {
    fn root(&mut self, world: &World, depth: u32) -> (Option<Direction>, f64) {
        let mut best: Option<(Direction, f64)> = None;
        let mut alpha = f64::NEG_INFINITY;

        for direction in Direction::ALL {
            let mut child = world.clone();
            if child.move_agent(direction).is_err() {
                continue;
            }
            let score = self.alpha_beta(
                &child,
                depth - 1,
                alpha,
                f64::INFINITY,
                self.after_agent(),
            );
            if best.map_or(true, |(_, value)| score > value) {
                best = Some((direction, score));
            }
            alpha = alpha.max(score);
        }

        match best {
            Some((direction, value)) => (Some(direction), value),
            None => (None, evaluate(world)),
        }
    }

    fn alpha_beta(
        &mut self,
        world: &World,
        depth: u32,
        mut alpha: f64,
        beta: f64,
        ply: Ply,
    ) -> f64 {
        self.stats.nodes += 1;

        if depth == 0 {
            return evaluate(world);
        }
        let outcome = world.check_game_over();
        if outcome.is_terminal() {
            return terminal_value(outcome);
        }

        match ply {
            Ply::Agent => {
                let mut value = f64::NEG_INFINITY;
                let mut expanded = false;
                for direction in Direction::ALL {
                    let mut child = world.clone();
                    if child.move_agent(direction).is_err() {
                        continue;
                    }
                    expanded = true;
                    let next = self.after_agent();
                    value = value.max(self.alpha_beta(&child, depth - 1, alpha, beta, next));
                    alpha = alpha.max(value);
                    if beta <= alpha {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
                if expanded {
                    value
                } else {
                    evaluate(world)
                }
            }
            // The hazard step is deterministic, so the minimizing ply has a
            // single child and nothing to prune.
            Ply::Environment => {
                let mut child = world.clone();
                let _ = child.move_dangerous_object();
                self.alpha_beta(&child, depth - 1, alpha, beta, Ply::Agent)
            }
        }
    }

    fn after_agent(&self) -> Ply {
        match self.environment {
            EnvironmentModel::HazardStep => Ply::Environment,
            EnvironmentModel::Passive => Ply::Agent,
        }
    }
}

fn terminal_value(outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Victory => f64::INFINITY,
        Outcome::Defeat(_) => f64::NEG_INFINITY,
        Outcome::InProgress | Outcome::Stalemate => 0.0,
    }
}

/// Static score of `world` from the agent's point of view.
///
/// Closer to the gold is better, standing on it is worth a large bonus, and
/// every neighboring hazard or perception costs points. Standing in a live
/// hazard scores negative infinity.
#[must_use]
pub fn evaluate(world: &World) -> f64 {
    let board = query::board(world);
    let agent = query::agent_position(world);
    let here = board.cell(agent).unwrap_or(Cell::EMPTY);
    if here.live_hazard().is_some() {
        return f64::NEG_INFINITY;
    }

    let mut score = -f64::from(agent.manhattan_distance(query::gold_position(world)));
    if here.contains(Token::Gold) {
        score += GOLD_BONUS;
    }

    for neighbor in world.get_moves(agent) {
        let Some(cell) = board.cell(neighbor) else {
            continue;
        };
        if cell.live_hazard().is_some() {
            score -= ADJACENT_HAZARD_PENALTY;
        }
        if cell.contains(Token::Breeze) {
            score -= ADJACENT_PERCEPTION_PENALTY;
        }
        if cell.contains(Token::Stench) {
            score -= ADJACENT_PERCEPTION_PENALTY;
        }
    }

    score
}
