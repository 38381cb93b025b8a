use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;
use wumpus_core::{Command, Direction, Outcome, WorldError};
use wumpus_world::{self as world, query, World};

use crate::render;

const PROMPT: &str = "Action (m <dir> to move, d <dir> to shoot, q to quit): ";

/// Single command typed at the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Move(Direction),
    Shoot(Direction),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum ActionError {
    #[error("unknown action '{0}'; use m, d or q")]
    Unknown(String),
    #[error("'{0}' needs a direction (w/a/s/d or up/left/down/right)")]
    MissingDirection(String),
    #[error(transparent)]
    Direction(#[from] WorldError),
}

fn parse_action(line: &str) -> Result<Action, ActionError> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let direction = |verb: &str, word: Option<&str>| -> Result<Direction, ActionError> {
        let word = word.ok_or_else(|| ActionError::MissingDirection(verb.to_owned()))?;
        Ok(word.parse()?)
    };

    match verb.as_str() {
        "m" | "move" => Ok(Action::Move(direction(&verb, words.next())?)),
        "d" | "shoot" => Ok(Action::Shoot(direction(&verb, words.next())?)),
        "q" | "quit" => Ok(Action::Quit),
        _ => Err(ActionError::Unknown(verb)),
    }
}

/// Lets a human play on `world` until the game ends, they quit, or input runs out.
pub(crate) fn run(
    world: &mut World,
    input: impl BufRead,
    output: &mut impl Write,
    hazard_steps: bool,
) -> Result<Outcome> {
    let mut lines = input.lines();

    loop {
        write!(output, "{}", render::board(query::board(world)))?;
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            return Ok(world.check_game_over());
        };

        let command = match parse_action(&line) {
            Ok(Action::Quit) => {
                writeln!(output, "Thanks for playing. Goodbye!")?;
                return Ok(world.check_game_over());
            }
            Ok(Action::Move(direction)) => Command::MoveAgent { direction },
            Ok(Action::Shoot(direction)) => Command::ShootArrow { direction },
            Err(error) => {
                writeln!(output, "{error}")?;
                continue;
            }
        };

        let moved = matches!(command, Command::MoveAgent { .. });
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        if moved && hazard_steps && !world.check_game_over().is_terminal() {
            world::apply(world, Command::AdvanceHazard, &mut events);
        }
        for line in events.iter().filter_map(render::event) {
            writeln!(output, "{line}")?;
        }

        let outcome = world.check_game_over();
        if outcome.is_terminal() {
            write!(output, "{}", render::board(query::board(world)))?;
            return Ok(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wumpus_core::{Cell, Layout, Token};
    use wumpus_world::WorldConfig;

    fn world() -> World {
        let mut rows = vec![vec![Cell::EMPTY; 3]; 3];
        rows[0][2] = Cell::EMPTY.with(Token::Gold);
        rows[1][0] = Cell::EMPTY.with(Token::Wumpus);
        rows[2][0] = Cell::EMPTY.with(Token::Agent);
        let layout = Layout::from_rows(rows).expect("square layout");
        World::with_layout(WorldConfig::default(), layout).expect("valid layout")
    }

    fn play(script: &str) -> (Outcome, String) {
        let mut world = world();
        let mut output = Vec::new();
        let outcome = run(&mut world, Cursor::new(script), &mut output, false).expect("io");
        (outcome, String::from_utf8(output).expect("utf-8"))
    }

    #[test]
    fn parses_actions_and_directions() {
        assert_eq!(parse_action("m w"), Ok(Action::Move(Direction::Up)));
        assert_eq!(parse_action("D right"), Ok(Action::Shoot(Direction::Right)));
        assert_eq!(parse_action(" q "), Ok(Action::Quit));
        assert_eq!(
            parse_action("m"),
            Err(ActionError::MissingDirection("m".to_owned()))
        );
        assert!(matches!(
            parse_action("m north"),
            Err(ActionError::Direction(WorldError::InvalidDirection { .. }))
        ));
        assert_eq!(
            parse_action("jump"),
            Err(ActionError::Unknown("jump".to_owned()))
        );
    }

    #[test]
    fn shooting_then_walking_wins() {
        let (outcome, output) = play("d w\nm w\nm w\nm d\nm d\n");

        assert_eq!(outcome, Outcome::Victory);
        assert!(output.contains("You killed the Wumpus!"));
        assert!(output.contains(&Outcome::Victory.to_string()));
    }

    #[test]
    fn walking_into_the_wumpus_loses() {
        let (outcome, output) = play("m s\nm w\n");

        assert_eq!(outcome, Outcome::Defeat(wumpus_core::Hazard::Wumpus));
        assert!(output.contains("Cannot move down"));
        assert!(output.contains("The Wumpus got you!"));
    }

    #[test]
    fn quitting_leaves_the_game_in_progress() {
        let (outcome, output) = play("hop\nq\n");

        assert_eq!(outcome, Outcome::InProgress);
        assert!(output.contains("unknown action 'hop'"));
        assert!(output.contains("Goodbye"));
    }
}
