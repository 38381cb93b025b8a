use std::{fs, io, path::Path};

use thiserror::Error;
use wumpus_core::{Cell, Layout, Token, WorldError};

const GROUP_OPEN: char = '[';
const GROUP_CLOSE: char = ']';

/// Errors that can occur while loading a board file.
#[derive(Debug, Error)]
pub(crate) enum BoardFileError {
    /// The file could not be read.
    #[error("could not read board file: {0}")]
    Unreadable(#[from] io::Error),
    /// The file contained no rows.
    #[error("board file is empty")]
    Empty,
    /// A `[` group was never closed.
    #[error("row {row}: bracket opened at column {column} is never closed")]
    UnterminatedGroup {
        /// One-based row number, blank lines skipped.
        row: usize,
        /// One-based character offset of the `[`.
        column: usize,
    },
    /// A `[` group contained a character that is not a token.
    #[error("row {row}: '{token}' is not a board token")]
    UnknownToken {
        /// One-based row number, blank lines skipped.
        row: usize,
        /// Offending character.
        token: char,
    },
    /// The rows do not describe a square or supported board.
    #[error(transparent)]
    Layout(#[from] WorldError),
}

/// Reads and parses the board stored at `path`.
pub(crate) fn load(path: &Path) -> Result<Layout, BoardFileError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parses a board description.
///
/// Every non-blank line is one row. A character is one cell, and a bracketed
/// group such as `[AG]` is one cell holding several tokens. Outside brackets
/// any character that is not a token marks an empty cell.
pub(crate) fn parse(text: &str) -> Result<Layout, BoardFileError> {
    let rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| parse_row(index + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(BoardFileError::Empty);
    }
    Ok(Layout::from_rows(rows)?)
}

fn parse_row(row: usize, line: &str) -> Result<Vec<Cell>, BoardFileError> {
    let mut cells = Vec::new();
    let mut chars = line.char_indices();

    while let Some((offset, glyph)) = chars.next() {
        if glyph != GROUP_OPEN {
            cells.push(token(glyph).map_or(Cell::EMPTY, |token| Cell::EMPTY.with(token)));
            continue;
        }

        let mut cell = Cell::EMPTY;
        let mut closed = false;
        for (_, inner) in chars.by_ref() {
            if inner == GROUP_CLOSE {
                closed = true;
                break;
            }
            match token(inner) {
                Some(token) => cell.insert(token),
                None => return Err(BoardFileError::UnknownToken { row, token: inner }),
            }
        }
        if !closed {
            return Err(BoardFileError::UnterminatedGroup {
                row,
                column: offset + 1,
            });
        }
        cells.push(cell);
    }

    Ok(cells)
}

fn token(glyph: char) -> Option<Token> {
    match glyph {
        'A' => Some(Token::Agent),
        'W' => Some(Token::Wumpus),
        'O' | 'P' => Some(Token::Pit),
        'G' => Some(Token::Gold),
        'b' => Some(Token::Breeze),
        's' => Some(Token::Stench),
        _ => None,
    }
}
