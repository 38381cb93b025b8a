//! Derivation of breeze and stench markers from the hazard index.

use wumpus_core::{Cell, Direction, Position, Token};

/// Clears every perception marker and reinstalls the ones implied by the
/// provided hazards.
///
/// Markers are derived data: the hazard index is the only source of truth, so
/// the board is rebuilt wholesale instead of patched around the moved hazard.
/// Cells holding a live pit or Wumpus never receive a marker.
pub(crate) fn rebuild(cells: &mut [Cell], size: u32, pits: &[Position], wumpus: Option<Position>) {
    for cell in cells.iter_mut() {
        cell.remove(Token::Breeze);
        cell.remove(Token::Stench);
    }

    for &pit in pits {
        mark_neighbors(cells, size, pit, Token::Breeze);
    }

    if let Some(wumpus) = wumpus {
        mark_neighbors(cells, size, wumpus, Token::Stench);
    }
}

fn mark_neighbors(cells: &mut [Cell], size: u32, hazard: Position, marker: Token) {
    for direction in Direction::ALL {
        let Some(neighbor) = hazard.step(direction, size) else {
            continue;
        };
        let Some(cell) = index(size, neighbor).and_then(|offset| cells.get_mut(offset)) else {
            continue;
        };
        if cell.live_hazard().is_none() {
            cell.insert(marker);
        }
    }
}

/// Row-major offset of `position` on a board of `size` cells per edge.
pub(crate) fn index(size: u32, position: Position) -> Option<usize> {
    if position.row() >= size || position.column() >= size {
        return None;
    }
    let row = usize::try_from(position.row()).ok()?;
    let column = usize::try_from(position.column()).ok()?;
    let width = usize::try_from(size).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
