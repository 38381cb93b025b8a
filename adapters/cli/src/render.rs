use std::fmt::Write as _;

use wumpus_core::{Cell, Event};
use wumpus_world::query::BoardView;

const CELL_WIDTH: usize = 3;

/// Draws the board as a framed grid, one `+---+` border per row.
///
/// Each cell lists its token glyphs in sorted order, truncated to the cell
/// width.
pub(crate) fn board(view: BoardView<'_>) -> String {
    let border = format!("{}+\n", "+---".repeat(view.size() as usize));
    let mut out = border.clone();

    for row in view.rows() {
        out.push('|');
        for cell in row {
            let _ = write!(out, "{:<width$}|", glyphs(*cell), width = CELL_WIDTH);
        }
        out.push('\n');
        out.push_str(&border);
    }

    out
}

/// Player-facing line describing `event`, if it deserves one.
pub(crate) fn event(event: &Event) -> Option<String> {
    match event {
        Event::WorldReset { size } => Some(format!("A new {size}x{size} cave awaits.")),
        Event::AgentMoved { .. } => None,
        Event::Perceived { perception, .. } => Some(perception.to_string()),
        Event::MoveRejected { direction, error } => {
            Some(format!("Cannot move {direction}: {error}"))
        }
        Event::WumpusKilled { .. } => Some("You killed the Wumpus!".to_owned()),
        Event::ArrowMissed { .. } => Some("Your arrow missed.".to_owned()),
        Event::ShotRejected { direction, error } => {
            Some(format!("Cannot shoot {direction}: {error}"))
        }
        Event::HazardMoved { from, to } => {
            Some(format!("The ground shifts: a pit moved from {from} to {to}."))
        }
        Event::GameOver { outcome } => Some(outcome.to_string()),
    }
}

fn glyphs(cell: Cell) -> String {
    let mut glyphs: Vec<char> = cell.tokens().map(|token| token.glyph()).collect();
    glyphs.sort_unstable();
    glyphs.into_iter().take(CELL_WIDTH).collect()
}
