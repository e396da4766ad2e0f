//! Placement rules for component footprints.

use crate::board::Board;
use crate::point::{Direction, Point, footprint};

/// Whether segment B, turned to start where segment A starts, heads the
/// same way as A along either axis.
///
/// B is assumed to share an endpoint with A's start.
pub fn lines_overlap(start_a: Point, end_a: Point, start_b: Point, end_b: Point) -> bool {
    let (start_c, end_c) = if start_a == start_b {
        (start_b, end_b)
    } else {
        (end_b, start_b)
    };
    let (ax, ay) = (end_a.x - start_a.x, end_a.y - start_a.y);
    let (cx, cy) = (end_c.x - start_c.x, end_c.y - start_c.y);

    (cx > 0 && ax > 0) || (cx < 0 && ax < 0) || (cy > 0 && ay > 0) || (cy < 0 && ay < 0)
}

/// Any component already at `from` that would run along the candidate span.
fn overlaps_at(board: &Board, from: Point, to: Point) -> bool {
    let Some(peg) = board.peg(from) else {
        return true;
    };
    peg.components().iter().any(|&id| {
        board
            .component(id)
            .is_some_and(|placed| lines_overlap(from, to, placed.start(), placed.end()))
    })
}

/// Whether a component of `length` cells may occupy the span `start..=end`.
///
/// Checked from both endpoints, so the answer does not depend on which end
/// the caller names first.
pub fn is_slot_free(board: &Board, start: Point, end: Point, length: usize) -> bool {
    // Both endpoints on the board bound every cell between them.
    if !board.contains(start) || !board.contains(end) {
        return false;
    }
    let Some(cells) = footprint(start, end) else {
        return false;
    };

    if overlaps_at(board, start, end) || overlaps_at(board, end, start) {
        return false;
    }

    // Interior cells must be bare.
    if length > 1 {
        for cell in cells.iter().skip(1).take(length - 1) {
            match board.peg(*cell) {
                Some(peg) if peg.is_empty() => {}
                _ => return false,
            }
        }
    }

    for &cell_a in &cells {
        if board.peg(cell_a).is_some_and(|peg| peg.is_blocked()) {
            return false;
        }
        for &cell_b in &cells {
            if cell_b == cell_a {
                continue;
            }
            let Some(peg_b) = board.peg(cell_b) else {
                return false;
            };
            // A component already joining two cells of this span.
            let joined = peg_b.components().iter().any(|&id| {
                board
                    .component(id)
                    .is_some_and(|placed| placed.start() == cell_a || placed.end() == cell_a)
            });
            if joined {
                return false;
            }
        }
    }

    true
}

/// How many of the four axis directions from `start` admit a free span of
/// `length` cells.
pub fn free_component_slots(board: &Board, start: Point, length: usize) -> usize {
    let Ok(reach) = i32::try_from(length) else {
        return 0;
    };
    Direction::ALL
        .iter()
        .filter_map(|dir| dir.step(start, reach))
        .filter(|&end| is_slot_free(board, start, end, length))
        .count()
}

/// Set or clear `blocked` on the interior cells of a span.
pub fn block_pegs(board: &mut Board, start: Point, end: Point, block: bool) {
    let Some(cells) = footprint(start, end) else {
        return;
    };
    let interior = cells.len().saturating_sub(2);
    for cell in cells.into_iter().skip(1).take(interior) {
        if let Some(peg) = board.peg_mut(cell) {
            peg.set_blocked(block);
        }
    }
}
