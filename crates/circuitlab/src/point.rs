//! Grid coordinates and footprints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A peg coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point moved by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Netlist node label of the peg at this point.
    pub fn node_label(self) -> String {
        format!("p{}_{}", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

/// Direction of a footprint from its start to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Direction of a straight span, `None` for a point or a diagonal.
    pub fn of_span(start: Point, end: Point) -> Option<Self> {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match (end.x.cmp(&start.x), end.y.cmp(&start.y)) {
            (Equal, Greater) => Some(Direction::North),
            (Equal, Less) => Some(Direction::South),
            (Greater, Equal) => Some(Direction::East),
            (Less, Equal) => Some(Direction::West),
            _ => None,
        }
    }

    /// The point `length` cells away from `start` in this direction, `None`
    /// if a coordinate would overflow.
    pub fn step(self, start: Point, length: i32) -> Option<Point> {
        let (x, y) = match self {
            Direction::North => (Some(start.x), start.y.checked_add(length)),
            Direction::South => (Some(start.x), start.y.checked_sub(length)),
            Direction::East => (start.x.checked_add(length), Some(start.y)),
            Direction::West => (start.x.checked_sub(length), Some(start.y)),
        };
        Some(Point::new(x?, y?))
    }
}

/// Every cell of a straight span, both endpoints included, in ascending order.
///
/// Returns `None` when `start == end` or the span is diagonal.
pub fn footprint(start: Point, end: Point) -> Option<Vec<Point>> {
    Direction::of_span(start, end)?;
    let cells = if start.x != end.x {
        let (lo, hi) = (start.x.min(end.x), start.x.max(end.x));
        (lo..=hi).map(|x| Point::new(x, start.y)).collect()
    } else {
        let (lo, hi) = (start.y.min(end.y), start.y.max(end.y));
        (lo..=hi).map(|y| Point::new(start.x, y)).collect()
    };
    Some(cells)
}

/// Number of cells a straight span covers beyond its start.
pub fn span_length(start: Point, end: Point) -> Option<usize> {
    Direction::of_span(start, end)?;
    let cells = end.x.abs_diff(start.x) + end.y.abs_diff(start.y);
    usize::try_from(cells).ok()
}
