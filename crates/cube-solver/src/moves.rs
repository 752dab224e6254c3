//! Move types and the move catalog.
//!
//! A move turns one layer of the cube a quarter turn about one of three axes.
//! The catalog for a size-`n` puzzle has exactly `6n` moves and is always
//! produced in the same order, which keeps every search reproducible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Turns a row of the side faces about the vertical axis; layer 0 is the top.
    Horizontal,
    /// Turns a column about the left-right axis; layer 0 is the left.
    Vertical,
    /// Turns a slice about the front-back axis; layer 0 is the front.
    Lateral,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Horizontal, Axis::Vertical, Axis::Lateral];

    /// Single-letter tag used in move descriptors.
    pub fn letter(self) -> char {
        match self {
            Axis::Horizontal => 'h',
            Axis::Vertical => 'v',
            Axis::Lateral => 'l',
        }
    }

    fn from_letter(letter: char) -> Option<Axis> {
        match letter.to_ascii_lowercase() {
            'h' => Some(Axis::Horizontal),
            'v' => Some(Axis::Vertical),
            // `s` matches the "sideways" name used by older move lists
            'l' | 's' => Some(Axis::Lateral),
            _ => None,
        }
    }
}

/// Quarter-turn direction. Serialized as `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    /// Direction `0`.
    Reverse,
    /// Direction `1`.
    Forward,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Reverse, Direction::Forward];

    pub fn flip(self) -> Direction {
        match self {
            Direction::Reverse => Direction::Forward,
            Direction::Forward => Direction::Reverse,
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        match direction {
            Direction::Reverse => 0,
            Direction::Forward => 1,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Reverse),
            1 => Ok(Direction::Forward),
            other => Err(format!("direction must be 0 or 1, got {other}")),
        }
    }
}

/// A single layer turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub axis: Axis,
    pub layer: usize,
    pub direction: Direction,
}

impl Move {
    pub fn new(axis: Axis, layer: usize, direction: Direction) -> Self {
        Self {
            axis,
            layer,
            direction,
        }
    }

    /// The move that undoes this one: same axis and layer, opposite direction.
    pub fn inverse(self) -> Move {
        Move {
            direction: self.direction.flip(),
            ..self
        }
    }

    /// True when the move turns one of the two outermost layers.
    pub fn is_outer_layer(self, size: usize) -> bool {
        self.layer == 0 || self.layer + 1 == size
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            Direction::Forward => '+',
            Direction::Reverse => '-',
        };
        write!(f, "{}{}{}", self.axis.letter(), self.layer, sign)
    }
}

/// Parses descriptors such as `h0+`, `v2-` or `l1+`.
impl FromStr for Move {
    type Err = SolverError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let invalid = || SolverError::InvalidMove(descriptor.to_string());
        let trimmed = descriptor.trim();

        let mut chars = trimmed.chars();
        let axis = chars.next().and_then(Axis::from_letter).ok_or_else(invalid)?;
        let direction = match chars.next_back() {
            Some('+') => Direction::Forward,
            Some('-') => Direction::Reverse,
            _ => return Err(invalid()),
        };
        let layer = chars.as_str().parse::<usize>().map_err(|_| invalid())?;

        Ok(Move::new(axis, layer, direction))
    }
}

/// All legal moves for a puzzle of the given size.
///
/// Order: axis, then direction, then layer.
pub fn moves(size: usize) -> Vec<Move> {
    let mut catalog = Vec::with_capacity(6 * size);
    for axis in Axis::ALL {
        for direction in Direction::ALL {
            for layer in 0..size {
                catalog.push(Move::new(axis, layer, direction));
            }
        }
    }
    catalog
}

/// Inverts a move sequence: the result undoes `path` when applied after it.
pub fn invert_path(path: &[Move]) -> Vec<Move> {
    path.iter().rev().map(|mv| mv.inverse()).collect()
}
