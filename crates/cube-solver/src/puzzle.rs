//! The puzzle model consumed by the search engine, and the reference cube.
//!
//! Searches only need a canonical hashable state, move application, a goal
//! test and a facelet accessor for heuristic sampling. That contract is the
//! [`PuzzleModel`] trait; [`Cube`] implements it for an N x N x N cube.

use std::fmt;
use std::hash::Hash;

use crate::error::{Result, SolverError};
use crate::moves::{Axis, Direction, Move};

/// Number of faces on the cube.
pub const FACE_COUNT: usize = 6;

/// One serialized letter per face colour, indexed by face.
const COLOR_LETTERS: [char; FACE_COUNT] = ['W', 'Y', 'G', 'B', 'O', 'R'];

/// Cube faces, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Up,
    Down,
    Front,
    Back,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; FACE_COUNT] = [
        Face::Up,
        Face::Down,
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Everything the search engine needs from a puzzle.
///
/// A model value is its own canonical state: two values compare equal exactly
/// when they describe the same configuration, so they can key hash maps.
pub trait PuzzleModel: Clone + Eq + Hash + fmt::Debug + Send + Sync {
    /// The goal configuration for a puzzle of the given dimension.
    fn solved(size: usize) -> Self;

    /// Parses the canonical serialized form produced by [`export_state`].
    ///
    /// [`export_state`]: PuzzleModel::export_state
    fn from_state(serialized: &str) -> Result<Self>;

    fn size(&self) -> usize;

    fn export_state(&self) -> String;

    fn is_goal(&self) -> bool;

    fn rotate_horizontal(&mut self, layer: usize, direction: Direction);

    fn rotate_vertical(&mut self, layer: usize, direction: Direction);

    fn rotate_lateral(&mut self, layer: usize, direction: Direction);

    /// Colour at `(face, row, col)`, or `None` when out of range.
    fn facelet(&self, face: usize, row: usize, col: usize) -> Option<u8>;

    /// Applies one move in place.
    fn apply(&mut self, mv: Move) {
        match mv.axis {
            Axis::Horizontal => self.rotate_horizontal(mv.layer, mv.direction),
            Axis::Vertical => self.rotate_vertical(mv.layer, mv.direction),
            Axis::Lateral => self.rotate_lateral(mv.layer, mv.direction),
        }
    }

    /// Returns a copy of this state with `mv` applied.
    fn successor(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.apply(mv);
        next
    }
}

/// An N x N x N cube stored as six N x N facelet grids.
///
/// Facelets are colour indices; in the goal configuration every facelet of
/// face `f` holds colour `f`. Storage is face-major, then row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    size: usize,
    facelets: Box<[u8]>,
}

impl Cube {
    fn index(&self, face: usize, row: usize, col: usize) -> usize {
        face * self.size * self.size + row * self.size + col
    }

    /// Applies a quarter turn to every facelet lying in `layer` along `axis`.
    ///
    /// Facelet centres live on a doubled integer lattice spanning `0..=2n`, so
    /// a layer turn is a 90 degree rotation of those centres about the cube
    /// centre `(n, n, n)`. Layers outside `0..size` leave the cube unchanged.
    fn turn(&mut self, axis: Axis, layer: usize, direction: Direction) {
        let n = self.size;
        if layer >= n {
            return;
        }

        let source = self.facelets.clone();
        for face in Face::ALL {
            for row in 0..n {
                for col in 0..n {
                    let point = lattice_position(n, face, row, col);
                    if !in_layer(n, axis, layer, point) {
                        continue;
                    }
                    let turned = rotate_point(n, axis, direction, point);
                    if let Some((to_face, to_row, to_col)) = lattice_facelet(n, turned) {
                        let from = self.index(face.index(), row, col);
                        let to = self.index(to_face.index(), to_row, to_col);
                        self.facelets[to] = source[from];
                    }
                }
            }
        }
    }
}

impl PuzzleModel for Cube {
    fn solved(size: usize) -> Self {
        let per_face = size * size;
        let facelets = (0..FACE_COUNT * per_face)
            .map(|i| (i / per_face) as u8)
            .collect();
        Self { size, facelets }
    }

    fn from_state(serialized: &str) -> Result<Self> {
        let letters: Vec<char> = serialized.trim().chars().collect();
        if letters.is_empty() || letters.len() % FACE_COUNT != 0 {
            return Err(SolverError::InvalidState(format!(
                "length {} is not a positive multiple of {}",
                letters.len(),
                FACE_COUNT
            )));
        }

        let per_face = letters.len() / FACE_COUNT;
        let size = (1..=per_face)
            .find(|n| n * n >= per_face)
            .filter(|n| n * n == per_face)
            .ok_or_else(|| {
                SolverError::InvalidState(format!("{per_face} facelets per face is not a square"))
            })?;

        let facelets = letters
            .iter()
            .map(|&letter| {
                COLOR_LETTERS
                    .iter()
                    .position(|&c| c == letter.to_ascii_uppercase())
                    .map(|color| color as u8)
                    .ok_or_else(|| SolverError::InvalidState(format!("unknown colour {letter:?}")))
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(Self {
            size,
            facelets: facelets.into_boxed_slice(),
        })
    }

    fn size(&self) -> usize {
        self.size
    }

    fn export_state(&self) -> String {
        self.facelets
            .iter()
            .map(|&color| COLOR_LETTERS[color as usize])
            .collect()
    }

    fn is_goal(&self) -> bool {
        let per_face = self.size * self.size;
        self.facelets
            .iter()
            .enumerate()
            .all(|(i, &color)| color as usize == i / per_face)
    }

    fn rotate_horizontal(&mut self, layer: usize, direction: Direction) {
        self.turn(Axis::Horizontal, layer, direction);
    }

    fn rotate_vertical(&mut self, layer: usize, direction: Direction) {
        self.turn(Axis::Vertical, layer, direction);
    }

    fn rotate_lateral(&mut self, layer: usize, direction: Direction) {
        self.turn(Axis::Lateral, layer, direction);
    }

    fn facelet(&self, face: usize, row: usize, col: usize) -> Option<u8> {
        if face >= FACE_COUNT || row >= self.size || col >= self.size {
            return None;
        }
        Some(self.facelets[self.index(face, row, col)])
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cube({}, {})", self.size, self.export_state())
    }
}

/// Lattice point as `[x, y, z]`: x grows left to right, y bottom to top,
/// z back to front.
type Point = [i64; 3];

/// Centre of a facelet on the doubled lattice.
fn lattice_position(n: usize, face: Face, row: usize, col: usize) -> Point {
    let m = 2 * n as i64;
    let r = 2 * row as i64 + 1;
    let c = 2 * col as i64 + 1;
    match face {
        Face::Up => [c, m, r],
        Face::Down => [c, 0, m - r],
        Face::Front => [c, m - r, m],
        Face::Back => [m - c, m - r, 0],
        Face::Left => [0, m - r, c],
        Face::Right => [m, m - r, m - c],
    }
}

/// Inverse of [`lattice_position`].
fn lattice_facelet(n: usize, [x, y, z]: Point) -> Option<(Face, usize, usize)> {
    let m = 2 * n as i64;
    let cell = |v: i64| usize::try_from((v - 1) / 2).ok();
    let (face, row, col) = if y == m {
        (Face::Up, cell(z)?, cell(x)?)
    } else if y == 0 {
        (Face::Down, cell(m - z)?, cell(x)?)
    } else if z == m {
        (Face::Front, cell(m - y)?, cell(x)?)
    } else if z == 0 {
        (Face::Back, cell(m - y)?, cell(m - x)?)
    } else if x == 0 {
        (Face::Left, cell(m - y)?, cell(z)?)
    } else if x == m {
        (Face::Right, cell(m - y)?, cell(m - z)?)
    } else {
        return None;
    };
    (row < n && col < n).then_some((face, row, col))
}

/// Index of the cubie slab containing a lattice coordinate.
fn slab(n: usize, coordinate: i64) -> usize {
    ((coordinate / 2) as usize).min(n - 1)
}

fn in_layer(n: usize, axis: Axis, layer: usize, [x, y, z]: Point) -> bool {
    match axis {
        Axis::Horizontal => slab(n, y) == n - 1 - layer,
        Axis::Vertical => slab(n, x) == layer,
        Axis::Lateral => slab(n, z) == n - 1 - layer,
    }
}

fn rotate_point(n: usize, axis: Axis, direction: Direction, [x, y, z]: Point) -> Point {
    let centre = n as i64;
    let quarter = |a: i64, b: i64| -> (i64, i64) {
        let (da, db) = (a - centre, b - centre);
        let (ra, rb) = match direction {
            Direction::Forward => (-db, da),
            Direction::Reverse => (db, -da),
        };
        (ra + centre, rb + centre)
    };
    match axis {
        Axis::Horizontal => {
            let (x2, z2) = quarter(x, z);
            [x2, y, z2]
        }
        Axis::Vertical => {
            let (y2, z2) = quarter(y, z);
            [x, y2, z2]
        }
        Axis::Lateral => {
            let (x2, y2) = quarter(x, y);
            [x2, y2, z]
        }
    }
}

/// A size-3 cube with two corner facelets swapped; no move sequence solves it.
#[cfg(test)]
pub(crate) fn unreachable_cube() -> Cube {
    let mut letters: Vec<char> = Cube::solved(3).export_state().chars().collect();
    letters.swap(0, 9);
    let state: String = letters.into_iter().collect();
    Cube::from_state(&state).expect("swapped facelets keep a valid layout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::moves;

    #[test]
    fn test_solved_cube_is_goal() {
        for size in 1..=4 {
            let cube = Cube::solved(size);
            assert!(cube.is_goal());
            assert_eq!(cube.size(), size);
            assert_eq!(cube.export_state().len(), FACE_COUNT * size * size);
        }
    }

    #[test]
    fn test_lattice_round_trip() {
        for n in 1..=4 {
            for face in Face::ALL {
                for row in 0..n {
                    for col in 0..n {
                        let point = lattice_position(n, face, row, col);
                        assert_eq!(lattice_facelet(n, point), Some((face, row, col)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_move_changes_the_goal() {
        for size in 2..=3 {
            let goal = Cube::solved(size);
            for mv in moves(size) {
                assert!(!goal.successor(mv).is_goal(), "{mv} left the cube solved");
            }
        }
    }

    #[test]
    fn test_move_then_inverse_restores() {
        let mut scrambled = Cube::solved(3);
        for mv in [
            Move::new(Axis::Horizontal, 0, Direction::Forward),
            Move::new(Axis::Vertical, 2, Direction::Reverse),
            Move::new(Axis::Lateral, 1, Direction::Forward),
        ] {
            scrambled.apply(mv);
        }

        for mv in moves(3) {
            let round_trip = scrambled.successor(mv).successor(mv.inverse());
            assert_eq!(round_trip, scrambled);
        }
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let start = Cube::solved(3).successor(Move::new(Axis::Vertical, 0, Direction::Forward));
        for mv in moves(3) {
            let mut cube = start.clone();
            for _ in 0..4 {
                cube.apply(mv);
            }
            assert_eq!(cube, start);
        }
    }

    #[test]
    fn test_turns_preserve_colour_counts() {
        let mut cube = Cube::solved(3);
        for mv in moves(3).into_iter().step_by(5) {
            cube.apply(mv);
        }
        let mut counts = [0usize; FACE_COUNT];
        for face in 0..FACE_COUNT {
            for row in 0..3 {
                for col in 0..3 {
                    counts[cube.facelet(face, row, col).unwrap() as usize] += 1;
                }
            }
        }
        assert_eq!(counts, [9; FACE_COUNT]);
    }

    #[test]
    fn test_horizontal_top_layer_moves_side_rows_only() {
        let cube = Cube::solved(3).successor(Move::new(Axis::Horizontal, 0, Direction::Forward));
        // top face keeps its colour, bottom face untouched
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(cube.facelet(Face::Up.index(), row, col), Some(0));
                assert_eq!(cube.facelet(Face::Down.index(), row, col), Some(1));
            }
        }
        // front top row now carries another face's colour, middle row untouched
        let front = Face::Front.index();
        assert_ne!(cube.facelet(front, 0, 1), Some(front as u8));
        assert_eq!(cube.facelet(front, 1, 1), Some(front as u8));
    }

    #[test]
    fn test_middle_layer_leaves_faces_intact() {
        let cube = Cube::solved(3).successor(Move::new(Axis::Lateral, 1, Direction::Reverse));
        assert_eq!(cube.facelet(Face::Front.index(), 1, 1), Some(Face::Front.index() as u8));
        assert_ne!(cube.facelet(Face::Up.index(), 1, 1), Some(Face::Up.index() as u8));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut cube = Cube::solved(2);
        cube.apply(Move::new(Axis::Vertical, 1, Direction::Forward));
        let restored = Cube::from_state(&cube.export_state()).unwrap();
        assert_eq!(restored, cube);
        assert_eq!(Cube::from_state("WWWWYYYYGGGGBBBBOOOORRRR").unwrap(), Cube::solved(2));
    }

    #[test]
    fn test_rejects_malformed_states() {
        assert!(Cube::from_state("").is_err());
        assert!(Cube::from_state("WWWWW").is_err());
        // 12 facelets = 2 per face, not a square
        assert!(Cube::from_state("WWYYGGBBOORR").is_err());
        assert!(Cube::from_state("XWWWYYYYGGGGBBBBOOOORRRR").is_err());
    }

    #[test]
    fn test_facelet_out_of_range() {
        let cube = Cube::solved(2);
        assert_eq!(cube.facelet(6, 0, 0), None);
        assert_eq!(cube.facelet(0, 2, 0), None);
        assert_eq!(cube.facelet(0, 0, 2), None);
    }

    #[test]
    fn test_out_of_range_layer_is_ignored() {
        let mut cube = Cube::solved(2);
        cube.rotate_horizontal(5, Direction::Forward);
        assert!(cube.is_goal());
    }
}
