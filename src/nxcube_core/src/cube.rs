//! The cube engine: a flat buffer of 6·N² sticker symbols plus the
//! permutations that move notation drives over it.
//!
//! Every operation is a pure permutation of the buffer. The four length-N
//! "views" a layer turn cycles are kept as index lists into the one owned
//! buffer; each cycling step reads all four views before writing any of
//! them, so overlapping reads and writes cannot corrupt a turn.

use std::fmt;
use std::iter;

use itertools::Itertools;
use log::trace;
use thiserror::Error;

use crate::notation::{self, Axis, Direction, Face, LayerError, Move, Rule};

// Buffer positions of the six faces.
const U: usize = 0;
const F: usize = 1;
const R: usize = 2;
const B: usize = 3;
const L: usize = 4;
const D: usize = 5;

/// Solved-state color symbol of each face, in buffer order.
const FACE_SYMBOLS: [u8; 6] = *b"WGRBOY";

fn face_position(face: Face) -> Option<usize> {
    match face {
        Face::U => Some(U),
        Face::F => Some(F),
        Face::R => Some(R),
        Face::B => Some(B),
        Face::L => Some(L),
        Face::D => Some(D),
        _ => None,
    }
}

/// An ordered window into the sticker buffer: one row, column or whole
/// face, listed in the traversal order its ring expects.
type View = Vec<usize>;

fn reversed(mut view: View) -> View {
    view.reverse();
    view
}

#[derive(Error, Debug)]
pub enum CubeError {
    /// A token did not match the move grammar.
    #[error("malformed move notation: {0}")]
    MalformedMove(#[from] Box<pest::error::Error<Rule>>),
    /// A serialized state had the wrong length for the cube it was offered
    /// to.
    #[error("expected a state buffer of {expected} bytes but got {actual}")]
    BufferSize { expected: usize, actual: usize },
    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// The mutable puzzle state: `size` is fixed for the cube's lifetime, the
/// sticker buffer holds 6·N² color symbols as six row-major N×N faces in
/// the order U, F, R, B, L, D.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cube {
    n: usize,
    stickers: Vec<u8>,
}

impl Cube {
    /// A solved cube of size `n`, each face filled with its own symbol.
    ///
    /// # Panics
    ///
    /// If `n` is zero.
    #[must_use]
    pub fn new(n: usize) -> Cube {
        assert!(n > 0, "cube size must be positive");

        let stickers = FACE_SYMBOLS
            .into_iter()
            .flat_map(|symbol| iter::repeat_n(symbol, n * n))
            .collect();

        Cube { n, stickers }
    }

    /// A cube of size `n` restored from a previously serialized buffer.
    ///
    /// # Errors
    ///
    /// If the buffer is not exactly `6·n²` bytes long.
    ///
    /// # Panics
    ///
    /// If `n` is zero.
    pub fn from_buffer(n: usize, buffer: &[u8]) -> Result<Cube, CubeError> {
        assert!(n > 0, "cube size must be positive");

        let expected = 6 * n * n;
        if buffer.len() != expected {
            return Err(CubeError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }

        Ok(Cube {
            n,
            stickers: buffer.to_vec(),
        })
    }

    /// Replay an externally produced scramble on a fresh solved cube.
    ///
    /// # Errors
    ///
    /// See [`Cube::apply_sequence`].
    ///
    /// # Panics
    ///
    /// If `n` is zero.
    pub fn scrambled(n: usize, scramble: &str) -> Result<Cube, CubeError> {
        let mut cube = Cube::new(n);
        cube.apply_sequence(scramble)?;
        Ok(cube)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.n
    }

    /// The flat `[face][row][col]` sticker buffer.
    #[must_use]
    pub fn stickers(&self) -> &[u8] {
        &self.stickers
    }

    /// A byte-exact copy of the state, suitable for [`Cube::from_buffer`].
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        self.stickers.clone()
    }

    /// Overwrite the state in place from a serialized buffer.
    ///
    /// # Errors
    ///
    /// If the buffer is not exactly `6·n²` bytes long; the state is left
    /// unchanged in that case.
    pub fn deserialize(&mut self, buffer: &[u8]) -> Result<(), CubeError> {
        if buffer.len() != self.stickers.len() {
            return Err(CubeError::BufferSize {
                expected: self.stickers.len(),
                actual: buffer.len(),
            });
        }

        self.stickers.copy_from_slice(buffer);
        Ok(())
    }

    /// Whether every face is uniformly colored. Which symbol sits on which
    /// face does not matter: a consistently recolored cube still counts.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.stickers
            .chunks_exact(self.n * self.n)
            .all(|face| face.iter().all_equal())
    }

    /// Apply one parsed move.
    ///
    /// # Errors
    ///
    /// If the move's layers cannot be resolved against this cube's size;
    /// the state is left unchanged in that case.
    pub fn apply_move(&mut self, move_: &Move) -> Result<(), CubeError> {
        if move_.face.is_rotation() {
            self.rotate_cube(move_.face.axis(), move_.direction);
            return Ok(());
        }

        let layers = move_.layer_indices(self.n)?;
        for layer in layers {
            self.rotate_layer(move_.face, layer, move_.direction);
        }

        Ok(())
    }

    /// Parse `text` as a whitespace-separated move sequence and apply it
    /// left to right.
    ///
    /// The whole string is parsed before anything is applied, so a
    /// malformed token leaves the state untouched. A parsed move that
    /// cannot be applied to this cube's size aborts the sequence with
    /// every move before it already applied.
    ///
    /// # Errors
    ///
    /// See [`parse_sequence`](notation::parse_sequence) and
    /// [`Cube::apply_move`].
    pub fn apply_sequence(&mut self, text: &str) -> Result<(), CubeError> {
        let moves = notation::parse_sequence(text)?;

        trace!("applying {} moves to a {n}x{n}x{n} cube", moves.len(), n = self.n);
        for move_ in &moves {
            self.apply_move(move_)?;
        }

        Ok(())
    }

    fn index(&self, face: usize, row: usize, col: usize) -> usize {
        face * self.n * self.n + row * self.n + col
    }

    fn row(&self, face: usize, row: usize) -> View {
        (0..self.n).map(|col| self.index(face, row, col)).collect()
    }

    fn col(&self, face: usize, col: usize) -> View {
        (0..self.n).map(|row| self.index(face, row, col)).collect()
    }

    /// A whole face, traversed as if its grid were first rotated by
    /// `quarter_turns` counter-clockwise quarter turns.
    fn oriented_face(&self, face: usize, quarter_turns: u8) -> View {
        let n = self.n;
        let mut view = Vec::with_capacity(n * n);

        for row in 0..n {
            for col in 0..n {
                let (source_row, source_col) = match quarter_turns {
                    0 => (row, col),
                    1 => (col, n - 1 - row),
                    2 => (n - 1 - row, n - 1 - col),
                    3 => (n - 1 - col, row),
                    _ => unreachable!("a quarter turn count is taken modulo 4"),
                };

                view.push(self.index(face, source_row, source_col));
            }
        }

        view
    }

    /// The four views ringing `axis` at depth `layer`, in cycling order.
    /// Which rows and columns run reversed is fixed by how each face's
    /// grid is oriented relative to the shared ring.
    fn ring_views(&self, axis: Axis, layer: usize) -> [View; 4] {
        let n = self.n;

        match axis {
            Axis::Y => [
                self.row(F, layer),
                self.row(L, layer),
                self.row(B, layer),
                self.row(R, layer),
            ],
            Axis::Z => [
                self.row(U, n - 1 - layer),
                self.col(R, layer),
                reversed(self.row(D, layer)),
                reversed(self.col(L, n - 1 - layer)),
            ],
            Axis::X => [
                reversed(self.col(U, n - 1 - layer)),
                self.col(B, layer),
                reversed(self.col(D, n - 1 - layer)),
                reversed(self.col(F, n - 1 - layer)),
            ],
        }
    }

    /// Shift each view's contents into the next view around the ring;
    /// `Double` shifts two steps. All four views are read before any
    /// sticker is written.
    fn cycle_views(&mut self, views: &[View; 4], direction: Direction) {
        debug_assert!(views.iter().map(Vec::len).all_equal());

        let step = match direction {
            Direction::Clockwise => 1,
            Direction::Double => 2,
            Direction::CounterClockwise => 3,
        };

        let old = views
            .iter()
            .map(|view| view.iter().map(|&i| self.stickers[i]).collect_vec())
            .collect_vec();

        for (current, values) in old.into_iter().enumerate() {
            for (&i, value) in views[(current + step) % 4].iter().zip(values) {
                self.stickers[i] = value;
            }
        }
    }

    /// Rotate one face's own N×N sticker grid in place.
    fn rotate_face(&mut self, face: usize, direction: Direction) {
        let n = self.n;
        let base = face * n * n;
        let old = self.stickers[base..base + n * n].to_vec();

        for row in 0..n {
            for col in 0..n {
                let (source_row, source_col) = match direction {
                    Direction::Clockwise => (n - 1 - col, row),
                    Direction::CounterClockwise => (col, n - 1 - row),
                    Direction::Double => (n - 1 - row, n - 1 - col),
                };

                self.stickers[base + row * n + col] = old[source_row * n + source_col];
            }
        }
    }

    /// Turn a single layer. Mirrored faces are numbered from the far side
    /// of their axis, so their rings cycle in the reverse sense; the
    /// face-grid rotation on outer layers keeps the nominal sense.
    fn rotate_layer(&mut self, face: Face, layer: usize, direction: Direction) {
        let views = self.ring_views(face.axis(), layer);
        let ring_direction = if face.mirrored() {
            direction.reversed()
        } else {
            direction
        };

        self.cycle_views(&views, ring_direction);

        if layer == 0 || layer == self.n - 1 {
            if let Some(position) = face_position(face) {
                self.rotate_face(position, direction);
            }
        }
    }

    /// Re-orient the whole cube: cycle a ring of four full side faces and
    /// spin the two faces on the axis in opposite senses.
    fn rotate_cube(&mut self, axis: Axis, direction: Direction) {
        let (views, spun, counter_spun) = match axis {
            Axis::X => (
                [
                    self.oriented_face(U, 0),
                    self.oriented_face(B, 2),
                    self.oriented_face(D, 0),
                    self.oriented_face(F, 0),
                ],
                R,
                L,
            ),
            Axis::Y => (
                [
                    self.oriented_face(F, 0),
                    self.oriented_face(L, 0),
                    self.oriented_face(B, 0),
                    self.oriented_face(R, 0),
                ],
                U,
                D,
            ),
            Axis::Z => (
                [
                    self.oriented_face(U, 0),
                    self.oriented_face(R, 1),
                    self.oriented_face(D, 2),
                    self.oriented_face(L, 3),
                ],
                F,
                B,
            ),
        };

        self.cycle_views(&views, direction);
        self.rotate_face(spun, direction);
        self.rotate_face(counter_spun, direction.reversed());
    }
}

impl fmt::Display for Cube {
    /// The unfolded-cross layout:
    ///
    /// ```text
    ///  U
    /// LFRB
    ///  D
    /// ```
    ///
    /// 3N lines of 4N characters, blank where no face sits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // (block row, block col, face) of the unfolded cross
        const LAYOUT: [(usize, usize, usize); 6] = [
            (0, 1, U),
            (1, 0, L),
            (1, 1, F),
            (1, 2, R),
            (1, 3, B),
            (2, 1, D),
        ];

        let n = self.n;
        for row in 0..3 * n {
            for col in 0..4 * n {
                let face = LAYOUT
                    .iter()
                    .find(|&&(block_row, block_col, _)| {
                        block_row == row / n && block_col == col / n
                    })
                    .map(|&(_, _, face)| face);

                match face {
                    Some(face) => {
                        let symbol = self.stickers[self.index(face, row % n, col % n)];
                        write!(f, "{}", char::from(symbol))?;
                    }
                    None => f.write_str(" ")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
