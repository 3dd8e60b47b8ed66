//! Parsing of Singmaster-style move notation into [`Move`] values.
//!
//! A token such as `3Rw2'` breaks down into an optional layer prefix, a
//! face letter, an optional wide marker and an optional turn suffix. The
//! grammar lives in `notation.pest`; everything here is a pure function of
//! its input.

use std::fmt;

use pest::Parser;
use pest::error::{Error, ErrorVariant};
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "./notation.pest"]
struct NotationParser;

fn mk_error(message: impl Into<String>, span: pest::Span<'_>) -> Box<Error<Rule>> {
    Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.into(),
        },
        span,
    ))
}

/// The three physical rotation axes. `X` runs through the R and L faces,
/// `Y` through U and D, `Z` through F and B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// How far a move turns its layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
    Double,
}

impl Direction {
    /// The opposite turning sense. A half turn is its own reverse.
    #[must_use]
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
            Direction::Double => Direction::Double,
        }
    }
}

/// Every face letter the notation knows: the six outer faces, the three
/// middle slices and the three whole-cube rotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    U,
    F,
    R,
    B,
    L,
    D,
    M,
    S,
    E,
    X,
    Y,
    Z,
}

impl Face {
    /// The axis this face's turns spin around.
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Face::R | Face::M | Face::L | Face::X => Axis::X,
            Face::U | Face::E | Face::D | Face::Y => Axis::Y,
            Face::F | Face::S | Face::B | Face::Z => Axis::Z,
        }
    }

    /// Faces whose layers are numbered from the opposite end of their axis
    /// than the rest.
    #[must_use]
    pub fn mirrored(self) -> bool {
        matches!(self, Face::D | Face::B | Face::L | Face::M)
    }

    /// Whole-cube rotations re-orient every layer at once.
    #[must_use]
    pub fn is_rotation(self) -> bool {
        matches!(self, Face::X | Face::Y | Face::Z)
    }

    /// Middle slices touch interior layers only, never an outer face.
    #[must_use]
    pub fn is_middle(self) -> bool {
        matches!(self, Face::M | Face::S | Face::E)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Face::U => "U",
            Face::F => "F",
            Face::R => "R",
            Face::B => "B",
            Face::L => "L",
            Face::D => "D",
            Face::M => "M",
            Face::S => "S",
            Face::E => "E",
            Face::X => "x",
            Face::Y => "y",
            Face::Z => "z",
        })
    }
}

/// A move's layers could not be resolved against a concrete cube size.
#[derive(Error, Debug)]
pub enum LayerError {
    /// Single middle-slice turns need a central layer, which only cubes of
    /// odd size have.
    #[error("a {n}x{n}x{n} cube has no central layer for {face}")]
    NoCenterLayer { face: Face, n: usize },
    #[error("layer {layer} is out of range for a {n}x{n}x{n} cube")]
    OutOfRange { layer: usize, n: usize },
}

/// One parsed move, independent of any cube size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    /// 1-based distance of the outermost affected layer from the move's
    /// face. Meaningless for middle slices and rotations.
    pub layer: usize,
    /// Wide moves turn a contiguous block of layers from the surface
    /// inward instead of a single layer.
    pub wide: bool,
    pub direction: Direction,
}

impl Move {
    /// The axis this move spins around.
    #[must_use]
    pub fn axis(self) -> Axis {
        self.face.axis()
    }

    /// The same move turned the other way; applying both in either order
    /// is a no-op.
    #[must_use]
    pub fn inverted(self) -> Move {
        Move {
            direction: self.direction.reversed(),
            ..self
        }
    }

    /// The 0-based positions along this move's axis that it turns on a
    /// cube of size `n`.
    ///
    /// Rotations span every layer. Wide middle slices span every interior
    /// layer, however many that leaves. Layers of mirrored faces are
    /// mapped to the shared axis numbering before being returned.
    ///
    /// # Errors
    ///
    /// If a single middle slice is asked of an even-sized cube, or the
    /// layer prefix reaches past the far side of the cube.
    pub fn layer_indices(&self, n: usize) -> Result<Vec<usize>, LayerError> {
        if self.face.is_rotation() {
            return Ok((0..n).collect());
        }

        if self.face.is_middle() {
            if self.wide {
                return Ok((1..n.saturating_sub(1)).collect());
            }

            if n % 2 == 0 {
                return Err(LayerError::NoCenterLayer { face: self.face, n });
            }

            return Ok(vec![n / 2]);
        }

        let layer = self.layer.max(1);

        let mut indices = if self.wide {
            if layer == 1 {
                // a bare wide turn grabs the two outermost layers
                vec![0, 1]
            } else {
                (0..layer).collect()
            }
        } else {
            vec![layer - 1]
        };

        if indices.last().is_some_and(|&deepest| deepest >= n) {
            return Err(LayerError::OutOfRange { layer, n });
        }

        if self.face.mirrored() {
            for index in &mut indices {
                *index = n - 1 - *index;
            }
        }

        Ok(indices)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layer > 1 {
            write!(f, "{}", self.layer)?;
        }

        write!(f, "{}", self.face)?;

        if self.wide && !self.face.is_rotation() {
            f.write_str("w")?;
        }

        match self.direction {
            Direction::Clockwise => Ok(()),
            Direction::CounterClockwise => f.write_str("'"),
            Direction::Double => f.write_str("2"),
        }
    }
}

fn face_from_letter(letter: &str) -> Face {
    match letter {
        "U" | "u" => Face::U,
        "F" | "f" => Face::F,
        "R" | "r" => Face::R,
        "B" | "b" => Face::B,
        "L" | "l" => Face::L,
        "D" | "d" => Face::D,
        "M" | "m" => Face::M,
        "S" | "s" => Face::S,
        "E" | "e" => Face::E,
        "x" => Face::X,
        "y" => Face::Y,
        "z" => Face::Z,
        _ => unreachable!("the grammar only emits known face letters"),
    }
}

/// Parse a single move token.
///
/// A layer prefix of `0` means the same as no prefix; the first layer is
/// implicit. Lowercase slice letters and a `w` marker both force the wide
/// form. A `2` suffix always wins: a quote following it is consumed and
/// ignored.
///
/// # Errors
///
/// If the token does not match the move grammar, or its layer prefix does
/// not fit in a machine word.
pub fn parse_move(token: &str) -> Result<Move, Box<Error<Rule>>> {
    let pairs = NotationParser::parse(Rule::move_token, token)
        .map_err(Box::new)?
        .next()
        .unwrap()
        .into_inner();

    let mut layer = 1;
    let mut face = None;
    let mut wide = false;
    let mut direction = Direction::Clockwise;

    for pair in pairs {
        match pair.as_rule() {
            Rule::layer => {
                let Ok(value) = pair.as_str().parse::<usize>() else {
                    return Err(mk_error("layer prefix is too large", pair.as_span()));
                };

                layer = value.max(1);
            }
            Rule::rotation | Rule::outer | Rule::middle => {
                face = Some(face_from_letter(pair.as_str()));
            }
            Rule::outer_wide | Rule::middle_wide => {
                face = Some(face_from_letter(pair.as_str()));
                wide = true;
            }
            Rule::wide => wide = true,
            Rule::double => direction = Direction::Double,
            Rule::prime => {
                if direction == Direction::Clockwise {
                    direction = Direction::CounterClockwise;
                }
            }
            Rule::EOI => {}
            _ => unreachable!("not emitted by the grammar"),
        }
    }

    let Some(face) = face else {
        unreachable!("the grammar requires a face letter");
    };

    Ok(Move {
        face,
        layer,
        wide,
        direction,
    })
}

/// Parse a whitespace-separated sequence of move tokens.
///
/// # Errors
///
/// On the first token that does not parse; see [`parse_move`].
pub fn parse_sequence(text: &str) -> Result<Vec<Move>, Box<Error<Rule>>> {
    text.split_whitespace().map(parse_move).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_token() {
        assert_eq!(
            parse_move("17Rw2'").unwrap(),
            Move {
                face: Face::R,
                layer: 17,
                wide: true,
                direction: Direction::Double,
            }
        );
    }

    #[test]
    fn bare_faces_get_the_defaults() {
        assert_eq!(
            parse_move("L").unwrap(),
            Move {
                face: Face::L,
                layer: 1,
                wide: false,
                direction: Direction::Clockwise,
            }
        );
    }

    #[test]
    fn wide_spellings_agree() {
        assert_eq!(parse_move("r").unwrap(), parse_move("Rw").unwrap());
        assert_eq!(parse_move("m2").unwrap(), parse_move("Mw2").unwrap());
        assert!(parse_move("1212Uw2'").unwrap().wide);
        assert!(!parse_move("1212U2'").unwrap().wide);
        assert_eq!(parse_move("1212Uw2").unwrap().layer, 1212);
    }

    #[test]
    fn rotations_are_never_wide() {
        let move_ = parse_move("x2").unwrap();
        assert_eq!(move_.face, Face::X);
        assert!(!move_.wide);
        assert!(parse_move("xw").is_err());
        assert!(parse_move("X").is_err());
    }

    #[test]
    fn half_turn_wins_over_a_trailing_quote() {
        assert_eq!(parse_move("U2'").unwrap().direction, Direction::Double);
        assert_eq!(
            parse_move("U'").unwrap().direction,
            Direction::CounterClockwise
        );
        assert_eq!(parse_move("U").unwrap().direction, Direction::Clockwise);
    }

    #[test]
    fn zero_layer_prefix_means_the_first_layer() {
        assert_eq!(parse_move("0R").unwrap().layer, 1);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "2'", "Q", "R''", "Rx", "R2x", "w", "3", "R 2", "R'2"] {
            assert!(parse_move(token).is_err(), "{token:?} parsed");
        }
    }

    fn indices(token: &str, n: usize) -> Vec<usize> {
        parse_move(token).unwrap().layer_indices(n).unwrap()
    }

    #[test]
    fn near_faces_count_from_their_own_side() {
        assert_eq!(indices("U", 3), [0]);
        assert_eq!(indices("U", 5), [0]);
        assert_eq!(indices("2U", 9), [1]);
        assert_eq!(indices("3U", 9), [2]);
    }

    #[test]
    fn mirrored_faces_count_from_the_opposite_side() {
        for face in ["L", "D", "B"] {
            assert_eq!(indices(face, 3), [2]);
            assert_eq!(indices(face, 5), [4]);
            assert_eq!(indices(&format!("3{face}"), 11), [8]);
        }
    }

    #[test]
    fn wide_moves_reach_from_the_surface_inward() {
        assert_eq!(indices("Rw", 5), [0, 1]);
        assert_eq!(indices("2Rw", 5), [0, 1]);
        assert_eq!(indices("4Rw", 7), [0, 1, 2, 3]);
        assert_eq!(indices("3Lw", 7), [6, 5, 4]);
    }

    #[test]
    fn middle_slices_stay_interior() {
        for face in ["m", "s", "e"] {
            assert_eq!(indices(face, 3), [1]);
            assert_eq!(indices(face, 5), [1, 2, 3]);
            assert_eq!(indices(face, 7), [1, 2, 3, 4, 5]);
        }
        for face in ["M", "S", "E"] {
            assert_eq!(indices(face, 3), [1]);
            assert_eq!(indices(face, 5), [2]);
            assert_eq!(indices(face, 7), [3]);
        }
    }

    #[test]
    fn single_middle_slices_need_a_central_layer() {
        assert!(matches!(
            parse_move("M").unwrap().layer_indices(4),
            Err(LayerError::NoCenterLayer { face: Face::M, n: 4 })
        ));
        assert_eq!(indices("Mw", 4), [1, 2]);
        assert!(indices("Mw", 2).is_empty());
    }

    #[test]
    fn layers_past_the_far_side_are_rejected() {
        assert!(matches!(
            parse_move("4R").unwrap().layer_indices(3),
            Err(LayerError::OutOfRange { layer: 4, n: 3 })
        ));
        assert!(parse_move("Rw").unwrap().layer_indices(1).is_err());
        assert_eq!(indices("3R", 3), [2]);
    }

    #[test]
    fn rotations_span_the_whole_cube() {
        assert_eq!(indices("x", 4), [0, 1, 2, 3]);
        assert_eq!(indices("y'", 2), [0, 1]);
    }

    #[test]
    fn inversion_flips_the_direction_only() {
        let move_ = parse_move("3Fw'").unwrap();
        assert_eq!(move_.inverted().direction, Direction::Clockwise);
        assert_eq!(move_.inverted().inverted(), move_);

        let half = parse_move("R2").unwrap();
        assert_eq!(half.inverted(), half);
    }

    #[test]
    fn renders_canonical_notation() {
        for token in ["R", "R'", "R2", "3Rw'", "M", "x", "y'", "2Uw2"] {
            assert_eq!(parse_move(token).unwrap().to_string(), token);
        }

        // normalized spellings
        assert_eq!(parse_move("r'").unwrap().to_string(), "Rw'");
        assert_eq!(parse_move("0R").unwrap().to_string(), "R");
        assert_eq!(parse_move("U2'").unwrap().to_string(), "U2");
    }

    #[test]
    fn axes_follow_the_face_layout() {
        assert_eq!(Face::R.axis(), Axis::X);
        assert_eq!(Face::M.axis(), Axis::X);
        assert_eq!(Face::E.axis(), Axis::Y);
        assert_eq!(Face::S.axis(), Axis::Z);
        assert_eq!(Face::Z.axis(), Axis::Z);
    }
}
