//! Sticker-level simulation of N×N×N twisty puzzles: Singmaster-style move
//! notation in, permuted sticker buffers out.
//!
//! The two halves of the crate are [`notation`], which turns move tokens
//! into structured [`Move`] values, and [`cube`], which owns the flat
//! sticker buffer and applies parsed moves to it.

pub mod cube;
pub mod notation;

pub use cube::{Cube, CubeError};
pub use notation::{Axis, Direction, Face, LayerError, Move, parse_move, parse_sequence};
