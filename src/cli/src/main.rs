use std::num::NonZeroUsize;

use clap::Parser;
use itertools::Itertools;
use log::debug;
use nxcube_core::{Cube, CubeError, parse_move};
use owo_colors::{DynColors, OwoColorize};

/// Drives N×N×N twisty-puzzle states from Singmaster move notation
#[derive(Parser)]
#[command(version, about)]
enum Commands {
    /// Apply a move sequence to a solved cube and print the outcome
    Apply {
        /// Cube size
        #[arg(short = 'n', long, default_value = "3")]
        size: NonZeroUsize,
        /// Whitespace-separated move sequence, e.g. "R U R' U'"
        sequence: String,
        /// Print the raw state buffer instead of the unfolded net
        #[arg(long)]
        raw: bool,
    },
    /// Apply a move sequence to a previously serialized state
    Replay {
        /// Cube size
        #[arg(short = 'n', long, default_value = "3")]
        size: NonZeroUsize,
        /// State buffer of 6·n² color symbols, as printed by `apply --raw`
        state: String,
        /// Whitespace-separated move sequence
        sequence: String,
        /// Print the raw state buffer instead of the unfolded net
        #[arg(long)]
        raw: bool,
    },
    /// Parse a move sequence and print how each token is interpreted
    Parse {
        /// Cube size the layer indices are resolved against
        #[arg(short = 'n', long, default_value = "3")]
        size: NonZeroUsize,
        /// Whitespace-separated move sequence
        sequence: String,
    },
}

fn main() -> color_eyre::Result<()> {
    pretty_env_logger::init();

    match Commands::parse() {
        Commands::Apply {
            size,
            sequence,
            raw,
        } => {
            let n = size.get();
            debug!("applying to a solved {n}x{n}x{n}");

            let mut cube = Cube::new(n);
            cube.apply_sequence(&sequence)?;
            report(&cube, raw);
        }
        Commands::Replay {
            size,
            state,
            sequence,
            raw,
        } => {
            let mut cube = Cube::from_buffer(size.get(), state.trim().as_bytes())?;
            cube.apply_sequence(&sequence)?;
            report(&cube, raw);
        }
        Commands::Parse { size, sequence } => {
            for token in sequence.split_whitespace() {
                let move_ = parse_move(token).map_err(CubeError::from)?;
                let layers = move_.layer_indices(size.get()).map_err(CubeError::from)?;

                println!(
                    "{token:>8}  {move_:?}  layers [{}]",
                    layers.iter().join(", ")
                );
            }
        }
    }

    Ok(())
}

fn report(cube: &Cube, raw: bool) {
    if raw {
        println!("{}", String::from_utf8_lossy(cube.stickers()));
    } else {
        print_net(cube);
    }

    if cube.is_solved() {
        println!("{}", "solved".green());
    } else {
        println!("{}", "not solved".red());
    }
}

fn print_net(cube: &Cube) {
    for line in cube.to_string().lines() {
        for symbol in line.chars() {
            match background(symbol) {
                Some(color) => print!("{}", symbol.on_color(color)),
                None => print!(" "),
            }
        }
        println!();
    }
}

/// Background colors keyed by sticker symbol, from the xterm-256 palette.
fn background(symbol: char) -> Option<DynColors> {
    Some(match symbol {
        'W' => DynColors::Rgb(255, 255, 255),
        'G' => DynColors::Rgb(0, 128, 0),
        'R' => DynColors::Rgb(255, 0, 0),
        'B' => DynColors::Rgb(0, 0, 128),
        'O' => DynColors::Rgb(215, 95, 0),
        'Y' => DynColors::Rgb(255, 215, 0),
        _ => return None,
    })
}
