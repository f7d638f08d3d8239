//! Zobrist hashing constants for chess positions.
//!
//! Keys are drawn from a PRNG with a fixed seed so that identical positions
//! hash identically across program runs and across the FEN-parse and
//! `do_move` construction paths.

use rand::prelude::*;

pub(crate) struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    // One key per castling-rights bitmask value; index 0 (no rights) is zero
    // so that hashes do not shift for positions without castling.
    pub(crate) castling_keys: [u64; 16],
    // en_passant_keys[file_index] (only the file of the EP target matters)
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x9e37_79b9_7f4a_7c15);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        let mut castling_keys = [0u64; 16];
        let mut en_passant_keys = [0u64; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for key in castling_keys.iter_mut().skip(1) {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }
}

pub(crate) static ZOBRIST: std::sync::LazyLock<ZobristKeys> =
    std::sync::LazyLock::new(ZobristKeys::new);
