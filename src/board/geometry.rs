//! Precomputed per-square geometry: distances to the edge, leaper targets and
//! slider rays. Built once on first use and read-only afterwards.

use once_cell::sync::Lazy;

use super::{Bitboard, Color, Square};

/// Sentinel for an off-board leaper target
pub const OFF_BOARD: u8 = 255;

/// Direction order used by every table: N, E, S, W, NE, SE, SW, NW.
pub const DIRECTION_OFFSETS: [i32; 8] = [-8, 1, 8, -1, -7, 9, 7, -9];

pub const NORTH: usize = 0;
pub const EAST: usize = 1;
pub const SOUTH: usize = 2;
pub const WEST: usize = 3;

/// Indices into `DIRECTION_OFFSETS` for rook and bishop movement
pub const ROOK_DIRECTIONS: [usize; 4] = [NORTH, EAST, SOUTH, WEST];
pub const BISHOP_DIRECTIONS: [usize; 4] = [4, 5, 6, 7];

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

pub struct Geometry {
    /// Steps before leaving the board, per square and direction
    pub squares_to_edge: [[u8; 8]; 64],
    /// Knight destinations, `OFF_BOARD` when the jump leaves the board
    pub knight_jumps: [[u8; 8]; 64],
    /// King destinations, `OFF_BOARD` when the step leaves the board
    pub king_steps: [[u8; 8]; 64],
    /// Squares along N, E, S, W from each square, exclusive of the origin
    pub rook_rays: [[u64; 4]; 64],
    /// Squares along NE, SE, SW, NW from each square, exclusive of the origin
    pub bishop_rays: [[u64; 4]; 64],
    pub knight_masks: [u64; 64],
    pub king_masks: [u64; 64],
    /// Squares a pawn of each color attacks from each square
    pub pawn_attacks: [[u64; 64]; 2],
}

fn leaper_targets(sq: usize, deltas: &[(i32, i32); 8]) -> ([u8; 8], u64) {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut targets = [OFF_BOARD; 8];
    let mut mask = 0u64;
    for (slot, (dr, df)) in targets.iter_mut().zip(deltas) {
        let r = rank + dr;
        let f = file + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            let idx = (r * 8 + f) as usize;
            *slot = idx as u8;
            mask |= 1u64 << idx;
        }
    }
    (targets, mask)
}

impl Geometry {
    fn build() -> Self {
        let mut geometry = Geometry {
            squares_to_edge: [[0; 8]; 64],
            knight_jumps: [[OFF_BOARD; 8]; 64],
            king_steps: [[OFF_BOARD; 8]; 64],
            rook_rays: [[0; 4]; 64],
            bishop_rays: [[0; 4]; 64],
            knight_masks: [0; 64],
            king_masks: [0; 64],
            pawn_attacks: [[0; 64]; 2],
        };

        for sq in 0..64 {
            let rank = sq / 8;
            let file = sq % 8;
            let north = rank;
            let south = 7 - rank;
            let west = file;
            let east = 7 - file;
            geometry.squares_to_edge[sq] = [
                north as u8,
                east as u8,
                south as u8,
                west as u8,
                north.min(east) as u8,
                south.min(east) as u8,
                south.min(west) as u8,
                north.min(west) as u8,
            ];

            let (jumps, knight_mask) = leaper_targets(sq, &KNIGHT_DELTAS);
            geometry.knight_jumps[sq] = jumps;
            geometry.knight_masks[sq] = knight_mask;

            let (steps, king_mask) = leaper_targets(sq, &KING_DELTAS);
            geometry.king_steps[sq] = steps;
            geometry.king_masks[sq] = king_mask;

            for (i, &dir) in ROOK_DIRECTIONS.iter().enumerate() {
                geometry.rook_rays[sq][i] = geometry.ray(sq, dir);
            }
            for (i, &dir) in BISHOP_DIRECTIONS.iter().enumerate() {
                geometry.bishop_rays[sq][i] = geometry.ray(sq, dir);
            }

            // White pawns capture toward rank index 0, black toward 7.
            let mut white = 0u64;
            let mut black = 0u64;
            if rank > 0 {
                if file > 0 {
                    white |= 1u64 << (sq - 9);
                }
                if file < 7 {
                    white |= 1u64 << (sq - 7);
                }
            }
            if rank < 7 {
                if file > 0 {
                    black |= 1u64 << (sq + 7);
                }
                if file < 7 {
                    black |= 1u64 << (sq + 9);
                }
            }
            geometry.pawn_attacks[Color::White.index()][sq] = white;
            geometry.pawn_attacks[Color::Black.index()][sq] = black;
        }

        geometry
    }

    fn ray(&self, sq: usize, dir: usize) -> u64 {
        let mut mask = 0u64;
        let mut idx = sq as i32;
        for _ in 0..self.squares_to_edge[sq][dir] {
            idx += DIRECTION_OFFSETS[dir];
            mask |= 1u64 << idx;
        }
        mask
    }

    /// Direction indices whose offsets are negative walk toward lower indices,
    /// so the nearest blocker is the highest set bit.
    #[inline]
    fn decreasing(dir: usize) -> bool {
        DIRECTION_OFFSETS[dir] < 0
    }

    /// Squares a slider on `sq` reaches along `dir`, up to and including the
    /// first occupied square.
    #[inline]
    #[must_use]
    pub fn ray_attacks(&self, sq: Square, dir: usize, occupied: Bitboard) -> Bitboard {
        let ray = if dir < 4 {
            self.rook_rays[sq.index()][dir]
        } else {
            self.bishop_rays[sq.index()][dir - 4]
        };
        let blockers = Bitboard(ray & occupied.0);
        let blocker = if Self::decreasing(dir) {
            blockers.msb()
        } else {
            blockers.lsb()
        };
        match blocker {
            Some(b) => {
                let beyond = if dir < 4 {
                    self.rook_rays[b.index()][dir]
                } else {
                    self.bishop_rays[b.index()][dir - 4]
                };
                Bitboard(ray & !beyond)
            }
            None => Bitboard(ray),
        }
    }

    #[must_use]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        ROOK_DIRECTIONS
            .iter()
            .fold(Bitboard::EMPTY, |acc, &dir| acc | self.ray_attacks(sq, dir, occupied))
    }

    #[must_use]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        BISHOP_DIRECTIONS
            .iter()
            .fold(Bitboard::EMPTY, |acc, &dir| acc | self.ray_attacks(sq, dir, occupied))
    }
}

pub static GEOMETRY: Lazy<Geometry> = Lazy::new(Geometry::build);
