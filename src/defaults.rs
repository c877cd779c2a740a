// src/defaults.rs

// Band Geometry
pub const BW_NARROW: usize = 16;
pub const BW_WIDE: usize = 32;

// Scoring Constants
pub const MATCH_SCORE: i8 = 1;
pub const MISMATCH_PENALTY: i8 = 1;
pub const GAP_OPEN_PENALTY: i32 = 1;
pub const GAP_EXTEND_PENALTY: i32 = 1;
pub const AMBIG_PENALTY: i8 = -1;

// Fill Termination
pub const XDROP: i32 = 100;
