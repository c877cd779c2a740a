//! Alignment parameters and the preprocessed per-engine scoring profile.

use crate::defaults;

/// Gap-penalty model, selected once per context from the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapModel {
    /// Constant cost per gap base.
    Linear = 0,
    /// Gap-open surcharge plus a per-base extend cost.
    Affine = 1,
}

/// Number of gap-penalty models in the variant table.
pub const GAP_MODEL_CNT: usize = 2;

// Helper function to create scoring matrix for the 5-letter alphabet
// (A, C, G, T, N). Row = reference base, column = query base.
pub fn fill_scmat(match_score: i8, mismatch_penalty: i8, ambig_penalty: i8) -> [i8; 25] {
    let mut mat = [0i8; 25];
    let mut k = 0;

    for i in 0..4 {
        for j in 0..4 {
            mat[k] = if i == j {
                match_score
            } else {
                -mismatch_penalty
            };
            k += 1;
        }
        mat[k] = ambig_penalty; // ambiguous base (N)
        k += 1;
    }

    // Last row for N
    for _ in 0..5 {
        mat[k] = ambig_penalty;
        k += 1;
    }

    mat
}

/// User-facing alignment parameters. A zero `gap_open` selects the linear
/// gap model at context creation; anything else selects affine.
#[derive(Debug, Clone)]
pub struct AlignParams {
    /// 5x5 substitution matrix over A, C, G, T, N codes.
    pub mat: [i8; 25],
    /// Gap-open surcharge, charged once per gap run (affine only).
    pub gap_open: i32,
    /// Gap-extend cost, charged per gap base.
    pub gap_extend: i32,
    /// X-drop threshold for fill termination; 0 disables.
    pub xdrop: i32,
}

impl AlignParams {
    /// Build parameters from the four scalar scores, the common case.
    pub fn simple(match_score: i8, mismatch_penalty: i8, gap_open: i32, gap_extend: i32) -> Self {
        AlignParams {
            mat: fill_scmat(match_score, mismatch_penalty, defaults::AMBIG_PENALTY),
            gap_open,
            gap_extend,
            xdrop: defaults::XDROP,
        }
    }
}

impl Default for AlignParams {
    fn default() -> Self {
        AlignParams::simple(
            defaults::MATCH_SCORE,
            defaults::MISMATCH_PENALTY,
            defaults::GAP_OPEN_PENALTY,
            defaults::GAP_EXTEND_PENALTY,
        )
    }
}

/// Preprocessed scoring state owned by one engine root and copied into every
/// handle it spawns. Engines read scores through this, never through
/// `AlignParams`.
#[derive(Debug, Clone, Copy)]
pub struct ScoringProfile {
    mat: [i8; 25],
    gap_open: i32,
    gap_extend: i32,
    xdrop: i32,
}

impl ScoringProfile {
    pub fn new(params: &AlignParams) -> Self {
        ScoringProfile {
            mat: params.mat,
            gap_open: params.gap_open,
            gap_extend: params.gap_extend,
            xdrop: params.xdrop,
        }
    }

    /// Returns the gap-open surcharge
    pub fn gap_open(&self) -> i32 {
        self.gap_open
    }

    /// Returns the per-base gap-extend cost
    pub fn gap_extend(&self) -> i32 {
        self.gap_extend
    }

    /// Returns the X-drop threshold (0 = disabled)
    pub fn xdrop(&self) -> i32 {
        self.xdrop
    }

    /// Substitution score for a pair of encoded bases. Codes above 4 are
    /// clamped onto the N row/column.
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let ai = (a as usize).min(4);
        let bi = (b as usize).min(4);
        self.mat[ai * 5 + bi] as i32
    }
}
