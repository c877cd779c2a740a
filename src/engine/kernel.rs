//! Banded fill kernel, monomorphized per (gap model, bandwidth).
//!
//! One generic implementation yields the four engine variants. The gap model
//! is a `const` branch the compiler deletes per instantiation; the bandwidth
//! is a `const` parameter bounding every row's column window. Nothing in the
//! cell loop branches on runtime configuration.

use crate::params::ScoringProfile;

/// Compile-time gap-model selector. The linear kernel carries no E/F lanes;
/// the affine kernel pays the open surcharge once per gap run.
pub trait GapScoring: 'static {
    const AFFINE: bool;
}

/// Gap of length k costs k * extend.
pub struct LinearGap;

/// Gap of length k costs open + k * extend.
pub struct AffineGap;

impl GapScoring for LinearGap {
    const AFFINE: bool = false;
}

impl GapScoring for AffineGap {
    const AFFINE: bool = true;
}

/// Sentinel for cells outside the band. Large enough headroom that gap
/// arithmetic cannot wrap.
pub(crate) const NEG_INF: i32 = i32::MIN / 2;

/// Outcome of one banded fill pass over an accumulated section pair.
#[derive(Debug, Clone, Copy)]
pub struct FillExtent {
    /// Best cell score seen; the anchor itself scores 0.
    pub max: i64,
    /// A-side bases consumed at the best cell.
    pub max_a: u32,
    /// B-side bases consumed at the best cell.
    pub max_b: u32,
    /// True when the X-drop cut ended the pass early.
    pub terminated: bool,
}

/// Fill the banded matrix for `a` (rows) against `b` (columns), extension
/// scoring: the DP starts at the anchor with score 0, cells may go negative,
/// and the running maximum over every in-band cell is the result.
///
/// Row `i` touches columns `[i - BW, i + BW]` clamped to the matrix. The two
/// row buffers and the vertical-lane buffer are full-width; cells outside
/// the moving band hold `NEG_INF`, maintained by resetting the band's
/// leading and trailing edge cells as the window slides.
pub fn band_fill<M: GapScoring, const BW: usize>(
    prof: &ScoringProfile,
    a: &[u8],
    b: &[u8],
) -> FillExtent {
    let alen = a.len();
    let blen = b.len();
    let ge = prof.gap_extend();
    let oe = if M::AFFINE { prof.gap_open() + ge } else { ge };

    let mut prev = vec![NEG_INF; blen + 1];
    let mut curr = vec![NEG_INF; blen + 1];
    let mut e_row = if M::AFFINE {
        vec![NEG_INF; blen + 1]
    } else {
        Vec::new()
    };

    // Anchor cell and the first row's gap ramp.
    prev[0] = 0;
    for j in 1..=blen.min(BW) {
        prev[j] = -(oe + (j as i32 - 1) * ge);
    }

    let mut max = 0i64;
    let mut max_a = 0u32;
    let mut max_b = 0u32;
    let mut terminated = false;

    for i in 1..=alen {
        let lo = i.saturating_sub(BW).max(1);
        let hi = (i + BW).min(blen);
        if lo > hi {
            // band has run off the end of B
            break;
        }

        // Column 0 is in band only near the top rows.
        curr[0] = if i <= BW {
            -(oe + (i as i32 - 1) * ge)
        } else {
            NEG_INF
        };
        if lo > 1 {
            // trailing edge left behind by the row before last
            curr[lo - 1] = NEG_INF;
        }
        if hi == i + BW {
            // leading edge the previous row never reached
            prev[hi] = NEG_INF;
            if M::AFFINE {
                e_row[hi] = NEG_INF;
            }
        }

        let mut f = NEG_INF;
        let mut row_best = NEG_INF;
        let ab = a[i - 1];
        for j in lo..=hi {
            let m = prev[j - 1] + prof.score(ab, b[j - 1]);
            let h = if M::AFFINE {
                let e = (prev[j] - oe).max(e_row[j] - ge);
                e_row[j] = e;
                f = (curr[j - 1] - oe).max(f - ge);
                m.max(e).max(f)
            } else {
                let e = prev[j] - ge;
                f = curr[j - 1] - ge;
                m.max(e).max(f)
            };
            curr[j] = h;
            if h > row_best {
                row_best = h;
            }
            if (h as i64) > max {
                max = h as i64;
                max_a = i as u32;
                max_b = j as u32;
            }
        }

        // X-drop: the whole row fell hopelessly behind the running best.
        if prof.xdrop() > 0 && (row_best as i64) < max - prof.xdrop() as i64 {
            terminated = true;
            break;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    FillExtent {
        max,
        max_a,
        max_b,
        terminated,
    }
}
