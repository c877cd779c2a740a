//! Banded traceback: path recovery, segment bookkeeping, and recombination.
//!
//! The fill kernel keeps only the running maximum; everything positional is
//! recovered here by re-running the band with move recording and walking it
//! back from the best cell.

use crate::cigar::path_bit;
use crate::engine::context::FillState;
use crate::engine::kernel::{band_fill, GapScoring, NEG_INF};
use crate::engine::types::{Alignment, Segment, TraceParams};
use crate::params::ScoringProfile;

// Traceback move codes
pub(crate) const TB_MATCH: u8 = 0;
pub(crate) const TB_DEL: u8 = 1; // horizontal step, consumes B only
pub(crate) const TB_INS: u8 = 2; // vertical step, consumes A only

/// Bit-packed path under construction, LSB-first within each word.
pub(crate) struct PathBuilder {
    words: Vec<u32>,
    len: u32,
}

impl PathBuilder {
    pub(crate) fn new() -> Self {
        PathBuilder {
            words: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub(crate) fn push_bit(&mut self, bit: u32) {
        let w = (self.len >> 5) as usize;
        if w == self.words.len() {
            self.words.push(0);
        }
        if bit != 0 {
            self.words[w] |= 1 << (self.len & 31);
        }
        self.len += 1;
    }

    /// Append one traceback step: diagonal = (1, 0), B-only = 1, A-only = 0.
    pub(crate) fn push_step(&mut self, code: u8) {
        match code {
            TB_MATCH => {
                self.push_bit(1);
                self.push_bit(0);
            }
            TB_DEL => self.push_bit(1),
            TB_INS => self.push_bit(0),
            _ => unreachable!("invalid traceback code {code}"),
        }
    }

    pub(crate) fn extend_bits(&mut self, path: &[u32], offset: u32, len: u32) {
        for k in 0..len {
            self.push_bit(path_bit(path, offset + k));
        }
    }

    pub(crate) fn finish(self) -> (Vec<u32>, u32) {
        (self.words, self.len)
    }
}

/// Bits one step contributes to the path.
fn step_bits(code: u8) -> u32 {
    if code == TB_MATCH {
        2
    } else {
        1
    }
}

/// Re-run the banded DP with move recording and walk back from the given
/// end cell. Returns the step codes in forward (anchor-to-end) order.
///
/// The affine walk needs lane-continuation flags on top of the H-level
/// moves: the H code only marks where a gap run bottoms out, not how far it
/// extends.
pub(crate) fn band_trace<M: GapScoring, const BW: usize>(
    prof: &ScoringProfile,
    a: &[u8],
    b: &[u8],
    end_a: u32,
    end_b: u32,
) -> Vec<u8> {
    let alen = a.len();
    let blen = b.len();
    let ge = prof.gap_extend();
    let oe = if M::AFFINE { prof.gap_open() + ge } else { ge };

    let mut tb = vec![vec![u8::MAX; blen + 1]; alen + 1];
    let (mut tbe, mut tbf) = if M::AFFINE {
        (
            vec![vec![0u8; blen + 1]; alen + 1],
            vec![vec![0u8; blen + 1]; alen + 1],
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let mut prev = vec![NEG_INF; blen + 1];
    let mut curr = vec![NEG_INF; blen + 1];
    let mut e_row = if M::AFFINE {
        vec![NEG_INF; blen + 1]
    } else {
        Vec::new()
    };

    prev[0] = 0;
    for j in 1..=blen.min(BW) {
        prev[j] = -(oe + (j as i32 - 1) * ge);
        tb[0][j] = TB_DEL;
        if M::AFFINE && j >= 2 {
            tbf[0][j] = 1;
        }
    }

    let mut max = 0i64;
    for i in 1..=alen {
        let lo = i.saturating_sub(BW).max(1);
        let hi = (i + BW).min(blen);
        if lo > hi {
            break;
        }

        if i <= BW {
            curr[0] = -(oe + (i as i32 - 1) * ge);
            tb[i][0] = TB_INS;
            if M::AFFINE && i >= 2 {
                tbe[i][0] = 1;
            }
        } else {
            curr[0] = NEG_INF;
        }
        if lo > 1 {
            curr[lo - 1] = NEG_INF;
        }
        if hi == i + BW {
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
            let (e, fo) = if M::AFFINE {
                let e_ext = e_row[j] - ge;
                let e_open = prev[j] - oe;
                tbe[i][j] = (e_ext > e_open) as u8;
                let e = e_ext.max(e_open);
                e_row[j] = e;
                let f_ext = f - ge;
                let f_open = curr[j - 1] - oe;
                tbf[i][j] = (f_ext > f_open) as u8;
                f = f_ext.max(f_open);
                (e, f)
            } else {
                f = curr[j - 1] - ge;
                (prev[j] - ge, f)
            };
            // prefer the horizontal lane over the vertical on ties: adjacent
            // opposing gap runs then always come out A-only first, which the
            // path encoding requires for unambiguous decoding
            let (h, code) = if m >= e && m >= fo {
                (m, TB_MATCH)
            } else if fo >= e {
                (fo, TB_DEL)
            } else {
                (e, TB_INS)
            };
            tb[i][j] = code;
            curr[j] = h;
            if h > row_best {
                row_best = h;
            }
            if (h as i64) > max {
                max = h as i64;
            }
        }

        if prof.xdrop() > 0 && (row_best as i64) < max - prof.xdrop() as i64 {
            break;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    // Walk back from the end cell. lane 0 = H, 1 = vertical run, 2 =
    // horizontal run.
    let mut steps = Vec::new();
    let mut i = end_a as usize;
    let mut j = end_b as usize;
    let mut lane = 0u8;
    let guard_max = 3 * (alen + blen) + 8;
    let mut guard = 0usize;
    while i > 0 || j > 0 {
        guard += 1;
        if guard > guard_max {
            log::warn!("traceback exceeded {guard_max} steps at ({i}, {j}); path truncated");
            break;
        }
        match lane {
            1 => {
                steps.push(TB_INS);
                let cont = M::AFFINE && tbe[i][j] != 0;
                i -= 1;
                if !cont {
                    lane = 0;
                }
            }
            2 => {
                steps.push(TB_DEL);
                let cont = M::AFFINE && tbf[i][j] != 0;
                j -= 1;
                if !cont {
                    lane = 0;
                }
            }
            _ => match tb[i][j] {
                TB_MATCH => {
                    steps.push(TB_MATCH);
                    i -= 1;
                    j -= 1;
                }
                TB_INS => lane = 1,
                TB_DEL => lane = 2,
                _ => {
                    log::warn!("traceback left the band at ({i}, {j}); path truncated");
                    break;
                }
            },
        }
    }
    steps.reverse();
    steps
}

/// One traced tail: steps, per-section segments (path offsets relative to
/// the part), and tallies.
pub(crate) struct TracePart {
    pub steps: Vec<u8>,
    pub segments: Vec<Segment>,
    pub path_score: i64,
    pub mismatches: u32,
    pub gap_opens: u32,
    pub gap_bases: u32,
    pub bits: u32,
}

/// Trace one fill state back from its best cell.
pub(crate) fn build_part<M: GapScoring, const BW: usize>(
    prof: &ScoringProfile,
    st: &FillState,
) -> TracePart {
    let ext = band_fill::<M, BW>(prof, &st.a.acc, &st.b.acc);
    let steps = band_trace::<M, BW>(prof, &st.a.acc, &st.b.acc, ext.max_a, ext.max_b);
    let part = segmentize(prof, st, steps, M::AFFINE);
    debug_assert_eq!(
        part.path_score, ext.max,
        "traced path score disagrees with the fill maximum"
    );
    part
}

/// Cursor for the segment being accumulated during the walk.
#[derive(Clone, Copy)]
struct SegCursor {
    ai: u32,
    bi: u32,
    bit: u32,
    score: i64,
    mismatches: u32,
}

/// Walk the steps once, scoring them and splitting the path into maximal
/// runs within a single section pair.
fn segmentize(prof: &ScoringProfile, st: &FillState, steps: Vec<u8>, affine: bool) -> TracePart {
    let a_starts = st.a.span_starts();
    let b_starts = st.b.span_starts();
    let a = &st.a.acc;
    let b = &st.b.acc;

    let mut segments = Vec::new();
    let mut score = 0i64;
    let mut mismatches = 0u32;
    let mut gap_opens = 0u32;
    let mut gap_bases = 0u32;

    let mut ai = 0u32;
    let mut bi = 0u32;
    let mut bit = 0u32;
    let mut sa = 0usize;
    let mut sb = 0usize;
    let mut open = SegCursor {
        ai: 0,
        bi: 0,
        bit: 0,
        score: 0,
        mismatches: 0,
    };
    let mut prev_step = u8::MAX;

    fn close(
        segments: &mut Vec<Segment>,
        st: &FillState,
        a_starts: &[u32],
        b_starts: &[u32],
        sa: usize,
        sb: usize,
        open: &SegCursor,
        ai: u32,
        bi: u32,
        bit: u32,
    ) {
        segments.push(Segment {
            a_id: st.a.spans[sa].id,
            b_id: st.b.spans[sb].id,
            apos: st.a.spans[sa].sec_off + (open.ai - a_starts[sa]),
            bpos: st.b.spans[sb].sec_off + (open.bi - b_starts[sb]),
            alen: ai - open.ai,
            blen: bi - open.bi,
            ppos: open.bit,
            plen: bit - open.bit,
            score: open.score,
            mismatches: open.mismatches,
        });
    }

    for &code in &steps {
        // crossing into the next span on either side closes the segment
        let crosses_a = code != TB_DEL && ai >= a_starts[sa + 1];
        let crosses_b = code != TB_INS && bi >= b_starts[sb + 1];
        if (crosses_a || crosses_b) && (ai > open.ai || bi > open.bi) {
            close(
                &mut segments,
                st,
                &a_starts,
                &b_starts,
                sa,
                sb,
                &open,
                ai,
                bi,
                bit,
            );
            open = SegCursor {
                ai,
                bi,
                bit,
                score: 0,
                mismatches: 0,
            };
        }
        if crosses_a {
            sa += 1;
        }
        if crosses_b {
            sb += 1;
        }

        let mut delta = 0i64;
        match code {
            TB_MATCH => {
                delta += prof.score(a[ai as usize], b[bi as usize]) as i64;
                if a[ai as usize] != b[bi as usize] {
                    open.mismatches += 1;
                    mismatches += 1;
                }
                ai += 1;
                bi += 1;
            }
            TB_INS => {
                if prev_step != TB_INS {
                    gap_opens += 1;
                    if affine {
                        delta -= prof.gap_open() as i64;
                    }
                }
                delta -= prof.gap_extend() as i64;
                gap_bases += 1;
                ai += 1;
            }
            TB_DEL => {
                if prev_step != TB_DEL {
                    gap_opens += 1;
                    if affine {
                        delta -= prof.gap_open() as i64;
                    }
                }
                delta -= prof.gap_extend() as i64;
                gap_bases += 1;
                bi += 1;
            }
            _ => unreachable!("invalid traceback code {code}"),
        }
        score += delta;
        open.score += delta;
        bit += step_bits(code);
        prev_step = code;
    }

    if ai > open.ai || bi > open.bi {
        close(
            &mut segments,
            st,
            &a_starts,
            &b_starts,
            sa,
            sb,
            &open,
            ai,
            bi,
            bit,
        );
    }

    TracePart {
        steps,
        segments,
        path_score: score,
        mismatches,
        gap_opens,
        gap_bases,
        bits: bit,
    }
}

/// Join an optional reverse part (steps reversed, segments mirrored) with
/// the forward part into one alignment.
pub(crate) fn assemble(
    fw: Option<TracePart>,
    rv: Option<TracePart>,
    params: Option<&TraceParams>,
) -> Option<Box<Alignment>> {
    let mut pb = PathBuilder::new();
    let mut segments = Vec::new();
    let mut score = 0i64;
    let mut mismatches = 0u32;
    let mut gap_opens = 0u32;
    let mut gap_bases = 0u32;

    if let Some(rv) = &rv {
        for &code in rv.steps.iter().rev() {
            pb.push_step(code);
        }
        for seg in rv.segments.iter().rev() {
            segments.push(Segment {
                ppos: rv.bits - seg.ppos - seg.plen,
                ..*seg
            });
        }
        score += rv.path_score;
        mismatches += rv.mismatches;
        gap_opens += rv.gap_opens;
        gap_bases += rv.gap_bases;
    }
    let base = pb.len();
    if let Some(fw) = &fw {
        for &code in &fw.steps {
            pb.push_step(code);
        }
        for seg in &fw.segments {
            segments.push(Segment {
                ppos: seg.ppos + base,
                ..*seg
            });
        }
        score += fw.path_score;
        mismatches += fw.mismatches;
        gap_opens += fw.gap_opens;
        gap_bases += fw.gap_bases;
    }

    let (path, path_len) = pb.finish();
    if let Some(p) = params {
        if path_len < p.min_path_len {
            return None;
        }
    }
    Some(Box::new(Alignment {
        score,
        path,
        path_len,
        segments,
        mismatches,
        gap_opens,
        gap_bases,
    }))
}

/// Splice alignment `x` up to segment boundary `xsid` with alignment `y`
/// from segment boundary `ysid`. The combined score is the sum of the kept
/// segments' contributions; gap tallies are recounted from the spliced path.
pub(crate) fn recombine(
    x: Box<Alignment>,
    xsid: u32,
    y: Box<Alignment>,
    ysid: u32,
) -> Box<Alignment> {
    let xi = xsid as usize;
    let yi = ysid as usize;
    assert!(
        xi <= x.segments.len(),
        "recombine boundary out of range on the first result"
    );
    assert!(
        yi <= y.segments.len(),
        "recombine boundary out of range on the second result"
    );
    let x_cut = x.segments.get(xi).map(|s| s.ppos).unwrap_or(x.path_len);
    let y_cut = y.segments.get(yi).map(|s| s.ppos).unwrap_or(y.path_len);

    let mut pb = PathBuilder::new();
    pb.extend_bits(&x.path, 0, x_cut);
    pb.extend_bits(&y.path, y_cut, y.path_len - y_cut);

    let mut segments: Vec<Segment> = x.segments[..xi].to_vec();
    let mut score: i64 = segments.iter().map(|s| s.score).sum();
    let mut mismatches: u32 = segments.iter().map(|s| s.mismatches).sum();
    for seg in &y.segments[yi..] {
        segments.push(Segment {
            ppos: seg.ppos - y_cut + x_cut,
            ..*seg
        });
        score += seg.score;
        mismatches += seg.mismatches;
    }

    let (path, path_len) = pb.finish();
    let (gap_opens, gap_bases) = crate::cigar::recount_gaps(&path, path_len);
    Box::new(Alignment {
        score,
        path,
        path_len,
        segments,
        mismatches,
        gap_opens,
        gap_bases,
    })
}
