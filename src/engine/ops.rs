//! Variant entry points bound into the capability table.
//!
//! Each function is monomorphized once per (gap model, bandwidth) pair; the
//! resulting function pointers are what the dispatch table and the stamped
//! contexts carry. Nothing here is reached except through a stamped
//! descriptor.

use crate::engine::context::{DpContext, FillState};
use crate::engine::kernel::{band_fill, GapScoring};
use crate::engine::trace::{assemble, build_part};
use crate::engine::types::{Alignment, Fill, TraceParams};
use crate::section::{PosPair, Section};

/// Anchor a new fill at `(apos, bpos)` inside the given sections.
pub fn dp_fill_root<M: GapScoring, const BW: usize>(
    dp: &mut DpContext,
    a: &Section<'_>,
    apos: u32,
    b: &Section<'_>,
    bpos: u32,
) -> Option<Fill> {
    dp.check_live();
    if apos > a.len() || bpos > b.len() {
        return None;
    }
    let mut st = FillState::root(a, apos, b, bpos);
    let ext = band_fill::<M, BW>(&dp.profile, &st.a.acc, &st.b.acc);
    st.max = ext.max;
    Some(dp.push_fill(st, ext.terminated))
}

/// Extend a previous fill with the next sections on each side.
pub fn dp_fill<M: GapScoring, const BW: usize>(
    dp: &mut DpContext,
    prev: Fill,
    a: &Section<'_>,
    b: &Section<'_>,
) -> Option<Fill> {
    dp.check_live();
    let mut st = dp.fill_state(prev).extended(a, b);
    let ext = band_fill::<M, BW>(&dp.profile, &st.a.acc, &st.b.acc);
    // the accumulated band contains every earlier fill's cells, so the
    // chain maximum is monotone
    st.max = ext.max.max(prev.max);
    Some(dp.push_fill(st, ext.terminated))
}

/// Locate the coordinates of a fill's recorded maximum.
pub fn dp_search_max<M: GapScoring, const BW: usize>(dp: &mut DpContext, sec: Fill) -> PosPair {
    dp.check_live();
    let st = dp.fill_state(sec);
    let ext = band_fill::<M, BW>(&dp.profile, &st.a.acc, &st.b.acc);
    PosPair {
        apos: ext.max_a,
        bpos: ext.max_b,
    }
}

/// Trace an alignment back from the forward tail's best cell, optionally
/// joined with a reverse tail whose path is prepended mirrored.
pub fn dp_trace<M: GapScoring, const BW: usize>(
    dp: &mut DpContext,
    fw_tail: Option<Fill>,
    rv_tail: Option<Fill>,
    params: Option<&TraceParams>,
) -> Option<Box<Alignment>> {
    dp.check_live();
    if fw_tail.is_none() && rv_tail.is_none() {
        return None;
    }
    let fw = fw_tail.map(|f| build_part::<M, BW>(&dp.profile, dp.fill_state(f)));
    let rv = rv_tail.map(|f| build_part::<M, BW>(&dp.profile, dp.fill_state(f)));
    assemble(fw, rv, params)
}
