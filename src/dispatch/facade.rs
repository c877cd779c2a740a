//! Public alignment surface.
//!
//! Every operation here either reads the stamped capability descriptor out
//! of the handle and tail-calls its pointer, or forwards unconditionally to
//! the wide-bandwidth engine. The flush/stack/clean/recombine/CIGAR group is
//! deliberately bound to the wide engine only; completing their bandwidth
//! polymorphism is out of scope for the current surface.

use std::io;

use super::api::{band_index, set_api, ApiTable, DP_CTX_MAX, TRAP_API};
use super::table::API_TABLE;
use crate::cigar;
use crate::defaults::{BW_NARROW, BW_WIDE};
use crate::engine::context::{self, DpContext, EngineRoot};
use crate::engine::kernel::{AffineGap, GapScoring, LinearGap};
use crate::engine::trace;
use crate::engine::types::{Alignment, Fill, LifeState, StackToken, TraceParams};
use crate::params::{AlignParams, GapModel};
use crate::section::{PosPair, Section, SeqLimit};

/// A configured alignment context: the stamped dispatch rows for one gap
/// model, followed by the wide-bandwidth engine root (which owns the
/// chained narrow root). Handles are spawned from it with [`dp_init`].
#[repr(C)]
#[derive(Debug)]
pub struct Context {
    api: [ApiTable; DP_CTX_MAX],
    root: EngineRoot,
    model: GapModel,
    state: LifeState,
}

// The dispatch area must sit at the very start of the context.
const _: () = assert!(std::mem::offset_of!(Context, api) == 0);

impl Context {
    pub fn model(&self) -> GapModel {
        self.model
    }

    pub fn life_state(&self) -> LifeState {
        self.state
    }

    /// The stamped capability rows, narrow class first. Integrators relying
    /// on the binary layout of this object get exactly these two
    /// descriptors as its leading bytes.
    pub fn dispatch_rows(&self) -> &[ApiTable; DP_CTX_MAX] {
        &self.api
    }

    fn check_live(&self) {
        assert!(
            self.state != LifeState::Cleaned,
            "operation on a cleaned context"
        );
    }
}

/// Pick the gap model from the parameters: affine iff a gap-open cost is
/// present. Pure; absent parameters never reach this point.
pub fn select_model(params: &AlignParams) -> GapModel {
    if params.gap_open != 0 {
        GapModel::Affine
    } else {
        GapModel::Linear
    }
}

fn chain_roots<M: GapScoring>(params: &AlignParams) -> Option<EngineRoot> {
    // narrow root first; the wide root takes ownership of it and the
    // builder never touches it again
    let narrow = context::init::<M, BW_NARROW>(params, None)?;
    context::init::<M, BW_WIDE>(params, Some(Box::new(narrow)))
}

/// Build a context from the given parameters. Absent parameters yield an
/// absent context; so does an engine-init failure.
pub fn init(params: Option<&AlignParams>) -> Option<Box<Context>> {
    let params = params?;
    let model = select_model(params);
    let root = match model {
        GapModel::Linear => chain_roots::<LinearGap>(params),
        GapModel::Affine => chain_roots::<AffineGap>(params),
    }?;
    log::debug!(
        "built {model:?} context, bandwidth classes {BW_NARROW}/{BW_WIDE}"
    );
    let mut ctx = Box::new(Context {
        api: [TRAP_API; DP_CTX_MAX],
        root,
        model,
        state: LifeState::Created,
    });
    set_api(&mut ctx.api, &API_TABLE[model as usize]);
    Some(ctx)
}

/// Release a context. Delegates to the wide engine's clean; the chained
/// narrow root is the wide engine's to release, never walked here.
pub fn clean(ctx: &mut Context) {
    assert!(ctx.state != LifeState::Cleaned, "context cleaned twice");
    context::clean(&mut ctx.root);
    ctx.state = LifeState::Cleaned;
}

/// Spawn a per-alignment handle: delegate to the wide engine's `dp_init`,
/// then stamp the handle with a copy of the context's two capability rows.
/// The builder lineage activates the wide class; the dispatch mechanism
/// itself is generic over the active class.
pub fn dp_init(ctx: &Context, alim: SeqLimit, blim: SeqLimit) -> Option<Box<DpContext>> {
    ctx.check_live();
    let mut dp = context::dp_init(&ctx.root, alim, blim)?;
    set_api(&mut dp.api, ctx.dispatch_rows());
    dp.active = band_index(BW_WIDE);
    Some(dp)
}

/// Reset a handle for reuse with fresh limit sentinels.
pub fn dp_flush(dp: &mut DpContext, alim: SeqLimit, blim: SeqLimit) {
    context::dp_flush(dp, alim, blim);
}

/// Snapshot the handle's fill ledger watermark.
pub fn dp_save_stack(dp: &DpContext) -> StackToken {
    context::dp_save_stack(dp)
}

/// Roll the handle's fill ledger back to a saved watermark.
pub fn dp_flush_stack(dp: &mut DpContext, stack: StackToken) {
    context::dp_flush_stack(dp, stack);
}

/// Terminal clean of a handle.
pub fn dp_clean(dp: &mut DpContext) {
    context::dp_clean(dp);
}

/// Anchor a new fill. Dispatches through the handle's active descriptor.
pub fn dp_fill_root(
    dp: &mut DpContext,
    a: &Section<'_>,
    apos: u32,
    b: &Section<'_>,
    bpos: u32,
) -> Option<Fill> {
    let f = dp.active_api().dp_fill_root;
    f(dp, a, apos, b, bpos)
}

/// Extend a previous fill. Dispatches through the handle's active
/// descriptor.
pub fn dp_fill(
    dp: &mut DpContext,
    prev_sec: Fill,
    a: &Section<'_>,
    b: &Section<'_>,
) -> Option<Fill> {
    let f = dp.active_api().dp_fill;
    f(dp, prev_sec, a, b)
}

/// Merge a set of fills into one. Not supported; always absent.
pub fn dp_merge(_dp: &mut DpContext, _sec_list: &[Fill]) -> Option<Fill> {
    None
}

/// Locate the coordinates of a fill's maximum. Dispatches through the
/// handle's active descriptor.
pub fn dp_search_max(dp: &mut DpContext, sec: Fill) -> PosPair {
    let f = dp.active_api().dp_search_max;
    f(dp, sec)
}

/// Trace an alignment from the given tails. Dispatches through the handle's
/// active descriptor.
pub fn dp_trace(
    dp: &mut DpContext,
    fw_tail: Option<Fill>,
    rv_tail: Option<Fill>,
    params: Option<&TraceParams>,
) -> Option<Box<Alignment>> {
    let f = dp.active_api().dp_trace;
    f(dp, fw_tail, rv_tail, params)
}

/// Splice two traced results at the given segment boundaries.
pub fn dp_recombine(
    dp: &mut DpContext,
    x: Box<Alignment>,
    xsid: u32,
    y: Box<Alignment>,
    ysid: u32,
) -> Box<Alignment> {
    assert!(
        dp.life_state() != LifeState::Cleaned,
        "operation on a cleaned alignment context"
    );
    trace::recombine(x, xsid, y, ysid)
}

/// Release a traced result.
pub fn dp_res_free(res: Box<Alignment>) {
    drop(res);
}

/// Print a path span as forward CIGAR.
pub fn dp_print_cigar_forward(
    out: &mut dyn io::Write,
    path: &[u32],
    offset: u32,
    len: u32,
) -> io::Result<usize> {
    cigar::print_cigar_forward(out, path, offset, len)
}

/// Print a path span as reverse-walked CIGAR.
pub fn dp_print_cigar_reverse(
    out: &mut dyn io::Write,
    path: &[u32],
    offset: u32,
    len: u32,
) -> io::Result<usize> {
    cigar::print_cigar_reverse(out, path, offset, len)
}

/// Format a path span as forward CIGAR into a caller buffer.
pub fn dp_dump_cigar_forward(buf: &mut [u8], path: &[u32], offset: u32, len: u32) -> Option<usize> {
    cigar::dump_cigar_forward(buf, path, offset, len)
}

/// Format a path span as reverse-walked CIGAR into a caller buffer.
pub fn dp_dump_cigar_reverse(buf: &mut [u8], path: &[u32], offset: u32, len: u32) -> Option<usize> {
    cigar::dump_cigar_reverse(buf, path, offset, len)
}
