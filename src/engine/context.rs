//! Engine root and per-alignment working state.
//!
//! The root context holds the preprocessed scoring profile for one engine
//! variant and may own a chained, narrower root built before it. A handle
//! copies the profile and keeps a ledger of fill states; fill tokens index
//! into that ledger.

use crate::dispatch::api::{band_index, ApiTable, DP_CTX_MAX, TRAP_API};
use crate::defaults::BW_WIDE;
use crate::engine::kernel::GapScoring;
use crate::engine::types::{Fill, LifeState, StackToken, STAT_TERM, STAT_UPDATE_A, STAT_UPDATE_B};
use crate::params::{AlignParams, ScoringProfile};
use crate::section::{Section, SeqLimit};

/// Root state of one engine variant. Owns the chained narrower root, if the
/// builder handed one over.
#[derive(Debug)]
pub struct EngineRoot {
    pub(crate) profile: ScoringProfile,
    pub(crate) bandwidth: usize,
    pub(crate) chained: Option<Box<EngineRoot>>,
}

impl EngineRoot {
    pub fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    /// True while this root still retains a chained narrower root.
    pub fn has_chained(&self) -> bool {
        self.chained.is_some()
    }
}

/// Build one engine variant's root. Degenerate gap costs cannot anchor a
/// band and fail construction.
pub fn init<M: GapScoring, const BW: usize>(
    params: &AlignParams,
    chained: Option<Box<EngineRoot>>,
) -> Option<EngineRoot> {
    if params.gap_extend <= 0 || params.gap_open < 0 {
        return None;
    }
    debug_assert!(
        M::AFFINE == (params.gap_open != 0),
        "gap model disagrees with the selected parameters"
    );
    Some(EngineRoot {
        profile: ScoringProfile::new(params),
        bandwidth: BW,
        chained,
    })
}

/// Release a root. The chained narrower root goes with it; nothing above
/// this layer ever walks the chain.
pub fn clean(root: &mut EngineRoot) {
    root.chained = None;
}

/// One consumed stretch of a section inside a side's accumulation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SectionSpan {
    pub id: u32,
    pub sec_off: u32,
    pub len: u32,
}

/// One side of the DP: the bases accumulated since the root anchor and the
/// sections they came from.
#[derive(Debug, Clone)]
pub(crate) struct SideState {
    pub tail_id: u32,
    pub acc: Vec<u8>,
    pub spans: Vec<SectionSpan>,
}

impl SideState {
    fn root(sec: &Section<'_>, pos: u32) -> Self {
        let acc: Vec<u8> = sec.seq[pos as usize..].to_vec();
        let mut spans = Vec::new();
        if !acc.is_empty() {
            spans.push(SectionSpan {
                id: sec.id,
                sec_off: pos,
                len: acc.len() as u32,
            });
        }
        SideState {
            tail_id: sec.id,
            acc,
            spans,
        }
    }

    /// A side's tail section is recognized by id; re-presenting it
    /// contributes nothing further. A new id appends whole.
    fn append(&mut self, sec: &Section<'_>) {
        if sec.id == self.tail_id {
            return;
        }
        self.tail_id = sec.id;
        if sec.seq.is_empty() {
            return;
        }
        self.spans.push(SectionSpan {
            id: sec.id,
            sec_off: 0,
            len: sec.len(),
        });
        self.acc.extend_from_slice(sec.seq);
    }

    /// Prefix sums of the span lengths; `starts[k]` is where span k begins
    /// in the accumulation, with one extra terminal entry.
    pub(crate) fn span_starts(&self) -> Vec<u32> {
        let mut starts = Vec::with_capacity(self.spans.len() + 1);
        let mut acc = 0u32;
        starts.push(0);
        for s in &self.spans {
            acc += s.len;
            starts.push(acc);
        }
        starts
    }
}

/// Ledger entry behind one fill token.
#[derive(Debug, Clone)]
pub struct FillState {
    pub(crate) a: SideState,
    pub(crate) b: SideState,
    pub(crate) max: i64,
}

impl FillState {
    pub(crate) fn root(a: &Section<'_>, apos: u32, b: &Section<'_>, bpos: u32) -> Self {
        FillState {
            a: SideState::root(a, apos),
            b: SideState::root(b, bpos),
            max: 0,
        }
    }

    pub(crate) fn extended(&self, a: &Section<'_>, b: &Section<'_>) -> Self {
        let mut next = self.clone();
        next.a.append(a);
        next.b.append(b);
        next
    }
}

/// Per-alignment working state. The dispatch area occupies the leading
/// bytes; everything after it belongs to the engine.
#[repr(C)]
#[derive(Debug)]
pub struct DpContext {
    pub(crate) api: [ApiTable; DP_CTX_MAX],
    pub(crate) active: usize,
    pub(crate) profile: ScoringProfile,
    pub(crate) alim: SeqLimit,
    pub(crate) blim: SeqLimit,
    pub(crate) fills: Vec<FillState>,
    pub(crate) state: LifeState,
}

// The dispatch area must sit at the very start of the handle.
const _: () = assert!(std::mem::offset_of!(DpContext, api) == 0);

impl DpContext {
    /// The descriptor this handle dispatches through.
    #[inline]
    pub(crate) fn active_api(&self) -> &ApiTable {
        &self.api[self.active]
    }

    pub fn life_state(&self) -> LifeState {
        self.state
    }

    pub(crate) fn check_live(&self) {
        assert!(
            self.state != LifeState::Cleaned,
            "operation on a cleaned alignment context"
        );
    }

    pub(crate) fn fill_state(&self, f: Fill) -> &FillState {
        assert!(
            (f.id as usize) < self.fills.len(),
            "stale fill token (flushed or foreign)"
        );
        &self.fills[f.id as usize]
    }

    pub(crate) fn push_fill(&mut self, st: FillState, terminated: bool) -> Fill {
        let id = self.fills.len() as u32;
        let max = st.max;
        let mut status = STAT_UPDATE_A | STAT_UPDATE_B;
        if terminated {
            status |= STAT_TERM;
        }
        self.fills.push(st);
        self.state = LifeState::InUse;
        Fill { max, status, id }
    }
}

/// Spawn a handle from a root. The dispatch area starts trapped; the facade
/// stamps it before the handle is handed out.
pub fn dp_init(root: &EngineRoot, alim: SeqLimit, blim: SeqLimit) -> Option<Box<DpContext>> {
    Some(Box::new(DpContext {
        api: [TRAP_API; DP_CTX_MAX],
        active: band_index(BW_WIDE),
        profile: root.profile,
        alim,
        blim,
        fills: Vec::new(),
        state: LifeState::Created,
    }))
}

/// Reset a handle for reuse with fresh limit sentinels. Every outstanding
/// fill token goes stale.
pub fn dp_flush(dp: &mut DpContext, alim: SeqLimit, blim: SeqLimit) {
    dp.check_live();
    dp.fills.clear();
    dp.alim = alim;
    dp.blim = blim;
    dp.state = LifeState::Created;
}

/// Snapshot the fill ledger watermark.
pub fn dp_save_stack(dp: &DpContext) -> StackToken {
    dp.check_live();
    StackToken {
        fills: dp.fills.len(),
    }
}

/// Roll the fill ledger back to a saved watermark. Tokens issued after the
/// save go stale.
pub fn dp_flush_stack(dp: &mut DpContext, stack: StackToken) {
    dp.check_live();
    let keep = stack.fills.min(dp.fills.len());
    dp.fills.truncate(keep);
}

/// Terminal clean. Calling any operation afterwards, including a second
/// clean, is a checked fault.
pub fn dp_clean(dp: &mut DpContext) {
    assert!(
        dp.state != LifeState::Cleaned,
        "alignment context cleaned twice"
    );
    dp.fills = Vec::new();
    dp.state = LifeState::Cleaned;
}
