//! Capability descriptors and the dispatch-area layout contract.
//!
//! A capability descriptor bundles the four bandwidth-polymorphic entry
//! points of one engine variant as plain function pointers in fixed field
//! order. Contexts and handles carry two of them — one per bandwidth class,
//! narrowest first — as their leading bytes, so every dispatched call is a
//! fixed-offset pointer load. The size and ordering invariants below are
//! build faults, never runtime checks.

use std::mem;

use crate::defaults::{BW_NARROW, BW_WIDE};
use crate::engine::context::DpContext;
use crate::engine::types::{Alignment, Fill, TraceParams};
use crate::section::{PosPair, Section};

/// Bandwidth classes per dispatch area.
pub const DP_CTX_MAX: usize = 2;

/// Storage index of a bandwidth class inside a dispatch area: narrowest
/// first, independent of the numeric bandwidth.
pub const fn band_index(bw: usize) -> usize {
    (bw >> 4) - 1
}

const _: () = assert!(band_index(BW_NARROW) == 0);
const _: () = assert!(band_index(BW_WIDE) == DP_CTX_MAX - 1);

pub type FillRootFn = fn(&mut DpContext, &Section<'_>, u32, &Section<'_>, u32) -> Option<Fill>;
pub type FillFn = fn(&mut DpContext, Fill, &Section<'_>, &Section<'_>) -> Option<Fill>;
pub type SearchMaxFn = fn(&mut DpContext, Fill) -> PosPair;
pub type TraceFn =
    fn(&mut DpContext, Option<Fill>, Option<Fill>, Option<&TraceParams>) -> Option<Box<Alignment>>;

/// One engine variant's entry points, in fixed field order. The layout is a
/// binding contract with the dispatch area of `Context` and `DpContext`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ApiTable {
    pub dp_fill_root: FillRootFn,
    pub dp_fill: FillFn,
    pub dp_search_max: SearchMaxFn,
    pub dp_trace: TraceFn,
}

// A capability descriptor is exactly four pointer widths, and a dispatch
// area exactly two descriptors.
const _: () = assert!(mem::size_of::<ApiTable>() == 4 * mem::size_of::<usize>());
const _: () =
    assert!(mem::size_of::<[ApiTable; DP_CTX_MAX]>() == DP_CTX_MAX * 4 * mem::size_of::<usize>());

impl ApiTable {
    /// Pointer-level equality of all four entries.
    pub fn ptr_eq(&self, other: &ApiTable) -> bool {
        self.dp_fill_root as usize == other.dp_fill_root as usize
            && self.dp_fill as usize == other.dp_fill as usize
            && self.dp_search_max as usize == other.dp_search_max as usize
            && self.dp_trace as usize == other.dp_trace as usize
    }
}

impl std::fmt::Debug for ApiTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTable")
            .field("dp_fill_root", &(self.dp_fill_root as usize as *const ()))
            .field("dp_fill", &(self.dp_fill as usize as *const ()))
            .field("dp_search_max", &(self.dp_search_max as usize as *const ()))
            .field("dp_trace", &(self.dp_trace as usize as *const ()))
            .finish()
    }
}

#[cold]
fn unstamped() -> ! {
    panic!("dispatch area read before stamping");
}

fn trap_fill_root(
    _: &mut DpContext,
    _: &Section<'_>,
    _: u32,
    _: &Section<'_>,
    _: u32,
) -> Option<Fill> {
    unstamped()
}

fn trap_fill(_: &mut DpContext, _: Fill, _: &Section<'_>, _: &Section<'_>) -> Option<Fill> {
    unstamped()
}

fn trap_search_max(_: &mut DpContext, _: Fill) -> PosPair {
    unstamped()
}

fn trap_trace(
    _: &mut DpContext,
    _: Option<Fill>,
    _: Option<Fill>,
    _: Option<&TraceParams>,
) -> Option<Box<Alignment>> {
    unstamped()
}

/// Placeholder descriptor a freshly built object carries until the facade
/// stamps it. Dispatching through it is a checked fault.
pub(crate) const TRAP_API: ApiTable = ApiTable {
    dp_fill_root: trap_fill_root,
    dp_fill: trap_fill,
    dp_search_max: trap_search_max,
    dp_trace: trap_trace,
};

/// Stamp a dispatch area: a raw bulk copy of both capability rows, narrow
/// row first. Each object is stamped exactly once.
pub(crate) fn set_api(dst: &mut [ApiTable; DP_CTX_MAX], rows: &[ApiTable; DP_CTX_MAX]) {
    debug_assert!(
        dst[0].ptr_eq(&TRAP_API) && dst[1].ptr_eq(&TRAP_API),
        "dispatch area stamped twice"
    );
    *dst = *rows;
}
