//! The frozen specialization matrix.
//!
//! One capability descriptor per (gap model, bandwidth class), built at
//! compile time from the monomorphized engine entry points and never
//! mutated. Row order follows `GapModel`'s discriminants; within a row the
//! narrow class sits first per `band_index`.

use super::api::{ApiTable, DP_CTX_MAX};
use crate::defaults::{BW_NARROW, BW_WIDE};
use crate::engine::kernel::{AffineGap, LinearGap};
use crate::engine::ops;
use crate::params::{GapModel, GAP_MODEL_CNT};

macro_rules! variant_entry {
    ($model:ty, $bw:expr) => {
        ApiTable {
            dp_fill_root: ops::dp_fill_root::<$model, { $bw }>,
            dp_fill: ops::dp_fill::<$model, { $bw }>,
            dp_search_max: ops::dp_search_max::<$model, { $bw }>,
            dp_trace: ops::dp_trace::<$model, { $bw }>,
        }
    };
}

// Row indices are the model discriminants.
const _: () = assert!(GapModel::Linear as usize == 0);
const _: () = assert!(GapModel::Affine as usize == GAP_MODEL_CNT - 1);

/// The process-wide variant table, indexed `[model][band class]`.
pub static API_TABLE: [[ApiTable; DP_CTX_MAX]; GAP_MODEL_CNT] = [
    // GapModel::Linear: narrow row, then wide row
    [
        variant_entry!(LinearGap, BW_NARROW),
        variant_entry!(LinearGap, BW_WIDE),
    ],
    // GapModel::Affine
    [
        variant_entry!(AffineGap, BW_NARROW),
        variant_entry!(AffineGap, BW_WIDE),
    ],
];
